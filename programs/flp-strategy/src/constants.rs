/// PDA seeds
pub const FARM_SEED: &[u8] = b"farm";
pub const STRATEGY_SEED: &[u8] = b"strategy";
pub const STRATEGY_AUTHORITY_SEED: &[u8] = b"strategy_authority";
pub const POSITION_SEED: &[u8] = b"position";
pub const STAKE_SEED: &[u8] = b"stake";

/// Default protocol fee on stake: 0.25 %
pub const FEE_RATE_DEFAULT_BPS: u16 = 25;

/// Upper bound for the stake fee rate (10 %)
pub const MAX_FEE_RATE_BPS: u16 = 1_000;

/// Denominator for basis-point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Shares locked forever on the first deposit into an empty ledger.
/// Keeps the share price unmanipulable by the first depositor.
pub const BOOTSTRAP_SHARES: u64 = 1_000;

/// Swap fee of the external constant-product pairs: 0.30 % (997/1000)
pub const AMM_FEE_NUMERATOR: u128 = 997;
pub const AMM_FEE_DENOMINATOR: u128 = 1_000;

/// Decimals of the reward mint and the claim mint
pub const REWARD_DECIMALS: u8 = 9;
pub const CLAIM_DECIMALS: u8 = 9;
