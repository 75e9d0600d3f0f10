//! Parameter and result types for [`crate::client::FlpStrategyClient`].

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::state::StakeMode;

// ─── initialize_farm ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeFarmParams {
    /// Receives the share-denominated stake fee.
    pub fee_recipient:   Pubkey,
    /// Emission rate in reward base units per slot, split by alloc weight.
    pub reward_per_slot: u64,
    pub fee_rate_bps:    u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeFarmResult {
    pub signature:   String,
    pub farm:        Pubkey,
    pub reward_mint: Pubkey,
}

// ─── create_strategy ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStrategyParams {
    /// External constant-product pair to wrap.
    pub amm_pair:     Pubkey,
    /// LP mint of that pair (validated on-chain against the pair account).
    pub lp_mint:      Pubkey,
    /// Share of farm emission for this strategy.
    pub alloc_weight: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStrategyResult {
    pub signature:    String,
    pub strategy:     Pubkey,
    pub lp_vault:     Pubkey,
    pub reward_vault: Pubkey,
    pub claim_mint:   Pubkey,
}

// ─── deposit / withdraw ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositParams {
    pub amm_pair:  Pubkey,
    pub lp_amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositResult {
    pub signature: String,
    pub position:  Pubkey,
    /// Shares the deposit was expected to mint at quote time.
    pub shares:    u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawParams {
    pub amm_pair:     Pubkey,
    pub share_amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResult {
    pub signature: String,
}

// ─── stake / redeem ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeParams {
    pub amm_pair:         Pubkey,
    pub share_amount:     u64,
    pub mode:             StakeModeParam,
    /// Seconds until maturity; ignored for `Forever`.
    pub duration_secs:    u64,
    /// Receives the claim tokens and, at maturity, the principal shares.
    pub beneficiary:      Pubkey,
    /// Slippage tolerance applied to the quoted value.
    pub max_slippage_bps: u16,
}

/// Serializable mirror of the on-chain stake mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeModeParam {
    Fixed,
    Forever,
}

impl From<StakeModeParam> for StakeMode {
    fn from(mode: StakeModeParam) -> Self {
        match mode {
            StakeModeParam::Fixed => StakeMode::Fixed,
            StakeModeParam::Forever => StakeMode::Forever,
        }
    }
}

/// Everything the stake instruction needs, computed from a pair snapshot —
/// the routes, the quoted value, the slippage floor and the hop accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeQuote {
    pub route_0:   Vec<Pubkey>,
    pub route_1:   Vec<Pubkey>,
    /// Quoted reference-token value of the staked shares.
    pub value:     u64,
    /// `value` minus the slippage tolerance; the on-chain floor.
    pub min_value: u64,
    /// Stake fee in shares at the farm's current rate.
    pub fee:       u64,
    /// Hop pair accounts, route_0's hops then route_1's.
    pub hop_pairs: Vec<Pubkey>,
    /// Unix deadline submitted with the instruction.
    pub deadline:  i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeResult {
    pub signature:      String,
    pub stake_position: Pubkey,
    pub quote:          StakeQuote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemResult {
    pub signature: String,
}

// ─── queries ──────────────────────────────────────────────────────────────────

/// A strategy with its ledger totals marked to the current slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub strategy:       Pubkey,
    pub amm_pair:       Pubkey,
    pub lp_mint:        Pubkey,
    pub claim_mint:     Pubkey,
    pub total_shares:   u64,
    pub staked_lp:      u64,
    /// Compounded reward plus pending emission, 1:1 reward terms.
    pub reward_assets:  u64,
    /// `staked_lp + reward_assets`.
    pub total_assets:   u64,
}
