use anchor_lang::prelude::*;

// ─── Farm ──────────────────────────────────────────────────────────────────
// Reward emitter. The farm PDA is the mint authority of the reward mint and
// pays `reward_per_slot`, split across strategies by allocation weight.
#[account]
pub struct Farm {
    /// Admin that registers strategies and their weights
    pub authority: Pubkey,          // 32
    /// Reward token minted on harvest
    pub reward_mint: Pubkey,        // 32
    /// Emission rate, reward atoms per slot across all strategies
    pub reward_per_slot: u64,       // 8
    /// Sum of all strategy allocation weights
    pub total_alloc_weight: u64,    // 8
    /// Account credited with the stake fee (in shares)
    pub fee_recipient: Pubkey,      // 32
    /// Stake fee rate in basis points (e.g. 25 = 0.25 %)
    pub fee_rate_bps: u16,          // 2
    pub bump: u8,                   // 1
}

impl Farm {
    // 8 discriminator + 32+32+8+8+32+2+1 = 123
    pub const LEN: usize = 123;
}

// ─── Strategy ──────────────────────────────────────────────────────────────
// One strategy per external AMM pair (enforced by PDA derivation).
// Wraps the pair's LP token into an auto-compounding share ledger and hosts
// the fee-aware stake lifecycle for those shares.
#[account]
pub struct Strategy {
    pub farm: Pubkey,               // 32
    /// External constant-product pair this strategy wraps (read-only)
    pub amm_pair: Pubkey,           // 32
    /// LP mint of the wrapped pair
    pub lp_mint: Pubkey,            // 32
    /// Vault holding the deposited LP principal
    pub lp_vault: Pubkey,           // 32
    /// Compounding vault: harvested rewards accumulate here
    pub reward_vault: Pubkey,       // 32
    /// Time-locked claim token minted on stake
    pub claim_mint: Pubkey,         // 32
    /// Share of farm emission this strategy receives
    pub alloc_weight: u64,          // 8
    /// Total ledger shares outstanding (tracked here, not via a mint)
    pub total_shares: u64,          // 8
    /// LP principal held in lp_vault
    pub staked_lp: u64,             // 8
    /// Slot of the last lazy harvest
    pub last_harvest_slot: u64,     // 8
    pub authority_bump: u8,         // 1
    pub bump: u8,                   // 1
}

impl Strategy {
    // 8 + 32*6 + 8*4 + 1 + 1 = 234
    pub const LEN: usize = 234;
}

// ─── SharePosition ─────────────────────────────────────────────────────────
// One owner's share balance in a strategy ledger. The sum over all positions
// plus stake principals plus the locked bootstrap shares equals total_shares.
#[account]
pub struct SharePosition {
    pub owner: Pubkey,              // 32
    pub strategy: Pubkey,           // 32
    pub shares: u64,                // 8
    pub bump: u8,                   // 1
}

impl SharePosition {
    // 8 + 32+32+8+1 = 81
    pub const LEN: usize = 81;
}

// ─── StakePosition ─────────────────────────────────────────────────────────

/// Explicit stake mode: maturity is a pure function of mode and duration.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum StakeMode {
    /// Redeemable at `maturity_ts = start + duration`
    Fixed,
    /// Never redeemable
    Forever,
}

// Created on stake, closed on redemption at or after maturity.
// Holds the fee-adjusted principal shares as backing for the claim tokens.
#[account]
pub struct StakePosition {
    pub strategy: Pubkey,           // 32
    pub beneficiary: Pubkey,        // 32
    /// Shares retained as backing (stake amount minus fee)
    pub principal_shares: u64,      // 8
    /// Claim tokens minted to the beneficiary
    pub claim_minted: u64,          // 8
    pub mode: StakeMode,            // 1
    /// i64::MAX for StakeMode::Forever
    pub maturity_ts: i64,           // 8
    pub bump: u8,                   // 1
}

impl StakePosition {
    // 8 + 32+32+8+8+1+8+1 = 98
    pub const LEN: usize = 98;

    /// An account with claim tokens outstanding. A zeroed (freshly
    /// re-initialised) position is inactive and may be staked into.
    pub fn is_active(&self) -> bool {
        self.claim_minted > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stake_position_active_only_with_claims_outstanding() {
        let mut stake = StakePosition {
            strategy: Pubkey::default(),
            beneficiary: Pubkey::default(),
            principal_shares: 0,
            claim_minted: 0,
            mode: StakeMode::Fixed,
            maturity_ts: 0,
            bump: 0,
        };
        assert!(!stake.is_active());

        stake.principal_shares = 1_000;
        stake.claim_minted = 1_000;
        assert!(stake.is_active());
    }
}
