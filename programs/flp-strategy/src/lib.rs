/// FLP Strategy — tokenized auto-compounding farm positions.
///
/// Wraps an external constant-product pair's LP token into a share ledger
/// that lazily harvests farm emission, and splits a valued share balance
/// into a time-locked claim token plus retained principal, net of a
/// proportional fee.
///
/// 6 instructions:
///   initialize_farm — create the reward farm and its mint
///   create_strategy — register one strategy per AMM pair (one-shot)
///   deposit         — wrap LP tokens into ledger shares
///   withdraw        — burn shares for LP principal + compounded reward
///   stake           — value shares over caller routes, take the fee,
///                     mint the claim token, lock the backing
///   redeem          — settle a matured stake, burn the claim token

// ─── Security contact ─────────────────────────────────────────────────────────

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name:             "FLP Strategy",
    project_url:      "https://github.com/flp-strategy/flp-strategy",
    contacts:         "email:security@flp-strategy.dev",
    policy:           "Please report security vulnerabilities by email. \
                       We aim to respond within 48 hours.",
    source_code:      "https://github.com/flp-strategy/flp-strategy",
    preferred_languages: "en"
}

pub mod amm;
pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;
pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod flp_strategy {
    use super::*;

    /// Create the reward farm. The farm PDA mints emission on harvest.
    pub fn initialize_farm(
        ctx: Context<InitializeFarm>,
        reward_per_slot: u64,
        fee_rate_bps: u16,
    ) -> Result<()> {
        initialize_farm::handler(ctx, reward_per_slot, fee_rate_bps)
    }

    /// Register a strategy for an AMM pair. Fails if one already exists.
    pub fn create_strategy(ctx: Context<CreateStrategy>, alloc_weight: u64) -> Result<()> {
        create_strategy::handler(ctx, alloc_weight)
    }

    /// Deposit LP tokens and receive proportional ledger shares.
    pub fn deposit(ctx: Context<Deposit>, lp_amount: u64) -> Result<()> {
        deposit::handler(ctx, lp_amount)
    }

    /// Burn shares and withdraw LP principal plus compounded reward.
    pub fn withdraw(ctx: Context<Withdraw>, share_amount: u64) -> Result<()> {
        withdraw::handler(ctx, share_amount)
    }

    /// Stake shares: revalue along the supplied routes, deduct the fee,
    /// mint the claim token to the beneficiary. Hop pairs go in remaining
    /// accounts, route_0's hops before route_1's.
    #[allow(clippy::too_many_arguments)]
    pub fn stake(
        ctx: Context<Stake>,
        share_amount: u64,
        route_0: Vec<Pubkey>,
        route_1: Vec<Pubkey>,
        min_value: u64,
        mode: StakeMode,
        duration: u64,
        deadline: i64,
    ) -> Result<()> {
        stake::handler(ctx, share_amount, route_0, route_1, min_value, mode, duration, deadline)
    }

    /// Settle a matured stake: burn claim tokens, release the principal.
    pub fn redeem(ctx: Context<Redeem>) -> Result<()> {
        redeem::handler(ctx)
    }
}
