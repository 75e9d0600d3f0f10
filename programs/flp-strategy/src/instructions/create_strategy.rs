use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::amm::PairState;
use crate::{constants::*, error::FlpError, state::{Farm, Strategy}};

/// Register a strategy for one external AMM pair.
///
/// The strategy PDA is derived from `(farm, amm_pair)`, so a second call for
/// the same pair fails at account init — creation is one-shot per pair.
/// A fresh LP vault, compounding reward vault and claim mint are initialised
/// under the strategy-authority PDA.
pub fn handler(ctx: Context<CreateStrategy>, alloc_weight: u64) -> Result<()> {
    require!(alloc_weight > 0, FlpError::InvalidAllocWeight);

    // The pair account is foreign state — parse it to bind the LP mint.
    let pair = PairState::load(&ctx.accounts.amm_pair)?;
    require_keys_eq!(pair.lp_mint, ctx.accounts.lp_mint.key(), FlpError::MintMismatch);

    let farm = &mut ctx.accounts.farm;
    farm.total_alloc_weight = farm
        .total_alloc_weight
        .checked_add(alloc_weight)
        .ok_or(FlpError::MathOverflow)?;

    let strategy = &mut ctx.accounts.strategy;
    strategy.farm = farm.key();
    strategy.amm_pair = ctx.accounts.amm_pair.key();
    strategy.lp_mint = ctx.accounts.lp_mint.key();
    strategy.lp_vault = ctx.accounts.lp_vault.key();
    strategy.reward_vault = ctx.accounts.reward_vault.key();
    strategy.claim_mint = ctx.accounts.claim_mint.key();
    strategy.alloc_weight = alloc_weight;
    strategy.total_shares = 0;
    strategy.staked_lp = 0;
    strategy.last_harvest_slot = Clock::get()?.slot;
    strategy.authority_bump = ctx.bumps.strategy_authority;
    strategy.bump = ctx.bumps.strategy;

    msg!(
        "Strategy created: pair={} lp_mint={} weight={}",
        strategy.amm_pair,
        strategy.lp_mint,
        alloc_weight
    );
    Ok(())
}

#[derive(Accounts)]
pub struct CreateStrategy<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [FARM_SEED, authority.key().as_ref()],
        bump = farm.bump,
        constraint = farm.authority == authority.key(),
    )]
    pub farm: Account<'info, Farm>,

    /// CHECK: external constant-product pair, parsed manually in the handler
    pub amm_pair: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        space = Strategy::LEN,
        seeds = [STRATEGY_SEED, farm.key().as_ref(), amm_pair.key().as_ref()],
        bump,
    )]
    pub strategy: Account<'info, Strategy>,

    /// CHECK: PDA that owns the vaults and the claim mint, holds no data
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump,
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    /// LP mint of the wrapped pair
    pub lp_mint: Account<'info, Mint>,

    #[account(
        constraint = reward_mint.key() == farm.reward_mint @ FlpError::MintMismatch,
    )]
    pub reward_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        token::mint = lp_mint,
        token::authority = strategy_authority,
    )]
    pub lp_vault: Account<'info, TokenAccount>,

    /// Compounding vault for harvested rewards
    #[account(
        init,
        payer = authority,
        token::mint = reward_mint,
        token::authority = strategy_authority,
    )]
    pub reward_vault: Account<'info, TokenAccount>,

    /// Time-locked claim token minted on stake
    #[account(
        init,
        payer = authority,
        mint::decimals = CLAIM_DECIMALS,
        mint::authority = strategy_authority,
    )]
    pub claim_mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
