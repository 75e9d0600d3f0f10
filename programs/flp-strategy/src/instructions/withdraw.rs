use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use super::deposit::{mint_pending, pending_for};
use super::share_math;
use crate::{constants::*, error::FlpError, state::{Farm, SharePosition, Strategy}};

/// Burn shares and withdraw the proportional LP principal plus the
/// proportional compounded reward. Pending emission is harvested first, so
/// the proportion is taken of the already-grown pool.
pub fn handler(ctx: Context<Withdraw>, share_amount: u64) -> Result<()> {
    require!(share_amount > 0, FlpError::ZeroAmount);
    require!(
        ctx.accounts.position.shares >= share_amount,
        FlpError::InsufficientShares
    );

    let slot = Clock::get()?.slot;
    let pending = pending_for(&ctx.accounts.strategy, &ctx.accounts.farm, slot)?;

    let total_shares = ctx.accounts.strategy.total_shares;
    let reward_pool = ctx
        .accounts
        .reward_vault
        .amount
        .checked_add(pending)
        .ok_or(FlpError::MathOverflow)?;

    let lp_out = share_math::amount_for_shares(total_shares, ctx.accounts.strategy.staked_lp, share_amount)?;
    let reward_out = share_math::amount_for_shares(total_shares, reward_pool, share_amount)?;

    // Internal state first, token CPIs after.
    {
        let pos = &mut ctx.accounts.position;
        pos.shares = pos.shares.saturating_sub(share_amount);
    }
    let strategy = &mut ctx.accounts.strategy;
    strategy.total_shares = total_shares.saturating_sub(share_amount);
    strategy.staked_lp = strategy.staked_lp.saturating_sub(lp_out);
    strategy.last_harvest_slot = slot;

    mint_pending(
        pending,
        &ctx.accounts.farm,
        &ctx.accounts.reward_mint,
        &ctx.accounts.reward_vault,
        &ctx.accounts.token_program,
    )?;

    let strategy_key = ctx.accounts.strategy.key();
    let authority_bump = ctx.accounts.strategy.authority_bump;
    let seeds: &[&[u8]] = &[STRATEGY_AUTHORITY_SEED, strategy_key.as_ref(), &[authority_bump]];
    let signer = &[seeds];

    if lp_out > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.lp_vault.to_account_info(),
                    to: ctx.accounts.withdrawer_lp.to_account_info(),
                    authority: ctx.accounts.strategy_authority.to_account_info(),
                },
                signer,
            ),
            lp_out,
        )?;
    }
    if reward_out > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_vault.to_account_info(),
                    to: ctx.accounts.withdrawer_reward.to_account_info(),
                    authority: ctx.accounts.strategy_authority.to_account_info(),
                },
                signer,
            ),
            reward_out,
        )?;
    }

    msg!(
        "Withdraw: shares={} lp={} reward={} pending={}",
        share_amount,
        lp_out,
        reward_out,
        pending
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub withdrawer: Signer<'info>,

    pub farm: Account<'info, Farm>,

    #[account(
        mut,
        constraint = strategy.farm == farm.key(),
    )]
    pub strategy: Account<'info, Strategy>,

    /// CHECK: PDA vault authority
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump = strategy.authority_bump,
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [POSITION_SEED, strategy.key().as_ref(), withdrawer.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == withdrawer.key(),
        constraint = position.strategy == strategy.key(),
    )]
    pub position: Account<'info, SharePosition>,

    #[account(
        mut,
        constraint = reward_mint.key() == farm.reward_mint @ FlpError::MintMismatch,
    )]
    pub reward_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = reward_vault.key() == strategy.reward_vault @ FlpError::MintMismatch,
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = lp_vault.key() == strategy.lp_vault @ FlpError::MintMismatch,
    )]
    pub lp_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = withdrawer_lp.mint == strategy.lp_mint @ FlpError::MintMismatch,
        constraint = withdrawer_lp.owner == withdrawer.key(),
    )]
    pub withdrawer_lp: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = withdrawer_reward.mint == farm.reward_mint @ FlpError::MintMismatch,
        constraint = withdrawer_reward.owner == withdrawer.key(),
    )]
    pub withdrawer_reward: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
