use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use super::share_math;
use crate::{constants::*, error::FlpError, state::{Farm, SharePosition, Strategy}};

// ─── Lazy harvest ──────────────────────────────────────────────────────────
// Every deposit, withdraw and stake settles pending emission first. Share
// value is marked to market at interaction time only; two calls in the same
// slot see no rebasing between them.

/// Emission accrued to `strategy` since its last harvest.
pub fn pending_for(strategy: &Strategy, farm: &Farm, current_slot: u64) -> Result<u64> {
    share_math::pending_reward(
        current_slot,
        strategy.last_harvest_slot,
        farm.reward_per_slot,
        strategy.alloc_weight,
        farm.total_alloc_weight,
    )
}

/// Mint `pending` reward atoms into the compounding vault, farm-PDA-signed.
/// Call after all internal state mutations are done.
pub fn mint_pending<'info>(
    pending: u64,
    farm: &Account<'info, Farm>,
    reward_mint: &Account<'info, Mint>,
    reward_vault: &Account<'info, TokenAccount>,
    token_program: &Program<'info, Token>,
) -> Result<()> {
    if pending == 0 {
        return Ok(());
    }
    let authority_key = farm.authority;
    let seeds: &[&[u8]] = &[FARM_SEED, authority_key.as_ref(), &[farm.bump]];
    let signer = &[seeds];

    token::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: reward_mint.to_account_info(),
                to: reward_vault.to_account_info(),
                authority: farm.to_account_info(),
            },
            signer,
        ),
        pending,
    )
}

// ─── Handler ───────────────────────────────────────────────────────────────

/// Deposit LP tokens and receive ledger shares.
///
/// Shares are priced against `staked_lp + compounded reward + pending`, so a
/// depositor never captures emission that accrued before they entered. The
/// first deposit locks `BOOTSTRAP_SHARES` forever.
pub fn handler(ctx: Context<Deposit>, lp_amount: u64) -> Result<()> {
    require!(lp_amount > 0, FlpError::ZeroAmount);

    let slot = Clock::get()?.slot;
    let pending = pending_for(&ctx.accounts.strategy, &ctx.accounts.farm, slot)?;

    let total_assets = ctx
        .accounts
        .strategy
        .staked_lp
        .checked_add(ctx.accounts.reward_vault.amount)
        .ok_or(FlpError::MathOverflow)?
        .checked_add(pending)
        .ok_or(FlpError::MathOverflow)?;

    let minted = share_math::shares_for_deposit(
        ctx.accounts.strategy.total_shares,
        total_assets,
        lp_amount,
    )?;

    // Internal state first, token CPIs after.
    {
        let pos = &mut ctx.accounts.position;
        if pos.shares == 0 {
            pos.owner = ctx.accounts.depositor.key();
            pos.strategy = ctx.accounts.strategy.key();
            pos.bump = ctx.bumps.position;
        }
        pos.shares = pos
            .shares
            .checked_add(minted.to_depositor)
            .ok_or(FlpError::MathOverflow)?;
    }

    let strategy = &mut ctx.accounts.strategy;
    strategy.total_shares = strategy
        .total_shares
        .checked_add(minted.to_depositor)
        .ok_or(FlpError::MathOverflow)?
        .checked_add(minted.locked)
        .ok_or(FlpError::MathOverflow)?;
    strategy.staked_lp = strategy
        .staked_lp
        .checked_add(lp_amount)
        .ok_or(FlpError::MathOverflow)?;
    strategy.last_harvest_slot = slot;

    mint_pending(
        pending,
        &ctx.accounts.farm,
        &ctx.accounts.reward_mint,
        &ctx.accounts.reward_vault,
        &ctx.accounts.token_program,
    )?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.depositor_lp.to_account_info(),
                to: ctx.accounts.lp_vault.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        ),
        lp_amount,
    )?;

    msg!(
        "Deposit: lp={} shares={} pending={}",
        lp_amount,
        minted.to_depositor,
        pending
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,

    pub farm: Account<'info, Farm>,

    #[account(
        mut,
        constraint = strategy.farm == farm.key(),
    )]
    pub strategy: Account<'info, Strategy>,

    #[account(
        init_if_needed,
        payer = depositor,
        space = SharePosition::LEN,
        seeds = [POSITION_SEED, strategy.key().as_ref(), depositor.key().as_ref()],
        bump,
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
        constraint = depositor_lp.mint == strategy.lp_mint @ FlpError::MintMismatch,
        constraint = depositor_lp.owner == depositor.key(),
    )]
    pub depositor_lp: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
