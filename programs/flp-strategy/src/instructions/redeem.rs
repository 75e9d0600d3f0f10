use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount};

use crate::{constants::*, error::FlpError, state::{SharePosition, StakeMode, StakePosition, Strategy}};

/// Settle a matured stake: burn the claim tokens and return the principal
/// shares to the beneficiary's position. `Forever` stakes never mature.
pub fn handler(ctx: Context<Redeem>) -> Result<()> {
    let stake = &ctx.accounts.stake_position;
    require!(stake.mode == StakeMode::Fixed, FlpError::StakeNotMatured);
    require!(
        Clock::get()?.unix_timestamp >= stake.maturity_ts,
        FlpError::StakeNotMatured
    );

    let principal = stake.principal_shares;
    let claim_to_burn = stake.claim_minted;

    // Internal state first, token CPI after.
    {
        let pos = &mut ctx.accounts.position;
        if pos.shares == 0 {
            pos.owner = ctx.accounts.beneficiary.key();
            pos.strategy = ctx.accounts.strategy.key();
            pos.bump = ctx.bumps.position;
        }
        pos.shares = pos
            .shares
            .checked_add(principal)
            .ok_or(FlpError::MathOverflow)?;
    }

    token::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.claim_mint.to_account_info(),
                from: ctx.accounts.beneficiary_claim.to_account_info(),
                authority: ctx.accounts.beneficiary.to_account_info(),
            },
        ),
        claim_to_burn,
    )?;

    msg!("Redeem: principal={} claim_burned={}", principal, claim_to_burn);
    Ok(())
}

#[derive(Accounts)]
pub struct Redeem<'info> {
    #[account(mut)]
    pub beneficiary: Signer<'info>,

    pub strategy: Account<'info, Strategy>,

    #[account(
        mut,
        close = beneficiary,
        seeds = [STAKE_SEED, strategy.key().as_ref(), beneficiary.key().as_ref()],
        bump = stake_position.bump,
        constraint = stake_position.strategy == strategy.key(),
        constraint = stake_position.beneficiary == beneficiary.key(),
    )]
    pub stake_position: Account<'info, StakePosition>,

    #[account(
        init_if_needed,
        payer = beneficiary,
        space = SharePosition::LEN,
        seeds = [POSITION_SEED, strategy.key().as_ref(), beneficiary.key().as_ref()],
        bump,
    )]
    pub position: Account<'info, SharePosition>,

    #[account(
        mut,
        constraint = claim_mint.key() == strategy.claim_mint @ FlpError::MintMismatch,
    )]
    pub claim_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = beneficiary_claim.mint == strategy.claim_mint @ FlpError::MintMismatch,
        constraint = beneficiary_claim.owner == beneficiary.key(),
    )]
    pub beneficiary_claim: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
