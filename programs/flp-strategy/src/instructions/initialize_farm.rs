use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};

use crate::{constants::*, error::FlpError, state::Farm};

/// Create the reward farm. The farm PDA becomes the mint authority of the
/// reward mint, so harvests mint emission directly — there is no pre-funded
/// reward pool to drain.
pub fn handler(ctx: Context<InitializeFarm>, reward_per_slot: u64, fee_rate_bps: u16) -> Result<()> {
    require!(fee_rate_bps <= MAX_FEE_RATE_BPS, FlpError::InvalidFeeRate);

    let farm = &mut ctx.accounts.farm;
    farm.authority = ctx.accounts.authority.key();
    farm.reward_mint = ctx.accounts.reward_mint.key();
    farm.reward_per_slot = reward_per_slot;
    farm.total_alloc_weight = 0;
    farm.fee_recipient = ctx.accounts.fee_recipient.key();
    farm.fee_rate_bps = fee_rate_bps;
    farm.bump = ctx.bumps.farm;

    msg!(
        "Farm created: reward_mint={} reward_per_slot={} fee={}bps",
        farm.reward_mint,
        reward_per_slot,
        fee_rate_bps
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeFarm<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = Farm::LEN,
        seeds = [FARM_SEED, authority.key().as_ref()],
        bump,
    )]
    pub farm: Account<'info, Farm>,

    /// Reward token; the farm PDA mints it on harvest.
    #[account(
        init,
        payer = authority,
        mint::decimals = REWARD_DECIMALS,
        mint::authority = farm,
    )]
    pub reward_mint: Account<'info, Mint>,

    /// CHECK: recorded as the stake-fee beneficiary, never dereferenced
    pub fee_recipient: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}
