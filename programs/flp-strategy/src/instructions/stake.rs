use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

use super::deposit::{mint_pending, pending_for};
use super::share_math;
use crate::amm::{quote_route, PairState};
use crate::{
    constants::*,
    error::FlpError,
    state::{Farm, SharePosition, StakeMode, StakePosition, Strategy},
};

/// Revalue `share_amount` against the caller-supplied routes and the live
/// pair reserves. Remaining accounts carry the hop pairs: route_0's hops
/// first, then route_1's. Both routes must terminate at the reward mint.
fn value_of(
    share_amount: u64,
    strategy: &Strategy,
    pair: &PairState,
    reference: &Pubkey,
    route_0: &[Pubkey],
    route_1: &[Pubkey],
    hop_accounts: &[AccountInfo],
) -> Result<u64> {
    require!(pair.lp_supply > 0, FlpError::InsufficientLiquidity);
    require!(!route_0.is_empty() && !route_1.is_empty(), FlpError::InvalidRoute);
    require_keys_eq!(route_0[0], pair.token_0, FlpError::InvalidRoute);
    require_keys_eq!(route_1[0], pair.token_1, FlpError::InvalidRoute);
    require_keys_eq!(route_0[route_0.len() - 1], *reference, FlpError::ReferenceMismatch);
    require_keys_eq!(route_1[route_1.len() - 1], *reference, FlpError::ReferenceMismatch);

    let hops_0 = route_0.len() - 1;
    let hops_1 = route_1.len() - 1;
    require!(hop_accounts.len() == hops_0 + hops_1, FlpError::InvalidRoute);

    let mut pairs = Vec::with_capacity(hop_accounts.len());
    for info in hop_accounts {
        pairs.push(PairState::load(info)?);
    }

    // Decompose the shares into the pair's two underlying token amounts.
    let lp_equiv =
        share_math::amount_for_shares(strategy.total_shares, strategy.staked_lp, share_amount)?;
    let amount_0 = share_math::amount_for_shares(pair.lp_supply, pair.reserve_0, lp_equiv)?;
    let amount_1 = share_math::amount_for_shares(pair.lp_supply, pair.reserve_1, lp_equiv)?;

    let value_0 = quote_route(amount_0, route_0, &pairs[..hops_0])?;
    let value_1 = quote_route(amount_1, route_1, &pairs[hops_0..])?;
    value_0.checked_add(value_1).ok_or_else(|| error!(FlpError::MathOverflow))
}

/// Stake shares into a time-locked position.
///
/// Pulls `share_amount` from the staker, revalidates the value against
/// `min_value` using live reserves, deducts the proportional fee to the
/// fee-recipient's share position, mints `share_amount − fee` claim tokens to
/// the beneficiary and retains the same net amount of shares as backing until
/// redemption. The whole hand-off happens inside this one instruction.
#[allow(clippy::too_many_arguments)]
pub fn handler(
    ctx: Context<Stake>,
    share_amount: u64,
    route_0: Vec<Pubkey>,
    route_1: Vec<Pubkey>,
    min_value: u64,
    mode: StakeMode,
    duration: u64,
    deadline: i64,
) -> Result<()> {
    let clock = Clock::get()?;
    require!(clock.unix_timestamp <= deadline, FlpError::DeadlineExpired);
    require!(share_amount > 0, FlpError::ZeroAmount);
    require!(
        ctx.accounts.position.shares >= share_amount,
        FlpError::InsufficientShares
    );
    require!(
        !ctx.accounts.stake_position.is_active(),
        FlpError::StakeAlreadyActive
    );

    let pending = pending_for(&ctx.accounts.strategy, &ctx.accounts.farm, clock.slot)?;

    let pair = PairState::load(&ctx.accounts.amm_pair)?;
    let value = value_of(
        share_amount,
        &ctx.accounts.strategy,
        &pair,
        &ctx.accounts.farm.reward_mint,
        &route_0,
        &route_1,
        ctx.remaining_accounts,
    )?;
    require!(value >= min_value, FlpError::SlippageExceeded);

    let fee = share_math::fee_amount(share_amount, ctx.accounts.farm.fee_rate_bps)?;
    let net = share_amount - fee; // fee ≤ share_amount by construction
    require!(net > 0, FlpError::ZeroAmount);
    let maturity_ts = share_math::maturity_for(mode, clock.unix_timestamp, duration)?;

    // Internal state first, token CPIs after.
    {
        let pos = &mut ctx.accounts.position;
        pos.shares = pos.shares.saturating_sub(share_amount);
    }
    {
        let fee_pos = &mut ctx.accounts.fee_position;
        if fee_pos.shares == 0 {
            fee_pos.owner = ctx.accounts.farm.fee_recipient;
            fee_pos.strategy = ctx.accounts.strategy.key();
            fee_pos.bump = ctx.bumps.fee_position;
        }
        fee_pos.shares = fee_pos
            .shares
            .checked_add(fee)
            .ok_or(FlpError::MathOverflow)?;
    }
    {
        let stake = &mut ctx.accounts.stake_position;
        stake.strategy = ctx.accounts.strategy.key();
        stake.beneficiary = ctx.accounts.beneficiary.key();
        stake.principal_shares = net;
        stake.claim_minted = net;
        stake.mode = mode;
        stake.maturity_ts = maturity_ts;
        stake.bump = ctx.bumps.stake_position;
    }
    ctx.accounts.strategy.last_harvest_slot = clock.slot;

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

    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.claim_mint.to_account_info(),
                to: ctx.accounts.beneficiary_claim.to_account_info(),
                authority: ctx.accounts.strategy_authority.to_account_info(),
            },
            signer,
        ),
        net,
    )?;

    msg!(
        "Stake: shares={} value={} fee={} claim={} maturity={}",
        share_amount,
        value,
        fee,
        net,
        maturity_ts
    );
    Ok(())
}

#[derive(Accounts)]
pub struct Stake<'info> {
    // The fee recipient's own position would alias `fee_position` below
    // (same PDA seeds), and the two deserialized copies would clobber each
    // other at exit. Excluded outright.
    #[account(
        mut,
        constraint = staker.key() != farm.fee_recipient @ FlpError::FeeRecipientStake,
    )]
    pub staker: Signer<'info>,

    pub farm: Account<'info, Farm>,

    #[account(
        mut,
        constraint = strategy.farm == farm.key(),
    )]
    pub strategy: Account<'info, Strategy>,

    /// CHECK: external pair wrapped by the strategy, parsed in the handler
    #[account(
        constraint = amm_pair.key() == strategy.amm_pair @ FlpError::MintMismatch,
    )]
    pub amm_pair: UncheckedAccount<'info>,

    /// CHECK: PDA that signs the claim mint
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump = strategy.authority_bump,
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [POSITION_SEED, strategy.key().as_ref(), staker.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == staker.key(),
        constraint = position.strategy == strategy.key(),
    )]
    pub position: Account<'info, SharePosition>,

    /// Fee sink: the fee recipient's share position in this strategy.
    #[account(
        init_if_needed,
        payer = staker,
        space = SharePosition::LEN,
        seeds = [POSITION_SEED, strategy.key().as_ref(), farm.fee_recipient.as_ref()],
        bump,
    )]
    pub fee_position: Account<'info, SharePosition>,

    /// CHECK: receives the claim tokens; only its key is recorded
    pub beneficiary: UncheckedAccount<'info>,

    /// One stake per beneficiary per strategy; a closed (redeemed) position
    /// re-initialises here, an active one is rejected in the handler.
    #[account(
        init_if_needed,
        payer = staker,
        space = StakePosition::LEN,
        seeds = [STAKE_SEED, strategy.key().as_ref(), beneficiary.key().as_ref()],
        bump,
    )]
    pub stake_position: Account<'info, StakePosition>,

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

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // When the staker is the fee recipient, `position` and `fee_position`
    // resolve to one PDA but are deserialized as two copies; whichever is
    // serialized last at exit would erase the other's mutation. The staker
    // constraint excludes the whole case.
    #[test]
    fn fee_recipient_position_aliases_staker_position() {
        let strategy = Pubkey::new_from_array([7; 32]);
        let wallet = Pubkey::new_from_array([1; 32]);

        let as_staker = Pubkey::find_program_address(
            &[POSITION_SEED, strategy.as_ref(), wallet.as_ref()],
            &crate::ID,
        );
        let as_fee_recipient = Pubkey::find_program_address(
            &[POSITION_SEED, strategy.as_ref(), wallet.as_ref()],
            &crate::ID,
        );
        assert_eq!(as_staker, as_fee_recipient);

        // distinct wallets get distinct positions
        let other = Pubkey::new_from_array([2; 32]);
        let other_position = Pubkey::find_program_address(
            &[POSITION_SEED, strategy.as_ref(), other.as_ref()],
            &crate::ID,
        );
        assert_ne!(as_staker.0, other_position.0);
    }
}
