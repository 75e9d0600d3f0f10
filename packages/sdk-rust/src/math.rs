//! Quote, valuation and share math.
//!
//! Mirrors the on-chain arithmetic exactly so off-chain estimates match what
//! the program computes at stake time. All inputs are pre-fetched snapshots;
//! no RPC calls are made here — quotes are advisory and can go stale.

use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};
use crate::route::direct_pair;
use crate::state::{PairSnapshot, StrategyState};

// ─── Constants ────────────────────────────────────────────────────────────────

/// Pair swap fee: 0.30 % = 997/1000.
pub const AMM_FEE_NUMERATOR: u128 = 997;
pub const AMM_FEE_DENOMINATOR: u128 = 1_000;
/// Basis-point denominator for the stake fee.
pub const BPS_DENOMINATOR: u128 = 10_000;
/// Shares locked forever on the first deposit.
pub const BOOTSTRAP_SHARES: u64 = 1_000;

// ─── Pair pricing ─────────────────────────────────────────────────────────────

/// Constant-product output after the pair fee:
/// `out = r_out * in * 997 / (r_in * 1000 + in * 997)`
pub fn get_amount_out(amount_in: u64, reserve_in: u64, reserve_out: u64) -> Result<u64> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(Error::NoLiquidity);
    }
    let in_with_fee = (amount_in as u128)
        .checked_mul(AMM_FEE_NUMERATOR)
        .ok_or(Error::MathOverflow)?;
    let numerator = in_with_fee
        .checked_mul(reserve_out as u128)
        .ok_or(Error::MathOverflow)?;
    let denominator = (reserve_in as u128)
        .checked_mul(AMM_FEE_DENOMINATOR)
        .ok_or(Error::MathOverflow)?
        .checked_add(in_with_fee)
        .ok_or(Error::MathOverflow)?;
    Ok((numerator / denominator) as u64)
}

/// Price `amount_in` along `route`, resolving each hop's pair from the
/// snapshot set. A single-element route returns `amount_in` unchanged.
pub fn quote(amount_in: u64, route: &[Pubkey], pairs: &[PairSnapshot]) -> Result<u64> {
    if route.len() < 2 {
        return Ok(amount_in);
    }
    let mut amount = amount_in;
    for window in route.windows(2) {
        let pair = direct_pair(&window[0], &window[1], pairs)
            .ok_or(Error::RouteNotFound(window[0]))?;
        let (reserve_in, reserve_out) = if pair.token_0 == window[0] {
            (pair.reserve_0, pair.reserve_1)
        } else {
            (pair.reserve_1, pair.reserve_0)
        };
        amount = get_amount_out(amount, reserve_in, reserve_out)?;
    }
    Ok(amount)
}

// ─── Valuation ────────────────────────────────────────────────────────────────

/// Reference-token value of `share_amount` ledger shares.
///
/// Decomposes the proportional LP claim into the wrapped pair's two token
/// amounts, quotes each along its route and sums. Both routes must terminate
/// at `reference` — the program enforces the same at stake time.
pub fn value_of(
    share_amount: u64,
    strategy: &StrategyState,
    wrapped: &PairSnapshot,
    reference: &Pubkey,
    route_0: &[Pubkey],
    route_1: &[Pubkey],
    pairs: &[PairSnapshot],
) -> Result<u64> {
    if wrapped.lp_supply == 0 || strategy.total_shares == 0 {
        return Err(Error::NoLiquidity);
    }
    if route_0.last() != Some(reference) || route_1.last() != Some(reference) {
        return Err(Error::ReferenceMismatch);
    }

    let lp_equiv = mul_div(share_amount, strategy.staked_lp, strategy.total_shares)?;
    let amount_0 = mul_div(lp_equiv, wrapped.reserve_0, wrapped.lp_supply)?;
    let amount_1 = mul_div(lp_equiv, wrapped.reserve_1, wrapped.lp_supply)?;

    let value_0 = quote(amount_0, route_0, pairs)?;
    let value_1 = quote(amount_1, route_1, pairs)?;
    value_0.checked_add(value_1).ok_or(Error::MathOverflow)
}

// ─── Share previews ───────────────────────────────────────────────────────────

/// Shares a deposit of `lp_amount` would mint to the depositor right now.
pub fn preview_deposit(total_shares: u64, total_assets: u64, lp_amount: u64) -> Result<u64> {
    if total_shares == 0 {
        if lp_amount <= BOOTSTRAP_SHARES {
            return Err(Error::InvalidArgument(format!(
                "first deposit must exceed the {BOOTSTRAP_SHARES}-share bootstrap lock"
            )));
        }
        return Ok(lp_amount - BOOTSTRAP_SHARES);
    }
    if total_assets == 0 {
        return Err(Error::NoLiquidity);
    }
    let minted = mul_div(lp_amount, total_shares, total_assets)?;
    if minted == 0 {
        return Err(Error::InvalidArgument(
            "deposit too small to mint a share at the current rate".into(),
        ));
    }
    Ok(minted)
}

/// `(lp_out, reward_out)` a withdrawal of `share_amount` would return.
pub fn preview_withdraw(
    total_shares: u64,
    staked_lp: u64,
    reward_pool: u64,
    share_amount: u64,
) -> Result<(u64, u64)> {
    if total_shares == 0 {
        return Err(Error::NoLiquidity);
    }
    Ok((
        mul_div(share_amount, staked_lp, total_shares)?,
        mul_div(share_amount, reward_pool, total_shares)?,
    ))
}

/// Proportional stake fee: `floor(amount * fee_rate_bps / 10000)`.
pub fn fee_amount(amount: u64, fee_rate_bps: u16) -> Result<u64> {
    let fee = (amount as u128)
        .checked_mul(fee_rate_bps as u128)
        .ok_or(Error::MathOverflow)?
        / BPS_DENOMINATOR;
    Ok(fee as u64)
}

/// Emission accrued to a strategy since `last_harvest_slot`.
pub fn pending_reward(
    current_slot: u64,
    last_harvest_slot: u64,
    reward_per_slot: u64,
    alloc_weight: u64,
    total_alloc_weight: u64,
) -> Result<u64> {
    if total_alloc_weight == 0 || current_slot <= last_harvest_slot {
        return Ok(0);
    }
    let pending = ((current_slot - last_harvest_slot) as u128)
        .checked_mul(reward_per_slot as u128)
        .ok_or(Error::MathOverflow)?
        .checked_mul(alloc_weight as u128)
        .ok_or(Error::MathOverflow)?
        / total_alloc_weight as u128;
    Ok(pending as u64)
}

fn mul_div(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return Err(Error::NoLiquidity);
    }
    let out = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(Error::MathOverflow)?
        / denominator as u128;
    Ok(out as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(n: u8) -> Pubkey {
        Pubkey::from([n; 32])
    }

    fn pair(t0: u8, t1: u8, r0: u64, r1: u64, lp_supply: u64) -> PairSnapshot {
        PairSnapshot {
            address:   pk(100 + t0 * 10 + t1),
            token_0:   pk(t0),
            token_1:   pk(t1),
            lp_mint:   pk(200 + t0),
            reserve_0: r0,
            reserve_1: r1,
            lp_supply,
        }
    }

    fn strategy(total_shares: u64, staked_lp: u64) -> StrategyState {
        StrategyState {
            farm:              pk(50),
            amm_pair:          pk(51),
            lp_mint:           pk(52),
            lp_vault:          pk(53),
            reward_vault:      pk(54),
            claim_mint:        pk(55),
            alloc_weight:      100,
            total_shares,
            staked_lp,
            last_harvest_slot: 0,
        }
    }

    #[test]
    fn quote_composes_hop_by_hop() {
        let pairs = [
            pair(1, 2, 1_000_000, 3_000_000, 1_000_000),
            pair(2, 9, 5_000_000, 2_500_000, 1_000_000),
        ];
        let hop1 = get_amount_out(10_000, 1_000_000, 3_000_000).unwrap();
        let hop2 = get_amount_out(hop1, 5_000_000, 2_500_000).unwrap();
        let chained = quote(10_000, &[pk(1), pk(2), pk(9)], &pairs).unwrap();
        assert_eq!(chained, hop2);

        // identity route
        assert_eq!(quote(10_000, &[pk(9)], &pairs).unwrap(), 10_000);
    }

    #[test]
    fn quote_fails_on_missing_hop_pair() {
        let pairs = [pair(1, 2, 1_000_000, 1_000_000, 1_000_000)];
        assert!(matches!(
            quote(1_000, &[pk(1), pk(2), pk(9)], &pairs),
            Err(Error::RouteNotFound(_))
        ));
    }

    #[test]
    fn value_of_sums_both_legs() {
        // Strategy wraps the 1/2 pair and holds half its LP supply.
        let wrapped = pair(1, 2, 1_000_000, 1_000_000, 1_000_000);
        let leg_0_pair = pair(1, 9, 10_000_000, 10_000_000, 1_000_000);
        let leg_1_pair = pair(2, 9, 8_000_000, 12_000_000, 1_000_000);
        let pairs = [wrapped, leg_0_pair, leg_1_pair];
        let strat = strategy(500_000, 500_000);

        // All shares → half the pair: 500k of token 1 + 500k of token 2.
        let value = value_of(
            500_000,
            &strat,
            &wrapped,
            &pk(9),
            &[pk(1), pk(9)],
            &[pk(2), pk(9)],
            &pairs,
        )
        .unwrap();
        let leg_0 = get_amount_out(500_000, 10_000_000, 10_000_000).unwrap();
        let leg_1 = get_amount_out(500_000, 8_000_000, 12_000_000).unwrap();
        assert_eq!(value, leg_0 + leg_1);
    }

    #[test]
    fn value_of_rejects_mismatched_reference() {
        let wrapped = pair(9, 1, 1_000_000, 1_000_000, 1_000_000);
        let strat = strategy(500_000, 500_000);
        let err = value_of(
            1_000,
            &strat,
            &wrapped,
            &pk(9),
            &[pk(9)],
            &[pk(1), pk(7)],
            &[wrapped],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ReferenceMismatch));
    }

    #[test]
    fn deposit_preview_tracks_share_price() {
        // bootstrap
        assert_eq!(preview_deposit(0, 0, 1_000_000).unwrap(), 999_000);
        assert!(preview_deposit(0, 0, 500).is_err());
        // appreciated ledger: fewer shares per LP
        assert_eq!(preview_deposit(1_000_000, 2_000_000, 100_000).unwrap(), 50_000);
        // dust that floors to zero shares is rejected, matching the program
        assert!(preview_deposit(1_000_000, 2_000_000, 1).is_err());
    }

    #[test]
    fn withdraw_preview_is_proportional() {
        let (lp, reward) = preview_withdraw(1_000_000, 800_000, 200_000, 250_000).unwrap();
        assert_eq!(lp, 200_000);
        assert_eq!(reward, 50_000);
    }

    #[test]
    fn fee_matches_floor_formula() {
        assert_eq!(fee_amount(1_234_567, 25).unwrap(), 1_234_567 * 25 / 10_000);
        assert_eq!(fee_amount(399, 25).unwrap(), 0);
    }

    #[test]
    fn pending_scales_with_weight() {
        assert_eq!(pending_reward(10, 0, 1_000, 25, 100).unwrap(), 2_500);
        assert_eq!(pending_reward(10, 10, 1_000, 25, 100).unwrap(), 0);
        assert_eq!(pending_reward(10, 0, 1_000, 25, 0).unwrap(), 0);
    }
}
