//! Read-only view of the external constant-product pairs.
//!
//! The strategy never mutates a pair — it parses reserves from raw account
//! bytes and prices hops with the standard 997/1000 formula. Layout after the
//! 8-byte discriminator:
//!
//! ```text
//! token_0(32) token_1(32) lp_mint(32) reserve_0(8) reserve_1(8) lp_supply(8)
//! = 128 bytes
//! ```

use anchor_lang::prelude::*;

use crate::constants::{AMM_FEE_DENOMINATOR, AMM_FEE_NUMERATOR};
use crate::error::FlpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairState {
    pub token_0: Pubkey,
    pub token_1: Pubkey,
    pub lp_mint: Pubkey,
    pub reserve_0: u64,
    pub reserve_1: u64,
    pub lp_supply: u64,
}

impl PairState {
    pub const LEN: usize = 128;

    /// Parse a pair from raw account bytes (discriminator included).
    pub fn from_bytes(data: &[u8]) -> Result<PairState> {
        require!(data.len() >= Self::LEN, FlpError::InvalidPairAccount);
        Ok(PairState {
            token_0: read_pubkey(data, 8)?,
            token_1: read_pubkey(data, 40)?,
            lp_mint: read_pubkey(data, 72)?,
            reserve_0: read_u64(data, 104)?,
            reserve_1: read_u64(data, 112)?,
            lp_supply: read_u64(data, 120)?,
        })
    }

    /// Parse a pair from a live account.
    pub fn load(info: &AccountInfo) -> Result<PairState> {
        let data = info.try_borrow_data()?;
        Self::from_bytes(&data)
    }

    /// Reserves oriented for a swap selling `token_in`.
    /// Returns `(reserve_in, reserve_out, token_out)`.
    pub fn oriented(&self, token_in: &Pubkey) -> Result<(u64, u64, Pubkey)> {
        if *token_in == self.token_0 {
            Ok((self.reserve_0, self.reserve_1, self.token_1))
        } else if *token_in == self.token_1 {
            Ok((self.reserve_1, self.reserve_0, self.token_0))
        } else {
            Err(FlpError::RouteNotFound.into())
        }
    }
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let b: [u8; 32] = data[offset..offset + 32]
        .try_into()
        .map_err(|_| error!(FlpError::InvalidPairAccount))?;
    Ok(Pubkey::from(b))
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| error!(FlpError::InvalidPairAccount))?;
    Ok(u64::from_le_bytes(b))
}

// ─── Pricing ───────────────────────────────────────────────────────────────

/// Constant-product output after the 0.30 % pair fee:
/// `out = r_out * in * 997 / (r_in * 1000 + in * 997)`
pub fn get_amount_out(amount_in: u64, reserve_in: u64, reserve_out: u64) -> Result<u64> {
    require!(reserve_in > 0 && reserve_out > 0, FlpError::InsufficientLiquidity);

    let in_with_fee = (amount_in as u128)
        .checked_mul(AMM_FEE_NUMERATOR)
        .ok_or(FlpError::MathOverflow)?;
    let numerator = in_with_fee
        .checked_mul(reserve_out as u128)
        .ok_or(FlpError::MathOverflow)?;
    let denominator = (reserve_in as u128)
        .checked_mul(AMM_FEE_DENOMINATOR)
        .ok_or(FlpError::MathOverflow)?
        .checked_add(in_with_fee)
        .ok_or(FlpError::MathOverflow)?;
    Ok((numerator / denominator) as u64)
}

/// Price `amount_in` along `route`, one parsed pair per hop.
///
/// A single-element route is already denominated in the reference token and
/// returns `amount_in` unchanged. Each hop must connect `route[i]` to
/// `route[i + 1]` or the whole call fails with `RouteNotFound`.
pub fn quote_route(amount_in: u64, route: &[Pubkey], pairs: &[PairState]) -> Result<u64> {
    if route.len() < 2 {
        return Ok(amount_in);
    }
    require!(pairs.len() == route.len() - 1, FlpError::InvalidRoute);

    let mut amount = amount_in;
    for (i, pair) in pairs.iter().enumerate() {
        let (reserve_in, reserve_out, token_out) = pair.oriented(&route[i])?;
        require_keys_eq!(token_out, route[i + 1], FlpError::RouteNotFound);
        amount = get_amount_out(amount, reserve_in, reserve_out)?;
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn pair(t0: u8, t1: u8, r0: u64, r1: u64) -> PairState {
        PairState {
            token_0: pk(t0),
            token_1: pk(t1),
            lp_mint: pk(200 + t0),
            reserve_0: r0,
            reserve_1: r1,
            lp_supply: 1_000_000,
        }
    }

    #[test]
    fn parses_documented_layout() {
        let mut data = vec![0u8; PairState::LEN];
        data[8..40].copy_from_slice(pk(1).as_ref());
        data[40..72].copy_from_slice(pk(2).as_ref());
        data[72..104].copy_from_slice(pk(3).as_ref());
        data[104..112].copy_from_slice(&500u64.to_le_bytes());
        data[112..120].copy_from_slice(&700u64.to_le_bytes());
        data[120..128].copy_from_slice(&900u64.to_le_bytes());

        let p = PairState::from_bytes(&data).unwrap();
        assert_eq!(p.token_0, pk(1));
        assert_eq!(p.token_1, pk(2));
        assert_eq!(p.lp_mint, pk(3));
        assert_eq!(p.reserve_0, 500);
        assert_eq!(p.reserve_1, 700);
        assert_eq!(p.lp_supply, 900);
    }

    #[test]
    fn rejects_truncated_account() {
        assert!(PairState::from_bytes(&[0u8; 64]).is_err());
    }

    #[test]
    fn amount_out_matches_formula() {
        // 997 * 1000 * 2_000_000 / (1_000_000 * 1000 + 997 * 1000)
        let out = get_amount_out(1_000, 1_000_000, 2_000_000).unwrap();
        assert_eq!(out, 1_991);
    }

    #[test]
    fn empty_reserves_rejected() {
        assert!(get_amount_out(1_000, 0, 2_000_000).is_err());
        assert!(get_amount_out(1_000, 1_000_000, 0).is_err());
    }

    #[test]
    fn identity_route_returns_input() {
        let amount = quote_route(12_345, &[pk(9)], &[]).unwrap();
        assert_eq!(amount, 12_345);
    }

    #[test]
    fn chained_quote_equals_manual_two_step() {
        let ab = pair(1, 2, 1_000_000, 3_000_000);
        let bc = pair(2, 3, 5_000_000, 2_500_000);

        let hop1 = get_amount_out(10_000, ab.reserve_0, ab.reserve_1).unwrap();
        let hop2 = get_amount_out(hop1, bc.reserve_0, bc.reserve_1).unwrap();

        let chained = quote_route(10_000, &[pk(1), pk(2), pk(3)], &[ab, bc]).unwrap();
        assert_eq!(chained, hop2);
    }

    #[test]
    fn reversed_pair_orientation() {
        // Pair stored as (3, 2) but hop goes 2 → 3.
        let cb = pair(3, 2, 2_500_000, 5_000_000);
        let direct = get_amount_out(10_000, 5_000_000, 2_500_000).unwrap();
        let quoted = quote_route(10_000, &[pk(2), pk(3)], &[cb]).unwrap();
        assert_eq!(quoted, direct);
    }

    #[test]
    fn disconnected_hop_is_route_not_found() {
        let ab = pair(1, 2, 1_000_000, 1_000_000);
        assert!(quote_route(1_000, &[pk(1), pk(7)], &[ab]).is_err());
        assert!(quote_route(1_000, &[pk(8), pk(2)], &[ab]).is_err());
    }
}
