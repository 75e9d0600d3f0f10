//! Path finding over a snapshot of the external pair graph.
//!
//! Mirrors the route discovery the on-chain program expects: the caller
//! computes routes off-chain against fetched pair accounts and submits them
//! with the stake instruction, where they are revalidated against live
//! reserves.

use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};
use crate::state::PairSnapshot;

/// The first pair in enumeration order that connects `a` and `b`.
pub fn direct_pair<'a>(a: &Pubkey, b: &Pubkey, pairs: &'a [PairSnapshot]) -> Option<&'a PairSnapshot> {
    pairs.iter().find(|p| p.connects(a, b))
}

/// Find a route from `token_in` to `reference`.
///
/// - `token_in == reference`: the single-element identity route.
/// - A direct pair exists: `[token_in, reference]`.
/// - Otherwise one scan over the pairs; the first bridge token that has a
///   direct pair to the reference wins. No best-price comparison is made —
///   enumeration order decides.
///
/// Only routes of up to two hops are considered; anything deeper fails with
/// [`Error::RouteNotFound`].
pub fn find_route(
    token_in: &Pubkey,
    reference: &Pubkey,
    pairs: &[PairSnapshot],
) -> Result<Vec<Pubkey>> {
    if token_in == reference {
        return Ok(vec![*token_in]);
    }
    if direct_pair(token_in, reference, pairs).is_some() {
        return Ok(vec![*token_in, *reference]);
    }
    for pair in pairs {
        if let Some(bridge) = pair.other_side(token_in) {
            if direct_pair(&bridge, reference, pairs).is_some() {
                return Ok(vec![*token_in, bridge, *reference]);
            }
        }
    }
    Err(Error::RouteNotFound(*token_in))
}

/// Resolve the hop pairs for a route, one per adjacent token pair.
///
/// Returns the pairs in hop order — the accounts the stake instruction needs
/// in its remaining-accounts list.
pub fn pairs_for_route(route: &[Pubkey], pairs: &[PairSnapshot]) -> Result<Vec<PairSnapshot>> {
    let mut hops = Vec::new();
    for window in route.windows(2) {
        let pair = direct_pair(&window[0], &window[1], pairs)
            .ok_or(Error::RouteNotFound(window[0]))?;
        hops.push(*pair);
    }
    Ok(hops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(n: u8) -> Pubkey {
        Pubkey::from([n; 32])
    }

    fn pair(t0: u8, t1: u8) -> PairSnapshot {
        PairSnapshot {
            address:   pk(100 + t0 * 10 + t1),
            token_0:   pk(t0),
            token_1:   pk(t1),
            lp_mint:   pk(200 + t0),
            reserve_0: 1_000_000,
            reserve_1: 1_000_000,
            lp_supply: 1_000_000,
        }
    }

    const REF: u8 = 9;

    #[test]
    fn identity_route_for_reference_token() {
        let route = find_route(&pk(REF), &pk(REF), &[]).unwrap();
        assert_eq!(route, vec![pk(REF)]);
    }

    #[test]
    fn direct_route_wins_over_bridge() {
        // 1 connects to 9 both directly and via 2; direct must win.
        let pairs = [pair(1, 2), pair(2, REF), pair(1, REF)];
        let route = find_route(&pk(1), &pk(REF), &pairs).unwrap();
        assert_eq!(route, vec![pk(1), pk(REF)]);
    }

    #[test]
    fn first_valid_bridge_in_enumeration_order() {
        // Both 2 and 3 bridge 1 → 9; the pair listed first decides.
        let pairs = [pair(1, 2), pair(1, 3), pair(2, REF), pair(3, REF)];
        let route = find_route(&pk(1), &pk(REF), &pairs).unwrap();
        assert_eq!(route, vec![pk(1), pk(2), pk(REF)]);

        let reordered = [pair(1, 3), pair(1, 2), pair(2, REF), pair(3, REF)];
        let route = find_route(&pk(1), &pk(REF), &reordered).unwrap();
        assert_eq!(route, vec![pk(1), pk(3), pk(REF)]);
    }

    #[test]
    fn bridge_without_reference_pair_is_skipped() {
        // 2 touches 1 but has no pair to 9; 3 does.
        let pairs = [pair(1, 2), pair(1, 3), pair(3, REF)];
        let route = find_route(&pk(1), &pk(REF), &pairs).unwrap();
        assert_eq!(route, vec![pk(1), pk(3), pk(REF)]);
    }

    #[test]
    fn three_hop_paths_are_out_of_reach() {
        // 1 → 2 → 3 → 9 exists but needs three hops.
        let pairs = [pair(1, 2), pair(2, 3), pair(3, REF)];
        let err = find_route(&pk(1), &pk(REF), &pairs).unwrap_err();
        assert!(matches!(err, Error::RouteNotFound(t) if t == pk(1)));
    }

    #[test]
    fn hop_pairs_resolve_in_route_order() {
        let pairs = [pair(2, REF), pair(1, 2)];
        let route = vec![pk(1), pk(2), pk(REF)];
        let hops = pairs_for_route(&route, &pairs).unwrap();
        assert_eq!(hops.len(), 2);
        assert!(hops[0].connects(&pk(1), &pk(2)));
        assert!(hops[1].connects(&pk(2), &pk(REF)));

        assert_eq!(pairs_for_route(&[pk(REF)], &pairs).unwrap().len(), 0);
        assert!(pairs_for_route(&[pk(1), pk(7)], &pairs).is_err());
    }
}
