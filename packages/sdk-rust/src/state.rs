//! On-chain account deserialization.
//!
//! Parses raw account bytes for the program's accounts and for the external
//! constant-product pairs the strategies wrap. Byte offsets mirror the Anchor
//! `#[account]` layouts exactly.

use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};

// ─── Farm ─────────────────────────────────────────────────────────────────────

/// Deserialized `Farm` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// authority(32)  reward_mint(32)  reward_per_slot(8)  total_alloc_weight(8)
/// fee_recipient(32)  fee_rate_bps(2)  bump(1)  = 123 bytes
/// ```
#[derive(Debug, Clone)]
pub struct FarmState {
    pub authority:          Pubkey,
    pub reward_mint:        Pubkey,
    pub reward_per_slot:    u64,
    pub total_alloc_weight: u64,
    pub fee_recipient:      Pubkey,
    pub fee_rate_bps:       u16,
}

/// Deserialize a `Farm` account from raw bytes.
pub fn parse_farm(data: &[u8]) -> Result<FarmState> {
    const EXPECTED: usize = 123;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Farm account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(FarmState {
        authority:          read_pubkey(data, 8)?,
        reward_mint:        read_pubkey(data, 40)?,
        reward_per_slot:    read_u64(data, 72)?,
        total_alloc_weight: read_u64(data, 80)?,
        fee_recipient:      read_pubkey(data, 88)?,
        fee_rate_bps:       read_u16(data, 120)?,
    })
}

// ─── Strategy ─────────────────────────────────────────────────────────────────

/// Deserialized `Strategy` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// farm(32)  amm_pair(32)  lp_mint(32)  lp_vault(32)  reward_vault(32)
/// claim_mint(32)  alloc_weight(8)  total_shares(8)  staked_lp(8)
/// last_harvest_slot(8)  authority_bump(1)  bump(1)  = 234 bytes
/// ```
#[derive(Debug, Clone)]
pub struct StrategyState {
    pub farm:              Pubkey,
    pub amm_pair:          Pubkey,
    pub lp_mint:           Pubkey,
    pub lp_vault:          Pubkey,
    pub reward_vault:      Pubkey,
    pub claim_mint:        Pubkey,
    pub alloc_weight:      u64,
    /// Total ledger shares outstanding.
    pub total_shares:      u64,
    /// LP principal held by the strategy's vault.
    pub staked_lp:         u64,
    pub last_harvest_slot: u64,
}

/// Deserialize a `Strategy` account from raw bytes.
pub fn parse_strategy(data: &[u8]) -> Result<StrategyState> {
    const EXPECTED: usize = 234;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Strategy account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(StrategyState {
        farm:              read_pubkey(data, 8)?,
        amm_pair:          read_pubkey(data, 40)?,
        lp_mint:           read_pubkey(data, 72)?,
        lp_vault:          read_pubkey(data, 104)?,
        reward_vault:      read_pubkey(data, 136)?,
        claim_mint:        read_pubkey(data, 168)?,
        alloc_weight:      read_u64(data, 200)?,
        total_shares:      read_u64(data, 208)?,
        staked_lp:         read_u64(data, 216)?,
        last_harvest_slot: read_u64(data, 224)?,
    })
}

// ─── SharePosition ────────────────────────────────────────────────────────────

/// Deserialized `SharePosition` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// owner(32)  strategy(32)  shares(8)  bump(1)  = 81 bytes
/// ```
#[derive(Debug, Clone)]
pub struct SharePositionState {
    pub owner:    Pubkey,
    pub strategy: Pubkey,
    pub shares:   u64,
}

/// Deserialize a `SharePosition` account from raw bytes.
pub fn parse_share_position(data: &[u8]) -> Result<SharePositionState> {
    const EXPECTED: usize = 81;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!(
                "SharePosition account is {} bytes; expected {}",
                data.len(),
                EXPECTED
            ),
        });
    }
    Ok(SharePositionState {
        owner:    read_pubkey(data, 8)?,
        strategy: read_pubkey(data, 40)?,
        shares:   read_u64(data, 72)?,
    })
}

// ─── StakePosition ────────────────────────────────────────────────────────────

/// Stake mode discriminant, mirroring the on-chain enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeMode {
    Fixed,
    Forever,
}

/// Deserialized `StakePosition` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// strategy(32)  beneficiary(32)  principal_shares(8)  claim_minted(8)
/// mode(1)  maturity_ts(8)  bump(1)  = 98 bytes
/// ```
#[derive(Debug, Clone)]
pub struct StakePositionState {
    pub strategy:         Pubkey,
    pub beneficiary:      Pubkey,
    pub principal_shares: u64,
    pub claim_minted:     u64,
    pub mode:             StakeMode,
    /// `i64::MAX` for `StakeMode::Forever`.
    pub maturity_ts:      i64,
}

/// Deserialize a `StakePosition` account from raw bytes.
pub fn parse_stake_position(data: &[u8]) -> Result<StakePositionState> {
    const EXPECTED: usize = 98;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!(
                "StakePosition account is {} bytes; expected {}",
                data.len(),
                EXPECTED
            ),
        });
    }
    let mode = match data[88] {
        0 => StakeMode::Fixed,
        1 => StakeMode::Forever,
        other => {
            return Err(Error::ParseError {
                offset: 88,
                reason: format!("unknown stake mode discriminant {other}"),
            })
        }
    };
    Ok(StakePositionState {
        strategy:         read_pubkey(data, 8)?,
        beneficiary:      read_pubkey(data, 40)?,
        principal_shares: read_u64(data, 72)?,
        claim_minted:     read_u64(data, 80)?,
        mode,
        maturity_ts:      read_i64(data, 89)?,
    })
}

// ─── External AMM pair ────────────────────────────────────────────────────────

/// Deserialized external pair state, plus the address it was fetched from.
///
/// Layout (after 8-byte discriminator):
/// ```text
/// token_0(32)  token_1(32)  lp_mint(32)
/// reserve_0(8)  reserve_1(8)  lp_supply(8)  = 128 bytes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSnapshot {
    pub address:   Pubkey,
    pub token_0:   Pubkey,
    pub token_1:   Pubkey,
    pub lp_mint:   Pubkey,
    pub reserve_0: u64,
    pub reserve_1: u64,
    pub lp_supply: u64,
}

impl PairSnapshot {
    /// True if this pair connects `a` and `b` (either orientation).
    pub fn connects(&self, a: &Pubkey, b: &Pubkey) -> bool {
        (self.token_0 == *a && self.token_1 == *b) || (self.token_0 == *b && self.token_1 == *a)
    }

    /// True if `token` is one side of the pair.
    pub fn contains(&self, token: &Pubkey) -> bool {
        self.token_0 == *token || self.token_1 == *token
    }

    /// The opposite side of the pair from `token`.
    pub fn other_side(&self, token: &Pubkey) -> Option<Pubkey> {
        if self.token_0 == *token {
            Some(self.token_1)
        } else if self.token_1 == *token {
            Some(self.token_0)
        } else {
            None
        }
    }
}

/// Deserialize an external pair account from raw bytes.
pub fn parse_pair(address: Pubkey, data: &[u8]) -> Result<PairSnapshot> {
    const EXPECTED: usize = 128;
    if data.len() < EXPECTED {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("Pair account is {} bytes; expected {}", data.len(), EXPECTED),
        });
    }
    Ok(PairSnapshot {
        address,
        token_0:   read_pubkey(data, 8)?,
        token_1:   read_pubkey(data, 40)?,
        lp_mint:   read_pubkey(data, 72)?,
        reserve_0: read_u64(data, 104)?,
        reserve_1: read_u64(data, 112)?,
        lp_supply: read_u64(data, 120)?,
    })
}

// ─── SPL token account ────────────────────────────────────────────────────────

/// Read the `amount` field from a packed SPL token account.
///
/// Token account layout: `mint(32) owner(32) amount(8) …`
pub fn parse_token_amount(data: &[u8]) -> Result<u64> {
    if data.len() < 72 {
        return Err(Error::ParseError {
            offset: 64,
            reason: format!("Token account is {} bytes; need at least 72", data.len()),
        });
    }
    read_u64(data, 64)
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let b: [u8; 32] = data[offset..offset + 32]
        .try_into()
        .map_err(|_| Error::ParseError {
            offset,
            reason: "slice too short for Pubkey (32 bytes)".into(),
        })?;
    Ok(Pubkey::from(b))
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    let b: [u8; 2] = data[offset..offset + 2]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u16".into() })?;
    Ok(u16::from_le_bytes(b))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for u64".into() })?;
    Ok(u64::from_le_bytes(b))
}

pub(crate) fn read_i64(data: &[u8], offset: usize) -> Result<i64> {
    let b: [u8; 8] = data[offset..offset + 8]
        .try_into()
        .map_err(|_| Error::ParseError { offset, reason: "slice too short for i64".into() })?;
    Ok(i64::from_le_bytes(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(n: u8) -> Pubkey {
        Pubkey::from([n; 32])
    }

    #[test]
    fn pair_round_trips_through_layout() {
        let mut data = vec![0u8; 128];
        data[8..40].copy_from_slice(pk(1).as_ref());
        data[40..72].copy_from_slice(pk(2).as_ref());
        data[72..104].copy_from_slice(pk(3).as_ref());
        data[104..112].copy_from_slice(&11u64.to_le_bytes());
        data[112..120].copy_from_slice(&22u64.to_le_bytes());
        data[120..128].copy_from_slice(&33u64.to_le_bytes());

        let p = parse_pair(pk(9), &data).unwrap();
        assert_eq!(p.token_0, pk(1));
        assert_eq!(p.token_1, pk(2));
        assert_eq!(p.lp_mint, pk(3));
        assert_eq!(p.reserve_0, 11);
        assert_eq!(p.reserve_1, 22);
        assert_eq!(p.lp_supply, 33);
        assert!(p.connects(&pk(2), &pk(1)));
        assert_eq!(p.other_side(&pk(1)), Some(pk(2)));
        assert_eq!(p.other_side(&pk(7)), None);
    }

    #[test]
    fn stake_mode_discriminant() {
        let mut data = vec![0u8; 98];
        data[88] = 1;
        data[89..97].copy_from_slice(&i64::MAX.to_le_bytes());
        let s = parse_stake_position(&data).unwrap();
        assert_eq!(s.mode, StakeMode::Forever);
        assert_eq!(s.maturity_ts, i64::MAX);

        data[88] = 7;
        assert!(parse_stake_position(&data).is_err());
    }

    #[test]
    fn short_accounts_rejected() {
        assert!(parse_farm(&[0u8; 64]).is_err());
        assert!(parse_strategy(&[0u8; 100]).is_err());
        assert!(parse_share_position(&[0u8; 40]).is_err());
        assert!(parse_token_amount(&[0u8; 32]).is_err());
    }
}
