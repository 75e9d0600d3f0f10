//! Low-level Anchor instruction builders.
//!
//! Each function constructs a [`solana_sdk::instruction::Instruction`] ready
//! for signing and submission.  Account order mirrors the Anchor
//! `#[derive(Accounts)]` structs in the on-chain program exactly.
//!
//! Anchor instruction discriminators: `sha256("global:{name}")[..8]`.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    sysvar,
};
use std::str::FromStr;

use crate::state::StakeMode;

// ─── Well-known program IDs ───────────────────────────────────────────────────

pub(crate) fn spl_token_id() -> Pubkey {
    Pubkey::from_str("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap()
}

pub(crate) fn ata_program_id() -> Pubkey {
    Pubkey::from_str("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL").unwrap()
}

// ─── PDA seeds (mirrors programs/flp-strategy/src/constants.rs) ───────────────

pub const FARM_SEED:               &[u8] = b"farm";
pub const STRATEGY_SEED:           &[u8] = b"strategy";
pub const STRATEGY_AUTHORITY_SEED: &[u8] = b"strategy_authority";
pub const POSITION_SEED:           &[u8] = b"position";
pub const STAKE_SEED:              &[u8] = b"stake";

// ─── PDA derivation helpers ───────────────────────────────────────────────────

/// Derive the farm PDA for an admin authority.
pub fn derive_farm(authority: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FARM_SEED, authority.as_ref()], program_id)
}

/// Derive the strategy PDA for a wrapped pair — the registry key.
pub fn derive_strategy(farm: &Pubkey, amm_pair: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[STRATEGY_SEED, farm.as_ref(), amm_pair.as_ref()],
        program_id,
    )
}

/// Derive the strategy-authority PDA that owns the vaults and claim mint.
pub fn derive_strategy_authority(strategy: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STRATEGY_AUTHORITY_SEED, strategy.as_ref()], program_id)
}

/// Derive an owner's share position PDA in a strategy.
pub fn derive_position(strategy: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[POSITION_SEED, strategy.as_ref(), owner.as_ref()],
        program_id,
    )
}

/// Derive a beneficiary's stake position PDA in a strategy.
pub fn derive_stake(strategy: &Pubkey, beneficiary: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[STAKE_SEED, strategy.as_ref(), beneficiary.as_ref()],
        program_id,
    )
}

/// Derive the Associated Token Account for a wallet + mint.
pub fn derive_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    let token_prog = spl_token_id();
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_prog.as_ref(), mint.as_ref()],
        &ata_program_id(),
    )
    .0
}

// ─── Discriminator ────────────────────────────────────────────────────────────

fn disc(name: &str) -> [u8; 8] {
    let preimage = format!("global:{name}");
    let h = solana_sdk::hash::hash(preimage.as_bytes());
    h.to_bytes()[..8].try_into().unwrap()
}

fn push_pubkey_vec(data: &mut Vec<u8>, keys: &[Pubkey]) {
    data.extend_from_slice(&(keys.len() as u32).to_le_bytes());
    for key in keys {
        data.extend_from_slice(key.as_ref());
    }
}

// ─── initialize_farm ──────────────────────────────────────────────────────────

/// Build the `initialize_farm` instruction.
///
/// `reward_mint` must be a fresh keypair — it is initialised with the farm
/// PDA as mint authority and must co-sign the transaction.
pub fn initialize_farm_ix(
    program_id:      &Pubkey,
    authority:       &Pubkey,
    reward_mint:     &Pubkey,
    fee_recipient:   &Pubkey,
    reward_per_slot: u64,
    fee_rate_bps:    u16,
) -> Instruction {
    let (farm, _) = derive_farm(authority, program_id);

    let mut data = disc("initialize_farm").to_vec();
    data.extend_from_slice(&reward_per_slot.to_le_bytes());
    data.extend_from_slice(&fee_rate_bps.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority,              true),   // mut + signer
            AccountMeta::new(farm,                    false),  // mut PDA (init)
            AccountMeta::new(*reward_mint,            true),   // mut + signer (init)
            AccountMeta::new_readonly(*fee_recipient, false),
            AccountMeta::new_readonly(spl_token_id(), false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data,
    }
}

// ─── create_strategy ──────────────────────────────────────────────────────────

/// Build the `create_strategy` instruction.
///
/// `lp_vault`, `reward_vault` and `claim_mint` must be fresh keypairs — they
/// are initialised under the strategy-authority PDA and must co-sign.
#[allow(clippy::too_many_arguments)]
pub fn create_strategy_ix(
    program_id:   &Pubkey,
    authority:    &Pubkey,
    amm_pair:     &Pubkey,
    lp_mint:      &Pubkey,
    reward_mint:  &Pubkey,
    lp_vault:     &Pubkey,
    reward_vault: &Pubkey,
    claim_mint:   &Pubkey,
    alloc_weight: u64,
) -> Instruction {
    let (farm, _)               = derive_farm(authority, program_id);
    let (strategy, _)           = derive_strategy(&farm, amm_pair, program_id);
    let (strategy_authority, _) = derive_strategy_authority(&strategy, program_id);

    let mut data = disc("create_strategy").to_vec();
    data.extend_from_slice(&alloc_weight.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*authority,                  true),   // mut + signer
            AccountMeta::new(farm,                        false),  // mut
            AccountMeta::new_readonly(*amm_pair,          false),
            AccountMeta::new(strategy,                    false),  // mut PDA (init)
            AccountMeta::new_readonly(strategy_authority, false),
            AccountMeta::new_readonly(*lp_mint,           false),
            AccountMeta::new_readonly(*reward_mint,       false),
            AccountMeta::new(*lp_vault,                   true),   // mut + signer (init)
            AccountMeta::new(*reward_vault,               true),   // mut + signer (init)
            AccountMeta::new(*claim_mint,                 true),   // mut + signer (init)
            AccountMeta::new_readonly(spl_token_id(),     false),
            AccountMeta::new_readonly(Pubkey::default(),  false),  // system program
            AccountMeta::new_readonly(sysvar::rent::ID,   false),
        ],
        data,
    }
}

// ─── deposit ──────────────────────────────────────────────────────────────────

/// Build the `deposit` instruction.
#[allow(clippy::too_many_arguments)]
pub fn deposit_ix(
    program_id:   &Pubkey,
    depositor:    &Pubkey,
    farm:         &Pubkey,
    strategy:     &Pubkey,
    reward_mint:  &Pubkey,
    reward_vault: &Pubkey,
    lp_vault:     &Pubkey,
    depositor_lp: &Pubkey,
    lp_amount:    u64,
) -> Instruction {
    let (position, _) = derive_position(strategy, depositor, program_id);

    let mut data = disc("deposit").to_vec();
    data.extend_from_slice(&lp_amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*depositor,             true),   // mut + signer
            AccountMeta::new_readonly(*farm,         false),
            AccountMeta::new(*strategy,              false),  // mut
            AccountMeta::new(position,               false),  // mut PDA (init_if_needed)
            AccountMeta::new(*reward_mint,           false),  // mut (harvest mints)
            AccountMeta::new(*reward_vault,          false),  // mut
            AccountMeta::new(*lp_vault,              false),  // mut
            AccountMeta::new(*depositor_lp,          false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data,
    }
}

// ─── withdraw ─────────────────────────────────────────────────────────────────

/// Build the `withdraw` instruction.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_ix(
    program_id:        &Pubkey,
    withdrawer:        &Pubkey,
    farm:              &Pubkey,
    strategy:          &Pubkey,
    reward_mint:       &Pubkey,
    reward_vault:      &Pubkey,
    lp_vault:          &Pubkey,
    withdrawer_lp:     &Pubkey,
    withdrawer_reward: &Pubkey,
    share_amount:      u64,
) -> Instruction {
    let (strategy_authority, _) = derive_strategy_authority(strategy, program_id);
    let (position, _)           = derive_position(strategy, withdrawer, program_id);

    let mut data = disc("withdraw").to_vec();
    data.extend_from_slice(&share_amount.to_le_bytes());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*withdrawer,                 true),   // mut + signer
            AccountMeta::new_readonly(*farm,              false),
            AccountMeta::new(*strategy,                   false),  // mut
            AccountMeta::new_readonly(strategy_authority, false),
            AccountMeta::new(position,                    false),  // mut
            AccountMeta::new(*reward_mint,                false),  // mut
            AccountMeta::new(*reward_vault,               false),  // mut
            AccountMeta::new(*lp_vault,                   false),  // mut
            AccountMeta::new(*withdrawer_lp,              false),  // mut
            AccountMeta::new(*withdrawer_reward,          false),  // mut
            AccountMeta::new_readonly(spl_token_id(),     false),
        ],
        data,
    }
}

// ─── stake ────────────────────────────────────────────────────────────────────

/// Build the `stake` instruction.
///
/// `hop_pairs` go into remaining accounts in hop order: route_0's hops first,
/// then route_1's — the program walks them in that order.
#[allow(clippy::too_many_arguments)]
pub fn stake_ix(
    program_id:        &Pubkey,
    staker:            &Pubkey,
    farm:              &Pubkey,
    fee_recipient:     &Pubkey,
    strategy:          &Pubkey,
    amm_pair:          &Pubkey,
    beneficiary:       &Pubkey,
    claim_mint:        &Pubkey,
    beneficiary_claim: &Pubkey,
    reward_mint:       &Pubkey,
    reward_vault:      &Pubkey,
    share_amount:      u64,
    route_0:           &[Pubkey],
    route_1:           &[Pubkey],
    min_value:         u64,
    mode:              StakeMode,
    duration:          u64,
    deadline:          i64,
    hop_pairs:         &[Pubkey],
) -> Instruction {
    let (strategy_authority, _) = derive_strategy_authority(strategy, program_id);
    let (position, _)           = derive_position(strategy, staker, program_id);
    let (fee_position, _)       = derive_position(strategy, fee_recipient, program_id);
    let (stake_position, _)     = derive_stake(strategy, beneficiary, program_id);

    let mut data = disc("stake").to_vec();
    data.extend_from_slice(&share_amount.to_le_bytes());
    push_pubkey_vec(&mut data, route_0);
    push_pubkey_vec(&mut data, route_1);
    data.extend_from_slice(&min_value.to_le_bytes());
    data.push(match mode {
        StakeMode::Fixed => 0,
        StakeMode::Forever => 1,
    });
    data.extend_from_slice(&duration.to_le_bytes());
    data.extend_from_slice(&deadline.to_le_bytes());

    let mut accounts = vec![
        AccountMeta::new(*staker,                     true),   // mut + signer
        AccountMeta::new_readonly(*farm,              false),
        AccountMeta::new(*strategy,                   false),  // mut
        AccountMeta::new_readonly(*amm_pair,          false),
        AccountMeta::new_readonly(strategy_authority, false),
        AccountMeta::new(position,                    false),  // mut
        AccountMeta::new(fee_position,                false),  // mut PDA (init_if_needed)
        AccountMeta::new_readonly(*beneficiary,       false),
        AccountMeta::new(stake_position,              false),  // mut PDA (init)
        AccountMeta::new(*claim_mint,                 false),  // mut
        AccountMeta::new(*beneficiary_claim,          false),  // mut
        AccountMeta::new(*reward_mint,                false),  // mut
        AccountMeta::new(*reward_vault,               false),  // mut
        AccountMeta::new_readonly(spl_token_id(),     false),
        AccountMeta::new_readonly(Pubkey::default(),  false),  // system program
        AccountMeta::new_readonly(sysvar::rent::ID,   false),
    ];
    for pair in hop_pairs {
        accounts.push(AccountMeta::new_readonly(*pair, false));
    }

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

// ─── redeem ───────────────────────────────────────────────────────────────────

/// Build the `redeem` instruction.
pub fn redeem_ix(
    program_id:        &Pubkey,
    beneficiary:       &Pubkey,
    strategy:          &Pubkey,
    claim_mint:        &Pubkey,
    beneficiary_claim: &Pubkey,
) -> Instruction {
    let (stake_position, _) = derive_stake(strategy, beneficiary, program_id);
    let (position, _)       = derive_position(strategy, beneficiary, program_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*beneficiary,            true),   // mut + signer
            AccountMeta::new_readonly(*strategy,      false),
            AccountMeta::new(stake_position,          false),  // mut (close)
            AccountMeta::new(position,                false),  // mut PDA (init_if_needed)
            AccountMeta::new(*claim_mint,             false),  // mut
            AccountMeta::new(*beneficiary_claim,      false),  // mut
            AccountMeta::new_readonly(spl_token_id(), false),
            AccountMeta::new_readonly(Pubkey::default(), false), // system program
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ],
        data: disc("redeem").to_vec(),
    }
}
