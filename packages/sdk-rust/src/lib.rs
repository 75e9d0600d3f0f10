//! FLP Strategy Rust SDK
//!
//! Client for the FLP Strategy program on Solana: deposit LP tokens from an
//! external constant-product pair into an auto-compounding share ledger,
//! stake shares for reward-denominated claim tokens, and redeem matured
//! stakes — no Anchor dependency required.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use flp_strategy_sdk::{FlpStrategyClient, DepositParams, StakeParams, StakeModeParam};
//! use solana_sdk::{pubkey::Pubkey, signature::{Keypair, Signer}};
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FlpStrategyClient::devnet();
//!     let keypair = Keypair::new(); // use your funded keypair
//!
//!     let farm = Pubkey::from_str("FarM11111111111111111111111111111111111111")?;
//!     let pair = Pubkey::from_str("Pair11111111111111111111111111111111111111")?;
//!
//!     // 1. Deposit LP tokens into the strategy wrapping `pair`
//!     let deposit = client.deposit(&keypair, &farm, DepositParams {
//!         amm_pair: pair, lp_amount: 1_000_000_000,
//!     }).await?;
//!     println!("Minted ~{} shares", deposit.shares);
//!
//!     // 2. Quote first, then stake half the shares for one year at 0.5% max slippage
//!     let quote = client.stake_quote(&farm, &pair, deposit.shares / 2, 50).await?;
//!     println!("Stake value: {} (floor {})", quote.value, quote.min_value);
//!
//!     let result = client.stake(&keypair, &farm, StakeParams {
//!         amm_pair:         pair,
//!         share_amount:     deposit.shares / 2,
//!         mode:             StakeModeParam::Fixed,
//!         duration_secs:    365 * 24 * 3600,
//!         beneficiary:      keypair.pubkey(),
//!         max_slippage_bps: 50,
//!     }).await?;
//!     println!("Staked! tx: {}", result.signature);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`FlpStrategyClient::initialize_farm`] | Create a farm with its reward mint |
//! | [`FlpStrategyClient::create_strategy`] | Register a strategy for a pair (one-shot) |
//! | [`FlpStrategyClient::deposit`] | Deposit LP tokens, receive ledger shares |
//! | [`FlpStrategyClient::withdraw`] | Burn shares for LP principal plus reward |
//! | [`FlpStrategyClient::stake`] | Lock shares, mint claim tokens to a beneficiary |
//! | [`FlpStrategyClient::redeem`] | Burn claims, release matured principal |
//! | [`FlpStrategyClient::stake_quote`] | Off-chain routing + valuation breakdown |
//! | [`FlpStrategyClient::strategy_info`] | Ledger totals marked to the current slot |
//! | [`FlpStrategyClient::get_position`] | An owner's share position |
//! | [`FlpStrategyClient::get_stake`] | A beneficiary's stake position |

pub mod client;
pub mod error;
pub mod instructions;
pub mod math;
pub mod route;
pub mod state;
pub mod types;

pub use client::FlpStrategyClient;
pub use error::{Error, Result};
pub use types::*;
