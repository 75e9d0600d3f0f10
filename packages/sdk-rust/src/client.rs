//! [`FlpStrategyClient`] — the main entry point for integrations.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::RpcFilterType,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::{
    error::{Error, Result},
    instructions::{
        create_strategy_ix, deposit_ix, derive_ata, derive_farm, derive_position, derive_stake,
        derive_strategy, initialize_farm_ix, redeem_ix, stake_ix, withdraw_ix,
    },
    math::{fee_amount, pending_reward, preview_deposit, value_of},
    route::{find_route, pairs_for_route},
    state::{
        parse_farm, parse_pair, parse_share_position, parse_stake_position, parse_strategy,
        parse_token_amount, FarmState, PairSnapshot, SharePositionState, StakePositionState,
        StrategyState,
    },
    types::{
        CreateStrategyParams, CreateStrategyResult, DepositParams, DepositResult,
        InitializeFarmParams, InitializeFarmResult, RedeemResult, StakeParams, StakeQuote,
        StakeResult, StrategyInfo, WithdrawParams, WithdrawResult,
    },
};

// ─── Constants ────────────────────────────────────────────────────────────────

const DEFAULT_PROGRAM_ID: &str = "Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS";
const DEFAULT_AMM_PROGRAM_ID: &str = "SwaPpA9LAaLfeLi3a68M4DjnLqgtticKg6CnyNwgAC8";
const DEVNET_RPC:  &str = "https://api.devnet.solana.com";
const MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";

/// External pair accounts are a fixed 128 bytes.
const PAIR_ACCOUNT_LEN: u64 = 128;

/// Deadline window submitted with stake transactions.
const STAKE_DEADLINE_SECS: i64 = 60;

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async FLP Strategy client for Solana.
///
/// ```rust,no_run
/// # use flp_strategy_sdk::{FlpStrategyClient, DepositParams};
/// # use solana_sdk::{pubkey::Pubkey, signature::Keypair};
/// # use std::str::FromStr;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FlpStrategyClient::devnet();
/// let payer  = Keypair::new();
/// let farm   = Pubkey::from_str("FarM11111111111111111111111111111111111111")?;
/// let pair   = Pubkey::from_str("Pair11111111111111111111111111111111111111")?;
/// let result = client.deposit(&payer, &farm, DepositParams {
///     amm_pair: pair, lp_amount: 1_000_000_000,
/// }).await?;
/// println!("Minted ~{} shares", result.shares);
/// # Ok(())
/// # }
/// ```
pub struct FlpStrategyClient {
    rpc_url:        String,
    program_id:     Pubkey,
    /// Program that owns the external pair accounts; scanned for routing.
    amm_program_id: Pubkey,
}

impl FlpStrategyClient {
    /// Create a client pointing at any RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url:        rpc_url.into(),
            program_id:     Pubkey::from_str(DEFAULT_PROGRAM_ID).unwrap(),
            amm_program_id: Pubkey::from_str(DEFAULT_AMM_PROGRAM_ID).unwrap(),
        }
    }

    /// Pre-configured client for Solana devnet.
    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    /// Pre-configured client for Solana mainnet-beta.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    /// Override the program ID (useful for locally deployed programs in tests).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    /// Override the external AMM program whose pairs are scanned for routes.
    pub fn with_amm_program_id(mut self, amm_program_id: Pubkey) -> Self {
        self.amm_program_id = amm_program_id;
        self
    }

    // ── Write operations ──────────────────────────────────────────────────────

    /// Initialize a farm with `payer` as its admin authority.
    ///
    /// A fresh keypair for the reward mint is generated internally and
    /// returned in the result — the farm PDA becomes its mint authority.
    pub async fn initialize_farm(
        &self,
        payer:  &Keypair,
        params: InitializeFarmParams,
    ) -> Result<InitializeFarmResult> {
        let rpc = self.rpc();

        let reward_mint = Keypair::new();
        let (farm, _) = derive_farm(&payer.pubkey(), &self.program_id);

        let ix = initialize_farm_ix(
            &self.program_id,
            &payer.pubkey(),
            &reward_mint.pubkey(),
            &params.fee_recipient,
            params.reward_per_slot,
            params.fee_rate_bps,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[&reward_mint]).await?;

        Ok(InitializeFarmResult {
            signature:   sig.to_string(),
            farm,
            reward_mint: reward_mint.pubkey(),
        })
    }

    /// Register a strategy wrapping an external pair.
    ///
    /// `payer` must be the farm's admin authority.  Registration is one-shot
    /// per pair; a pre-flight check fails fast with [`Error::StrategyExists`]
    /// instead of burning a transaction on the PDA collision.
    pub async fn create_strategy(
        &self,
        payer:  &Keypair,
        params: CreateStrategyParams,
    ) -> Result<CreateStrategyResult> {
        let rpc = self.rpc();

        let (farm, _)     = derive_farm(&payer.pubkey(), &self.program_id);
        let (strategy, _) = derive_strategy(&farm, &params.amm_pair, &self.program_id);
        if self.fetch_strategy(&rpc, &strategy).await?.is_some() {
            return Err(Error::StrategyExists(params.amm_pair));
        }

        let farm_state = self.fetch_farm(&rpc, &farm).await?;

        let lp_vault     = Keypair::new();
        let reward_vault = Keypair::new();
        let claim_mint   = Keypair::new();

        let ix = create_strategy_ix(
            &self.program_id,
            &payer.pubkey(),
            &params.amm_pair,
            &params.lp_mint,
            &farm_state.reward_mint,
            &lp_vault.pubkey(),
            &reward_vault.pubkey(),
            &claim_mint.pubkey(),
            params.alloc_weight,
        );
        let sig = self
            .sign_and_send(&rpc, &[ix], payer, &[&lp_vault, &reward_vault, &claim_mint])
            .await?;

        Ok(CreateStrategyResult {
            signature:    sig.to_string(),
            strategy,
            lp_vault:     lp_vault.pubkey(),
            reward_vault: reward_vault.pubkey(),
            claim_mint:   claim_mint.pubkey(),
        })
    }

    /// Deposit LP tokens into a strategy and receive ledger shares.
    pub async fn deposit(
        &self,
        payer:  &Keypair,
        farm:   &Pubkey,
        params: DepositParams,
    ) -> Result<DepositResult> {
        let rpc = self.rpc();

        let (strategy_addr, strategy) =
            self.find_strategy_inner(&rpc, farm, &params.amm_pair).await?;
        let farm_state = self.fetch_farm(&rpc, farm).await?;
        let (position, _) = derive_position(&strategy_addr, &payer.pubkey(), &self.program_id);

        // Quote the share mint against the ledger marked to the current slot.
        let total_assets = self.total_assets_inner(&rpc, &strategy, &farm_state).await?;
        let shares = preview_deposit(strategy.total_shares, total_assets, params.lp_amount)?;

        let depositor_lp = derive_ata(&payer.pubkey(), &strategy.lp_mint);
        let ix = deposit_ix(
            &self.program_id,
            &payer.pubkey(),
            farm,
            &strategy_addr,
            &farm_state.reward_mint,
            &strategy.reward_vault,
            &strategy.lp_vault,
            &depositor_lp,
            params.lp_amount,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(DepositResult {
            signature: sig.to_string(),
            position,
            shares,
        })
    }

    /// Burn ledger shares for the proportional LP principal and reward.
    pub async fn withdraw(
        &self,
        payer:  &Keypair,
        farm:   &Pubkey,
        params: WithdrawParams,
    ) -> Result<WithdrawResult> {
        let rpc = self.rpc();

        let (strategy_addr, strategy) =
            self.find_strategy_inner(&rpc, farm, &params.amm_pair).await?;
        let farm_state = self.fetch_farm(&rpc, farm).await?;

        let withdrawer_lp     = derive_ata(&payer.pubkey(), &strategy.lp_mint);
        let withdrawer_reward = derive_ata(&payer.pubkey(), &farm_state.reward_mint);
        let ix = withdraw_ix(
            &self.program_id,
            &payer.pubkey(),
            farm,
            &strategy_addr,
            &farm_state.reward_mint,
            &strategy.reward_vault,
            &strategy.lp_vault,
            &withdrawer_lp,
            &withdrawer_reward,
            params.share_amount,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(WithdrawResult { signature: sig.to_string() })
    }

    /// Stake ledger shares: value them in the reward token, mint claim tokens
    /// to the beneficiary and lock the principal until maturity.
    ///
    /// Routes, valuation and the slippage floor are computed off-chain from a
    /// pair snapshot (see [`FlpStrategyClient::stake_quote`]) and revalidated
    /// on-chain against live reserves.  Pass `max_slippage_bps = 0` to set the
    /// floor to the quoted value itself.
    pub async fn stake(
        &self,
        payer:  &Keypair,
        farm:   &Pubkey,
        params: StakeParams,
    ) -> Result<StakeResult> {
        let rpc = self.rpc();

        let (strategy_addr, strategy) =
            self.find_strategy_inner(&rpc, farm, &params.amm_pair).await?;
        let farm_state = self.fetch_farm(&rpc, farm).await?;
        let quote = self
            .quote_inner(&rpc, &strategy, &farm_state, params.share_amount, params.max_slippage_bps)
            .await?;

        let (stake_position, _) =
            derive_stake(&strategy_addr, &params.beneficiary, &self.program_id);
        let beneficiary_claim = derive_ata(&params.beneficiary, &strategy.claim_mint);

        let ix = stake_ix(
            &self.program_id,
            &payer.pubkey(),
            farm,
            &farm_state.fee_recipient,
            &strategy_addr,
            &params.amm_pair,
            &params.beneficiary,
            &strategy.claim_mint,
            &beneficiary_claim,
            &farm_state.reward_mint,
            &strategy.reward_vault,
            params.share_amount,
            &quote.route_0,
            &quote.route_1,
            quote.min_value,
            params.mode.into(),
            params.duration_secs,
            quote.deadline,
            &quote.hop_pairs,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(StakeResult {
            signature: sig.to_string(),
            stake_position,
            quote,
        })
    }

    /// Redeem a matured fixed-term stake: burn the claim tokens and release
    /// the principal shares back to the beneficiary's position.
    pub async fn redeem(
        &self,
        payer:    &Keypair,
        farm:     &Pubkey,
        amm_pair: &Pubkey,
    ) -> Result<RedeemResult> {
        let rpc = self.rpc();

        let (strategy_addr, strategy) = self.find_strategy_inner(&rpc, farm, amm_pair).await?;
        let beneficiary_claim = derive_ata(&payer.pubkey(), &strategy.claim_mint);

        let ix = redeem_ix(
            &self.program_id,
            &payer.pubkey(),
            &strategy_addr,
            &strategy.claim_mint,
            &beneficiary_claim,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(RedeemResult { signature: sig.to_string() })
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Look up the strategy registered for a pair, if any.
    pub async fn get_strategy(
        &self,
        farm:     &Pubkey,
        amm_pair: &Pubkey,
    ) -> Result<Option<(Pubkey, StrategyState)>> {
        let rpc = self.rpc();
        let (strategy_addr, _) = derive_strategy(farm, amm_pair, &self.program_id);
        Ok(self
            .fetch_strategy(&rpc, &strategy_addr)
            .await?
            .map(|state| (strategy_addr, state)))
    }

    /// Fetch a strategy with its ledger totals marked to the current slot.
    pub async fn strategy_info(&self, farm: &Pubkey, amm_pair: &Pubkey) -> Result<StrategyInfo> {
        let rpc = self.rpc();

        let (strategy_addr, strategy) = self.find_strategy_inner(&rpc, farm, amm_pair).await?;
        let farm_state = self.fetch_farm(&rpc, farm).await?;
        let total_assets = self.total_assets_inner(&rpc, &strategy, &farm_state).await?;

        Ok(StrategyInfo {
            strategy:      strategy_addr,
            amm_pair:      strategy.amm_pair,
            lp_mint:       strategy.lp_mint,
            claim_mint:    strategy.claim_mint,
            total_shares:  strategy.total_shares,
            staked_lp:     strategy.staked_lp,
            reward_assets: total_assets.saturating_sub(strategy.staked_lp),
            total_assets,
        })
    }

    /// Fetch the caller's share position in a strategy, if any.
    pub async fn get_position(
        &self,
        farm:     &Pubkey,
        amm_pair: &Pubkey,
        owner:    &Pubkey,
    ) -> Result<Option<SharePositionState>> {
        let rpc = self.rpc();
        let (strategy_addr, _) = derive_strategy(farm, amm_pair, &self.program_id);
        let (position, _) = derive_position(&strategy_addr, owner, &self.program_id);
        match rpc.get_account_data(&position).await {
            Ok(data) => Ok(Some(parse_share_position(&data)?)),
            Err(_) => Ok(None),
        }
    }

    /// Fetch a beneficiary's stake position in a strategy, if any.
    pub async fn get_stake(
        &self,
        farm:        &Pubkey,
        amm_pair:    &Pubkey,
        beneficiary: &Pubkey,
    ) -> Result<Option<StakePositionState>> {
        let rpc = self.rpc();
        let (strategy_addr, _) = derive_strategy(farm, amm_pair, &self.program_id);
        let (stake_position, _) = derive_stake(&strategy_addr, beneficiary, &self.program_id);
        match rpc.get_account_data(&stake_position).await {
            Ok(data) => Ok(Some(parse_stake_position(&data)?)),
            Err(_) => Ok(None),
        }
    }

    /// Quote a stake without submitting a transaction.
    ///
    /// Discovers routes from both wrapped tokens to the reward token, values
    /// the shares against current reserves and applies the slippage tolerance.
    /// The returned deadline is 60 seconds out.
    pub async fn stake_quote(
        &self,
        farm:             &Pubkey,
        amm_pair:         &Pubkey,
        share_amount:     u64,
        max_slippage_bps: u16,
    ) -> Result<StakeQuote> {
        let rpc = self.rpc();
        let (_, strategy) = self.find_strategy_inner(&rpc, farm, amm_pair).await?;
        let farm_state = self.fetch_farm(&rpc, farm).await?;
        self.quote_inner(&rpc, &strategy, &farm_state, share_amount, max_slippage_bps)
            .await
    }

    /// Snapshot every pair account owned by the external AMM program.
    pub async fn load_pairs(&self) -> Result<Vec<PairSnapshot>> {
        let rpc = self.rpc();
        self.fetch_pairs(&rpc).await
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn rpc(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    async fn sign_and_send(
        &self,
        rpc:          &RpcClient,
        instructions: &[Instruction],
        payer:        &Keypair,
        extra:        &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = rpc.get_latest_blockhash().await?;
        let mut signers: Vec<&dyn Signer> = vec![payer];
        signers.extend(extra.iter().map(|k| k as &dyn Signer));
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &signers,
            blockhash,
        );
        Ok(rpc.send_and_confirm_transaction(&tx).await?)
    }

    async fn fetch_farm(&self, rpc: &RpcClient, farm: &Pubkey) -> Result<FarmState> {
        parse_farm(&rpc.get_account_data(farm).await?)
    }

    async fn fetch_strategy(
        &self,
        rpc:      &RpcClient,
        strategy: &Pubkey,
    ) -> Result<Option<StrategyState>> {
        match rpc.get_account_data(strategy).await {
            Ok(data) => Ok(Some(parse_strategy(&data)?)),
            Err(_) => Ok(None),
        }
    }

    /// Resolve the registry entry for a pair or fail with `StrategyNotFound`.
    async fn find_strategy_inner(
        &self,
        rpc:      &RpcClient,
        farm:     &Pubkey,
        amm_pair: &Pubkey,
    ) -> Result<(Pubkey, StrategyState)> {
        let (strategy_addr, _) = derive_strategy(farm, amm_pair, &self.program_id);
        let strategy = self
            .fetch_strategy(rpc, &strategy_addr)
            .await?
            .ok_or(Error::StrategyNotFound(*amm_pair))?;
        Ok((strategy_addr, strategy))
    }

    /// `staked_lp + compounded reward + pending emission`, 1:1 reward terms.
    async fn total_assets_inner(
        &self,
        rpc:      &RpcClient,
        strategy: &StrategyState,
        farm:     &FarmState,
    ) -> Result<u64> {
        let reward_held =
            parse_token_amount(&rpc.get_account_data(&strategy.reward_vault).await?)?;
        let pending = pending_reward(
            rpc.get_slot().await?,
            strategy.last_harvest_slot,
            farm.reward_per_slot,
            strategy.alloc_weight,
            farm.total_alloc_weight,
        )?;
        strategy
            .staked_lp
            .checked_add(reward_held)
            .and_then(|a| a.checked_add(pending))
            .ok_or(Error::MathOverflow)
    }

    async fn quote_inner(
        &self,
        rpc:              &RpcClient,
        strategy:         &StrategyState,
        farm:             &FarmState,
        share_amount:     u64,
        max_slippage_bps: u16,
    ) -> Result<StakeQuote> {
        let wrapped = parse_pair(
            strategy.amm_pair,
            &rpc.get_account_data(&strategy.amm_pair).await?,
        )?;
        let pairs = self.fetch_pairs(rpc).await?;

        let route_0 = find_route(&wrapped.token_0, &farm.reward_mint, &pairs)?;
        let route_1 = find_route(&wrapped.token_1, &farm.reward_mint, &pairs)?;

        let value = value_of(
            share_amount,
            strategy,
            &wrapped,
            &farm.reward_mint,
            &route_0,
            &route_1,
            &pairs,
        )?;
        let min_value =
            value.saturating_sub((value as u128 * max_slippage_bps as u128 / 10_000) as u64);
        let fee = fee_amount(share_amount, farm.fee_rate_bps)?;

        let mut hop_pairs: Vec<Pubkey> = pairs_for_route(&route_0, &pairs)?
            .iter()
            .map(|p| p.address)
            .collect();
        hop_pairs.extend(pairs_for_route(&route_1, &pairs)?.iter().map(|p| p.address));

        Ok(StakeQuote {
            route_0,
            route_1,
            value,
            min_value,
            fee,
            hop_pairs,
            deadline: unix_now() + STAKE_DEADLINE_SECS,
        })
    }

    /// Fetch all pair accounts via `getProgramAccounts` on the AMM program.
    async fn fetch_pairs(&self, rpc: &RpcClient) -> Result<Vec<PairSnapshot>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::DataSize(PAIR_ACCOUNT_LEN)]),
            account_config: RpcAccountInfoConfig { ..Default::default() },
            ..Default::default()
        };

        let raw = rpc
            .get_program_accounts_with_config(&self.amm_program_id, config)
            .await?;

        Ok(raw
            .into_iter()
            .filter_map(|(pk, acc)| parse_pair(pk, &acc.data).ok())
            .collect())
    }
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
