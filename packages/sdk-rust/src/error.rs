//! SDK error type.

use solana_sdk::pubkey::Pubkey;

/// All errors returned by the FLP Strategy SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── RPC / network ────────────────────────────────────────────────────────
    /// A Solana JSON-RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    // ── Registry lookups ─────────────────────────────────────────────────────
    /// No strategy account exists for the given pair.
    #[error("Strategy not found for pair {0}")]
    StrategyNotFound(Pubkey),

    /// A strategy for this pair already exists — creation is one-shot.
    #[error("Strategy already registered for pair {0}")]
    StrategyExists(Pubkey),

    // ── Routing / valuation ──────────────────────────────────────────────────
    /// No two-hop route connects the token to the reference token.
    #[error("No route from {0} to the reference token")]
    RouteNotFound(Pubkey),

    /// A supplied route does not terminate at the reference token.
    #[error("Route does not terminate at the reference token")]
    ReferenceMismatch,

    /// A pair on the route (or the wrapped pair) has empty reserves.
    #[error("Pair has no liquidity")]
    NoLiquidity,

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in quote / share math")]
    MathOverflow,

    // ── Account parsing ──────────────────────────────────────────────────────
    /// Raw account bytes could not be deserialized.
    #[error("Account parse error at offset {offset}: {reason}")]
    ParseError { offset: usize, reason: String },

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
