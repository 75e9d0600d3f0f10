use anchor_lang::prelude::*;

#[error_code]
pub enum FlpError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Pair has insufficient liquidity")]
    InsufficientLiquidity,
    #[msg("Position holds fewer shares than requested")]
    InsufficientShares,
    #[msg("Fee rate must be 0–1000 bps")]
    InvalidFeeRate,
    #[msg("Allocation weight must be greater than zero")]
    InvalidAllocWeight,
    #[msg("Stake duration must be greater than zero")]
    InvalidDuration,
    #[msg("Route does not start at the underlying token or hop accounts are missing")]
    InvalidRoute,
    #[msg("A route hop has no pair connecting its tokens")]
    RouteNotFound,
    #[msg("Route does not terminate at the reward token")]
    ReferenceMismatch,
    #[msg("Realized value below minimum — slippage exceeded")]
    SlippageExceeded,
    #[msg("Deadline expired")]
    DeadlineExpired,
    #[msg("Stake has not matured")]
    StakeNotMatured,
    #[msg("Beneficiary already has an active stake in this strategy")]
    StakeAlreadyActive,
    #[msg("Fee recipient cannot stake from its own position")]
    FeeRecipientStake,
    #[msg("Token mint does not match strategy")]
    MintMismatch,
    #[msg("Pair account too small or malformed")]
    InvalidPairAccount,
    #[msg("First deposit must exceed the bootstrap share lock")]
    BelowBootstrapMinimum,
}
