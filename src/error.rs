//! Error taxonomy for the arbitrage pipeline.
//!
//! Every error here is recoverable at a stage boundary: a failed lookup,
//! sizing, or quote downgrades the current pipeline step to a logged no-trade
//! and the stage returns to idle. Process-fatal errors (bad snapshot files,
//! WS connect failure) use `anyhow` in the binary instead.

use alloy::primitives::Address;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Pair-index lookup failures.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The triggering pool address is not in any loaded venue snapshot.
    #[error("pool {0} not found in any venue snapshot")]
    NotFound(Address),
}

/// Trade sizing failures.
#[derive(Debug, Error)]
pub enum SizingError {
    /// Neither token of the candidate pair is flash-loanable.
    #[error("no borrowable token in pair {0}/{1}")]
    NotBorrowable(String, String),

    /// An allow-list quantity string did not parse for the token's decimals.
    #[error("invalid quantity {quantity:?} for token {symbol}: {reason}")]
    InvalidQuantity {
        symbol: String,
        quantity: String,
        reason: String,
    },
}

/// Per-pool quote failures. One failing pool never aborts the batch; the
/// caller logs and continues with the remaining candidates.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The router/quoter call reverted.
    #[error("quote reverted: {0}")]
    Revert(String),

    /// The provider call exceeded its deadline.
    #[error("quote timed out after {0:?}")]
    Timeout(Duration),

    /// The provider returned a response we could not interpret.
    #[error("malformed quote response: {0}")]
    Malformed(String),

    /// Pool has empty reserves or a zero price; quoting would divide by zero.
    #[error("pool has zero liquidity")]
    ZeroLiquidity,
}

/// Why an evaluation produced no trade. Informational, logged at the stage
/// boundary rather than propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTradeReason {
    NotBorrowable,
    InsufficientCandidates,
    QuoteFailure,
    NotProfitable,
}

impl fmt::Display for NoTradeReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NoTradeReason::NotBorrowable => write!(f, "no borrowable token"),
            NoTradeReason::InsufficientCandidates => write!(f, "fewer than two quoted candidates"),
            NoTradeReason::QuoteFailure => write!(f, "exit re-quote failed"),
            NoTradeReason::NotProfitable => write!(f, "below breakeven target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_error_display() {
        let err = QuoteError::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("5s"));

        let err = QuoteError::ZeroLiquidity;
        assert_eq!(err.to_string(), "pool has zero liquidity");
    }

    #[test]
    fn test_no_trade_reason_display() {
        assert_eq!(
            NoTradeReason::NotProfitable.to_string(),
            "below breakeven target"
        );
        assert_eq!(
            NoTradeReason::InsufficientCandidates.to_string(),
            "fewer than two quoted candidates"
        );
    }
}
