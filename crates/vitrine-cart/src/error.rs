//! Cart error types.

use std::time::Duration;
use thiserror::Error;
use vitrine_commerce::LineId;

/// Errors surfaced by cart mutations.
///
/// Every failure reverts the optimistic state of the affected lines to
/// the last confirmed snapshot before it is returned; nothing is
/// retried automatically.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    /// The remote cart service rejected the command (e.g.,
    /// insufficient stock). The message is shopper-facing.
    #[error("Mutation rejected: {0}")]
    Rejected(String),

    /// The remote cart service could not be reached.
    #[error("Cart service unavailable: {0}")]
    Transport(String),

    /// No response within the mutation deadline; the affected controls
    /// have been re-enabled and the mutation treated as failed.
    #[error("Mutation timed out after {0:?}")]
    Timeout(Duration),

    /// A command referenced a line the confirmed snapshot does not
    /// contain.
    #[error("Unknown cart line: {0}")]
    UnknownLine(LineId),
}
