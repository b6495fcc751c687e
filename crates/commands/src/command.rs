use chrono::{DateTime, Utc};

use innkeep_core::DomainResult;

/// One reversible user-level operation (command abstraction).
///
/// Commands represent **intent** executed against a model service. Unlike events they
/// are kept after running: the invoker holds them in its histories so they can be
/// undone and redone.
///
/// ## Contract
///
/// - `execute` may be called again after `undo` (redo without snapshots), so it must
///   recompute its effects from current state instead of assuming earlier results.
/// - `execute` either applies fully or fails with no visible effect; a command doing
///   several writes compensates the earlier ones when a later one fails.
/// - `undo` reverses the most recent `execute`. When there is nothing to reverse, or
///   reversing would break an invariant (double booking), it returns
///   [`UndoOutcome::NoOp`] instead of an error.
///
/// Commands are `Send` so an invoker can live behind a `Mutex` shared across threads.
pub trait Command: Send {
    fn execute(&mut self) -> DomainResult<()>;

    fn undo(&mut self) -> DomainResult<UndoOutcome>;

    /// Human-readable label; stable across calls.
    fn describe(&self) -> String;

    fn can_undo(&self) -> bool {
        true
    }

    /// Construction time.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Result of a logical undo that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The effect of the last `execute` was reversed.
    Reverted,
    /// Nothing was changed; the reason says why.
    NoOp(String),
}

impl UndoOutcome {
    pub fn no_op(reason: impl Into<String>) -> Self {
        Self::NoOp(reason.into())
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::Reverted)
    }
}
