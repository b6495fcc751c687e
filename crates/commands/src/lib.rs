//! Reversible front-desk operations and the invoker that runs them.
//!
//! A [`Command`] is one user-level operation with a compensating `undo`. The
//! [`CommandInvoker`] runs commands, keeps bounded undo/redo histories and, when the
//! model service offers [`SnapshotSupport`](innkeep_hotel::SnapshotSupport), rolls back
//! by restoring whole-state snapshots instead of calling the command's own `undo`.

pub mod cancel_reservation;
pub mod check_in;
pub mod command;
pub mod create_reservation;
pub mod finalize_reservation;
pub mod invoker;
pub mod quick_check_in;

pub use cancel_reservation::CancelReservation;
pub use check_in::CheckIn;
pub use command::{Command, UndoOutcome};
pub use create_reservation::CreateReservation;
pub use finalize_reservation::FinalizeReservation;
pub use invoker::{CommandInvoker, InvokerError, DEFAULT_MAX_HISTORY};
pub use quick_check_in::QuickAdminCheckIn;
