//! Command execution with undo/redo (application-level orchestration).
//!
//! ## Execution Flow
//!
//! ```text
//! Command
//!   ↓
//! 1. Capture "before" snapshot (if snapshot support is configured)
//!   ↓
//! 2. command.execute()
//!   ↓
//! 3. Capture "after" snapshot (if configured)
//!   ↓
//! 4. Push (command, before, after) onto the undo history, clear redo, append audit line
//! ```
//!
//! `undo` restores `before` (or calls `command.undo()` without snapshots) and moves the
//! entry to the redo history; `redo` restores `after` (or calls `command.execute()`
//! again) and moves it back. An entry whose undo was a no-op goes back without being
//! re-applied, since its effect never left the model.
//!
//! ## Histories
//!
//! Both histories are strictly LIFO. Any new `execute_command` discards the redo
//! history. The undo history and the audit log are capped at `max_history` entries
//! (0 = unlimited); the oldest entries are evicted first and can no longer be undone.
//!
//! The invoker takes `&mut self` everywhere: exactly one command is in flight. Share it
//! behind a `Mutex` when several threads dispatch commands.

use std::collections::VecDeque;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use innkeep_core::DomainError;
use innkeep_hotel::{Snapshot, SnapshotSupport};

use crate::command::{Command, UndoOutcome};

/// History cap used by [`CommandInvoker::default`].
pub const DEFAULT_MAX_HISTORY: usize = 100;

#[derive(Debug, Error)]
pub enum InvokerError {
    /// The command failed; nothing was recorded and no effect remains.
    #[error("failed to execute command `{description}`: {source}")]
    Execution {
        description: String,
        #[source]
        source: DomainError,
    },
    /// Undo failed; the entry is still on the undo history.
    #[error("failed to undo command `{description}`: {source}")]
    Undo {
        description: String,
        #[source]
        source: DomainError,
    },
    /// Redo failed; the entry is still on the redo history.
    #[error("failed to redo command `{description}`: {source}")]
    Redo {
        description: String,
        #[source]
        source: DomainError,
    },
}

impl InvokerError {
    /// `describe()` text of the command that failed.
    pub fn description(&self) -> &str {
        match self {
            InvokerError::Execution { description, .. }
            | InvokerError::Undo { description, .. }
            | InvokerError::Redo { description, .. } => description,
        }
    }

    pub fn domain_error(&self) -> &DomainError {
        match self {
            InvokerError::Execution { source, .. }
            | InvokerError::Undo { source, .. }
            | InvokerError::Redo { source, .. } => source,
        }
    }
}

struct HistoryEntry {
    entry_id: Uuid,
    command: Box<dyn Command>,
    before: Option<Snapshot>,
    after: Option<Snapshot>,
    /// Last undo left the model unchanged.
    undone_as_no_op: bool,
}

/// Runs commands and keeps their undo/redo histories.
pub struct CommandInvoker {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    history: VecDeque<String>,
    max_history: usize,
    snapshots: Option<Arc<dyn SnapshotSupport>>,
}

impl Default for CommandInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl CommandInvoker {
    /// Invoker relying on each command's logical undo.
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            history: VecDeque::new(),
            max_history,
            snapshots: None,
        }
    }

    /// Invoker that brackets every command with whole-state snapshots.
    pub fn with_snapshots(max_history: usize, snapshots: Arc<dyn SnapshotSupport>) -> Self {
        Self {
            snapshots: Some(snapshots),
            ..Self::new(max_history)
        }
    }

    pub fn has_snapshot_support(&self) -> bool {
        self.snapshots.is_some()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn execute_command(&mut self, mut command: Box<dyn Command>) -> Result<(), InvokerError> {
        let description = command.describe();
        let entry_id = Uuid::now_v7();
        let fail = |source: DomainError| InvokerError::Execution {
            description: description.clone(),
            source,
        };

        let before = match &self.snapshots {
            Some(snapshots) => Some(snapshots.capture().map_err(fail)?),
            None => None,
        };

        if let Err(err) = command.execute() {
            tracing::warn!(%entry_id, command = %description, error = %err, "command failed");
            if let (Some(snapshots), Some(before)) = (&self.snapshots, &before) {
                if let Err(restore_err) = snapshots.restore_complete(before) {
                    tracing::error!(
                        %entry_id,
                        error = %restore_err,
                        "failed to roll back partial effects of a failed command"
                    );
                }
            }
            return Err(fail(err));
        }

        let after = match &self.snapshots {
            Some(snapshots) => match snapshots.capture() {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    tracing::warn!(
                        %entry_id,
                        error = %err,
                        "post-execute capture failed; redo will re-execute"
                    );
                    None
                }
            },
            None => None,
        };

        self.undo_stack.push_back(HistoryEntry {
            entry_id,
            command,
            before,
            after,
            undone_as_no_op: false,
        });
        self.redo_stack.clear();
        self.history.push_back(description.clone());
        self.enforce_bound();

        tracing::info!(%entry_id, command = %description, "command executed");
        Ok(())
    }

    /// Undo the most recent command.
    ///
    /// `Ok(false)` when there is nothing to undo or the top command is irreversible.
    pub fn undo(&mut self) -> Result<bool, InvokerError> {
        if !self.can_undo() {
            return Ok(false);
        }
        let Some(mut entry) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        let result = match (&self.snapshots, &entry.before) {
            (Some(snapshots), Some(before)) => snapshots.restore_complete(before).map(|_| UndoOutcome::Reverted),
            _ => entry.command.undo(),
        };

        match result {
            Ok(outcome) => {
                let description = entry.command.describe();
                match &outcome {
                    UndoOutcome::Reverted => {
                        tracing::info!(entry_id = %entry.entry_id, command = %description, "command undone")
                    }
                    UndoOutcome::NoOp(reason) => tracing::info!(
                        entry_id = %entry.entry_id,
                        command = %description,
                        %reason,
                        "undo left state unchanged"
                    ),
                }
                entry.undone_as_no_op = !outcome.is_reverted();
                self.redo_stack.push(entry);
                Ok(true)
            }
            Err(source) => {
                let description = entry.command.describe();
                tracing::warn!(entry_id = %entry.entry_id, command = %description, error = %source, "undo failed");
                self.undo_stack.push_back(entry);
                Err(InvokerError::Undo { description, source })
            }
        }
    }

    /// Redo the most recently undone command.
    ///
    /// `Ok(false)` when the redo history is empty.
    pub fn redo(&mut self) -> Result<bool, InvokerError> {
        let Some(mut entry) = self.redo_stack.pop() else {
            return Ok(false);
        };

        if entry.undone_as_no_op {
            entry.undone_as_no_op = false;
            tracing::info!(
                entry_id = %entry.entry_id,
                command = %entry.command.describe(),
                "redo skipped; undo left state unchanged"
            );
            self.undo_stack.push_back(entry);
            return Ok(true);
        }

        let result = match (&self.snapshots, &entry.after) {
            (Some(snapshots), Some(after)) => snapshots.restore_complete(after),
            _ => entry.command.execute(),
        };

        let description = entry.command.describe();
        match result {
            Ok(()) => {
                tracing::info!(entry_id = %entry.entry_id, command = %description, "command redone");
                self.undo_stack.push_back(entry);
                Ok(true)
            }
            Err(source) => {
                tracing::warn!(entry_id = %entry.entry_id, command = %description, error = %source, "redo failed");
                self.redo_stack.push(entry);
                Err(InvokerError::Redo { description, source })
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack
            .back()
            .is_some_and(|entry| entry.command.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Descriptions of executed commands, oldest first.
    pub fn command_history(&self) -> Vec<String> {
        self.history.iter().cloned().collect()
    }

    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.history.clear();
    }

    pub fn next_undo_description(&self) -> Option<String> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack.back().map(|entry| entry.command.describe())
    }

    pub fn next_redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|entry| entry.command.describe())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn enforce_bound(&mut self) {
        if self.max_history == 0 {
            return;
        }
        while self.undo_stack.len() > self.max_history {
            if let Some(evicted) = self.undo_stack.pop_front() {
                tracing::debug!(
                    entry_id = %evicted.entry_id,
                    command = %evicted.command.describe(),
                    "history full; oldest command can no longer be undone"
                );
            }
        }
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }
}
