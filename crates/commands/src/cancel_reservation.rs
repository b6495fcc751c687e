use std::sync::Arc;

use chrono::{DateTime, Utc};

use innkeep_core::{DomainError, DomainResult};
use innkeep_hotel::{Client, ModelService, Reservation};

use crate::command::{Command, UndoOutcome};

/// Cancel a guest's stay: close the active reservation and drop the guest record.
///
/// Every `execute` looks the guest and reservation up again, so a redo after undo
/// repeats both steps against current state.
pub struct CancelReservation {
    model: Arc<dyn ModelService>,
    document: String,
    timestamp: DateTime<Utc>,
    removed_client: Option<Client>,
    /// Pre-cancellation copy of the reservation.
    cancelled: Option<Reservation>,
}

impl CancelReservation {
    pub fn new(model: Arc<dyn ModelService>, document: impl Into<String>) -> Self {
        Self {
            model,
            document: document.into(),
            timestamp: Utc::now(),
            removed_client: None,
            cancelled: None,
        }
    }

    fn forget_restored_client(&self, client: &Client) {
        if let Err(err) = self.model.remove_client(client.id_typed()) {
            tracing::error!(
                client_id = %client.id_typed(),
                error = %err,
                "failed to remove guest restored by an aborted undo"
            );
        }
    }
}

impl Command for CancelReservation {
    fn execute(&mut self) -> DomainResult<()> {
        let model = self.model.as_ref();
        let client = model
            .find_client_by_document(&self.document)
            .ok_or_else(|| DomainError::not_found(format!("client with document {}", self.document)))?;
        let active = model
            .active_reservation_for_document(&self.document)
            .ok_or_else(|| {
                DomainError::not_found(format!("active reservation for document {}", self.document))
            })?;

        model.finalize_reservation(active.id_typed(), self.timestamp)?;
        if let Err(err) = model.remove_client(client.id_typed()) {
            // Put the stay back so the failed cancellation leaves nothing behind.
            if let Err(cleanup) = model.reinstate_reservation(active.clone()) {
                tracing::error!(
                    reservation_id = %active.id_typed(),
                    error = %cleanup,
                    "failed to reopen reservation after aborted cancellation"
                );
            }
            return Err(err);
        }

        tracing::info!(
            reservation_id = %active.id_typed(),
            client_id = %client.id_typed(),
            "reservation cancelled"
        );
        self.removed_client = Some(client);
        self.cancelled = Some(active);
        Ok(())
    }

    /// Restore the guest and reopen the stay; fails if the room was taken meanwhile.
    fn undo(&mut self) -> DomainResult<UndoOutcome> {
        let (Some(client), Some(reservation)) = (&self.removed_client, &self.cancelled) else {
            return Ok(UndoOutcome::no_op("nothing was cancelled"));
        };
        let model = self.model.as_ref();
        let room_id = reservation.room_id();

        model.restore_client(client.clone())?;

        let room_free = model.find_room(room_id).is_some_and(|r| r.is_available())
            && model.active_reservation_for_room(room_id).is_none();
        if !room_free {
            self.forget_restored_client(client);
            return Err(DomainError::unavailable(format!(
                "room {room_id} is no longer available; cancellation kept"
            )));
        }

        if let Err(err) = model.reinstate_reservation(reservation.clone()) {
            self.forget_restored_client(client);
            return Err(err);
        }

        self.removed_client = None;
        self.cancelled = None;
        Ok(UndoOutcome::Reverted)
    }

    fn describe(&self) -> String {
        format!("Cancel reservation for client with document {}", self.document)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
