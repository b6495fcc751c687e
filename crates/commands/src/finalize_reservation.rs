use std::sync::Arc;

use chrono::{DateTime, Utc};

use innkeep_core::{DomainError, DomainResult, ReservationId};
use innkeep_hotel::{ModelService, Reservation};

use crate::command::{Command, UndoOutcome};

/// Check a guest out: stamp the departure on an open reservation and free the room.
///
/// The departure recorded is the command's own timestamp, so executing again on redo
/// writes the same record.
pub struct FinalizeReservation {
    model: Arc<dyn ModelService>,
    reservation_id: ReservationId,
    timestamp: DateTime<Utc>,
    /// Pre-checkout copy of the reservation.
    original: Option<Reservation>,
}

impl FinalizeReservation {
    pub fn new(model: Arc<dyn ModelService>, reservation_id: ReservationId) -> Self {
        Self {
            model,
            reservation_id,
            timestamp: Utc::now(),
            original: None,
        }
    }
}

impl Command for FinalizeReservation {
    fn execute(&mut self) -> DomainResult<()> {
        let current = self
            .model
            .find_reservation(&self.reservation_id)
            .ok_or_else(|| DomainError::not_found(format!("reservation {}", self.reservation_id)))?;

        self.model
            .finalize_reservation(&self.reservation_id, self.timestamp)?;
        tracing::info!(reservation_id = %self.reservation_id, "reservation finalized");
        self.original = Some(current);
        Ok(())
    }

    /// Re-open the stay only if this command closed it and the room is still free.
    fn undo(&mut self) -> DomainResult<UndoOutcome> {
        let Some(original) = &self.original else {
            return Ok(UndoOutcome::no_op("nothing was finalized"));
        };

        let still_closed = self
            .model
            .find_reservation(&self.reservation_id)
            .is_some_and(|r| r.is_finalized());
        if !still_closed {
            return Ok(UndoOutcome::no_op(format!(
                "reservation {} is not finalized",
                self.reservation_id
            )));
        }

        if original.is_active() {
            let room_id = original.room_id();
            if let Some(other) = self.model.active_reservation_for_room(room_id) {
                return Ok(UndoOutcome::no_op(format!(
                    "room {room_id} already has active reservation {}",
                    other.id_typed()
                )));
            }
            if !self.model.find_room(room_id).is_some_and(|r| r.is_available()) {
                return Ok(UndoOutcome::no_op(format!("room {room_id} is not free")));
            }
        }

        self.model.reinstate_reservation(original.clone())?;
        self.original = None;
        Ok(UndoOutcome::Reverted)
    }

    fn describe(&self) -> String {
        format!("Finalize reservation {}", self.reservation_id)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
