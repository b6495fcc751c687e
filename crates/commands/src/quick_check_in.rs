use std::sync::Arc;

use chrono::{DateTime, Utc};

use innkeep_core::DomainResult;
use innkeep_hotel::{Client, ModelService, ReservationBuilder, Room};

use crate::check_in::{open_stay, CreatedStay};
use crate::command::{Command, UndoOutcome};

/// Admin shortcut: check an already-resolved guest into an already-resolved room.
///
/// The guest record is written first when the model service does not know it.
pub struct QuickAdminCheckIn {
    model: Arc<dyn ModelService>,
    client: Client,
    room: Room,
    nights: u32,
    timestamp: DateTime<Utc>,
    stay: Option<CreatedStay>,
}

impl QuickAdminCheckIn {
    pub fn new(model: Arc<dyn ModelService>, client: Client, room: Room) -> Self {
        Self {
            model,
            client,
            room,
            nights: 1,
            timestamp: Utc::now(),
            stay: None,
        }
    }

    pub fn with_nights(mut self, nights: u32) -> Self {
        self.nights = nights.max(1);
        self
    }
}

impl Command for QuickAdminCheckIn {
    fn execute(&mut self) -> DomainResult<()> {
        let model = self.model.as_ref();
        let registered = model.find_client(self.client.id_typed()).is_none();
        if registered {
            model.restore_client(self.client.clone())?;
        }

        let builder = ReservationBuilder::new()
            .room(self.room.id_typed().clone())
            .total(self.room.rate().times(self.nights))
            .nights(self.nights)
            .checked_in_at(self.timestamp);

        let stay = open_stay(model, &self.client, registered, builder)?;
        tracing::info!(
            reservation_id = %stay.reservation.id_typed(),
            room = %self.room.number(),
            "quick check-in"
        );
        self.stay = Some(stay);
        Ok(())
    }

    fn undo(&mut self) -> DomainResult<UndoOutcome> {
        let Some(stay) = &self.stay else {
            return Ok(UndoOutcome::no_op("quick check-in was never executed"));
        };
        let outcome = stay.revert(self.model.as_ref())?;
        if outcome.is_reverted() {
            self.stay = None;
        }
        Ok(outcome)
    }

    fn describe(&self) -> String {
        format!("Quick check-in room {}", self.room.number())
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
