use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, Utc};

use innkeep_core::{ClientId, DomainError, DomainResult, Money, RoomId};
use innkeep_hotel::{ModelService, Reservation, ReservationBuilder};

use crate::command::{Command, UndoOutcome};

/// Book a room for a known guest, today or on a later day.
///
/// With an arrival offset of zero the stay starts now and occupies the room; a later
/// arrival produces an unconfirmed booking that leaves the room free.
pub struct CreateReservation {
    model: Arc<dyn ModelService>,
    client_id: ClientId,
    room_id: RoomId,
    nightly_rate: Money,
    nights: u32,
    arrival_offset_days: u32,
    label: String,
    timestamp: DateTime<Utc>,
    created: Option<Reservation>,
}

impl CreateReservation {
    pub fn new(
        model: Arc<dyn ModelService>,
        client_id: ClientId,
        room_id: RoomId,
        nightly_rate: Money,
        label: impl Into<String>,
    ) -> Self {
        Self {
            model,
            client_id,
            room_id,
            nightly_rate,
            nights: 1,
            arrival_offset_days: 0,
            label: label.into(),
            timestamp: Utc::now(),
            created: None,
        }
    }

    pub fn with_nights(mut self, nights: u32) -> Self {
        self.nights = nights.max(1);
        self
    }

    /// Days from today until arrival (0 = today).
    pub fn arriving_in(mut self, days: u32) -> Self {
        self.arrival_offset_days = days;
        self
    }

    pub fn reservation(&self) -> Option<&Reservation> {
        self.created.as_ref()
    }

    fn builder(&self) -> DomainResult<ReservationBuilder> {
        let builder = ReservationBuilder::new()
            .client(self.client_id.clone())
            .room(self.room_id.clone())
            .total(self.nightly_rate.times(self.nights))
            .nights(self.nights)
            .notes(self.label.clone());

        if self.arrival_offset_days == 0 {
            return Ok(builder.checked_in_at(self.timestamp));
        }

        let start = self
            .timestamp
            .date_naive()
            .checked_add_days(Days::new(u64::from(self.arrival_offset_days)))
            .ok_or_else(|| DomainError::validation("arrival date is out of range"))?;
        Ok(builder
            .arrival(start.and_time(NaiveTime::MIN).and_utc())
            .booked_at(self.timestamp)
            .planned_start(start)
            .confirmed(false))
    }
}

impl Command for CreateReservation {
    fn execute(&mut self) -> DomainResult<()> {
        let draft = self.builder()?.build()?;
        let reservation = self.model.create_reservation(draft)?;
        tracing::info!(
            reservation_id = %reservation.id_typed(),
            active = reservation.is_active(),
            "reservation created"
        );
        self.created = Some(reservation);
        Ok(())
    }

    fn undo(&mut self) -> DomainResult<UndoOutcome> {
        let Some(created) = &self.created else {
            return Ok(UndoOutcome::no_op("reservation was never created"));
        };
        let id = created.id_typed();
        match self.model.find_reservation(id) {
            None => Ok(UndoOutcome::no_op(format!("reservation {id} no longer exists"))),
            Some(current) if current.is_finalized() => Ok(UndoOutcome::no_op(format!(
                "reservation {id} is already closed"
            ))),
            Some(_) => {
                self.model.delete_reservation(id)?;
                self.created = None;
                Ok(UndoOutcome::Reverted)
            }
        }
    }

    fn describe(&self) -> String {
        format!("Create reservation: {}", self.label)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
