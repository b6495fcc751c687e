//! Walk-in check-in: register (or reuse) the guest and open a stay in a room.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use innkeep_core::{ClientId, DomainError, DomainResult};
use innkeep_hotel::{Client, ClientDetails, ModelService, Reservation, ReservationBuilder};

use crate::command::{Command, UndoOutcome};

/// What a check-in left behind, enough to take it back without a snapshot.
#[derive(Debug, Clone)]
pub(crate) struct CreatedStay {
    pub(crate) reservation: Reservation,
    /// Set only when the command itself registered the guest.
    pub(crate) registered_client: Option<ClientId>,
}

impl CreatedStay {
    /// Delete the stay and, if this command registered the guest, the guest record.
    pub(crate) fn revert(&self, model: &dyn ModelService) -> DomainResult<UndoOutcome> {
        let id = self.reservation.id_typed();
        let Some(current) = model.find_reservation(id) else {
            return Ok(UndoOutcome::no_op(format!("reservation {id} no longer exists")));
        };
        if current.is_finalized() {
            return Ok(UndoOutcome::no_op(format!("reservation {id} is already closed")));
        }

        model.delete_reservation(id)?;
        if let Some(client_id) = &self.registered_client {
            // Put the stay back so a retried undo starts from the same state.
            if let Err(err) = model.remove_client(client_id) {
                if let Err(reinstate) = model.reinstate_reservation(current) {
                    tracing::error!(
                        reservation_id = %id,
                        error = %reinstate,
                        "failed to put stay back after guest removal was refused"
                    );
                }
                return Err(err);
            }
        }
        Ok(UndoOutcome::Reverted)
    }
}

/// Open a stay, removing a guest registered for it if the reservation write fails.
pub(crate) fn open_stay(
    model: &dyn ModelService,
    client: &Client,
    registered: bool,
    builder: ReservationBuilder,
) -> DomainResult<CreatedStay> {
    let outcome = builder
        .client(client.id_typed().clone())
        .build()
        .and_then(|draft| model.create_reservation(draft));

    match outcome {
        Ok(reservation) => Ok(CreatedStay {
            reservation,
            registered_client: registered.then(|| client.id_typed().clone()),
        }),
        Err(err) => {
            if registered {
                if let Err(cleanup) = model.remove_client(client.id_typed()) {
                    tracing::error!(
                        client_id = %client.id_typed(),
                        error = %cleanup,
                        "failed to remove guest after aborted check-in"
                    );
                }
            }
            Err(err)
        }
    }
}

/// Check a guest into a room picked by number.
///
/// The guest is looked up by document first so a retried check-in does not create a
/// second record. Total is the room's nightly rate times the number of nights.
pub struct CheckIn {
    model: Arc<dyn ModelService>,
    guest: ClientDetails,
    room_number: String,
    nights: u32,
    timestamp: DateTime<Utc>,
    stay: Option<CreatedStay>,
}

impl CheckIn {
    pub fn new(
        model: Arc<dyn ModelService>,
        guest: ClientDetails,
        room_number: impl Into<String>,
    ) -> Self {
        Self {
            model,
            guest,
            room_number: room_number.into(),
            nights: 1,
            timestamp: Utc::now(),
            stay: None,
        }
    }

    pub fn with_nights(mut self, nights: u32) -> Self {
        self.nights = nights.max(1);
        self
    }

    /// Reservation opened by the last successful `execute`.
    pub fn reservation(&self) -> Option<&Reservation> {
        self.stay.as_ref().map(|s| &s.reservation)
    }
}

impl Command for CheckIn {
    fn execute(&mut self) -> DomainResult<()> {
        let model = self.model.as_ref();
        let room = model.find_room_by_number(&self.room_number).ok_or_else(|| {
            DomainError::not_found(format!("room #{}", self.room_number))
        })?;

        let (client, registered) = match model.find_client_by_document(&self.guest.document) {
            Some(existing) => (existing, false),
            None => (model.register_client(self.guest.clone())?, true),
        };

        let builder = ReservationBuilder::new()
            .room(room.id_typed().clone())
            .total(room.rate().times(self.nights))
            .nights(self.nights)
            .checked_in_at(self.timestamp);

        let stay = open_stay(model, &client, registered, builder)?;
        tracing::info!(
            reservation_id = %stay.reservation.id_typed(),
            client_id = %client.id_typed(),
            room = %room.number(),
            "guest checked in"
        );
        self.stay = Some(stay);
        Ok(())
    }

    fn undo(&mut self) -> DomainResult<UndoOutcome> {
        let Some(stay) = &self.stay else {
            return Ok(UndoOutcome::no_op("check-in was never executed"));
        };
        let outcome = stay.revert(self.model.as_ref())?;
        if outcome.is_reverted() {
            self.stay = None;
        }
        Ok(outcome)
    }

    fn describe(&self) -> String {
        format!(
            "Check-in of {} {} in room #{}",
            self.guest.first_name, self.guest.last_name, self.room_number
        )
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
