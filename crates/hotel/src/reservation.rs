use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use innkeep_core::{ClientId, DomainError, DomainResult, Entity, Money, ReservationId, RoomId};

/// A stay of one client in one room.
///
/// A reservation is *active* while it has no departure and is confirmed; only active
/// reservations occupy their room. Unconfirmed reservations are future bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    client_id: ClientId,
    room_id: RoomId,
    arrival: DateTime<Utc>,
    departure: Option<DateTime<Utc>>,
    total: Money,
    notes: String,
    confirmed: bool,
    booked_at: DateTime<Utc>,
    planned_start: NaiveDate,
    planned_end: NaiveDate,
    nights: u32,
}

impl Reservation {
    pub fn id_typed(&self) -> &ReservationId {
        &self.id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn arrival(&self) -> DateTime<Utc> {
        self.arrival
    }

    pub fn departure(&self) -> Option<DateTime<Utc>> {
        self.departure
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn booked_at(&self) -> DateTime<Utc> {
        self.booked_at
    }

    pub fn planned_start(&self) -> NaiveDate {
        self.planned_start
    }

    pub fn planned_end(&self) -> NaiveDate {
        self.planned_end
    }

    pub fn nights(&self) -> u32 {
        self.nights
    }

    pub fn is_active(&self) -> bool {
        self.departure.is_none() && self.confirmed
    }

    pub fn is_finalized(&self) -> bool {
        self.departure.is_some()
    }

    /// Close the stay. Fails if a departure is already recorded.
    pub fn finalize(&mut self, departure: DateTime<Utc>) -> DomainResult<()> {
        if let Some(existing) = self.departure {
            return Err(DomainError::conflict(format!(
                "reservation {} already finalized at {existing}",
                self.id
            )));
        }
        self.departure = Some(departure);
        Ok(())
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A validated reservation that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    client_id: ClientId,
    room_id: RoomId,
    arrival: DateTime<Utc>,
    departure: Option<DateTime<Utc>>,
    total: Money,
    notes: String,
    confirmed: bool,
    booked_at: DateTime<Utc>,
    planned_start: NaiveDate,
    planned_end: NaiveDate,
    nights: u32,
}

impl ReservationDraft {
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_active(&self) -> bool {
        self.departure.is_none() && self.confirmed
    }

    /// Turn the draft into a stored record.
    pub fn assign(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            client_id: self.client_id,
            room_id: self.room_id,
            arrival: self.arrival,
            departure: self.departure,
            total: self.total,
            notes: self.notes,
            confirmed: self.confirmed,
            booked_at: self.booked_at,
            planned_start: self.planned_start,
            planned_end: self.planned_end,
            nights: self.nights,
        }
    }
}

/// Step-by-step construction of a [`ReservationDraft`].
///
/// Defaults: arrival now, no departure, zero total, no notes, confirmed, one night
/// starting today.
#[derive(Debug, Clone)]
pub struct ReservationBuilder {
    client_id: Option<ClientId>,
    room_id: Option<RoomId>,
    arrival: DateTime<Utc>,
    departure: Option<DateTime<Utc>>,
    total: Money,
    notes: String,
    confirmed: bool,
    booked_at: DateTime<Utc>,
    planned_start: NaiveDate,
    planned_end: Option<NaiveDate>,
    nights: u32,
}

impl Default for ReservationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationBuilder {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            client_id: None,
            room_id: None,
            arrival: now,
            departure: None,
            total: Money::ZERO,
            notes: String::new(),
            confirmed: true,
            booked_at: now,
            planned_start: now.date_naive(),
            planned_end: None,
            nights: 1,
        }
    }

    /// Preset for a guest moving in right now.
    pub fn for_check_in(client_id: ClientId, room_id: RoomId, total: Money) -> Self {
        Self::new()
            .client(client_id)
            .room(room_id)
            .total(total)
            .immediate_check_in()
    }

    /// Preset for a booking that starts on a later day.
    pub fn for_future_stay(
        client_id: ClientId,
        room_id: RoomId,
        arrival: DateTime<Utc>,
        total: Money,
    ) -> Self {
        Self::new()
            .client(client_id)
            .room(room_id)
            .arrival(arrival)
            .planned_start(arrival.date_naive())
            .total(total)
            .confirmed(true)
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn room(mut self, room_id: RoomId) -> Self {
        self.room_id = Some(room_id);
        self
    }

    pub fn arrival(mut self, arrival: DateTime<Utc>) -> Self {
        self.arrival = arrival;
        self
    }

    pub fn departure(mut self, departure: Option<DateTime<Utc>>) -> Self {
        self.departure = departure;
        self
    }

    pub fn total(mut self, total: Money) -> Self {
        self.total = total;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    pub fn booked_at(mut self, booked_at: DateTime<Utc>) -> Self {
        self.booked_at = booked_at;
        self
    }

    pub fn planned_start(mut self, start: NaiveDate) -> Self {
        self.planned_start = start;
        self
    }

    pub fn planned_end(mut self, end: NaiveDate) -> Self {
        self.planned_end = Some(end);
        self
    }

    pub fn nights(mut self, nights: u32) -> Self {
        self.nights = nights;
        self
    }

    /// Arrival now, confirmed, open-ended.
    pub fn immediate_check_in(self) -> Self {
        self.checked_in_at(Utc::now())
    }

    /// Guest moved in at `at`: arrival, booking time and planned start all pinned to it.
    pub fn checked_in_at(mut self, at: DateTime<Utc>) -> Self {
        self.arrival = at;
        self.booked_at = at;
        self.planned_start = at.date_naive();
        self.departure = None;
        self.confirmed = true;
        self
    }

    /// Unconfirmed booking; does not occupy the room.
    pub fn pending(mut self) -> Self {
        self.confirmed = false;
        self.notes = "Pending reservation".to_string();
        self
    }

    pub fn build(self) -> DomainResult<ReservationDraft> {
        let client_id = self
            .client_id
            .ok_or_else(|| DomainError::validation("client id is required"))?;
        let room_id = self
            .room_id
            .ok_or_else(|| DomainError::validation("room id is required"))?;
        if self.total.is_negative() {
            return Err(DomainError::validation("total cannot be negative"));
        }
        if self.nights == 0 {
            return Err(DomainError::validation("a stay lasts at least one night"));
        }

        let planned_end = match self.planned_end {
            Some(end) => end,
            None => self
                .planned_start
                .checked_add_days(Days::new(u64::from(self.nights)))
                .ok_or_else(|| DomainError::validation("planned end is out of range"))?,
        };
        if planned_end < self.planned_start {
            return Err(DomainError::validation(
                "planned end cannot precede planned start",
            ));
        }

        Ok(ReservationDraft {
            client_id,
            room_id,
            arrival: self.arrival,
            departure: self.departure,
            total: self.total,
            notes: self.notes,
            confirmed: self.confirmed,
            booked_at: self.booked_at,
            planned_start: self.planned_start,
            planned_end,
            nights: self.nights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientId {
        ClientId::from_sequence(1)
    }

    fn room() -> RoomId {
        RoomId::from_sequence(1)
    }

    #[test]
    fn check_in_preset_builds_an_active_draft() {
        let draft = ReservationBuilder::for_check_in(client(), room(), Money::from_major(50))
            .build()
            .unwrap();
        assert!(draft.is_active());
        assert_eq!(draft.total(), Money::from_major(50));

        let reservation = draft.assign(ReservationId::from_sequence(1));
        assert_eq!(reservation.nights(), 1);
        assert_eq!(
            reservation.planned_end(),
            reservation.planned_start().checked_add_days(Days::new(1)).unwrap()
        );
    }

    #[test]
    fn missing_client_is_a_validation_error() {
        let err = ReservationBuilder::new().room(room()).build().unwrap_err();
        assert_eq!(err, DomainError::validation("client id is required"));
    }

    #[test]
    fn negative_total_is_rejected() {
        let err = ReservationBuilder::new()
            .client(client())
            .room(room())
            .total(Money::from_cents(-1))
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn pending_reservation_is_not_active() {
        let draft = ReservationBuilder::new()
            .client(client())
            .room(room())
            .pending()
            .build()
            .unwrap();
        assert!(!draft.is_active());
    }

    #[test]
    fn finalize_twice_conflicts() {
        let mut reservation = ReservationBuilder::for_check_in(client(), room(), Money::ZERO)
            .build()
            .unwrap()
            .assign(ReservationId::from_sequence(3));
        let at = Utc::now();
        reservation.finalize(at).unwrap();
        assert!(!reservation.is_active());
        assert!(matches!(reservation.finalize(at), Err(DomainError::Conflict(_))));
        assert_eq!(reservation.departure(), Some(at));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: a stay planned without an explicit end lasts exactly `nights` days.
            #[test]
            fn planned_end_follows_nights(nights in 1u32..400, offset in 0u64..365) {
                let start = Utc::now()
                    .date_naive()
                    .checked_add_days(Days::new(offset))
                    .unwrap();
                let reservation = ReservationBuilder::new()
                    .client(client())
                    .room(room())
                    .planned_start(start)
                    .nights(nights)
                    .build()
                    .unwrap()
                    .assign(ReservationId::from_sequence(1));

                prop_assert_eq!(
                    (reservation.planned_end() - reservation.planned_start()).num_days(),
                    i64::from(nights)
                );
            }
        }
    }
}
