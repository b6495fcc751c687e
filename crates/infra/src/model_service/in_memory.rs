use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use innkeep_core::{position_of, ClientId, DomainError, DomainResult, ReservationId, RoomId};
use innkeep_hotel::{
    Client, ClientDetails, HotelState, ModelService, OccupiedRoom, Reservation,
    ReservationDraft, Room, Snapshot, SnapshotSupport,
};

use crate::availability::AvailabilityCache;

/// In-memory front-desk store.
///
/// The whole aggregate sits behind one `RwLock`; every mutation holds the write lock
/// while it updates room flags, reservations and the availability cache together.
/// Lock order is always state, then cache.
#[derive(Debug)]
pub struct InMemoryModelService {
    state: RwLock<HotelState>,
    cache: Arc<AvailabilityCache>,
}

impl InMemoryModelService {
    /// Empty hotel: no rooms, no guests.
    pub fn new(cache: Arc<AvailabilityCache>) -> Self {
        Self::with_rooms(cache, Vec::new())
    }

    pub fn with_rooms(cache: Arc<AvailabilityCache>, rooms: Vec<Room>) -> Self {
        cache.initialize(&rooms);
        Self {
            state: RwLock::new(HotelState::with_rooms(rooms)),
            cache,
        }
    }

    /// Seeded with [`Room::catalog`].
    pub fn with_catalog(cache: Arc<AvailabilityCache>) -> Self {
        Self::with_rooms(cache, Room::catalog())
    }

    pub fn availability(&self) -> &Arc<AvailabilityCache> {
        &self.cache
    }

    /// Check aggregate invariants and that the cache agrees with every room flag.
    pub fn verify_consistency(&self) -> DomainResult<()> {
        let state = self.read()?;
        state.check_invariants()?;
        for room in &state.rooms {
            if self.cache.is_available(room.id_typed()) != room.is_available() {
                return Err(DomainError::invariant(format!(
                    "availability cache disagrees with room {}",
                    room.id_typed()
                )));
            }
        }
        Ok(())
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, HotelState>> {
        self.state
            .read()
            .map_err(|_| DomainError::storage("model state lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HotelState>> {
        self.state
            .write()
            .map_err(|_| DomainError::storage("model state lock poisoned"))
    }

    /// Mark a room occupied in the aggregate and the cache, or fail with no change.
    fn occupy(&self, state: &mut HotelState, room_id: &RoomId) -> DomainResult<()> {
        let room = state
            .room_mut(room_id)
            .ok_or_else(|| DomainError::not_found(format!("room {room_id}")))?;
        if room.is_occupied() || !self.cache.reserve(room_id) {
            return Err(DomainError::unavailable(format!(
                "room {} is not available",
                room.number()
            )));
        }
        room.set_occupied(true);
        Ok(())
    }

    fn vacate(&self, state: &mut HotelState, room_id: &RoomId) {
        if let Some(room) = state.room_mut(room_id) {
            room.set_occupied(false);
        }
        self.cache.release(room_id);
    }

    fn ensure_unique_contact(
        state: &HotelState,
        document: &str,
        phone: &str,
        except: Option<&ClientId>,
    ) -> DomainResult<()> {
        let others = || {
            state
                .clients
                .iter()
                .filter(move |c| Some(c.id_typed()) != except)
        };
        if others().any(|c| c.document() == document) {
            return Err(DomainError::conflict(format!(
                "a client with document {document} already exists"
            )));
        }
        if !phone.trim().is_empty() && others().any(|c| c.phone() == phone) {
            return Err(DomainError::conflict(format!(
                "a client with phone {phone} already exists"
            )));
        }
        Ok(())
    }
}

impl ModelService for InMemoryModelService {
    fn register_client(&self, details: ClientDetails) -> DomainResult<Client> {
        details.validate()?;
        let mut state = self.write()?;
        Self::ensure_unique_contact(&state, &details.document, &details.phone, None)?;

        let client = Client::new(state.next_client_id(), details);
        state.clients.push(client.clone());
        tracing::info!(client_id = %client.id_typed(), "client registered");
        Ok(client)
    }

    fn restore_client(&self, client: Client) -> DomainResult<()> {
        let mut state = self.write()?;
        if state.client(client.id_typed()).is_some() {
            return Err(DomainError::conflict(format!(
                "client {} already exists",
                client.id_typed()
            )));
        }
        Self::ensure_unique_contact(&state, client.document(), client.phone(), None)?;

        // Ids are allocated in ascending order, so id order is insertion order.
        let idx = state
            .clients
            .partition_point(|c| c.id_typed().sequence() < client.id_typed().sequence());
        tracing::debug!(client_id = %client.id_typed(), "client restored");
        state.clients.insert(idx, client);
        Ok(())
    }

    fn remove_client(&self, id: &ClientId) -> DomainResult<()> {
        let mut state = self.write()?;
        let idx = position_of(&state.clients, id)
            .ok_or_else(|| DomainError::not_found(format!("client {id}")))?;
        if state
            .reservations
            .iter()
            .any(|r| r.is_active() && r.client_id() == id)
        {
            return Err(DomainError::conflict(format!(
                "client {id} still has an active reservation"
            )));
        }
        state.clients.remove(idx);
        tracing::debug!(client_id = %id, "client removed");
        Ok(())
    }

    fn update_client(&self, client: Client) -> DomainResult<()> {
        client.details().validate()?;
        let mut state = self.write()?;
        let idx = position_of(&state.clients, client.id_typed())
            .ok_or_else(|| DomainError::not_found(format!("client {}", client.id_typed())))?;
        Self::ensure_unique_contact(
            &state,
            client.document(),
            client.phone(),
            Some(client.id_typed()),
        )?;
        state.clients[idx] = client;
        Ok(())
    }

    fn find_client(&self, id: &ClientId) -> Option<Client> {
        self.read().ok()?.client(id).cloned()
    }

    fn find_client_by_document(&self, document: &str) -> Option<Client> {
        self.read().ok()?.client_by_document(document).cloned()
    }

    fn list_clients(&self) -> Vec<Client> {
        self.read().map(|s| s.clients.clone()).unwrap_or_default()
    }

    fn document_exists(&self, document: &str) -> bool {
        self.find_client_by_document(document).is_some()
    }

    fn phone_exists(&self, phone: &str) -> bool {
        self.read()
            .map(|s| s.clients.iter().any(|c| c.phone() == phone))
            .unwrap_or(false)
    }

    fn list_rooms(&self) -> Vec<Room> {
        self.read().map(|s| s.rooms.clone()).unwrap_or_default()
    }

    fn available_rooms(&self) -> Vec<Room> {
        self.list_rooms()
            .into_iter()
            .filter(Room::is_available)
            .collect()
    }

    fn occupied_rooms(&self) -> Vec<Room> {
        self.list_rooms()
            .into_iter()
            .filter(Room::is_occupied)
            .collect()
    }

    fn occupied_rooms_with_guests(&self) -> Vec<OccupiedRoom> {
        self.read()
            .map(|s| s.occupied_rooms_with_guests())
            .unwrap_or_default()
    }

    fn find_room(&self, id: &RoomId) -> Option<Room> {
        self.read().ok()?.room(id).cloned()
    }

    fn find_room_by_number(&self, number: &str) -> Option<Room> {
        self.read().ok()?.room_by_number(number).cloned()
    }

    /// Align a room flag with its reservations.
    ///
    /// Occupying requires an active reservation for the room; freeing requires none.
    fn set_room_occupied(&self, id: &RoomId, occupied: bool) -> DomainResult<()> {
        let mut state = self.write()?;
        let room = state
            .room(id)
            .ok_or_else(|| DomainError::not_found(format!("room {id}")))?;
        let held = state.active_reservations_for_room(id).next().is_some();
        if held != occupied {
            return Err(DomainError::conflict(format!(
                "room {} cannot be marked {} while active reservation present is {held}",
                room.number(),
                if occupied { "occupied" } else { "free" }
            )));
        }

        if let Some(room) = state.room_mut(id) {
            room.set_occupied(occupied);
        }
        if occupied {
            self.cache.reserve(id);
        } else {
            self.cache.release(id);
        }
        Ok(())
    }

    fn create_reservation(&self, draft: ReservationDraft) -> DomainResult<Reservation> {
        let mut state = self.write()?;
        if state.client(draft.client_id()).is_none() {
            return Err(DomainError::not_found(format!("client {}", draft.client_id())));
        }
        if state.room(draft.room_id()).is_none() {
            return Err(DomainError::not_found(format!("room {}", draft.room_id())));
        }
        if draft.is_active() {
            self.occupy(&mut state, draft.room_id())?;
        }

        let reservation = draft.assign(state.next_reservation_id());
        state.reservations.push(reservation.clone());
        tracing::info!(
            reservation_id = %reservation.id_typed(),
            room_id = %reservation.room_id(),
            "reservation stored"
        );
        Ok(reservation)
    }

    fn finalize_reservation(
        &self,
        id: &ReservationId,
        departure: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let mut state = self.write()?;
        let reservation = state
            .reservation_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("reservation {id}")))?;
        let was_active = reservation.is_active();
        reservation.finalize(departure)?;
        let finalized = reservation.clone();

        if was_active {
            self.vacate(&mut state, finalized.room_id());
        }
        Ok(finalized)
    }

    fn reinstate_reservation(&self, reservation: Reservation) -> DomainResult<()> {
        let mut state = self.write()?;
        // Closed or pending records may outlive their guest.
        if reservation.is_active() && state.client(reservation.client_id()).is_none() {
            return Err(DomainError::not_found(format!(
                "client {}",
                reservation.client_id()
            )));
        }
        if state.room(reservation.room_id()).is_none() {
            return Err(DomainError::not_found(format!("room {}", reservation.room_id())));
        }

        let id = reservation.id_typed().clone();
        let held = state
            .reservation(&id)
            .filter(|r| r.is_active())
            .map(|r| r.room_id().clone());
        let wanted = reservation
            .is_active()
            .then(|| reservation.room_id().clone());

        if held != wanted {
            if let Some(room_id) = &wanted {
                self.occupy(&mut state, room_id)?;
            }
            if let Some(room_id) = &held {
                self.vacate(&mut state, room_id);
            }
        }

        match position_of(&state.reservations, &id) {
            Some(idx) => state.reservations[idx] = reservation,
            None => {
                let idx = state
                    .reservations
                    .partition_point(|r| r.id_typed().sequence() < id.sequence());
                state.reservations.insert(idx, reservation);
            }
        }
        tracing::debug!(reservation_id = %id, "reservation reinstated");
        Ok(())
    }

    fn delete_reservation(&self, id: &ReservationId) -> DomainResult<()> {
        let mut state = self.write()?;
        let idx = position_of(&state.reservations, id)
            .ok_or_else(|| DomainError::not_found(format!("reservation {id}")))?;
        let removed = state.reservations.remove(idx);
        if removed.is_active() {
            self.vacate(&mut state, removed.room_id());
        }
        tracing::debug!(reservation_id = %id, "reservation deleted");
        Ok(())
    }

    fn find_reservation(&self, id: &ReservationId) -> Option<Reservation> {
        self.read().ok()?.reservation(id).cloned()
    }

    fn active_reservation_for_document(&self, document: &str) -> Option<Reservation> {
        let state = self.read().ok()?;
        let client_id = state.client_by_document(document)?.id_typed();
        state
            .reservations
            .iter()
            .find(|r| r.is_active() && r.client_id() == client_id)
            .cloned()
    }

    fn active_reservation_for_room(&self, room_id: &RoomId) -> Option<Reservation> {
        self.read()
            .ok()?
            .active_reservations_for_room(room_id)
            .next()
            .cloned()
    }

    fn list_reservations(&self) -> Vec<Reservation> {
        self.read()
            .map(|s| s.reservations.clone())
            .unwrap_or_default()
    }

    fn recent_reservations(&self, limit: usize) -> Vec<Reservation> {
        let mut reservations = self.list_reservations();
        reservations.sort_by(|a, b| b.booked_at().cmp(&a.booked_at()));
        reservations.truncate(limit);
        reservations
    }

    fn health_check(&self) -> bool {
        self.state.read().is_ok()
    }
}

impl SnapshotSupport for InMemoryModelService {
    fn capture(&self) -> DomainResult<Snapshot> {
        let state = self.read()?;
        Ok(Snapshot::capture(&state))
    }

    fn restore_complete(&self, snapshot: &Snapshot) -> DomainResult<()> {
        let restored = snapshot.state();
        restored.check_invariants()?;

        let mut state = self.write()?;
        *state = restored;
        // Still under the state lock: no reader sees the cache lag behind.
        self.cache.initialize(&state.rooms);
        tracing::debug!(taken_at = %snapshot.taken_at(), "state restored from snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_core::Money;
    use innkeep_hotel::ReservationBuilder;

    fn service() -> InMemoryModelService {
        InMemoryModelService::with_catalog(Arc::new(AvailabilityCache::new()))
    }

    fn ana() -> ClientDetails {
        ClientDetails::new("Ana", "Mora", "0912345678", "555-0101")
    }

    fn check_in(svc: &InMemoryModelService, client: &Client, room: u32) -> DomainResult<Reservation> {
        let draft = ReservationBuilder::for_check_in(
            client.id_typed().clone(),
            RoomId::from_sequence(room),
            Money::from_major(50),
        )
        .build()?;
        svc.create_reservation(draft)
    }

    #[test]
    fn register_assigns_sequential_ids() {
        let svc = service();
        let a = svc.register_client(ana()).unwrap();
        let b = svc
            .register_client(ClientDetails::new("Luis", "Vera", "0911111111", "555-0202"))
            .unwrap();
        assert_eq!(a.id_typed().as_str(), "CLI-0001");
        assert_eq!(b.id_typed().as_str(), "CLI-0002");
        assert!(svc.document_exists("0912345678"));
        assert!(svc.phone_exists("555-0202"));
    }

    #[test]
    fn register_rejects_duplicates_and_blank_document() {
        let svc = service();
        svc.register_client(ana()).unwrap();

        let dup_doc = svc.register_client(ClientDetails::new("X", "Y", "0912345678", "555-9999"));
        assert!(matches!(dup_doc, Err(DomainError::Conflict(_))));

        let dup_phone = svc.register_client(ClientDetails::new("X", "Y", "0000000001", "555-0101"));
        assert!(matches!(dup_phone, Err(DomainError::Conflict(_))));

        let blank = svc.register_client(ClientDetails::new("X", "Y", "  ", "555-7777"));
        assert!(matches!(blank, Err(DomainError::Validation(_))));
        assert_eq!(svc.list_clients().len(), 1);
    }

    #[test]
    fn occupied_listing_follows_check_in_and_checkout() {
        let svc = service();
        assert!(svc.occupied_rooms_with_guests().is_empty());

        let client = svc.register_client(ana()).unwrap();
        let reservation = check_in(&svc, &client, 7).unwrap();

        let occupied = svc.occupied_rooms_with_guests();
        assert_eq!(occupied.len(), 1);
        let entry = &occupied[0];
        assert_eq!(entry.room_number, "007");
        assert_eq!(entry.kind, innkeep_hotel::RoomKind::Double);
        assert_eq!(entry.rate, Money::from_major(80));
        assert_eq!(&entry.reservation_id, reservation.id_typed());
        assert_eq!(entry.guest_name(), "Ana Mora");
        assert_eq!(entry.guest_document, "0912345678");

        svc.finalize_reservation(reservation.id_typed(), Utc::now())
            .unwrap();
        assert!(svc.occupied_rooms_with_guests().is_empty());
    }

    #[test]
    fn active_reservation_occupies_room_and_cache() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        let reservation = check_in(&svc, &client, 7).unwrap();

        let room_id = RoomId::from_sequence(7);
        assert_eq!(reservation.id_typed().as_str(), "RES-0001");
        assert!(svc.find_room(&room_id).unwrap().is_occupied());
        assert!(!svc.availability().is_available(&room_id));
        assert_eq!(
            svc.active_reservation_for_document("0912345678").map(|r| r.id_typed().clone()),
            Some(reservation.id_typed().clone())
        );
        svc.verify_consistency().unwrap();
    }

    #[test]
    fn occupied_room_rejects_second_check_in_without_change() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        check_in(&svc, &client, 1).unwrap();
        let before = svc.capture().unwrap();

        let err = check_in(&svc, &client, 1).unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
        assert_eq!(svc.capture().unwrap().state(), before.state());
    }

    #[test]
    fn pending_reservation_leaves_room_free() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        let draft = ReservationBuilder::for_check_in(
            client.id_typed().clone(),
            RoomId::from_sequence(2),
            Money::from_major(120),
        )
        .pending()
        .build()
        .unwrap();
        let reservation = svc.create_reservation(draft).unwrap();

        assert!(!reservation.is_active());
        assert!(svc.availability().is_available(&RoomId::from_sequence(2)));
        svc.verify_consistency().unwrap();
    }

    #[test]
    fn finalize_frees_room_once() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        let reservation = check_in(&svc, &client, 3).unwrap();

        let closed = svc
            .finalize_reservation(reservation.id_typed(), Utc::now())
            .unwrap();
        assert!(closed.is_finalized());
        assert!(svc.availability().is_available(&RoomId::from_sequence(3)));

        let again = svc.finalize_reservation(reservation.id_typed(), Utc::now());
        assert!(matches!(again, Err(DomainError::Conflict(_))));
        svc.verify_consistency().unwrap();
    }

    #[test]
    fn delete_active_reservation_frees_room() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        let reservation = check_in(&svc, &client, 4).unwrap();

        svc.delete_reservation(reservation.id_typed()).unwrap();
        assert!(svc.find_reservation(reservation.id_typed()).is_none());
        assert!(svc.availability().is_available(&RoomId::from_sequence(4)));
        assert!(matches!(
            svc.delete_reservation(reservation.id_typed()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn reinstate_refuses_taken_room() {
        let svc = service();
        let ana = svc.register_client(ana()).unwrap();
        let luis = svc
            .register_client(ClientDetails::new("Luis", "Vera", "0911111111", "555-0202"))
            .unwrap();
        let original = check_in(&svc, &ana, 5).unwrap();
        svc.finalize_reservation(original.id_typed(), Utc::now()).unwrap();
        check_in(&svc, &luis, 5).unwrap();

        let err = svc.reinstate_reservation(original.clone()).unwrap_err();
        assert!(matches!(err, DomainError::Unavailable(_)));
        assert!(svc.find_reservation(original.id_typed()).unwrap().is_finalized());
        svc.verify_consistency().unwrap();
    }

    #[test]
    fn reinstate_reopens_closed_stay() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        let original = check_in(&svc, &client, 6).unwrap();
        svc.finalize_reservation(original.id_typed(), Utc::now()).unwrap();

        svc.reinstate_reservation(original.clone()).unwrap();
        assert_eq!(svc.find_reservation(original.id_typed()), Some(original));
        assert!(!svc.availability().is_available(&RoomId::from_sequence(6)));
        svc.verify_consistency().unwrap();
    }

    #[test]
    fn removed_client_is_restored_in_place() {
        let svc = service();
        svc.register_client(ana()).unwrap();
        let middle = svc
            .register_client(ClientDetails::new("Luis", "Vera", "0911111111", "555-0202"))
            .unwrap();
        svc.register_client(ClientDetails::new("Eva", "Paz", "0922222222", "555-0303"))
            .unwrap();
        let before = svc.list_clients();

        svc.remove_client(middle.id_typed()).unwrap();
        svc.restore_client(middle.clone()).unwrap();
        assert_eq!(svc.list_clients(), before);

        assert!(matches!(
            svc.restore_client(middle),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn client_with_active_stay_cannot_be_removed() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        check_in(&svc, &client, 8).unwrap();
        assert!(matches!(
            svc.remove_client(client.id_typed()),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn update_client_checks_other_documents() {
        let svc = service();
        let a = svc.register_client(ana()).unwrap();
        svc.register_client(ClientDetails::new("Luis", "Vera", "0911111111", "555-0202"))
            .unwrap();

        let mut details = a.details();
        details.phone = "555-4444".to_string();
        svc.update_client(Client::new(a.id_typed().clone(), details.clone()))
            .unwrap();
        assert_eq!(svc.find_client(a.id_typed()).unwrap().phone(), "555-4444");

        details.document = "0911111111".to_string();
        let clash = svc.update_client(Client::new(a.id_typed().clone(), details));
        assert!(matches!(clash, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn set_room_occupied_must_match_reservations() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        check_in(&svc, &client, 9).unwrap();

        assert!(svc.set_room_occupied(&RoomId::from_sequence(9), true).is_ok());
        assert!(matches!(
            svc.set_room_occupied(&RoomId::from_sequence(9), false),
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            svc.set_room_occupied(&RoomId::from_sequence(10), true),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn room_listings_follow_occupancy() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        check_in(&svc, &client, 11).unwrap();

        assert_eq!(svc.list_rooms().len(), 20);
        assert_eq!(svc.available_rooms().len(), 19);
        let occupied = svc.occupied_rooms();
        assert_eq!(occupied.len(), 1);
        assert_eq!(occupied[0].number(), "011");
        assert_eq!(svc.find_room_by_number("011"), occupied.first().cloned());
    }

    #[test]
    fn recent_reservations_are_newest_first() {
        let svc = service();
        let client = svc.register_client(ana()).unwrap();
        let base = Utc::now();
        for (room, offset) in [(12u32, 0i64), (13, 2), (14, 1)] {
            let draft = ReservationBuilder::for_check_in(
                client.id_typed().clone(),
                RoomId::from_sequence(room),
                Money::from_major(50),
            )
            .pending()
            .booked_at(base + chrono::Duration::hours(offset))
            .build()
            .unwrap();
            svc.create_reservation(draft).unwrap();
        }

        let recent: Vec<String> = svc
            .recent_reservations(2)
            .iter()
            .map(|r| r.id_typed().to_string())
            .collect();
        assert_eq!(recent, vec!["RES-0002", "RES-0003"]);
    }

    #[test]
    fn restore_complete_rebuilds_cache() {
        let svc = service();
        let empty = svc.capture().unwrap();
        let client = svc.register_client(ana()).unwrap();
        check_in(&svc, &client, 15).unwrap();

        svc.restore_complete(&empty).unwrap();
        assert!(svc.list_clients().is_empty());
        assert!(svc.availability().is_available(&RoomId::from_sequence(15)));
        assert_eq!(svc.availability().available_count(), 20);
        svc.verify_consistency().unwrap();
    }

    #[test]
    fn restore_rejects_inconsistent_snapshot() {
        let svc = service();
        let mut rooms = Room::catalog();
        rooms[0].set_occupied(true);
        let broken = Snapshot::from_parts(Vec::new(), rooms, Vec::new());

        assert!(matches!(
            svc.restore_complete(&broken),
            Err(DomainError::InvariantViolation(_))
        ));
        assert_eq!(svc.availability().available_count(), 20);
    }

    #[test]
    fn captured_snapshot_is_independent_of_later_writes() {
        let svc = service();
        let snapshot = svc.capture().unwrap();
        svc.register_client(ana()).unwrap();
        assert!(snapshot.clients().is_empty());
        assert!(svc.health_check());
    }
}
