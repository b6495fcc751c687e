//! The front-desk aggregate: every client, room and reservation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use innkeep_core::{
    find_by_id, ClientId, DomainError, DomainResult, Entity, ReservationId, RoomId,
};

use crate::client::Client;
use crate::reservation::Reservation;
use crate::room::{OccupiedRoom, Room};

/// Full domain state owned by a model service.
///
/// Collections keep insertion order so two states built by the same operations compare
/// equal entity-for-entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelState {
    pub clients: Vec<Client>,
    pub rooms: Vec<Room>,
    pub reservations: Vec<Reservation>,
}

impl HotelState {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            ..Self::default()
        }
    }

    pub fn client(&self, id: &ClientId) -> Option<&Client> {
        find_by_id(&self.clients, id)
    }

    pub fn client_by_document(&self, document: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.document() == document)
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        find_by_id(&self.rooms, id)
    }

    pub fn room_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.has_id(id))
    }

    pub fn room_by_number(&self, number: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.number() == number)
    }

    pub fn reservation(&self, id: &ReservationId) -> Option<&Reservation> {
        find_by_id(&self.reservations, id)
    }

    pub fn reservation_mut(&mut self, id: &ReservationId) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| r.has_id(id))
    }

    pub fn active_reservations_for_room<'a>(
        &'a self,
        room_id: &'a RoomId,
    ) -> impl Iterator<Item = &'a Reservation> + 'a {
        self.reservations
            .iter()
            .filter(move |r| r.is_active() && r.room_id() == room_id)
    }

    /// Next free client code. Codes still referenced by reservations of removed
    /// clients are skipped.
    pub fn next_client_id(&self) -> ClientId {
        ClientId::next_after(
            self.clients
                .iter()
                .map(Client::id_typed)
                .chain(self.reservations.iter().map(Reservation::client_id)),
        )
    }

    /// Occupied rooms in floor order, each with the guest of its active stay.
    ///
    /// A room whose stay or guest record is missing is left out.
    pub fn occupied_rooms_with_guests(&self) -> Vec<OccupiedRoom> {
        self.rooms
            .iter()
            .filter(|room| room.is_occupied())
            .filter_map(|room| {
                let reservation = self.active_reservations_for_room(room.id_typed()).next()?;
                let guest = self.client(reservation.client_id())?;
                Some(OccupiedRoom {
                    room_id: room.id_typed().clone(),
                    room_number: room.number().to_string(),
                    kind: room.kind(),
                    rate: room.rate(),
                    reservation_id: reservation.id_typed().clone(),
                    guest_first_name: guest.first_name().to_string(),
                    guest_last_name: guest.last_name().to_string(),
                    guest_document: guest.document().to_string(),
                })
            })
            .collect()
    }

    pub fn next_reservation_id(&self) -> ReservationId {
        ReservationId::next_after(self.reservations.iter().map(Reservation::id_typed))
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.rooms.is_empty() && self.reservations.is_empty()
    }

    /// Verify occupancy invariants:
    ///
    /// - a room is occupied iff an active reservation references it
    /// - at most one active reservation per room
    pub fn check_invariants(&self) -> DomainResult<()> {
        let mut active_per_room: HashMap<&RoomId, usize> = HashMap::new();
        for reservation in self.reservations.iter().filter(|r| r.is_active()) {
            *active_per_room.entry(reservation.room_id()).or_default() += 1;
        }

        if let Some((room_id, count)) = active_per_room.iter().find(|(_, count)| **count > 1) {
            return Err(DomainError::invariant(format!(
                "room {room_id} has {count} active reservations"
            )));
        }

        for room in &self.rooms {
            let has_active = active_per_room.contains_key(room.id_typed());
            if room.is_occupied() != has_active {
                return Err(DomainError::invariant(format!(
                    "room {} occupied flag is {} but active reservation present is {}",
                    room.id_typed(),
                    room.is_occupied(),
                    has_active
                )));
            }
        }

        Ok(())
    }
}
