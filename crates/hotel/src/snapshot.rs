//! Point-in-time capture of the whole aggregate (memento).

use chrono::{DateTime, Utc};

use crate::client::Client;
use crate::reservation::Reservation;
use crate::room::Room;
use crate::state::HotelState;

/// Immutable deep copy of a [`HotelState`].
///
/// The snapshot owns its data outright and only hands out fresh copies, so neither the
/// live aggregate nor a caller holding an accessor result can reach into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    state: HotelState,
    taken_at: DateTime<Utc>,
}

impl Snapshot {
    /// Deep-copy `state`.
    pub fn capture(state: &HotelState) -> Self {
        Self {
            state: state.clone(),
            taken_at: Utc::now(),
        }
    }

    pub fn from_parts(clients: Vec<Client>, rooms: Vec<Room>, reservations: Vec<Reservation>) -> Self {
        Self {
            state: HotelState {
                clients,
                rooms,
                reservations,
            },
            taken_at: Utc::now(),
        }
    }

    pub fn clients(&self) -> Vec<Client> {
        self.state.clients.clone()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.state.rooms.clone()
    }

    pub fn reservations(&self) -> Vec<Reservation> {
        self.state.reservations.clone()
    }

    /// The captured aggregate, copied.
    pub fn state(&self) -> HotelState {
        self.state.clone()
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn description(&self) -> String {
        format!(
            "Saved state: {} clients, {} rooms, {} reservations - {}",
            self.state.clients.len(),
            self.state.rooms.len(),
            self.state.reservations.len(),
            self.taken_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

impl core::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutating_the_source_does_not_touch_the_snapshot() {
        let mut live = HotelState::with_rooms(Room::catalog());
        let snapshot = Snapshot::capture(&live);

        live.rooms[0].set_occupied(true);
        live.rooms.pop();

        assert_eq!(snapshot.rooms().len(), 20);
        assert!(snapshot.rooms()[0].is_available());
    }

    #[test]
    fn accessor_results_are_copies() {
        let snapshot = Snapshot::capture(&HotelState::with_rooms(Room::catalog()));

        let mut rooms = snapshot.rooms();
        rooms[0].set_occupied(true);
        rooms.clear();

        assert_eq!(snapshot.rooms().len(), 20);
        assert!(snapshot.rooms()[0].is_available());
    }

    #[test]
    fn description_counts_entities() {
        let snapshot = Snapshot::from_parts(vec![], Room::catalog(), vec![]);
        assert!(snapshot.description().starts_with("Saved state: 0 clients, 20 rooms, 0 reservations"));
        assert!(!snapshot.is_empty());
        assert!(Snapshot::capture(&HotelState::default()).is_empty());
    }
}
