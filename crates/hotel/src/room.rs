use serde::{Deserialize, Serialize};

use innkeep_core::{Entity, Money, ReservationId, RoomId};

/// Room category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Suite,
    Double,
    Single,
}

impl RoomKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomKind::Suite => "Suite",
            RoomKind::Double => "Double",
            RoomKind::Single => "Single",
        }
    }

    /// Standard nightly rate of the category in the house catalog.
    pub fn standard_rate(self) -> Money {
        match self {
            RoomKind::Suite => Money::from_major(120),
            RoomKind::Double => Money::from_major(80),
            RoomKind::Single => Money::from_major(50),
        }
    }
}

impl core::fmt::Display for RoomKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    number: String,
    kind: RoomKind,
    occupied: bool,
    rate: Money,
}

impl Room {
    /// Rooms are created free.
    pub fn new(id: RoomId, number: impl Into<String>, kind: RoomKind, rate: Money) -> Self {
        Self {
            id,
            number: number.into(),
            kind,
            occupied: false,
            rate,
        }
    }

    /// The standard 20-room floor: 1–5 Suite, 6–12 Double, 13–20 Single.
    pub fn catalog() -> Vec<Room> {
        (1..=20u32)
            .map(|n| {
                let kind = match n {
                    1..=5 => RoomKind::Suite,
                    6..=12 => RoomKind::Double,
                    _ => RoomKind::Single,
                };
                Room::new(
                    RoomId::from_sequence(n),
                    format!("{n:03}"),
                    kind,
                    kind.standard_rate(),
                )
            })
            .collect()
    }

    pub fn id_typed(&self) -> &RoomId {
        &self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn rate(&self) -> Money {
        self.rate
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn is_available(&self) -> bool {
        !self.occupied
    }

    pub fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }

    /// Label used by pickers: `#001 | Suite | $120.00`.
    pub fn display_text(&self) -> String {
        format!("#{} | {} | {}", self.number, self.kind, self.rate)
    }
}

impl Entity for Room {
    type Id = RoomId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// An occupied room joined with its active stay and guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedRoom {
    pub room_id: RoomId,
    pub room_number: String,
    pub kind: RoomKind,
    pub rate: Money,
    pub reservation_id: ReservationId,
    pub guest_first_name: String,
    pub guest_last_name: String,
    pub guest_document: String,
}

impl OccupiedRoom {
    pub fn guest_name(&self) -> String {
        format!("{} {}", self.guest_first_name, self.guest_last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twenty_free_rooms_by_category() {
        let rooms = Room::catalog();
        assert_eq!(rooms.len(), 20);
        assert!(rooms.iter().all(Room::is_available));
        assert_eq!(rooms.iter().filter(|r| r.kind() == RoomKind::Suite).count(), 5);
        assert_eq!(rooms.iter().filter(|r| r.kind() == RoomKind::Double).count(), 7);
        assert_eq!(rooms.iter().filter(|r| r.kind() == RoomKind::Single).count(), 8);
        assert_eq!(rooms[0].id_typed().as_str(), "HAB-001");
        assert_eq!(rooms[19].number(), "020");
    }

    #[test]
    fn display_text_matches_picker_format() {
        let room = &Room::catalog()[0];
        assert_eq!(room.display_text(), "#001 | Suite | $120.00");
    }
}
