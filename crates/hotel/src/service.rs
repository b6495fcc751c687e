//! Collaborator contracts: the model service gateway and its optional snapshot capability.

use chrono::{DateTime, Utc};

use innkeep_core::{ClientId, DomainResult, ReservationId, RoomId};

use crate::client::{Client, ClientDetails};
use crate::reservation::{Reservation, ReservationDraft};
use crate::room::{OccupiedRoom, Room};
use crate::snapshot::Snapshot;

/// The only gateway to persisted front-desk state.
///
/// Implementations keep room occupancy, reservations and any availability cache in
/// lock-step: each mutating call either applies fully or returns an error with no effect.
pub trait ModelService: Send + Sync {
    // --- clients ---

    /// Register a new guest and assign its id.
    ///
    /// Rejects a blank document and duplicate documents or phones.
    fn register_client(&self, details: ClientDetails) -> DomainResult<Client>;

    /// Re-insert a previously removed guest record, keeping its id.
    fn restore_client(&self, client: Client) -> DomainResult<()>;

    fn remove_client(&self, id: &ClientId) -> DomainResult<()>;

    fn update_client(&self, client: Client) -> DomainResult<()>;

    fn find_client(&self, id: &ClientId) -> Option<Client>;

    fn find_client_by_document(&self, document: &str) -> Option<Client>;

    fn list_clients(&self) -> Vec<Client>;

    fn document_exists(&self, document: &str) -> bool;

    fn phone_exists(&self, phone: &str) -> bool;

    // --- rooms ---

    fn list_rooms(&self) -> Vec<Room>;

    fn available_rooms(&self) -> Vec<Room>;

    fn occupied_rooms(&self) -> Vec<Room>;

    /// Occupied rooms with the reservation and guest holding each, read in one pass.
    fn occupied_rooms_with_guests(&self) -> Vec<OccupiedRoom>;

    fn find_room(&self, id: &RoomId) -> Option<Room>;

    fn find_room_by_number(&self, number: &str) -> Option<Room>;

    fn set_room_occupied(&self, id: &RoomId, occupied: bool) -> DomainResult<()>;

    // --- reservations ---

    /// Store a draft and assign its id.
    ///
    /// Client and room must exist. An active draft needs a free room and occupies it.
    fn create_reservation(&self, draft: ReservationDraft) -> DomainResult<Reservation>;

    /// Record the departure of an open reservation, freeing its room if it was active.
    fn finalize_reservation(
        &self,
        id: &ReservationId,
        departure: DateTime<Utc>,
    ) -> DomainResult<Reservation>;

    /// Write a reservation record back verbatim (same id).
    ///
    /// If the record is active its room must be free; the room becomes occupied.
    fn reinstate_reservation(&self, reservation: Reservation) -> DomainResult<()>;

    /// Remove a reservation record, freeing its room if it was active.
    fn delete_reservation(&self, id: &ReservationId) -> DomainResult<()>;

    fn find_reservation(&self, id: &ReservationId) -> Option<Reservation>;

    /// The active reservation of the guest holding `document`.
    fn active_reservation_for_document(&self, document: &str) -> Option<Reservation>;

    fn active_reservation_for_room(&self, room_id: &RoomId) -> Option<Reservation>;

    fn list_reservations(&self) -> Vec<Reservation>;

    /// Newest bookings first.
    fn recent_reservations(&self, limit: usize) -> Vec<Reservation>;

    /// Whether the service can currently serve requests.
    fn health_check(&self) -> bool;
}

/// Whole-state capture and restore.
///
/// Optional: an invoker without it falls back to each command's logical undo.
pub trait SnapshotSupport: Send + Sync {
    /// Deep-copy the entire aggregate.
    fn capture(&self) -> DomainResult<Snapshot>;

    /// Replace the entire aggregate with `snapshot` and rebuild derived caches.
    ///
    /// Readers never observe a half-restored aggregate.
    fn restore_complete(&self, snapshot: &Snapshot) -> DomainResult<()>;
}
