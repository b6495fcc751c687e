//! Hotel domain module: guests, rooms and reservations.
//!
//! This crate contains the records of the front-desk aggregate, the immutable
//! [`Snapshot`] used for whole-state rollback, and the collaborator contracts
//! ([`ModelService`], [`SnapshotSupport`]) that commands are written against.
//! No IO happens here.

pub mod client;
pub mod reservation;
pub mod room;
pub mod service;
pub mod snapshot;
pub mod state;

pub use client::{Client, ClientDetails};
pub use reservation::{Reservation, ReservationBuilder, ReservationDraft};
pub use room::{OccupiedRoom, Room, RoomKind};
pub use service::{ModelService, SnapshotSupport};
pub use snapshot::Snapshot;
pub use state::HotelState;
