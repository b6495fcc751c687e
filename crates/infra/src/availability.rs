//! Shared room-availability cache.
//!
//! Answers "is this room free" without going through the model service. One `RwLock`
//! guards the whole map and every mutation holds the write lock for its full
//! read-modify-write, so readers see either the state before or after a mutation.
//!
//! A poisoned lock fails closed: reads report "unavailable" / empty lists and mutations
//! are skipped, both logged at `error`.

use std::collections::HashMap;
use std::sync::RwLock;

use innkeep_core::RoomId;
use innkeep_hotel::Room;

#[derive(Debug, Clone)]
struct CacheEntry {
    available: bool,
    room: Room,
}

#[derive(Debug, Default)]
pub struct AvailabilityCache {
    inner: RwLock<HashMap<RoomId, CacheEntry>>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with `rooms`.
    ///
    /// The only bulk-mutation entry point; safe to call again after a restore.
    pub fn initialize(&self, rooms: &[Room]) {
        let Ok(mut map) = self.inner.write() else {
            tracing::error!("availability cache lock poisoned; initialize skipped");
            return;
        };
        map.clear();
        for room in rooms {
            map.insert(
                room.id_typed().clone(),
                CacheEntry {
                    available: room.is_available(),
                    room: room.clone(),
                },
            );
        }
        tracing::debug!(rooms = map.len(), "availability cache initialized");
    }

    /// `false` for unknown rooms.
    pub fn is_available(&self, room_id: &RoomId) -> bool {
        match self.inner.read() {
            Ok(map) => map.get(room_id).is_some_and(|e| e.available),
            Err(_) => {
                tracing::error!(%room_id, "availability cache lock poisoned; reporting unavailable");
                false
            }
        }
    }

    /// Mark a free room as taken. Returns `false` if it was already taken or is unknown.
    pub fn reserve(&self, room_id: &RoomId) -> bool {
        let Ok(mut map) = self.inner.write() else {
            tracing::error!(%room_id, "availability cache lock poisoned; reserve refused");
            return false;
        };
        match map.get_mut(room_id) {
            Some(entry) if entry.available => {
                entry.available = false;
                entry.room.set_occupied(true);
                tracing::debug!(%room_id, "room reserved in cache");
                true
            }
            _ => false,
        }
    }

    pub fn release(&self, room_id: &RoomId) {
        let Ok(mut map) = self.inner.write() else {
            tracing::error!(%room_id, "availability cache lock poisoned; release skipped");
            return;
        };
        if let Some(entry) = map.get_mut(room_id) {
            entry.available = true;
            entry.room.set_occupied(false);
            tracing::debug!(%room_id, "room released in cache");
        }
    }

    /// Free rooms, sorted by number.
    pub fn list_available(&self) -> Vec<Room> {
        self.collect(true)
    }

    /// Taken rooms, sorted by number.
    pub fn list_occupied(&self) -> Vec<Room> {
        self.collect(false)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<Room> {
        let map = self.inner.read().ok()?;
        map.get(room_id).map(|e| e.room.clone())
    }

    pub fn available_count(&self) -> usize {
        match self.inner.read() {
            Ok(map) => map.values().filter(|e| e.available).count(),
            Err(_) => 0,
        }
    }

    pub fn total_count(&self) -> usize {
        match self.inner.read() {
            Ok(map) => map.len(),
            Err(_) => 0,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }

    fn collect(&self, available: bool) -> Vec<Room> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => {
                tracing::error!("availability cache lock poisoned; returning no rooms");
                return vec![];
            }
        };
        let mut rooms: Vec<Room> = map
            .values()
            .filter(|e| e.available == available)
            .map(|e| e.room.clone())
            .collect();
        rooms.sort_by(|a, b| a.number().cmp(b.number()));
        rooms
    }
}
