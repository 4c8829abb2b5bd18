//! Route-segment reservations.
//!
//! Each vehicle class owns one [`ReservationTable`].  A segment is keyed by
//! the *unordered* pair of its endpoints, so a train on `A → B` also blocks
//! `B → A`: both directions share one track.
//!
//! Entries are created lazily on the first reservation attempt and then
//! toggle between free and held for the rest of the session; they are never
//! removed.
//!
//! Release is ownership-checked: only the current holder can free a
//! segment.  A late release from a vehicle that already moved on is a no-op
//! and can never evict the vehicle that holds the segment now.

use gt_core::{LocationId, VehicleId};
use gt_spatial::RouteEdge;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── SegmentKey ────────────────────────────────────────────────────────────────

/// Canonical (sorted) location pair identifying an undirected segment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SegmentKey {
    pub a: LocationId,
    pub b: LocationId,
}

impl SegmentKey {
    #[inline]
    pub fn new(x: LocationId, y: LocationId) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }

    #[inline]
    pub fn of_edge(edge: &RouteEdge) -> Self {
        Self::new(edge.from, edge.to)
    }
}

impl std::fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.a.0, self.b.0)
    }
}

// ── ReservationTable ──────────────────────────────────────────────────────────

/// Who holds which segment, for one vehicle class.
#[derive(Debug, Default)]
pub struct ReservationTable {
    entries: Map<SegmentKey, Option<VehicleId>>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if nobody holds the `from`–`to` segment.
    pub fn is_available(&self, from: LocationId, to: LocationId) -> bool {
        self.holder(from, to).is_none()
    }

    /// `true` if the segment is free or already held by `vehicle`.
    pub fn is_available_for(&self, from: LocationId, to: LocationId, vehicle: VehicleId) -> bool {
        match self.holder(from, to) {
            None    => true,
            Some(h) => h == vehicle,
        }
    }

    /// The vehicle currently holding the segment, if any.
    pub fn holder(&self, from: LocationId, to: LocationId) -> Option<VehicleId> {
        self.entries.get(&SegmentKey::new(from, to)).copied().flatten()
    }

    /// Claim the segment for `vehicle`.
    ///
    /// Returns `true` if `vehicle` holds the segment afterwards (including
    /// when it already did), `false` if another vehicle holds it.
    pub fn reserve(&mut self, from: LocationId, to: LocationId, vehicle: VehicleId) -> bool {
        let slot = self.entries.entry(SegmentKey::new(from, to)).or_insert(None);
        match *slot {
            None => {
                *slot = Some(vehicle);
                true
            }
            Some(holder) => holder == vehicle,
        }
    }

    /// Free the segment if, and only if, `vehicle` holds it.
    ///
    /// Returns `true` if the segment was released.
    pub fn release(&mut self, from: LocationId, to: LocationId, vehicle: VehicleId) -> bool {
        match self.entries.get_mut(&SegmentKey::new(from, to)) {
            Some(slot) if *slot == Some(vehicle) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Free every segment `vehicle` still holds.  Returns how many.
    pub fn release_all(&mut self, vehicle: VehicleId) -> usize {
        let mut released = 0;
        for slot in self.entries.values_mut() {
            if *slot == Some(vehicle) {
                *slot = None;
                released += 1;
            }
        }
        released
    }

    /// Segments currently held by `vehicle`, sorted.
    pub fn held_by(&self, vehicle: VehicleId) -> Vec<SegmentKey> {
        let mut keys: Vec<SegmentKey> = self
            .entries
            .iter()
            .filter(|(_, h)| **h == Some(vehicle))
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Number of segments currently held.
    pub fn held_count(&self) -> usize {
        self.entries.values().filter(|h| h.is_some()).count()
    }

    /// Number of segments ever touched (held or free).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
