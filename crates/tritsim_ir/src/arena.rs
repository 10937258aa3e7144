//! Dense, append-only storage keyed by typed ids.
//!
//! A circuit keeps its devices and connectors in two [`Arena`]s. Connectors
//! name their endpoints by [`DeviceId`](crate::DeviceId) and devices list
//! their fan-out by [`ConnectorId`](crate::ConnectorId), so feedback loops
//! need no shared ownership.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A `u32`-backed id usable as an arena key.
pub trait ArenaId: Copy {
    /// Creates an id from a raw index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw index.
    fn as_raw(self) -> u32;
}

/// Append-only vector addressed by `I`.
///
/// Nothing is ever removed, so an id stays valid for the lifetime of the
/// arena that issued it. Indexing with an id from another arena panics or
/// returns an unrelated item.
#[derive(Debug, Clone)]
pub struct Arena<I, T> {
    slots: Vec<T>,
    _id: PhantomData<fn() -> I>,
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena sized for `capacity` items.
    ///
    /// Circuits know their device and connector counts up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            _id: PhantomData,
        }
    }

    /// Stores `item` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` items.
    pub fn alloc(&mut self, item: T) -> I {
        let raw = u32::try_from(self.slots.len()).unwrap_or_else(|_| panic!("arena id space exhausted"));
        self.slots.push(item);
        I::from_raw(raw)
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All issued ids, oldest first.
    ///
    /// The iterator borrows nothing, so callers can mutate the arena while
    /// walking a collected copy of it.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = I> {
        (0..self.slots.len() as u32).map(I::from_raw)
    }

    /// Items with their ids, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (I, &T)> {
        self.ids().zip(&self.slots)
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.slots[id.as_raw() as usize]
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.slots[id.as_raw() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ConnectorId, DeviceId};

    #[test]
    fn devices_get_sequential_ids() {
        let mut devices: Arena<DeviceId, &str> = Arena::with_capacity(2);
        assert!(devices.is_empty());
        let and = devices.alloc("and1");
        let or = devices.alloc("or1");
        assert_eq!((and.as_raw(), or.as_raw()), (0, 1));
        assert_eq!(devices[or], "or1");
        assert_eq!(devices.len(), 2);
    }

    #[test]
    fn fanout_lists_grow_in_place() {
        let mut devices: Arena<DeviceId, Vec<ConnectorId>> = Arena::with_capacity(1);
        let mut connectors: Arena<ConnectorId, (DeviceId, DeviceId)> = Arena::with_capacity(2);
        let d = devices.alloc(Vec::new());
        for _ in 0..2 {
            let c = connectors.alloc((d, d));
            devices[d].push(c);
        }
        assert_eq!(devices[d], vec![ConnectorId::from_raw(0), ConnectorId::from_raw(1)]);
        assert_eq!(connectors[ConnectorId::from_raw(1)], (d, d));
    }

    #[test]
    fn ids_match_iteration_order() {
        let mut devices: Arena<DeviceId, char> = Arena::with_capacity(0);
        for c in ['a', 'b', 'c'] {
            devices.alloc(c);
        }
        let ids: Vec<DeviceId> = devices.ids().collect();
        let pairs: Vec<(DeviceId, char)> = devices.iter().map(|(id, c)| (id, *c)).collect();
        assert_eq!(ids.len(), 3);
        for (id, (pair_id, c)) in ids.iter().zip(&pairs) {
            assert_eq!(id, pair_id);
            assert_eq!(devices[*id], *c);
        }
    }
}
