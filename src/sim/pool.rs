//! Fixed-capacity slot pools
//!
//! Balls, power-ups and particles live in pools: a slot array sized once,
//! where each slot carries its own active flag. Allocation scans for the
//! first free slot; releasing a slot only clears its flag. Indices stay
//! valid for the whole frame, so a ball split or a power-up spawn never
//! invalidates a reference taken earlier in the tick.

use serde::{Deserialize, Serialize};

/// An entity that can occupy a pool slot
pub trait Slot: Default {
    fn is_active(&self) -> bool;
}

/// Fixed-capacity arena of slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Slot> Pool<T> {
    /// Pool with `capacity` inactive slots; it never grows afterwards
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Fill the first free slot with `value`, returning its index
    ///
    /// Returns `None` and drops `value` when every slot is in use.
    pub fn allocate(&mut self, value: T) -> Option<usize> {
        let index = self.slots.iter().position(|s| !s.is_active())?;
        self.slots[index] = value;
        Some(index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter(|s| s.is_active())
    }

    /// Indices of the active slots, snapshotted at call time
    pub fn active_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_active())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_active())
    }

    /// Reset every slot to its inactive default
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = T::default();
        }
    }
}
