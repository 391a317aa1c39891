//! Generation-checked slot arena.
//!
//! Actors are addressed by `Handle`, an index plus a generation counter. A
//! slot freed and reused bumps its generation, so a stale handle to a dead
//! monster dereferences to `None` instead of silently aliasing its
//! replacement.

use serde::{Deserialize, Serialize};

/// Stable reference to an arena entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with generation-checked handles.
///
/// Iteration order is slot order, which stays stable for live entries; the
/// scheduler relies on that for its tie-breaking. The generation counter
/// is arena-wide and only ever grows, so a handle dated before any removal
/// can never alias a later occupant of its slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    len: usize,
    generation: u32,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            generation: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert into the first free slot, or grow.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        let generation = self.generation;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.is_none() {
                slot.generation = generation;
                slot.value = Some(value);
                return Handle {
                    index: i as u32,
                    generation,
                };
            }
        }
        self.slots.push(Slot {
            generation,
            value: Some(value),
        });
        Handle {
            index: (self.slots.len() - 1) as u32,
            generation,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Free a slot, bumping the arena generation so stale handles go dead.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.len -= 1;
        slot.value.take()
    }

    /// Iterate live entries with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    v,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(move |v| {
                (
                    Handle {
                        index: i as u32,
                        generation,
                    },
                    v,
                )
            })
        })
    }

    /// Drop trailing free slots, invalidating nothing live.
    ///
    /// Interior holes keep their position (handles into them must survive
    /// the reuse check), so only the tail can shrink.
    pub fn compact(&mut self) {
        let live_tail = self
            .slots
            .iter()
            .rposition(|slot| slot.value.is_some())
            .map_or(0, |i| i + 1);
        self.slots.truncate(live_tail);
        self.slots.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_goes_dead_on_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert("rat");
        assert_eq!(arena.remove(a), Some("rat"));

        let b = arena.insert("wolf");
        assert_eq!(a.index, b.index);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"wolf"));
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn iteration_is_slot_ordered_and_skips_holes() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        let _c = arena.insert("c");
        arena.remove(b);
        let values: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["a", "c"]);
        assert_eq!(arena.iter().next().unwrap().0, a);
    }

    #[test]
    fn compact_only_trims_the_tail() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        arena.remove(b);
        arena.remove(c);
        arena.compact();
        assert_eq!(arena.capacity(), 1);
        assert_eq!(arena.get(a), Some(&1));

        // The interior hole from a later removal stays put.
        let d = arena.insert(4);
        let e = arena.insert(5);
        arena.remove(d);
        arena.compact();
        assert_eq!(arena.get(e), Some(&5));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn serde_round_trip_preserves_handles() {
        let mut arena = Arena::new();
        let a = arena.insert("a".to_string());
        let b = arena.insert("b".to_string());
        arena.remove(a);

        let json = serde_json::to_string(&arena).unwrap();
        let restored: Arena<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.get(b), Some(&"b".to_string()));
        assert_eq!(restored.get(a), None);
        assert_eq!(restored.len(), 1);
    }
}
