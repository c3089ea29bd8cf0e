//! Capacity-bounded slot storage with generational handles.
//!
//! The registry hands out [`Handle`]s rather than bare indices. A slot's
//! generation increments on every removal, so a handle held across a
//! removal is rejected as stale instead of addressing whichever value was
//! registered into the reused slot. Alongside the stable handles, the
//! registry keeps an insertion-ordered view in which live members occupy
//! contiguous positions `0..len`; removing the member at position *i*
//! shifts later members down by one, which is the ordering the renderer
//! draws.

use loupe_foundation::{Error, Handle, Result};

/// One storage slot.
///
/// Generation parity tracks liveness: odd generations are occupied, even
/// generations are free.
#[derive(Clone, Debug)]
struct Slot<T> {
    /// Generation counter for this slot.
    generation: u32,
    /// The stored value, present while the slot is occupied.
    value: Option<T>,
}

/// Capacity-bounded, insertion-ordered storage with generational handles.
///
/// Slots are reused from a free list after removal, with the generation
/// bumped so old handles go stale. The registry itself is a plain
/// single-threaded structure; callers that share it across threads guard
/// it with short-held mutual exclusion, which is what the engine does.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    /// Slot storage, indexed by `Handle::index`.
    slots: Vec<Slot<T>>,
    /// Free list of slot indices available for reuse.
    free: Vec<u32>,
    /// Live handles in insertion order.
    order: Vec<Handle>,
    /// Maximum number of live members.
    capacity: usize,
}

impl<T> Registry<T> {
    /// Creates an empty registry bounded to `capacity` live members.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            order: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the configured maximum number of live members.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of live members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if there are no live members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true if the registry is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    /// Registers a value, returning its handle.
    ///
    /// # Errors
    /// Returns [`Error::CapacityExceeded`] if the registry is full. The
    /// registry is unchanged after a failed add.
    pub fn add(&mut self, value: T) -> Result<Handle> {
        if self.is_full() {
            return Err(Error::capacity_exceeded(self.capacity));
        }

        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            // Reused slot: generation goes even/free -> odd/occupied
            slot.generation += 1;
            slot.value = Some(value);
            Handle::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).expect("slot count fits in u32");
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            Handle::new(index, 1)
        };

        self.order.push(handle);
        Ok(handle)
    }

    /// Returns true if the handle refers to a live member.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.slot(handle).is_some()
    }

    /// Returns a reference to the value behind a handle, if live.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slot(handle).and_then(|slot| slot.value.as_ref())
    }

    /// Returns the ordered-view position of a live handle.
    #[must_use]
    pub fn position(&self, handle: Handle) -> Option<usize> {
        if !self.contains(handle) {
            return None;
        }
        self.order.iter().position(|h| *h == handle)
    }

    /// Returns the handle at an ordered-view position.
    #[must_use]
    pub fn handle_at(&self, position: usize) -> Option<Handle> {
        self.order.get(position).copied()
    }

    /// Removes a member by handle, returning its value so the caller can
    /// release the underlying resource.
    ///
    /// Later members shift down one position in the ordered view; their
    /// handles are unaffected.
    ///
    /// # Errors
    /// Returns [`Error::StaleHandle`] if the handle is dead or was never
    /// issued by this registry.
    pub fn remove(&mut self, handle: Handle) -> Result<T> {
        let Some(position) = self.position(handle) else {
            return Err(Error::stale_handle(handle));
        };
        Ok(self.remove_live(position))
    }

    /// Removes the member at an ordered-view position, returning its
    /// handle and value.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `position >= len`.
    pub fn remove_at(&mut self, position: usize) -> Result<(Handle, T)> {
        if position >= self.order.len() {
            return Err(Error::index_out_of_range(position, self.order.len()));
        }
        let handle = self.order[position];
        let value = self.remove_live(position);
        Ok((handle, value))
    }

    /// Removes every member, returning the values in insertion order.
    pub fn remove_all(&mut self) -> Vec<T> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .map(|handle| {
                let slot = &mut self.slots[handle.index as usize];
                // Occupied -> free: generation goes odd -> even
                slot.generation += 1;
                self.free.push(handle.index);
                slot.value.take().expect("ordered handle is occupied")
            })
            .collect()
    }

    /// Iterates over live members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.order.iter().map(|handle| {
            let value = self.slots[handle.index as usize]
                .value
                .as_ref()
                .expect("ordered handle is occupied");
            (*handle, value)
        })
    }

    /// Returns the live handles in insertion order.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle> {
        self.order.clone()
    }

    /// Resolves a handle to its slot if the generation matches and the
    /// slot is occupied.
    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.value.is_some())
    }

    /// Removes the member at a position known to be in range.
    fn remove_live(&mut self, position: usize) -> T {
        let handle = self.order.remove(position);
        let slot = &mut self.slots[handle.index as usize];
        // Occupied -> free: generation goes odd -> even
        slot.generation += 1;
        self.free.push(handle.index);
        slot.value.take().expect("ordered handle is occupied")
    }
}
