#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generic reusable-instance pool with prewarm and oldest-active eviction.
//!
//! Every transient object in the encounter (actors, telegraph primitives) is
//! drawn from a [`Pool`] so steady-state simulation performs no allocation.
//! Pools grow up to a hard capacity; once full, spawning evicts the oldest
//! still-active instance in FIFO activation order and reuses its slot, so a
//! spawn never blocks or fails after initialization. Handles carry a slot and
//! a generation: commands addressed to a recycled slot observe a generation
//! mismatch and become defined no-ops.

use std::collections::VecDeque;

use thiserror::Error;

/// Capacity configuration for a single pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    prewarm_count: u32,
    hard_cap: u32,
}

impl PoolConfig {
    /// Creates a configuration with the provided prewarm count and hard cap.
    ///
    /// A `hard_cap` of zero means the pool may grow without bound.
    #[must_use]
    pub const fn new(prewarm_count: u32, hard_cap: u32) -> Self {
        Self {
            prewarm_count,
            hard_cap,
        }
    }

    /// Number of instances created eagerly at initialization.
    #[must_use]
    pub const fn prewarm_count(&self) -> u32 {
        self.prewarm_count
    }

    /// Maximum number of instances the pool may ever hold; zero is unbounded.
    #[must_use]
    pub const fn hard_cap(&self) -> u32 {
        self.hard_cap
    }

    /// Reports whether the pool enforces a capacity limit.
    #[must_use]
    pub const fn is_capped(&self) -> bool {
        self.hard_cap != 0
    }

    fn validate(&self) -> Result<(), PoolConfigError> {
        if self.is_capped() && self.prewarm_count > self.hard_cap {
            return Err(PoolConfigError::PrewarmExceedsCap {
                prewarm_count: self.prewarm_count,
                hard_cap: self.hard_cap,
            });
        }
        Ok(())
    }
}

/// Errors raised when a pool configuration fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PoolConfigError {
    /// The prewarm count exceeds the hard capacity.
    #[error("prewarm count {prewarm_count} exceeds hard cap {hard_cap}")]
    PrewarmExceedsCap {
        /// Requested prewarm count.
        prewarm_count: u32,
        /// Configured hard capacity.
        hard_cap: u32,
    },
}

/// Slot-and-generation handle addressing one pooled instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    /// Creates a handle from explicit pool coordinates.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Storage slot inside the pool.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Recycling generation of the storage slot.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Result of a spawn, including any instance recycled to make room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnOutcome {
    /// Handle of the freshly activated instance.
    pub handle: Handle,
    /// Previous handle of the evicted instance, when the hard cap forced one
    /// out. The evicted handle is stale from this point on.
    pub evicted: Option<Handle>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    active: bool,
    item: T,
}

/// Type-safe reusable-instance store with capacity-based forced eviction.
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    inactive: Vec<u32>,
    activation_order: VecDeque<u32>,
    config: PoolConfig,
}

impl<T> Pool<T> {
    /// Creates a pool and prewarms instances into the inactive set.
    ///
    /// The factory runs once per prewarmed instance. Fails when the
    /// configuration is invalid; a failed pool stays disabled.
    pub fn initialize(
        config: PoolConfig,
        mut factory: impl FnMut() -> T,
    ) -> Result<Self, PoolConfigError> {
        config.validate()?;

        let prewarm = if config.is_capped() {
            config.prewarm_count().min(config.hard_cap())
        } else {
            config.prewarm_count()
        };

        let mut slots = Vec::with_capacity(prewarm as usize);
        let mut inactive = Vec::with_capacity(prewarm as usize);
        for slot in 0..prewarm {
            slots.push(Slot {
                generation: 0,
                active: false,
                item: factory(),
            });
            inactive.push(slot);
        }
        // Pop order does not matter for correctness; reversing keeps slot 0
        // first out, which makes tests and replay logs easier to follow.
        inactive.reverse();

        Ok(Self {
            slots,
            inactive,
            activation_order: VecDeque::new(),
            config,
        })
    }

    /// Activates an instance, creating or recycling one as capacity allows.
    ///
    /// Resolution order: pop the inactive set, grow while under the hard cap,
    /// then evict the oldest still-active instance and reuse its slot. The
    /// factory runs only when the pool grows. Callers must reset per-use
    /// fields of the returned instance; despawn intentionally resets nothing.
    pub fn spawn(&mut self, factory: impl FnOnce() -> T) -> SpawnOutcome {
        if let Some(slot) = self.inactive.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.active = true;
            self.activation_order.push_back(slot);
            return SpawnOutcome {
                handle: Handle::new(slot, entry.generation),
                evicted: None,
            };
        }

        if !self.config.is_capped() || self.slots.len() < self.config.hard_cap() as usize {
            let slot = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                active: true,
                item: factory(),
            });
            self.activation_order.push_back(slot);
            return SpawnOutcome {
                handle: Handle::new(slot, 0),
                evicted: None,
            };
        }

        let slot = self
            .activation_order
            .pop_front()
            .expect("capped pool with no inactive slots must have active slots");
        let entry = &mut self.slots[slot as usize];
        let evicted = Handle::new(slot, entry.generation);
        entry.generation = entry.generation.wrapping_add(1);
        self.activation_order.push_back(slot);
        SpawnOutcome {
            handle: Handle::new(slot, entry.generation),
            evicted: Some(evicted),
        }
    }

    /// Returns an instance to the inactive set.
    ///
    /// A stale or already-inactive handle is a no-op returning `false`.
    pub fn despawn(&mut self, handle: Handle) -> bool {
        let Some(entry) = self.slots.get_mut(handle.slot() as usize) else {
            return false;
        };
        if !entry.active || entry.generation != handle.generation() {
            return false;
        }

        entry.active = false;
        entry.generation = entry.generation.wrapping_add(1);
        self.inactive.push(handle.slot());
        self.activation_order.retain(|slot| *slot != handle.slot());
        true
    }

    /// Borrows the instance behind a handle, if it is still live.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.slot() as usize)
            .filter(|entry| entry.active && entry.generation == handle.generation())
            .map(|entry| &entry.item)
    }

    /// Mutably borrows the instance behind a handle, if it is still live.
    #[must_use]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.slot() as usize)
            .filter(|entry| entry.active && entry.generation == handle.generation())
            .map(|entry| &mut entry.item)
    }

    /// Reports whether the handle still addresses a live instance.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of instances currently handed out.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.activation_order.len()
    }

    /// Number of instances resting in the inactive set.
    #[must_use]
    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    /// Total number of instances the pool owns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Reports whether the pool owns no instances at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Handle of the instance that has been active the longest.
    #[must_use]
    pub fn oldest_active(&self) -> Option<Handle> {
        self.activation_order
            .front()
            .map(|slot| Handle::new(*slot, self.slots[*slot as usize].generation))
    }

    /// Iterates live instances in ascending slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, entry)| {
            entry.active.then(|| {
                (
                    Handle::new(index as u32, entry.generation),
                    &entry.item,
                )
            })
        })
    }

    /// Mutably iterates live instances in ascending slot order.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| {
                if entry.active {
                    Some((
                        Handle::new(index as u32, entry.generation),
                        &mut entry.item,
                    ))
                } else {
                    None
                }
            })
    }

    /// Capacity configuration the pool was initialized with.
    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(prewarm: u32, cap: u32) -> Pool<u32> {
        Pool::initialize(PoolConfig::new(prewarm, cap), || 0).expect("valid config")
    }

    #[test]
    fn prewarm_beyond_cap_is_rejected() {
        let result = Pool::<u32>::initialize(PoolConfig::new(5, 2), || 0);
        assert_eq!(
            result.err(),
            Some(PoolConfigError::PrewarmExceedsCap {
                prewarm_count: 5,
                hard_cap: 2,
            }),
        );
    }

    #[test]
    fn prewarmed_instances_rest_in_the_inactive_set() {
        let pool = pool(3, 8);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.inactive_count(), 3);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn spawn_prefers_inactive_before_growth() {
        let mut pool = pool(1, 4);
        let first = pool.spawn(|| 99);
        assert!(first.evicted.is_none());
        assert_eq!(pool.len(), 1, "no growth while inactive available");

        let second = pool.spawn(|| 99);
        assert!(second.evicted.is_none());
        assert_eq!(pool.len(), 2, "growth once inactive exhausted");
    }

    #[test]
    fn capacity_invariant_holds_under_pressure() {
        let mut pool = pool(0, 3);
        let mut handles = Vec::new();
        for _ in 0..10 {
            let outcome = pool.spawn(|| 0);
            handles.push(outcome.handle);
            assert!(pool.active_count() + pool.inactive_count() <= 3);
        }
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn overflow_evicts_exactly_the_oldest_active() {
        let mut pool = pool(0, 2);
        let a = pool.spawn(|| 1).handle;
        let b = pool.spawn(|| 2).handle;
        assert_eq!(pool.oldest_active(), Some(a));

        let c = pool.spawn(|| 3);
        assert_eq!(c.evicted, Some(a), "oldest active instance is recycled");
        assert_eq!(c.handle.slot(), a.slot(), "evicted slot is reused");
        assert_eq!(pool.active_count(), 2);
        assert!(pool.get(a).is_none(), "evicted handle is stale");
        assert!(pool.get(b).is_some());
        assert!(pool.get(c.handle).is_some());
        assert_eq!(pool.oldest_active(), Some(b));
    }

    #[test]
    fn identity_invariant_until_despawn() {
        let mut pool = pool(0, 0);
        let first = pool.spawn(|| 7).handle;
        let second = pool.spawn(|| 8).handle;
        assert_ne!(first, second);

        assert!(pool.despawn(first));
        let reused = pool.spawn(|| 9).handle;
        assert_eq!(reused.slot(), first.slot());
        assert_ne!(
            reused.generation(),
            first.generation(),
            "recycled slot must carry a fresh generation",
        );
    }

    #[test]
    fn stale_despawn_is_a_no_op() {
        let mut pool = pool(0, 0);
        let handle = pool.spawn(|| 1).handle;
        assert!(pool.despawn(handle));
        assert!(!pool.despawn(handle), "second despawn is ignored");
        assert_eq!(pool.inactive_count(), 1, "instance returned exactly once");
    }

    #[test]
    fn despawned_items_keep_their_state_for_caller_reset() {
        let mut pool = pool(0, 0);
        let handle = pool.spawn(|| 41).handle;
        *pool.get_mut(handle).expect("live") = 42;
        assert!(pool.despawn(handle));

        let reused = pool.spawn(|| 0).handle;
        assert_eq!(pool.get(reused), Some(&42), "despawn resets no state");
    }

    #[test]
    fn unbounded_pool_never_evicts() {
        let mut pool = pool(0, 0);
        for _ in 0..64 {
            assert!(pool.spawn(|| 0).evicted.is_none());
        }
        assert_eq!(pool.active_count(), 64);
    }

    #[test]
    fn eviction_scenario_with_hard_cap_two() {
        // hard_cap=2, prewarm 0: spawn A, spawn B, then C evicts A and
        // occupies A's former slot while active_count stays at 2.
        let mut pool = pool(0, 2);
        let a = pool.spawn(|| 0).handle;
        let b = pool.spawn(|| 0).handle;
        assert_eq!(pool.active_count(), 2);

        let c = pool.spawn(|| 0);
        assert_eq!(c.evicted, Some(a));
        assert_eq!(c.handle.slot(), a.slot());
        assert_eq!(pool.active_count(), 2);
        assert!(pool.contains(b));
        assert!(pool.contains(c.handle));
        assert!(!pool.contains(a));
    }
}
