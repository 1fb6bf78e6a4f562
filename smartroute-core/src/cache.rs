//! Process-wide memoization of loaded road networks, keyed by place name.
//!
//! Each place owns a slot with its own lock. Concurrent requests for a place
//! that is not loaded yet queue on that slot, so the expensive build runs
//! once; other places load in parallel.

use std::{
    collections::VecDeque,
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError},
};

use hashbrown::HashMap;
use log::{debug, info};

use crate::{Error, loading::NetworkLoader, model::RoadNetwork};

type Slot = Arc<Mutex<Option<Arc<RoadNetwork>>>>;

#[derive(Default)]
struct Slots {
    by_place: HashMap<String, Slot>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
}

pub struct NetworkCache {
    loader: Box<dyn NetworkLoader>,
    slots: Mutex<Slots>,
    capacity: Option<NonZeroUsize>,
}

impl NetworkCache {
    /// Unbounded cache; networks live for the whole process
    pub fn new(loader: impl NetworkLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slots: Mutex::new(Slots::default()),
            capacity: None,
        }
    }

    /// Keeps at most `capacity` places, evicting the oldest inserted first
    #[must_use]
    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Returns the network for `place`, building it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the loader error. Nothing is cached for a failed build and
    /// the next request tries again.
    pub fn get_or_load(&self, place: &str) -> Result<Arc<RoadNetwork>, Error> {
        loop {
            let slot = self.slot(place);
            let mut network = lock(&slot);

            if let Some(cached) = network.as_ref() {
                debug!("Road network cache hit for '{place}'");
                return Ok(Arc::clone(cached));
            }

            // A failed build or an eviction may have dropped this slot while
            // we waited on it; building into it would be lost.
            if !self.is_current(place, &slot) {
                continue;
            }

            info!("Road network cache miss for '{place}', loading");
            return match self.loader.load(place) {
                Ok(loaded) => {
                    let loaded = Arc::new(loaded);
                    *network = Some(Arc::clone(&loaded));
                    Ok(loaded)
                }
                Err(error) => {
                    self.discard_empty(place, &slot);
                    Err(error)
                }
            };
        }
    }

    /// Stores an already built network, replacing any previous one
    pub fn insert(&self, place: &str, network: RoadNetwork) {
        let slot = self.slot(place);
        *lock(&slot) = Some(Arc::new(network));
    }

    /// Whether a network for `place` is loaded. A build in progress counts as not loaded.
    pub fn contains(&self, place: &str) -> bool {
        let slot = lock(&self.slots).by_place.get(place).cloned();
        slot.is_some_and(|slot| match slot.try_lock() {
            Ok(network) => network.is_some(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
            Err(TryLockError::WouldBlock) => false,
        })
    }

    /// Number of places with a slot, loaded or loading
    pub fn len(&self) -> usize {
        lock(&self.slots).by_place.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, place: &str) -> Slot {
        let mut slots = lock(&self.slots);
        if let Some(slot) = slots.by_place.get(place) {
            return Arc::clone(slot);
        }

        let slot = Slot::default();
        slots.by_place.insert(place.to_string(), Arc::clone(&slot));
        slots.order.push_back(place.to_string());

        if let Some(capacity) = self.capacity {
            evict_idle(&mut slots, capacity);
        }

        slot
    }

    fn is_current(&self, place: &str, slot: &Slot) -> bool {
        lock(&self.slots)
            .by_place
            .get(place)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Drops the slot of a failed build unless it was replaced meanwhile
    fn discard_empty(&self, place: &str, slot: &Slot) {
        let mut slots = lock(&self.slots);
        if slots
            .by_place
            .get(place)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.by_place.remove(place);
            slots.order.retain(|name| name != place);
        }
    }
}

/// Evicts the oldest places until `capacity` is met.
///
/// Places with a build in progress and the newest place are never evicted, so
/// the cache may stay over capacity until those builds finish.
fn evict_idle(slots: &mut Slots, capacity: NonZeroUsize) {
    let mut position = 0;
    while slots.order.len() > capacity.get() && position + 1 < slots.order.len() {
        let building = slots.by_place.get(&slots.order[position]).is_some_and(|slot| {
            matches!(slot.try_lock(), Err(TryLockError::WouldBlock))
        });
        if building {
            position += 1;
            continue;
        }

        if let Some(evicted) = slots.order.remove(position) {
            slots.by_place.remove(&evicted);
            info!("Evicted road network for '{evicted}'");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
