//! Memoized sieves keyed by bound.
//!
//! Each bound owns a slot guarded by its own mutex, so a bound is built at
//! most once while different bounds build in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info};

use crate::builder::SieveBuilder;
use crate::config::SieveConfig;
use crate::error::Result;
use crate::oracle::Sieve;

type Slot = Arc<Mutex<Option<Arc<Sieve>>>>;

#[derive(Debug, Default)]
pub struct SieveCache {
    builder: SieveBuilder,
    slots: Mutex<HashMap<u64, Slot>>,
}

impl SieveCache {
    pub fn new(config: SieveConfig) -> Self {
        SieveCache {
            builder: SieveBuilder::new(config),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the sieve for `bound`, building it on first use.
    ///
    /// A failed build is not stored; the next call fails the same way.
    pub fn get_or_build(&self, bound: u64) -> Result<Arc<Sieve>> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(bound).or_default())
        };

        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sieve) = slot.as_ref() {
            debug!(bound, "sieve cache hit");
            return Ok(Arc::clone(sieve));
        }

        debug!(bound, "sieve cache miss");
        let sieve = match self.builder.build(bound) {
            Ok(sieve) => Arc::new(sieve),
            Err(e) => {
                drop(slot);
                self.forget_empty(bound);
                return Err(e);
            }
        };
        *slot = Some(Arc::clone(&sieve));
        Ok(sieve)
    }

    /// Drops the slot for `bound` unless a sieve was stored in it meanwhile.
    fn forget_empty(&self, bound: u64) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let empty = slots.get(&bound).is_some_and(|slot| {
            slot.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_none()
        });
        if empty {
            slots.remove(&bound);
        }
    }

    /// Builds every missing bound, independent bounds in parallel.
    pub fn prebuild(&self, bounds: &[u64]) -> Result<()> {
        info!(count = bounds.len(), "prebuilding sieves");
        bounds
            .par_iter()
            .try_for_each(|&bound| self.get_or_build(bound).map(drop))
    }

    /// Whether a finished sieve is stored for `bound`.
    pub fn contains(&self, bound: u64) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(&bound).is_some_and(|slot| {
            slot.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some()
        })
    }

    /// Number of finished sieves.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn builds_once_per_bound() {
        let cache = SieveCache::default();
        assert!(cache.is_empty());
        let a = cache.get_or_build(101).unwrap();
        let b = cache.get_or_build(101).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.contains(101));
        assert!(!cache.contains(100));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn prebuild_in_parallel() {
        let cache = SieveCache::default();
        let bounds = [2, 7, 71, 101, 1_000, 1_000, 10_000];
        cache.prebuild(&bounds).unwrap();
        assert_eq!(cache.len(), 6);
        for bound in bounds {
            assert_eq!(cache.get_or_build(bound).unwrap().bound(), bound);
        }
        assert!(cache.get_or_build(10_000).unwrap().is_prime(9_973).unwrap());
    }

    #[test]
    fn failed_build_is_not_stored() {
        let cache = SieveCache::new(SieveConfig::default().with_max_bound(50));
        assert!(matches!(cache.prebuild(&[10, 51]), Err(Error::InvalidCapacity { .. })));
        assert!(!cache.contains(51));
        assert!(cache.get_or_build(51).is_err());
        assert!(cache.get_or_build(10).is_ok());
    }

    #[test]
    fn rejected_bounds_leave_no_slots() {
        let cache = SieveCache::new(SieveConfig::default().with_max_bound(50));
        for bound in 51..151 {
            assert!(cache.get_or_build(bound).is_err());
        }
        cache.get_or_build(7).unwrap();
        assert_eq!(cache.slots.lock().unwrap().len(), 1);
        assert_eq!(cache.len(), 1);
    }
}
