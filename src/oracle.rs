//! Primality queries against a built sieve

use std::fmt;

use crate::bit_table::{capacity_for, to_index, BitTable};
use crate::error::{Error, Result};

/// Composite table for a fixed bound, plus the bound itself.
///
/// Immutable once built; share it through `Arc` for concurrent readers.
pub struct Sieve<S = Box<[u8]>> {
    bound: u64,
    composites: Option<BitTable<S>>,
}

impl Sieve {
    pub(crate) fn trivial(bound: u64) -> Self {
        debug_assert!(bound < 3);
        Sieve {
            bound,
            composites: None,
        }
    }

    pub(crate) fn new(bound: u64, composites: BitTable) -> Self {
        debug_assert_eq!(composites.capacity() as u64, capacity_for(bound));
        Sieve {
            bound,
            composites: Some(composites),
        }
    }
}

impl<S: AsRef<[u8]>> Sieve<S> {
    /// Rebuilds a sieve view over packed composite bytes, e.g. a table
    /// baked in at build time. Bounds below 3 take an empty slice.
    pub fn from_raw_parts(bound: u64, bytes: S) -> Result<Self> {
        let capacity = capacity_for(bound);
        if capacity == 0 {
            if !bytes.as_ref().is_empty() {
                return Err(Error::invalid_capacity(
                    0u64,
                    format!("bound {bound} tracks no entries but bytes were supplied"),
                ));
            }
            return Ok(Sieve {
                bound,
                composites: None,
            });
        }
        let capacity = usize::try_from(capacity)
            .map_err(|_| Error::invalid_capacity(capacity, "does not fit the address space"))?;
        Ok(Sieve {
            bound,
            composites: Some(BitTable::from_raw_parts(capacity, bytes)?),
        })
    }

    /// Largest number this sieve answers for.
    #[inline]
    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// The composite table; `None` when the bound is below 3.
    #[inline]
    pub fn composites(&self) -> Option<&BitTable<S>> {
        self.composites.as_ref()
    }

    /// Whether `n` is prime. Fails with [`Error::QueryOutOfBound`] for `n > bound`.
    pub fn is_prime(&self, n: u64) -> Result<bool> {
        if n > self.bound {
            return Err(Error::QueryOutOfBound {
                n,
                bound: self.bound,
            });
        }
        match n {
            0 | 1 => Ok(false),
            2 => Ok(true),
            n if n % 2 == 0 => Ok(false),
            n => match &self.composites {
                Some(table) => Ok(!table.get(to_index(n))?),
                // unreachable: odd n >= 3 implies bound >= 3
                None => Err(Error::IndexOutOfRange {
                    index: to_index(n),
                    capacity: 0,
                }),
            },
        }
    }
}

impl<S: AsRef<[u8]>, T: AsRef<[u8]>> PartialEq<Sieve<T>> for Sieve<S> {
    fn eq(&self, other: &Sieve<T>) -> bool {
        self.bound == other.bound
            && match (&self.composites, &other.composites) {
                (Some(a), Some(b)) => a == b,
                (None, None) => true,
                _ => false,
            }
    }
}

impl<S: AsRef<[u8]>> Eq for Sieve<S> {}

impl<S: AsRef<[u8]>> fmt::Debug for Sieve<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sieve")
            .field("bound", &self.bound)
            .field("composites", &self.composites)
            .finish()
    }
}

/// Free-function form of [`Sieve::is_prime`].
#[inline]
pub fn is_prime<S: AsRef<[u8]>>(sieve: &Sieve<S>, n: u64) -> Result<bool> {
    sieve.is_prime(n)
}
