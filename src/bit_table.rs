//! Packed flags for odd numbers starting at 3.
//!
//! Bit `i` of a [`BitTable`] describes the odd number `2·i + 3`. Bits are
//! stored LSB first, eight per byte, and padding bits past `capacity` are
//! always zero.

use std::fmt;

use crate::error::{Error, Result};

/// Maps an odd number `n >= 3` to its table index.
///
/// Fails with [`Error::NotOddNumber`] for anything else, and with
/// [`Error::IndexOutOfRange`] if the index does not fit `usize`.
pub fn try_to_index(n: u64) -> Result<usize> {
    if n < 3 || n % 2 == 0 {
        return Err(Error::NotOddNumber { n });
    }
    usize::try_from((n - 3) / 2).map_err(|_| Error::IndexOutOfRange {
        index: usize::MAX,
        capacity: BitTable::MAX_CAPACITY,
    })
}

/// Unchecked form of [`try_to_index`] for callers that already hold an odd
/// `n >= 3` within a table's bound.
#[inline(always)]
pub(crate) const fn to_index(n: u64) -> usize {
    debug_assert!(n >= 3 && n % 2 == 1, "`n` has no table entry");
    ((n - 3) / 2) as usize
}

/// Maps a table index back to the odd number it describes.
#[inline(always)]
pub const fn to_number(index: usize) -> u64 {
    index as u64 * 2 + 3
}

/// Number of entries a table for bound `bound` tracks, i.e. ⌈(N−1)/2⌉.
///
/// Zero for bounds below 3.
#[inline]
pub const fn capacity_for(bound: u64) -> u64 {
    if bound < 3 {
        0
    } else {
        bound / 2
    }
}

/// A fixed-capacity set of flags packed into bytes.
///
/// Storage is either owned (`Box<[u8]>`, the default) or borrowed, which is
/// how tables baked into the binary are read without copying.
pub struct BitTable<S = Box<[u8]>> {
    bytes: S,
    capacity: usize,
}

impl BitTable {
    /// Largest capacity accepted; keeps the byte allocation within `isize::MAX`.
    pub const MAX_CAPACITY: usize = isize::MAX as usize;

    /// All-false table with `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        Ok(BitTable {
            bytes: vec![0u8; capacity.div_ceil(8)].into_boxed_slice(),
            capacity,
        })
    }

    /// Table whose bit `i` is the `i`-th flag; missing trailing flags are false.
    pub fn from_flags<I>(capacity: usize, flags: I) -> Result<Self>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut table = Self::new(capacity)?;
        for (index, flag) in flags.into_iter().enumerate() {
            if index >= capacity {
                return Err(Error::invalid_capacity(
                    capacity,
                    "more flags supplied than the table holds",
                ));
            }
            if flag {
                table.set(index);
            }
        }
        Ok(table)
    }

    /// Entry-wise OR of two tables of equal capacity.
    pub fn merge_or<A, B>(a: &BitTable<A>, b: &BitTable<B>) -> Result<Self>
    where
        A: AsRef<[u8]>,
        B: AsRef<[u8]>,
    {
        let mut out = BitTable {
            bytes: Box::from(a.as_bytes()),
            capacity: a.capacity,
        };
        out.merge_or_assign(b)?;
        Ok(out)
    }

    /// In-place OR, used by the builder's accumulator.
    pub(crate) fn merge_or_assign<B: AsRef<[u8]>>(&mut self, other: &BitTable<B>) -> Result<()> {
        if self.capacity != other.capacity {
            return Err(Error::CapacityMismatch {
                left: self.capacity,
                right: other.capacity,
            });
        }
        for (dst, src) in self.bytes.iter_mut().zip(other.as_bytes()) {
            *dst |= src;
        }
        Ok(())
    }

    /// Sets bit `index`. Only reachable while a table is under construction.
    #[inline(always)]
    pub(crate) fn set(&mut self, index: usize) {
        debug_assert!(index < self.capacity, "`index` past capacity, {index}");
        self.bytes[index / 8] |= 1u8 << (index % 8);
    }
}

impl<S: AsRef<[u8]>> BitTable<S> {
    /// Wraps pre-packed bytes. The length must be exactly ⌈capacity/8⌉ and
    /// the padding bits of the last byte must be clear.
    pub fn from_raw_parts(capacity: usize, bytes: S) -> Result<Self> {
        check_capacity(capacity)?;
        let raw = bytes.as_ref();
        if raw.len() != capacity.div_ceil(8) {
            return Err(Error::invalid_capacity(
                capacity,
                format!("expected {} bytes, got {}", capacity.div_ceil(8), raw.len()),
            ));
        }
        let tail = capacity % 8;
        if tail != 0 && raw[raw.len() - 1] >> tail != 0 {
            return Err(Error::invalid_capacity(capacity, "padding bits are set"));
        }
        Ok(BitTable { bytes, capacity })
    }

    /// Number of tracked entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Packed backing bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Bounds-checked read of entry `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.capacity {
            return Err(Error::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok((self.as_bytes()[index / 8] >> (index % 8)) & 1 == 1)
    }

    /// Number of entries set to `true`.
    pub fn count_ones(&self) -> usize {
        self.as_bytes().iter().map(|b| b.count_ones() as usize).sum()
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(Error::invalid_capacity(capacity, "capacity must be non-zero"));
    }
    if capacity > BitTable::MAX_CAPACITY {
        return Err(Error::invalid_capacity(
            capacity,
            format!("exceeds maximum of {}", BitTable::MAX_CAPACITY),
        ));
    }
    Ok(())
}

impl<S: AsRef<[u8]>, T: AsRef<[u8]>> PartialEq<BitTable<T>> for BitTable<S> {
    fn eq(&self, other: &BitTable<T>) -> bool {
        self.capacity == other.capacity && self.as_bytes() == other.as_bytes()
    }
}

impl<S: AsRef<[u8]>> Eq for BitTable<S> {}

impl<S: AsRef<[u8]>> fmt::Debug for BitTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitTable")
            .field("capacity", &self.capacity)
            .field("ones", &self.count_ones())
            .finish()
    }
}
