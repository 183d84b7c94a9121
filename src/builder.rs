//! Composite table construction for a fixed bound.
//!
//! Factors are visited in increasing odd order starting at 3. A factor
//! already marked composite is skipped, since its smallest prime factor
//! has marked all of its multiples. Skipping never changes the result.

use std::time::Instant;

use tracing::{debug, trace};

use crate::bit_table::{capacity_for, to_index, to_number, BitTable};
use crate::config::{FactorTables, SieveConfig};
use crate::error::{Error, Result};
use crate::oracle::Sieve;

/// Builds sieves according to a [`SieveConfig`].
#[derive(Debug, Clone, Default)]
pub struct SieveBuilder {
    config: SieveConfig,
}

impl SieveBuilder {
    pub fn new(config: SieveConfig) -> Self {
        SieveBuilder { config }
    }

    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    /// Builds the sieve for `bound`.
    ///
    /// Bounds below 3 give a sieve without a table; the oracle answers them
    /// from its fast paths.
    pub fn build(&self, bound: u64) -> Result<Sieve> {
        if bound < 3 {
            debug!(bound, "bound below 3, no odd composites to track");
            return Ok(Sieve::trivial(bound));
        }
        if bound > self.config.max_bound {
            return Err(Error::invalid_capacity(
                capacity_for(bound),
                format!("bound {bound} exceeds configured maximum {}", self.config.max_bound),
            ));
        }
        let capacity = usize::try_from(capacity_for(bound)).map_err(|_| {
            Error::invalid_capacity(capacity_for(bound), "does not fit the address space")
        })?;

        let start = Instant::now();
        let strategy = self.config.factor_tables;

        let mut composites = match strategy {
            FactorTables::Merged => factor_table(capacity, 3)?,
            FactorTables::Strided => {
                let mut table = BitTable::new(capacity)?;
                mark_multiples(&mut table, 3);
                table
            }
        };

        let (mut merged, mut skipped) = (1u64, 0u64);
        for factor in (5..=bound).step_by(2) {
            if self.config.skip_known_composites && composites.get(to_index(factor))? {
                trace!(factor, "skipping known composite factor");
                skipped += 1;
                continue;
            }
            match strategy {
                FactorTables::Merged => {
                    composites.merge_or_assign(&factor_table(capacity, factor)?)?;
                }
                FactorTables::Strided => mark_multiples(&mut composites, factor),
            }
            merged += 1;
        }

        debug!(
            bound,
            capacity,
            merged,
            skipped,
            ?strategy,
            elapsed = ?start.elapsed(),
            "built sieve"
        );
        Ok(Sieve::new(bound, composites))
    }
}

/// Table marking the odd strict multiples of `factor` that are greater than it.
///
/// `factor` must be an odd number >= 3, else [`Error::NotOddNumber`].
pub fn factor_table(capacity: usize, factor: u64) -> Result<BitTable> {
    if factor < 3 || factor % 2 == 0 {
        return Err(Error::NotOddNumber { n: factor });
    }
    BitTable::from_flags(
        capacity,
        (0..capacity).map(|i| {
            let n = to_number(i);
            n % factor == 0 && n > factor
        }),
    )
}

/// Marks `3F, 5F, 7F, …` in place: consecutive odd multiples are `2F` apart,
/// which is a stride of `F` in index space.
fn mark_multiples(table: &mut BitTable, factor: u64) {
    let Some(first) = factor.checked_mul(3) else {
        return;
    };
    let Ok(stride) = usize::try_from(factor) else {
        return;
    };
    let capacity = table.capacity();
    let start = to_index(first);
    if first > to_number(capacity - 1) {
        return;
    }
    for index in (start..capacity).step_by(stride) {
        table.set(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composites(bound: u64, config: SieveConfig) -> Vec<u64> {
        let sieve = SieveBuilder::new(config).build(bound).unwrap();
        let table = sieve.composites().unwrap();
        (0..table.capacity())
            .filter(|&i| table.get(i).unwrap())
            .map(to_number)
            .collect()
    }

    #[test]
    fn factor_table_marks_strict_multiples() {
        let table = factor_table(20, 5).unwrap();
        let marked: Vec<u64> = (0..20).filter(|&i| table.get(i).unwrap()).map(to_number).collect();
        assert_eq!(marked, vec![15, 25, 35]);
    }

    #[test]
    fn factor_table_rejects_non_odd_factors() {
        for factor in [0, 1, 2, 4, 10] {
            assert_eq!(
                factor_table(10, factor),
                Err(Error::NotOddNumber { n: factor })
            );
        }
        assert!(factor_table(10, 3).is_ok());
    }

    #[test]
    fn marks_odd_composites_up_to_bound() {
        assert_eq!(
            composites(49, SieveConfig::default()),
            vec![9, 15, 21, 25, 27, 33, 35, 39, 45, 49]
        );
    }

    #[test]
    fn merged_matches_strided() {
        let merged = SieveConfig::default().with_factor_tables(FactorTables::Merged);
        let strided = SieveConfig::default().with_factor_tables(FactorTables::Strided);
        for bound in [3, 4, 9, 10, 25, 101, 257, 1_000] {
            assert_eq!(composites(bound, merged.clone()), composites(bound, strided.clone()), "bound {bound}");
        }
    }

    #[test]
    fn skipping_does_not_change_output() {
        for strategy in [FactorTables::Merged, FactorTables::Strided] {
            let base = SieveConfig::default().with_factor_tables(strategy);
            for bound in [3, 15, 100, 101, 999] {
                let with = SieveBuilder::new(base.clone()).build(bound).unwrap();
                let without = SieveBuilder::new(base.clone().with_skip_known_composites(false))
                    .build(bound)
                    .unwrap();
                assert_eq!(with.composites().unwrap().as_bytes(), without.composites().unwrap().as_bytes());
            }
        }
    }

    #[test]
    fn even_bound_tracks_next_odd() {
        // capacity ⌈(N−1)/2⌉ covers N + 1 when N is even
        let sieve = SieveBuilder::default().build(14).unwrap();
        let table = sieve.composites().unwrap();
        assert_eq!(table.capacity(), 7);
        assert!(table.get(to_index(15)).unwrap());
    }

    #[test]
    fn small_bounds_have_no_table() {
        for bound in 0..3 {
            let sieve = SieveBuilder::default().build(bound).unwrap();
            assert!(sieve.composites().is_none());
        }
    }

    #[test]
    fn rejects_bound_above_max() {
        let builder = SieveBuilder::new(SieveConfig::default().with_max_bound(100));
        assert!(matches!(builder.build(101), Err(Error::InvalidCapacity { capacity: 50, .. })));
        assert!(builder.build(100).is_ok());
    }
}
