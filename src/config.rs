//! Sieve construction settings

use clap::ValueEnum;

/// Default ceiling on the bound a builder accepts (a ~256 MiB table).
pub const DEFAULT_MAX_BOUND: u64 = u32::MAX as u64;

/// How each surviving factor's multiples reach the accumulator.
///
/// Both strategies produce bit-identical tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FactorTables {
    /// Build a full factor table per factor and OR-merge it in
    Merged,
    /// Step through the factor's odd multiples directly in the accumulator
    Strided,
}

impl Default for FactorTables {
    fn default() -> Self {
        if cfg!(feature = "literal-merge") {
            FactorTables::Merged
        } else {
            FactorTables::Strided
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SieveConfig {
    /// Skip factors already marked composite. Never changes the output.
    pub skip_known_composites: bool,
    pub factor_tables: FactorTables,
    /// Largest bound that may be built
    pub max_bound: u64,
}

impl Default for SieveConfig {
    fn default() -> Self {
        SieveConfig {
            skip_known_composites: true,
            factor_tables: FactorTables::default(),
            max_bound: DEFAULT_MAX_BOUND,
        }
    }
}

impl SieveConfig {
    pub fn with_skip_known_composites(mut self, skip: bool) -> Self {
        self.skip_known_composites = skip;
        self
    }

    pub fn with_factor_tables(mut self, factor_tables: FactorTables) -> Self {
        self.factor_tables = factor_tables;
        self
    }

    pub fn with_max_bound(mut self, max_bound: u64) -> Self {
        self.max_bound = max_bound;
        self
    }
}
