//! Bit-packed sieve of Eratosthenes over odd numbers with O(1) primality
//! lookups.
//!
//! A [`SieveBuilder`] computes, for a fixed bound `N`, a [`BitTable`] with one
//! bit per odd number in `[3, N]` marking composites. A [`Sieve`] answers
//! [`is_prime`] queries against it: 0, 1, 2 and even numbers are decided
//! directly, odd numbers by a single bit read.
//!
//! ```
//! use odd_sieve::SieveBuilder;
//!
//! let sieve = SieveBuilder::default().build(101).unwrap();
//! assert!(sieve.is_prime(29).unwrap());
//! assert!(!sieve.is_prime(91).unwrap());
//! assert!(sieve.is_prime(102).is_err());
//! ```
//!
//! Tables are immutable once built. [`SieveCache`] memoizes them per bound,
//! and the `odd-sieve-tables` crate bakes a few of them in at build time.

pub mod bit_table;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod oracle;

pub use bit_table::{capacity_for, to_number, try_to_index, BitTable};
pub use builder::{factor_table, SieveBuilder};
pub use cache::SieveCache;
pub use config::{FactorTables, SieveConfig, DEFAULT_MAX_BOUND};
pub use error::{Error, Result};
pub use oracle::{is_prime, Sieve};
