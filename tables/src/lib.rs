//! Composite tables for a few fixed bounds, computed by `build.rs` with
//! [`odd_sieve::SieveBuilder`] and compiled in as static bytes.
//!
//! Nothing is sieved at runtime: [`sieve`] wraps the baked bytes in a
//! borrowed [`Sieve`] view.

use odd_sieve::{Result, Sieve};

include!(concat!(env!("OUT_DIR"), "/tables.rs"));

/// Baked sieve for `bound`, or `None` if that bound wasn't baked.
pub fn sieve(bound: u64) -> Option<Result<Sieve<&'static [u8]>>> {
    BAKED
        .iter()
        .find(|(baked, _)| *baked == bound)
        .map(|&(bound, bytes)| Sieve::from_raw_parts(bound, bytes))
}

/// Primality of `n <= 101` from the baked table.
pub fn is_prime(n: u64) -> Result<bool> {
    Sieve::from_raw_parts(BOUND_101, &COMPOSITES_101[..])?.is_prime(n)
}
