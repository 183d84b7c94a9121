//! Cross-checks sieve answers against independent primality tests.

use odd_sieve::{is_prime, Error, SieveBuilder, SieveCache, SieveConfig};

fn trial_division(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

/// Plain boolean sieve over every integer
fn classic_sieve(limit: usize) -> Vec<bool> {
    let mut prime = vec![true; limit + 1];
    prime[0] = false;
    if limit >= 1 {
        prime[1] = false;
    }
    for p in 2..=limit {
        if prime[p] {
            for multiple in (p * p..=limit).step_by(p) {
                prime[multiple] = false;
            }
        }
    }
    prime
}

#[test]
fn matches_classic_sieve_to_1000() {
    let sieve = SieveBuilder::default().build(1_000).unwrap();
    let expected = classic_sieve(1_000);
    for n in 0..=1_000u64 {
        assert_eq!(is_prime(&sieve, n).unwrap(), expected[n as usize], "n = {n}");
    }
    let count = (0..=1_000).filter(|&n| sieve.is_prime(n).unwrap()).count();
    assert_eq!(count, 168);
}

#[test]
fn matches_trial_division_for_every_small_bound() {
    for bound in 0..=200u64 {
        let sieve = SieveBuilder::default().build(bound).unwrap();
        for n in 0..=bound {
            assert_eq!(sieve.is_prime(n).unwrap(), trial_division(n), "bound {bound}, n {n}");
        }
        assert!(matches!(
            sieve.is_prime(bound + 1),
            Err(Error::QueryOutOfBound { .. })
        ));
    }
}

#[test]
fn known_counts() {
    let cache = SieveCache::new(SieveConfig::default());
    cache.prebuild(&[100, 10_000, 100_000]).unwrap();
    for (bound, expected) in [(100u64, 25usize), (10_000, 1_229), (100_000, 9_592)] {
        let sieve = cache.get_or_build(bound).unwrap();
        let count = (0..=bound).filter(|&n| sieve.is_prime(n).unwrap()).count();
        assert_eq!(count, expected, "π({bound})");
    }
}

#[test]
fn shared_across_threads() {
    let cache = SieveCache::default();
    let sieve = cache.get_or_build(50_000).unwrap();
    std::thread::scope(|s| {
        for t in 0..4u64 {
            let sieve = &sieve;
            s.spawn(move || {
                for n in (t..=50_000).step_by(4) {
                    assert_eq!(sieve.is_prime(n).unwrap(), trial_division(n));
                }
            });
        }
    });
}
