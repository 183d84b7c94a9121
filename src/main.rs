use std::fs::File;
use std::hint::black_box;
use std::io::{stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use odd_sieve::{FactorTables, Sieve, SieveBuilder, SieveCache, SieveConfig, DEFAULT_MAX_BOUND};
use rand::{thread_rng, Rng};
use tracing::{error, info};

/// Precomputed odd-only sieve with O(1) primality lookups
#[derive(Parser, Debug)]
#[command(name = "odd-sieve")]
struct Cli {
    #[command(flatten)]
    sieve: SieveArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SieveArgs {
    /// How each factor's multiples are merged into the table
    #[arg(long, value_enum, default_value_t = FactorTables::default(), env = "ODD_SIEVE_FACTOR_TABLES")]
    factor_tables: FactorTables,

    /// Keep sieving with factors already known to be composite
    #[arg(long, env = "ODD_SIEVE_NO_SKIP")]
    no_skip: bool,

    /// Largest bound a table may be built for
    #[arg(long, default_value_t = DEFAULT_MAX_BOUND, env = "ODD_SIEVE_MAX_BOUND")]
    max_bound: u64,
}

impl SieveArgs {
    fn config(&self) -> SieveConfig {
        SieveConfig::default()
            .with_factor_tables(self.factor_tables)
            .with_skip_known_composites(!self.no_skip)
            .with_max_bound(self.max_bound)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer primality queries against one table
    Check {
        #[arg(long, env = "ODD_SIEVE_BOUND")]
        bound: u64,
        #[arg(required = true)]
        numbers: Vec<u64>,
    },
    /// Build several tables in parallel and summarize them
    Stats {
        #[arg(long = "bound", required = true)]
        bounds: Vec<u64>,
    },
    /// Time batches of random lookups until interrupted
    Bench {
        #[arg(long, env = "ODD_SIEVE_BOUND")]
        bound: u64,
        /// Lookups per timed batch
        #[arg(long, default_value_t = 1 << 16)]
        batch: usize,
        /// Per-batch timings are written here
        #[arg(long, default_value = "stats.tsv")]
        stats: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("odd_sieve=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.sieve.config();
    info!(?config, "sieve configuration");

    match cli.command {
        Command::Check { bound, numbers } => check(config, bound, &numbers),
        Command::Stats { bounds } => stats(config, &bounds).map(|()| ExitCode::SUCCESS),
        Command::Bench {
            bound,
            batch,
            stats,
        } => bench(config, bound, batch, stats).map(|()| ExitCode::SUCCESS),
    }
}

fn check(config: SieveConfig, bound: u64, numbers: &[u64]) -> Result<ExitCode> {
    let sieve = SieveBuilder::new(config)
        .build(bound)
        .with_context(|| format!("building sieve for bound {bound}"))?;

    let mut code = ExitCode::SUCCESS;
    for &n in numbers {
        match sieve.is_prime(n) {
            Ok(true) => println!("{n}: prime"),
            Ok(false) => println!("{n}: composite"),
            Err(e) => {
                error!(n, "{e}");
                code = ExitCode::FAILURE;
            }
        }
    }
    Ok(code)
}

fn stats(config: SieveConfig, bounds: &[u64]) -> Result<()> {
    let cache = SieveCache::new(config);
    let start = Instant::now();
    cache.prebuild(bounds)?;
    info!(elapsed = ?start.elapsed(), tables = cache.len(), "prebuilt");

    println!("bound\tcapacity\tbytes\tcomposites\tprimes");
    for &bound in bounds {
        let sieve = cache.get_or_build(bound)?;
        let (capacity, bytes, composites) = sieve
            .composites()
            .map(|t| (t.capacity(), t.as_bytes().len(), t.count_ones()))
            .unwrap_or_default();
        println!(
            "{bound}\t{capacity}\t{bytes}\t{composites}\t{}",
            prime_count(&sieve)?
        );
    }
    Ok(())
}

/// π(bound) by querying every number; the table alone can't tell because
/// an even bound tracks one odd number past it.
fn prime_count(sieve: &Sieve) -> odd_sieve::Result<u64> {
    let mut count = 0;
    for n in 0..=sieve.bound() {
        count += u64::from(sieve.is_prime(n)?);
    }
    Ok(count)
}

fn bench(config: SieveConfig, bound: u64, batch: usize, stats: PathBuf) -> Result<()> {
    let mut stats =
        File::create(&stats).with_context(|| format!("creating {}", stats.display()))?;

    let start = Instant::now();
    let sieve = SieveBuilder::new(config).build(bound)?;
    println!("Built table for {bound} in {:.2?}", start.elapsed());

    let last_ctrlc = Arc::new(Mutex::new(Instant::now()));
    ctrlc::set_handler(move || {
        let _ = stdout().flush();

        let now = Instant::now();
        let mut lock = last_ctrlc.lock().unwrap_or_else(|e| e.into_inner());
        let last = *lock;
        *lock = now;

        if now - last < Duration::from_secs(2) {
            println!();
            std::process::exit(0);
        }
    })
    .context("setting Ctrl-C handler")?;

    println!("Set Ctrl-C handler (press twice to exit)");

    let mut rng = thread_rng();
    let mut queries = vec![0u64; batch];
    let mut total_elapsed = Duration::ZERO;

    for i in 1u32.. {
        queries.iter_mut().for_each(|q| *q = rng.gen_range(0..=bound));

        let start = Instant::now();
        let mut primes = 0usize;
        for &n in &queries {
            primes += usize::from(black_box(sieve.is_prime(n))?);
        }
        let e = start.elapsed();

        total_elapsed += e;
        writeln!(stats, "{primes}\t{e:?}")?;
        print!(
            "Average batch: {:.2?}  ({:.2?}/lookup, batches: {i})                \r",
            total_elapsed / i,
            per_lookup(total_elapsed / i, batch)
        );
    }
    Ok(())
}

/// Average time per lookup in one batch; batch sizes past `u32::MAX` saturate.
fn per_lookup(batch_elapsed: Duration, batch: usize) -> Duration {
    batch_elapsed / u32::try_from(batch.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_lookup_average() {
        assert_eq!(per_lookup(Duration::from_micros(64), 64), Duration::from_micros(1));
        assert_eq!(per_lookup(Duration::from_micros(5), 0), Duration::from_micros(5));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn per_lookup_saturates_huge_batches() {
        let elapsed = Duration::from_secs(u64::from(u32::MAX));
        assert_eq!(per_lookup(elapsed, 1 << 32), Duration::from_secs(1));
        assert_eq!(per_lookup(elapsed, usize::MAX), Duration::from_secs(1));
    }
}
