//! Trace-driven cache simulator CLI.
//!
//! This binary feeds a memory trace through one cache module. It performs:
//! 1. **Run:** Replay a trace against a cache and print the statistics report.
//! 2. **Check:** Validate a configuration and print the derived geometry.
//!
//! The driver owns the logical clock (one cycle per trace record). Every miss is
//! followed by an install and a replay of the access, the retry-after-fill protocol
//! the cache expects.

mod trace;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use cachesim_core::common::{Cycle, LineAddr};
use cachesim_core::{AccessResult, Cache, CacheConfig, ReplacementPolicy};
use clap::{Args, Parser, Subcommand};
use tracing::{info, trace};
use tracing_subscriber::EnvFilter;

use crate::trace::TraceRecord;

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory trace against a single cache and print its statistics.\n\nTrace records are `<core> <R|W> <hex address>`, one per line.\n\nExamples:\n  cachesim run -t traces/mcf.trace\n  cachesim run -t traces/mix.trace --policy swp --cores 2 --swp-core0-ways 12 --ways 16\n  cachesim check --config l2.json\n\nSet RUST_LOG=cachesim_core=trace for per-access logging."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print the statistics report.
    Run {
        /// Trace file, or `-` for stdin.
        #[arg(short, long)]
        trace: PathBuf,

        /// Label prefixed to every statistic.
        #[arg(short, long, default_value = "DCACHE")]
        label: String,

        /// Skip the access replay after each install (write misses then leave lines clean).
        #[arg(long)]
        no_replay: bool,

        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Validate a configuration and print the derived geometry.
    Check {
        #[command(flatten)]
        cache: CacheArgs,
    },
}

/// Cache configuration: a JSON file, individual overrides, or both.
#[derive(Args, Debug)]
struct CacheArgs {
    /// JSON cache configuration; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total size in bytes.
    #[arg(long)]
    size: Option<u64>,

    /// Associativity.
    #[arg(long)]
    ways: Option<usize>,

    /// Line size in bytes.
    #[arg(long)]
    line: Option<u64>,

    /// Replacement policy: lru, random, swp, dwp (or 0-3).
    #[arg(long)]
    policy: Option<ReplacementPolicy>,

    /// Number of cores in the trace.
    #[arg(long)]
    cores: Option<u32>,

    /// Ways per set reserved for core 0 under partitioning.
    #[arg(long)]
    swp_core0_ways: Option<usize>,

    /// Seed for random replacement.
    #[arg(long)]
    seed: Option<u64>,
}

impl CacheArgs {
    /// Resolves the configuration file (if any) and applies flag overrides.
    fn resolve(&self) -> cachesim_core::common::Result<CacheConfig> {
        let mut config = match &self.config {
            Some(path) => CacheConfig::from_json_file(path)?,
            None => CacheConfig::default(),
        };
        if let Some(size) = self.size {
            config.size_bytes = size;
        }
        if let Some(ways) = self.ways {
            config.ways = ways;
        }
        if let Some(line) = self.line {
            config.line_bytes = line;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(cores) = self.cores {
            config.partition.num_cores = cores;
        }
        if let Some(quota) = self.swp_core0_ways {
            config.partition.core0_ways = Some(quota);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            trace,
            label,
            no_replay,
            cache,
        } => cmd_run(&trace, &label, !no_replay, &cache),
        Commands::Check { cache } => cmd_check(&cache),
    }
}

/// Builds the cache, exiting with a message on a configuration error.
fn build_cache(args: &CacheArgs) -> (CacheConfig, Cache) {
    let built = args
        .resolve()
        .and_then(|config| Cache::new(&config).map(|cache| (config, cache)));
    match built {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Validates the configuration and prints its geometry.
fn cmd_check(args: &CacheArgs) {
    let (config, cache) = build_cache(args);
    let geo = cache.geometry();
    println!("size        {} bytes", config.size_bytes);
    println!("line        {} bytes", config.line_bytes);
    println!("ways        {}", geo.ways());
    println!("sets        {}", geo.num_sets());
    println!("index bits  {}", geo.index_bits());
    println!("policy      {}", cache.policy());
    if let Some(quota) = cache.partition_quota() {
        println!("core0 ways  {quota}");
    }
}

/// Replays a trace through the cache and prints the report.
fn cmd_run(trace_path: &Path, label: &str, replay: bool, args: &CacheArgs) {
    let (config, mut cache) = build_cache(args);

    let reader: Box<dyn BufRead> = if trace_path.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        match File::open(trace_path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("Error: cannot open trace {}: {e}", trace_path.display());
                process::exit(1);
            }
        }
    };

    info!(
        trace = %trace_path.display(),
        size = config.size_bytes,
        ways = config.ways,
        line = config.line_bytes,
        policy = %config.policy,
        "starting run"
    );

    let mut cycle: Cycle = 0;
    let mut writebacks: u64 = 0;
    for record in trace::records(reader) {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        };
        cycle += 1;
        if step(&mut cache, &config, record, cycle, replay) {
            writebacks += 1;
        }
    }

    info!(cycles = cycle, writebacks, "run complete");
    cache.print_stats(label);
}

/// Applies one trace record. Returns `true` if the fill displaced a dirty line.
fn step(
    cache: &mut Cache,
    config: &CacheConfig,
    record: TraceRecord,
    now: Cycle,
    replay: bool,
) -> bool {
    let line = LineAddr::from_byte_addr(record.addr, config.line_bytes).val();
    if cache.access(line, record.is_write, record.core_id, now) == AccessResult::Hit {
        return false;
    }

    let evicted = cache.install(line, record.is_write, record.core_id, now);
    if replay {
        let _ = cache.access(line, record.is_write, record.core_id, now);
    }

    match evicted {
        Some(victim) if victim.needs_writeback() => {
            trace!(addr = victim.addr.val(), owner = victim.line.core_id, "writeback");
            true
        }
        _ => false,
    }
}
