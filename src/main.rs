//! CLI entry point for Vitality Sim

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vitality_sim::{
    config::BuildConfig,
    simulation::{run_batch, simulate_combat_verbose},
    stats::BatchSummary,
};

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "vitality-sim")]
#[command(version = "0.1")]
#[command(about = "Turn-based combat simulator for the Vitality System", long_about = None)]
struct Args {
    /// Path to the build configuration file (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Number of simulations to run
    #[arg(short, long, default_value = "100")]
    num_runs: usize,

    /// Use parallel processing
    #[arg(short, long, default_value = "false")]
    parallel: bool,

    /// Worker threads for parallel runs (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Override the build's seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the build's turn cap
    #[arg(long)]
    max_turns: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show timing information
    #[arg(short, long, default_value = "false")]
    timing: bool,

    /// Resolve a single combat and print every turn event
    #[arg(long, default_value = "false")]
    trace: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args = Args::parse();

    let mut config = match BuildConfig::from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }

    let registry = match config.registry() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building attack registry: {}", e);
            std::process::exit(1);
        }
    };

    if args.trace {
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        let (result, events) = match simulate_combat_verbose(&registry, &config, seed) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        match args.output {
            OutputFormat::Text => {
                println!("=== Combat Trace (seed {}) ===", seed);
                for e in &events {
                    let roll = e
                        .roll
                        .map_or_else(|| "direct".to_string(), |r| format!("d20={:>2}", r));
                    println!(
                        "T{:>3} {} {:<20} -> enemy {:>2} [{}] {:<4} dmg {:>3} hp {:>4} \
                         total {:>5}",
                        e.turn,
                        e.attacker,
                        e.attack_type,
                        e.target,
                        roll,
                        if e.hit { "HIT" } else { "miss" },
                        e.damage,
                        e.remaining_hp,
                        e.total_damage,
                    );
                }
                println!();
                let cap_note = if result.capped { " (turn cap)" } else { "" };
                println!("Turns: {}{}", result.turns, cap_note);
                println!("Total Damage: {}", result.total_damage);
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "seed": seed,
                    "result": result,
                    "events": events,
                });
                print_json(&output);
            }
        }
        return;
    }

    if let Some(threads) = args.threads.or_else(|| args.parallel.then(num_cpus::get)) {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            tracing::warn!(error = %e, "could not size the worker pool");
        }
    }

    let start = Instant::now();
    let summary = match run_batch(&registry, &config, args.num_runs, args.parallel) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    match args.output {
        OutputFormat::Text => print_text(&args, &summary, elapsed.as_secs_f64()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "simulations": args.num_runs,
                "parallel": args.parallel,
                "elapsed_seconds": elapsed.as_secs_f64(),
                "stats": {
                    "avg_turns": summary.avg_turns,
                    "std_turns": summary.std_turns,
                    "min_turns": summary.min_turns,
                    "max_turns": summary.max_turns,
                    "p50_turns": summary.turns_percentile(50.0),
                    "p90_turns": summary.turns_percentile(90.0),
                    "damage_per_turn": summary.damage_per_turn,
                    "avg_damage": summary.avg_damage,
                    "hit_rate": summary.hit_rate,
                    "capped_runs": summary.capped_runs,
                },
                "results": summary.results,
            });
            print_json(&output);
        }
    }
}

fn print_text(args: &Args, summary: &BatchSummary, elapsed: f64) {
    println!("=== Vitality Simulation Results ===");
    println!("Simulations: {}", summary.num_runs());
    println!();
    println!("Average Turns: {:.2} ± {:.2}", summary.avg_turns, summary.std_turns);
    println!("Turn Range: {} - {}", summary.min_turns, summary.max_turns);
    let percentiles = (summary.turns_percentile(50.0), summary.turns_percentile(90.0));
    if let (Some(p50), Some(p90)) = percentiles {
        println!("Turns p50 / p90: {} / {}", p50, p90);
    }
    println!();
    println!("--- Damage ---");
    println!("Damage per Turn: {:.2}", summary.damage_per_turn);
    println!("Avg Total Damage: {:.1}", summary.avg_damage);
    println!("Hit Rate: {:.1}%", summary.hit_rate * 100.0);
    if summary.capped_runs > 0 {
        println!("Runs hitting turn cap: {}", summary.capped_runs);
    }

    if args.timing {
        println!();
        println!("--- Performance ---");
        println!("Total time: {:.3}s", elapsed);
        println!("Per simulation: {:.3}ms", elapsed * 1000.0 / args.num_runs as f64);
        println!("Simulations/sec: {:.0}", args.num_runs as f64 / elapsed);
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error serialising output: {}", e);
            std::process::exit(1);
        }
    }
}
