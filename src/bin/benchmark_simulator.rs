//! Run simulator benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, batches_per_sec, sim_seconds_per_sec,
//!        parallel_speedup, sim_time).

use std::fs::OpenOptions;
use std::io::Write;
use std::time::Instant;

use furysim::character::sample_fury_warrior;
use furysim::combat::{simulate, simulate_parallel, SimulationConfig};

const LOG_PATH: &str = "benchmark_log.csv";

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let snapshot = match sample_fury_warrior().snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("sample build is invalid: {err}");
            std::process::exit(1);
        }
    };
    let config = SimulationConfig {
        sim_time: 60.0,
        batches: 2000,
        ..SimulationConfig::default()
    };

    let start = Instant::now();
    let sequential = simulate(&snapshot, &config);
    let sequential_secs = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let parallel = simulate_parallel(&snapshot, &config);
    let parallel_secs = start.elapsed().as_secs_f64();

    let (sequential, parallel) = match (sequential, parallel) {
        (Ok(sequential), Ok(parallel)) => (sequential, parallel),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("simulation failed: {err}");
            std::process::exit(1);
        }
    };
    if sequential != parallel {
        eprintln!("sequential and parallel samples differ");
        std::process::exit(1);
    }

    let batches_per_sec = config.batches as f64 / sequential_secs;
    let sim_seconds_per_sec = batches_per_sec * config.sim_time;
    let speedup = sequential_secs / parallel_secs;

    println!("Simulator benchmark ({} s fights, {} batches):", config.sim_time, config.batches);
    println!("  Mean DPS:        {:.2} +- {:.2}", sequential.mean(), sequential.confidence_95());
    println!("  Sequential:      {:.3} s", sequential_secs);
    println!("  Parallel:        {:.3} s", parallel_secs);
    println!("  Batches/s:       {:.2}", batches_per_sec);
    println!("  Sim seconds/s:   {:.0}", sim_seconds_per_sec);
    println!("  Speedup:         {:.2}x", speedup);

    if log {
        if let Err(err) = append_log(batches_per_sec, sim_seconds_per_sec, speedup, config.sim_time) {
            eprintln!("failed to append {LOG_PATH}: {err}");
            std::process::exit(1);
        }
        println!("Appended to {LOG_PATH}");
    }
}

fn append_log(
    batches_per_sec: f64,
    sim_seconds_per_sec: f64,
    speedup: f64,
    sim_time: f64,
) -> std::io::Result<()> {
    let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,batches_per_sec,sim_seconds_per_sec,parallel_speedup,sim_time\n")?;
    }
    writeln!(
        file,
        "{date},{batches_per_sec:.4},{sim_seconds_per_sec:.4},{speedup:.4},{sim_time}"
    )?;
    file.flush()
}
