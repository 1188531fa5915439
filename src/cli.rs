use std::str::FromStr;

use serde::Serialize;

use crate::character::{sample_fury_warrior, Character};
use crate::combat::{DpsSummary, SimulationConfig};
use crate::data::{load_character, load_simulation_config, write_samples_csv};
use crate::parallel::{run_simulation_batches, WorkerPool};
use crate::server;
use crate::weights::{compute_stat_weights, Stat};

const USAGE: &str = "usage: furysim <serve|simulate|weights|validate>";
const RUN_USAGE: &str = "usage: furysim <simulate|weights> [build.yaml|build.json] [--time S] \
[--batches N] [--level L] [--seed S] [--workers N] [--config file] [--no-rotation] [--no-talents] \
[--no-procs] [--no-crusader] [--table] [--csv path] [--stats agility,strength,...]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Weights,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("weights") => Some(Command::Weights),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Weights) => handle_weights(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Options shared by `simulate` and `weights`, before the config file is merged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub build_path: Option<String>,
    pub config_path: Option<String>,
    pub sim_time: Option<f64>,
    pub batches: Option<usize>,
    pub opponent_level: Option<i32>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub no_rotation: bool,
    pub no_talents: bool,
    pub no_procs: bool,
    pub no_crusader: bool,
    pub table: bool,
    pub csv_path: Option<String>,
    pub stats: Option<Vec<Stat>>,
}

impl RunOptions {
    /// Start from the config file (or defaults) and apply the command-line overrides.
    pub fn resolve_config(&self) -> Result<SimulationConfig, String> {
        let mut config = match &self.config_path {
            Some(path) => load_simulation_config(path).map_err(|err| err.to_string())?,
            None => SimulationConfig::default(),
        };
        if let Some(sim_time) = self.sim_time {
            config.sim_time = sim_time;
        }
        if let Some(batches) = self.batches {
            config.batches = batches;
        }
        if let Some(level) = self.opponent_level {
            config.opponent_level = level;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.toggles.rotation &= !self.no_rotation;
        config.toggles.talents &= !self.no_talents;
        config.toggles.item_procs &= !self.no_procs;
        config.toggles.crusader &= !self.no_crusader;
        Ok(config)
    }

    pub fn load_build(&self) -> Result<Character, String> {
        match &self.build_path {
            Some(path) => load_character(path).map_err(|err| err.to_string()),
            None => Ok(sample_fury_warrior()),
        }
    }

    fn pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.workers.unwrap_or(0))
    }
}

/// Parse everything after the subcommand. The first bare argument is the build path.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        let mut value = |flag: &str| {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--time" => options.sim_time = Some(parse_value("--time", &value("--time")?)?),
            "--batches" => options.batches = Some(parse_value("--batches", &value("--batches")?)?),
            "--level" => options.opponent_level = Some(parse_value("--level", &value("--level")?)?),
            "--seed" => options.seed = Some(parse_value("--seed", &value("--seed")?)?),
            "--workers" => options.workers = Some(parse_value("--workers", &value("--workers")?)?),
            "--config" => options.config_path = Some(value("--config")?),
            "--csv" => options.csv_path = Some(value("--csv")?),
            "--stats" => options.stats = Some(parse_stats(&value("--stats")?)?),
            "--no-rotation" => options.no_rotation = true,
            "--no-talents" => options.no_talents = true,
            "--no-procs" => options.no_procs = true,
            "--no-crusader" => options.no_crusader = true,
            "--table" => options.table = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            path if options.build_path.is_none() => options.build_path = Some(path.to_string()),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }
    Ok(options)
}

fn parse_value<T: FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("invalid value '{raw}' for {flag}"))
}

fn parse_stats(raw: &str) -> Result<Vec<Stat>, String> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

fn handle_serve() -> i32 {
    let bind_addr = server::bind_address();
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct SimulateOutput {
    summary: DpsSummary,
    config: SimulationConfig,
}

fn handle_simulate(args: &[String]) -> i32 {
    let (options, config, build) = match prepare_run(args) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };
    let snapshot = match build.snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("invalid build: {err}");
            return 1;
        }
    };
    let samples = match run_simulation_batches(&snapshot, &config, &options.pool()) {
        Ok(samples) => samples,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return 1;
        }
    };

    if let Some(path) = &options.csv_path {
        if let Err(err) = write_samples_csv(path, &samples) {
            eprintln!("failed to write {path}: {err}");
            return 1;
        }
    }

    let summary = samples.summary();
    if options.table {
        println!("batches\tsim_time\tlevel\tmean_dps\tstd_dev\tstandard_error\tconfidence_95");
        println!(
            "{}\t{}\t{}\t{:.3}\t{:.3}\t{:.4}\t{:.4}",
            summary.batches,
            config.sim_time,
            config.opponent_level,
            summary.mean_dps,
            summary.std_dev,
            summary.standard_error,
            summary.confidence_95
        );
        return 0;
    }
    print_json(&SimulateOutput { summary, config })
}

fn handle_weights(args: &[String]) -> i32 {
    let (options, config, build) = match prepare_run(args) {
        Ok(prepared) => prepared,
        Err(code) => return code,
    };
    let stats = options
        .stats
        .clone()
        .unwrap_or_else(|| Stat::DEFAULT_SET.to_vec());
    let weights = match options
        .pool()
        .install(|| compute_stat_weights(&build, &stats, &config))
    {
        Ok(weights) => weights,
        Err(err) => {
            eprintln!("stat weights failed: {err}");
            return 1;
        }
    };

    if options.table {
        println!("stat\tamount\tdps_plus\tdps_minus\tstd_dps_plus\tstd_dps_minus\tper_unit");
        for weight in &weights {
            println!(
                "{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
                weight.stat,
                weight.amount,
                weight.dps_plus,
                weight.dps_minus,
                weight.std_dps_plus,
                weight.std_dps_minus,
                weight.per_unit()
            );
        }
        return 0;
    }
    print_json(&weights)
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: furysim validate <build.yaml|build.json>");
        return 2;
    };

    let result = load_character(path)
        .map_err(|err| err.to_string())
        .and_then(|build| build.snapshot().map_err(|err| err.to_string()));
    match result {
        Ok(snapshot) => {
            println!(
                "validation passed: {path} (attack power {:.0}, crit {:.2}%, hit {:.1}%, skill {}/{})",
                snapshot.special_stats.attack_power,
                snapshot.special_stats.critical_strike,
                snapshot.special_stats.hit,
                snapshot.weapon_skill_mh,
                snapshot.weapon_skill_oh
            );
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

/// Parse flags, merge the config and load the build. `Err` carries the exit code.
fn prepare_run(args: &[String]) -> Result<(RunOptions, SimulationConfig, Character), i32> {
    let options = parse_run_options(args).map_err(|err| {
        eprintln!("{err}");
        eprintln!("{RUN_USAGE}");
        2
    })?;
    let config = options.resolve_config().map_err(|err| {
        eprintln!("failed to load config: {err}");
        1
    })?;
    let build = options.load_build().map_err(|err| {
        eprintln!("failed to load build: {err}");
        1
    })?;
    Ok((options, config, build))
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}
