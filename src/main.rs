use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use aggloss::analysis::percentile;
use aggloss::fitting::{DEFAULT_FREQUENCY_PATH, DEFAULT_SEVERITY_PATH};
use aggloss::{JsonParamFiles, Simulation, SimulationConfig, SummaryRecord};

/// Monte Carlo aggregate annual losses from fitted frequency/severity models.
#[derive(Debug, Parser)]
#[command(name = "aggloss", version)]
struct Args {
    /// JSON config file; keys not given keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fitted frequency parameters (JSON).
    #[arg(long, default_value = DEFAULT_FREQUENCY_PATH)]
    frequency: PathBuf,
    /// Fitted severity parameters (JSON).
    #[arg(long, default_value = DEFAULT_SEVERITY_PATH)]
    severity: PathBuf,
    /// Number of simulated years.
    #[arg(long)]
    n_sim: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Do not write the loss table or summary.
    #[arg(long)]
    no_save: bool,
    /// Run this many consecutive seeds in parallel and report each summary.
    #[arg(long)]
    runs: Option<u64>,
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> aggloss::Result<()> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::canonical(),
    };
    if let Some(n) = args.n_sim {
        config.n_sim = n;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.no_save {
        config.save_output = false;
    }

    let source = JsonParamFiles::new(args.frequency, args.severity);
    let start_seed = config.seed;
    let sim = Simulation::fit(config, &source)?;

    match args.runs {
        Some(n) => {
            let seeds: Vec<u64> = (0..n).map(|i| start_seed.wrapping_add(i)).collect();
            let results = sim.sweep(&seeds)?;
            if !args.quiet {
                print_sweep(&results);
            }
        }
        None => {
            let run = sim.run()?;
            if !args.quiet {
                println!("{}", serde_json::to_string_pretty(&run.summary)?);
            }
        }
    }
    Ok(())
}

fn print_sweep(results: &[(u64, SummaryRecord)]) {
    println!(
        "{:>12}  {:>14}  {:>14}  {:>14}  {:>14}  {:>14}",
        "seed", "mean", "VaR95", "TVaR95", "VaR99", "TVaR99"
    );
    for (seed, s) in results {
        println!(
            "{seed:>12}  {:>14.2}  {:>14.2}  {:>14.2}  {:>14.2}  {:>14.2}",
            s.mean, s.var95, s.tvar95, s.var99, s.tvar99
        );
    }

    if results.len() < 2 {
        eprintln!("Warning: seed spread requires >= 2 runs");
        return;
    }
    let mut var99: Vec<f64> = results.iter().map(|(_, s)| s.var99).collect();
    var99.sort_by(f64::total_cmp);
    println!(
        "\nVaR99 across {} seeds: min {:.2}  p50 {:.2}  max {:.2}",
        var99.len(),
        var99[0],
        percentile(&var99, 0.5),
        var99[var99.len() - 1]
    );
}
