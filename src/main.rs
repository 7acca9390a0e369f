/*!
 * memsim - Main Entry Point
 *
 * Drives a simulation from a workload file, either interactively or in
 * fixed batches, and generates synthetic workloads.
 */

use clap::{Parser, Subcommand};
use memsim::core::limits::{DEFAULT_RENDER_SCALE, DEFAULT_STEP_BATCH};
use memsim::render::defrag_section;
use memsim::workload::write_workload_files;
use memsim::{
    init_tracing, load_workload, SimConfig, SimError, SimResult, Simulation, Strategy,
    WorkloadParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a workload file
    Run {
        /// Workload file (id,memory,arrival,run_length per line)
        #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
        input: PathBuf,

        /// JSON config file; flags override its values
        #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
        config: Option<PathBuf>,

        /// Address-space capacity
        #[arg(long)]
        capacity: Option<usize>,

        /// Placement strategy: first-fit (0), next-fit (1), best-fit (2), worst-fit (3)
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Time units per tick
        #[arg(short, long)]
        quantum: Option<u64>,

        /// Advance in batches of N ticks without prompting
        #[arg(short, long)]
        batch: Option<u64>,

        /// Print snapshots as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write synthetic workload files
    Generate {
        #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
        out_dir: PathBuf,

        #[arg(short, long, default_value_t = 10)]
        files: usize,

        /// RNG seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> miette::Result<()> {
    init_tracing("warn");
    let args = Args::parse();

    match args.command {
        Command::Run {
            input,
            config,
            capacity,
            strategy,
            quantum,
            batch,
            json,
        } => {
            let mut cfg = match config {
                Some(path) => SimConfig::from_file(path)?,
                None => SimConfig::default(),
            };
            cfg = cfg.with_env()?;
            if let Some(capacity) = capacity {
                cfg.capacity = capacity;
            }
            if let Some(strategy) = strategy {
                cfg.strategy = strategy;
            }
            if let Some(quantum) = quantum {
                cfg.quantum = quantum;
            }

            let specs = load_workload(&input)?;
            info!(input = %input.display(), processes = specs.len(), "Loaded workload");
            let mut sim = Simulation::new(cfg, specs)?;
            drive(&mut sim, batch, json)?;
        }
        Command::Generate {
            out_dir,
            files,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let written =
                write_workload_files(&mut rng, &WorkloadParams::default(), &out_dir, files)?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn drive(sim: &mut Simulation, batch: Option<u64>, json: bool) -> SimResult<()> {
    show(sim, json)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !sim.is_complete() {
        let steps = match batch {
            Some(n) => n.max(1),
            None => {
                print!("Press enter to simulate 1 step, or enter a number of steps:\n>>> ");
                io::stdout().flush().map_err(stdout_error)?;
                let Some(line) = lines.next() else {
                    break;
                };
                let line = line.map_err(stdout_error)?;
                match parse_steps(&line) {
                    Ok(n) => n,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                }
            }
        };

        for step in sim.run(steps)?.steps {
            for rejection in &step.rejected {
                println!("{rejection}");
            }
            if json {
                if !step.defrag.is_empty() {
                    println!("{}", serde_json::to_string_pretty(&step.defrag)?);
                }
            } else {
                for event in &step.defrag {
                    print!("{}", defrag_section(event, DEFAULT_RENDER_SCALE));
                }
            }
        }
        show(sim, json)?;
    }

    println!("Done!");
    println!("{}", sim.summary());
    Ok(())
}

fn parse_steps(line: &str) -> SimResult<u64> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(DEFAULT_STEP_BATCH);
    }
    match line.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SimError::InvalidInput(line.to_string())),
    }
}

fn show(sim: &Simulation, json: bool) -> SimResult<()> {
    let snapshot = sim.snapshot();
    if json {
        println!("{}", snapshot.to_json()?);
    } else {
        println!("\n{snapshot}");
    }
    Ok(())
}

fn stdout_error(source: io::Error) -> SimError {
    SimError::Io {
        path: PathBuf::from("<stdio>"),
        source,
    }
}
