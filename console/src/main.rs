use anyhow::Context;
use clap::{Parser, Subcommand};
use gtfcore::geometry::{solve, solve_clamped, Solution};
use gtfcore::logbook::{ExperimentRecord, LogStore};
use gtfcore::{Calibration, ProbeAngles, ProbeInput};
use log::info;
use std::path::PathBuf;

mod calibration;
mod view;

#[derive(Parser)]
#[command(author, version, about = "Operator console for the GTF probe coordinate calculator")]
struct Args {
    /// Experiment log CSV path
    #[arg(long, default_value = "experiment_log.csv")]
    log: PathBuf,
    /// Site calibration override file (YAML)
    #[arg(long)]
    calibration: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the M1-frame target for one measurement
    Compute {
        /// GTF X coordinate (mm)
        #[arg(long)]
        x: f64,
        /// GTF Y coordinate (mm)
        #[arg(long)]
        y: f64,
        /// GTF Z coordinate (mm)
        #[arg(long)]
        z: f64,
        /// Arc angle (degrees)
        #[arg(long)]
        arc: f64,
        /// Collar angle (degrees)
        #[arg(long)]
        collar: f64,
        /// Snap the target to the probe envelope and back-solve the angles
        #[arg(long, default_value_t = false)]
        clamp: bool,
        /// Append the result to the experiment log
        #[arg(long, default_value_t = false)]
        record: bool,
        /// Free-text comment stored alongside --record
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Show the experiment log, newest first
    List,
    /// Delete rows by displayed number, e.g. --rows 1,3-5
    Delete {
        #[arg(long)]
        rows: String,
    },
    /// Clear the whole experiment log
    Clear {
        /// Confirm the clear; without this flag nothing is deleted
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Write a timestamped copy of the log
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let calibration = match &args.calibration {
        Some(path) => calibration::CalibrationFile::load(path)?.to_calibration(),
        None => Calibration::default(),
    };
    let store = LogStore::new(&args.log);

    match args.command {
        Command::Compute {
            x,
            y,
            z,
            arc,
            collar,
            clamp,
            record,
            comment,
        } => {
            let input = ProbeInput { x, y, z };
            let angles = ProbeAngles {
                arc_deg: arc,
                collar_deg: collar,
            };

            let solution = if clamp {
                let clamped = solve_clamped(&input, &angles, &calibration)
                    .context("computing clamped target")?;
                print_solution(&clamped.solution);
                if clamped.x_clamped {
                    println!("X snapped to envelope; corrected arc {:.4}°", clamped.arc_deg);
                }
                if clamped.y_clamped {
                    println!(
                        "Y snapped to envelope; corrected collar {:.4}°",
                        clamped.collar_deg
                    );
                }
                clamped.solution
            } else {
                let solution = solve(&input, &angles, &calibration).context("computing target")?;
                print_solution(&solution);
                solution
            };

            if record {
                store
                    .append(ExperimentRecord::stamped(&solution, &comment))
                    .context("recording result")?;
                info!("operator recorded a result to {}", args.log.display());
                let rows = store.list_all().context("reloading experiment log")?;
                print!("{}", view::render_table(&rows));
            }
        }
        Command::List => {
            let rows = store.list_all().context("reading experiment log")?;
            print!("{}", view::render_table(&rows));
        }
        Command::Delete { rows } => {
            let existing = store.list_all().context("reading experiment log")?;
            let selection = view::parse_selection(&rows, existing.len())?;
            let deleted = store
                .delete_by_indices(&selection)
                .context("deleting experiment rows")?;
            if deleted == 0 {
                println!("No rows selected; log unchanged.");
            } else {
                info!("operator deleted {} row(s) from {}", deleted, args.log.display());
                println!("Deleted {} row(s).", deleted);
                let rows = store.list_all().context("reloading experiment log")?;
                print!("{}", view::render_table(&rows));
            }
        }
        Command::Clear { yes } => {
            if yes {
                store.clear_all().context("clearing experiment log")?;
                info!("operator cleared {}", args.log.display());
                println!("Experiment log cleared.");
            } else {
                println!("Refusing to clear the experiment log without --yes.");
            }
        }
        Command::Export { dir } => {
            let exported = store.export_copy(&dir).context("exporting experiment log")?;
            println!("Exported experiment log to {}", exported.display());
        }
    }

    Ok(())
}

fn print_solution(solution: &Solution) {
    println!(
        "Target -> X {:.4} Y {:.4} Z {:.4} | D {:.4} L {:.4}",
        solution.x, solution.y, solution.z, solution.d, solution.l
    );
}
