// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
mod catalog;
mod config;
mod dataset;
mod sample;
mod testutil;
mod validate;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{crate_version, Parser, Subcommand};

use crate::catalog::Catalog;
use crate::config::Directories;
use crate::dataset::Assembler;
use crate::sample::Loader;
use crate::validate::validate_sample;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A MIDI velocity dataset preparation tool."
)]
struct Cli {
    /// The path to a directories configuration file. Defaults to the standard
    /// layout under --root.
    #[arg(short, long)]
    config: Option<String>,

    /// The root under which the standard directory layout lives.
    #[arg(short, long, default_value = ".")]
    root: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Creates any missing data and artefact directories.
    Init {
        /// Write the resulting layout to this config file.
        #[arg(short, long)]
        write_config: Option<String>,
    },
    /// Lists the song names found in the quantized inputs directory.
    Names {
        /// Only list names starting with this prefix.
        #[arg(short, long, default_value = "")]
        filter: String,
        /// Skip filenames containing this substring.
        #[arg(short, long)]
        exclude: Option<String>,
    },
    /// Loads the first known song and prints its dimensions.
    Inspect {},
    /// Loads and validates every stored sample, augmented variants included.
    Validate {},
    /// Assembles the train/test dataset and reports its size.
    Dataset {
        /// The fraction of songs held out for testing. Must be within (0, 1).
        #[arg(short, long, default_value_t = 0.1)]
        test_fraction: f64,
        /// The seed for the deterministic train/test split.
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Validate every sample while loading.
        #[arg(short, long)]
        validate: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let directories = match &cli.config {
        Some(config) => Directories::deserialize(Path::new(config))?,
        None => Directories::with_root(Path::new(&cli.root)),
    };

    match cli.command {
        Commands::Init { write_config } => {
            let created = directories.bootstrap()?;

            if created.is_empty() {
                println!("All directories already exist.");
            } else {
                println!("Created directories:");
                for dir in created {
                    println!("- {}", dir.display());
                }
            }

            if let Some(write_config) = write_config {
                directories.save(&PathBuf::from(&write_config))?;
                println!("Wrote configuration to {}.", write_config);
            }
        }
        Commands::Names { filter, exclude } => {
            let catalog = Catalog::new(&directories);
            let mut names = catalog.list_names(&filter, exclude.as_deref())?;

            if names.is_empty() {
                println!("No songs found.");
                return Ok(());
            }

            // Sort the names so that the output is consistent.
            names.sort();
            println!("Songs (count: {}):", names.len());
            for name in names {
                println!("- {}", name);
            }
        }
        Commands::Inspect {} => {
            let name = Catalog::new(&directories).any_name()?;
            let sample = Loader::new(&directories).load(&name)?;

            println!("Song: {}", sample.name);
            println!("  Timesteps: {}", sample.frames());
            println!("  Input columns: {}", sample.inputs.ncols());
            println!("  Velocity columns: {}", sample.velocities.ncols());
        }
        Commands::Validate {} => {
            let catalog = Catalog::new(&directories);
            let loader = Loader::new(&directories);

            let mut names = catalog.list_names("", None)?;
            names.sort();

            for name in &names {
                let sample = loader.load(name)?;
                validate_sample(&sample)?;
                println!("- {}: ok ({} timesteps)", name, sample.frames());
            }
            println!("Validated {} samples.", names.len());
        }
        Commands::Dataset {
            test_fraction,
            seed,
            validate,
        } => {
            let dataset =
                Assembler::new(&directories).load_dataset(test_fraction, seed, validate)?;

            println!(
                "Loaded {} train samples and {} test samples.",
                dataset.x_train.len(),
                dataset.x_test.len()
            );
        }
    }

    Ok(())
}
