//! sg - SG model file tool
//!
//! Inspects and validates SGM mesh/material files and SGA skeleton/animation
//! files, and loads complete models the way the game client does.

mod inspect;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use sg_assets::{LoaderConfig, ModelLoader};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sg")]
#[command(about = "SG model file tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an .sgm file and print its contents
    Mesh {
        /// Input .sgm file
        input: PathBuf,

        /// Print the decoded asset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode an .sga file and print its skeleton and clips
    Anim {
        /// Input .sga file
        input: PathBuf,

        /// Print the decoded asset as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load a model with its companion animation and print the bundle
    Model {
        /// Model name relative to the root, without extension
        name: String,

        /// Asset root directory (overrides config)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Path to sg.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Decode many files in parallel and report failures
    Check {
        /// .sgm and .sga files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging (stderr keeps --json output clean)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh { input, json } => {
            let data = read_input(&input)?;
            let asset = sg_common::decode_sgm(&data)
                .with_context(|| format!("Failed to decode SGM: {:?}", input))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&asset)?);
            } else {
                print!("{}", inspect::describe_sgm(&asset));
            }
        }

        Commands::Anim { input, json } => {
            let data = read_input(&input)?;
            let asset = sg_common::decode_sga(&data)
                .with_context(|| format!("Failed to decode SGA: {:?}", input))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&asset)?);
            } else {
                print!("{}", inspect::describe_sga(&asset));
            }
        }

        Commands::Model { name, root, config } => {
            let mut config = match config {
                Some(path) => LoaderConfig::load(&path)
                    .with_context(|| format!("Failed to load config: {:?}", path))?,
                None => LoaderConfig::default(),
            };
            if let Some(root) = root {
                config.root = root;
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to create runtime")?;
            let loader = ModelLoader::from_config(config);
            let model = runtime
                .block_on(loader.load(&name))
                .with_context(|| format!("Failed to load model '{}'", name))?;

            print!("{}", inspect::describe_model(&model));
        }

        Commands::Check { files } => {
            let results: Vec<_> = files
                .par_iter()
                .map(|path| (path, check_file(path)))
                .collect();

            let mut failed = 0;
            for (path, result) in &results {
                match result {
                    Ok(summary) => println!("OK   {}: {}", path.display(), summary),
                    Err(e) => {
                        failed += 1;
                        println!("FAIL {}: {:#}", path.display(), e);
                    }
                }
            }

            if failed > 0 {
                bail!("{} of {} files failed", failed, results.len());
            }
            tracing::info!("All {} files decoded", results.len());
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Decode a single file, choosing the decoder by extension
fn check_file(path: &Path) -> Result<String> {
    let data = read_input(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("sgm") => {
            let asset = sg_common::decode_sgm(&data)?;
            Ok(inspect::sgm_summary(&asset))
        }
        Some("sga") => {
            let asset = sg_common::decode_sga(&data)?;
            Ok(inspect::sga_summary(&asset))
        }
        _ => bail!("unknown extension (expected .sgm or .sga)"),
    }
}
