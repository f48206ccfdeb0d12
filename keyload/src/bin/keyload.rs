//! Fixture generation binary for keyload configurations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use keyload::{config::Config, emitter};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Output directory for the request list and body files
    #[clap(short, long)]
    outdir: Option<PathBuf>,
    /// Number of advertise requests; findkey requests will be 10x this
    /// number and sync requests 1/20 of findkey
    #[clap(short = 'n', long)]
    advertise_number: Option<i64>,
    /// Path to a yaml config file
    #[clap(short, long)]
    config_path: Option<PathBuf>,
    /// Seed for random operations; omit for OS entropy
    #[clap(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .finish()
        .init();

    let args = Args::parse();

    let mut config = match &args.config_path {
        Some(path) => Config::from_path(path).with_context(|| {
            format!("Could not load configuration file at: {}", path.display())
        })?,
        None => Config::default(),
    };
    if let Some(outdir) = args.outdir {
        config.output_directory = outdir;
    }
    if let Some(advertise_number) = args.advertise_number {
        config.advertise_requests = advertise_number;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate().context("invalid configuration")?;

    let mut rng = match config.seed {
        Some(seed) => {
            debug!("seeding rng from {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let summary = emitter::generate(&config, &mut rng).context("fixture generation failed")?;
    info!("{summary}");

    Ok(())
}
