//! The fixture emitter.
//!
//! Walks the planned slot sequence exactly once, strictly in order: the
//! advertised-key pool is order-dependent, a findkey or sync slot may only
//! see keys from advertise slots that precede it in the plan. Each slot
//! appends one request block to the request-list file and advertise/sync
//! slots write one JSON body file apiece.

use std::{
    fmt,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use keyload_payload::{AdvertiseGenerator, Body, Generator, KeyPool};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    config::Config,
    plan::{Counts, Kind, Slot},
};

const ADVERTISE_PATH: &str = "/api/v1/distribution/advertise";
const FINDKEY_PATH: &str = "/api/v1/distribution/findkey";
const SYNC_PATH: &str = "/api/v1/distribution/sync";
const CONTENT_TYPE: &str = "application/json";

const TARGETS_FILE: &str = "targets.http";
const BODIES_DIR: &str = "bodies";

/// Errors produced by [`generate`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Wrapper around [`std::io::Error`].
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    /// Json body could not be encoded
    #[error("Json body could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// Request totals and pool size for a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Advertise requests emitted.
    pub advertise: u64,
    /// Findkey requests emitted.
    pub findkey: u64,
    /// Sync requests emitted.
    pub sync: u64,
    /// Total keys that appeared in advertise bodies.
    pub keys_advertised: u64,
    /// Where the request list and bodies were written.
    pub output_directory: PathBuf,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation completed:")?;
        writeln!(f, "  advertise requests: {}", self.advertise)?;
        writeln!(f, "  findkey requests:   {}", self.findkey)?;
        writeln!(f, "  sync requests:      {}", self.sync)?;
        writeln!(f, "  keys advertised:    {}", self.keys_advertised)?;
        write!(
            f,
            "  output directory:   {}",
            self.output_directory.display()
        )
    }
}

/// Generate the request list and body files described by `config`.
///
/// Filesystem errors are fatal; partially written output is left in place.
///
/// # Errors
///
/// Returns an error if the output directories cannot be created or any file
/// write fails.
///
/// # Panics
///
/// Panics if `config` carries a reuse probability outside `[0.0, 1.0]`.
/// Call [`Config::validate`] first.
pub fn generate<R>(config: &Config, rng: &mut R) -> Result<Summary, Error>
where
    R: Rng + ?Sized,
{
    let counts = Counts::derive(config.advertise_requests);
    let slots = config.arrangement.sequence(counts, rng);
    info!(
        advertise = counts.advertise,
        findkey = counts.findkey,
        sync = counts.sync,
        "planned request mix"
    );

    fs::create_dir_all(&config.output_directory)?;
    let bodies_dir = config.output_directory.join(BODIES_DIR);
    fs::create_dir_all(&bodies_dir)?;

    let targets_path = config.output_directory.join(TARGETS_FILE);
    let mut targets = BufWriter::new(File::create(&targets_path)?);
    writeln!(targets, "# generated http-format targets")?;
    writeln!(targets, "# mixed advertise, findkey and sync requests")?;
    writeln!(targets)?;

    let advertise = AdvertiseGenerator;
    let findkey = config.findkey_generator();
    let sync = config.sync_generator();

    let mut pool = KeyPool::new();
    let total_slots = slots.len();

    for (emitted, slot) in slots.into_iter().enumerate() {
        match slot.kind {
            Kind::Advertise => {
                let body = advertise.generate(rng);
                let reference = write_body(&bodies_dir, &slot, &body, rng)?;
                pool.extend(body.keys);

                writeln!(targets, "POST {}{ADVERTISE_PATH}", config.target_uri)?;
                writeln!(targets, "Content-Type: {CONTENT_TYPE}")?;
                writeln!(targets, "@{reference}")?;
                writeln!(targets)?;
            }
            Kind::Findkey => {
                let lookup = findkey.generate(&pool, rng);
                // The key passes through verbatim, reserved characters and
                // all. The shapes in use never produce a '&' or '='.
                writeln!(
                    targets,
                    "GET {}{FINDKEY_PATH}?key={}&count={}",
                    config.target_uri, lookup.key, lookup.count
                )?;
                writeln!(targets, "Accept: {CONTENT_TYPE}")?;
                writeln!(targets)?;
            }
            Kind::Sync => {
                let body = sync.generate(&pool, rng);
                let reference = write_body(&bodies_dir, &slot, &body, rng)?;

                writeln!(targets, "POST {}{SYNC_PATH}", config.target_uri)?;
                writeln!(targets, "Content-Type: {CONTENT_TYPE}")?;
                writeln!(targets, "@{reference}")?;
                writeln!(targets)?;
            }
        }
        if (emitted + 1) % 1_000 == 0 {
            debug!("emitted {} of {total_slots} requests", emitted + 1);
        }
    }
    targets.flush()?;

    Ok(Summary {
        advertise: counts.advertise,
        findkey: counts.findkey,
        sync: counts.sync,
        keys_advertised: pool.len() as u64,
        output_directory: config.output_directory.clone(),
    })
}

/// Write one body file, returning the reference recorded in the request
/// list, relative to the output directory.
///
/// Names embed the slot's per-kind ordinal, unique within a run, plus a
/// short rng-drawn id to keep separate runs distinguishable.
fn write_body<R>(bodies_dir: &Path, slot: &Slot, body: &Body, rng: &mut R) -> Result<String, Error>
where
    R: Rng + ?Sized,
{
    let kind = match slot.kind {
        Kind::Advertise => "advertise",
        Kind::Findkey => "findkey",
        Kind::Sync => "sync",
    };
    let id: u32 = rng.random();
    let file_name = format!("{kind}-{index}-{id:08x}.json", index = slot.index);

    let mut file = BufWriter::new(File::create(bodies_dir.join(&file_name))?);
    serde_json::to_writer(&mut file, body)?;
    file.flush()?;

    Ok(format!("{BODIES_DIR}/{file_name}"))
}
