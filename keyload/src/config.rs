//! This module controls configuration parsing from the end user, providing a
//! convenience mechanism for the rest of the program.

use std::{
    fs,
    path::{Path, PathBuf},
};

use keyload_payload::{FindkeyGenerator, SyncGenerator, key};
use serde::{Deserialize, Serialize};

use crate::plan::Arrangement;

/// Errors produced by [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error reading config file
    #[error("Failed to read config file {path:?}: {source}")]
    ReadFile {
        /// File path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// Error for a serde [`serde_yaml`].
    #[error("Failed to deserialize yaml: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    /// Invalid payload parameters
    #[error(transparent)]
    Payload(#[from] keyload_payload::Error),
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./out_targets")
}

fn default_advertise_requests() -> i64 {
    5
}

fn default_target_uri() -> String {
    "http://127.0.0.1:7789".to_string()
}

fn default_findkey_reuse_probability() -> f64 {
    0.7
}

fn default_sync_reuse_probability() -> f64 {
    0.3
}

/// Main configuration struct for this program
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory the request list and body files are written to
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// Number of advertise requests to plan; findkey and sync counts derive
    /// from this knob. Non-positive values degrade rather than error.
    #[serde(default = "default_advertise_requests")]
    pub advertise_requests: i64,
    /// Base URI of the target key-distribution service
    #[serde(default = "default_target_uri")]
    pub target_uri: String,
    /// The slot interleaving policy
    #[serde(default)]
    pub arrangement: Arrangement,
    /// Probability that a findkey lookup reuses an advertised key
    #[serde(default = "default_findkey_reuse_probability")]
    pub findkey_reuse_probability: f64,
    /// Probability that a sync body key slot reuses an advertised key
    #[serde(default = "default_sync_reuse_probability")]
    pub sync_reuse_probability: f64,
    /// Shape of freshly generated keys in sync bodies
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub sync_key_shape: key::Shape,
    /// The seed for random operations; absent means OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            advertise_requests: default_advertise_requests(),
            target_uri: default_target_uri(),
            arrangement: Arrangement::default(),
            findkey_reuse_probability: default_findkey_reuse_probability(),
            sync_reuse_probability: default_sync_reuse_probability(),
            sync_key_shape: key::Shape::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from a yaml file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not deserialize or
    /// fails validation.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Confirm that probabilities and key shapes are well-formed.
    ///
    /// Note that `advertise_requests` is deliberately not validated: the
    /// planner floors non-positive counts instead.
    ///
    /// # Errors
    ///
    /// Returns an error if a reuse probability lies outside `[0.0, 1.0]` or
    /// the opaque key length range is inverted.
    pub fn validate(&self) -> Result<(), Error> {
        self.findkey_generator().validate()?;
        self.sync_generator().validate()?;
        Ok(())
    }

    /// The findkey lookup generator described by this configuration.
    #[must_use]
    pub fn findkey_generator(&self) -> FindkeyGenerator {
        FindkeyGenerator {
            reuse_probability: self.findkey_reuse_probability,
        }
    }

    /// The sync body generator described by this configuration.
    #[must_use]
    pub fn sync_generator(&self) -> SyncGenerator {
        SyncGenerator {
            reuse_probability: self.sync_reuse_probability,
            shape: self.sync_key_shape,
        }
    }
}
