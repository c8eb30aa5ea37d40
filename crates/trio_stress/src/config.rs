//! # Stress Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) is a valid configuration.
//!
//! ```toml
//! backend = "mutex"
//! workload = "strings"
//! total_strings = 250000
//! max_batch = 500
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{StressError, StressResult};

/// Coordinator backend to stress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Atomic hand-off word.
    #[default]
    LockFree,
    /// Mutex-protected reference backend.
    Mutex,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LockFree => "lock_free",
            Self::Mutex => "mutex",
        })
    }
}

/// Payload the producer commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    /// Strictly increasing integers.
    #[default]
    Counter,
    /// Random batches of random lowercase strings.
    Strings,
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Counter => "counter",
            Self::Strings => "strings",
        })
    }
}

/// Stress test parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StressConfig {
    /// Backend under test.
    pub backend: Backend,
    /// Payload type.
    pub workload: Workload,
    /// Commits issued by the counter workload.
    pub commits: u64,
    /// Strings produced by the strings workload before it stops.
    pub total_strings: usize,
    /// Upper bound (exclusive) on strings per committed batch.
    pub max_batch: usize,
    /// Upper bound (exclusive) on string length.
    pub max_len: usize,
    /// Seed for the payload generator.
    pub seed: u64,
    /// Yield the thread after every commit and every stale read.
    pub yield_between: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            backend: Backend::LockFree,
            workload: Workload::Counter,
            commits: 1_000_000,
            total_strings: 1_000_000,
            max_batch: 1000,
            max_len: 40,
            seed: 0x7472_696f,
            yield_between: true,
        }
    }
}

impl StressConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Config`] on malformed TOML or unknown fields.
    pub fn from_toml_str(text: &str) -> StressResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Io`] if the file cannot be read, or
    /// [`StressError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> StressResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StressError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects configurations that cannot produce a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> StressResult<()> {
        match self.workload {
            Workload::Counter if self.commits == 0 => {
                return Err(StressError::InvalidConfig("commits must be at least 1".into()));
            }
            Workload::Strings if self.total_strings == 0 => {
                return Err(StressError::InvalidConfig(
                    "total_strings must be at least 1".into(),
                ));
            }
            _ => {}
        }
        if self.max_batch < 2 {
            return Err(StressError::InvalidConfig("max_batch must be at least 2".into()));
        }
        if self.max_len == 0 {
            return Err(StressError::InvalidConfig("max_len must be at least 1".into()));
        }
        Ok(())
    }
}
