//! # TRIO Stress Harness
//!
//! Drives a triple buffer from two real threads and verifies what the
//! consumer saw.
//!
//! ## Workloads
//!
//! - **counter**: the producer commits `1..=commits`. Every value the consumer
//!   observes as new must be larger than the previous one, and the last one
//!   must be `commits`.
//! - **strings**: the producer commits random batches of random strings and
//!   logs everything it produced. Everything the consumer collected must
//!   appear, in order, in that log.
//!
//! ## Example
//!
//! ```rust
//! use trio_stress::{run, StressConfig};
//!
//! let config = StressConfig::from_toml_str("commits = 1000").unwrap();
//! let report = run(&config).unwrap();
//! assert_eq!(report.produced, 1000);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod runner;
pub mod verify;

pub use config::{Backend, StressConfig, Workload};
pub use error::{StressError, StressResult};
pub use runner::{run, StressReport};
