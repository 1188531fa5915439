//! Monte Carlo damage simulator for a dual-wielding fury warrior: a character build is turned
//! into combat stats, fought against a target dummy for many independent batches, and reduced to
//! a mean DPS with its sampling error. Stat weights are measured by re-running with one attribute
//! nudged up and down.

pub mod character;
pub mod cli;
pub mod combat;
pub mod data;
pub mod error;
pub mod parallel;
pub mod server;
pub mod weights;

pub use error::{LoadError, SimulationError};
