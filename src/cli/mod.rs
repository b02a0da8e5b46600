//! Command-line interface for nbfix
//!
//! - `args`: argument definitions (clap)
//! - `run`: entry point, configuration and output
//! - `report`: human-readable outcome rendering

pub mod args;
mod report;
mod run;

#[cfg(test)]
mod tests;

pub use args::{Cli, build_cli};
pub use run::{execute, run};
