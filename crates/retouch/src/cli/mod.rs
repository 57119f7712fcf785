//! Subcommand implementations.

pub mod config;
pub mod interactive;
pub mod keys;
pub mod run;
