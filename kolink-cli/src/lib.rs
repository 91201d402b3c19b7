//! Kolink CLI library
//!
//! This library provides the command-line interface for compiling Korean
//! dictionary entries into an expression automaton and scanning text with it.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
