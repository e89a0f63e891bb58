//! Internal modules for the tournament client.
//!
//! This library provides argument parsing, command execution, output
//! rendering and logging setup used by the ba_cli binary.

pub mod app;
pub mod commands;
pub mod logging;
pub mod output;
