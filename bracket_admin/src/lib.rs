//! # Bracket Admin
//!
//! Client library for managing tournaments on a bracket-hosting JSON API
//! (Challonge v1): creating brackets, bulk participant management, seeding
//! shuffles, bracket-type toggles and date-filtered listing or deletion.
//!
//! ## Core Modules
//!
//! - [`api`]: HTTP client, error classification and retry policy
//! - [`tournament`]: resource models, timezone-aware filtering, operations
//! - [`import`]: participant rosters from CSV files or spreadsheets
//! - [`config`]: environment-driven configuration
//!
//! All calls are sequential; nothing here spawns tasks.

pub mod api;
pub use api::{ApiError, ApiResult, ChallongeClient, RetryPolicy};

pub mod config;
pub use config::{ClientConfig, ConfigError, ConfigOverrides, TournamentDefaults};

pub mod import;

pub mod tournament;
pub use tournament::{
    Participant, Tournament, TournamentError, TournamentFilter, TournamentManager, TournamentType,
};
