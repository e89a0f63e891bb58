//! Tournament module: resource models, local filtering and the operations
//! exposed by the command-line client.
//!
//! ## Example
//!
//! ```no_run
//! use bracket_admin::config::{ClientConfig, ConfigOverrides};
//! use bracket_admin::tournament::{TournamentFilter, TournamentManager, TournamentType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env(ConfigOverrides::default())?;
//!     let manager = TournamentManager::from_config(&config)?;
//!
//!     let created = manager
//!         .create("Friday Cup", TournamentType::DoubleElimination, None)
//!         .await?;
//!     println!("Created tournament: {}", created.tournament.id);
//!
//!     let recent = manager.list(&TournamentFilter::default()).await?;
//!     println!("{} tournaments", recent.len());
//!     Ok(())
//! }
//! ```

pub mod filter;
pub mod manager;
pub mod models;

pub use filter::{DEFAULT_TIMEZONE, FilterError, TournamentFilter, local_created_at, parse_date};
pub use manager::{
    CreatedTournament, DeleteReport, RemovalReport, TournamentError, TournamentManager,
    TournamentResult, normalize_names,
};
pub use models::{
    DEFAULT_ROUND_LABELS, NewTournament, Participant, ParticipantId, Tournament, TournamentId,
    TournamentState, TournamentType, TournamentUpdate,
};
