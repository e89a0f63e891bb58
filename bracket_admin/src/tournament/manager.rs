//! Tournament manager: the operations an organizer runs against the service.

use super::filter::TournamentFilter;
use super::models::{
    NewTournament, Participant, Tournament, TournamentType, TournamentUpdate,
};
use crate::api::{ApiError, ChallongeClient};
use crate::config::{ClientConfig, TournamentDefaults};
use chrono_tz::Tz;
use std::collections::HashSet;
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Tournament name must not be empty")]
    EmptyName,

    #[error("No participant names given")]
    NoParticipants,

    #[error("Participant '{0}' appears more than once in the request")]
    DuplicateInRequest(String),

    #[error("Cannot toggle a {0} tournament: only single and double elimination swap")]
    CannotToggle(TournamentType),

    #[error("Refusing to delete without a start date")]
    UnboundedDelete,
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Outcome of a bulk delete
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Tournaments removed (or that would be, on a dry run)
    pub deleted: Vec<Tournament>,
    /// Tournaments whose DELETE failed, with the error
    pub failed: Vec<(Tournament, ApiError)>,
    pub dry_run: bool,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of a tournament creation
#[derive(Debug)]
pub struct CreatedTournament {
    pub tournament: Tournament,
    /// Whether the default round labels were applied
    pub labels_applied: bool,
}

/// Outcome of clearing a tournament's participant list
#[derive(Debug)]
pub struct RemovalReport {
    pub removed: Vec<Participant>,
    pub dry_run: bool,
}

/// Tournament manager
pub struct TournamentManager {
    client: ChallongeClient,
    timezone: Tz,
    defaults: TournamentDefaults,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(client: ChallongeClient, timezone: Tz, defaults: TournamentDefaults) -> Self {
        Self {
            client,
            timezone,
            defaults,
        }
    }

    /// Build the client and the manager from one configuration
    pub fn from_config(config: &ClientConfig) -> TournamentResult<Self> {
        let client = ChallongeClient::new(config)?;
        Ok(Self::new(client, config.timezone, config.defaults.clone()))
    }

    /// Zone used for date filtering and display
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn client(&self) -> &ChallongeClient {
        &self.client
    }

    /// List tournaments matching `filter`, oldest first
    pub async fn list(&self, filter: &TournamentFilter) -> TournamentResult<Vec<Tournament>> {
        let tournaments = self.client.list_tournaments().await?;
        let total = tournaments.len();
        let kept = filter.apply(tournaments, self.timezone);
        log::info!("{} of {} tournaments match", kept.len(), total);
        Ok(kept)
    }

    /// Delete every tournament matching `filter`.
    ///
    /// A failing DELETE is logged and recorded; the remaining matches are
    /// still attempted. The filter must carry a start date.
    pub async fn delete_matching(
        &self,
        filter: &TournamentFilter,
        dry_run: bool,
    ) -> TournamentResult<DeleteReport> {
        if filter.since.is_none() {
            return Err(TournamentError::UnboundedDelete);
        }

        let matches = self.list(filter).await?;
        let mut report = DeleteReport {
            dry_run,
            ..Default::default()
        };

        if dry_run {
            report.deleted = matches;
            return Ok(report);
        }

        for tournament in matches {
            match self.client.delete_tournament(&tournament.id.to_string()).await {
                Ok(()) => {
                    log::info!("Deleted tournament {} ({})", tournament.id, tournament.name);
                    report.deleted.push(tournament);
                }
                Err(e) => {
                    log::warn!(
                        "Failed to delete tournament {} ({}): {}",
                        tournament.id,
                        tournament.name,
                        e
                    );
                    report.failed.push((tournament, e));
                }
            }
        }

        Ok(report)
    }

    /// Create a tournament and give it the default round labels.
    ///
    /// Failing to set the labels does not undo the creation.
    pub async fn create(
        &self,
        name: &str,
        tournament_type: TournamentType,
        url: Option<String>,
    ) -> TournamentResult<CreatedTournament> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }

        let request = NewTournament {
            name: name.to_string(),
            tournament_type,
            url,
            game_name: self.defaults.game_name.clone(),
            description: self.defaults.description.clone(),
            show_rounds: self.defaults.show_rounds,
            private: self.defaults.private,
        };

        let tournament = self.client.create_tournament(&request).await?;
        log::info!("Created tournament {} ({})", tournament.id, tournament.name);

        let labels_applied = match self
            .client
            .update_tournament(
                &tournament.id.to_string(),
                &TournamentUpdate::default_round_labels(),
            )
            .await
        {
            Ok(_) => true,
            Err(e) => {
                log::warn!(
                    "Tournament {} created but round labels were not applied: {}",
                    tournament.id,
                    e
                );
                false
            }
        };

        Ok(CreatedTournament {
            tournament,
            labels_applied,
        })
    }

    /// Add participants in one bulk request
    pub async fn add_participants(
        &self,
        tournament_id: &str,
        names: Vec<String>,
    ) -> TournamentResult<Vec<Participant>> {
        let names = normalize_names(names)?;
        let added = self
            .client
            .bulk_add_participants(tournament_id, &names)
            .await?;
        log::info!("Added {} participants to {}", added.len(), tournament_id);
        Ok(added)
    }

    /// Remove every participant, one DELETE each; stops at the first failure
    pub async fn remove_all_participants(
        &self,
        tournament_id: &str,
        dry_run: bool,
    ) -> TournamentResult<RemovalReport> {
        let participants = self.client.list_participants(tournament_id).await?;

        if dry_run {
            return Ok(RemovalReport {
                removed: participants,
                dry_run,
            });
        }

        let mut removed = Vec::with_capacity(participants.len());
        for participant in participants {
            self.client
                .delete_participant(tournament_id, participant.id)
                .await?;
            log::debug!("Removed participant {} ({})", participant.id, participant.name);
            removed.push(participant);
        }

        Ok(RemovalReport { removed, dry_run })
    }

    /// Swap single and double elimination; returns the updated tournament
    pub async fn toggle_type(&self, tournament_id: &str) -> TournamentResult<Tournament> {
        let current = self.client.get_tournament(tournament_id, false).await?;
        let next = current
            .tournament_type
            .toggled()
            .ok_or_else(|| TournamentError::CannotToggle(current.tournament_type.clone()))?;

        let updated = self
            .client
            .update_tournament(tournament_id, &TournamentUpdate::tournament_type(next))
            .await?;
        log::info!(
            "Tournament {} switched from {} to {}",
            tournament_id,
            current.tournament_type,
            updated.tournament_type
        );
        Ok(updated)
    }

    /// Shuffle seeding; returns participants ordered by their new seed
    pub async fn randomize(&self, tournament_id: &str) -> TournamentResult<Vec<Participant>> {
        let mut participants = self.client.randomize_participants(tournament_id).await?;
        participants.sort_by_key(|p| p.seed);
        Ok(participants)
    }

    /// Tournament with participants ordered by seed
    pub async fn show(&self, tournament_id: &str) -> TournamentResult<Tournament> {
        let mut tournament = self.client.get_tournament(tournament_id, true).await?;
        tournament.participants.sort_by_key(|p| p.seed);
        Ok(tournament)
    }
}

/// Trim names, drop blanks and refuse repeats (case-insensitive)
pub fn normalize_names(names: Vec<String>) -> TournamentResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(TournamentError::DuplicateInRequest(name.to_string()));
        }
        result.push(name.to_string());
    }

    if result.is_empty() {
        return Err(TournamentError::NoParticipants);
    }
    Ok(result)
}
