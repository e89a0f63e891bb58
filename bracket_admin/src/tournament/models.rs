//! Tournament and participant resources as the bracket service exposes them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Tournament ID type
pub type TournamentId = u64;

/// Participant ID type
pub type ParticipantId = u64;

/// Round labels applied to every newly created bracket
pub const DEFAULT_ROUND_LABELS: [&str; 5] = [
    "Huitièmes de finale",
    "Quarts de finale",
    "Demi-finales",
    "Finale",
    "Grande Finale",
];

/// Bracket format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentType {
    #[serde(rename = "single elimination")]
    SingleElimination,
    #[serde(rename = "double elimination")]
    DoubleElimination,
    #[serde(rename = "round robin")]
    RoundRobin,
    #[serde(rename = "swiss")]
    Swiss,
    /// Any format this client does not know about, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl TournamentType {
    /// Wire name of the format
    pub fn as_str(&self) -> &str {
        match self {
            TournamentType::SingleElimination => "single elimination",
            TournamentType::DoubleElimination => "double elimination",
            TournamentType::RoundRobin => "round robin",
            TournamentType::Swiss => "swiss",
            TournamentType::Other(name) => name,
        }
    }

    /// The elimination format on the other side of a toggle.
    ///
    /// Round robin, swiss and unknown formats have no counterpart.
    pub fn toggled(&self) -> Option<Self> {
        match self {
            TournamentType::SingleElimination => Some(TournamentType::DoubleElimination),
            TournamentType::DoubleElimination => Some(TournamentType::SingleElimination),
            TournamentType::RoundRobin | TournamentType::Swiss | TournamentType::Other(_) => None,
        }
    }
}

impl fmt::Display for TournamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    Pending,
    Underway,
    AwaitingReview,
    Complete,
    /// Any state this client does not know about, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for TournamentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentState::Pending => f.write_str("pending"),
            TournamentState::Underway => f.write_str("underway"),
            TournamentState::AwaitingReview => f.write_str("awaiting_review"),
            TournamentState::Complete => f.write_str("complete"),
            TournamentState::Other(state) => f.write_str(state),
        }
    }
}

/// A bracket competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    /// URL slug, unique per account
    #[serde(default)]
    pub url: String,
    pub name: String,
    pub tournament_type: TournamentType,
    #[serde(default)]
    pub game_name: Option<String>,
    /// Creation time as sent by the server, offset included
    pub created_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub participants_count: u32,
    pub state: TournamentState,
    #[serde(default)]
    pub full_challonge_url: Option<String>,
    /// Only filled when requested with `include_participants`
    #[serde(
        default,
        deserialize_with = "unwrap_participants",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub participants: Vec<Participant>,
}

/// An entrant in a bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub seed: u32,
}

/// `{"tournament": {...}}` wrapper used on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentEnvelope {
    pub tournament: Tournament,
}

/// `{"participant": {...}}` wrapper used on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEnvelope {
    pub participant: Participant,
}

fn unwrap_participants<'de, D>(deserializer: D) -> Result<Vec<Participant>, D::Error>
where
    D: Deserializer<'de>,
{
    let envelopes = Option::<Vec<ParticipantEnvelope>>::deserialize(deserializer)?;
    Ok(envelopes
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.participant)
        .collect())
}

/// Payload for creating a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTournament {
    pub name: String,
    pub tournament_type: TournamentType,
    /// Custom URL slug; the service generates one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub game_name: String,
    pub description: String,
    pub show_rounds: bool,
    pub private: bool,
}

/// Partial update of a tournament; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TournamentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament_type: Option<TournamentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_round_labels: Option<Vec<String>>,
}

impl TournamentUpdate {
    /// Update that only switches the bracket format
    pub fn tournament_type(tournament_type: TournamentType) -> Self {
        Self {
            tournament_type: Some(tournament_type),
            ..Default::default()
        }
    }

    /// Update that installs the default round labels
    pub fn default_round_labels() -> Self {
        Self {
            custom_round_labels: Some(DEFAULT_ROUND_LABELS.iter().map(|l| l.to_string()).collect()),
            ..Default::default()
        }
    }
}

/// One entry of a bulk-add request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewParticipant {
    pub name: String,
}
