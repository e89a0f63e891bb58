//! Date and participant-count filtering in the organizer's local timezone.

use super::models::Tournament;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use thiserror::Error;

/// Timezone used when none is configured
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

/// Filter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {since} is after end date {until}")]
    InvertedRange { since: NaiveDate, until: NaiveDate },
}

/// Which tournaments to keep.
///
/// Both date bounds are inclusive and are compared against the calendar
/// date of `created_at` once converted to the local timezone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentFilter {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub participants_count: Option<u32>,
}

impl TournamentFilter {
    /// Build a filter, rejecting an inverted date range
    pub fn new(
        since: Option<NaiveDate>,
        until: Option<NaiveDate>,
        participants_count: Option<u32>,
    ) -> Result<Self, FilterError> {
        if let (Some(since), Some(until)) = (since, until) {
            if since > until {
                return Err(FilterError::InvertedRange { since, until });
            }
        }

        Ok(Self {
            since,
            until,
            participants_count,
        })
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.participants_count.is_none()
    }

    /// Check a tournament against every criterion
    pub fn matches(&self, tournament: &Tournament, timezone: Tz) -> bool {
        let local_date = local_created_at(tournament, timezone).date_naive();

        if self.since.is_some_and(|since| local_date < since) {
            return false;
        }
        if self.until.is_some_and(|until| local_date > until) {
            return false;
        }
        if self
            .participants_count
            .is_some_and(|count| tournament.participants_count != count)
        {
            return false;
        }

        true
    }

    /// Keep the matching tournaments, oldest first
    pub fn apply(&self, tournaments: Vec<Tournament>, timezone: Tz) -> Vec<Tournament> {
        let mut kept: Vec<Tournament> = tournaments
            .into_iter()
            .filter(|t| self.matches(t, timezone))
            .collect();
        kept.sort_by_key(|t| t.created_at);
        kept
    }
}

/// Creation time of a tournament in the given zone
pub fn local_created_at(tournament: &Tournament, timezone: Tz) -> DateTime<Tz> {
    tournament.created_at.with_timezone(&timezone)
}

/// Parse a `YYYY-MM-DD` date as typed on the command line
pub fn parse_date(input: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(input.to_string()))
}
