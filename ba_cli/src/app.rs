//! Subcommand execution.

use crate::commands::Command;
use crate::output::{self, TournamentRow};
use anyhow::{Context, Result};
use bracket_admin::api::ApiError;
use bracket_admin::import::load_roster;
use bracket_admin::tournament::{TournamentError, TournamentManager};
use serde_json::json;

/// Rendered result of a subcommand
#[derive(Debug)]
pub struct Outcome {
    /// Text for stdout
    pub text: String,
    /// False when the command partly failed (some deletions did not go through)
    pub success: bool,
}

impl Outcome {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Run one subcommand against the service and render its result
pub async fn execute(manager: &TournamentManager, command: Command, json: bool) -> Result<Outcome> {
    let tz = manager.timezone();

    match command {
        Command::List { filter } => {
            let tournaments = manager
                .list(&filter)
                .await
                .context("Failed to list tournaments")?;
            let text = if json {
                output::tournaments_json(&tournaments, tz)?
            } else {
                output::tournaments_table(&tournaments, tz)
            };
            Ok(Outcome::ok(text))
        }

        Command::Delete { filter, dry_run } => {
            let report = manager
                .delete_matching(&filter, dry_run)
                .await
                .context("Failed to delete tournaments")?;
            let text = if json {
                let deleted: Vec<TournamentRow> = report
                    .deleted
                    .iter()
                    .map(|t| TournamentRow::new(t, tz))
                    .collect();
                let failed: Vec<_> = report
                    .failed
                    .iter()
                    .map(|(t, e)| json!({ "id": t.id, "name": t.name, "error": e.to_string() }))
                    .collect();
                output::to_json(&json!({
                    "dry_run": report.dry_run,
                    "deleted": deleted,
                    "failed": failed,
                }))?
            } else {
                output::delete_summary(&report, tz)
            };
            Ok(Outcome {
                text,
                success: report.is_clean(),
            })
        }

        Command::Create {
            name,
            tournament_type,
            url,
        } => {
            let created = manager
                .create(&name, tournament_type, url)
                .await
                .with_context(|| format!("Failed to create tournament '{}'", name))?;
            let tournament = &created.tournament;

            let text = if json {
                output::to_json(&json!({
                    "tournament": TournamentRow::new(tournament, tz),
                    "labels_applied": created.labels_applied,
                }))?
            } else {
                let mut text = format!(
                    "Tournament created: {} (#{})",
                    tournament
                        .full_challonge_url
                        .as_deref()
                        .unwrap_or(&tournament.url),
                    tournament.id
                );
                if !created.labels_applied {
                    text.push_str("\nWarning: custom round labels could not be applied");
                }
                text
            };
            Ok(Outcome::ok(text))
        }

        Command::AddParticipants {
            tournament_id,
            mut names,
            rosters,
        } => {
            let client = manager.client();
            for roster in &rosters {
                let imported = load_roster(roster, client.http(), client.retry_policy())
                    .await
                    .with_context(|| format!("Failed to import roster {:?}", roster))?;
                tracing::info!("Imported {} names from {:?}", imported.len(), roster);
                names.extend(imported);
            }

            let added = match manager.add_participants(&tournament_id, names).await {
                Ok(added) => added,
                Err(TournamentError::Api(ApiError::DuplicateParticipant { errors, payload })) => {
                    let payload = serde_json::to_string_pretty(&payload)
                        .unwrap_or_else(|_| payload.to_string());
                    anyhow::bail!(
                        "Duplicate participant: {}\nPayload sent:\n{}",
                        errors.join("; "),
                        payload
                    );
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to add participants to {}", tournament_id)
                    });
                }
            };

            let text = if json {
                output::to_json(&added)?
            } else {
                format!(
                    "{} participant(s) added.\n{}",
                    added.len(),
                    output::participants_table(&added)
                )
            };
            Ok(Outcome::ok(text))
        }

        Command::RemoveParticipants {
            tournament_id,
            dry_run,
        } => {
            let report = manager
                .remove_all_participants(&tournament_id, dry_run)
                .await
                .with_context(|| format!("Failed to remove participants from {}", tournament_id))?;

            let text = if json {
                output::to_json(&json!({
                    "dry_run": report.dry_run,
                    "removed": report.removed,
                }))?
            } else if report.dry_run {
                format!(
                    "Dry run: {} participant(s) would be removed.\n{}",
                    report.removed.len(),
                    output::participants_table(&report.removed)
                )
            } else {
                format!("{} participant(s) removed.", report.removed.len())
            };
            Ok(Outcome::ok(text))
        }

        Command::ToggleType { tournament_id } => {
            let tournament = manager
                .toggle_type(&tournament_id)
                .await
                .with_context(|| format!("Failed to toggle type of {}", tournament_id))?;
            let text = if json {
                output::to_json(&TournamentRow::new(&tournament, tz))?
            } else {
                format!(
                    "Tournament {} is now {}.",
                    tournament.id, tournament.tournament_type
                )
            };
            Ok(Outcome::ok(text))
        }

        Command::Randomize { tournament_id } => {
            let participants = manager
                .randomize(&tournament_id)
                .await
                .with_context(|| format!("Failed to randomize seeding of {}", tournament_id))?;
            let text = if json {
                output::to_json(&participants)?
            } else {
                format!(
                    "Seeding shuffled.\n{}",
                    output::participants_table(&participants)
                )
            };
            Ok(Outcome::ok(text))
        }

        Command::Show { tournament_id } => {
            let tournament = manager
                .show(&tournament_id)
                .await
                .with_context(|| format!("Failed to fetch tournament {}", tournament_id))?;
            let text = if json {
                output::to_json(&json!({
                    "tournament": TournamentRow::new(&tournament, tz),
                    "participants": tournament.participants,
                }))?
            } else {
                output::tournament_detail(&tournament, tz)
            };
            Ok(Outcome::ok(text))
        }
    }
}
