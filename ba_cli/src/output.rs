//! Table and JSON rendering of command results.

use bracket_admin::tournament::{DeleteReport, Participant, Tournament, local_created_at};
use chrono_tz::Tz;
use serde::Serialize;

/// Tournament as printed to the user, with a localized creation time
#[derive(Debug, Serialize)]
pub struct TournamentRow {
    pub id: u64,
    pub name: String,
    pub tournament_type: String,
    pub created_at: String,
    pub participants_count: u32,
    pub state: String,
    pub url: Option<String>,
}

impl TournamentRow {
    pub fn new(tournament: &Tournament, timezone: Tz) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name.clone(),
            tournament_type: tournament.tournament_type.to_string(),
            created_at: format_local(tournament, timezone),
            participants_count: tournament.participants_count,
            state: tournament.state.to_string(),
            url: tournament.full_challonge_url.clone(),
        }
    }
}

/// Creation time in `timezone`, e.g. `2024-03-10 00:30:00 CET`
pub fn format_local(tournament: &Tournament, timezone: Tz) -> String {
    local_created_at(tournament, timezone)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Render rows as a bordered grid, header separated by `=`
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![
        grid_border(&widths, '-'),
        grid_line(&widths, headers),
        grid_border(&widths, '='),
    ];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(grid_line(&widths, &cells));
        lines.push(grid_border(&widths, '-'));
    }
    lines.join("\n")
}

fn grid_border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line
}

fn grid_line(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).copied().unwrap_or("");
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat_n(' ', width - cell.chars().count() + 1));
        line.push('|');
    }
    line
}

/// Tournament listing as a grid
pub fn tournaments_table(tournaments: &[Tournament], timezone: Tz) -> String {
    if tournaments.is_empty() {
        return "No tournaments match the given filters.".to_string();
    }

    let created_header = format!("Created ({})", timezone.name());
    let headers = [
        "ID",
        "Name",
        "Type",
        created_header.as_str(),
        "Participants",
        "State",
    ];
    let rows: Vec<Vec<String>> = tournaments
        .iter()
        .map(|t| {
            let row = TournamentRow::new(t, timezone);
            vec![
                row.id.to_string(),
                row.name,
                row.tournament_type,
                row.created_at,
                row.participants_count.to_string(),
                row.state,
            ]
        })
        .collect();

    render_grid(&headers, &rows)
}

/// Participants as a Seed / ID / Name grid
pub fn participants_table(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "No participants.".to_string();
    }

    let rows: Vec<Vec<String>> = participants
        .iter()
        .map(|p| vec![p.seed.to_string(), p.id.to_string(), p.name.clone()])
        .collect();
    render_grid(&["Seed", "ID", "Name"], &rows)
}

/// Header block followed by the participant grid
pub fn tournament_detail(tournament: &Tournament, timezone: Tz) -> String {
    let row = TournamentRow::new(tournament, timezone);
    let mut out = format!(
        "{} (#{})\n  Type:         {}\n  State:        {}\n  Created:      {}\n  Participants: {}\n",
        row.name, row.id, row.tournament_type, row.state, row.created_at, row.participants_count
    );
    if let Some(game) = &tournament.game_name {
        out.push_str(&format!("  Game:         {}\n", game));
    }
    if let Some(url) = &row.url {
        out.push_str(&format!("  URL:          {}\n", url));
    }
    out.push('\n');
    out.push_str(&participants_table(&tournament.participants));
    out
}

/// Summary of a bulk delete
pub fn delete_summary(report: &DeleteReport, timezone: Tz) -> String {
    if report.deleted.is_empty() && report.failed.is_empty() {
        return "No tournaments match the given filters.".to_string();
    }

    let mut out = String::new();
    if report.dry_run {
        out.push_str(&format!(
            "Dry run: {} tournament(s) would be deleted.\n",
            report.deleted.len()
        ));
    } else {
        out.push_str(&format!("{} tournament(s) deleted.\n", report.deleted.len()));
    }
    if !report.deleted.is_empty() {
        out.push_str(&tournaments_table(&report.deleted, timezone));
    }

    if !report.failed.is_empty() {
        out.push_str(&format!("\n{} deletion(s) failed:", report.failed.len()));
        for (tournament, error) in &report.failed {
            out.push_str(&format!("\n  {} ({}): {}", tournament.id, tournament.name, error));
        }
    }
    out
}

/// Serialize any result as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Tournament rows as JSON
pub fn tournaments_json(tournaments: &[Tournament], timezone: Tz) -> serde_json::Result<String> {
    let rows: Vec<TournamentRow> = tournaments
        .iter()
        .map(|t| TournamentRow::new(t, timezone))
        .collect();
    to_json(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_admin::tournament::{TournamentState, TournamentType};
    use chrono::DateTime;

    fn tournament(id: u64, name: &str) -> Tournament {
        Tournament {
            id,
            url: format!("t{}", id),
            name: name.to_string(),
            tournament_type: TournamentType::DoubleElimination,
            game_name: Some("Call of Duty: Warzone".to_string()),
            created_at: DateTime::parse_from_rfc3339("2024-03-09T23:30:00Z").unwrap(),
            participants_count: 16,
            state: TournamentState::Underway,
            full_challonge_url: Some(format!("https://challonge.com/t{}", id)),
            participants: Vec::new(),
        }
    }

    #[test]
    fn test_render_grid_layout() {
        let grid = render_grid(
            &["A", "Name"],
            &[vec!["1".to_string(), "alice".to_string()]],
        );
        let expected = "\
+---+-------+
| A | Name  |
+===+=======+
| 1 | alice |
+---+-------+";
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_render_grid_handles_multibyte_names() {
        let grid = render_grid(&["Name"], &[vec!["Élodie".to_string()]]);
        let lines: Vec<&str> = grid.lines().collect();
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_format_local_uses_zone_abbreviation() {
        let t = tournament(1, "Cup");
        assert_eq!(
            format_local(&t, chrono_tz::Europe::Paris),
            "2024-03-10 00:30:00 CET"
        );
        assert_eq!(format_local(&t, chrono_tz::UTC), "2024-03-09 23:30:00 UTC");
    }

    #[test]
    fn test_tournaments_table_contents() {
        let table = tournaments_table(&[tournament(1, "Spring Cup")], chrono_tz::Europe::Paris);
        assert!(table.contains("Created (Europe/Paris)"));
        assert!(table.contains("Spring Cup"));
        assert!(table.contains("double elimination"));
        assert!(table.contains("underway"));
    }

    #[test]
    fn test_empty_listing_message() {
        assert_eq!(
            tournaments_table(&[], chrono_tz::UTC),
            "No tournaments match the given filters."
        );
    }

    #[test]
    fn test_tournaments_json() {
        let json = tournaments_json(&[tournament(3, "Cup")], chrono_tz::UTC).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 3);
        assert_eq!(value[0]["created_at"], "2024-03-09 23:30:00 UTC");
        assert_eq!(value[0]["participants_count"], 16);
    }

    #[test]
    fn test_participants_table() {
        let participants = vec![
            Participant {
                id: 10,
                name: "alice".to_string(),
                seed: 1,
            },
            Participant {
                id: 11,
                name: "bob".to_string(),
                seed: 2,
            },
        ];
        let table = participants_table(&participants);
        assert!(table.starts_with("+------+----+-------+"));
        assert!(table.contains("| 1    | 10 | alice |"));
    }

    #[test]
    fn test_delete_summary_dry_run() {
        let report = DeleteReport {
            deleted: vec![tournament(1, "Cup")],
            failed: Vec::new(),
            dry_run: true,
        };
        let summary = delete_summary(&report, chrono_tz::UTC);
        assert!(summary.starts_with("Dry run: 1 tournament(s) would be deleted."));
    }

    #[test]
    fn test_delete_summary_when_every_deletion_fails() {
        let report = DeleteReport {
            deleted: Vec::new(),
            failed: vec![(
                tournament(4, "Locked Cup"),
                bracket_admin::api::ApiError::Decode {
                    endpoint: "tournaments/4".to_string(),
                    error: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
                },
            )],
            dry_run: false,
        };
        let summary = delete_summary(&report, chrono_tz::UTC);
        assert!(summary.starts_with("0 tournament(s) deleted."));
        assert!(summary.contains("1 deletion(s) failed"));
        assert!(summary.contains("4 (Locked Cup)"));
        assert!(!summary.contains("No tournaments match"));
    }
}
