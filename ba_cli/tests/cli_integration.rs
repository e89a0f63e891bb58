//! End-to-end tests: parsed command line, executed against a stub API.

use ba_cli::app::execute;
use ba_cli::commands::parse_args;
use bracket_admin::{ClientConfig, RetryPolicy, TournamentManager};
use serde_json::{Value, json};
use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a manager talking to the stub server
fn manager_for(server: &MockServer) -> TournamentManager {
    let mut config = ClientConfig::new("test-key", server.uri());
    config.retry = RetryPolicy::new(2, Duration::ZERO);
    TournamentManager::from_config(&config).expect("Failed to build manager")
}

fn args(list: &[&str]) -> Vec<OsString> {
    list.iter().map(OsString::from).collect()
}

fn tournament(id: u64, name: &str, created_at: &str) -> Value {
    json!({
        "tournament": {
            "id": id,
            "url": format!("t{}", id),
            "name": name,
            "tournament_type": "single elimination",
            "created_at": created_at,
            "participants_count": 8,
            "state": "pending",
            "full_challonge_url": format!("https://challonge.com/t{}", id)
        }
    })
}

async fn mount_two_tournaments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/tournaments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            tournament(1, "Winter Cup", "2024-01-10T20:00:00Z"),
            tournament(2, "Spring Cup", "2024-04-10T20:00:00Z"),
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_prints_filtered_table() {
    let server = MockServer::start().await;
    mount_two_tournaments(&server).await;

    let invocation = parse_args(args(&["list", "--date", "2024-04-01"])).unwrap();
    let outcome = execute(&manager_for(&server), invocation.command, false)
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.text.contains("Spring Cup"));
    assert!(!outcome.text.contains("Winter Cup"));
    assert!(outcome.text.contains("2024-04-10 22:00:00 CEST"));
}

#[tokio::test]
async fn test_list_json_output() {
    let server = MockServer::start().await;
    mount_two_tournaments(&server).await;

    let invocation = parse_args(args(&["list", "--json"])).unwrap();
    let outcome = execute(
        &manager_for(&server),
        invocation.command,
        invocation.global.json,
    )
    .await
    .unwrap();

    let rows: Value = serde_json::from_str(&outcome.text).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["name"], "Winter Cup");
}

#[tokio::test]
async fn test_delete_with_failure_is_not_successful() {
    let server = MockServer::start().await;
    mount_two_tournaments(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/tournaments/1.json"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/tournaments/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let invocation = parse_args(args(&["delete", "--date", "2024-01-01"])).unwrap();
    let outcome = execute(&manager_for(&server), invocation.command, false)
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.text.contains("1 tournament(s) deleted."));
    assert!(outcome.text.contains("1 deletion(s) failed"));
    assert!(outcome.text.contains("forbidden"));
}

#[tokio::test]
async fn test_duplicate_participant_error_shows_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tournaments/9/participants/bulk_add.json"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "errors": ["Name has already been taken"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let invocation = parse_args(args(&[
        "add_participants",
        "--tournament_id",
        "9",
        "--participants",
        "alice",
    ]))
    .unwrap();
    let err = execute(&manager_for(&server), invocation.command, false)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Name has already been taken"));
    assert!(message.contains("\"alice\""));
    assert!(!message.contains("test-key"));
}

#[tokio::test]
async fn test_add_participants_merges_csv_roster() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tournaments/9/participants/bulk_add.json"))
        .and(body_partial_json(json!({
            "participants": [{ "name": "alice" }, { "name": "bob" }, { "name": "carol" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "participant": { "id": 1, "name": "alice", "seed": 1 } },
            { "participant": { "id": 2, "name": "bob", "seed": 2 } },
            { "participant": { "id": 3, "name": "carol", "seed": 3 } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut roster = tempfile::NamedTempFile::new().unwrap();
    writeln!(roster, "name").unwrap();
    writeln!(roster, "bob").unwrap();
    writeln!(roster, "carol").unwrap();

    let roster_path = roster.path().to_string_lossy().into_owned();
    let invocation = parse_args(args(&[
        "add_participants",
        "--tournament_id",
        "9",
        "--participants",
        "alice",
        "--csv",
        &roster_path,
    ]))
    .unwrap();
    let outcome = execute(&manager_for(&server), invocation.command, false)
        .await
        .unwrap();

    assert!(outcome.text.starts_with("3 participant(s) added."));
}

#[tokio::test]
async fn test_create_prints_tournament_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tournaments.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(tournament(12, "Cup", "2024-05-01T18:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/tournaments/12.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(tournament(12, "Cup", "2024-05-01T18:00:00Z")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let invocation = parse_args(args(&["create_single", "--name", "Cup"])).unwrap();
    let outcome = execute(&manager_for(&server), invocation.command, false)
        .await
        .unwrap();

    assert_eq!(
        outcome.text,
        "Tournament created: https://challonge.com/t12 (#12)"
    );
}

#[tokio::test]
async fn test_global_options_before_subcommand() {
    let server = MockServer::start().await;
    mount_two_tournaments(&server).await;

    let invocation = parse_args(args(&["--json", "--timezone", "UTC", "list"])).unwrap();
    assert_eq!(invocation.global.timezone.as_deref(), Some("UTC"));

    let outcome = execute(
        &manager_for(&server),
        invocation.command,
        invocation.global.json,
    )
    .await
    .unwrap();

    let rows: Value = serde_json::from_str(&outcome.text).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_where_every_deletion_fails() {
    let server = MockServer::start().await;
    mount_two_tournaments(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/tournaments/2.json"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let invocation = parse_args(args(&["delete", "--date", "2024-04-01"])).unwrap();
    let outcome = execute(&manager_for(&server), invocation.command, false)
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.text.starts_with("0 tournament(s) deleted."));
    assert!(outcome.text.contains("2 (Spring Cup)"));
    assert!(!outcome.text.contains("No tournaments match"));
}
