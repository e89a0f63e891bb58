//! Command-line client for managing tournaments on a bracket-hosting API.
//!
//! Every subcommand runs one or more sequential REST calls through the
//! `bracket_admin` library and prints a table (or JSON) on stdout.

use anyhow::{Context, Result};
use ba_cli::{app, commands::parse_args, logging};
use bracket_admin::{ClientConfig, TournamentManager};
use std::ffi::OsString;
use std::time::Instant;

const HELP: &str = "\
Manage tournaments on a bracket-hosting service

USAGE:
  ba_cli [GLOBAL OPTIONS] <SUBCOMMAND> [OPTIONS]

Global options are accepted before or after the subcommand.

SUBCOMMANDS:
  list                  List tournaments
      --date YYYY-MM-DD        Created on or after this date
      --until YYYY-MM-DD       Created on or before this date
      --participants_count N   Exact participant count
  delete                Delete tournaments created on or after a date
      --date YYYY-MM-DD        Required
      --until YYYY-MM-DD
      --participants_count N
      --dry-run                Only show what would be deleted
  create_single         Create a single elimination tournament
      --name NAME              Required
      --url SLUG               Custom URL slug
  create_double         Create a double elimination tournament
      --name NAME              Required
      --url SLUG
  add_participants      Add participants in bulk
      --tournament_id ID       Required
      --participants NAME...   Names, space or comma separated
      --csv PATH               Roster file, first column is the name
      --sheet URL              Spreadsheet share link or CSV export URL
  remove_participants   Remove every participant
      --tournament_id ID       Required
      --dry-run
  toggle_type           Switch between single and double elimination
      --tournament_id ID       Required
  randomize             Shuffle seeding
      --tournament_id ID       Required
  show                  Show a tournament and its participants
      --tournament_id ID       Required

GLOBAL OPTIONS:
  --api-key KEY         API key  [default: env CHALLONGE_API_KEY]
  --base-url URL        API root  [default: env CHALLONGE_BASE_URL or https://api.challonge.com/v1]
  --timezone TZ         Zone for dates  [default: env BRACKET_TIMEZONE or Europe/Paris]
  --json                Print JSON instead of tables
  -v, --verbose         More logging (repeat for debug)

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  CHALLONGE_API_KEY            API key (required)
  BRACKET_MAX_RETRIES          Attempts per request [default: 3]
  BRACKET_RETRY_DELAY_SECS     Delay between attempts [default: 5]
  BRACKET_HTTP_TIMEOUT_SECS    Request timeout [default: 30]
  BRACKET_GAME_NAME            Game of new tournaments
  BRACKET_DESCRIPTION          Description of new tournaments
  BRACKET_PRIVATE              Create tournaments as private [default: false]
  RUST_LOG                     Log filter, overrides -v
  (A .env file in the working directory is loaded first)
";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    // Help has a higher priority and should be handled separately.
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{HELP}");
        std::process::exit(0);
    }

    let invocation = parse_args(args).context("Invalid arguments (see --help)")?;
    logging::init(invocation.global.verbosity);

    let config = ClientConfig::from_env(invocation.global.overrides())?;
    config.validate()?;
    tracing::debug!(
        "Using {} (timezone {}, {} attempts per request)",
        config.base_url,
        config.timezone,
        config.retry.max_attempts
    );

    let manager =
        TournamentManager::from_config(&config).context("Failed to initialise API client")?;

    let command = invocation.command;
    let name = command.name();
    let start = Instant::now();
    let result = app::execute(&manager, command, invocation.global.json).await;
    let elapsed = start.elapsed().as_millis() as u64;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            logging::log_command(name, elapsed, false);
            return Err(e);
        }
    };
    logging::log_command(name, elapsed, outcome.success);

    println!("{}", outcome.text);
    if !outcome.success {
        std::process::exit(1);
    }

    Ok(())
}
