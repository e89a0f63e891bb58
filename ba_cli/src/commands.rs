use bracket_admin::config::ConfigOverrides;
use bracket_admin::import::RosterSource;
use bracket_admin::tournament::{FilterError, TournamentFilter, TournamentType, parse_date};
use pico_args::Arguments;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Errors that can occur during argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No subcommand given.
    MissingSubcommand,
    /// Subcommand name not recognized.
    UnknownSubcommand(String),
    /// A required option is absent.
    MissingOption(&'static str),
    /// An option value could not be parsed.
    InvalidArgument(String),
    /// Leftover arguments nothing consumed.
    UnexpectedArguments(Vec<String>),
    /// `add_participants` without any name or roster.
    NoParticipantSource,
    /// Inconsistent date bounds.
    Filter(FilterError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSubcommand => write!(f, "Missing subcommand. Run with --help to list them"),
            Self::UnknownSubcommand(name) => write!(
                f,
                "Unrecognized subcommand '{}'. Run with --help to list them",
                name
            ),
            Self::MissingOption(option) => write!(f, "Missing required option {}", option),
            Self::InvalidArgument(reason) => write!(f, "{}", reason),
            Self::UnexpectedArguments(args) => {
                write!(f, "Unexpected arguments: {}", args.join(" "))
            }
            Self::NoParticipantSource => write!(
                f,
                "No participants given. Use --participants, --csv, --sheet or list names"
            ),
            Self::Filter(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<pico_args::Error> for ParseError {
    fn from(e: pico_args::Error) -> Self {
        ParseError::InvalidArgument(e.to_string())
    }
}

impl From<FilterError> for ParseError {
    fn from(e: FilterError) -> Self {
        ParseError::Filter(e)
    }
}

/// Options accepted by every subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timezone: Option<String>,
    /// Print JSON instead of tables
    pub json: bool,
    /// Number of `-v` flags
    pub verbosity: u8,
}

impl GlobalOptions {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timezone: self.timezone.clone(),
        }
    }
}

/// One subcommand with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List {
        filter: TournamentFilter,
    },
    Delete {
        filter: TournamentFilter,
        dry_run: bool,
    },
    Create {
        name: String,
        tournament_type: TournamentType,
        url: Option<String>,
    },
    AddParticipants {
        tournament_id: String,
        names: Vec<String>,
        rosters: Vec<RosterSource>,
    },
    RemoveParticipants {
        tournament_id: String,
        dry_run: bool,
    },
    ToggleType {
        tournament_id: String,
    },
    Randomize {
        tournament_id: String,
    },
    Show {
        tournament_id: String,
    },
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::List { .. } => "list",
            Command::Delete { .. } => "delete",
            Command::Create {
                tournament_type: TournamentType::DoubleElimination,
                ..
            } => "create_double",
            Command::Create { .. } => "create_single",
            Command::AddParticipants { .. } => "add_participants",
            Command::RemoveParticipants { .. } => "remove_participants",
            Command::ToggleType { .. } => "toggle_type",
            Command::Randomize { .. } => "randomize",
            Command::Show { .. } => "show",
        }
    }
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub global: GlobalOptions,
    pub command: Command,
}

/// Parse command-line arguments (program name excluded).
///
/// # Examples
///
/// ```
/// use ba_cli::commands::{parse_args, Command};
///
/// let invocation = parse_args(vec!["randomize".into(), "--tournament_id".into(), "42".into()]).unwrap();
/// assert_eq!(invocation.command, Command::Randomize { tournament_id: "42".to_string() });
/// ```
pub fn parse_args(args: Vec<OsString>) -> Result<Invocation, ParseError> {
    let mut pargs = Arguments::from_vec(args);

    // Global options may come before or after the subcommand; they must be
    // consumed first since `subcommand()` only looks at the leading argument.
    let mut verbosity = 0u8;
    while pargs.contains(["-v", "--verbose"]) {
        verbosity = verbosity.saturating_add(1);
    }
    let global = GlobalOptions {
        api_key: pargs.opt_value_from_str("--api-key")?,
        base_url: pargs.opt_value_from_str("--base-url")?,
        timezone: pargs.opt_value_from_str("--timezone")?,
        json: pargs.contains("--json"),
        verbosity,
    };

    let subcommand = pargs.subcommand()?.ok_or(ParseError::MissingSubcommand)?;

    let mut command = match subcommand.as_str() {
        "list" => Command::List {
            filter: parse_filter(&mut pargs)?,
        },
        "delete" => {
            let filter = parse_filter(&mut pargs)?;
            if filter.since.is_none() {
                return Err(ParseError::MissingOption("--date"));
            }
            Command::Delete {
                filter,
                dry_run: pargs.contains("--dry-run"),
            }
        }
        "create_single" | "create_double" => Command::Create {
            name: required(&mut pargs, "--name")?,
            tournament_type: if subcommand == "create_single" {
                TournamentType::SingleElimination
            } else {
                TournamentType::DoubleElimination
            },
            url: pargs.opt_value_from_str("--url")?,
        },
        "add_participants" => {
            let tournament_id = required(&mut pargs, "--tournament_id")?;
            let names = pargs
                .values_from_str::<_, String>("--participants")?
                .iter()
                .flat_map(|value| value.split(','))
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();

            let mut rosters = Vec::new();
            for path in pargs.values_from_str::<_, PathBuf>("--csv")? {
                rosters.push(RosterSource::Csv(path));
            }
            for url in pargs.values_from_str::<_, String>("--sheet")? {
                rosters.push(RosterSource::Sheet(url));
            }

            Command::AddParticipants {
                tournament_id,
                names,
                rosters,
            }
        }
        "remove_participants" => Command::RemoveParticipants {
            tournament_id: required(&mut pargs, "--tournament_id")?,
            dry_run: pargs.contains("--dry-run"),
        },
        "toggle_type" => Command::ToggleType {
            tournament_id: required(&mut pargs, "--tournament_id")?,
        },
        "randomize" => Command::Randomize {
            tournament_id: required(&mut pargs, "--tournament_id")?,
        },
        "show" => Command::Show {
            tournament_id: required(&mut pargs, "--tournament_id")?,
        },
        other => return Err(ParseError::UnknownSubcommand(other.to_string())),
    };

    let rest: Vec<String> = pargs
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    // `--participants a b c` leaves b and c as free arguments
    match &mut command {
        Command::AddParticipants { names, rosters, .. } => {
            let flags: Vec<String> = rest
                .iter()
                .filter(|arg| arg.starts_with('-'))
                .cloned()
                .collect();
            if !flags.is_empty() {
                return Err(ParseError::UnexpectedArguments(flags));
            }
            names.extend(rest.into_iter().map(|n| n.trim().to_string()));
            if names.iter().all(|n| n.is_empty()) && rosters.is_empty() {
                return Err(ParseError::NoParticipantSource);
            }
        }
        _ if !rest.is_empty() => return Err(ParseError::UnexpectedArguments(rest)),
        _ => {}
    }

    Ok(Invocation { global, command })
}

fn parse_filter(pargs: &mut Arguments) -> Result<TournamentFilter, ParseError> {
    let since = pargs.opt_value_from_fn("--date", parse_date)?;
    let until = pargs.opt_value_from_fn("--until", parse_date)?;
    let participants_count = pargs.opt_value_from_str("--participants_count")?;
    Ok(TournamentFilter::new(since, until, participants_count)?)
}

fn required<T>(pargs: &mut Arguments, key: &'static str) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    pargs
        .opt_value_from_str(key)?
        .ok_or(ParseError::MissingOption(key))
}
