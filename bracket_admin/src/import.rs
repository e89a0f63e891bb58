//! Participant roster import from a CSV file or a published spreadsheet.
//!
//! The first column of every row is a participant name. A leading header
//! row (`name`, `participant`, `participants`, `player`) is skipped, as are
//! blank names.

use crate::api::{RetryPolicy, Transient};
use reqwest::StatusCode;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

const HEADER_NAMES: [&str; 4] = ["name", "participant", "participants", "player"];

/// Import errors
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Cannot read roster file {path}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Malformed CSV: {0}")]
    Csv(csv::Error),

    #[error("Spreadsheet download failed: {0}")]
    Http(reqwest::Error),

    #[error("Spreadsheet download from {url} returned {status}")]
    Status { url: String, status: StatusCode },
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Csv(e)
    }
}

impl From<reqwest::Error> for ImportError {
    fn from(e: reqwest::Error) -> Self {
        ImportError::Http(e)
    }
}

impl Transient for ImportError {
    fn is_transient(&self) -> bool {
        match self {
            ImportError::Http(e) => !e.is_builder(),
            ImportError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Where a roster comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    /// Local CSV file
    Csv(PathBuf),
    /// Spreadsheet share link or direct CSV export URL
    Sheet(String),
}

/// Read participant names out of CSV data
pub fn parse_roster<R: Read>(reader: R) -> ImportResult<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut names = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let Some(first) = record.get(0) else {
            continue;
        };
        if index == 0 && HEADER_NAMES.contains(&first.to_lowercase().as_str()) {
            continue;
        }
        if !first.is_empty() {
            names.push(first.to_string());
        }
    }

    Ok(names)
}

/// Read a roster from a local CSV file
pub fn read_csv_file(path: &Path) -> ImportResult<Vec<String>> {
    let file = std::fs::File::open(path).map_err(|error| ImportError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    parse_roster(file)
}

/// Turn a Google Sheets share link into its CSV export URL.
///
/// Links that are not Google Sheets, or already point at a CSV export,
/// are returned unchanged.
pub fn sheet_export_url(url: &str) -> String {
    const MARKER: &str = "docs.google.com/spreadsheets/d/";

    if url.contains("format=csv") || url.contains("output=csv") {
        return url.to_string();
    }
    let Some(start) = url.find(MARKER).map(|i| i + MARKER.len()) else {
        return url.to_string();
    };

    let rest = &url[start..];
    let id_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let sheet_id = &rest[..id_end];

    let gid = url
        .find("gid=")
        .map(|i| {
            url[i + 4..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|gid| !gid.is_empty());

    let mut export = format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
        sheet_id
    );
    if let Some(gid) = gid {
        export.push_str("&gid=");
        export.push_str(&gid);
    }
    export
}

/// Download a spreadsheet as CSV and read the roster out of it
pub async fn fetch_sheet(
    http: &reqwest::Client,
    retry: RetryPolicy,
    url: &str,
) -> ImportResult<Vec<String>> {
    let export_url = sheet_export_url(url);
    log::debug!("GET {}", export_url);

    let export_url = export_url.as_str();
    let body = retry
        .run("spreadsheet download", move || async move {
            let response = http.get(export_url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ImportError::Status {
                    url: export_url.to_string(),
                    status,
                });
            }
            Ok::<_, ImportError>(response.bytes().await?)
        })
        .await?;

    parse_roster(&body[..])
}

/// Load a roster from either source
pub async fn load_roster(
    source: &RosterSource,
    http: &reqwest::Client,
    retry: RetryPolicy,
) -> ImportResult<Vec<String>> {
    match source {
        RosterSource::Csv(path) => read_csv_file(path),
        RosterSource::Sheet(url) => fetch_sheet(http, retry, url).await,
    }
}
