use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{request::REDACTED, PageError, Result};

pub const API_URL_VAR: &str = "LANGFLOW_API_URL";
pub const API_KEY_VAR: &str = "LANGFLOW_API_KEY";
pub const DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";
pub const LOG_FILE_VAR: &str = "PAGE_JOB_LOG_FILE";

/// Variables the job cannot run without, in reporting order.
pub const REQUIRED_VARS: [&str; 2] = [API_URL_VAR, DATABASE_ID_VAR];

pub const DEFAULT_LOG_FILE: &str = "cron.log";

/// A value that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Settings for one run of the job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobConfig {
    /// Page-creation endpoint (`LANGFLOW_API_URL`).
    pub api_url: String,
    /// Parent database of the created page (`NOTION_DATABASE_ID`).
    pub database_id: String,
    /// Sent as `x-api-key` when present (`LANGFLOW_API_KEY`).
    pub api_key: Option<Secret>,
}

impl JobConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_dotenv`] first to seed the environment from a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Blank values count as missing. Every missing required variable is
    /// reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_url = read(API_URL_VAR);
        let database_id = read(DATABASE_ID_VAR);
        let api_key = read(API_KEY_VAR).map(Secret::new);

        match (api_url, database_id) {
            (Some(api_url), Some(database_id)) => Ok(Self {
                api_url,
                database_id,
                api_key,
            }),
            (api_url, database_id) => {
                let mut missing = Vec::new();
                if api_url.is_none() {
                    missing.push(API_URL_VAR);
                }
                if database_id.is_none() {
                    missing.push(DATABASE_ID_VAR);
                }
                Err(PageError::MissingConfiguration(missing))
            }
        }
    }
}

/// Log file path from `PAGE_JOB_LOG_FILE`, `cron.log` otherwise.
pub fn log_file_from_lookup<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(LOG_FILE_VAR)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Where a `.env` file was found, if anywhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DotenvSource {
    Loaded(PathBuf),
    NotFound,
    Unreadable(String),
}

/// Seeds the process environment from a `.env` file.
///
/// The file next to the executable is tried first, then the working
/// directory and its parents. Variables already set in the environment win
/// over the file.
pub fn load_dotenv() -> DotenvSource {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    load_dotenv_from(exe_dir.as_deref())
}

/// Like [`load_dotenv`], with `dir` taking the place of the executable's
/// directory.
pub fn load_dotenv_from(dir: Option<&Path>) -> DotenvSource {
    if let Some(dir) = dir {
        let path = dir.join(".env");
        if path.is_file() {
            return match dotenvy::from_path(&path) {
                Ok(()) => DotenvSource::Loaded(path),
                Err(err) => DotenvSource::Unreadable(format!("{}: {err}", path.display())),
            };
        }
    }

    match dotenvy::dotenv() {
        Ok(path) => DotenvSource::Loaded(path),
        Err(err) if err.not_found() => DotenvSource::NotFound,
        Err(err) => DotenvSource::Unreadable(err.to_string()),
    }
}

/// Whether an environment variable name suggests a secret value.
pub fn is_secret_name(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    ["KEY", "TOKEN", "SECRET", "PASSWORD"]
        .iter()
        .any(|marker| upper.contains(marker))
}
