//! The static seed collection a session starts from.
//!
//! Seeds are read once. Nothing is ever written back, so changes made during
//! a session are lost when it ends.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::domain::TagCategory;

const BUILTIN: &str = include_str!("../../data/sample_data.json");

/// Where the seed records come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeedSource {
    /// The sample data compiled into the binary.
    #[default]
    Builtin,
    /// A JSON file, or a YAML file when the extension is `.yaml` or `.yml`.
    File(PathBuf),
}

/// Errors raised while loading seed records.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Read {
        /// The seed file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The seed is not a valid JSON collection of categories.
    #[error("invalid JSON seed data{}: {source}", origin(.path.as_deref()))]
    Json {
        /// The seed file, if any.
        path: Option<PathBuf>,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// The seed is not a valid YAML collection of categories.
    #[error("invalid YAML seed data{}: {source}", origin(.path.as_deref()))]
    Yaml {
        /// The seed file, if any.
        path: Option<PathBuf>,
        /// The underlying error.
        source: serde_yaml::Error,
    },
}

fn origin(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl SeedSource {
    /// Selects the file if one is given, the built-in sample data otherwise.
    #[must_use]
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Builtin, Self::File)
    }

    /// Reads every record from the source, including deleted ones.
    ///
    /// Optional fields that are absent are given their defaults. Records are
    /// otherwise not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not contain a list
    /// of categories.
    #[instrument(level = "debug")]
    pub fn load(&self) -> Result<Vec<TagCategory>, SeedError> {
        let records = match self {
            Self::Builtin => parse_json(BUILTIN, None)?,
            Self::File(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
                    path: path.clone(),
                    source,
                })?;
                if is_yaml(path) {
                    serde_yaml::from_str(&content).map_err(|source| SeedError::Yaml {
                        path: Some(path.clone()),
                        source,
                    })?
                } else {
                    parse_json(&content, Some(path))?
                }
            }
        };
        debug!(count = records.len(), "loaded seed records");
        Ok(records)
    }
}

fn parse_json(content: &str, path: Option<&Path>) -> Result<Vec<TagCategory>, SeedError> {
    serde_json::from_str(content).map_err(|source| SeedError::Json {
        path: path.map(Path::to_path_buf),
        source,
    })
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
