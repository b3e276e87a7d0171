use std::{
    io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::domain::category::MatchThreshold;

/// Session settings.
///
/// Read from an optional TOML file. A missing file means the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Versions")]
pub struct Config {
    /// Seed file to load instead of the built-in sample data.
    ///
    /// Relative paths are resolved against the directory of the config file.
    pub seed: Option<PathBuf>,

    /// The match threshold a new draft starts with.
    ///
    /// `None` leaves the threshold unset on new drafts.
    default_match_threshold: Option<MatchThreshold>,

    /// Whether deletes ask for confirmation.
    pub confirm_deletes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            default_match_threshold: Some(MatchThreshold::DEFAULT),
            confirm_deletes: true,
        }
    }
}

/// Errors raised while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The file is not valid configuration.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.seed = config.seed.take().map(|seed| match path.parent() {
            Some(dir) if seed.is_relative() => dir.join(seed),
            _ => seed,
        });
        Ok(config)
    }

    /// Loads the configuration, falling back to the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// The match threshold new drafts start with.
    #[must_use]
    pub const fn default_match_threshold(&self) -> Option<MatchThreshold> {
        self.default_match_threshold
    }
}

const fn default_confirm_deletes() -> bool {
    true
}

/// The on-disk versions of the configuration.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        seed: Option<PathBuf>,

        /// A missing key means the built-in default. `false` leaves new
        /// drafts without a threshold.
        #[serde(default = "ThresholdSetting::builtin")]
        default_match_threshold: ThresholdSetting,

        #[serde(default = "default_confirm_deletes")]
        confirm_deletes: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThresholdSetting {
    Value(MatchThreshold),
    Enabled(bool),
}

impl ThresholdSetting {
    const fn builtin() -> Self {
        Self::Value(MatchThreshold::DEFAULT)
    }

    const fn into_threshold(self) -> Option<MatchThreshold> {
        match self {
            Self::Value(threshold) => Some(threshold),
            Self::Enabled(true) => Some(MatchThreshold::DEFAULT),
            Self::Enabled(false) => None,
        }
    }
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                seed,
                default_match_threshold,
                confirm_deletes,
            } => Self {
                seed,
                default_match_threshold: default_match_threshold.into_threshold(),
                confirm_deletes,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nseed = \"/data/seed.yaml\"\ndefault_match_threshold = 0.5\nconfirm_deletes = false\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.seed, Some(PathBuf::from("/data/seed.yaml")));
        assert_eq!(
            config.default_match_threshold(),
            Some(MatchThreshold::new(0.5).unwrap())
        );
        assert!(!config.confirm_deletes);
    }

    #[test]
    fn relative_seed_is_resolved_against_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tagcat.toml");
        std::fs::write(&path, "_version = \"1\"\nseed = \"seed.json\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.seed, Some(tmp.path().join("seed.json")));
    }

    #[test]
    fn default_threshold_is_the_builtin_value() {
        let config: Config = toml::from_str("_version = \"1\"\n").unwrap();
        assert_eq!(config.default_match_threshold(), Some(MatchThreshold::DEFAULT));

        let config: Config =
            toml::from_str("_version = \"1\"\ndefault_match_threshold = true\n").unwrap();
        assert_eq!(config.default_match_threshold(), Some(MatchThreshold::DEFAULT));
    }

    #[test]
    fn threshold_can_be_switched_off() {
        let config: Config =
            toml::from_str("_version = \"1\"\ndefault_match_threshold = false\n").unwrap();
        assert_eq!(config.default_match_threshold(), None);
    }

    #[test]
    fn out_of_range_threshold_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\ndefault_match_threshold = 3.0\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));
        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }
}
