use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

/// What happens to the working directory when the media check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Restore on every exit path.
    #[default]
    Always,
    /// Restore only when the check succeeds; a failed check leaves the
    /// process inside the media directory.
    SuccessOnly,
}

impl FromStr for RestorePolicy {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "success_only" | "success-only" | "legacy" => Ok(Self::SuccessOnly),
            _ => Err(ConfigError::InvalidRestore {
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for RestorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::SuccessOnly => f.write_str("success_only"),
        }
    }
}

/// Failure to assemble a [`CheckConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read media check config {path}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying read error.
        #[source]
        source: io::Error,
    },
    /// A TOML config file did not deserialize.
    #[error("invalid media check config {path}")]
    Toml {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },
    /// A JSON config file or inline JSON did not deserialize.
    #[error("invalid media check config json from {origin}")]
    Json {
        /// File path or environment variable the JSON came from.
        origin: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A restore policy string matched none of the known names.
    #[error("unknown restore policy '{value}' (expected 'always' or 'success_only')")]
    InvalidRestore {
        /// The rejected input.
        value: String,
    },
}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        let kind = match &err {
            ConfigError::Io { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

/// Where [`CheckConfig::load_from_env`] found its settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckConfigSource {
    /// Nothing configured; built-in defaults.
    #[default]
    Default,
    /// File named by `MEDIA_CHECK_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// JSON held in `MEDIA_CHECK_CONFIG_JSON`.
    EnvInline,
    /// A `media-check.{toml,json}` file found next to the caller.
    File(PathBuf),
}

/// Settings for [`check_media_with`](crate::check_media_with).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Whether a failed check still restores the working directory.
    pub restore: RestorePolicy,
    /// Emit the full report text at debug level, not just the counts.
    pub log_report: bool,
}

/// Directories searched, relative to the caller's working directory.
const SEARCH_DIRS: &[&str] = &[".", "config"];
const FILE_STEM: &str = "media-check";

impl CheckConfig {
    /// Path of a TOML or JSON config file.
    pub const PATH_VAR: &'static str = "MEDIA_CHECK_CONFIG_PATH";
    /// Inline JSON config.
    pub const JSON_VAR: &'static str = "MEDIA_CHECK_CONFIG_JSON";
    /// Restore policy override, applied last.
    pub const RESTORE_VAR: &'static str = "MEDIA_CHECK_RESTORE";

    /// Configuration that reproduces the historical success-only restore.
    pub fn legacy() -> Self {
        Self {
            restore: RestorePolicy::SuccessOnly,
            ..Self::default()
        }
    }

    /// Resolve settings from the environment.
    ///
    /// The first of `$MEDIA_CHECK_CONFIG_PATH`, `$MEDIA_CHECK_CONFIG_JSON`
    /// and a `media-check.{toml,json}` file in the working directory (or its
    /// `config/` folder) wins; defaults otherwise. `$MEDIA_CHECK_RESTORE`
    /// then overrides the restore policy.
    ///
    /// The file lookup is relative to the working directory at call time, so
    /// call this before entering a media directory.
    pub fn load_from_env() -> Result<(Self, CheckConfigSource), ConfigError> {
        let (mut config, source) = Self::resolve_source()?;

        if let Some(raw) = non_empty_var(Self::RESTORE_VAR) {
            config.restore = raw.parse()?;
        }

        Ok((config, source))
    }

    fn resolve_source() -> Result<(Self, CheckConfigSource), ConfigError> {
        if let Some(path) = non_empty_var(Self::PATH_VAR).map(PathBuf::from) {
            let config = Self::from_file(&path)?;
            return Ok((config, CheckConfigSource::EnvPath(path)));
        }

        if let Some(raw) = non_empty_var(Self::JSON_VAR) {
            let config = Self::from_json(&raw, Self::JSON_VAR)?;
            return Ok((config, CheckConfigSource::EnvInline));
        }

        let discovered = SEARCH_DIRS
            .iter()
            .flat_map(|dir| {
                ["toml", "json"].map(|ext| {
                    Path::new(dir).join(format!("{FILE_STEM}.{ext}"))
                })
            })
            .find(|candidate| candidate.is_file());

        match discovered {
            Some(path) => {
                let config = Self::from_file(&path)?;
                Ok((config, CheckConfigSource::File(path)))
            }
            None => Ok((Self::default(), CheckConfigSource::Default)),
        }
    }

    /// Read a config file; `.json` files are JSON, everything else TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&contents, &path.display().to_string())
        } else {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Parse JSON settings; `origin` names the source in errors.
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|source| ConfigError::Json {
            origin: origin.to_string(),
            source,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_restore_always() {
        let config = CheckConfig::default();
        assert_eq!(config.restore, RestorePolicy::Always);
        assert!(!config.log_report);
        assert_eq!(CheckConfig::legacy().restore, RestorePolicy::SuccessOnly);
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!(
            "Always".parse::<RestorePolicy>().unwrap(),
            RestorePolicy::Always
        );
        for raw in ["success_only", "success-only", "LEGACY"] {
            assert_eq!(
                raw.parse::<RestorePolicy>().unwrap(),
                RestorePolicy::SuccessOnly
            );
        }
        assert!(matches!(
            "sometimes".parse::<RestorePolicy>(),
            Err(ConfigError::InvalidRestore { .. })
        ));
        assert!("".parse::<RestorePolicy>().is_err());
    }

    #[test]
    fn policy_display_matches_serde_names() {
        for policy in [RestorePolicy::Always, RestorePolicy::SuccessOnly] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{policy}\""));
        }
    }

    #[test]
    fn from_file_picks_format_by_extension() {
        let dir = tempdir().unwrap();
        let toml_path = dir.path().join("check.toml");
        fs::write(&toml_path, "restore = \"success_only\"\n").unwrap();
        let json_path = dir.path().join("check.json");
        fs::write(&json_path, r#"{"restore": "always", "log_report": true}"#)
            .unwrap();

        assert_eq!(
            CheckConfig::from_file(&toml_path).unwrap().restore,
            RestorePolicy::SuccessOnly
        );
        let json = CheckConfig::from_file(&json_path).unwrap();
        assert_eq!(json.restore, RestorePolicy::Always);
        assert!(json.log_report);
    }

    #[test]
    fn from_file_reports_which_file_failed() {
        let dir = tempdir().unwrap();

        let absent = dir.path().join("absent.toml");
        match CheckConfig::from_file(&absent) {
            Err(ConfigError::Io { path, source }) => {
                assert_eq!(path, absent);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let broken = dir.path().join("media-check.toml");
        fs::write(&broken, "restore = 3\n").unwrap();
        assert!(matches!(
            CheckConfig::from_file(&broken),
            Err(ConfigError::Toml { .. })
        ));
    }

    #[test]
    fn config_errors_become_io_errors() {
        let invalid: io::Error =
            "sometimes".parse::<RestorePolicy>().unwrap_err().into();
        assert_eq!(invalid.kind(), io::ErrorKind::InvalidInput);

        let unreadable: io::Error = ConfigError::Io {
            path: PathBuf::from("media-check.toml"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(unreadable.kind(), io::ErrorKind::PermissionDenied);
    }
}
