//! Deployment configuration input resolution.
//!
//! The CLI accepts the deployment configuration either inline or from a
//! JSON file. The text is returned untouched; parsing happens in the client.

use std::env;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

/// Errors raised while resolving the deployment configuration text.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConfigSourceError {
    /// Raised when both inline and file sources are provided.
    #[error("deployment config cannot be provided both inline and via file")]
    BothProvided,
    /// Raised when neither source is provided.
    #[error("deployment config is required: pass --config or --config-file")]
    NoneProvided,
    /// Raised when an inline payload is empty or only whitespace.
    #[error("deployment config must not be empty")]
    InlineEmpty,
    /// Raised when a file path is empty or only whitespace.
    #[error("deployment config file path must not be empty")]
    FilePathEmpty,
    /// Raised when a file resolves to empty or only whitespace.
    #[error("deployment config file must not be empty")]
    FileEmpty,
    /// Raised when reading the file source fails.
    #[error("failed to read deployment config file `{path}`: {message}")]
    FileRead {
        /// Expanded path that failed to read.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

/// Where the deployment configuration text comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigSource {
    /// JSON passed on the command line.
    Inline(String),
    /// JSON file on disk; a leading `~/` is already expanded.
    File(Utf8PathBuf),
}

impl ConfigSource {
    /// Selects the source from the `--config` and `--config-file` values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigSourceError`] unless exactly one non-blank source is
    /// given.
    pub fn from_flags(inline: Option<&str>, file: Option<&str>) -> Result<Self, ConfigSourceError> {
        match (inline, file) {
            (Some(_), Some(_)) => Err(ConfigSourceError::BothProvided),
            (None, None) => Err(ConfigSourceError::NoneProvided),
            (Some(payload), None) => Ok(Self::Inline(payload.to_owned())),
            (None, Some(path)) if path.trim().is_empty() => Err(ConfigSourceError::FilePathEmpty),
            (None, Some(path)) => Ok(Self::File(home_relative(path))),
        }
    }

    /// Returns the configuration text verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigSourceError`] when the text is blank or the file
    /// cannot be read.
    pub fn load(self) -> Result<String, ConfigSourceError> {
        match self {
            Self::Inline(payload) if payload.trim().is_empty() => {
                Err(ConfigSourceError::InlineEmpty)
            }
            Self::Inline(payload) => Ok(payload),
            Self::File(path) => {
                let content = read_file(&path)?;
                if content.trim().is_empty() {
                    return Err(ConfigSourceError::FileEmpty);
                }
                Ok(content)
            }
        }
    }
}

/// Resolves the deployment configuration from either an inline value or a
/// file. Exactly one source must be given; the payload is returned verbatim.
///
/// # Errors
///
/// Returns [`ConfigSourceError`] when the inputs are invalid or the file
/// cannot be read.
pub fn resolve_deployment_config(
    inline: Option<&str>,
    file: Option<&str>,
) -> Result<String, ConfigSourceError> {
    ConfigSource::from_flags(inline, file)?.load()
}

fn home_relative(path: &str) -> Utf8PathBuf {
    match (path.strip_prefix("~/"), env::var("HOME")) {
        (Some(rest), Ok(home)) => Utf8Path::new(&home).join(rest),
        _ => Utf8PathBuf::from(path),
    }
}

/// Reads `path` through a capability on its parent directory.
fn read_file(path: &Utf8Path) -> Result<String, ConfigSourceError> {
    let read_error = |message: String| ConfigSourceError::FileRead {
        path: path.to_string(),
        message,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| read_error(String::from("path does not name a file")))?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| read_error(err.to_string()))?;
    dir.read_to_string(file_name)
        .map_err(|err| read_error(err.to_string()))
}
