use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error("unsupported hook config format at {path}: expected .toml or .json")]
    UnsupportedFormat { path: PathBuf },

    #[error("hook '{name}' has an invalid level '{level}'")]
    InvalidLevel { name: String, level: String },

    #[error("hook #{index} takes ({found}), composed hooks take ({expected})")]
    ComposeMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Decorate(#[from] degorator::Error),
}

impl Error {
    #[must_use]
    pub fn unsupported_format(path: &Path) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn invalid_level(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self::InvalidLevel {
            name: name.into(),
            level: level.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
