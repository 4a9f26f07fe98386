//! Hook configuration and file loading.

use std::{path::Path, str::FromStr};

use {
    serde::{Deserialize, Serialize},
    tracing::{Level, debug},
};

use crate::error::{Error, Result};

/// Hooks to attach, in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    pub before: Vec<HookEntry>,
    pub after: Vec<HookEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookEntry {
    pub name: String,
    pub kind: HookKind,
    /// Only used by `trace` hooks. Defaults to `debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    /// Count calls (and failures, for after hooks).
    Count,
    /// Emit a tracing event per call.
    Trace,
}

impl HookEntry {
    /// The configured level, parsed.
    pub fn level(&self) -> Result<Level> {
        match &self.level {
            None => Ok(Level::DEBUG),
            Some(raw) => {
                Level::from_str(raw).map_err(|_| Error::invalid_level(&self.name, raw.as_str()))
            },
        }
    }
}

/// Load a hook config from a `.toml` or `.json` file.
pub fn load_config(path: &Path) -> Result<HooksConfig> {
    let raw = std::fs::read_to_string(path)?;
    let config = parse_config(&raw, path)?;
    debug!(
        path = %path.display(),
        before = config.before.len(),
        after = config.after.len(),
        "loaded hook config"
    );
    Ok(config)
}

fn parse_config(raw: &str, path: &Path) -> Result<HooksConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::unsupported_format(path)),
    }
}
