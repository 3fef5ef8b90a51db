//! Configuration file parsing for `rxt.toml`.
//!
//! Searches current directory then ancestors, falling back to
//! `~/.config/rxt/rxt.toml` if no project-level file is found.

use rxt_port::Sink;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliError;

pub const CONFIG_FILE: &str = "rxt.toml";

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct RxtConfig {
    #[serde(default)]
    pub port: PortSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct PortSection {
    /// Stream the console port prints to.
    #[serde(default)]
    pub sink: Sink,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct LogSection {
    /// `tracing` filter directive, e.g. `"rxt_port=debug"`.
    pub filter: Option<String>,
}

impl RxtConfig {
    /// Load config from `rxt.toml`, searching current dir then parents.
    /// Returns `Default` when no file is found, and the read or parse error
    /// when the file that was found is unusable.
    pub fn load() -> Result<Self, CliError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file that [`RxtConfig::load`] would read, if any.
    pub fn locate() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        let global = dirs::home_dir()?
            .join(".config")
            .join("rxt")
            .join(CONFIG_FILE);
        global.exists().then_some(global)
    }

    /// Parse a TOML string directly (useful for testing and embedding).
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Generate a default `rxt.toml` template.
    pub fn default_template() -> &'static str {
        r#"# rxt-port configuration

[port]
# Stream the console port prints to: "stdout" or "stderr"
sink = "stdout"

[log]
# tracing filter; RXT_LOG overrides it
# filter = "rxt_port=debug"
"#
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
