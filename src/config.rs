//! Configuration file parsing (`capnp-probe.toml`).
//!
//! ```toml
//! [compiler]
//! compiler = "clang"
//! include_dirs = ["/opt/capnp/include"]
//! library_dirs = ["/opt/capnp/lib"]
//! libraries = ["capnp", "kj"]
//!
//! [probe]
//! source = "buildutils/vers.cpp"
//! timeout_secs = 30
//! ```

use crate::options::CompilerOptions;
use crate::probe::ProbeSource;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "capnp-probe.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProbeConfig {
    pub compiler: CompilerOptions,
    pub probe: ProbeSettings,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProbeSettings {
    /// Probe program to compile instead of the bundled one.
    pub source: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl ProbeSettings {
    pub fn probe_source(&self) -> ProbeSource {
        match &self.source {
            Some(path) => ProbeSource::File(path.clone()),
            None => ProbeSource::Bundled,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `capnp-probe.toml` in the
/// current directory is used when present, and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ProbeConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE);
            if !default.exists() {
                return Ok(ProbeConfig::default());
            }
            default
        }
    };

    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&config_str).with_context(|| {
        format!(
            "Failed to parse {} - check for syntax errors (missing quotes, brackets)",
            path.display()
        )
    })
}

pub fn parse_config(config_str: &str) -> Result<ProbeConfig> {
    Ok(toml::from_str(config_str)?)
}
