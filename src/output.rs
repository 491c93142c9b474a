//! Probe output decoding.
//!
//! The probe program prints `key:value` lines. Each key has a decoder; a key
//! without one is an error rather than something to skip.

use crate::probe::ProbeError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Library version as printed by the probe, e.g. `[1, 0, 2]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LibraryVersion(pub Vec<u32>);

impl LibraryVersion {
    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Convert to semver, padding missing components with zero. Components
    /// past the third are dropped.
    pub fn to_semver(&self) -> semver::Version {
        let part = |i: usize| self.0.get(i).copied().unwrap_or(0) as u64;
        semver::Version::new(part(0), part(1), part(2))
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl From<Vec<u32>> for LibraryVersion {
    fn from(parts: Vec<u32>) -> Self {
        LibraryVersion(parts)
    }
}

/// A decoded value from one output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    Version(LibraryVersion),
}

type Decoder = fn(&str) -> Result<Property, String>;

const DECODERS: &[(&str, Decoder)] = &[("vers", decode_version)];

fn decode_version(value: &str) -> Result<Property, String> {
    value
        .split('.')
        .map(|part| {
            let part = part.trim();
            part.parse::<u32>()
                .map_err(|e| format!("invalid version component '{}': {}", part, e))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|parts| Property::Version(LibraryVersion(parts)))
}

fn decoder_for(key: &str) -> Option<Decoder> {
    DECODERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, decoder)| *decoder)
}

/// Decode every non-empty line of `stdout`.
///
/// A line must contain exactly one `:`. Later lines with the same key
/// replace earlier ones.
pub fn parse_output(stdout: &str) -> Result<BTreeMap<String, Property>, ProbeError> {
    let mut props = BTreeMap::new();

    for line in stdout.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let fail = |reason: String| ProbeError::ParseFailed {
            line: line.to_string(),
            reason,
        };

        let mut parts = line.split(':');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => return Err(fail("expected exactly one ':' separator".to_string())),
        };

        let decoder =
            decoder_for(key).ok_or_else(|| fail(format!("no decoder for key '{}'", key)))?;
        let prop = decoder(value).map_err(fail)?;
        props.insert(key.to_string(), prop);
    }

    Ok(props)
}

/// Pull the decoded `vers` entry out of parsed properties.
pub fn take_version(
    props: &mut BTreeMap<String, Property>,
    stdout: &str,
) -> Result<LibraryVersion, ProbeError> {
    match props.remove("vers") {
        Some(Property::Version(v)) => Ok(v),
        None => Err(ProbeError::ParseFailed {
            line: stdout.trim().to_string(),
            reason: "probe output has no 'vers' line".to_string(),
        }),
    }
}
