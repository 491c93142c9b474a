//! CLI command handlers
//!
//! This module contains the implementation of the `capnp-probe`
//! subcommands, kept out of main.rs so they can be tested.

pub mod detect;
pub mod doctor;
pub mod flags;

use crate::toolchain::CompilerType;
use anyhow::Result;

/// Parse an optional `--compiler` value.
pub fn parse_compiler(name: Option<&str>) -> Result<Option<CompilerType>> {
    Ok(match name {
        Some(name) => Some(name.parse::<CompilerType>()?),
        None => None,
    })
}
