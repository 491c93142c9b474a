//! # capnp-probe - Cap'n Proto version detection
//!
//! Finds out which Cap'n Proto C++ library a build would pick up by compiling
//! a tiny program against it, running the program and reading the version
//! it prints.
//!
//! ## Quick Start
//!
//! ```no_run
//! use capnp_probe::{CompilerOptions, Prober};
//!
//! let options = CompilerOptions {
//!     libraries: vec!["capnp".into(), "kj".into()],
//!     ..Default::default()
//! };
//! let detected = Prober::system().test_build(options)?;
//! println!("Cap'n Proto {}", detected.version);
//! # Ok::<(), capnp_probe::ProbeError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`probe`] - The prober and its error type
//! - [`policy`] - Per-platform compiler and linker flags
//! - [`toolchain`] - Compiler discovery and invocation
//! - [`output`] - Decoding of the probe program's output
//! - [`config`] - Configuration parsing (`capnp-probe.toml`)

/// CLI command handlers.
pub mod commands;

/// Configuration file parsing (`capnp-probe.toml`).
pub mod config;

/// Compiler options threaded through a probe.
pub mod options;

/// Probe output decoding.
pub mod output;

/// Install-name patching of linked binaries.
pub mod patch;

/// Host platform description.
pub mod platform;

/// Platform flag policy table.
pub mod policy;

/// Compile, link, run and decode.
pub mod probe;

/// Running the probe executable.
pub mod runner;

/// Toolchain detection and invocation.
pub mod toolchain;

/// Terminal UI utilities.
pub mod ui;

pub use options::CompilerOptions;
pub use output::LibraryVersion;
pub use platform::PlatformInfo;
pub use probe::{ProbeError, ProbeResult, ProbeSource, Prober};
pub use toolchain::CompilerType;
