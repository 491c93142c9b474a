//! # capnp-probe CLI Entry Point
//!
//! This is the main executable for the `capnp-probe` command-line tool.
//! It parses CLI arguments using clap and routes commands to the handlers
//! in [`capnp_probe::commands`].
//!
//! ## Commands
//!
//! - `detect` - compile and run the version probe, print the result
//! - `flags` - show the platform flag rules that apply to this machine
//! - `doctor` - report platform and toolchain discovery

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use log::LevelFilter;
use std::path::PathBuf;

use capnp_probe::commands;
use capnp_probe::commands::detect::DetectArgs;

#[derive(Parser)]
#[command(name = "capnp-probe")]
#[command(about = "Detect the installed Cap'n Proto C++ library", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logging from the prober
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and run the version probe in a temporary directory
    Detect {
        /// Configuration file [default: ./capnp-probe.toml when present]
        #[arg(long)]
        config: Option<PathBuf>,
        /// Compiler to use (msvc, clang-cl, clang, gcc)
        #[arg(long)]
        compiler: Option<String>,
        /// Extra include directory
        #[arg(short = 'I', long = "include-dir")]
        include_dirs: Vec<PathBuf>,
        /// Extra library directory
        #[arg(short = 'L', long = "library-dir")]
        library_dirs: Vec<PathBuf>,
        /// Library to link
        #[arg(short = 'l', long = "library")]
        libraries: Vec<String>,
        /// Extra argument passed to the compiler
        #[arg(long = "compile-arg", allow_hyphen_values = true)]
        compile_args: Vec<String>,
        /// Extra argument passed to the linker
        #[arg(long = "link-arg", allow_hyphen_values = true)]
        link_args: Vec<String>,
        /// Probe program to compile instead of the bundled one
        #[arg(long)]
        source: Option<PathBuf>,
        /// Kill the probe program after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Fail unless the detected version matches (e.g. ">=0.8")
        #[arg(long)]
        require: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the compiler and linker flags this platform adds
    Flags {
        /// Compiler to evaluate the rules for
        #[arg(long)]
        compiler: Option<String>,
    },
    /// Check platform and toolchain discovery
    Doctor,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("capnp_probe", level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Detect {
            config,
            compiler,
            include_dirs,
            library_dirs,
            libraries,
            compile_args,
            link_args,
            source,
            timeout,
            require,
            json,
        } => commands::detect::run_detect(&DetectArgs {
            config,
            compiler,
            include_dirs,
            library_dirs,
            libraries,
            compile_args,
            link_args,
            source,
            timeout_secs: timeout,
            require,
            json,
        }),
        Commands::Flags { compiler } => {
            let kind = commands::parse_compiler(compiler.as_deref())?;
            commands::flags::run_flags(kind)?;
            Ok(true)
        }
        Commands::Doctor => {
            commands::doctor::run_doctor()?;
            Ok(true)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "x".red(), e);
            std::process::exit(1);
        }
    }
}
