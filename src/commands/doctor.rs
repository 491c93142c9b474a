//! Doctor command handler
//!
//! Handles `capnp-probe doctor`: reports what the prober would see on this
//! machine without building anything.

use anyhow::Result;
use colored::*;

use crate::platform::PlatformInfo;
use crate::toolchain::{self, CompilerType};

/// Run the `capnp-probe doctor` command to diagnose the build environment
pub fn run_doctor() -> Result<()> {
    println!("{} Running System Doctor...", "🚑".red());
    println!("-------------------------------");

    let platform = PlatformInfo::current();

    print!("Checking OS... ");
    println!(
        "{} ({}, {})",
        platform.os.to_string().green(),
        platform.processor.cyan(),
        platform.word_size
    );

    let default = platform.default_compiler();
    println!("Default compiler... {}", default.to_string().bold());

    let candidates = if platform.is_windows() {
        vec![CompilerType::MSVC, CompilerType::ClangCL, CompilerType::Clang, CompilerType::GCC]
    } else {
        vec![CompilerType::GCC, CompilerType::Clang]
    };

    for kind in candidates {
        print!("Checking {}... ", kind);
        match toolchain::locate_toolchain(&kind) {
            Ok(tc) => println!(
                "{} {} ({})",
                "Found".green(),
                tc.cxx_path.display(),
                tc.version
            ),
            Err(e) if kind == default => println!("{} ({})", "Not Found".red(), e),
            Err(_) => println!("{}", "Not Found (Optional)".yellow()),
        }
    }

    for var in ["CXX", "CC"] {
        if let Ok(value) = std::env::var(var) {
            println!("{} is set: {}", var, value.cyan());
        }
    }

    Ok(())
}
