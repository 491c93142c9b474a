//! `capnp-probe flags`: show which platform rules apply here.

use crate::platform::PlatformInfo;
use crate::policy::{PlatformFlags, RULES};
use crate::toolchain::CompilerType;
use crate::ui::{Table, list};
use anyhow::Result;
use colored::*;

pub fn run_flags(compiler: Option<CompilerType>) -> Result<()> {
    let platform = PlatformInfo::current();
    let kind = compiler.unwrap_or_else(|| platform.default_compiler());

    println!(
        "{} Platform: {} {} ({}), compiler: {}",
        "🔧".cyan(),
        platform.os.to_string().green(),
        platform.word_size,
        platform.processor.cyan(),
        kind.to_string().bold()
    );

    let mut table = Table::new(&["Rule", "Compile pre", "Link pre", "Compile post", "Link post"]);
    for rule in RULES.iter().filter(|r| r.applies(&platform, &kind)) {
        table.add_row(vec![
            rule.name.to_string(),
            rule.compile_pre.join(" "),
            rule.link_pre.join(" "),
            rule.compile_post.join(" "),
            rule.link_post.join(" "),
        ]);
    }
    table.print();

    let flags = PlatformFlags::for_platform(&platform, &kind);
    println!(
        "   extra_compile_args: {} {} {}",
        list(&flags.compile_pre),
        "<yours>".dimmed(),
        list(&flags.compile_post)
    );
    println!(
        "   extra_link_args:    {} {} {}",
        list(&flags.link_pre),
        "<yours>".dimmed(),
        list(&flags.link_post)
    );
    if platform.is_linux() {
        println!(
            "   {} librt is added when timer_create does not link on its own",
            "!".yellow()
        );
    }
    Ok(())
}
