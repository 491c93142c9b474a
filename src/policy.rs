//! Platform argument policy.
//!
//! A static table of rows, each pairing a condition on the host platform and
//! compiler with the flags it contributes. Every matching row applies, in
//! table order.

use crate::options::CompilerOptions;
use crate::platform::{PlatformInfo, TargetOs, WordSize};
use crate::toolchain::CompilerType;

pub struct PolicyRule {
    pub name: &'static str,
    applies: fn(&PlatformInfo, &CompilerType) -> bool,
    pub compile_pre: &'static [&'static str],
    pub link_pre: &'static [&'static str],
    pub compile_post: &'static [&'static str],
    pub link_post: &'static [&'static str],
}

impl PolicyRule {
    pub fn applies(&self, platform: &PlatformInfo, compiler: &CompilerType) -> bool {
        (self.applies)(platform, compiler)
    }
}

const NONE: &[&str] = &[];

pub static RULES: &[PolicyRule] = &[
    PolicyRule {
        name: "darwin-32-ppc",
        applies: |p, _| is_darwin_32(p) && p.processor == "powerpc",
        compile_pre: &["-arch", "ppc"],
        link_pre: &["-arch", "ppc", "-undefined", "dynamic_lookup"],
        compile_post: NONE,
        link_post: NONE,
    },
    PolicyRule {
        name: "darwin-32",
        applies: |p, _| is_darwin_32(p) && p.processor != "powerpc",
        compile_pre: &["-arch", "i386"],
        link_pre: &["-arch", "i386", "-undefined", "dynamic_lookup"],
        compile_post: NONE,
        link_post: NONE,
    },
    // a missing universal-binary arch still links with lazy symbol lookup
    PolicyRule {
        name: "darwin-64",
        applies: |p, _| p.os == TargetOs::MacOs && p.word_size == WordSize::Bits64,
        compile_pre: NONE,
        link_pre: &["-undefined", "dynamic_lookup"],
        compile_post: NONE,
        link_post: NONE,
    },
    PolicyRule {
        name: "solaris-32",
        applies: |p, _| p.os == TargetOs::Solaris && p.word_size == WordSize::Bits32,
        compile_pre: NONE,
        link_pre: &["-m32"],
        compile_post: NONE,
        link_post: NONE,
    },
    PolicyRule {
        name: "solaris-64",
        applies: |p, _| p.os == TargetOs::Solaris && p.word_size == WordSize::Bits64,
        compile_pre: NONE,
        link_pre: &["-m64"],
        compile_post: NONE,
        link_post: NONE,
    },
    PolicyRule {
        name: "posix-std",
        applies: |p, _| !p.is_windows(),
        compile_pre: NONE,
        link_pre: NONE,
        compile_post: &["--std=c++14"],
        link_post: NONE,
    },
    PolicyRule {
        name: "msvc-manifest",
        applies: |_, c| c.is_msvc_compatible(),
        compile_pre: NONE,
        link_pre: NONE,
        compile_post: NONE,
        link_post: &["/MANIFEST"],
    },
];

fn is_darwin_32(p: &PlatformInfo) -> bool {
    p.os == TargetOs::MacOs && p.word_size == WordSize::Bits32
}

/// Flags collected from every matching row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFlags {
    pub rules: Vec<&'static str>,
    pub compile_pre: Vec<String>,
    pub link_pre: Vec<String>,
    pub compile_post: Vec<String>,
    pub link_post: Vec<String>,
}

impl PlatformFlags {
    /// Evaluate the table for one platform and compiler.
    pub fn for_platform(platform: &PlatformInfo, compiler: &CompilerType) -> Self {
        let mut flags = PlatformFlags::default();
        for rule in RULES.iter().filter(|r| r.applies(platform, compiler)) {
            flags.rules.push(rule.name);
            flags.compile_pre.extend(owned(rule.compile_pre));
            flags.link_pre.extend(owned(rule.link_pre));
            flags.compile_post.extend(owned(rule.compile_post));
            flags.link_post.extend(owned(rule.link_post));
        }
        flags
    }

    /// Fold the flags into `options`: pre flags go in front of the caller's
    /// extra args, post flags after them.
    pub fn apply(&self, options: &mut CompilerOptions) {
        options.extra_compile_args = surround(
            &self.compile_pre,
            &options.extra_compile_args,
            &self.compile_post,
        );
        options.extra_link_args =
            surround(&self.link_pre, &options.extra_link_args, &self.link_post);
    }
}

fn owned<'a>(flags: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    flags.iter().map(|f| f.to_string())
}

fn surround(pre: &[String], existing: &[String], post: &[String]) -> Vec<String> {
    pre.iter()
        .chain(existing)
        .chain(post)
        .cloned()
        .collect()
}
