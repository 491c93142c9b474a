use capnp_probe::config;
use capnp_probe::output;
use capnp_probe::platform::{PlatformInfo, TargetOs, WordSize};
use capnp_probe::policy::PlatformFlags;
use capnp_probe::toolchain::CompilerType;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const MOCK_CONFIG: &str = r#"
[compiler]
compiler = "clang"
include_dirs = ["/opt/capnp/include"]
library_dirs = ["/opt/capnp/lib"]
libraries = ["capnp", "kj"]

[probe]
timeout_secs = 30
"#;

fn bench_policy_table(c: &mut Criterion) {
    let platforms = [
        PlatformInfo::new(TargetOs::Linux, WordSize::Bits64, "x86_64"),
        PlatformInfo::new(TargetOs::MacOs, WordSize::Bits32, "powerpc"),
        PlatformInfo::new(TargetOs::Solaris, WordSize::Bits64, "sparcv9"),
        PlatformInfo::new(TargetOs::Windows, WordSize::Bits64, "x86_64"),
    ];
    c.bench_function("platform_flags", |b| {
        b.iter(|| {
            for platform in &platforms {
                black_box(PlatformFlags::for_platform(
                    black_box(platform),
                    black_box(&CompilerType::MSVC),
                ));
            }
        })
    });
}

fn bench_parse_output(c: &mut Criterion) {
    c.bench_function("parse_output", |b| {
        b.iter(|| output::parse_output(black_box("vers:1.0.2\r\n\nvers: 0.10.4\n")))
    });
}

fn bench_config_parsing(c: &mut Criterion) {
    c.bench_function("parse_config", |b| {
        b.iter(|| config::parse_config(black_box(MOCK_CONFIG)))
    });
}

criterion_group!(
    benches,
    bench_policy_table,
    bench_parse_output,
    bench_config_parsing
);
criterion_main!(benches);
