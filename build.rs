//! Generates `version.rs` with the protocol version, build time and git hash.

use std::path::{Path, PathBuf};
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let manifest = PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default())
        .join("Cargo.toml");
    let out_file = PathBuf::from(std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"))
        .join("version.rs");

    let generated = format!(
        "pub const PROTOCOL_VERSION: &str = {:?};\n\
         pub const BUILD_TIME: &str = {:?};\n\
         pub const GIT_HASH: &str = {:?};\n",
        protocol_version(&manifest),
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        git_short_hash(),
    );

    std::fs::write(&out_file, generated).expect("write generated version.rs");
}

/// `[package.metadata] bridge_protocol_version` from the manifest
fn protocol_version(manifest: &Path) -> String {
    std::fs::read_to_string(manifest)
        .ok()
        .and_then(|text| text.parse::<toml::Table>().ok())
        .and_then(|table| {
            table
                .get("package")?
                .get("metadata")?
                .get("bridge_protocol_version")?
                .as_integer()
        })
        .map_or_else(|| UNKNOWN.to_string(), |version| version.to_string())
}

fn git_short_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
