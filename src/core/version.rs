//! Build metadata generated by build.rs.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Message protocol version spoken with plugin frames.
/// Falls back to the last released protocol if the metadata was missing.
pub fn protocol_version() -> u32 {
    PROTOCOL_VERSION.parse().unwrap_or(20140612)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// One-line version banner for `--version` and startup logging
pub fn version_banner() -> String {
    format!(
        "{} (protocol {}, {} built {})",
        env!("CARGO_PKG_VERSION"),
        protocol_version(),
        git_hash(),
        build_time()
    )
}
