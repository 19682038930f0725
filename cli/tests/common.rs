//! # dockrs CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! Shared helpers for the integration test crates in `cli/tests/`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// `assert_cmd::Command` for the compiled `dockrs` binary.
///
/// Runs inside `workdir` with `HOME` and `XDG_CONFIG_HOME` pointed there too,
/// so neither a user config nor a `.dockrs.toml` from the checkout is picked up.
pub fn dockrs_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dockrs").expect("Failed to find dockrs binary for testing");
    cmd.current_dir(workdir)
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Writes `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
