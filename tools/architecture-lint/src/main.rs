//! Runs the boundary lint over `translator/src` and exits non-zero on any
//! violation.
//!
//! Pass a crate directory to lint something other than the workspace's
//! `translator` member.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const TARGET_MEMBER: &str = "translator";

fn main() -> ExitCode {
    let Some(crate_dir) = env::args_os().nth(1).map(PathBuf::from).or_else(default_crate_dir)
    else {
        report("no workspace Cargo.toml above the current directory; pass the crate path");
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_translator_sources(&crate_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn report(message: &str) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "architecture-lint: {message}");
}

/// `translator/` under the nearest workspace root, searching from the
/// working directory first and then from this tool's manifest.
fn default_crate_dir() -> Option<PathBuf> {
    let starts = [
        env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    starts
        .into_iter()
        .flatten()
        .find_map(|start| workspace_root(&start))
        .map(|root| root.join(TARGET_MEMBER))
}

fn workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            std::fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.lines().any(|line| line.trim() == "[workspace]"))
        })
        .map(Path::to_path_buf)
}
