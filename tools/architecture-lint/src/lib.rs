//! Boundary lint for the translator's ports-and-adapters layout.
//!
//! The translator keeps its translation core in `domain`, the event bus in
//! `inbound` and every HTTP, file and signing adapter in `outbound`. This
//! crate parses the sources with `syn` and reports any import that crosses
//! those lines:
//!
//! - `domain` may not reach adapter modules, composition code, or the
//!   crates that only adapters and the binary are allowed to use
//! - `inbound` may not reach `outbound` or the HTTP and crypto crates
//! - `outbound` may not reach `inbound` or composition code
//!
//! Run it with `cargo run -p architecture-lint` from anywhere in the
//! workspace.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;
use thiserror::Error;

/// Name the translator library is imported under from its own binaries.
const CRATE_NAME: &str = "translator";

/// Top-level modules the lint knows about.
const LAYER_ROOTS: [&str; 3] = ["domain", "inbound", "outbound"];

/// Composition modules only the binary and `bootstrap` may see.
const COMPOSITION_ROOTS: [&str; 2] = ["bootstrap", "config"];

/// Crates reserved for adapters and process setup.
const ADAPTER_CRATES: [&str; 9] = [
    "base64",
    "cap_std",
    "color_eyre",
    "hmac",
    "ortho_config",
    "reqwest",
    "sha2",
    "tracing_subscriber",
    "zeroize",
];

/// One import that crosses a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", file.display())]
pub struct Violation {
    /// File path relative to `translator/src`.
    pub file: PathBuf,
    /// Which rule was broken.
    pub message: String,
}

/// Failure modes returned by the lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Walking or reading the source tree failed.
    #[error("failed to read translator sources: {0}")]
    Io(#[from] io::Error),
    /// A file could not be parsed or placed in a layer.
    #[error("failed to parse {}: {message}", file.display())]
    Parse {
        /// Offending file.
        file: PathBuf,
        /// Parser or layout message.
        message: String,
    },
    /// At least one boundary was crossed.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    let mut out = format!("{} boundary violation(s):", violations.len());
    for violation in violations {
        out.push_str("\n- ");
        out.push_str(&violation.to_string());
    }
    out
}

/// A Rust source file handed to the lint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `translator/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint every layered module under `crate_dir/src`.
///
/// Files outside `domain`, `inbound` and `outbound` (the binary,
/// `bootstrap`, `config`, test support) are composition code and are not
/// checked.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every crossing, or
/// an I/O or parse error when the tree cannot be read.
pub fn lint_translator_sources(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = crate_dir.join("src");
    let mut sources = Vec::new();
    for root in LAYER_ROOTS {
        let dir = src_dir.join(root);
        if dir.is_dir() {
            collect_sources(&src_dir, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint in-memory sources.
///
/// # Errors
///
/// As for [`lint_translator_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer =
            Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "file is not under domain, inbound or outbound".to_owned(),
            })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn of(relative: &Path) -> Option<Self> {
        let first = relative.components().next()?.as_os_str().to_str()?;
        match first {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_modules(self) -> BTreeSet<&'static str> {
        let mut roots = BTreeSet::from(COMPOSITION_ROOTS);
        match self {
            Self::Domain => roots.extend(["inbound", "outbound"]),
            Self::Inbound => {
                roots.insert("outbound");
            }
            Self::Outbound => {
                roots.insert("inbound");
            }
        }
        roots
    }

    fn forbidden_crates(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from(ADAPTER_CRATES),
            Self::Inbound => BTreeSet::from(["base64", "cap_std", "hmac", "reqwest", "sha2"]),
            Self::Outbound => BTreeSet::from(["color_eyre", "ortho_config", "tracing_subscriber"]),
        }
    }
}

fn check_file(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let modules = layer.forbidden_modules();
    let crates = layer.forbidden_crates();
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) = module_root(segments).and_then(|root| modules.get(root)) {
            messages.insert(format!("{} must not depend on crate::{root}", layer.name()));
        }
        if let Some(root) = crate_root(segments).and_then(|root| crates.get(root)) {
            messages.insert(format!("{} must not use the `{root}` crate", layer.name()));
        }
    }
    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    // A lone identifier is a binding, not a module path.
    if segments.len() > 1 && (LAYER_ROOTS.contains(&first) || COMPOSITION_ROOTS.contains(&first)) {
        return Some(first);
    }
    let index = if first == CRATE_NAME {
        1
    } else if is_relative(first) {
        segments.iter().position(|segment| !is_relative(segment))?
    } else {
        return None;
    };
    segments.get(index).map(String::as_str)
}

fn crate_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    (!is_relative(first) && first != CRATE_NAME).then_some(first)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<_> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_sources(
    src_root: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_sources(src_root, &path, sources)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
            let file = path
                .strip_prefix(src_root)
                .map_err(|err| ArchitectureLintError::Parse {
                    file: path.clone(),
                    message: err.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read_to_string(&path)?;
            sources.push(LintSource { file, contents });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
