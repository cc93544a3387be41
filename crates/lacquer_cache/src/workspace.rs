//! Workspace root detection for monorepo layouts.
//!
//! Artifact paths are laid out relative to the workspace root so that every
//! package of a monorepo shares one cache tree. The root is the nearest
//! ancestor whose `package.json` declares `workspaces` covering the starting
//! directory.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::Deserialize;

/// Name of the package manifest consulted at each ancestor.
const PACKAGE_MANIFEST: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    workspaces: Option<Workspaces>,
}

/// The `workspaces` field: either a list of globs or `{ "packages": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Workspaces {
    List(Vec<String>),
    Config {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl Workspaces {
    fn patterns(&self) -> &[String] {
        match self {
            Workspaces::List(globs) => globs,
            Workspaces::Config { packages } => packages,
        }
    }
}

/// Finds the workspace root enclosing `start`.
///
/// Walks up from `start`; the first ancestor with a `package.json` whose
/// `workspaces` globs match `start` (or which is `start` itself) wins.
/// Unreadable or malformed manifests are skipped. Returns `None` when no
/// ancestor qualifies.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };

    for dir in start.ancestors() {
        let Some(workspaces) = read_workspaces(&dir.join(PACKAGE_MANIFEST)) else {
            continue;
        };
        let Ok(relative) = start.strip_prefix(dir) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            tracing::debug!(root = %dir.display(), "workspace root detected");
            return Some(dir.to_path_buf());
        }
        let relative = relative.to_string_lossy().replace('\\', "/");
        let covered = workspaces.patterns().iter().any(|glob| {
            Pattern::new(glob.trim_end_matches('/'))
                .map(|p| p.matches_with(&relative, options))
                .unwrap_or(false)
        });
        if covered {
            tracing::debug!(root = %dir.display(), "workspace root detected");
            return Some(dir.to_path_buf());
        }
    }
    None
}

fn read_workspaces(manifest: &Path) -> Option<Workspaces> {
    let content = std::fs::read_to_string(manifest).ok()?;
    let manifest: PackageManifest = serde_json::from_str(&content).ok()?;
    manifest.workspaces
}
