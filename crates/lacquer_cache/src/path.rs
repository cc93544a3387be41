//! Deterministic artifact path derivation.
//!
//! An artifact's location is a pure function of the source module id and the
//! configured cache root, extension, and workspace root. No I/O happens here:
//! the same inputs always produce the same [`ArtifactPath`].

use std::borrow::Borrow;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A normalized, `/`-separated absolute path naming a stylesheet artifact.
///
/// Doubles as the virtual module id the host resolves the synthetic import
/// against, so its string form is the canonical identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactPath(String);

impl ArtifactPath {
    /// Builds an artifact path from an arbitrary path, normalizing it.
    pub fn from_path(path: &Path) -> Self {
        Self(canonical_string(&normalize_lexically(path)))
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the artifact location as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Consumes the path and returns its canonical string form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for ArtifactPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl Borrow<str> for ArtifactPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Replaces the file extension of `source_id` with `extension`.
///
/// `src/a.ts` with `.linaria.css` becomes `src/a.linaria.css`; only the last
/// extension is replaced (`a.test.ts` becomes `a.test.linaria.css`). A file
/// name without an extension gets `extension` appended.
pub fn base_output_filename(source_id: &Path, extension: &str) -> PathBuf {
    let mut name = match (source_id.file_stem(), source_id.extension()) {
        (Some(stem), Some(_)) => stem.to_os_string(),
        _ => source_id
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default(),
    };
    name.push(extension);
    source_id.with_file_name(name)
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` at the root of an absolute path is dropped; leading `..` of a
/// relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Renders a path with `/` separators and no trailing separator.
fn canonical_string(path: &Path) -> String {
    let mut s = path.to_string_lossy().replace('\\', "/");
    while s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    s
}

/// Derives artifact paths for a fixed cache configuration.
///
/// The cache root and workspace root are made absolute once, at
/// construction, against the supplied working directory. Relative source
/// ids are resolved against that same directory.
#[derive(Debug, Clone)]
pub struct ArtifactPathResolver {
    cache_root: PathBuf,
    extension: String,
    workspace_root: PathBuf,
    cwd: PathBuf,
}

impl ArtifactPathResolver {
    /// Creates a resolver. Relative `cache_root` and `workspace_root` are
    /// resolved against `cwd`.
    pub fn new(
        cache_root: &Path,
        extension: impl Into<String>,
        workspace_root: &Path,
        cwd: &Path,
    ) -> Self {
        Self {
            cache_root: absolutize(cache_root, cwd),
            extension: extension.into(),
            workspace_root: absolutize(workspace_root, cwd),
            cwd: normalize_lexically(cwd),
        }
    }

    /// Returns the absolute cache root.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Returns the absolute workspace root.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Returns the artifact extension suffix.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the source-derived filename next to the source module,
    /// before it is moved under the cache root.
    pub fn sibling(&self, source_id: &Path) -> PathBuf {
        base_output_filename(&absolutize(source_id, &self.cwd), &self.extension)
    }

    /// Derives the artifact path for a source module.
    ///
    /// Sources under the workspace root keep their workspace-relative layout
    /// below the cache root. Sources elsewhere keep their full path, minus
    /// the root and any drive prefix, below the cache root.
    pub fn resolve(&self, source_id: &Path) -> ArtifactPath {
        let source_id = absolutize(source_id, &self.cwd);
        let base = base_output_filename(&source_id, &self.extension);
        let relative: PathBuf = if source_id.starts_with(&self.workspace_root) {
            base.strip_prefix(&self.workspace_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| normal_components(&base))
        } else {
            normal_components(&base)
        };
        ArtifactPath::from_path(&self.cache_root.join(relative))
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&cwd.join(path))
    }
}

fn normal_components(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
