//! Plain-text stylesheet artifact storage.
//!
//! Artifacts are stored verbatim at their [`ArtifactPath`]. Reads are
//! fail-safe (a missing or unreadable file is absent content) and writes are
//! skipped when the content on disk already matches, so rebuilds with
//! unchanged styles never touch the filesystem and never retrigger file
//! watchers.

use std::path::Path;

use crate::error::CacheError;
use crate::guard::{InvalidationPolicy, SiblingFileGuard};
use crate::path::ArtifactPath;

/// Whether a write request reached the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The artifact was (re)written.
    Written,
    /// The artifact already held the requested content.
    Unchanged,
}

/// Reads and writes stylesheet artifacts.
///
/// Writes to distinct paths are independent, so one store can be shared by
/// workers transforming different source modules.
#[derive(Debug)]
pub struct ArtifactStore {
    policy: Box<dyn InvalidationPolicy>,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(SiblingFileGuard)
    }
}

impl ArtifactStore {
    /// Creates a store that consults `policy` before trusting cached content.
    pub fn new(policy: impl InvalidationPolicy + 'static) -> Self {
        Self::with_policy(Box::new(policy))
    }

    /// Creates a store from an already boxed policy.
    pub fn with_policy(policy: Box<dyn InvalidationPolicy>) -> Self {
        Self { policy }
    }

    /// Returns the content currently stored at `path`.
    ///
    /// Returns `None` if the file doesn't exist or can't be read as UTF-8.
    pub fn current_content(&self, path: &ArtifactPath) -> Option<String> {
        std::fs::read_to_string(path.as_path()).ok()
    }

    /// Returns the cached content for comparison, unless the invalidation
    /// policy distrusts the cache for the source whose sibling path is given.
    pub fn trusted_content(&self, path: &ArtifactPath, sibling: &Path) -> Option<String> {
        if self.policy.distrust_cache(sibling) {
            tracing::debug!(
                artifact = %path,
                sibling = %sibling.display(),
                "cached artifact distrusted"
            );
            return None;
        }
        self.current_content(path)
    }

    /// Creates every missing directory leading to `path`.
    pub fn ensure_parent_dirs(&self, path: &ArtifactPath) -> Result<(), CacheError> {
        match path.as_path().parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(|e| CacheError::CreateDir {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
            _ => Ok(()),
        }
    }

    /// Writes `css` to `path` verbatim, creating parent directories and
    /// replacing any previous content.
    pub fn write(&self, path: &ArtifactPath, css: &str) -> Result<(), CacheError> {
        self.ensure_parent_dirs(path)?;
        std::fs::write(path.as_path(), css).map_err(|e| CacheError::Write {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    /// Writes `css` only if it differs from `current`.
    pub fn write_if_changed(
        &self,
        path: &ArtifactPath,
        css: &str,
        current: Option<&str>,
    ) -> Result<WriteOutcome, CacheError> {
        if current == Some(css) {
            return Ok(WriteOutcome::Unchanged);
        }
        self.write(path, css)?;
        tracing::debug!(artifact = %path, bytes = css.len(), "wrote stylesheet artifact");
        Ok(WriteOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::TrustCache;

    fn make_store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        (dir, ArtifactStore::default())
    }

    fn artifact(dir: &tempfile::TempDir, rel: &str) -> ArtifactPath {
        ArtifactPath::from_path(&dir.path().join(rel))
    }

    #[test]
    fn write_and_read_back() {
        let (dir, store) = make_store();
        let path = artifact(&dir, ".linaria-cache/src/a.linaria.css");
        store.write(&path, ".a{color:red}").unwrap();
        assert_eq!(store.current_content(&path).as_deref(), Some(".a{color:red}"));
    }

    #[test]
    fn read_missing_returns_none() {
        let (dir, store) = make_store();
        let path = artifact(&dir, "missing.linaria.css");
        assert!(store.current_content(&path).is_none());
    }

    #[test]
    fn read_non_utf8_returns_none() {
        let (dir, store) = make_store();
        let path = artifact(&dir, "binary.linaria.css");
        std::fs::write(path.as_path(), [0xff, 0xfe, 0x00]).unwrap();
        assert!(store.current_content(&path).is_none());
    }

    #[test]
    fn write_overwrites_previous_content() {
        let (dir, store) = make_store();
        let path = artifact(&dir, "a.linaria.css");
        store.write(&path, "a long first version").unwrap();
        store.write(&path, "short").unwrap();
        assert_eq!(store.current_content(&path).as_deref(), Some("short"));
    }

    #[test]
    fn ensure_parent_dirs_is_idempotent() {
        let (dir, store) = make_store();
        let path = artifact(&dir, "deep/nested/dir/a.css");
        store.ensure_parent_dirs(&path).unwrap();
        store.ensure_parent_dirs(&path).unwrap();
        assert!(dir.path().join("deep/nested/dir").is_dir());
    }

    #[test]
    fn write_if_changed_skips_identical_content() {
        let (dir, store) = make_store();
        let path = artifact(&dir, "a.linaria.css");

        let first = store.write_if_changed(&path, "color:red", None).unwrap();
        assert_eq!(first, WriteOutcome::Written);

        let current = store.current_content(&path);
        let second = store
            .write_if_changed(&path, "color:red", current.as_deref())
            .unwrap();
        assert_eq!(second, WriteOutcome::Unchanged);

        let third = store
            .write_if_changed(&path, "color:blue", current.as_deref())
            .unwrap();
        assert_eq!(third, WriteOutcome::Written);
        assert_eq!(store.current_content(&path).as_deref(), Some("color:blue"));
    }

    #[test]
    fn write_under_a_file_fails() {
        let (dir, store) = make_store();
        std::fs::write(dir.path().join("blocker"), "").unwrap();
        let path = artifact(&dir, "blocker/a.css");
        let err = store.write(&path, "x").unwrap_err();
        assert!(matches!(err, CacheError::CreateDir { .. }));
    }

    #[test]
    fn sibling_file_distrusts_cache() {
        let (dir, store) = make_store();
        let path = artifact(&dir, ".linaria-cache/a.linaria.css");
        store.write(&path, "color:red").unwrap();

        let sibling = dir.path().join("a.linaria.css");
        assert_eq!(
            store.trusted_content(&path, &sibling).as_deref(),
            Some("color:red")
        );

        std::fs::write(&sibling, "stale").unwrap();
        assert!(store.trusted_content(&path, &sibling).is_none());
    }

    #[test]
    fn trusting_store_ignores_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(TrustCache);
        let path = artifact(&dir, ".linaria-cache/a.linaria.css");
        store.write(&path, "color:red").unwrap();

        let sibling = dir.path().join("a.linaria.css");
        std::fs::write(&sibling, "stale").unwrap();
        assert_eq!(
            store.trusted_content(&path, &sibling).as_deref(),
            Some("color:red")
        );
    }

    #[test]
    fn parallel_writes_to_distinct_paths() {
        use rayon::prelude::*;

        let (dir, store) = make_store();
        let paths: Vec<ArtifactPath> = (0..32)
            .map(|i| artifact(&dir, &format!("cache/m{}/f{i}.css", i % 4)))
            .collect();

        paths
            .par_iter()
            .enumerate()
            .for_each(|(i, path)| store.write(path, &format!(".c{i}{{}}")).unwrap());

        for (i, path) in paths.iter().enumerate() {
            assert_eq!(
                store.current_content(path),
                Some(format!(".c{i}{{}}"))
            );
        }
    }
}
