//! Predicates deciding whether an on-disk artifact may be compared against.

use std::fmt;
use std::path::Path;

/// Decides whether the cached artifact for a source module is trustworthy.
///
/// `sibling` is the source-derived filename next to the source module (the
/// source path with its extension replaced), before it is moved under the
/// cache root. When the policy distrusts the cache, the current artifact
/// content is treated as absent and the artifact is rewritten.
pub trait InvalidationPolicy: fmt::Debug + Send + Sync {
    /// Returns `true` if the cached artifact must not be trusted.
    fn distrust_cache(&self, sibling: &Path) -> bool;
}

/// Distrusts the cache whenever a file exists at the sibling path.
///
/// Another tool writing a stylesheet next to the source is a sign the cache
/// directory may be out of step with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiblingFileGuard;

impl InvalidationPolicy for SiblingFileGuard {
    fn distrust_cache(&self, sibling: &Path) -> bool {
        sibling.exists()
    }
}

/// Always trusts the cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustCache;

impl InvalidationPolicy for TrustCache {
    fn distrust_cache(&self, _sibling: &Path) -> bool {
        false
    }
}
