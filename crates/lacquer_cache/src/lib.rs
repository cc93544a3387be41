//! Stylesheet artifact cache and virtual module registry.
//!
//! This crate derives deterministic on-disk locations for extracted
//! stylesheets, persists them without touching unchanged files, and keeps the
//! in-memory registry the host's module loader resolves synthetic imports
//! against.

#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod guard;
pub mod path;
pub mod registry;
pub mod workspace;

pub use artifact::{ArtifactStore, WriteOutcome};
pub use error::CacheError;
pub use guard::{InvalidationPolicy, SiblingFileGuard, TrustCache};
pub use path::{base_output_filename, normalize_lexically, ArtifactPath, ArtifactPathResolver};
pub use registry::VirtualModuleRegistry;
pub use workspace::find_workspace_root;
