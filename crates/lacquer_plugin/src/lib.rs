//! Build-tool plugin that extracts inline CSS into standalone stylesheets.
//!
//! Source modules are handed to an external [`StyleExtractor`]. When it finds
//! embedded styles, the resulting CSS is persisted as an artifact under the
//! cache directory, registered as a virtual module, and imported from the
//! rewritten source so the host bundles it like any other stylesheet.

#![warn(missing_docs)]

pub mod error;
pub mod extractor;
pub mod filter;
pub mod output;
pub mod plugin;

pub use error::PluginError;
pub use extractor::{ExtractOptions, Extraction, ExtractorError, StyleExtractor};
pub use filter::ModuleFilter;
pub use plugin::{Plugin, SkipReason, SourceModule, TransformOutcome, TransformedModule, PLUGIN_NAME};
