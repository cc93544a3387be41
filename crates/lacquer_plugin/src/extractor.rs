//! The seam to the external style extractor.
//!
//! The extractor evaluates a source module, pulls out its embedded style
//! declarations, and returns the rewritten module together with the CSS. Its
//! internals are opaque to the plugin.

use lacquer_config::{PluginOptions, Preprocessor};

/// Error type returned by extractors. Propagated to the host unchanged.
pub type ExtractorError = Box<dyn std::error::Error + Send + Sync>;

/// Per-module options passed to [`StyleExtractor::extract`].
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    /// The module id, used by the extractor as the filename.
    pub filename: &'a str,
    /// The configured preprocessor, if any.
    pub preprocessor: Option<&'a Preprocessor>,
    /// Pass-through options from the plugin configuration.
    pub plugin_options: &'a PluginOptions,
}

/// What the extractor produced for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The rewritten module code, with style declarations replaced.
    pub code: String,
    /// Source map for the rewritten module code.
    pub source_map: Option<String>,
    /// The extracted CSS. `None` (or empty) means the module has no styles.
    pub css_text: Option<String>,
    /// Source map for the extracted CSS.
    pub css_source_map_text: Option<String>,
}

/// An external service turning embedded style declarations into CSS.
pub trait StyleExtractor: Send + Sync {
    /// Extracts styles from `source`.
    fn extract(
        &self,
        source: &str,
        options: &ExtractOptions<'_>,
    ) -> Result<Extraction, ExtractorError>;

    /// Drops any memoized evaluation state for `filename`, so the next
    /// [`extract`](Self::extract) sees the module's current content.
    fn clear_cache_for(&self, filename: &str);
}
