//! The plugin instance and its host hooks.
//!
//! [`Plugin::transform`] runs the extraction pipeline for one module:
//!
//! ```text
//! filter -> clear extractor cache -> extract -> resolve artifact path
//!        -> read trusted artifact -> append CSS source map
//!        -> write if changed -> register virtual module -> append import
//! ```
//!
//! [`Plugin::resolve_id`] and [`Plugin::load`] answer the host's queries for
//! the synthetic stylesheet imports from the virtual module registry.

use std::path::Path;
use std::sync::Arc;

use lacquer_cache::{
    find_workspace_root, ArtifactPath, ArtifactPathResolver, ArtifactStore, InvalidationPolicy,
    SiblingFileGuard, TrustCache, VirtualModuleRegistry, WriteOutcome,
};
use lacquer_config::{validate_config, ConfigError, PluginConfig, PluginOptions, Preprocessor, StaleGuard};
use rayon::prelude::*;
use regex::Regex;

use crate::error::PluginError;
use crate::extractor::{ExtractOptions, StyleExtractor};
use crate::filter::ModuleFilter;
use crate::output::{append_import, inline_source_map_comment};

/// The name the plugin registers with the host.
pub const PLUGIN_NAME: &str = "vite-plugin-linaria";

/// A source module handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    /// Absolute module path.
    pub id: String,
    /// Raw source text.
    pub code: String,
}

impl SourceModule {
    /// Creates a source module.
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
        }
    }
}

/// Why a module was passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The id failed the include/exclude filter.
    Filtered,
    /// The id is one of our own stylesheet artifacts.
    VirtualModule,
    /// The id's syntax is not handled by the extractor.
    UnsupportedSyntax,
    /// The extractor found no styles.
    NoStyles,
}

/// A module rewritten to import its extracted stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedModule {
    /// The extractor's code followed by the stylesheet import.
    pub code: String,
    /// The extractor's source map for the module code, untouched.
    pub map: Option<String>,
    /// Where the stylesheet lives, also its virtual module id.
    pub artifact: ArtifactPath,
    /// Whether the artifact had to be written.
    pub write: WriteOutcome,
}

/// The result of a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// The host should keep the module as is.
    Skip(SkipReason),
    /// The module was rewritten.
    Transformed(TransformedModule),
}

impl TransformOutcome {
    /// Returns `true` for [`TransformOutcome::Skip`].
    pub fn is_skip(&self) -> bool {
        matches!(self, TransformOutcome::Skip(_))
    }

    /// Returns the rewritten module, if any.
    pub fn transformed(&self) -> Option<&TransformedModule> {
        match self {
            TransformOutcome::Transformed(module) => Some(module),
            TransformOutcome::Skip(_) => None,
        }
    }

    /// Consumes the outcome and returns the rewritten module, if any.
    pub fn into_transformed(self) -> Option<TransformedModule> {
        match self {
            TransformOutcome::Transformed(module) => Some(module),
            TransformOutcome::Skip(_) => None,
        }
    }
}

/// One plugin instance: configuration, extractor, artifact store, and the
/// registry of stylesheets it has produced.
///
/// Every instance owns its registry unless one is shared in explicitly with
/// [`with_registry`](Self::with_registry).
#[derive(Debug)]
pub struct Plugin<E> {
    extractor: E,
    filter: ModuleFilter,
    source_syntax: Regex,
    resolver: ArtifactPathResolver,
    store: ArtifactStore,
    registry: Arc<VirtualModuleRegistry>,
    source_map: bool,
    preprocessor: Option<Preprocessor>,
    plugin_options: PluginOptions,
}

impl<E: StyleExtractor> Plugin<E> {
    /// Creates a plugin rooted at the process working directory.
    pub fn new(config: PluginConfig, extractor: E) -> Result<Self, PluginError> {
        let cwd = std::env::current_dir().map_err(PluginError::WorkingDirectory)?;
        Self::with_cwd(config, extractor, &cwd)
    }

    /// Creates a plugin rooted at `cwd`.
    ///
    /// Relative cache directories and filter patterns are resolved against
    /// `cwd`. The workspace root is taken from the configuration, else
    /// detected from `cwd`, else `cwd` itself.
    pub fn with_cwd(config: PluginConfig, extractor: E, cwd: &Path) -> Result<Self, PluginError> {
        validate_config(&config)?;

        let filter = ModuleFilter::new(&config.include, &config.exclude, cwd)?;
        let source_syntax = Regex::new(&config.source_syntax).map_err(|e| {
            ConfigError::ValidationError(format!("invalid source_syntax pattern: {e}"))
        })?;
        let workspace_root = config
            .workspace_root
            .clone()
            .or_else(|| find_workspace_root(cwd))
            .unwrap_or_else(|| cwd.to_path_buf());
        let resolver = ArtifactPathResolver::new(
            &config.cache_directory,
            config.extension.clone(),
            &workspace_root,
            cwd,
        );
        let store = match config.stale_guard {
            StaleGuard::SiblingFile => ArtifactStore::new(SiblingFileGuard),
            StaleGuard::Off => ArtifactStore::new(TrustCache),
        };

        tracing::debug!(
            cache_root = %resolver.cache_root().display(),
            workspace_root = %resolver.workspace_root().display(),
            "linaria plugin initialized"
        );

        Ok(Self {
            extractor,
            filter,
            source_syntax,
            resolver,
            store,
            registry: Arc::new(VirtualModuleRegistry::new()),
            source_map: config.source_map,
            preprocessor: config.preprocessor,
            plugin_options: config.plugin_options,
        })
    }

    /// Shares `registry` with this instance instead of its own.
    pub fn with_registry(mut self, registry: Arc<VirtualModuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the policy that decides when cached artifacts are distrusted.
    pub fn with_invalidation_policy(mut self, policy: impl InvalidationPolicy + 'static) -> Self {
        self.store = ArtifactStore::new(policy);
        self
    }

    /// Returns the plugin name registered with the host.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Returns the virtual module registry.
    pub fn registry(&self) -> &Arc<VirtualModuleRegistry> {
        &self.registry
    }

    /// Returns the artifact path resolver.
    pub fn resolver(&self) -> &ArtifactPathResolver {
        &self.resolver
    }

    /// Returns the style extractor.
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Claims `importee` if it is one of our stylesheet artifacts.
    pub fn resolve_id(&self, importee: &str) -> Option<String> {
        self.registry.has(importee).then(|| importee.to_string())
    }

    /// Returns the stylesheet for `id`, or `None` to defer to the host loader.
    pub fn load(&self, id: &str) -> Option<String> {
        self.registry.get(id)
    }

    /// Extracts the styles of one module.
    ///
    /// Returns once the artifact and the registry reflect the new
    /// stylesheet, so an immediate [`load`](Self::load) of the returned
    /// artifact sees it. Extractor and write failures are returned as is;
    /// the registry is only updated after a successful write.
    pub fn transform(&self, code: &str, id: &str) -> Result<TransformOutcome, PluginError> {
        if let Some(reason) = self.skip_reason(id) {
            tracing::trace!(id, ?reason, "module skipped");
            return Ok(TransformOutcome::Skip(reason));
        }

        self.extractor.clear_cache_for(id);
        let options = ExtractOptions {
            filename: id,
            preprocessor: self.preprocessor.as_ref(),
            plugin_options: &self.plugin_options,
        };
        let extraction = self
            .extractor
            .extract(code, &options)
            .map_err(|source| PluginError::Extractor {
                id: id.to_string(),
                source,
            })?;

        let mut css_text = match extraction.css_text {
            Some(css) if !css.is_empty() => css,
            _ => {
                tracing::trace!(id, "no styles to extract");
                return Ok(TransformOutcome::Skip(SkipReason::NoStyles));
            }
        };

        let source_path = Path::new(id);
        let artifact = self.resolver.resolve(source_path);
        let current = self
            .store
            .trusted_content(&artifact, &self.resolver.sibling(source_path));

        if self.source_map {
            if let Some(map) = extraction.css_source_map_text.as_deref() {
                css_text.push_str(&inline_source_map_comment(map));
            }
        }

        let write = self
            .store
            .write_if_changed(&artifact, &css_text, current.as_deref())?;
        if write == WriteOutcome::Unchanged {
            tracing::debug!(id, artifact = %artifact, "stylesheet unchanged");
        }
        self.registry.set(artifact.clone(), css_text);

        Ok(TransformOutcome::Transformed(TransformedModule {
            code: append_import(extraction.code, &artifact),
            map: extraction.source_map,
            artifact,
            write,
        }))
    }

    /// Transforms independent modules in parallel.
    ///
    /// Module ids must be distinct. Results come back in input order.
    pub fn transform_batch(
        &self,
        modules: &[SourceModule],
    ) -> Vec<Result<TransformOutcome, PluginError>> {
        modules
            .par_iter()
            .map(|module| self.transform(&module.code, &module.id))
            .collect()
    }

    fn skip_reason(&self, id: &str) -> Option<SkipReason> {
        if !self.filter.matches(id) {
            Some(SkipReason::Filtered)
        } else if self.registry.has(id) {
            Some(SkipReason::VirtualModule)
        } else if !self.source_syntax.is_match(id) {
            Some(SkipReason::UnsupportedSyntax)
        } else {
            None
        }
    }
}
