//! Configuration types deserialized from `lacquer.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Default directory, relative to the working directory, holding extracted stylesheets.
pub const DEFAULT_CACHE_DIRECTORY: &str = ".linaria-cache";

/// Default suffix that replaces a source module's extension to name its artifact.
pub const DEFAULT_EXTENSION: &str = ".linaria.css";

/// Default pattern a module id must match to be handed to the extractor.
pub const DEFAULT_SOURCE_SYNTAX: &str = r"\.[cm]?[jt]sx?$";

/// Pass-through options forwarded verbatim to the style extractor.
pub type PluginOptions = serde_json::Map<String, serde_json::Value>;

/// The plugin configuration parsed from `lacquer.toml` or built in code.
///
/// Keys are snake_case; the camelCase spellings used by JavaScript build
/// configs (`sourceMap`, `cacheDirectory`, ...) are accepted as aliases.
/// Unrecognized keys are not an error: they are collected into
/// [`plugin_options`](Self::plugin_options) and forwarded to the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Glob patterns a module id must match. Empty means every module.
    #[serde(default, deserialize_with = "deserialize_patterns")]
    pub include: Vec<String>,
    /// Glob patterns that reject a module id, even when it is included.
    #[serde(default, deserialize_with = "deserialize_patterns")]
    pub exclude: Vec<String>,
    /// Whether to append the extractor's CSS source map as an inline comment.
    #[serde(default, alias = "sourceMap")]
    pub source_map: bool,
    /// Directory holding the extracted stylesheet artifacts.
    #[serde(default = "default_cache_directory", alias = "cacheDirectory")]
    pub cache_directory: PathBuf,
    /// Suffix replacing the source extension (e.g. `a.ts` -> `a.linaria.css`).
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Preprocessor name handed to the extractor. `None` lets the extractor choose.
    #[serde(default)]
    pub preprocessor: Option<Preprocessor>,
    /// Regular expression over the module id selecting eligible source syntaxes.
    #[serde(default = "default_source_syntax", alias = "sourceSyntax")]
    pub source_syntax: String,
    /// Explicit workspace root. When absent, the root is detected from the
    /// working directory.
    #[serde(default, alias = "workspaceRoot")]
    pub workspace_root: Option<PathBuf>,
    /// How to decide whether an on-disk artifact can be trusted.
    #[serde(default, alias = "staleGuard")]
    pub stale_guard: StaleGuard,
    /// Every other key, forwarded to the extractor untouched.
    #[serde(flatten)]
    pub plugin_options: PluginOptions,
}

fn default_cache_directory() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIRECTORY)
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_source_syntax() -> String {
    DEFAULT_SOURCE_SYNTAX.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            source_map: false,
            cache_directory: default_cache_directory(),
            extension: default_extension(),
            preprocessor: None,
            source_syntax: default_source_syntax(),
            workspace_root: None,
            stale_guard: StaleGuard::default(),
            plugin_options: PluginOptions::new(),
        }
    }
}

impl PluginConfig {
    /// Sets the include patterns.
    pub fn with_include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the exclude patterns.
    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables the inline CSS source-map comment.
    pub fn with_source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    /// Sets the artifact cache directory.
    pub fn with_cache_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_directory = dir.into();
        self
    }

    /// Sets the artifact extension suffix.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the preprocessor forwarded to the extractor.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Pins the workspace root instead of detecting it.
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Sets the stale-artifact guard.
    pub fn with_stale_guard(mut self, guard: StaleGuard) -> Self {
        self.stale_guard = guard;
        self
    }

    /// Adds a pass-through option for the extractor.
    pub fn with_plugin_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.plugin_options.insert(key.into(), value.into());
        self
    }
}

/// Deserializes module filter patterns.
///
/// Build configs commonly give a lone pattern (`include = "src/**"`) as well
/// as a list (`include = ["src/**", "lib/**"]`); both yield a pattern list.
/// Blank patterns would anchor at the working directory itself and match
/// nothing useful, so they are dropped.
fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Patterns;

    impl<'de> Visitor<'de> for Patterns {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a glob pattern or a list of glob patterns")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(non_blank(v).into_iter().collect())
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut patterns = Vec::new();
            while let Some(pattern) = seq.next_element::<String>()? {
                patterns.extend(non_blank(&pattern));
            }
            Ok(patterns)
        }
    }

    deserializer.deserialize_any(Patterns)
}

fn non_blank(pattern: &str) -> Option<String> {
    let trimmed = pattern.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The CSS preprocessor the extractor should run over extracted rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Preprocessor {
    /// Emit rules as written.
    None,
    /// Run rules through stylis (nesting, prefixing).
    Stylis,
    /// Any other preprocessor known to the extractor.
    Custom(String),
}

impl Preprocessor {
    /// Returns the name the extractor knows this preprocessor by.
    pub fn as_str(&self) -> &str {
        match self {
            Preprocessor::None => "none",
            Preprocessor::Stylis => "stylis",
            Preprocessor::Custom(name) => name,
        }
    }
}

impl From<String> for Preprocessor {
    fn from(name: String) -> Self {
        match name.as_str() {
            "none" => Preprocessor::None,
            "stylis" => Preprocessor::Stylis,
            _ => Preprocessor::Custom(name),
        }
    }
}

/// Policy for distrusting an on-disk artifact before comparing against it.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StaleGuard {
    /// Distrust the artifact when a file exists at the source-derived
    /// filename next to the source module (default).
    #[default]
    SiblingFile,
    /// Always trust the artifact.
    Off,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PluginConfig::default();
        assert_eq!(config.cache_directory, PathBuf::from(".linaria-cache"));
        assert_eq!(config.extension, ".linaria.css");
        assert!(!config.source_map);
        assert!(config.include.is_empty());
        assert!(config.exclude.is_empty());
        assert_eq!(config.stale_guard, StaleGuard::SiblingFile);
        assert!(config.preprocessor.is_none());
    }

    #[test]
    fn preprocessor_from_name() {
        assert_eq!(Preprocessor::from("none".to_string()), Preprocessor::None);
        assert_eq!(
            Preprocessor::from("stylis".to_string()),
            Preprocessor::Stylis
        );
        let custom = Preprocessor::from("postcss".to_string());
        assert_eq!(custom, Preprocessor::Custom("postcss".to_string()));
        assert_eq!(custom.as_str(), "postcss");
    }

    #[test]
    fn builder_setters() {
        let config = PluginConfig::default()
            .with_include(["src/**"])
            .with_exclude(vec!["**/node_modules/**".to_string()])
            .with_source_map(true)
            .with_extension(".styles.css")
            .with_stale_guard(StaleGuard::Off)
            .with_plugin_option("displayName", true);
        assert_eq!(config.include, vec!["src/**"]);
        assert_eq!(config.exclude, vec!["**/node_modules/**"]);
        assert!(config.source_map);
        assert_eq!(config.extension, ".styles.css");
        assert_eq!(config.stale_guard, StaleGuard::Off);
        assert_eq!(
            config.plugin_options.get("displayName"),
            Some(&serde_json::Value::Bool(true))
        );
    }
}
