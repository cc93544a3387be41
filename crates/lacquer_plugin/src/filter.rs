//! Include/exclude filtering of module ids.

use std::path::Path;

use glob::{MatchOptions, Pattern};
use lacquer_config::ConfigError;

/// Matches module ids against include and exclude glob patterns.
///
/// Relative patterns are anchored at a base directory; patterns that are
/// absolute or start with `**` are used as written. Exclusion wins over
/// inclusion, and an empty include list admits every id. Ids containing a
/// NUL byte are the host's own virtual modules and never pass.
#[derive(Debug, Clone)]
pub struct ModuleFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl ModuleFilter {
    /// Compiles the filter, anchoring relative patterns at `base`.
    pub fn new(include: &[String], exclude: &[String], base: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile(include, base)?,
            exclude: compile(exclude, base)?,
        })
    }

    /// Returns `true` if `id` should be processed.
    pub fn matches(&self, id: &str) -> bool {
        if id.contains('\0') {
            return false;
        }
        let id = id.replace('\\', "/");
        if self.exclude.iter().any(|p| p.matches_with(&id, MATCH_OPTIONS)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches_with(&id, MATCH_OPTIONS))
    }
}

fn compile(patterns: &[String], base: &Path) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|raw| {
            let anchored = anchor(raw, base);
            Pattern::new(&anchored).map_err(|e| {
                ConfigError::ValidationError(format!("invalid filter pattern '{raw}': {e}"))
            })
        })
        .collect()
}

fn anchor(pattern: &str, base: &Path) -> String {
    let pattern = pattern.replace('\\', "/");
    if pattern.starts_with("**") || Path::new(&pattern).is_absolute() {
        return pattern;
    }
    let base = base.to_string_lossy().replace('\\', "/");
    let base = Pattern::escape(base.trim_end_matches('/'));
    let rest = pattern.trim_start_matches("./");
    format!("{base}/{rest}")
}
