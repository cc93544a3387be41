//! Text emitted into transformed modules and stylesheets.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lacquer_cache::ArtifactPath;

/// Builds the inline comment embedding a CSS source map as a base64 data URI.
pub fn inline_source_map_comment(source_map: &str) -> String {
    format!(
        "/*# sourceMappingURL=data:application/json;base64,{}*/",
        STANDARD.encode(source_map)
    )
}

/// Appends a side-effect import of `artifact` to `code`.
pub fn append_import(mut code: String, artifact: &ArtifactPath) -> String {
    let specifier = serde_json::Value::from(artifact.as_str());
    code.push_str(&format!("\nimport {specifier};\n"));
    code
}
