//! In-memory registry of virtual stylesheet modules.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::path::ArtifactPath;

/// Maps artifact paths to the stylesheet content the host should load for them.
///
/// This is the addressable space behind the synthetic imports appended to
/// transformed modules. Lookups never block on I/O and never fail: an
/// unknown id is simply not ours. Entries are only ever added or replaced,
/// last write wins.
#[derive(Debug, Default)]
pub struct VirtualModuleRegistry {
    modules: RwLock<HashMap<ArtifactPath, String>>,
}

impl VirtualModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` names a registered virtual module.
    pub fn has(&self, id: &str) -> bool {
        self.modules.read().contains_key(id)
    }

    /// Returns the current content of the virtual module `id`.
    pub fn get(&self, id: &str) -> Option<String> {
        self.modules.read().get(id).cloned()
    }

    /// Registers or replaces the content for `id`, returning the previous content.
    pub fn set(&self, id: ArtifactPath, content: String) -> Option<String> {
        self.modules.write().insert(id, content)
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    /// Returns `true` if no module has been registered.
    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Returns the registered ids in sorted order.
    pub fn ids(&self) -> Vec<ArtifactPath> {
        let mut ids: Vec<ArtifactPath> = self.modules.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    fn id(s: &str) -> ArtifactPath {
        ArtifactPath::from_path(Path::new(s))
    }

    #[test]
    fn empty_registry_answers_not_mine() {
        let registry = VirtualModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.has("/ws/.linaria-cache/a.linaria.css"));
        assert!(registry.get("/ws/.linaria-cache/a.linaria.css").is_none());
    }

    #[test]
    fn set_then_get() {
        let registry = VirtualModuleRegistry::new();
        assert!(registry
            .set(id("/c/a.linaria.css"), "color:red".to_string())
            .is_none());
        assert!(registry.has("/c/a.linaria.css"));
        assert_eq!(registry.get("/c/a.linaria.css").as_deref(), Some("color:red"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn set_overwrites() {
        let registry = VirtualModuleRegistry::new();
        registry.set(id("/c/a.css"), "v1".to_string());
        let previous = registry.set(id("/c/a.css"), "v2".to_string());
        assert_eq!(previous.as_deref(), Some("v1"));
        assert_eq!(registry.get("/c/a.css").as_deref(), Some("v2"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_are_sorted() {
        let registry = VirtualModuleRegistry::new();
        registry.set(id("/c/b.css"), String::new());
        registry.set(id("/c/a.css"), String::new());
        let ids: Vec<String> = registry.ids().into_iter().map(|p| p.into_string()).collect();
        assert_eq!(ids, vec!["/c/a.css", "/c/b.css"]);
    }

    #[test]
    fn concurrent_writers_on_distinct_keys() {
        let registry = Arc::new(VirtualModuleRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        registry.set(id(&format!("/c/t{t}/m{i}.css")), format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 400);
        assert_eq!(registry.get("/c/t3/m7.css").as_deref(), Some("3-7"));
    }
}
