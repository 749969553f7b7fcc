// src/registry.rs
// =============================================================================
// Module lookup: turns a module alias ("oak") into the repository it points
// at ({type: github, org: oakserver, repo: oak}).
//
// The resolver only sees the ModuleLookup trait, so a web server can plug in
// a database-backed lookup. ModuleRegistry is the built-in implementation,
// loaded from a JSON file:
//
//   {
//     "oak":   { "type": "github", "org": "oakserver", "repo": "oak" },
//     "gl_mod": { "type": "gitlab", "org": "group",     "repo": "project" }
//   }
// =============================================================================

use crate::error::{ResolveError, Result};
use crate::forge::ModuleReference;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[async_trait]
pub trait ModuleLookup: Send + Sync {
    /// Ok(None) means "no such module", which is not an error.
    async fn lookup(&self, name: &str) -> Result<Option<ModuleReference>>;
}

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleReference>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let modules: HashMap<String, ModuleReference> = serde_json::from_str(json)?;
        Ok(Self { modules })
    }

    // Reads a registry file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let modules = serde_json::from_str(&json).map_err(|source| ResolveError::Registry {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self { modules };
        debug!(path = %path.display(), modules = registry.len(), "loaded module registry");
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, reference: ModuleReference) {
        self.modules.insert(name.into(), reference);
    }

    pub fn get(&self, name: &str) -> Option<&ModuleReference> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[async_trait]
impl ModuleLookup for ModuleRegistry {
    async fn lookup(&self, name: &str) -> Result<Option<ModuleReference>> {
        Ok(self.get(name).cloned())
    }
}
