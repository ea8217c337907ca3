use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::domain::{RuleSet, SchemeCode};
use super::exclusion::ExclusionPredicate;

/// Immutable, already validated scheme as handed over by the scheme loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeDefinition {
    pub code: SchemeCode,
    pub name: String,
    pub rules: RuleSet,
    #[serde(default)]
    pub exclusions: Vec<ExclusionPredicate>,
}

/// Consistent view of every registered scheme at one version.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    version: u64,
    schemes: BTreeMap<SchemeCode, Arc<SchemeDefinition>>,
}

impl RegistrySnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, code: &SchemeCode) -> Option<Arc<SchemeDefinition>> {
        self.schemes.get(code).cloned()
    }

    pub fn codes(&self) -> impl Iterator<Item = &SchemeCode> {
        self.schemes.keys()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Caller-owned scheme registry. Reloads publish a whole new snapshot at once, so a
/// reader holding an `Arc` keeps seeing the version it started with.
#[derive(Debug, Default)]
pub struct SchemeRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schemes(definitions: impl IntoIterator<Item = SchemeDefinition>) -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot {
                version: 1,
                schemes: index(definitions),
            })),
        }
    }

    pub fn snapshot(&self) -> Result<Arc<RegistrySnapshot>, RegistryError> {
        let guard = self
            .current
            .read()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))?;
        Ok(Arc::clone(&guard))
    }

    pub fn get(&self, code: &SchemeCode) -> Result<Arc<SchemeDefinition>, RegistryError> {
        self.snapshot()?
            .get(code)
            .ok_or_else(|| RegistryError::UnknownScheme(code.clone()))
    }

    /// Replace every scheme with `definitions`, returning the new version.
    pub fn reload(
        &self,
        definitions: impl IntoIterator<Item = SchemeDefinition>,
    ) -> Result<u64, RegistryError> {
        let schemes = index(definitions);
        self.swap(|_| schemes)
    }

    /// Add or replace one scheme, keeping the others.
    pub fn upsert(&self, definition: SchemeDefinition) -> Result<u64, RegistryError> {
        self.swap(|previous| {
            let mut schemes = previous.schemes.clone();
            schemes.insert(definition.code.clone(), Arc::new(definition));
            schemes
        })
    }

    pub fn remove(&self, code: &SchemeCode) -> Result<u64, RegistryError> {
        self.swap(|previous| {
            let mut schemes = previous.schemes.clone();
            schemes.remove(code);
            schemes
        })
    }

    fn swap<F>(&self, build: F) -> Result<u64, RegistryError>
    where
        F: FnOnce(&RegistrySnapshot) -> BTreeMap<SchemeCode, Arc<SchemeDefinition>>,
    {
        let mut guard = self
            .current
            .write()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))?;
        let previous: &RegistrySnapshot = &guard;
        let version = previous.version + 1;
        let schemes = build(previous);
        *guard = Arc::new(RegistrySnapshot { version, schemes });
        Ok(version)
    }
}

fn index(
    definitions: impl IntoIterator<Item = SchemeDefinition>,
) -> BTreeMap<SchemeCode, Arc<SchemeDefinition>> {
    definitions
        .into_iter()
        .map(|definition| (definition.code.clone(), Arc::new(definition)))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown scheme: {0}")]
    UnknownScheme(SchemeCode),
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
