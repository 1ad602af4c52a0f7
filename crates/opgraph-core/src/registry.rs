//! Operator registry seam and an in-memory, JSON-backed implementation.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::{ElementDescriptor, OperatorDescriptor};
use crate::error::{CatalogError, CatalogResult};

/// Read-only lookup of operator descriptors.
///
/// Iteration order of [`list_operators`](OperatorRegistry::list_operators)
/// is unspecified; callers sort before presenting.
pub trait OperatorRegistry {
    /// Find an operator by name, alias or class name.
    fn lookup_operator(&self, name: &str) -> Option<&OperatorDescriptor>;

    /// All registered operators.
    fn list_operators(&self) -> Vec<&OperatorDescriptor>;
}

/// On-disk catalog layout: `{ "operators": [ ... ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorCatalog {
    #[serde(default)]
    pub operators: Vec<OperatorDescriptor>,
}

/// Registry holding descriptors keyed by effective name.
///
/// Declared names and class names are indexed separately; when several
/// operators share one, the first registered wins.
#[derive(Default)]
pub struct InMemoryOperatorRegistry {
    operators: HashMap<String, OperatorDescriptor>,
    aliases: HashMap<String, String>,
}

impl InMemoryOperatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            operators: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register an operator. Effective names must be unique.
    pub fn register(&mut self, operator: OperatorDescriptor) -> CatalogResult<()> {
        let key = operator.effective_name().to_string();
        if self.operators.contains_key(&key) {
            return Err(CatalogError::DuplicateOperator { name: key });
        }
        for alt in [&operator.name, &operator.operator_class] {
            self.aliases
                .entry(alt.clone())
                .or_insert_with(|| key.clone());
        }
        self.operators.insert(key, operator);
        Ok(())
    }

    /// Register an operator (builder pattern).
    pub fn with_operator(mut self, operator: OperatorDescriptor) -> CatalogResult<Self> {
        self.register(operator)?;
        Ok(self)
    }

    /// Build a registry from catalog JSON.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let catalog: OperatorCatalog = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for operator in catalog.operators {
            registry.register(operator)?;
        }
        debug!(operators = registry.len(), "Loaded operator catalog");
        Ok(registry)
    }

    /// Build a registry from a catalog file.
    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl OperatorRegistry for InMemoryOperatorRegistry {
    fn lookup_operator(&self, name: &str) -> Option<&OperatorDescriptor> {
        self.operators.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|key| self.operators.get(key))
        })
    }

    fn list_operators(&self) -> Vec<&OperatorDescriptor> {
        self.operators.values().collect()
    }
}

impl fmt::Debug for InMemoryOperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryOperatorRegistry")
            .field("operator_count", &self.operators.len())
            .field("operators", &self.operators.keys().collect::<Vec<_>>())
            .finish()
    }
}
