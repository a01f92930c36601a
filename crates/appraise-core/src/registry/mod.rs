//! Check registry: the single source of truth for available checks and the
//! criteria documents that define what counts as a problem for each.
//!
//! The registry is an explicitly constructed, explicitly owned value. Callers
//! assemble one (typically via [`CheckRegistry::with_builtins`]), wrap it in an
//! `Arc` and hand clones to the planner, the executor and the judge. Fresh
//! instance per run instead of a global reset.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::checks::{Check, KeywordCheck, LengthCheck};
use crate::errors::RegistryError;

const LENGTH_CHECK_CRITERIA: &str = include_str!("../../criteria/length_check.md");
const KEYWORD_CHECK_CRITERIA: &str = include_str!("../../criteria/keyword_check.md");

/// Name and description of a registered check.
#[derive(Debug, Clone)]
pub struct CheckInfo {
    pub name: String,
    pub description: String,
}

/// Registry of checks plus their judgment-criteria documents.
#[derive(Default)]
pub struct CheckRegistry {
    // Vec keeps registration order for list().
    checks: Vec<Arc<dyn Check>>,
    criteria: HashMap<String, String>,
    criteria_dir: Option<PathBuf>,
}

impl CheckRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in checks and their embedded
    /// criteria documents.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(LengthCheck::default()))
            .expect("builtin registration cannot collide in an empty registry");
        registry
            .register(Arc::new(KeywordCheck::default()))
            .expect("builtin registration cannot collide in an empty registry");
        registry.set_criteria("length_check", LENGTH_CHECK_CRITERIA);
        registry.set_criteria("keyword_check", KEYWORD_CHECK_CRITERIA);
        registry
    }

    /// Directory of `<check_name>.md` files consulted when no inline criteria
    /// document is stored for a name.
    pub fn set_criteria_dir(&mut self, dir: impl Into<PathBuf>) {
        self.criteria_dir = Some(dir.into());
    }

    /// Store a criteria document for a check name.
    pub fn set_criteria(&mut self, name: impl Into<String>, document: impl Into<String>) {
        self.criteria.insert(name.into(), document.into());
    }

    /// Add a check under its declared name.
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<(), RegistryError> {
        let name = check.name().to_string();
        if self.contains(&name) {
            return Err(RegistryError::DuplicateCheck { name });
        }
        tracing::debug!(check = %name, "registered check");
        self.checks.push(check);
        Ok(())
    }

    /// Remove a check by name.
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        let before = self.checks.len();
        self.checks.retain(|c| c.name() != name);
        if self.checks.len() == before {
            return Err(RegistryError::CheckNotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Look up a check by name.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Check>, RegistryError> {
        self.checks
            .iter()
            .find(|c| c.name() == name)
            .cloned()
            .ok_or_else(|| RegistryError::CheckNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.iter().any(|c| c.name() == name)
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.checks.iter().map(|c| c.name().to_string()).collect()
    }

    /// Name and description for a registered check.
    pub fn check_info(&self, name: &str) -> Result<CheckInfo, RegistryError> {
        let check = self.lookup(name)?;
        Ok(CheckInfo {
            name: check.name().to_string(),
            description: check.description(),
        })
    }

    /// The judgment-criteria document for a check name.
    ///
    /// Inline documents win; otherwise `<criteria_dir>/<name>.md` is read.
    pub fn criteria_for(&self, name: &str) -> Result<String, RegistryError> {
        if let Some(doc) = self.criteria.get(name) {
            return Ok(doc.clone());
        }
        if let Some(dir) = &self.criteria_dir {
            let path = dir.join(format!("{name}.md"));
            if let Ok(doc) = std::fs::read_to_string(&path) {
                return Ok(doc);
            }
        }
        Err(RegistryError::CriteriaNotFound {
            name: name.to_string(),
        })
    }

    /// Drop all registrations and criteria documents.
    pub fn clear(&mut self) {
        self.checks.clear();
        self.criteria.clear();
        self.criteria_dir = None;
    }
}
