//! Module prototype registry.
//!
//! One `ModuleSpec` per kind, populated explicitly at scene-construction
//! time. The assembler resolves every layout command against this registry;
//! a missing prototype is a fatal configuration error, never a silently
//! skipped segment.

use serde::{Deserialize, Serialize};

use crate::modules::{ModuleKind, ModuleSpec};
use crate::validation::{Severity, ValidationError};

/// Registry of the five module prototypes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCatalog {
    specs: Vec<ModuleSpec>,
}

impl ModuleCatalog {
    /// An empty catalog. Prototypes must be registered before assembly.
    pub fn empty() -> Self {
        Self { specs: Vec::new() }
    }

    /// A catalog with sensible defaults for every kind: 4 m segments,
    /// 2 m wide, 2 m dead-end cap.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        for kind in ModuleKind::all() {
            let length = if kind.is_terminal() { 2.0 } else { 4.0 };
            catalog.register(ModuleSpec::new(kind, length, 2.0));
        }
        catalog
    }

    /// Register a prototype, replacing any existing one for the same kind.
    pub fn register(&mut self, spec: ModuleSpec) {
        if let Some(existing) = self.specs.iter_mut().find(|s| s.kind == spec.kind) {
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
    }

    /// Look up the prototype for a kind.
    pub fn get(&self, kind: ModuleKind) -> Option<&ModuleSpec> {
        self.specs.iter().find(|s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Check that all five kinds are registered with positive dimensions.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut findings = Vec::new();
        for kind in ModuleKind::all() {
            match self.get(kind) {
                None => findings.push(ValidationError {
                    category: "catalog",
                    severity: Severity::Error,
                    message: format!("no prototype registered for {:?}", kind),
                }),
                Some(spec) => {
                    if spec.length <= 0.0 || spec.width <= 0.0 {
                        findings.push(ValidationError {
                            category: "catalog",
                            severity: Severity::Error,
                            message: format!(
                                "{:?} has non-positive dimensions: {}×{}",
                                kind, spec.length, spec.width
                            ),
                        });
                    }
                    if spec.width > spec.length * 4.0 {
                        findings.push(ValidationError {
                            category: "catalog",
                            severity: Severity::Warning,
                            message: format!(
                                "{:?} is much wider than long ({}×{})",
                                kind, spec.length, spec.width
                            ),
                        });
                    }
                }
            }
        }
        findings
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
