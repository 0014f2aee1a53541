//! Module-set manifest — the data-driven description of a corridor tileset.
//!
//! A manifest is the JSON record the host loads at scene start to populate
//! the module catalog: one entry per prototype with its layout token and
//! dimensions. Validation is a batch sweep so a broken tileset reports
//! every problem at once.

use serde::{Deserialize, Serialize};

use crate::catalog::ModuleCatalog;
use crate::modules::{ModuleKind, ModuleSpec};
use crate::validation::{Severity, ValidationError};

/// One prototype entry in a module manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Display name of the prefab this entry describes.
    pub name: String,
    /// Layout token (`F`, `L`, `R`, `D`, `X`).
    pub token: char,
    /// Extent along the direction of travel, meters.
    pub length: f32,
    /// Floor width, meters.
    pub width: f32,
}

/// A full module-set manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub tileset: String,
    pub modules: Vec<ManifestEntry>,
}

impl ModuleManifest {
    /// Batch-validate the manifest: token resolution, duplicates, missing
    /// kinds, and dimension sanity.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut findings = Vec::new();

        for entry in &self.modules {
            if entry.token == 'E' {
                findings.push(ValidationError {
                    category: "manifest",
                    severity: Severity::Error,
                    message: format!(
                        "'{}' uses reserved terminator token 'E'",
                        entry.name
                    ),
                });
                continue;
            }
            if ModuleKind::from_token(entry.token).is_none() {
                findings.push(ValidationError {
                    category: "manifest",
                    severity: Severity::Error,
                    message: format!(
                        "'{}' has unrecognized token '{}'",
                        entry.name, entry.token
                    ),
                });
            }
            if entry.length <= 0.0 || entry.width <= 0.0 {
                findings.push(ValidationError {
                    category: "manifest",
                    severity: Severity::Error,
                    message: format!(
                        "'{}' has non-positive dimensions: {}×{}",
                        entry.name, entry.length, entry.width
                    ),
                });
            }
        }

        // Duplicate tokens — later entries would silently shadow earlier.
        for (i, a) in self.modules.iter().enumerate() {
            if self.modules[..i].iter().any(|b| b.token == a.token) {
                findings.push(ValidationError {
                    category: "manifest",
                    severity: Severity::Error,
                    message: format!("duplicate token '{}' ('{}')", a.token, a.name),
                });
            }
        }

        // Every kind must be present for arbitrary layouts to assemble.
        for kind in ModuleKind::all() {
            if !self.modules.iter().any(|e| e.token == kind.token()) {
                findings.push(ValidationError {
                    category: "manifest",
                    severity: Severity::Error,
                    message: format!("no entry for {:?} (token '{}')", kind, kind.token()),
                });
            }
        }

        findings
    }

    /// Build a catalog from the entries whose tokens resolve.
    ///
    /// Call `validate()` first; this conversion does not re-check and will
    /// simply skip unresolvable entries.
    pub fn to_catalog(&self) -> ModuleCatalog {
        let mut catalog = ModuleCatalog::empty();
        for entry in &self.modules {
            if let Some(kind) = ModuleKind::from_token(entry.token) {
                catalog.register(ModuleSpec::new(kind, entry.length, entry.width));
            }
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::has_errors;

    fn good_manifest() -> ModuleManifest {
        ModuleManifest {
            tileset: "test".to_string(),
            modules: vec![
                entry("corridor_straight", 'F', 4.0, 2.0),
                entry("corridor_turn_left", 'L', 4.0, 2.0),
                entry("corridor_turn_right", 'R', 4.0, 2.0),
                entry("corridor_doorway", 'D', 3.0, 2.0),
                entry("corridor_dead_end", 'X', 2.0, 2.0),
            ],
        }
    }

    fn entry(name: &str, token: char, length: f32, width: f32) -> ManifestEntry {
        ManifestEntry {
            name: name.to_string(),
            token,
            length,
            width,
        }
    }

    #[test]
    fn good_manifest_validates_clean() {
        assert!(good_manifest().validate().is_empty());
    }

    #[test]
    fn missing_kind_flagged() {
        let mut manifest = good_manifest();
        manifest.modules.retain(|e| e.token != 'X');
        let findings = manifest.validate();
        assert!(has_errors(&findings));
        assert!(findings.iter().any(|f| f.message.contains("DeadEnd")));
    }

    #[test]
    fn duplicate_token_flagged() {
        let mut manifest = good_manifest();
        manifest
            .modules
            .push(entry("corridor_straight_alt", 'F', 6.0, 2.0));
        let findings = manifest.validate();
        assert!(findings.iter().any(|f| f.message.contains("duplicate")));
    }

    #[test]
    fn reserved_terminator_token_flagged() {
        let mut manifest = good_manifest();
        manifest.modules[0].token = 'E';
        let findings = manifest.validate();
        assert!(has_errors(&findings));
        assert!(findings.iter().any(|f| f.message.contains("reserved")));
    }

    #[test]
    fn unknown_token_flagged() {
        let mut manifest = good_manifest();
        manifest.modules[0].token = 'Z';
        assert!(has_errors(&manifest.validate()));
    }

    #[test]
    fn non_positive_dimensions_flagged() {
        let mut manifest = good_manifest();
        manifest.modules[1].length = -1.0;
        assert!(has_errors(&manifest.validate()));
    }

    #[test]
    fn catalog_conversion_registers_all_kinds() {
        let catalog = good_manifest().to_catalog();
        assert!(catalog.validate().is_empty());
        assert_eq!(catalog.get(ModuleKind::Doorway).unwrap().length, 3.0);
    }
}
