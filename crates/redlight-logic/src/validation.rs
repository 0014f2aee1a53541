//! Shared validation-error records.
//!
//! Configuration sweeps (manifest, catalog, director config) return plain
//! error lists instead of failing on the first problem, so a designer sees
//! everything wrong with a module set or tuning block in one pass.

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// True if any finding in the list is a hard error.
pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_alone_are_not_errors() {
        let findings = vec![ValidationError {
            category: "test",
            severity: Severity::Warning,
            message: "just a warning".to_string(),
        }];
        assert!(!has_errors(&findings));
    }

    #[test]
    fn error_detected() {
        let findings = vec![
            ValidationError {
                category: "test",
                severity: Severity::Warning,
                message: "warning".to_string(),
            },
            ValidationError {
                category: "test",
                severity: Severity::Error,
                message: "error".to_string(),
            },
        ];
        assert!(has_errors(&findings));
    }
}
