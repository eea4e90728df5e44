//! Series categorization.
//!
//! - `table`: the ordered name -> category table (built-in or JSON file)
//! - `Categorizer`: trimmed exact-match lookup with an `Uncategorized` fallback

pub mod table;

pub use table::*;

use tracing::warn;

use crate::domain::{Diagnostic, DiagnosticKind, UNCATEGORIZED};

/// Result of classifying one series name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Matched(String),
    /// Name not found; carries the trimmed name for triage.
    Unmatched(String),
}

impl Classification {
    pub fn category(&self) -> &str {
        match self {
            Classification::Matched(category) => category,
            Classification::Unmatched(_) => UNCATEGORIZED,
        }
    }

    /// Data-quality event for an unmatched name.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Classification::Matched(_) => None,
            Classification::Unmatched(name) => Some(Diagnostic::new(
                DiagnosticKind::UnmatchedCategory,
                name.clone(),
                format!("no category lists '{name}'; assigned {UNCATEGORIZED}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    table: CategoryTable,
}

impl Categorizer {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// Classify a series name. Unmatched names are logged, never an error.
    pub fn classify(&self, name: &str) -> Classification {
        let cleaned = name.trim();
        match self.table.lookup(cleaned) {
            Some(category) => Classification::Matched(category.to_string()),
            None => {
                warn!(series = cleaned, "unmatched series name");
                Classification::Unmatched(cleaned.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_before_matching() {
        let categorizer = Categorizer::default();
        let c = categorizer.classify(" Cement ");
        assert_eq!(c, Classification::Matched("Concrete".to_string()));
        assert_eq!(c.category(), "Concrete");
        assert!(c.diagnostic().is_none());
    }

    #[test]
    fn unlisted_names_fall_back_with_one_diagnostic() {
        let categorizer = Categorizer::default();
        let c = categorizer.classify("Unobtanium Futures");
        assert_eq!(c.category(), UNCATEGORIZED);
        let diag = c.diagnostic().unwrap();
        assert_eq!(diag.kind, DiagnosticKind::UnmatchedCategory);
        assert_eq!(diag.subject, "Unobtanium Futures");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let categorizer = Categorizer::default();
        assert_eq!(categorizer.classify("CEMENT").category(), UNCATEGORIZED);
    }
}
