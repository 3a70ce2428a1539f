use crate::diff::DiffFinding;

pub const EXIT_NO_DIFFERENCE: i32 = 0;
pub const EXIT_DIFFERENCES_FOUND: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

/// Result of a whole run, mapped one-to-one onto the process exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    NoDifference,
    DifferencesFound,
    /// Usage error or transport failure; nothing was compared
    Fatal(String),
}

impl ComparisonOutcome {
    pub fn from_findings(findings: &[DiffFinding]) -> Self {
        if findings.is_empty() {
            ComparisonOutcome::NoDifference
        } else {
            ComparisonOutcome::DifferencesFound
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ComparisonOutcome::NoDifference => EXIT_NO_DIFFERENCE,
            ComparisonOutcome::DifferencesFound => EXIT_DIFFERENCES_FOUND,
            ComparisonOutcome::Fatal(_) => EXIT_FATAL,
        }
    }

    /// Short machine-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ComparisonOutcome::NoDifference => "no_difference",
            ComparisonOutcome::DifferencesFound => "differences_found",
            ComparisonOutcome::Fatal(_) => "fatal",
        }
    }
}
