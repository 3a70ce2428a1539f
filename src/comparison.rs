//! Dispatch followed by diff: the whole comparison without any presentation.

use crate::diff::{diff, DiffFinding};
use crate::dispatcher::Dispatcher;
use crate::errors::DispatchError;
use crate::headers::ExclusionSet;
use crate::outcome::ComparisonOutcome;
use crate::request::{RequestSpec, Targets};
use crate::response::ResponsePair;

/// Both responses and everything that differs between them
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub responses: ResponsePair,
    pub findings: Vec<DiffFinding>,
}

impl Comparison {
    /// Diff an already fetched pair
    pub fn from_responses(responses: ResponsePair, exclusions: &ExclusionSet) -> Self {
        let findings = diff(&responses.first, &responses.second, exclusions);
        Self {
            responses,
            findings,
        }
    }

    pub fn outcome(&self) -> ComparisonOutcome {
        ComparisonOutcome::from_findings(&self.findings)
    }

    /// Whether the bodies differ, which is when artifacts get written
    pub fn has_body_difference(&self) -> bool {
        self.findings.iter().any(DiffFinding::is_body)
    }
}

/// Fetch both targets and diff them. The differ only runs when both fetches
/// succeeded.
pub async fn compare(
    dispatcher: &Dispatcher,
    spec: &RequestSpec,
    targets: &Targets,
    exclusions: &ExclusionSet,
) -> Result<Comparison, DispatchError> {
    let responses = dispatcher.run(spec, targets).await?;
    Ok(Comparison::from_responses(responses, exclusions))
}
