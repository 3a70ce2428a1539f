//! # Response Differ
//!
//! Pure comparison of two [`ResponseRecord`]s. Findings always come out in the
//! same order: status, shared headers, headers unique to a side, then body.
//! Header names are visited in canonical sorted order, so identical inputs
//! always produce an identical finding list.

use crate::headers::ExclusionSet;
use crate::response::{ResponseRecord, TargetIndex};
use serde::Serialize;

/// One structural discrepancy between the two responses.
///
/// `a` always refers to the first target and `b` to the second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffFinding {
    StatusMismatch {
        a: u16,
        b: u16,
    },
    /// Same header on both sides, different number of values
    HeaderCountMismatch {
        name: String,
        a: usize,
        b: usize,
    },
    /// Same header and value count, different value at `position`
    HeaderValueMismatch {
        name: String,
        position: usize,
        a: String,
        b: String,
    },
    /// Every non-excluded header present only on `side`
    HeaderUniqueToSide {
        side: TargetIndex,
        names: Vec<String>,
    },
    BodyLengthMismatch {
        a: usize,
        b: usize,
    },
    /// Equal lengths, different bytes
    BodyContentMismatch,
}

impl DiffFinding {
    /// Whether this finding concerns the response body
    pub fn is_body(&self) -> bool {
        matches!(
            self,
            DiffFinding::BodyLengthMismatch { .. } | DiffFinding::BodyContentMismatch
        )
    }
}

/// Compare two records, skipping any header named in `exclusions`.
pub fn diff(
    a: &ResponseRecord,
    b: &ResponseRecord,
    exclusions: &ExclusionSet,
) -> Vec<DiffFinding> {
    let mut findings = Vec::new();

    if a.status != b.status {
        findings.push(DiffFinding::StatusMismatch {
            a: a.status,
            b: b.status,
        });
    }

    diff_shared_headers(a, b, exclusions, &mut findings);

    for (side, this, other) in [(TargetIndex::First, a, b), (TargetIndex::Second, b, a)] {
        let names: Vec<String> = this
            .headers
            .names()
            .filter(|name| !exclusions.contains(name) && !other.headers.contains(name))
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            findings.push(DiffFinding::HeaderUniqueToSide { side, names });
        }
    }

    if let Some(finding) = diff_bodies(&a.body, &b.body) {
        findings.push(finding);
    }

    tracing::debug!("Differ produced {} findings", findings.len());
    findings
}

/// Count and positional value checks for headers present on both sides.
/// A count mismatch suppresses value checks for that header.
fn diff_shared_headers(
    a: &ResponseRecord,
    b: &ResponseRecord,
    exclusions: &ExclusionSet,
    findings: &mut Vec<DiffFinding>,
) {
    for (name, values_a) in &a.headers {
        if exclusions.contains(name) {
            continue;
        }
        let Some(values_b) = b.headers.get(name) else {
            continue;
        };

        if values_a.len() != values_b.len() {
            findings.push(DiffFinding::HeaderCountMismatch {
                name: name.clone(),
                a: values_a.len(),
                b: values_b.len(),
            });
            continue;
        }

        for (position, (va, vb)) in values_a.iter().zip(values_b).enumerate() {
            if va != vb {
                findings.push(DiffFinding::HeaderValueMismatch {
                    name: name.clone(),
                    position,
                    a: va.clone(),
                    b: vb.clone(),
                });
            }
        }
    }
}

fn diff_bodies(a: &[u8], b: &[u8]) -> Option<DiffFinding> {
    if a.len() != b.len() {
        Some(DiffFinding::BodyLengthMismatch {
            a: a.len(),
            b: b.len(),
        })
    } else if a != b {
        Some(DiffFinding::BodyContentMismatch)
    } else {
        None
    }
}
