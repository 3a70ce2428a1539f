//! # Report Rendering
//!
//! Turns findings into text for a terminal. Values belonging to the first
//! target are red, the second blue, and the header or method being talked
//! about green. In mono mode colours are replaced by `1:`/`2:` prefixes and
//! quotes. A JSON rendering of the same information is also available.

use crate::ansi::{paint, FG_BLUE, FG_GREEN, FG_RED};
use crate::artifacts::{BodyArtifact, DiffAppOutput};
use crate::diff::DiffFinding;
use crate::errors::{ArtifactError, DispatchError};
use crate::outcome::ComparisonOutcome;
use crate::request::{RequestSpec, Targets};
use crate::response::TargetIndex;
use serde::Serialize;
use std::io::{self, Write};

/// Writes the human-readable report
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    mono: bool,
}

impl ReportRenderer {
    pub fn new(mono: bool) -> Self {
        Self { mono }
    }

    /// A value tagged with the side it came from
    fn side(&self, target: TargetIndex, text: &str) -> String {
        if self.mono {
            format!("{}: {}", target.as_usize() + 1, text)
        } else {
            let color = match target {
                TargetIndex::First => FG_RED,
                TargetIndex::Second => FG_BLUE,
            };
            paint(color, text)
        }
    }

    /// The name under discussion
    fn highlight(&self, text: &str) -> String {
        if self.mono {
            format!("'{text}'")
        } else {
            paint(FG_GREEN, text)
        }
    }

    fn write_pair<W: Write>(
        &self,
        out: &mut W,
        title: &str,
        a: &str,
        b: &str,
    ) -> io::Result<()> {
        writeln!(out, "{title}")?;
        writeln!(out, "    {}", self.side(TargetIndex::First, a))?;
        writeln!(out, "    {}", self.side(TargetIndex::Second, b))
    }

    /// `Set Host to ...; Doing GET:` followed by both targets
    pub fn render_preamble<W: Write>(
        &self,
        out: &mut W,
        spec: &RequestSpec,
        targets: &Targets,
    ) -> io::Result<()> {
        if let Some(host) = spec.host() {
            write!(out, "Set Host to {}; ", self.highlight(host))?;
        }
        let title = format!("Doing {}:", self.highlight(spec.method().as_str()));
        self.write_pair(
            out,
            &title,
            targets.get(TargetIndex::First),
            targets.get(TargetIndex::Second),
        )
    }

    pub fn render_findings<W: Write>(
        &self,
        out: &mut W,
        findings: &[DiffFinding],
    ) -> io::Result<()> {
        let mut unique_title_written = false;

        for finding in findings {
            match finding {
                DiffFinding::StatusMismatch { a, b } => self.write_pair(
                    out,
                    "Different status code:",
                    &a.to_string(),
                    &b.to_string(),
                )?,
                DiffFinding::HeaderCountMismatch { name, a, b } => self.write_pair(
                    out,
                    &format!("Different number of {} headers:", self.highlight(name)),
                    &a.to_string(),
                    &b.to_string(),
                )?,
                DiffFinding::HeaderValueMismatch { name, a, b, .. } => self.write_pair(
                    out,
                    &format!("{} header different:", self.highlight(name)),
                    a,
                    b,
                )?,
                DiffFinding::HeaderUniqueToSide { side, names } => {
                    if !unique_title_written {
                        writeln!(out, "Unique headers")?;
                        unique_title_written = true;
                    }
                    writeln!(out, "    {}", self.side(*side, &names.join(" ")))?;
                }
                DiffFinding::BodyLengthMismatch { a, b } => self.write_pair(
                    out,
                    "Body lengths differ:",
                    &a.to_string(),
                    &b.to_string(),
                )?,
                DiffFinding::BodyContentMismatch => writeln!(out, "Bodies are different")?,
            }
        }
        Ok(())
    }

    /// One `Error doing METHOD URL: message` line per failed target
    pub fn render_dispatch_error<W: Write>(
        &self,
        out: &mut W,
        err: &DispatchError,
    ) -> io::Result<()> {
        for failure in &err.failures {
            writeln!(
                out,
                "Error doing {} {}: {}",
                failure.method,
                self.side(failure.target, &failure.url),
                failure.message
            )?;
        }
        Ok(())
    }

    pub fn render_artifacts<W: Write>(
        &self,
        out: &mut W,
        artifacts: &[BodyArtifact],
    ) -> io::Result<()> {
        for artifact in artifacts {
            writeln!(
                out,
                "    Wrote body of {} to {}",
                self.side(artifact.target, &artifact.url),
                self.side(artifact.target, &artifact.path.display().to_string())
            )?;
        }
        Ok(())
    }

    pub fn render_artifact_error<W: Write>(
        &self,
        out: &mut W,
        err: &ArtifactError,
    ) -> io::Result<()> {
        writeln!(out, "{err}")
    }

    pub fn render_diff_app<W: Write>(
        &self,
        out: &mut W,
        output: &DiffAppOutput,
    ) -> io::Result<()> {
        if !output.status.success() {
            writeln!(out, "Diff program ended with: {}", output.status)?;
        }
        writeln!(out, "{}", output.stdout)
    }
}

/// Everything the JSON report contains
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub method: &'a str,
    pub targets: &'a [String; 2],
    pub outcome: &'static str,
    pub findings: &'a [DiffFinding],
    pub errors: Vec<String>,
    pub artifacts: &'a [BodyArtifact],
}

impl<'a> JsonReport<'a> {
    pub fn new(
        spec: &'a RequestSpec,
        targets: &'a Targets,
        outcome: &ComparisonOutcome,
    ) -> Self {
        Self {
            method: spec.method().as_str(),
            targets: targets.as_array(),
            outcome: outcome.label(),
            findings: &[],
            errors: Vec::new(),
            artifacts: &[],
        }
    }

    pub fn write<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
