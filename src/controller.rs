//! # Application Controller
//!
//! Wires resolved settings to the dispatcher, differ, renderer and artifact
//! writer, and turns the run into a [`ComparisonOutcome`]. Output goes to any
//! `Write`, so the whole flow can run against an in-memory buffer.

use crate::artifacts::{run_diff_app, ArtifactWriter, BodyArtifact};
use crate::comparison::{compare, Comparison};
use crate::config::Settings;
use crate::dispatcher::Dispatcher;
use crate::errors::DispatchError;
use crate::executor::RequestExecutor;
use crate::outcome::ComparisonOutcome;
use crate::report::{JsonReport, ReportRenderer};
use anyhow::Result;
use std::io::Write;

/// Runs one comparison end to end
pub struct AppController {
    settings: Settings,
    dispatcher: Dispatcher,
    artifact_writer: ArtifactWriter,
    renderer: ReportRenderer,
}

impl AppController {
    pub fn new(settings: Settings) -> Result<Self> {
        let executor = RequestExecutor::new(&settings.transport)?;
        let renderer = ReportRenderer::new(settings.mono);
        Ok(Self {
            settings,
            dispatcher: Dispatcher::new(executor),
            artifact_writer: ArtifactWriter::new(),
            renderer,
        })
    }

    /// Write body artifacts somewhere other than the system temp dir
    pub fn with_artifact_writer(mut self, writer: ArtifactWriter) -> Self {
        self.artifact_writer = writer;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the comparison and write the report to `out`.
    ///
    /// Transport failures become `Fatal`. Artifact failures are reported but
    /// leave the outcome of the comparison unchanged. Only failures to write
    /// the report itself are returned as errors.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<ComparisonOutcome> {
        let Settings {
            spec,
            targets,
            exclusions,
            ..
        } = &self.settings;

        if !self.settings.json {
            self.renderer.render_preamble(out, spec, targets)?;
        }

        let comparison = match compare(&self.dispatcher, spec, targets, exclusions).await {
            Ok(comparison) => comparison,
            Err(err) => return self.report_failure(out, &err),
        };

        let outcome = comparison.outcome();
        tracing::info!(
            "Comparison finished with {} findings",
            comparison.findings.len()
        );

        if self.settings.json {
            let (artifacts, errors) = self.export_bodies(&comparison);
            let report = JsonReport {
                findings: &comparison.findings,
                errors,
                artifacts: &artifacts,
                ..JsonReport::new(spec, targets, &outcome)
            };
            report.write(out)?;
        } else {
            self.renderer.render_findings(out, &comparison.findings)?;
            self.render_bodies(out, &comparison).await?;
        }

        Ok(outcome)
    }

    fn report_failure<W: Write>(&self, out: &mut W, err: &DispatchError) -> Result<ComparisonOutcome> {
        let outcome = ComparisonOutcome::Fatal(err.to_string());
        if self.settings.json {
            let report = JsonReport {
                errors: err.failures.iter().map(|f| f.to_string()).collect(),
                ..JsonReport::new(&self.settings.spec, &self.settings.targets, &outcome)
            };
            report.write(out)?;
        } else {
            self.renderer.render_dispatch_error(out, err)?;
        }
        Ok(outcome)
    }

    /// Text mode: write artifacts, list them, then run the diff app if configured
    async fn render_bodies<W: Write>(&self, out: &mut W, comparison: &Comparison) -> Result<()> {
        if !comparison.has_body_difference() {
            return Ok(());
        }

        let artifacts = match self.artifact_writer.write_pair(&comparison.responses) {
            Ok(artifacts) => artifacts,
            Err(err) => {
                tracing::warn!("Body export failed: {}", err);
                self.renderer.render_artifact_error(out, &err)?;
                return Ok(());
            }
        };
        self.renderer.render_artifacts(out, &artifacts)?;

        if let Some(app) = &self.settings.diffapp {
            match run_diff_app(app, &artifacts[0].path, &artifacts[1].path).await {
                Ok(output) => self.renderer.render_diff_app(out, &output)?,
                Err(err) => {
                    tracing::warn!("Diff program failed: {}", err);
                    self.renderer.render_artifact_error(out, &err)?;
                }
            }
        }
        Ok(())
    }

    /// JSON mode: write artifacts and collect any failure messages. The diff
    /// program is never run here since its output would corrupt the document.
    fn export_bodies(&self, comparison: &Comparison) -> (Vec<BodyArtifact>, Vec<String>) {
        if !comparison.has_body_difference() {
            return (Vec::new(), Vec::new());
        }

        let mut errors = Vec::new();
        if let Some(app) = &self.settings.diffapp {
            tracing::warn!("Not running diff program {} with --json", app);
            errors.push(format!("Diff program '{app}' not run in JSON mode"));
        }

        match self.artifact_writer.write_pair(&comparison.responses) {
            Ok(artifacts) => (artifacts, errors),
            Err(err) => {
                tracing::warn!("Body export failed: {}", err);
                errors.push(err.to_string());
                (Vec::new(), errors)
            }
        }
    }
}
