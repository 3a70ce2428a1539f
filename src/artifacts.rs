//! # Body Artifacts
//!
//! When bodies differ, each one is written to a file named after the SHA-256
//! digest of its content, so a caller (or an external diff tool) can inspect
//! where they differ. Writing the same body twice lands on the same file.

use crate::errors::ArtifactError;
use crate::response::{ResponsePair, ResponseRecord, TargetIndex};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Hex digits of the digest used in file names
const DIGEST_PREFIX_LEN: usize = 16;

/// A body persisted to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyArtifact {
    pub target: TargetIndex,
    pub url: String,
    pub path: PathBuf,
    /// Full lowercase hex SHA-256 of the body
    pub digest: String,
    pub len: usize,
}

/// Lowercase hex SHA-256 of `body`
pub fn body_digest(body: &[u8]) -> String {
    format!("{:x}", Sha256::digest(body))
}

/// Writes response bodies into a directory, the system temp dir by default
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl Default for ArtifactWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactWriter {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one body. The file is written under a temporary name and then
    /// renamed, so a reader never sees a partially written artifact.
    pub fn write(&self, record: &ResponseRecord) -> Result<BodyArtifact, ArtifactError> {
        let digest = body_digest(&record.body);
        let path = self
            .dir
            .join(format!("httpdiff-{}.body", &digest[..DIGEST_PREFIX_LEN]));

        let mut file = tempfile::Builder::new()
            .prefix(".httpdiff-")
            .tempfile_in(&self.dir)
            .map_err(ArtifactError::Create)?;
        file.write_all(&record.body).map_err(ArtifactError::Write)?;
        file.persist(&path).map_err(|e| ArtifactError::Write(e.error))?;

        tracing::debug!(
            "[{}] wrote {} bytes to {}",
            record.target,
            record.body.len(),
            path.display()
        );
        Ok(BodyArtifact {
            target: record.target,
            url: record.url.clone(),
            path,
            digest,
            len: record.body.len(),
        })
    }

    /// Persist both bodies, first target first
    pub fn write_pair(
        &self,
        responses: &ResponsePair,
    ) -> Result<Vec<BodyArtifact>, ArtifactError> {
        TargetIndex::BOTH
            .iter()
            .map(|target| self.write(responses.get(*target)))
            .collect()
    }
}

/// What the external diff program printed and how it exited
#[derive(Debug, Clone)]
pub struct DiffAppOutput {
    pub stdout: String,
    pub status: ExitStatus,
}

/// Run `app FIRST SECOND` and capture its output. A non-zero exit is not an
/// error here; most diff tools exit 1 when their inputs differ.
pub async fn run_diff_app(
    app: &str,
    first: &Path,
    second: &Path,
) -> Result<DiffAppOutput, ArtifactError> {
    tracing::debug!("Running {} {} {}", app, first.display(), second.display());

    let output = tokio::process::Command::new(app)
        .arg(first)
        .arg(second)
        .output()
        .await
        .map_err(|e| ArtifactError::DiffApp(e.to_string()))?;

    Ok(DiffAppOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        status: output.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderMultiMap;

    fn record(target: TargetIndex, body: &'static str) -> ResponseRecord {
        ResponseRecord::new(
            target,
            format!("http://{target}.test/"),
            200,
            HeaderMultiMap::new(),
            body,
        )
    }

    #[test]
    fn body_digest_should_be_sha256_hex() {
        assert_eq!(
            body_digest(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn write_should_name_file_after_content() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::in_dir(dir.path());

        let artifact = writer.write(&record(TargetIndex::First, "hello")).unwrap();

        assert_eq!(
            artifact.path,
            dir.path().join("httpdiff-2cf24dba5fb0a30e.body")
        );
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"hello");
        assert_eq!(artifact.len, 5);
        assert_eq!(artifact.url, "http://0.test/");
    }

    #[test]
    fn write_should_reuse_path_for_identical_bodies() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::in_dir(dir.path());

        let first = writer.write(&record(TargetIndex::First, "same")).unwrap();
        let second = writer.write(&record(TargetIndex::Second, "same")).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_pair_should_keep_target_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::in_dir(dir.path());
        let pair = ResponsePair::new(
            record(TargetIndex::First, "left"),
            record(TargetIndex::Second, "right"),
        );

        let artifacts = writer.write_pair(&pair).unwrap();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].target, TargetIndex::First);
        assert_eq!(std::fs::read(&artifacts[1].path).unwrap(), b"right");
    }

    #[test]
    fn write_should_fail_for_missing_directory() {
        let writer = ArtifactWriter::in_dir("/nonexistent/httpdiff/artifacts");
        let result = writer.write(&record(TargetIndex::First, "x"));
        assert!(matches!(result, Err(ArtifactError::Create(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_diff_app_should_capture_stdout_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::in_dir(dir.path());
        let pair = ResponsePair::new(
            record(TargetIndex::First, "a\n"),
            record(TargetIndex::Second, "b\n"),
        );
        let artifacts = writer.write_pair(&pair).unwrap();

        let output = run_diff_app("cat", &artifacts[0].path, &artifacts[1].path)
            .await
            .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout, "a\nb\n");
    }

    #[tokio::test]
    async fn run_diff_app_should_report_missing_program() {
        let result = run_diff_app(
            "httpdiff-no-such-diff-program",
            Path::new("a"),
            Path::new("b"),
        )
        .await;
        assert!(matches!(result, Err(ArtifactError::DiffApp(_))));
    }
}
