use crate::response::TargetIndex;
use std::path::PathBuf;

/// Problems with operator input. Reported before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Bad header {0}")]
    BadHeader(String),

    #[error("Bad header {line} at {}:{line_no}", .path.display())]
    BadHeaderInFile {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    #[error("Invalid header name '{0}'")]
    InvalidHeaderName(String),

    #[error("Invalid value for header '{0}'")]
    InvalidHeaderValue(String),

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Must specify two URLs to test (got {0})")]
    WrongTargetCount(usize),

    #[error("Error reading file {}: {source}", .path.display())]
    HeaderFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading profile from {path}: {message}")]
    Profile { path: String, message: String },
}

/// A fetch against one target that could not produce a response record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Error doing {method} {url}: {message}")]
pub struct TransportError {
    pub target: TargetIndex,
    pub method: String,
    pub url: String,
    pub message: String,
}

impl TransportError {
    /// Build from any error, flattening its `source()` chain into the message
    pub fn from_error(
        target: TargetIndex,
        method: &str,
        url: &str,
        err: &(dyn std::error::Error + 'static),
    ) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        Self {
            target,
            method: method.to_string(),
            url: url.to_string(),
            message,
        }
    }
}

/// One or both sides of a dispatch failed. Failures are kept in index order
/// and displayed one per line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
pub struct DispatchError {
    pub failures: Vec<TransportError>,
}

impl DispatchError {
    /// Targets that failed
    pub fn failed_targets(&self) -> Vec<TargetIndex> {
        self.failures.iter().map(|f| f.target).collect()
    }
}

/// Failure while exporting body artifacts. Never invalidates the diff itself.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Error making temporary file: {0}")]
    Create(#[source] std::io::Error),

    #[error("Error writing temporary file: {0}")]
    Write(#[source] std::io::Error),

    #[error("Diff program ended with: {0}")]
    DiffApp(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn transport_error_should_flatten_source_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::from_error(
            TargetIndex::First,
            "GET",
            "http://a",
            &Outer(inner),
        );

        assert_eq!(err.message, "outer: refused");
        assert_eq!(err.to_string(), "Error doing GET http://a: outer: refused");
    }

    #[test]
    fn dispatch_error_should_list_every_failure() {
        let failure = |target, url: &str| TransportError {
            target,
            method: "GET".to_string(),
            url: url.to_string(),
            message: "boom".to_string(),
        };
        let err = DispatchError {
            failures: vec![
                failure(TargetIndex::First, "http://a"),
                failure(TargetIndex::Second, "http://b"),
            ],
        };

        assert_eq!(
            err.failed_targets(),
            vec![TargetIndex::First, TargetIndex::Second]
        );
        assert_eq!(
            err.to_string(),
            "Error doing GET http://a: boom\nError doing GET http://b: boom"
        );
    }
}
