//! # httpdiff - Compare Two HTTP Endpoints
//!
//! Sends the same request to two URLs at the same time and reports how the
//! responses differ: status code, headers and body.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐   Settings   ┌────────────┐  ResponsePair  ┌────────┐  Findings  ┌──────────┐
//! │ cmd_args │─────────────►│ Dispatcher │───────────────►│  diff  │───────────►│  report  │
//! │ config   │              │ (2 tasks)  │                │ (pure) │            │ artifacts│
//! └──────────┘              └────────────┘                └────────┘            └──────────┘
//! ```
//!
//! The result of a run is a [`ComparisonOutcome`], which maps to the process
//! exit code.

pub mod ansi;
pub mod artifacts;
pub mod cmd_args;
pub mod comparison;
pub mod config;
pub mod controller;
pub mod diff;
pub mod dispatcher;
pub mod errors;
pub mod executor;
pub mod headers;
pub mod outcome;
pub mod report;
pub mod request;
pub mod response;

// Re-export main types for easy access
pub use comparison::{compare, Comparison};
pub use config::Settings;
pub use controller::AppController;
pub use diff::{diff, DiffFinding};
pub use dispatcher::Dispatcher;
pub use errors::{ArtifactError, ConfigError, DispatchError, TransportError};
pub use executor::{RequestExecutor, TransportConfig};
pub use headers::{ExclusionSet, HeaderMultiMap};
pub use outcome::ComparisonOutcome;
pub use request::{RequestSpec, Targets};
pub use response::{ResponsePair, ResponseRecord, TargetIndex};
