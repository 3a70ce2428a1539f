//! Step definitions for Cucumber tests
//!
//! - `targets` - mock targets, request flags and running the comparison
//! - `report` - outcome, report text, JSON and body artifacts

pub mod report;
pub mod targets;
