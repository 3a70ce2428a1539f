//! # Dispatcher
//!
//! Runs the same request against both targets in parallel and waits for both
//! to finish before anything is inspected. Each task writes only its own
//! result, so the join is the only synchronisation needed.

use crate::errors::{DispatchError, TransportError};
use crate::executor::RequestExecutor;
use crate::request::{RequestSpec, Targets};
use crate::response::{ResponsePair, ResponseRecord, TargetIndex};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

type FetchResult = Result<ResponseRecord, TransportError>;

/// Fans one [`RequestSpec`] out to two targets
#[derive(Debug, Clone)]
pub struct Dispatcher {
    executor: RequestExecutor,
}

impl Dispatcher {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Fetch both targets and join.
    ///
    /// There is no early exit: if both sides fail, both failures are returned
    /// together, first target first.
    pub async fn run(
        &self,
        spec: &RequestSpec,
        targets: &Targets,
    ) -> Result<ResponsePair, DispatchError> {
        let spec = Arc::new(spec.clone());

        tracing::info!(
            "Dispatching {} to {} and {}",
            spec.method(),
            targets.get(TargetIndex::First),
            targets.get(TargetIndex::Second)
        );

        let first = self.spawn(&spec, TargetIndex::First, targets);
        let second = self.spawn(&spec, TargetIndex::Second, targets);
        let (first, second) = tokio::join!(first, second);

        let first = flatten(first, &spec, TargetIndex::First, targets);
        let second = flatten(second, &spec, TargetIndex::Second, targets);
        tracing::info!(
            "Both fetches finished (first ok: {}, second ok: {})",
            first.is_ok(),
            second.is_ok()
        );

        match (first, second) {
            (Ok(first), Ok(second)) => Ok(ResponsePair::new(first, second)),
            (first, second) => Err(DispatchError {
                failures: [first.err(), second.err()].into_iter().flatten().collect(),
            }),
        }
    }

    fn spawn(
        &self,
        spec: &Arc<RequestSpec>,
        target: TargetIndex,
        targets: &Targets,
    ) -> JoinHandle<FetchResult> {
        let executor = self.executor.clone();
        let spec = Arc::clone(spec);
        let url = targets.get(target).to_string();
        tokio::spawn(async move { executor.execute(&spec, target, &url).await })
    }
}

/// A task that panicked or was cancelled counts as a transport failure for its side
fn flatten(
    joined: Result<FetchResult, JoinError>,
    spec: &RequestSpec,
    target: TargetIndex,
    targets: &Targets,
) -> FetchResult {
    joined.unwrap_or_else(|e| {
        Err(TransportError::from_error(
            target,
            spec.method().as_str(),
            targets.get(target),
            &e,
        ))
    })
}
