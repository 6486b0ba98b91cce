//! Concurrent fan-out of independent query branches.
//!
//! Each branch runs on its own scoped thread. Results come back over a
//! channel and land in a per-branch slot, so the aggregate is only read once
//! every branch has finished. The first real failure, a caught panic
//! included, cancels the siblings and is the error the caller sees.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use log::warn;

use super::{EngineError, EngineResult};
use crate::cancel::CancelToken;
use crate::db::{QueryCategory, StoreResult};
use crate::models::DrugInteraction;

type BranchWork<'a> = Box<dyn FnOnce(&CancelToken) -> StoreResult<Vec<DrugInteraction>> + Send + 'a>;

/// One independent unit of query work.
pub(crate) struct Branch<'a> {
    category: QueryCategory,
    work: BranchWork<'a>,
}

impl<'a> Branch<'a> {
    pub(crate) fn new<F>(category: QueryCategory, work: F) -> Self
    where
        F: FnOnce(&CancelToken) -> StoreResult<Vec<DrugInteraction>> + Send + 'a,
    {
        Self {
            category,
            work: Box::new(work),
        }
    }
}

/// Run all branches concurrently and concatenate their results in branch
/// order. Fails with a single error if any branch fails.
///
/// A failing or panicking branch cancels a per-call child of `cancel`, so
/// siblings stop early while the caller's token stays usable.
pub(crate) fn run_all(
    branches: Vec<Branch<'_>>,
    cancel: &CancelToken,
) -> EngineResult<Vec<DrugInteraction>> {
    let call = cancel.child();
    let mut slots: Vec<Option<Vec<DrugInteraction>>> = vec![None; branches.len()];
    let mut failure: Option<EngineError> = None;

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();

        for (index, branch) in branches.into_iter().enumerate() {
            let tx = tx.clone();
            let call = call.clone();
            scope.spawn(move || {
                let Branch { category, work } = branch;
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(&call))) {
                    Ok(result) => result.map_err(EngineError::from),
                    Err(_) => Err(EngineError::WorkerPanicked(category)),
                };
                if outcome.is_err() {
                    call.cancel();
                }
                // The receiver outlives every sender inside the scope.
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        for (index, outcome) in rx {
            match outcome {
                Ok(found) => slots[index] = Some(found),
                Err(err) => record_failure(&mut failure, err),
            }
        }
    });

    if let Some(err) = failure {
        warn!("event=fanout module=engine status=failed error={}", err);
        return Err(err);
    }
    Ok(slots.into_iter().flatten().flatten().collect())
}

/// Keep the first error, unless it is only a cancellation echo of a real
/// failure that arrived later.
fn record_failure(slot: &mut Option<EngineError>, err: EngineError) {
    let replace = match slot {
        None => true,
        Some(existing) => existing.is_cancellation() && !err.is_cancellation(),
    };
    if replace {
        *slot = Some(err);
    }
}
