//! settings for the pass loop of [`CellGrid::query_with`](crate::CellGrid::query_with)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How the pass loop reacts to a cell kind whose responder returned false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// finish visiting every cell kind in the pass, then stop before the next pass
    #[default]
    AbortAfterPass,
    /// stop at the first failure
    AbortImmediately,
    /// run every pass and `finalize`, then report all failures
    Continue,
}

/// How the pass loop folds a cell kind that has no responder at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotApplicablePolicy {
    /// the cell kind contributes nothing; the query goes on
    #[default]
    Skip,
    /// treat the missing responder like a failed responder
    Fail,
}

/// Cooperative cancellation flag, checked before every pass and every cell kind.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// hard ceiling on the number of passes a single query may run
    pub max_passes: usize,
    pub failure_policy: FailurePolicy,
    pub not_applicable: NotApplicablePolicy,
    pub cancel: Option<CancelToken>,
}

impl QueryConfig {
    pub const DEFAULT_MAX_PASSES: usize = 64;

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_not_applicable(mut self, policy: NotApplicablePolicy) -> Self {
        self.not_applicable = policy;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(CancelToken::is_cancelled).unwrap_or(false)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_passes: Self::DEFAULT_MAX_PASSES,
            failure_policy: FailurePolicy::default(),
            not_applicable: NotApplicablePolicy::default(),
            cancel: None,
        }
    }
}
