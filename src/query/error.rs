use crate::prelude::*;

use std::fmt;

#[derive(Debug, thiserror::Error, From)]
pub enum QueryError {
    #[error("{0}")]
    Initialize(InitializeFailed),
    #[error("{0}")]
    Responders(PassFailures),
    #[error("{0}")]
    MaxPasses(MaxPasses),
    #[error("{0}")]
    Cancelled(Cancelled),
    #[error("{0}")]
    Finalize(FinalizeFailed),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "query `{query}` failed to initialize")]
pub struct InitializeFailed {
    pub query: TypeKey,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "query `{query}` failed to finalize")]
pub struct FinalizeFailed {
    pub query: TypeKey,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "query `{query}` still requested another pass after the limit of {max_passes} passes"
)]
pub struct MaxPasses {
    pub query: TypeKey,
    pub max_passes: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "query `{query}` was cancelled before pass {pass}")]
pub struct Cancelled {
    pub query: TypeKey,
    pub pass: usize,
}

/// Every cell kind that did not respond successfully, grouped by pass.
#[derive(Debug, Constructor)]
pub struct PassFailures {
    pub query: TypeKey,
    /// `(pass, cell kind, why)`
    pub failures: Vec<(usize, TypeKey, FailureKind)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// the responder ran and returned false
    Responder,
    /// no responder was registered and the policy treats that as a failure
    NotApplicable,
    /// the cell or the query has an invalid type key
    Invalid,
}

impl PassFailures {
    pub fn cell_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.failures.iter().map(|(_, key, _)| *key)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Responder => write!(f, "responder failed"),
            FailureKind::NotApplicable => write!(f, "no responder"),
            FailureKind::Invalid => write!(f, "invalid type key"),
        }
    }
}

impl fmt::Display for PassFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query `{}` failed for", self.query)?;
        for (pass, cell, kind) in &self.failures {
            write!(f, " [pass {pass}: {cell} ({kind})]")?;
        }
        Ok(())
    }
}
