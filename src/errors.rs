//! Engine error taxonomy
//!
//! Expected domain outcomes (already up to date, nothing to commit, no
//! conflicts) are returned as successful results with descriptive reports;
//! only genuinely unrecoverable or user-actionable conditions surface here.
//! Store collaborator failures are always wrapped with the high-level
//! operation's context before reaching the caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("project '{0}' is not a repository")]
    NotARepository(String),

    #[error("no such ref '{name}'; known branches: {}", format_known(known))]
    RefNotFound { name: String, known: Vec<String> },

    #[error("working copy has uncommitted changes; commit or stash them first")]
    DirtyWorkingCopy,

    #[error("HEAD is detached; create or switch to a branch first")]
    DetachedHead,

    #[error("no merge in progress")]
    NoMergeInProgress,

    #[error("{op} failed for '{subject}'")]
    Store {
        op: &'static str,
        subject: String,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Wrap a store collaborator failure with the operation name and the
    /// ref/path it concerned.
    pub fn store(op: &'static str, subject: impl Into<String>, source: anyhow::Error) -> Self {
        EngineError::Store {
            op,
            subject: subject.into(),
            source,
        }
    }
}

fn format_known(known: &[String]) -> String {
    if known.is_empty() {
        "(none)".to_string()
    } else {
        known.join(", ")
    }
}
