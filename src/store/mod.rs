//! External collaborator contracts
//!
//! The engine is built on top of three collaborators it does not implement:
//!
//! - [`ObjectStore`]: content-addressed storage of commits, trees and blobs,
//!   plus the primitives the porcelain layer interprets (ref resolution,
//!   tree walking, the three-way status matrix, merge-base queries and the
//!   low-level merge itself)
//! - [`WorkTree`]: the virtual/working filesystem the engine reads file
//!   bytes through
//! - [`Reconciler`]: the hook notified exactly once after every mutating
//!   operation so the UI-facing persistent file listing can be synchronized
//!
//! All contract methods return `anyhow::Result`; the engine wraps failures
//! with operation context before they reach its callers.

pub(crate) mod contracts;
pub(crate) mod object_id;
pub(crate) mod records;

pub use contracts::{ObjectStore, Reconciler, WorkTree};
pub use object_id::ObjectId;
pub use records::{
    CommitRecord, EntryKind, EntryMode, HeadRef, HeadState, Identity, MergeOutcome, StageState,
    StatusRow, TreeEntry, WalkRow, WorkdirState,
};
