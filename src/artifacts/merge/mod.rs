//! Merge orchestration and conflict detection
//!
//! One merge invocation is a small state machine:
//! Preconditions, then fast-forward or three-way, ending in success or
//! conflicts. The three-way merge itself is delegated to the object store;
//! the conflict detector only runs when the store raises a conflict
//! signal, extracting base/ours/theirs content for every diverging path.

pub mod conflict;
pub mod engine;

pub use conflict::{ConflictDetector, ConflictEntry};
pub use engine::{MergeEngine, MergeOptions, MergeReport};
