//! Diff computation and formatting
//!
//! - `myers`: Myers shortest-edit-script line diffing
//! - `hunk`: grouping of edit scripts into unified-diff hunks with a
//!   10-line context cutoff, plus hunk application (the round-trip oracle)
//! - `patch`: the exact textual patch contract (`diff --git` headers, mode
//!   and index lines, hunks)
//! - `engine`: the four diff source pairs (commit pair, working copy vs
//!   HEAD, stage vs HEAD, branch tip vs current tip)

pub mod engine;
pub mod hunk;
pub mod myers;
pub mod patch;

pub use engine::DiffEngine;
pub use hunk::{HUNK_CONTEXT_CUTOFF, Hunk, apply_hunks, build_hunks};
pub use myers::{Edit, MyersDiff};
pub use patch::{checksum7, format_patch};
