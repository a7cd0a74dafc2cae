//! Working copy status
//!
//! Interprets the store's three-way status matrix into categorized file
//! lists and porcelain text. The categorization is a fixed lookup table
//! over the (HEAD, workdir, stage) triple; re-running status on an
//! unchanged working copy yields identical categories.

pub mod category;
pub mod report;

pub use category::{Category, categorize};
pub use report::{StagedChange, StagedKind, StatusEngine, StatusReport};
