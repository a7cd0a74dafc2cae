//! Porcelain data structures and algorithms
//!
//! - `refs`: branch/ref string resolution across local and remote
//!   namespaces, branch enumeration
//! - `status`: interpretation of the three-way status matrix into
//!   categorized file lists and porcelain text
//! - `diff`: Myers line diffing, hunk assembly and patch formatting over
//!   two arbitrary content snapshots
//! - `merge`: merge orchestration (fast-forward and three-way) and
//!   conflict detection via three-tree walks
//! - `log`: ordered, de-duplicated commit listing for graph visualization

pub mod diff;
pub mod log;
pub mod merge;
pub mod refs;
pub mod status;
