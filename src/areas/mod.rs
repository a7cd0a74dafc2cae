//! Fundamental handles
//!
//! - `project`: the per-project context tying the object store, working
//!   tree and reconciliation hook together; constructed once per project
//!   and passed explicitly to every engine component

pub mod project;
