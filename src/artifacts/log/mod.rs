//! Commit graph listing
//!
//! Walks commit history from a set of branch tips and flattens it into a
//! machine-parsable line format consumed by graph visualization frontends.
//! Commits reachable from several tips appear exactly once.

pub mod graph;

pub use graph::{BranchFilter, DEFAULT_GRAPH_DEPTH, GraphFormatter, GraphRecord};
