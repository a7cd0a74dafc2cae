//! quay - a version-control porcelain engine
//!
//! This crate turns low-level content-addressed object operations (read a
//! commit/tree/blob, resolve a ref, walk trees, compute a three-way status
//! matrix) into the high-level operations a user expects from version
//! control: status reporting, diffing, branch resolution across local and
//! remote namespaces, merge execution with conflict detection, and commit
//! history formatting for graph visualization.
//!
//! The underlying object store, the working filesystem and the UI-facing
//! synchronized storage are external collaborators; their contracts live in
//! [`store`] and everything else is interpretation and orchestration built
//! on top of them.

pub mod areas;
pub mod artifacts;
pub mod errors;
pub mod store;

pub use areas::project::Project;
pub use errors::{EngineError, Result};
