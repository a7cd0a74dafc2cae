//! Ref names and resolution
//!
//! Two ref namespaces exist: local branches under `heads/` and
//! remote-tracking branches under `remotes/<remote>/`. A name containing a
//! slash is ambiguous between a slash-containing local branch and a remote
//! ref; the resolver tries the remote interpretation first when the prefix
//! before the first slash is a known remote.

pub mod ref_name;
pub mod resolver;

pub use ref_name::{LOCAL_NAMESPACE, REMOTE_NAMESPACE, RemoteRef, SYMBOLIC_HEAD_MARKER};
pub use resolver::{BranchList, RefResolver};
