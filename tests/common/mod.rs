#![allow(dead_code)]

//! Shared in-memory collaborators for integration tests: a scriptable
//! object store, a map-backed working filesystem and a call-counting
//! reconciler.

pub mod store;

pub use store::{InMemoryWorkTree, MemoryStore, RecordingReconciler, ScriptedMerge};

use quay::Project;
use std::sync::Arc;

/// One project wired to fresh in-memory collaborators.
pub struct Fixture {
    pub project: Project,
    pub store: Arc<MemoryStore>,
    pub work_tree: Arc<InMemoryWorkTree>,
    pub reconciler: Arc<RecordingReconciler>,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let work_tree = Arc::new(InMemoryWorkTree::default());
        let reconciler = Arc::new(RecordingReconciler::default());

        let project = Project::new(
            "proj-1".to_string(),
            store.clone(),
            work_tree.clone(),
            reconciler.clone(),
        );

        Fixture {
            project,
            store,
            work_tree,
            reconciler,
        }
    }

    /// An initialized repository on `main` with no commits yet.
    pub fn initialized() -> Self {
        let fixture = Self::new();
        fixture.store.init("main");
        fixture
    }
}
