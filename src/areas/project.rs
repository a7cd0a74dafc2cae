use crate::errors::{EngineError, Result};
use crate::store::{HeadRef, ObjectId, ObjectStore, Reconciler, WorkTree};
use derive_new::new;
use std::sync::Arc;

/// Per-project context: the object store, the working filesystem and the
/// reconciliation hook, behind one handle.
///
/// The collaborators are shared singletons; cloning a `Project` is cheap
/// and does not duplicate them. Mutating operations against the same
/// project are not safe to run concurrently and must be serialized by the
/// caller.
#[derive(Clone, new)]
pub struct Project {
    id: String,
    store: Arc<dyn ObjectStore>,
    work_tree: Arc<dyn WorkTree>,
    reconciler: Arc<dyn Reconciler>,
}

impl Project {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn work_tree(&self) -> &dyn WorkTree {
        self.work_tree.as_ref()
    }

    /// Fail fast when the project has no initialized object store. Every
    /// top-level operation calls this first.
    pub async fn ensure_repository(&self) -> Result<()> {
        if self.store.is_initialized().await {
            Ok(())
        } else {
            Err(EngineError::NotARepository(self.id.clone()))
        }
    }

    /// Short name of the branch HEAD is attached to.
    pub async fn current_branch(&self) -> Result<Option<String>> {
        match self.head().await? {
            HeadRef::Branch(name) => Ok(Some(name)),
            HeadRef::Detached(_) | HeadRef::Unborn => Ok(None),
        }
    }

    pub async fn head(&self) -> Result<HeadRef> {
        self.store
            .head()
            .await
            .map_err(|e| EngineError::store("read HEAD", self.id.clone(), e))
    }

    /// Commit id HEAD currently points at, whether attached or detached.
    pub async fn head_commit(&self) -> Result<Option<ObjectId>> {
        match self.head().await? {
            HeadRef::Branch(name) => {
                let full = format!("heads/{name}");
                self.store
                    .resolve_ref(&full)
                    .await
                    .map_err(|e| EngineError::store("resolve ref", full, e))
            }
            HeadRef::Detached(id) => Ok(Some(id)),
            HeadRef::Unborn => Ok(None),
        }
    }

    /// Notify the external synchronized storage. Called exactly once after
    /// each mutating operation completes, never before.
    pub async fn reconcile(&self) -> Result<()> {
        tracing::debug!(project = %self.id, "reconciling external storage");
        self.reconciler
            .reconcile(&self.id)
            .await
            .map_err(|e| EngineError::store("reconcile", self.id.clone(), e))
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project").field("id", &self.id).finish()
    }
}
