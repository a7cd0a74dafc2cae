use crate::store::object_id::ObjectId;
use crate::store::records::{
    CommitRecord, HeadRef, Identity, MergeOutcome, StatusRow, TreeEntry, WalkRow,
};
use async_trait::async_trait;
use bytes::Bytes;

/// The content-addressed object store the engine is layered over.
///
/// Every primitive is I/O-bound (the store may be backed by a network
/// service), hence the async surface. The store is assumed correct; the
/// engine interprets its answers but never second-guesses them.
///
/// Ref names passed to [`resolve_ref`](Self::resolve_ref) and
/// [`write_ref`](Self::write_ref) are full paths within the two ref
/// namespaces: `heads/<name>` for local branches and
/// `remotes/<remote>/<name>` for remote-tracking branches.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether the project has an initialized object store at all.
    async fn is_initialized(&self) -> bool;

    /// Where HEAD currently points.
    async fn head(&self) -> anyhow::Result<HeadRef>;

    /// Resolve a full ref path (or a full commit id) to a commit id.
    /// Returns `None` when no such ref exists.
    async fn resolve_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>>;

    /// Expand an abbreviated commit id to a full one, `None` when the
    /// prefix matches nothing (or is ambiguous).
    async fn expand_object_id(&self, prefix: &str) -> anyhow::Result<Option<ObjectId>>;

    async fn read_commit(&self, id: &ObjectId) -> anyhow::Result<CommitRecord>;

    async fn read_tree(&self, id: &ObjectId) -> anyhow::Result<Vec<TreeEntry>>;

    /// Read blob bytes. With a path, `id` names a commit and the blob is
    /// looked up at that path within the commit's tree; without one, `id`
    /// names the blob directly.
    async fn read_blob(&self, id: &ObjectId, path: Option<&str>) -> anyhow::Result<Bytes>;

    /// Staged content for a path, `None` when the path is not staged.
    async fn read_stage(&self, path: &str) -> anyhow::Result<Option<Bytes>>;

    /// The three-way status matrix comparing HEAD, working copy and stage
    /// for every tracked-or-untracked path.
    async fn status_matrix(&self) -> anyhow::Result<Vec<StatusRow>>;

    /// Walk N trees in lock-step, yielding one row per path in ascending
    /// path order. Rows for paths that are directories on every present
    /// side are not emitted; the walk recurses into them instead.
    async fn walk(&self, tree_ids: &[ObjectId]) -> anyhow::Result<Vec<WalkRow>>;

    /// Common ancestor of two commits, `None` for disjoint histories.
    async fn merge_base(&self, a: &ObjectId, b: &ObjectId) -> anyhow::Result<Option<ObjectId>>;

    /// Whether `id` is a descendant of `ancestor` (reachability through
    /// parent links; a commit is its own descendant).
    async fn is_descendant(&self, id: &ObjectId, ancestor: &ObjectId) -> anyhow::Result<bool>;

    /// All refs in both namespaces, as full ref paths.
    async fn list_refs(&self) -> anyhow::Result<Vec<String>>;

    /// Point a ref at a commit, creating it if needed.
    async fn write_ref(&self, name: &str, id: &ObjectId) -> anyhow::Result<()>;

    /// Update the working copy to the given commit.
    async fn checkout(&self, id: &ObjectId) -> anyhow::Result<()>;

    /// Hard-reset the working copy and stage to the given commit.
    async fn hard_reset(&self, id: &ObjectId) -> anyhow::Result<()>;

    /// Low-level three-way merge of two branch tips. Branch names are the
    /// short local names; the store resolves them itself so the resulting
    /// merge commit references the right tips.
    async fn merge(
        &self,
        ours: &str,
        theirs: &str,
        author: &Identity,
        message: &str,
    ) -> anyhow::Result<MergeOutcome>;

    async fn merge_in_progress(&self) -> anyhow::Result<bool>;

    /// Clear in-progress merge markers left by a conflicted merge.
    async fn clear_merge_state(&self) -> anyhow::Result<()>;
}

/// The working filesystem the engine reads file bytes through.
#[async_trait]
pub trait WorkTree: Send + Sync {
    /// File bytes at a path, `None` when the file does not exist.
    async fn read_file(&self, path: &str) -> anyhow::Result<Option<Bytes>>;

    /// Every file path in the working copy, used only by the degraded
    /// status fallback.
    async fn list_files(&self) -> anyhow::Result<Vec<String>>;
}

/// Hook invoked exactly once after every mutating operation, so an external
/// persistent file listing can be synchronized with the working copy.
#[async_trait]
pub trait Reconciler: Send + Sync {
    async fn reconcile(&self, project_id: &str) -> anyhow::Result<()>;
}
