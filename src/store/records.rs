//! Records exchanged with the object store
//!
//! These are the read-side shapes of the store contract: commit metadata,
//! tree entries, lock-step walk rows and the three-way status matrix. They
//! are immutable once produced by the store; the engine only reads them.

use crate::store::object_id::ObjectId;
use chrono::{DateTime, Utc};
use derive_new::new;
use std::fmt;

/// Commit metadata as stored. Parent ids are ordered; the first parent is
/// the branch the merge was made on.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CommitRecord {
    pub id: ObjectId,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub parent_ids: Vec<ObjectId>,
    pub tree_id: ObjectId,
}

impl CommitRecord {
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() >= 2
    }

    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }
}

/// Author/committer identity supplied to the store's merge primitive.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// File mode of a tree entry, printed in octal in patch headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMode {
    #[default]
    Regular,
    Executable,
    Directory,
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            EntryMode::Regular => "100644",
            EntryMode::Executable => "100755",
            EntryMode::Directory => "40000",
        };
        write!(f, "{}", mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
}

/// One entry of a stored tree.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub name: String,
    pub mode: EntryMode,
    pub kind: EntryKind,
    pub id: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Tree
    }
}

/// One row of a lock-step walk over N trees: the full path and, per input
/// tree, the entry at that path or `None` where the path is absent.
///
/// This is the single traversal primitive shared by commit diffing and
/// conflict detection; both interpret rows instead of recursing themselves.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct WalkRow {
    pub path: String,
    pub entries: Vec<Option<TreeEntry>>,
}

impl WalkRow {
    /// True when any present entry at this path is a directory.
    pub fn touches_directory(&self) -> bool {
        self.entries
            .iter()
            .flatten()
            .any(|entry| entry.is_tree())
    }

    pub fn entry(&self, index: usize) -> Option<&TreeEntry> {
        self.entries.get(index).and_then(|entry| entry.as_ref())
    }

    pub fn id(&self, index: usize) -> Option<&ObjectId> {
        self.entry(index).map(|entry| &entry.id)
    }
}

/// Presence of a path in the HEAD tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadState {
    Absent,
    Present,
}

/// State of a path in the working copy relative to HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkdirState {
    Absent,
    Unchanged,
    Changed,
}

/// State of a path in the stage.
///
/// `Unmerged` is the store's marker for paths left unresolved by a
/// conflicted merge; the status table treats it as unchanged, the
/// conflict-marker scan keys off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    None,
    Unchanged,
    Changed,
    New,
    Unmerged,
}

/// One row of the store's three-way status matrix: HEAD tree, working copy
/// and stage presence for a tracked-or-untracked path.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StatusRow {
    pub path: String,
    pub head: HeadState,
    pub workdir: WorkdirState,
    pub stage: StageState,
}

/// Where HEAD currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// HEAD is attached to a local branch (short name, without `heads/`).
    Branch(String),
    /// HEAD points directly at a commit.
    Detached(ObjectId),
    /// Fresh repository, no commits yet.
    Unborn,
}

/// Outcome of the store's low-level three-way merge primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A merge commit was created.
    Committed(ObjectId),
    /// Nothing to do, the histories were already merged.
    AlreadyMerged,
    /// The store raised a conflict signal; the engine escalates to the
    /// conflict detector.
    Conflicted,
}
