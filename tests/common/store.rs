use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use quay::store::{
    CommitRecord, EntryKind, EntryMode, HeadRef, Identity, MergeOutcome, ObjectId, ObjectStore,
    Reconciler, StatusRow, TreeEntry, WalkRow, WorkTree,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the store's low-level merge primitive should do when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedMerge {
    /// Create a real two-parent merge commit on the `ours` branch.
    Commit,
    AlreadyMerged,
    /// Signal a conflict and flip the in-progress flag.
    Conflict,
}

#[derive(Default)]
struct State {
    initialized: bool,
    head: Option<HeadRef>,
    refs: BTreeMap<String, ObjectId>,
    commits: HashMap<ObjectId, CommitRecord>,
    trees: HashMap<ObjectId, Vec<TreeEntry>>,
    blobs: HashMap<ObjectId, Bytes>,
    stage: BTreeMap<String, Bytes>,
    status_rows: Vec<StatusRow>,
    fail_status: bool,
    scripted_merge: Option<ScriptedMerge>,
    merge_in_progress: bool,
    seq: i64,
    checkouts: Vec<ObjectId>,
    hard_resets: Vec<ObjectId>,
}

impl State {
    fn next_id(&mut self) -> ObjectId {
        self.seq += 1;
        // Distinct in the first 8 hex chars so abbreviation expansion is
        // unambiguous between commits.
        ObjectId::new(format!("{:08x}", 0xc0de_0000u32 + self.seq as u32).repeat(5))
    }

    fn timestamp(&self) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + self.seq * 60, 0).unwrap()
    }

    fn ancestors(&self, from: &ObjectId) -> HashSet<ObjectId> {
        let mut seen = HashSet::new();
        let mut frontier = VecDeque::from([from.clone()]);
        while let Some(id) = frontier.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&id) {
                frontier.extend(commit.parent_ids.iter().cloned());
            }
        }
        seen
    }
}

/// In-memory [`ObjectStore`] with builder helpers for seeding history and
/// scripting the merge primitive, plus call recording for assertions.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn blob_id(content: &[u8]) -> ObjectId {
    ObjectId::new(format!("{:08x}", crc32fast::hash(content)).repeat(5))
}

impl MemoryStore {
    pub fn init(&self, branch: &str) {
        let mut state = self.state.lock().unwrap();
        state.initialized = true;
        state.head = Some(HeadRef::Branch(branch.to_string()));
    }

    pub fn set_head(&self, head: HeadRef) {
        self.state.lock().unwrap().head = Some(head);
    }

    /// Append a commit to a branch, creating the branch ref if needed.
    /// Files are (path, content) pairs forming a flat root tree.
    pub fn commit_on(&self, branch: &str, message: &str, files: &[(&str, &str)]) -> ObjectId {
        let mut state = self.state.lock().unwrap();

        let parents = state
            .refs
            .get(&format!("heads/{branch}"))
            .cloned()
            .into_iter()
            .collect();
        Self::commit_locked(&mut state, branch, message, files, parents)
    }

    /// Create a branch ref pointing at an existing commit.
    pub fn create_branch(&self, name: &str, at: &ObjectId) {
        self.state
            .lock()
            .unwrap()
            .refs
            .insert(format!("heads/{name}"), at.clone());
    }

    /// Add a ref under an arbitrary full path (e.g. `remotes/origin/main`).
    pub fn add_ref(&self, full: &str, at: &ObjectId) {
        self.state
            .lock()
            .unwrap()
            .refs
            .insert(full.to_string(), at.clone());
    }

    pub fn set_status_rows(&self, rows: Vec<StatusRow>) {
        self.state.lock().unwrap().status_rows = rows;
    }

    pub fn fail_status_matrix(&self) {
        self.state.lock().unwrap().fail_status = true;
    }

    pub fn set_stage(&self, path: &str, content: &str) {
        self.state
            .lock()
            .unwrap()
            .stage
            .insert(path.to_string(), Bytes::from(content.to_string()));
    }

    pub fn script_merge(&self, script: ScriptedMerge) {
        self.state.lock().unwrap().scripted_merge = Some(script);
    }

    pub fn set_merge_in_progress(&self, value: bool) {
        self.state.lock().unwrap().merge_in_progress = value;
    }

    pub fn tip(&self, branch: &str) -> Option<ObjectId> {
        self.state
            .lock()
            .unwrap()
            .refs
            .get(&format!("heads/{branch}"))
            .cloned()
    }

    pub fn checkout_count(&self) -> usize {
        self.state.lock().unwrap().checkouts.len()
    }

    pub fn hard_reset_targets(&self) -> Vec<ObjectId> {
        self.state.lock().unwrap().hard_resets.clone()
    }

    pub fn is_merge_in_progress(&self) -> bool {
        self.state.lock().unwrap().merge_in_progress
    }

    fn commit_locked(
        state: &mut State,
        branch: &str,
        message: &str,
        files: &[(&str, &str)],
        parents: Vec<ObjectId>,
    ) -> ObjectId {
        let entries: Vec<TreeEntry> = files
            .iter()
            .map(|(path, content)| {
                let id = blob_id(content.as_bytes());
                state
                    .blobs
                    .insert(id.clone(), Bytes::from(content.to_string()));
                TreeEntry::new(path.to_string(), EntryMode::Regular, EntryKind::Blob, id)
            })
            .collect();

        let tree_id = state.next_id();
        state.trees.insert(tree_id.clone(), entries);

        let commit_id = state.next_id();
        let commit = CommitRecord::new(
            commit_id.clone(),
            message.to_string(),
            "Test Dev".to_string(),
            state.timestamp(),
            parents,
            tree_id,
        );
        state.commits.insert(commit_id.clone(), commit);
        state
            .refs
            .insert(format!("heads/{branch}"), commit_id.clone());
        commit_id
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn is_initialized(&self) -> bool {
        self.state.lock().unwrap().initialized
    }

    async fn head(&self) -> anyhow::Result<HeadRef> {
        self.state
            .lock()
            .unwrap()
            .head
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no HEAD configured"))
    }

    async fn resolve_ref(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let state = self.state.lock().unwrap();
        if let Some(id) = state.refs.get(name) {
            return Ok(Some(id.clone()));
        }
        let as_id = ObjectId::new(name);
        Ok(state.commits.contains_key(&as_id).then_some(as_id))
    }

    async fn expand_object_id(&self, prefix: &str) -> anyhow::Result<Option<ObjectId>> {
        let state = self.state.lock().unwrap();
        let matches: Vec<&ObjectId> = state
            .commits
            .keys()
            .filter(|id| id.as_str().starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [only] => Ok(Some((*only).clone())),
            _ => Ok(None),
        }
    }

    async fn read_commit(&self, id: &ObjectId) -> anyhow::Result<CommitRecord> {
        self.state
            .lock()
            .unwrap()
            .commits
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no commit {id}"))
    }

    async fn read_tree(&self, id: &ObjectId) -> anyhow::Result<Vec<TreeEntry>> {
        self.state
            .lock()
            .unwrap()
            .trees
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no tree {id}"))
    }

    async fn read_blob(&self, id: &ObjectId, path: Option<&str>) -> anyhow::Result<Bytes> {
        let state = self.state.lock().unwrap();
        let blob = match path {
            None => state.blobs.get(id).cloned(),
            Some(path) => {
                let commit = state
                    .commits
                    .get(id)
                    .ok_or_else(|| anyhow::anyhow!("no commit {id}"))?;
                state
                    .trees
                    .get(&commit.tree_id)
                    .and_then(|entries| entries.iter().find(|e| e.name == path))
                    .and_then(|entry| state.blobs.get(&entry.id))
                    .cloned()
            }
        };
        blob.ok_or_else(|| anyhow::anyhow!("no blob for {id}"))
    }

    async fn read_stage(&self, path: &str) -> anyhow::Result<Option<Bytes>> {
        Ok(self.state.lock().unwrap().stage.get(path).cloned())
    }

    async fn status_matrix(&self) -> anyhow::Result<Vec<StatusRow>> {
        let state = self.state.lock().unwrap();
        if state.fail_status {
            anyhow::bail!("status backend unavailable");
        }
        Ok(state.status_rows.clone())
    }

    async fn walk(&self, tree_ids: &[ObjectId]) -> anyhow::Result<Vec<WalkRow>> {
        let state = self.state.lock().unwrap();

        let trees: Vec<&Vec<TreeEntry>> = tree_ids
            .iter()
            .map(|id| {
                state
                    .trees
                    .get(id)
                    .ok_or_else(|| anyhow::anyhow!("no tree {id}"))
            })
            .collect::<anyhow::Result<_>>()?;

        let names: BTreeSet<&str> = trees
            .iter()
            .flat_map(|entries| entries.iter().map(|e| e.name.as_str()))
            .collect();

        Ok(names
            .into_iter()
            .map(|name| {
                let entries = trees
                    .iter()
                    .map(|tree| tree.iter().find(|e| e.name == name).cloned())
                    .collect();
                WalkRow::new(name.to_string(), entries)
            })
            .collect())
    }

    async fn merge_base(&self, a: &ObjectId, b: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let state = self.state.lock().unwrap();
        let common: Vec<ObjectId> = state
            .ancestors(a)
            .intersection(&state.ancestors(b))
            .cloned()
            .collect();

        Ok(common
            .into_iter()
            .max_by_key(|id| state.commits.get(id).map(|c| c.timestamp)))
    }

    async fn is_descendant(&self, id: &ObjectId, ancestor: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.state.lock().unwrap().ancestors(id).contains(ancestor))
    }

    async fn list_refs(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.state.lock().unwrap().refs.keys().cloned().collect())
    }

    async fn write_ref(&self, name: &str, id: &ObjectId) -> anyhow::Result<()> {
        self.state
            .lock()
            .unwrap()
            .refs
            .insert(name.to_string(), id.clone());
        Ok(())
    }

    async fn checkout(&self, id: &ObjectId) -> anyhow::Result<()> {
        self.state.lock().unwrap().checkouts.push(id.clone());
        Ok(())
    }

    async fn hard_reset(&self, id: &ObjectId) -> anyhow::Result<()> {
        self.state.lock().unwrap().hard_resets.push(id.clone());
        Ok(())
    }

    async fn merge(
        &self,
        ours: &str,
        theirs: &str,
        _author: &Identity,
        message: &str,
    ) -> anyhow::Result<MergeOutcome> {
        let mut state = self.state.lock().unwrap();
        let script = state.scripted_merge.unwrap_or(ScriptedMerge::Commit);

        match script {
            ScriptedMerge::AlreadyMerged => Ok(MergeOutcome::AlreadyMerged),
            ScriptedMerge::Conflict => {
                state.merge_in_progress = true;
                Ok(MergeOutcome::Conflicted)
            }
            ScriptedMerge::Commit => {
                let ours_tip = state
                    .refs
                    .get(&format!("heads/{ours}"))
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no branch {ours}"))?;
                let theirs_tip = state
                    .refs
                    .get(&format!("heads/{theirs}"))
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no branch {theirs}"))?;
                let tree_id = state
                    .commits
                    .get(&ours_tip)
                    .map(|c| c.tree_id.clone())
                    .ok_or_else(|| anyhow::anyhow!("no commit {ours_tip}"))?;

                let commit_id = state.next_id();
                let commit = CommitRecord::new(
                    commit_id.clone(),
                    message.to_string(),
                    "Test Dev".to_string(),
                    state.timestamp(),
                    vec![ours_tip, theirs_tip],
                    tree_id,
                );
                state.commits.insert(commit_id.clone(), commit);
                state
                    .refs
                    .insert(format!("heads/{ours}"), commit_id.clone());
                Ok(MergeOutcome::Committed(commit_id))
            }
        }
    }

    async fn merge_in_progress(&self) -> anyhow::Result<bool> {
        Ok(self.state.lock().unwrap().merge_in_progress)
    }

    async fn clear_merge_state(&self) -> anyhow::Result<()> {
        self.state.lock().unwrap().merge_in_progress = false;
        Ok(())
    }
}

/// Map-backed [`WorkTree`].
#[derive(Default)]
pub struct InMemoryWorkTree {
    files: Mutex<BTreeMap<String, Bytes>>,
}

impl InMemoryWorkTree {
    pub fn put(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), Bytes::from(content.to_string()));
    }

    pub fn remove(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }
}

#[async_trait]
impl WorkTree for InMemoryWorkTree {
    async fn read_file(&self, path: &str) -> anyhow::Result<Option<Bytes>> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    async fn list_files(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.files.lock().unwrap().keys().cloned().collect())
    }
}

/// [`Reconciler`] that only counts invocations, for exactly-once
/// assertions.
#[derive(Default)]
pub struct RecordingReconciler {
    calls: AtomicUsize,
}

impl RecordingReconciler {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reconciler for RecordingReconciler {
    async fn reconcile(&self, _project_id: &str) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
