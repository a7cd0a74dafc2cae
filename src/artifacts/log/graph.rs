use crate::areas::project::Project;
use crate::artifacts::refs::RefResolver;
use crate::errors::{EngineError, Result};
use crate::store::{CommitRecord, HeadRef, ObjectId};
use chrono::{DateTime, Utc};
use derive_new::new;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Commits listed when the caller does not ask for a specific depth.
pub const DEFAULT_GRAPH_DEPTH: usize = 100;

/// Branch tips resolved concurrently, in batches of this size.
const TIP_RESOLVE_BATCH: usize = 8;

/// Field separator stand-in; a literal `|` inside a message or author name
/// would break line parsing on the consumer side.
const PIPE_SUBSTITUTE: char = '\u{00A6}';

/// Newline stand-in for multi-line commit messages.
const NEWLINE_SUBSTITUTE: char = '\u{240A}';

/// Which branch tips seed the history walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchFilter {
    /// The current branch only (or the detached HEAD commit).
    Auto,
    /// Every branch, or an explicit subset of branch names.
    All { branches: Option<Vec<String>> },
}

/// One commit flattened for graph rendering: metadata plus the names of
/// the branches whose tip it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRecord {
    pub id: ObjectId,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub parent_ids: Vec<ObjectId>,
    pub refs: BTreeSet<String>,
    pub tree_id: ObjectId,
}

impl GraphRecord {
    fn from_commit(commit: CommitRecord, refs: BTreeSet<String>) -> Self {
        GraphRecord {
            id: commit.id,
            message: commit.message,
            author: commit.author,
            timestamp: commit.timestamp,
            parent_ids: commit.parent_ids,
            refs,
            tree_id: commit.tree_id,
        }
    }

    /// Pipe-separated line:
    /// `id|message|author|timestamp|parents|refs|tree`, with parents and
    /// refs comma-joined and free-text fields sanitized.
    pub fn to_line(&self) -> String {
        let parents = self
            .parent_ids
            .iter()
            .map(ObjectId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let refs = self.refs.iter().cloned().collect::<Vec<_>>().join(",");

        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.id,
            sanitize(&self.message),
            sanitize(&self.author),
            self.timestamp.to_rfc3339(),
            parents,
            refs,
            self.tree_id,
        )
    }
}

fn sanitize(text: &str) -> String {
    text.replace('|', &PIPE_SUBSTITUTE.to_string())
        .replace('\n', &NEWLINE_SUBSTITUTE.to_string())
}

/// Newest first; equal timestamps tie-break on id so the order is total
/// and stable across runs.
fn sort_and_truncate(records: &mut Vec<GraphRecord>, depth: usize) {
    records.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
    records.truncate(depth);
}

/// Walks commit history from a set of branch tips and flattens it into
/// [`GraphRecord`]s, newest first, each commit exactly once.
#[derive(Debug, new)]
pub struct GraphFormatter<'p> {
    project: &'p Project,
}

impl GraphFormatter<'_> {
    /// The rendered graph listing, one line per commit.
    pub async fn format(&self, filter: &BranchFilter, depth: Option<usize>) -> Result<String> {
        let records = self.records(filter, depth).await?;
        Ok(records
            .iter()
            .map(GraphRecord::to_line)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub async fn records(
        &self,
        filter: &BranchFilter,
        depth: Option<usize>,
    ) -> Result<Vec<GraphRecord>> {
        self.project.ensure_repository().await?;

        let resolver = RefResolver::new(self.project);

        // Annotation covers every branch tip, not just the tips seeding
        // the walk: a filtered listing must still mark commits that other
        // branches point at.
        let all_tips = self.resolve_tips(resolver.list_branches().await?.all()).await?;
        let mut annotations: HashMap<ObjectId, BTreeSet<String>> = HashMap::new();
        for (name, id) in &all_tips {
            annotations
                .entry(id.clone())
                .or_default()
                .insert(name.clone());
        }

        let mut roots = Vec::new();
        for name in self.branch_names(filter).await? {
            match all_tips.iter().find(|(tip_name, _)| *tip_name == name) {
                Some((_, id)) => roots.push(id.clone()),
                None => roots.push(resolver.resolve(&name).await?),
            }
        }

        // Detached HEAD has no branch tip to resolve; walk from the commit
        // itself, unannotated.
        if roots.is_empty()
            && matches!(filter, BranchFilter::Auto)
            && let HeadRef::Detached(id) = self.project.head().await?
        {
            roots.push(id);
        }

        let mut records = self.walk(roots, &annotations).await?;
        sort_and_truncate(&mut records, depth.unwrap_or(DEFAULT_GRAPH_DEPTH));
        Ok(records)
    }

    async fn branch_names(&self, filter: &BranchFilter) -> Result<Vec<String>> {
        match filter {
            BranchFilter::Auto => Ok(self.project.current_branch().await?.into_iter().collect()),
            BranchFilter::All { branches: Some(names) } => Ok(names.clone()),
            BranchFilter::All { branches: None } => {
                let resolver = RefResolver::new(self.project);
                Ok(resolver.list_branches().await?.all())
            }
        }
    }

    /// Resolve tip names to commit ids concurrently. Order of the result
    /// is unspecified; the final sort makes it irrelevant.
    async fn resolve_tips(&self, names: Vec<String>) -> Result<Vec<(String, ObjectId)>> {
        let resolver = RefResolver::new(self.project);

        stream::iter(names)
            .map(|name| {
                let resolver = &resolver;
                async move {
                    let id = resolver.resolve(&name).await?;
                    Ok::<_, EngineError>((name, id))
                }
            })
            .buffer_unordered(TIP_RESOLVE_BATCH)
            .try_collect()
            .await
    }

    /// Breadth-first walk through parent links. The shared visited set
    /// de-duplicates commits reachable from several tips.
    async fn walk(
        &self,
        roots: Vec<ObjectId>,
        annotations: &HashMap<ObjectId, BTreeSet<String>>,
    ) -> Result<Vec<GraphRecord>> {
        let mut visited: HashSet<ObjectId> = HashSet::new();
        let mut frontier: VecDeque<ObjectId> = roots.into();
        let mut records = Vec::new();

        while let Some(id) = frontier.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }

            let commit = self
                .project
                .store()
                .read_commit(&id)
                .await
                .map_err(|e| EngineError::store("read commit", id.to_string(), e))?;

            frontier.extend(commit.parent_ids.iter().cloned());
            let refs = annotations.get(&id).cloned().unwrap_or_default();
            records.push(GraphRecord::from_commit(commit, refs));
        }

        tracing::debug!(commits = records.len(), "graph walk complete");
        Ok(records)
    }
}
