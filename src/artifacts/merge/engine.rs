use crate::areas::project::Project;
use crate::artifacts::merge::conflict::{ConflictDetector, ConflictEntry};
use crate::artifacts::refs::{LOCAL_NAMESPACE, RefResolver};
use crate::artifacts::status::StatusEngine;
use crate::errors::{EngineError, Result};
use crate::store::{Identity, MergeOutcome, ObjectId};
use derive_new::new;

/// Caller-tunable merge behavior.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Create a merge commit even when a fast-forward would do.
    pub force_commit: bool,
    /// Merge commit message; defaults to `Merge branch '<target>'`.
    pub message: Option<String>,
    pub author: Identity,
}

impl MergeOptions {
    pub fn new(author: Identity) -> Self {
        MergeOptions {
            force_commit: false,
            message: None,
            author,
        }
    }
}

/// Terminal state of one merge invocation. Conflicts are a distinct
/// outcome requiring user resolution, not a failure of the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeReport {
    AlreadyUpToDate,
    FastForwarded { branch: String, to: ObjectId },
    Merged { commit: ObjectId },
    Conflicts(Vec<ConflictEntry>),
}

impl MergeReport {
    pub fn summary(&self) -> String {
        match self {
            MergeReport::AlreadyUpToDate => "Already up to date.".to_string(),
            MergeReport::FastForwarded { branch, to } => {
                format!("Fast-forwarded {} to {}.", branch, to.short())
            }
            MergeReport::Merged { commit } => {
                format!("Merge made commit {}.", commit.short())
            }
            MergeReport::Conflicts(entries) => format!(
                "Merge produced {} conflicted file(s); resolve them and commit.",
                entries.len()
            ),
        }
    }
}

/// Orchestrates one merge: precondition checks, fast-forward eligibility,
/// ref update or three-way merge, conflict escalation.
///
/// Steps execute strictly in the order preconditions, resolve, mutate,
/// reconcile; each mutating path notifies the reconciliation hook exactly
/// once, after the git-level mutation completes.
#[derive(Debug, new)]
pub struct MergeEngine<'p> {
    project: &'p Project,
}

impl MergeEngine<'_> {
    pub async fn merge(&self, target: &str, options: &MergeOptions) -> Result<MergeReport> {
        self.project.ensure_repository().await?;

        let status = StatusEngine::new(self.project).report().await?;
        if status.has_uncommitted_changes() {
            return Err(EngineError::DirtyWorkingCopy);
        }

        let current = self
            .project
            .current_branch()
            .await?
            .ok_or(EngineError::DetachedHead)?;

        if current == target {
            return Ok(MergeReport::AlreadyUpToDate);
        }

        let resolver = RefResolver::new(self.project);
        let target_tip = resolver.resolve(target).await?;
        let current_tip = resolver.resolve(&current).await?;

        if target_tip == current_tip {
            return Ok(MergeReport::AlreadyUpToDate);
        }

        if !options.force_commit && self.can_fast_forward(&target_tip, &current_tip).await? {
            tracing::debug!(%current, %target, "fast-forwarding");
            return self.fast_forward(&current, &target_tip).await;
        }

        self.three_way(&current, target, options).await
    }

    /// Abort an in-progress merge: clear the store's merge markers and
    /// hard-reset the working copy to the current branch tip.
    pub async fn abort(&self) -> Result<()> {
        self.project.ensure_repository().await?;

        let in_progress = self
            .project
            .store()
            .merge_in_progress()
            .await
            .map_err(|e| EngineError::store("merge state", self.project.id().to_string(), e))?;
        if !in_progress {
            return Err(EngineError::NoMergeInProgress);
        }

        let tip = self
            .project
            .head_commit()
            .await?
            .ok_or(EngineError::DetachedHead)?;

        self.project
            .store()
            .clear_merge_state()
            .await
            .map_err(|e| EngineError::store("clear merge state", self.project.id().to_string(), e))?;
        self.project
            .store()
            .hard_reset(&tip)
            .await
            .map_err(|e| EngineError::store("hard reset", tip.to_string(), e))?;

        self.project.reconcile().await
    }

    /// Fast-forward is possible iff the target tip is a descendant of the
    /// current tip.
    async fn can_fast_forward(&self, target_tip: &ObjectId, current_tip: &ObjectId) -> Result<bool> {
        self.project
            .store()
            .is_descendant(target_tip, current_tip)
            .await
            .map_err(|e| EngineError::store("ancestry check", target_tip.to_string(), e))
    }

    /// Move the current branch ref to the target tip and update the
    /// working copy; no new commit is created.
    async fn fast_forward(&self, branch: &str, tip: &ObjectId) -> Result<MergeReport> {
        let full = format!("{LOCAL_NAMESPACE}{branch}");
        self.project
            .store()
            .write_ref(&full, tip)
            .await
            .map_err(|e| EngineError::store("write ref", full.clone(), e))?;
        self.project
            .store()
            .checkout(tip)
            .await
            .map_err(|e| EngineError::store("checkout", tip.to_string(), e))?;

        self.project.reconcile().await?;

        Ok(MergeReport::FastForwarded {
            branch: branch.to_string(),
            to: tip.clone(),
        })
    }

    async fn three_way(
        &self,
        current: &str,
        target: &str,
        options: &MergeOptions,
    ) -> Result<MergeReport> {
        let message = options
            .message
            .clone()
            .unwrap_or_else(|| format!("Merge branch '{target}'"));

        let outcome = self
            .project
            .store()
            .merge(current, target, &options.author, &message)
            .await
            .map_err(|e| EngineError::store("merge", format!("{current}..{target}"), e))?;

        match outcome {
            MergeOutcome::Committed(commit) => {
                self.project
                    .store()
                    .checkout(&commit)
                    .await
                    .map_err(|e| EngineError::store("checkout", commit.to_string(), e))?;
                self.project.reconcile().await?;
                Ok(MergeReport::Merged { commit })
            }
            MergeOutcome::AlreadyMerged => Ok(MergeReport::AlreadyUpToDate),
            MergeOutcome::Conflicted => {
                // The store left conflict markers in the working copy;
                // extract structured conflicts instead of surfacing an
                // undefined state.
                let entries = ConflictDetector::new(self.project)
                    .detect_conflicts(current, target)
                    .await?;
                self.project.reconcile().await?;
                Ok(MergeReport::Conflicts(entries))
            }
        }
    }
}
