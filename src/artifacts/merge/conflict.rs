use crate::areas::project::Project;
use crate::artifacts::refs::RefResolver;
use crate::errors::{EngineError, Result};
use crate::store::{ObjectId, StageState, WalkRow};
use bitflags::bitflags;
use derive_new::new;

/// Literal tokens a conflicted file carries in the working copy.
const CONFLICT_MARKERS: [&str; 3] = ["<<<<<<<", "=======", ">>>>>>>"];

bitflags! {
    /// How a path diverges across the three merge trees. A path is a
    /// conflict only when all three bits are set: changed on our side,
    /// changed on their side, and the two sides disagree.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Divergence: u8 {
        const OURS_CHANGED = 0b001;
        const THEIRS_CHANGED = 0b010;
        const SIDES_DIFFER = 0b100;
    }
}

impl Divergence {
    fn of(row: &WalkRow) -> Self {
        let (base, ours, theirs) = (row.id(0), row.id(1), row.id(2));

        let mut flags = Divergence::empty();
        if ours != base {
            flags |= Divergence::OURS_CHANGED;
        }
        if theirs != base {
            flags |= Divergence::THEIRS_CHANGED;
        }
        if ours != theirs {
            flags |= Divergence::SIDES_DIFFER;
        }
        flags
    }

    fn is_conflict(&self) -> bool {
        self.is_all()
    }
}

/// One conflicted path, with all three contents extracted so the caller
/// can render a resolution UI. `resolved_content` is pre-seeded with our
/// side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictEntry {
    pub path: String,
    pub base_content: String,
    pub ours_content: String,
    pub theirs_content: String,
    pub resolved_content: String,
    pub is_resolved: bool,
}

impl ConflictEntry {
    pub fn new(path: String, base: String, ours: String, theirs: String) -> Self {
        ConflictEntry {
            path,
            base_content: base,
            resolved_content: ours.clone(),
            ours_content: ours,
            theirs_content: theirs,
            is_resolved: false,
        }
    }
}

/// Finds the merge base of two branches and walks three trees to identify
/// files modified on both sides with diverging content.
#[derive(Debug, new)]
pub struct ConflictDetector<'p> {
    project: &'p Project,
}

impl ConflictDetector<'_> {
    /// Common ancestor of two refs, `None` for disjoint histories.
    pub async fn find_merge_base(&self, a: &str, b: &str) -> Result<Option<ObjectId>> {
        let resolver = RefResolver::new(self.project);
        let a_id = resolver.resolve(a).await?;
        let b_id = resolver.resolve(b).await?;

        self.project
            .store()
            .merge_base(&a_id, &b_id)
            .await
            .map_err(|e| EngineError::store("merge base", format!("{a}..{b}"), e))
    }

    /// Walk base/ours/theirs trees in lock-step and emit a
    /// [`ConflictEntry`] for every non-directory path that was modified on
    /// both sides with diverging final content. Disjoint histories yield
    /// no conflicts; the caller treats that as an unmergeable-history
    /// error upstream.
    pub async fn detect_conflicts(
        &self,
        ours_branch: &str,
        theirs_branch: &str,
    ) -> Result<Vec<ConflictEntry>> {
        let Some(base) = self.find_merge_base(ours_branch, theirs_branch).await? else {
            return Ok(Vec::new());
        };

        let resolver = RefResolver::new(self.project);
        let ours = resolver.resolve(ours_branch).await?;
        let theirs = resolver.resolve(theirs_branch).await?;

        let trees = [
            self.commit_tree(&base).await?,
            self.commit_tree(&ours).await?,
            self.commit_tree(&theirs).await?,
        ];
        let rows = self
            .project
            .store()
            .walk(&trees)
            .await
            .map_err(|e| {
                EngineError::store("walk trees", format!("{ours_branch}..{theirs_branch}"), e)
            })?;

        let mut conflicts = Vec::new();
        for row in &rows {
            // Directories are never conflict entries.
            if row.touches_directory() {
                continue;
            }
            if !Divergence::of(row).is_conflict() {
                continue;
            }

            tracing::debug!(path = %row.path, "conflicting path");
            conflicts.push(ConflictEntry::new(
                row.path.clone(),
                self.content(row, 0).await?,
                self.content(row, 1).await?,
                self.content(row, 2).await?,
            ));
        }

        Ok(conflicts)
    }

    /// Scan the working copy's currently-unmerged paths for literal
    /// conflict-marker tokens. A lightweight sanity check, independent of
    /// tree walking.
    pub async fn has_conflict_markers(&self) -> Result<Vec<String>> {
        let rows = self
            .project
            .store()
            .status_matrix()
            .await
            .map_err(|e| EngineError::store("status matrix", self.project.id().to_string(), e))?;

        let mut marked = Vec::new();
        for row in rows {
            if row.stage != StageState::Unmerged {
                continue;
            }

            let bytes = self
                .project
                .work_tree()
                .read_file(&row.path)
                .await
                .map_err(|e| EngineError::store("read file", row.path.clone(), e))?;

            if let Some(bytes) = bytes {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                if text
                    .lines()
                    .any(|line| CONFLICT_MARKERS.iter().any(|m| line.starts_with(m)))
                {
                    marked.push(row.path);
                }
            }
        }

        Ok(marked)
    }

    /// Text of one side of a row, empty string where the path is absent.
    async fn content(&self, row: &WalkRow, side: usize) -> Result<String> {
        let Some(id) = row.id(side) else {
            return Ok(String::new());
        };

        let bytes = self
            .project
            .store()
            .read_blob(id, None)
            .await
            .map_err(|e| EngineError::store("read blob", row.path.clone(), e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn commit_tree(&self, id: &ObjectId) -> Result<ObjectId> {
        let commit = self
            .project
            .store()
            .read_commit(id)
            .await
            .map_err(|e| EngineError::store("read commit", id.to_string(), e))?;
        Ok(commit.tree_id)
    }
}
