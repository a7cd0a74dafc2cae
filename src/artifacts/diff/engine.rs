use crate::areas::project::Project;
use crate::artifacts::diff::patch::format_patch;
use crate::artifacts::refs::RefResolver;
use crate::errors::{EngineError, Result};
use crate::store::{HeadState, ObjectId, StatusRow, WalkRow};
use bytes::Bytes;
use derive_new::new;

const NO_CHANGES: &str = "No changes";
const NO_COMMIT_DIFFERENCES: &str = "No differences between commits";

/// Computes and formats differences between two content snapshots: two
/// commits, the working copy vs HEAD, the stage vs HEAD, or another branch
/// tip vs the current one.
#[derive(Debug, new)]
pub struct DiffEngine<'p> {
    project: &'p Project,
}

impl DiffEngine<'_> {
    /// Diff two arbitrary commits (any ref strings the resolver accepts).
    pub async fn diff_commits(
        &self,
        old: &str,
        new: &str,
        path_filter: Option<&str>,
    ) -> Result<String> {
        self.project.ensure_repository().await?;

        let resolver = RefResolver::new(self.project);
        let old_id = resolver.resolve(old).await?;
        let new_id = resolver.resolve(new).await?;

        let old_tree = self.commit_tree(&old_id).await?;
        let new_tree = self.commit_tree(&new_id).await?;

        let rows = self
            .project
            .store()
            .walk(&[old_tree, new_tree])
            .await
            .map_err(|e| EngineError::store("walk trees", format!("{old}..{new}"), e))?;

        let mut patches = Vec::new();
        for row in &rows {
            if let Some(filter) = path_filter
                && row.path != filter
            {
                continue;
            }
            if let Some(patch) = self.patch_for_row(row).await? {
                patches.push(patch);
            }
        }

        Ok(join_patches(patches, NO_COMMIT_DIFFERENCES))
    }

    /// Diff another branch tip against the current branch tip.
    pub async fn diff_branch(&self, target: &str, path_filter: Option<&str>) -> Result<String> {
        let current = self
            .project
            .current_branch()
            .await?
            .ok_or(EngineError::DetachedHead)?;
        self.diff_commits(&current, target, path_filter).await
    }

    /// Diff the working copy against HEAD.
    pub async fn diff_workdir(&self, path_filter: Option<&str>) -> Result<String> {
        self.snapshot_diff(path_filter, Source::Workdir).await
    }

    /// Diff the stage against HEAD.
    pub async fn diff_staged(&self, path_filter: Option<&str>) -> Result<String> {
        self.snapshot_diff(path_filter, Source::Stage).await
    }

    /// The tree-walk pre-filter: skip directories and identical ids, so no
    /// per-file text comparison happens for unchanged files at all.
    async fn patch_for_row(&self, row: &WalkRow) -> Result<Option<String>> {
        if row.touches_directory() {
            return Ok(None);
        }
        if row.id(0) == row.id(1) {
            return Ok(None);
        }

        let old_text = self.blob_text(row.id(0), &row.path).await?;
        let new_text = self.blob_text(row.id(1), &row.path).await?;

        let patch = format_patch(&row.path, &old_text, &new_text);
        Ok((!patch.is_empty()).then_some(patch))
    }

    async fn snapshot_diff(&self, path_filter: Option<&str>, source: Source) -> Result<String> {
        self.project.ensure_repository().await?;

        let rows = self
            .project
            .store()
            .status_matrix()
            .await
            .map_err(|e| EngineError::store("status matrix", self.project.id().to_string(), e))?;
        let head_commit = self.project.head_commit().await?;

        let mut patches = Vec::new();
        for row in &rows {
            if let Some(filter) = path_filter
                && row.path != filter
            {
                continue;
            }

            let old_text = self.head_text(head_commit.as_ref(), row).await?;
            let new_text = match source {
                Source::Workdir => self.workdir_text(&row.path).await?,
                Source::Stage => self.stage_text(&row.path).await?,
            };

            let patch = format_patch(&row.path, &old_text, &new_text);
            if !patch.is_empty() {
                patches.push(patch);
            }
        }

        Ok(join_patches(patches, NO_CHANGES))
    }

    async fn head_text(&self, head: Option<&ObjectId>, row: &StatusRow) -> Result<String> {
        let Some(head) = head else {
            return Ok(String::new());
        };
        if row.head == HeadState::Absent {
            return Ok(String::new());
        }

        let bytes = self
            .project
            .store()
            .read_blob(head, Some(&row.path))
            .await
            .map_err(|e| EngineError::store("read blob", row.path.clone(), e))?;
        Ok(decode(&bytes))
    }

    async fn workdir_text(&self, path: &str) -> Result<String> {
        let bytes = self
            .project
            .work_tree()
            .read_file(path)
            .await
            .map_err(|e| EngineError::store("read file", path, e))?;
        Ok(bytes.as_ref().map(decode).unwrap_or_default())
    }

    async fn stage_text(&self, path: &str) -> Result<String> {
        let bytes = self
            .project
            .store()
            .read_stage(path)
            .await
            .map_err(|e| EngineError::store("read stage", path, e))?;
        Ok(bytes.as_ref().map(decode).unwrap_or_default())
    }

    async fn blob_text(&self, id: Option<&ObjectId>, path: &str) -> Result<String> {
        let Some(id) = id else {
            return Ok(String::new());
        };
        let bytes = self
            .project
            .store()
            .read_blob(id, None)
            .await
            .map_err(|e| EngineError::store("read blob", path, e))?;
        Ok(decode(&bytes))
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

#[derive(Debug, Clone, Copy)]
enum Source {
    Workdir,
    Stage,
}

fn decode(bytes: &Bytes) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn join_patches(patches: Vec<String>, empty_message: &str) -> String {
    if patches.is_empty() {
        empty_message.to_string()
    } else {
        patches.join("\n\n")
    }
}
