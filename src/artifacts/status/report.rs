use crate::areas::project::Project;
use crate::artifacts::status::category::{Category, categorize};
use crate::errors::Result;
use crate::store::{HeadState, StatusRow};
use derive_new::new;

const UNTRACKED_HINT: &str = "  (use \"add\" to include in what will be committed)";

/// Prefix printed for a staged path, derived from which side of the triple
/// drove the staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedKind {
    New,
    Modified,
    Deleted,
}

impl StagedKind {
    fn label(&self) -> &'static str {
        match self {
            StagedKind::New => "new file:   ",
            StagedKind::Modified => "modified:   ",
            StagedKind::Deleted => "deleted:    ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedChange {
    pub path: String,
    pub kind: StagedKind,
}

/// Structured status: four path lists plus the branch name the header is
/// rendered with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub branch: String,
    pub staged: Vec<StagedChange>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && self.untracked.is_empty()
    }

    /// Whether a merge/checkout precondition should reject the working
    /// copy. Untracked files alone do not make a working copy dirty.
    pub fn has_uncommitted_changes(&self) -> bool {
        !self.staged.is_empty() || !self.modified.is_empty() || !self.deleted.is_empty()
    }

    /// Porcelain rendering: branch header, then each non-empty list under
    /// its own header in the fixed order staged, modified, deleted,
    /// untracked, with a trailing hint when untracked files exist.
    pub fn render(&self) -> String {
        let mut out = format!("On branch {}\n", self.branch);

        if self.is_clean() {
            out.push_str("nothing to commit, working tree clean\n");
            return out;
        }

        if !self.staged.is_empty() {
            out.push_str("Changes to be committed:\n");
            for change in &self.staged {
                out.push_str(&format!("\t{}{}\n", change.kind.label(), change.path));
            }
            out.push('\n');
        }

        if !self.modified.is_empty() {
            out.push_str("Changes not staged for commit:\n");
            for path in &self.modified {
                out.push_str(&format!("\tmodified:   {path}\n"));
            }
            out.push('\n');
        }

        if !self.deleted.is_empty() {
            out.push_str("Deleted files:\n");
            for path in &self.deleted {
                out.push_str(&format!("\tdeleted:    {path}\n"));
            }
            out.push('\n');
        }

        if !self.untracked.is_empty() {
            out.push_str("Untracked files:\n");
            for path in &self.untracked {
                out.push_str(&format!("\t{path}\n"));
            }
            out.push('\n');
            out.push_str(UNTRACKED_HINT);
            out.push('\n');
        }

        out
    }
}

/// Builds a [`StatusReport`] from the store's status matrix.
#[derive(Debug, new)]
pub struct StatusEngine<'p> {
    project: &'p Project,
}

impl StatusEngine<'_> {
    /// Compute the structured status. When the status matrix cannot be
    /// computed at all, degrade to listing every non-dotfile working copy
    /// path as untracked rather than failing the whole operation.
    pub async fn report(&self) -> Result<StatusReport> {
        self.project.ensure_repository().await?;

        let branch = self
            .project
            .current_branch()
            .await?
            .unwrap_or_else(|| "HEAD (detached)".to_string());

        match self.project.store().status_matrix().await {
            Ok(rows) => Ok(Self::from_matrix(branch, &rows)),
            Err(error) => {
                tracing::debug!(%error, "status matrix unavailable, using degraded fallback");
                self.degraded_report(branch).await
            }
        }
    }

    /// Pure assembly of the four lists from matrix rows.
    pub fn from_matrix(branch: String, rows: &[StatusRow]) -> StatusReport {
        let mut report = StatusReport {
            branch,
            ..StatusReport::default()
        };

        for row in rows {
            let category = categorize(row);

            if category.is_staged() {
                report
                    .staged
                    .push(StagedChange::new(row.path.clone(), staged_kind(row, category)));
            }
            if category.is_modified() {
                report.modified.push(row.path.clone());
            }
            match category {
                Category::Untracked => report.untracked.push(row.path.clone()),
                Category::DeletedUnstaged => report.deleted.push(row.path.clone()),
                _ => {}
            }
        }

        report
    }

    async fn degraded_report(&self, branch: String) -> Result<StatusReport> {
        let files = self
            .project
            .work_tree()
            .list_files()
            .await
            .map_err(|e| crate::errors::EngineError::store("list files", self.project.id().to_string(), e))?;

        let untracked = files
            .into_iter()
            .filter(|path| !path.starts_with('.'))
            .collect();

        Ok(StatusReport {
            branch,
            untracked,
            ..StatusReport::default()
        })
    }
}

fn staged_kind(row: &StatusRow, category: Category) -> StagedKind {
    match category {
        Category::StagedDeletion => StagedKind::Deleted,
        _ if row.head == HeadState::Absent => StagedKind::New,
        _ => StagedKind::Modified,
    }
}
