use crate::store::{HeadState, StageState, StatusRow, WorkdirState};

/// Categorization of one status-matrix row.
///
/// `StagedAndModified` is the combined case: a file whose staged version
/// was itself subsequently modified again. It feeds both the staged and
/// the modified lists, preserved as observed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Untracked,
    StagedNew,
    StagedModified,
    StagedAndModified,
    ModifiedUnstaged,
    StagedDeletion,
    DeletedUnstaged,
    Unchanged,
}

impl Category {
    pub fn is_staged(&self) -> bool {
        matches!(
            self,
            Category::StagedNew
                | Category::StagedModified
                | Category::StagedAndModified
                | Category::StagedDeletion
        )
    }

    pub fn is_modified(&self) -> bool {
        matches!(self, Category::ModifiedUnstaged | Category::StagedAndModified)
    }
}

/// The fixed lookup table from a (HEAD, workdir, stage) triple to a
/// category. Pure: the same triple always yields the same category, and no
/// two categories overlap for one triple.
pub fn categorize(row: &StatusRow) -> Category {
    use HeadState as H;
    use StageState as S;
    use WorkdirState as W;

    match (row.head, row.workdir, row.stage) {
        // Not in HEAD
        (H::Absent, W::Unchanged | W::Changed, S::None) => Category::Untracked,
        (H::Absent, _, S::New | S::Changed) => Category::StagedNew,

        // In HEAD, present in the working copy
        (H::Present, W::Changed, S::None) => Category::ModifiedUnstaged,
        (H::Present, W::Changed, S::Changed) => Category::StagedModified,
        (H::Present, W::Changed, S::New) => Category::StagedAndModified,
        (H::Present, W::Unchanged, S::New) => Category::StagedModified,

        // In HEAD, gone from the working copy
        (H::Present, W::Absent, S::None) => Category::DeletedUnstaged,
        (H::Present, W::Absent, S::Unchanged | S::New) => Category::StagedDeletion,

        _ => Category::Unchanged,
    }
}
