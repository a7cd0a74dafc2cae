use crate::artifacts::diff::myers::Edit;

/// Runs of changes separated by more than this many unchanged lines go
/// into separate hunks; anything closer is kept inside one hunk as
/// context.
pub const HUNK_CONTEXT_CUTOFF: usize = 10;

/// One unified-diff hunk. `lines` carry their one-character prefix
/// (space, `-` or `+`). Starts are 1-based; a zero-count side anchors at
/// the line before the hunk, standard unified-diff convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub a_start: usize,
    pub a_count: usize,
    pub b_start: usize,
    pub b_count: usize,
    pub lines: Vec<String>,
}

impl Hunk {
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start, self.a_count, self.b_start, self.b_count
        )
    }
}

/// Group an edit script into hunks spanning from each cluster's first to
/// last changed line, with interior unchanged lines kept as context.
pub fn build_hunks(edits: &[Edit<String>]) -> Vec<Hunk> {
    let clusters = change_clusters(edits);
    let mut hunks = Vec::with_capacity(clusters.len());

    // lines of a/b consumed before each edit
    let mut a_before = vec![0usize; edits.len() + 1];
    let mut b_before = vec![0usize; edits.len() + 1];
    for (i, edit) in edits.iter().enumerate() {
        a_before[i + 1] = a_before[i] + usize::from(edit.consumes_old());
        b_before[i + 1] = b_before[i] + usize::from(edit.consumes_new());
    }

    for (first, last) in clusters {
        let range = &edits[first..=last];
        let a_count = range.iter().filter(|e| e.consumes_old()).count();
        let b_count = range.iter().filter(|e| e.consumes_new()).count();

        let a_start = if a_count > 0 { a_before[first] + 1 } else { a_before[first] };
        let b_start = if b_count > 0 { b_before[first] + 1 } else { b_before[first] };

        let lines = range
            .iter()
            .map(|edit| match edit {
                Edit::Delete(line) => format!("-{line}"),
                Edit::Insert(line) => format!("+{line}"),
                Edit::Equal(line) => format!(" {line}"),
            })
            .collect();

        hunks.push(Hunk {
            a_start,
            a_count,
            b_start,
            b_count,
            lines,
        });
    }

    hunks
}

/// Indices of the first and last change of each cluster. Changes whose gap
/// of unchanged edits is within the cutoff share a cluster.
fn change_clusters(edits: &[Edit<String>]) -> Vec<(usize, usize)> {
    let mut clusters: Vec<(usize, usize)> = Vec::new();

    for (i, edit) in edits.iter().enumerate() {
        if !edit.is_change() {
            continue;
        }

        match clusters.last_mut() {
            Some((_, last)) if i - *last <= HUNK_CONTEXT_CUTOFF + 1 => *last = i,
            _ => clusters.push((i, i)),
        }
    }

    clusters
}

/// Apply hunks to the old line vector, reproducing the new one. This is
/// the correctness oracle for the whole formatter: for any (old, new)
/// pair, applying `build_hunks(diff(old, new))` to `old` must yield `new`.
pub fn apply_hunks(old: &[String], hunks: &[Hunk]) -> Vec<String> {
    let mut out = Vec::new();
    let mut consumed = 0usize;

    for hunk in hunks {
        let begin = if hunk.a_count > 0 {
            hunk.a_start - 1
        } else {
            hunk.a_start
        };

        while consumed < begin {
            out.push(old[consumed].clone());
            consumed += 1;
        }

        for line in &hunk.lines {
            let (prefix, rest) = line.split_at(1);
            match prefix {
                " " => {
                    out.push(old[consumed].clone());
                    consumed += 1;
                }
                "-" => consumed += 1,
                "+" => out.push(rest.to_string()),
                _ => unreachable!("hunk lines always carry a prefix"),
            }
        }
    }

    while consumed < old.len() {
        out.push(old[consumed].clone());
        consumed += 1;
    }

    out
}
