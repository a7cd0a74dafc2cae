//! Textual patch formatting
//!
//! The output mimics a standard unified patch (`diff --git` header, mode
//! and index lines, `---`/`+++`, hunks) and is a stable contract: other
//! tooling may parse it, so the exact shape matters.

use crate::artifacts::diff::hunk::{Hunk, build_hunks};
use crate::artifacts::diff::myers::MyersDiff;

/// Index-line stand-in for an absent side.
const NULL_CHECKSUM: &str = "0000000";

/// 7-character deterministic checksum used in index lines. Not a real
/// content-addressed id; it only has to be cheap and stable for identical
/// content.
pub fn checksum7(bytes: &[u8]) -> String {
    let crc = format!("{:08x}", crc32fast::hash(bytes));
    crc[..7].to_string()
}

/// Format the patch for one path. Empty string when both sides are
/// byte-identical.
pub fn format_patch(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    if old.is_empty() {
        return format_added(path, new);
    }
    if new.is_empty() {
        return format_deleted(path, old);
    }
    format_modified(path, old, new)
}

fn format_added(path: &str, new: &str) -> String {
    let lines = split_lines(new);
    let mut out = vec![
        format!("diff --git a/{path} b/{path}"),
        "new file mode 100644".to_string(),
        format!("index {NULL_CHECKSUM}..{}", checksum7(new.as_bytes())),
        "--- /dev/null".to_string(),
        format!("+++ b/{path}"),
        format!("@@ -0,0 +1,{} @@", lines.len()),
    ];
    out.extend(lines.iter().map(|line| format!("+{line}")));
    out.join("\n")
}

fn format_deleted(path: &str, old: &str) -> String {
    let lines = split_lines(old);
    let mut out = vec![
        format!("diff --git a/{path} b/{path}"),
        "deleted file mode 100644".to_string(),
        format!("index {}..{NULL_CHECKSUM}", checksum7(old.as_bytes())),
        format!("--- a/{path}"),
        "+++ /dev/null".to_string(),
        format!("@@ -1,{} +0,0 @@", lines.len()),
    ];
    out.extend(lines.iter().map(|line| format!("-{line}")));
    out.join("\n")
}

fn format_modified(path: &str, old: &str, new: &str) -> String {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let mut hunks = build_hunks(&MyersDiff::new(&old_lines, &new_lines).diff());
    if hunks.is_empty() {
        // Degenerate: the texts differ but the line diff found nothing
        // (e.g. only a trailing-newline difference). Emit one hunk
        // spanning the whole file.
        hunks.push(whole_file_hunk(&old_lines, &new_lines));
    }

    let mut out = vec![
        format!("diff --git a/{path} b/{path}"),
        format!(
            "index {}..{} 100644",
            checksum7(old.as_bytes()),
            checksum7(new.as_bytes())
        ),
        format!("--- a/{path}"),
        format!("+++ b/{path}"),
    ];

    for hunk in &hunks {
        out.push(hunk.header());
        out.extend(hunk.lines.iter().cloned());
    }

    out.join("\n")
}

fn whole_file_hunk(old_lines: &[String], new_lines: &[String]) -> Hunk {
    let mut lines = Vec::with_capacity(old_lines.len() + new_lines.len());
    lines.extend(old_lines.iter().map(|line| format!("-{line}")));
    lines.extend(new_lines.iter().map(|line| format!("+{line}")));

    Hunk {
        a_start: 1,
        a_count: old_lines.len(),
        b_start: 1,
        b_count: new_lines.len(),
        lines,
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
