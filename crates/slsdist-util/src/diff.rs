//! Line-oriented unified diffs for remediation messages.

use std::fmt::Write;

const CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal(usize),
    Delete(usize),
    Insert(usize),
}

impl Op {
    fn touches_old(self) -> bool {
        !matches!(self, Op::Insert(_))
    }

    fn touches_new(self) -> bool {
        !matches!(self, Op::Delete(_))
    }
}

/// Render a unified diff turning `old` into `new`.
///
/// Returns an empty string when the inputs have identical lines.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();
    let ops = edit_script(&a, &b);

    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for (k, op) in ops.iter().enumerate() {
        if matches!(op, Op::Equal(_)) {
            continue;
        }
        let start = k.saturating_sub(CONTEXT);
        let end = (k + CONTEXT).min(ops.len() - 1);
        match hunks.last_mut() {
            Some((_, last_end)) if start <= *last_end + 1 => *last_end = end.max(*last_end),
            _ => hunks.push((start, end)),
        }
    }
    if hunks.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "--- {old_label}");
    let _ = writeln!(out, "+++ {new_label}");
    for (start, end) in hunks {
        let hunk = &ops[start..=end];
        let old_before = ops[..start].iter().filter(|op| op.touches_old()).count();
        let new_before = ops[..start].iter().filter(|op| op.touches_new()).count();
        let old_count = hunk.iter().filter(|op| op.touches_old()).count();
        let new_count = hunk.iter().filter(|op| op.touches_new()).count();
        let old_start = if old_count == 0 { old_before } else { old_before + 1 };
        let new_start = if new_count == 0 { new_before } else { new_before + 1 };

        let _ = writeln!(out, "@@ -{old_start},{old_count} +{new_start},{new_count} @@");
        for op in hunk {
            let _ = match *op {
                Op::Equal(i) => writeln!(out, " {}", a[i]),
                Op::Delete(i) => writeln!(out, "-{}", a[i]),
                Op::Insert(j) => writeln!(out, "+{}", b[j]),
            };
        }
    }
    out
}

/// Longest-common-subsequence edit script; deletions are emitted before
/// insertions at each divergence.
fn edit_script(a: &[&str], b: &[&str]) -> Vec<Op> {
    let (n, m) = (a.len(), b.len());
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            ops.push(Op::Equal(i));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(Op::Delete(i));
            i += 1;
        } else {
            ops.push(Op::Insert(j));
            j += 1;
        }
    }
    ops.extend((i..n).map(Op::Delete));
    ops.extend((j..m).map(Op::Insert));
    ops
}
