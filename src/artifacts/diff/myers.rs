//! Myers shortest-edit-script diffing
//!
//! The classic greedy algorithm: walk diagonals of the edit graph in
//! rounds, remembering the furthest x per diagonal, then backtrack through
//! the recorded rounds to recover the edit path.

use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete(T),
    Insert(T),
    Equal(T),
}

impl<T> Edit<T> {
    pub fn is_change(&self) -> bool {
        !matches!(self, Edit::Equal(_))
    }

    /// Whether this edit consumes a line of the old side.
    pub fn consumes_old(&self) -> bool {
        matches!(self, Edit::Delete(_) | Edit::Equal(_))
    }

    /// Whether this edit consumes a line of the new side.
    pub fn consumes_new(&self) -> bool {
        matches!(self, Edit::Insert(_) | Edit::Equal(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Edit::Delete(value) | Edit::Insert(value) | Edit::Equal(value) => value,
        }
    }
}

#[derive(Debug, Clone, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: Eq + Clone> MyersDiff<'_, T> {
    /// Edit script transforming `a` into `b`, in order.
    pub fn diff(&self) -> Vec<Edit<T>> {
        if self.a.is_empty() && self.b.is_empty() {
            return Vec::new();
        }

        let mut edits = Vec::new();

        for (prev_x, prev_y, x, y) in self.backtrack() {
            if x == prev_x {
                // only y advanced: insertion
                if prev_y < self.b.len() as isize {
                    edits.push(Edit::Insert(self.b[prev_y as usize].clone()));
                }
            } else if y == prev_y {
                // only x advanced: deletion
                if prev_x < self.a.len() as isize {
                    edits.push(Edit::Delete(self.a[prev_x as usize].clone()));
                }
            } else if prev_x < self.a.len() as isize {
                // diagonal move
                edits.push(Edit::Equal(self.a[prev_x as usize].clone()));
            }
        }

        edits.reverse();
        edits
    }

    fn furthest_rounds(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (n + m) as usize;

        let mut v = vec![0isize; 2 * offset + 1];
        let mut rounds = Vec::new();

        for d in 0..=(n + m) {
            rounds.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                let mut x = if k == -d {
                    // only reachable from k+1: insertion
                    v[idx + 1]
                } else if k == d {
                    // only reachable from k-1: deletion
                    v[idx - 1] + 1
                } else {
                    let x_del = v[idx - 1] + 1;
                    let x_ins = v[idx + 1];
                    x_del.max(x_ins)
                };

                let mut y = x - k;
                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return rounds;
                }
            }
        }

        rounds
    }

    fn backtrack(&self) -> Vec<(isize, isize, isize, isize)> {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (x + y) as usize;
        let mut path = Vec::new();

        let rounds = self.furthest_rounds();

        for (d, v) in rounds.iter().enumerate().rev() {
            let k = x - y;

            let prev_k = if k == -(d as isize) {
                k + 1
            } else if k == (d as isize) {
                k - 1
            } else {
                let at = |k: isize| v[(offset as isize + k) as usize];
                if at(k - 1) + 1 > at(k + 1) { k - 1 } else { k + 1 }
            };

            let prev_x = v[(offset as isize + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        path
    }
}
