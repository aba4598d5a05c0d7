//! Myers' O(ND) shortest edit script.
//!
//! The search runs one edit distance `d` at a time. [`MyersSearch`] keeps
//! everything needed to resume between two values of `d`, so the direct
//! [`diff`] and the [`CooperativeDiff`](crate::CooperativeDiff) engine share
//! the same loop.

use crate::edit::EditOp;

/// Resumable search state.
///
/// `v[k]` is the furthest x reached on diagonal `k = x - y`. After each `d`
/// the window `k in [-d-1, d+1]` is saved to `v_save`; tracing the path back
/// reads only that window, which keeps the saved history at O(D²).
#[derive(Debug, Clone)]
pub(crate) struct MyersSearch {
    n: usize,
    m: usize,
    /// Next `d` to run.
    d: usize,
    offset: isize,
    v: Vec<isize>,
    v_save: Vec<Vec<isize>>,
    solved: bool,
}

impl MyersSearch {
    pub(crate) fn new(n: usize, m: usize) -> Self {
        let max = n + m;
        Self {
            n,
            m,
            d: 0,
            offset: max as isize + 1,
            v: vec![0; 2 * max + 3],
            v_save: Vec::new(),
            solved: false,
        }
    }

    /// Values of `d` run so far.
    pub(crate) fn iterations(&self) -> usize {
        self.d
    }

    /// Upper bound on [`iterations`](Self::iterations): `d` never exceeds `n + m`.
    pub(crate) fn max_iterations(&self) -> usize {
        self.n + self.m + 1
    }

    pub(crate) fn lengths(&self) -> (usize, usize) {
        (self.n, self.m)
    }

    fn at(&self, k: isize) -> isize {
        self.v[(k + self.offset) as usize]
    }

    /// Runs one value of `d`. Returns `true` once both sequences are fully
    /// consumed; later calls do nothing.
    ///
    /// `a` and `b` must be the sequences the search was created for.
    pub(crate) fn step<A, B, F>(&mut self, a: &[A], b: &[B], eq: &mut F) -> bool
    where
        F: FnMut(&A, &B) -> bool,
    {
        if self.solved {
            return true;
        }
        debug_assert_eq!((a.len(), b.len()), (self.n, self.m));
        let d = self.d as isize;
        let (n, m) = (self.n as isize, self.m as isize);

        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && self.at(k - 1) < self.at(k + 1)) {
                self.at(k + 1)
            } else {
                self.at(k - 1) + 1
            };
            let mut y = x - k;
            // follow the snake
            while x < n && y < m && y >= 0 && eq(&a[x as usize], &b[y as usize]) {
                x += 1;
                y += 1;
            }
            self.v[(k + self.offset) as usize] = x;
            if x == n && y == m {
                self.solved = true;
                break;
            }
            k += 2;
        }

        let lo = (self.offset - d - 1) as usize;
        let hi = (self.offset + d + 1) as usize;
        self.v_save.push(self.v[lo..=hi].to_vec());
        self.d += 1;
        self.solved
    }

    /// Ends of the snakes on the shortest path, from the first to `(n, m)`.
    fn trace_back(&self) -> Vec<(isize, isize)> {
        let mut snakes = Vec::with_capacity(self.v_save.len());
        let (mut x, mut y) = (self.n as isize, self.m as isize);
        for (d, saved) in self.v_save.iter().enumerate().rev() {
            if x < 0 || y < 0 {
                break;
            }
            snakes.push((x, y));
            let d = d as isize;
            let at = |k: isize| saved[(k + d + 1) as usize];
            let k = x - y;
            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            x = at(prev_k);
            y = x - prev_k;
        }
        snakes.reverse();
        snakes
    }

    /// Edit script of a solved search.
    pub(crate) fn into_script(self) -> Vec<EditOp> {
        debug_assert!(self.solved);
        let mut ops = Vec::with_capacity(self.n + self.m);
        let (mut x, mut y, mut seq) = (0isize, 0isize, 0usize);
        for (sx, sy) in self.trace_back() {
            while sx - sy > x - y {
                ops.push(EditOp::delete(x as usize));
                x += 1;
            }
            while sx - sy < x - y {
                ops.push(EditOp::insert(y as usize, seq));
                y += 1;
                seq += 1;
            }
            while x < sx {
                ops.push(EditOp::keep(x as usize, seq));
                x += 1;
                y += 1;
                seq += 1;
            }
        }
        ops
    }
}

/// Shortest edit script turning `a` into `b`.
///
/// Deletes come before inserts at each point of divergence. The number of
/// deletes plus inserts is `|a| + |b| - 2 * LCS(a, b)`.
pub fn diff<A, B, F>(a: &[A], b: &[B], mut eq: F) -> Vec<EditOp>
where
    F: FnMut(&A, &B) -> bool,
{
    let mut search = MyersSearch::new(a.len(), b.len());
    while !search.step(a, b, &mut eq) {}
    search.into_script()
}

/// [`diff`] with `PartialEq`.
pub fn diff_eq<T: PartialEq>(a: &[T], b: &[T]) -> Vec<EditOp> {
    diff(a, b, |x, y| x == y)
}
