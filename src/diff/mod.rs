//! Element-wise comparison of two sequences.

use crate::options::{
    check_allowed, DiffOptions, Mode, OPT_CONTEXT, OPT_FAST, OPT_FORCE_ANCHORING, OPT_MINIMAL,
};
use std::hash::Hash;
use std::ops;

pub(crate) mod myers;
pub(crate) mod prep;
pub(crate) mod rvec;

#[cfg(test)]
mod tests;

use myers::{EqFn, IdEq, Myers};
use prep::Reduced;

// Anchor partitioning only pays off once the reduced input is large; below
// this size a single engine run is both faster and better.
const ANCHORING_MIN_INPUT_LEN: usize = 5_000;

/// A single edit of a diff.
///
/// A `Match` carries the elements from both sides, a `Delete` the element of
/// `x` that is missing from `y`, and an `Insert` the element of `y` that is
/// missing from `x`.
#[derive(Debug, PartialEq, Eq)]
pub enum Edit<'a, T: ?Sized> {
    /// Equal elements present in both sequences
    Match(&'a T, &'a T),
    /// An element deleted from the left sequence
    Delete(&'a T),
    /// An element inserted from the right sequence
    Insert(&'a T),
}

impl<T: ?Sized> Copy for Edit<'_, T> {}

impl<T: ?Sized> Clone for Edit<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

/// A block of consecutive edits together with its surrounding context.
///
/// A hunk covers `x[x_range]` and `y[y_range]` and records the edits that
/// transform the one into the other. Unless it touches a sequence boundary,
/// a hunk begins and ends with matching elements.
#[derive(Debug, PartialEq, Eq)]
pub struct Hunk<'a, T: ?Sized> {
    x_range: ops::Range<usize>,
    y_range: ops::Range<usize>,
    edits: Vec<Edit<'a, T>>,
}

impl<'a, T: ?Sized> Hunk<'a, T> {
    pub(crate) fn new(
        x_range: ops::Range<usize>,
        y_range: ops::Range<usize>,
        edits: Vec<Edit<'a, T>>,
    ) -> Self {
        Self {
            x_range,
            y_range,
            edits,
        }
    }

    /// The range of the left sequence this hunk covers.
    pub fn x_range(&self) -> ops::Range<usize> {
        self.x_range.clone()
    }

    /// The range of the right sequence this hunk covers.
    pub fn y_range(&self) -> ops::Range<usize> {
        self.y_range.clone()
    }

    /// The edits transforming `x[x_range]` into `y[y_range]`.
    pub fn edits(&self) -> &[Edit<'a, T>] {
        &self.edits
    }
}

impl<T: ?Sized> Clone for Hunk<'_, T> {
    fn clone(&self) -> Self {
        Self {
            x_range: self.x_range.clone(),
            y_range: self.y_range.clone(),
            edits: self.edits.clone(),
        }
    }
}

/// Compare `x` and `y` and return an edit for every element of both inputs.
///
/// If the inputs are identical the output consists solely of matches.
///
/// ```
/// use seqdiff::{edits, Edit};
///
/// let x = ["foo", "bar"];
/// let y = ["foo", "baz"];
/// assert_eq!(
///     edits(&x, &y),
///     vec![
///         Edit::Match(&"foo", &"foo"),
///         Edit::Delete(&"bar"),
///         Edit::Insert(&"baz"),
///     ],
/// );
/// ```
pub fn edits<'a, T: Hash + Eq>(x: &'a [T], y: &'a [T]) -> Vec<Edit<'a, T>> {
    DiffOptions::new().edits(x, y)
}

/// Compare `x` and `y` using the provided equality function and return an
/// edit for every element of both inputs.
///
/// This is generally slower than [`edits`], which can reduce the problem to
/// integer comparisons before running the diff algorithm.
pub fn edits_func<'a, T, F>(x: &'a [T], y: &'a [T], eq: F) -> Vec<Edit<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    DiffOptions::new().edits_func(x, y, eq)
}

/// Compare `x` and `y` and return the changes grouped into hunks with three
/// elements of context.
///
/// If the inputs are identical the output is empty.
pub fn hunks<'a, T: Hash + Eq>(x: &'a [T], y: &'a [T]) -> Vec<Hunk<'a, T>> {
    DiffOptions::new().hunks(x, y)
}

/// Compare `x` and `y` using the provided equality function and return the
/// changes grouped into hunks with three elements of context.
pub fn hunks_func<'a, T, F>(x: &'a [T], y: &'a [T], eq: F) -> Vec<Hunk<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    DiffOptions::new().hunks_func(x, y, eq)
}

impl DiffOptions {
    /// Compare `x` and `y` with these options and return an edit for every
    /// element of both inputs.
    ///
    /// # Panics
    ///
    /// Panics if an option that has no meaning for plain edit output, such as
    /// the context length, was set.
    pub fn edits<'a, T: Hash + Eq>(&self, x: &'a [T], y: &'a [T]) -> Vec<Edit<'a, T>> {
        check_allowed(
            self.set,
            OPT_MINIMAL | OPT_FAST | OPT_FORCE_ANCHORING,
            "edits",
        );
        let (rx, ry) = diff(x, y, self.mode, self.force_anchoring);
        walk_edits(x, y, &rx, &ry, 0..x.len(), 0..y.len())
    }

    /// Compare `x` and `y` with these options using the provided equality
    /// function and return an edit for every element of both inputs.
    ///
    /// # Panics
    ///
    /// Panics if an option that has no meaning for plain edit output, such as
    /// the context length, was set.
    pub fn edits_func<'a, T, F>(&self, x: &'a [T], y: &'a [T], eq: F) -> Vec<Edit<'a, T>>
    where
        F: Fn(&T, &T) -> bool,
    {
        check_allowed(self.set, OPT_MINIMAL | OPT_FAST, "edits_func");
        let (rx, ry) = diff_func(x, y, eq, self.mode);
        walk_edits(x, y, &rx, &ry, 0..x.len(), 0..y.len())
    }

    /// Compare `x` and `y` with these options and return the changes grouped
    /// into hunks.
    pub fn hunks<'a, T: Hash + Eq>(&self, x: &'a [T], y: &'a [T]) -> Vec<Hunk<'a, T>> {
        check_allowed(
            self.set,
            OPT_CONTEXT | OPT_MINIMAL | OPT_FAST | OPT_FORCE_ANCHORING,
            "hunks",
        );
        let (rx, ry) = diff(x, y, self.mode, self.force_anchoring);
        build_hunks(x, y, &rx, &ry, self.context_len)
    }

    /// Compare `x` and `y` with these options using the provided equality
    /// function and return the changes grouped into hunks.
    pub fn hunks_func<'a, T, F>(&self, x: &'a [T], y: &'a [T], eq: F) -> Vec<Hunk<'a, T>>
    where
        F: Fn(&T, &T) -> bool,
    {
        check_allowed(self.set, OPT_CONTEXT | OPT_MINIMAL | OPT_FAST, "hunks_func");
        let (rx, ry) = diff_func(x, y, eq, self.mode);
        build_hunks(x, y, &rx, &ry, self.context_len)
    }
}

/// Walk the result vectors over `x[s_range]`/`y[t_range]` and materialize the
/// edits in order: runs of deletions first, then runs of insertions, then
/// matches.
fn walk_edits<'a, T>(
    x: &'a [T],
    y: &'a [T],
    rx: &[bool],
    ry: &[bool],
    s_range: ops::Range<usize>,
    t_range: ops::Range<usize>,
) -> Vec<Edit<'a, T>> {
    let mut edits = Vec::new();
    let (mut s, mut t) = (s_range.start, t_range.start);
    while s < s_range.end || t < t_range.end {
        if s < s_range.end && rx[s] {
            edits.push(Edit::Delete(&x[s]));
            s += 1;
        } else if t < t_range.end && ry[t] {
            edits.push(Edit::Insert(&y[t]));
            t += 1;
        } else {
            edits.push(Edit::Match(&x[s], &y[t]));
            s += 1;
            t += 1;
        }
    }
    edits
}

fn build_hunks<'a, T>(
    x: &'a [T],
    y: &'a [T],
    rx: &[bool],
    ry: &[bool],
    context: usize,
) -> Vec<Hunk<'a, T>> {
    rvec::hunks(rx, ry, context)
        .into_iter()
        .map(|h| {
            let edits = walk_edits(x, y, rx, ry, h.s0..h.s1, h.t0..h.t1);
            Hunk::new(h.s0..h.s1, h.t0..h.t1, edits)
        })
        .collect()
}

/// Compute the result vectors for `x` and `y`.
pub(crate) fn diff<T: Hash + Eq>(
    x: &[T],
    y: &[T],
    mode: Mode,
    force_anchoring: bool,
) -> (Vec<bool>, Vec<bool>) {
    let (mut rx, mut ry) = rvec::make(x.len(), y.len());

    let (smin, smax, tmin, tmax) = change_bounds(x, y, |a: &T, b: &T| a == b);
    if handle_trivial(&mut rx, &mut ry, smin, smax, tmin, tmax) {
        return (rx, ry);
    }

    // Reduce the problem to integer IDs and pre-marked one-sided elements.
    // This is what makes the integer engine applicable, and it shrinks the
    // input substantially for typical large diffs.
    let red = prep::reduce(&mut rx, &mut ry, smin, smax, tmin, tmax, x, y);

    match mode {
        Mode::Minimal => {
            let (mut m, w) = Myers::new(
                &red.x0, &red.y0, IdEq, &red.xidx, &red.yidx, &mut rx, &mut ry,
            );
            m.compare(w.smin, w.smax, w.tmin, w.tmax, true);
        }
        Mode::Default => diff_default(&mut rx, &mut ry, &red, force_anchoring),
        Mode::Fast => diff_fast(&mut rx, &mut ry, &red),
    }

    (rx, ry)
}

/// Compute the result vectors for `x` and `y` using a caller-supplied
/// equality function.
///
/// Without hashable elements there is no preprocessing and no anchoring; the
/// generic engine runs over the raw elements, optimally exactly when the mode
/// asks for a minimal diff.
pub(crate) fn diff_func<T, F>(x: &[T], y: &[T], eq: F, mode: Mode) -> (Vec<bool>, Vec<bool>)
where
    F: Fn(&T, &T) -> bool,
{
    let (mut rx, mut ry) = rvec::make(x.len(), y.len());

    let (smin, smax, tmin, tmax) = change_bounds(x, y, &eq);
    if handle_trivial(&mut rx, &mut ry, smin, smax, tmin, tmax) {
        return (rx, ry);
    }

    let idx: Vec<usize> = (0..x.len().max(y.len())).collect();
    let (mut m, w) = Myers::new(
        x,
        y,
        EqFn(&eq),
        &idx[..x.len()],
        &idx[..y.len()],
        &mut rx,
        &mut ry,
    );
    m.compare(w.smin, w.smax, w.tmin, w.tmax, mode == Mode::Minimal);

    (rx, ry)
}

/// Return the bounds of the changed portion of the inputs: the window that
/// remains after stripping the common prefix and the common suffix.
fn change_bounds<T, F>(x: &[T], y: &[T], eq: F) -> (usize, usize, usize, usize)
where
    F: Fn(&T, &T) -> bool,
{
    let (mut smin, mut tmin) = (0, 0);
    let (mut smax, mut tmax) = (x.len(), y.len());

    while smin < smax && tmin < tmax && eq(&x[smin], &y[tmin]) {
        smin += 1;
        tmin += 1;
    }

    while smax > smin && tmax > tmin && eq(&x[smax - 1], &y[tmax - 1]) {
        smax -= 1;
        tmax -= 1;
    }

    (smin, smax, tmin, tmax)
}

/// Fill the result vectors directly when one side of the change window is
/// empty. Returns false if the window needs a real comparison.
fn handle_trivial(
    rx: &mut [bool],
    ry: &mut [bool],
    smin: usize,
    smax: usize,
    tmin: usize,
    tmax: usize,
) -> bool {
    match (smin == smax, tmin == tmax) {
        (false, true) => {
            for s in smin..smax {
                rx[s] = true;
            }
            true
        }
        (true, false) => {
            for t in tmin..tmax {
                ry[t] = true;
            }
            true
        }
        (true, true) => true,
        (false, false) => false,
    }
}

fn diff_default(rx: &mut [bool], ry: &mut [bool], red: &Reduced, force_anchoring: bool) {
    let (mut m, w) = Myers::new(&red.x0, &red.y0, IdEq, &red.xidx, &red.yidx, rx, ry);

    // Heuristic (ANCHORING): for large inputs with anchors, partition the
    // problem at the longest common subsequence of the anchors and run the
    // engine on each gap independently. This bounds the cost of any single
    // engine run and tends to produce better output than letting the other
    // heuristics fire on one huge rectangle.
    let anchoring = red.n_anchors > 0 && red.x0.len() + red.y0.len() >= ANCHORING_MIN_INPUT_LEN;
    if anchoring || force_anchoring {
        let (smax0, tmax0) = (w.smax as usize, w.tmax as usize);
        let segments = prep::anchors(
            w.smin as usize,
            smax0,
            w.tmin as usize,
            tmax0,
            red.n_anchors,
            &red.counts,
            &red.x0,
            &red.y0,
        );
        let mut done = segments[0];
        for &anchor in &segments[1..] {
            if anchor.s < done.s {
                // Swallowed by the forward extension of an earlier anchor.
                continue;
            }

            // Grow the matching region around the anchor as far as it goes.
            let mut start = anchor;
            while start.s > done.s && start.t > done.t && red.x0[start.s - 1] == red.y0[start.t - 1]
            {
                start.s -= 1;
                start.t -= 1;
            }
            let mut end = anchor;
            while end.s < smax0 && end.t < tmax0 && red.x0[end.s] == red.y0[end.t] {
                end.s += 1;
                end.t += 1;
            }

            // The gap between the previous matching region and this one has
            // no common prefix or suffix by construction.
            m.compare(
                done.s as isize,
                start.s as isize,
                done.t as isize,
                start.t as isize,
                false,
            );

            if end.s >= smax0 && end.t >= tmax0 {
                break;
            }
            done = end;
        }
    } else {
        m.compare(w.smin, w.smax, w.tmin, w.tmax, false);
    }
}

/// Fast mode: patience-style output. Everything outside the matching regions
/// linked by the anchor LCS is marked deleted or inserted outright; the
/// engine never runs.
fn diff_fast(rx: &mut [bool], ry: &mut [bool], red: &Reduced) {
    let (smin0, smax0, tmin0, tmax0) = change_bounds(&red.x0, &red.y0, |a: &usize, b: &usize| a == b);
    let segments = prep::anchors(
        smin0,
        smax0,
        tmin0,
        tmax0,
        red.n_anchors,
        &red.counts,
        &red.x0,
        &red.y0,
    );
    let mut done = segments[0];
    for &anchor in &segments[1..] {
        if anchor.s < done.s {
            continue;
        }

        let mut start = anchor;
        while start.s > done.s && start.t > done.t && red.x0[start.s - 1] == red.y0[start.t - 1] {
            start.s -= 1;
            start.t -= 1;
        }
        let mut end = anchor;
        while end.s < smax0 && end.t < tmax0 && red.x0[end.s] == red.y0[end.t] {
            end.s += 1;
            end.t += 1;
        }

        for s in done.s..start.s {
            rx[red.xidx[s]] = true;
        }
        for t in done.t..start.t {
            ry[red.yidx[t]] = true;
        }

        if end.s >= smax0 && end.t >= tmax0 {
            break;
        }
        done = end;
    }
}
