//! Preprocessing that reduces the problem size before the engine runs.
//!
//! The pass does several things in one sweep over the change window:
//!
//! * Assign a dense integer ID to every distinct element so the engine can
//!   compare integers instead of `T`s.
//! * Drop elements that appear on only one side. They are unconditionally
//!   deletions or insertions and marking them up front shrinks the input the
//!   engine ever sees, which is where most of the speedup for large diffs
//!   comes from.
//! * Find the anchors: elements that appear exactly once on each side.
//!   Occurrences are counted as 0/1/many with weight 1 per occurrence in `x`
//!   and weight 4 per occurrence in `y`, so a final count of `1 + 4` means
//!   the element is an anchor and a count `> 4` means it appears on both
//!   sides.

use std::collections::HashMap;
use std::hash::Hash;

/// The reduced problem: `x0`/`y0` hold the IDs of the elements that appear on
/// both sides, `xidx`/`yidx` map their positions back to positions in the
/// original inputs, and `counts[id]` holds the occurrence count described in
/// the module documentation.
pub(crate) struct Reduced {
    pub x0: Vec<usize>,
    pub y0: Vec<usize>,
    pub xidx: Vec<usize>,
    pub yidx: Vec<usize>,
    pub counts: Vec<u8>,
    pub n_anchors: usize,
}

/// Reduce `x[smin..smax]` and `y[tmin..tmax]`, marking one-sided elements in
/// `rx`/`ry` as they are found.
pub(crate) fn reduce<T: Hash + Eq>(
    rx: &mut [bool],
    ry: &mut [bool],
    smin: usize,
    smax: usize,
    tmin: usize,
    tmax: usize,
    x: &[T],
    y: &[T],
) -> Reduced {
    let mut ids: HashMap<&T, usize> = HashMap::with_capacity(smax - smin);
    let mut counts: Vec<u8> = Vec::with_capacity(smax - smin);

    // Step 1: assign an ID to every element of x[smin..smax] and count
    // occurrences, saturating at 2.
    let mut x0 = Vec::with_capacity(smax - smin);
    for e in &x[smin..smax] {
        let next = ids.len();
        let id = *ids.entry(e).or_insert(next);
        if id == counts.len() {
            counts.push(0);
        }
        if counts[id] < 2 {
            counts[id] += 1;
        }
        x0.push(id);
    }

    // Step 2: walk y. Elements absent from x are immediate insertions;
    // everything else is retained and counted with weight 4, saturating once
    // the count reaches 8.
    let mut y0 = Vec::with_capacity(tmax - tmin);
    let mut yidx = Vec::with_capacity(tmax - tmin);
    for (i, e) in y[tmin..tmax].iter().enumerate() {
        let t = tmin + i;
        match ids.get(e) {
            None => ry[t] = true,
            Some(&id) => {
                if counts[id] < 8 {
                    counts[id] += 4;
                }
                yidx.push(t);
                y0.push(id);
            }
        }
    }

    // Step 3: filter out elements of x that never appeared in y. A count of
    // at most 4 means no occurrence in y, which makes the position an
    // immediate deletion.
    let mut xidx = Vec::with_capacity(x0.len());
    let mut n_anchors = 0;
    let mut i = 0;
    for j in 0..x0.len() {
        let id = x0[j];
        let c = counts[id];
        if c > 4 {
            xidx.push(j + smin);
            x0[i] = id;
            if c == 1 + 4 {
                // Exactly once in x (1) and once in y (4).
                n_anchors += 1;
            }
            i += 1;
        } else {
            rx[j + smin] = true;
        }
    }
    x0.truncate(i);

    Reduced {
        x0,
        y0,
        xidx,
        yidx,
        counts,
        n_anchors,
    }
}

/// An anchor position pair: the element at `x0[s]` is the same as the one at
/// `y0[t]` and occurs nowhere else on either side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub s: usize,
    pub t: usize,
}

/// Compute the longest common subsequence of the anchors inside the window
/// `[smin, smax) x [tmin, tmax)` of `x0`/`y0` and return it with a sentinel
/// pair prepended at the window start and appended at the window end.
///
/// Anchor values are globally unique on both sides, so this is the special
/// case of the LCS problem solved by Algorithm A in Thomas G. Szymanski,
/// "A Special Case of the Maximal Common Subsequence Problem", Princeton
/// TR #170 (1975): an increasing-subsequence computation over the permutation
/// that maps x-anchor order to y-anchor order.
pub(crate) fn anchors(
    smin: usize,
    smax: usize,
    tmin: usize,
    tmax: usize,
    n_anchors: usize,
    counts: &[u8],
    x0: &[usize],
    y0: &[usize],
) -> Vec<Anchor> {
    // Gather the anchor positions:
    //   yi[j]  = increasing positions of anchors in y0
    //   xi[i]  = increasing positions of anchors in x0
    //   inv[i] = rank j such that x0[xi[i]] == y0[yi[j]]
    let mut rank: HashMap<usize, usize> = HashMap::with_capacity(n_anchors);
    let mut yi = Vec::with_capacity(n_anchors);
    for (i, &e) in y0[tmin..tmax].iter().enumerate() {
        let t = tmin + i;
        if counts[e] == 1 + 4 {
            rank.insert(e, yi.len());
            yi.push(t);
        }
    }
    let mut xi = Vec::with_capacity(n_anchors);
    let mut inv = Vec::with_capacity(n_anchors);
    for (i, &e) in x0[smin..smax].iter().enumerate() {
        let s = smin + i;
        if counts[e] == 1 + 4 {
            xi.push(s);
            inv.push(rank[&e]);
        }
    }

    // Algorithm A, with A = J = inv and B = [0, n): tails[l] is the smallest
    // value ending an increasing subsequence of length l + 1 and lis[i] the
    // length of the longest increasing run ending at i.
    let j = inv;
    let n = xi.len();
    let mut tails = vec![n + 1; n];
    let mut lis = vec![0usize; n];
    for i in 0..n {
        let l = tails.partition_point(|&v| v < j[i]);
        tails[l] = j[i];
        lis[i] = l + 1;
    }
    let mut k = lis.iter().copied().max().unwrap_or(0);

    // Reconstruct the subsequence right to left. Walking by decreasing run
    // length keeps the picked ranks increasing.
    let mut out = vec![Anchor { s: 0, t: 0 }; 2 + k];
    out[1 + k] = Anchor { s: smax, t: tmax };
    let lastj = n;
    for i in (0..n).rev() {
        if k > 0 && lis[i] == k && j[i] < lastj {
            out[k] = Anchor {
                s: xi[i],
                t: yi[j[i]],
            };
            k -= 1;
        }
    }
    out[0] = Anchor { s: smin, t: tmin };
    out
}
