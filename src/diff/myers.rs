//! Bidirectional, linear-space implementation of Myers' diff algorithm.
//!
//! A D-path is a path through the edit graph which starts at (0,0) and has
//! exactly D non-diagonal edges. Every D-path consists of a (D - 1)-path
//! followed by a non-diagonal edge and then a possibly empty sequence of
//! diagonal edges called a snake. The middle-snake refinement runs the basic
//! greedy search simultaneously from the top-left and bottom-right corners of
//! a rectangle until the two frontiers overlap, yielding a snake that lies on
//! an optimal path. Recursing into the two sub-rectangles around that snake
//! gives linear space usage.
//!
//! Two heuristics bound the cost on pathological inputs when an optimal
//! result was not requested:
//!
//! * GOOD_DIAGONAL accepts a sufficiently long snake near the middle once the
//!   search has become expensive, instead of insisting on an optimal split.
//! * TOO_EXPENSIVE gives up entirely past a cost limit and splits at the
//!   furthest reaching endpoint found so far.
//!
//! Reference: Myers, E.W. "An O(ND) difference algorithm and its variations",
//! Algorithmica 1, 251-266 (1986).

use std::ops::{Index, IndexMut};

// The TOO_EXPENSIVE heuristic only kicks in past this cost, so small inputs
// are always diffed optimally.
const MIN_COST_LIMIT: isize = 4096;

// Constants for the GOOD_DIAGONAL heuristic.
const GOOD_DIAG_MIN_LEN: isize = 20; // minimal length for a diagonal to be considered
const GOOD_DIAG_COST_LIMIT: isize = 256; // only applied once the cost exceeds this
const GOOD_DIAG_MAGIC: isize = 4; // scoring threshold factor

/// Witness for element equality.
///
/// The engine is generic over the witness so that the integer hot path (IDs
/// assigned by the preprocessor, compared with `==`) and the caller-supplied
/// closure path share one implementation without paying for an indirect call
/// in the integer case.
pub(crate) trait EqWitness<T: ?Sized> {
    fn eq(&self, a: &T, b: &T) -> bool;
}

/// Equality witness for preprocessor-assigned integer IDs.
pub(crate) struct IdEq;

impl EqWitness<usize> for IdEq {
    #[inline]
    fn eq(&self, a: &usize, b: &usize) -> bool {
        a == b
    }
}

/// Equality witness wrapping a caller-supplied closure.
pub(crate) struct EqFn<F>(pub F);

impl<T, F> EqWitness<T> for EqFn<F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn eq(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// `V` contains the endpoints of the furthest reaching d-paths. For each
/// recorded endpoint `(s,t)` on diagonal `k`, only `s` is retained because
/// `t` can be computed from `s - k`.
///
/// `k` can take on negative values, so `V` is a light-weight wrapper around a
/// `Vec` plus an `offset` that maps the valid range of `k` back to indices
/// `>= 0`. The two extra border slots let the search loops write sentinels
/// just outside the active range instead of special-casing the boundary.
#[derive(Debug)]
struct V {
    offset: isize,
    v: Vec<isize>,
}

impl V {
    fn new(len: usize, offset: usize) -> Self {
        Self {
            offset: offset as isize,
            v: vec![0; len],
        }
    }
}

impl Index<isize> for V {
    type Output = isize;

    fn index(&self, index: isize) -> &Self::Output {
        &self.v[(index + self.offset) as usize]
    }
}

impl IndexMut<isize> for V {
    fn index_mut(&mut self, index: isize) -> &mut Self::Output {
        &mut self.v[(index + self.offset) as usize]
    }
}

/// A change window: the rectangle `[smin, smax) x [tmin, tmax)` that remains
/// after stripping the common prefix and suffix.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Window {
    pub smin: isize,
    pub smax: isize,
    pub tmin: isize,
    pub tmax: isize,
}

/// A sequence of diagonal edges (possibly empty) in the middle of a path,
/// plus the optimality obligations for the two rectangles surrounding it.
#[derive(Copy, Clone, Debug)]
struct Split {
    s0: isize,
    s1: isize,
    t0: isize,
    t1: isize,
    // Whether the halves before and after the diagonal must still be
    // searched optimally. A heuristic split hands back exactly one half
    // that may keep using heuristics.
    opt0: bool,
    opt1: bool,
}

pub(crate) struct Myers<'a, 'r, T, E> {
    // Inputs to compare.
    x: &'a [T],
    y: &'a [T],
    eq: E,

    // v-arrays for the forwards and backwards searches. See [`V`].
    vf: V,
    vb: V,

    // Cost bound for the TOO_EXPENSIVE heuristic.
    cost_limit: isize,

    // Mapping from engine indices to positions in the result vectors. The
    // preprocessor compacts its inputs, so a position here is not a position
    // in the caller's sequence.
    xidx: &'a [usize],
    yidx: &'a [usize],

    // Result vectors owned by the driver and shared across every recursive
    // call, including calls for separate anchor segments.
    rx: &'r mut [bool],
    ry: &'r mut [bool],
}

impl<'a, 'r, T, E> Myers<'a, 'r, T, E>
where
    E: EqWitness<T>,
{
    /// Set up the engine for `x` and `y` and return it together with the
    /// change window left after stripping the common prefix and suffix.
    pub(crate) fn new(
        x: &'a [T],
        y: &'a [T],
        eq: E,
        xidx: &'a [usize],
        yidx: &'a [usize],
        rx: &'r mut [bool],
        ry: &'r mut [bool],
    ) -> (Self, Window) {
        let (mut smin, mut tmin) = (0, 0);
        let (mut smax, mut tmax) = (x.len(), y.len());

        // Strip common prefix.
        while smin < smax && tmin < tmax && eq.eq(&x[smin], &y[tmin]) {
            smin += 1;
            tmin += 1;
        }

        // Strip common suffix.
        while smax > smin && tmax > tmin && eq.eq(&x[smax - 1], &y[tmax - 1]) {
            smax -= 1;
            tmax -= 1;
        }

        let diagonals = (smax - smin) + (tmax - tmin);
        // One slot for the middle point and two for the sentinel borders.
        let vlen = 2 * diagonals + 3;
        let v0 = diagonals + 1;

        // The cost limit approximates the square root of the number of
        // diagonals, bounded from below by MIN_COST_LIMIT.
        let mut cost_limit: isize = 1;
        let mut i = diagonals;
        while i != 0 {
            cost_limit <<= 1;
            i >>= 2;
        }
        let cost_limit = cost_limit.max(MIN_COST_LIMIT);

        let myers = Self {
            x,
            y,
            eq,
            vf: V::new(vlen, v0),
            vb: V::new(vlen, v0),
            cost_limit,
            xidx,
            yidx,
            rx,
            ry,
        };
        let window = Window {
            smin: smin as isize,
            smax: smax as isize,
            tmin: tmin as isize,
            tmax: tmax as isize,
        };
        (myers, window)
    }

    /// Record the edits for an optimal (or, with `optimal` unset,
    /// heuristically good) path from `(smin, tmin)` to `(smax, tmax)`.
    ///
    /// `x[smin..smax]` and `y[tmin..tmax]` must not have a common prefix or a
    /// common suffix.
    pub(crate) fn compare(
        &mut self,
        smin: isize,
        smax: isize,
        tmin: isize,
        tmax: isize,
        optimal: bool,
    ) {
        if smin == smax {
            // x side is empty, everything in [tmin, tmax) is an insertion.
            for t in tmin..tmax {
                self.ry[self.yidx[t as usize]] = true;
            }
        } else if tmin == tmax {
            // y side is empty, everything in [smin, smax) is a deletion.
            for s in smin..smax {
                self.rx[self.xidx[s as usize]] = true;
            }
        } else {
            // Divide around a snake in the middle of the path. The two
            // surrounding rectangles again have no common prefix or suffix,
            // so they can be recursed into directly. The low rectangle is
            // handled first to keep result writes monotonic.
            let split = self.split(smin, smax, tmin, tmax, optimal);
            self.compare(smin, split.s0, tmin, split.t0, split.opt0);
            self.compare(split.s1, smax, split.t1, tmax, split.opt1);
        }
    }

    /// Find the endpoints of a, potentially empty, sequence of diagonals in
    /// the middle of a path from `(smin, tmin)` to `(smax, tmax)`.
    ///
    /// `x[smin..smax]` and `y[tmin..tmax]` must not have a common prefix or a
    /// common suffix, and neither may be empty.
    fn split(&mut self, smin: isize, smax: isize, tmin: isize, tmax: isize, optimal: bool) -> Split {
        let n = smax - smin;
        let m = tmax - tmin;

        // Bounds for k. Since t = s - k, the extremes follow from k = s - t.
        let kmin = smin - tmax;
        let kmax = smax - tmin;

        // Unlike the paper, both searches use one consistent numbering of the
        // diagonals by centering them on different midpoints. Overlap checks
        // then need no k conversion.
        let fmid = smin - tmin;
        let bmid = smax - tmax;
        let (mut fmin, mut fmax) = (fmid, fmid);
        let (mut bmin, mut bmax) = (bmid, bmid);

        // An optimal path has odd length exactly when N - M is odd, which
        // decides on which iterations the two searches can meet.
        let odd = (n - m) % 2 != 0;

        // There is no common prefix or suffix, so there is no 0-path and the
        // d = 0 iteration reduces to seeding the two frontiers. Starting at
        // d = 1 keeps the special case out of the hot k-loops. An upper bound
        // of ceil((N + M) / 2) on the optimal d exists, so the loop can
        // increment d blindly; one of the exits below fires before the
        // v-arrays run out.
        self.vf[fmid] = smin;
        self.vb[bmid] = smax;

        let mut d: isize = 1;
        loop {
            let mut longest_diag = 0;

            // Forwards search.
            //
            // Searching the full range k = [fmid-d, fmid+d] would walk
            // outside the edit grid, so the active range is clipped to the
            // rectangle: shrink inward at a boundary, otherwise widen and
            // plant a sentinel just outside the new range so the k-loop can
            // treat the border like any other slot.
            if fmin > kmin {
                fmin -= 1;
                self.vf[fmin - 1] = isize::MIN;
            } else {
                fmin += 1;
            }
            if fmax < kmax {
                fmax += 1;
                self.vf[fmax + 1] = isize::MIN;
            } else {
                fmax -= 1;
            }

            // Find the furthest reaching forward d-path on every diagonal in
            // the active range. The endpoints of the (d-1)-paths live in the
            // interleaved slots k-1 and k+1, so nothing is overwritten before
            // it is consumed.
            let mut k = fmin;
            while k <= fmax {
                // A furthest reaching d-path is either the furthest reaching
                // (d-1)-path on k-1 followed by a horizontal edge (case 1), or
                // the one on k+1 followed by a vertical edge (case 2), both
                // followed by the longest possible run of diagonal edges. On a
                // tie, case 1 wins: deletions are preferred over insertions.
                let mut s = if self.vf[k - 1] < self.vf[k + 1] {
                    self.vf[k + 1]
                } else {
                    self.vf[k - 1] + 1
                };
                let mut t = s - k;

                let (s0, t0) = (s, t);
                while s < smax && t < tmax && self.eq.eq(&self.x[s as usize], &self.y[t as usize]) {
                    s += 1;
                    t += 1;
                }
                longest_diag = longest_diag.max(s - s0);

                self.vf[k] = s;

                // The searches can only meet on iterations whose parity
                // matches N - M.
                if odd && bmin <= k && k <= bmax && s >= self.vb[k] {
                    return Split {
                        s0,
                        s1: s,
                        t0,
                        t1: t,
                        opt0: true,
                        opt1: true,
                    };
                }
                k += 2;
            }

            // Backwards search, the mirror image of the above. On a tie the
            // vertical edge wins: insertions are preferred over deletions.
            if bmin > kmin {
                bmin -= 1;
                self.vb[bmin - 1] = isize::MAX;
            } else {
                bmin += 1;
            }
            if bmax < kmax {
                bmax += 1;
                self.vb[bmax + 1] = isize::MAX;
            } else {
                bmax -= 1;
            }

            let mut k = bmin;
            while k <= bmax {
                let mut s = if self.vb[k - 1] < self.vb[k + 1] {
                    self.vb[k - 1]
                } else {
                    self.vb[k + 1] - 1
                };
                let mut t = s - k;

                let (s0, t0) = (s, t);
                while s > smin && t > tmin && self.eq.eq(&self.x[(s - 1) as usize], &self.y[(t - 1) as usize])
                {
                    s -= 1;
                    t -= 1;
                }
                longest_diag = longest_diag.max(s0 - s);

                self.vb[k] = s;

                if !odd && fmin <= k && k <= fmax && s <= self.vf[k] {
                    return Split {
                        s0: s,
                        s1: s0,
                        t0: t,
                        t1: t0,
                        opt0: true,
                        opt1: true,
                    };
                }
                k += 2;
            }

            if optimal {
                d += 1;
                continue;
            }

            // Heuristic (GOOD_DIAGONAL): once the search has become costly,
            // accept a long diagonal near the middle as the split point
            // instead of continuing to search for an optimal one. The half
            // the diagonal was found in must be finished optimally, the other
            // half may keep using heuristics.
            if longest_diag >= GOOD_DIAG_MIN_LEN && d >= GOOD_DIAG_COST_LIMIT {
                let mut best: Option<(isize, Split)> = None;

                let mut k = fmin;
                while k <= fmax {
                    let s = self.vf[k];
                    let t = s - k;
                    if s < smin || smax <= s || t < tmin || tmax <= t {
                        k += 2;
                        continue;
                    }
                    // Score by how far the endpoint reaches into the
                    // rectangle, discounted by its distance from the middle.
                    let v = (s - smin) + (t - tmin) - (fmid - d).max(d - fmid);
                    if v > GOOD_DIAG_MAGIC * d && best.map_or(true, |(bv, _)| v >= bv) {
                        let split = self.forward_terminal(k);
                        if split.s1 - split.s0 >= GOOD_DIAG_MIN_LEN {
                            best = Some((v, split));
                        }
                    }
                    k += 2;
                }

                let mut k = bmin;
                while k <= bmax {
                    let s = self.vb[k];
                    let t = s - k;
                    if s < smin || smax <= s || t < tmin || tmax <= t {
                        k += 2;
                        continue;
                    }
                    let v = (smax - s) + (tmax - t) - (bmid - d).max(d - bmid);
                    if v > GOOD_DIAG_MAGIC * d && best.map_or(true, |(bv, _)| v >= bv) {
                        let split = self.backward_terminal(k);
                        if split.s1 - split.s0 >= GOOD_DIAG_MIN_LEN {
                            best = Some((v, split));
                        }
                    }
                    k += 2;
                }

                if let Some((_, split)) = best {
                    return split;
                }
            }

            // Heuristic (TOO_EXPENSIVE): past the cost limit, stop searching
            // and split at the most promising endpoint found so far. The
            // chosen half must be finished optimally (it absorbed the cost
            // already spent), the other half may keep using heuristics.
            if d >= self.cost_limit {
                // Furthest reaching forward endpoint, maximizing s + t.
                let mut fbest: Option<(isize, isize)> = None;
                let mut k = fmin;
                while k <= fmax {
                    let s = self.vf[k];
                    let t = s - k;
                    if smin <= s
                        && s < smax
                        && tmin <= t
                        && t < tmax
                        && fbest.map_or(true, |(b, _)| b < s + t)
                    {
                        fbest = Some((s + t, k));
                    }
                    k += 2;
                }

                // Furthest reaching backward endpoint, minimizing s + t.
                let mut bbest: Option<(isize, isize)> = None;
                let mut k = bmin;
                while k <= bmax {
                    let s = self.vb[k];
                    let t = s - k;
                    if smin <= s
                        && s < smax
                        && tmin <= t
                        && t < tmax
                        && bbest.map_or(true, |(b, _)| s + t < b)
                    {
                        bbest = Some((s + t, k));
                    }
                    k += 2;
                }

                // Pick the side with the smaller shortfall from its corner.
                return match (fbest, bbest) {
                    (Some((f, fk)), Some((b, _))) if (smax + tmax) - b < f - (smin + tmin) => {
                        self.forward_terminal(fk)
                    }
                    (Some((_, fk)), None) => self.forward_terminal(fk),
                    (_, Some((_, bk))) => self.backward_terminal(bk),
                    (None, None) => panic!("no furthest reaching path inside the rectangle"),
                };
            }

            d += 1;
        }
    }

    // Reconstruct the terminating diagonal of the furthest reaching forward
    // path on diagonal k. By construction, the path arrives over a horizontal
    // or vertical edge from the predecessor diagonal followed by a possibly
    // empty run of diagonal edges; redoing the predecessor decision recovers
    // that run.
    fn forward_terminal(&self, k: isize) -> Split {
        let s = self.vf[k];
        let t = s - k;
        let pk = if self.vf[k - 1] < self.vf[k + 1] {
            k + 1
        } else {
            k - 1
        };
        let ps = self.vf[pk];
        let pt = ps - pk;
        let diag = (s - ps).min(t - pt);
        Split {
            s0: s - diag,
            s1: s,
            t0: t - diag,
            t1: t,
            opt0: true,
            opt1: false,
        }
    }

    // Mirror of [`Myers::forward_terminal`] for the backward search.
    fn backward_terminal(&self, k: isize) -> Split {
        let s = self.vb[k];
        let t = s - k;
        let pk = if self.vb[k - 1] < self.vb[k + 1] {
            k - 1
        } else {
            k + 1
        };
        let ps = self.vb[pk];
        let pt = ps - pk;
        let diag = (ps - s).min(pt - t);
        Split {
            s0: s,
            s1: s + diag,
            t0: t,
            t1: t + diag,
            opt0: false,
            opt1: true,
        }
    }
}
