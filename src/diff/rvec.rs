//! The result-vector representation shared by the engine and every
//! downstream pass.
//!
//! A diff of `x` and `y` is a pair of bool vectors: `rx[s]` is set when
//! position `s` of `x` is deleted and `ry[t]` when position `t` of `y` is
//! inserted. Walking both cursors from `(0, 0)`, consuming deletions while
//! `rx[s]`, insertions while `ry[t]` and a match otherwise, visits every edit
//! in order and terminates at `(len(x), len(y))`. Each vector carries one
//! trailing element that is never set, so the walk can index `rx[s]`/`ry[t]`
//! without a bounds check at the end of either side.
//!
//! The representation costs no per-edit allocation and every consumer (hunk
//! grouping, the indent heuristic, formatting) is a natural cursor walk over
//! it. The indent heuristic additionally relies on being able to move group
//! boundaries by flipping individual bits in place.

/// Allocate a result-vector pair for inputs of length `n` and `m`.
pub(crate) fn make(n: usize, m: usize) -> (Vec<bool>, Vec<bool>) {
    (vec![false; n + 1], vec![false; m + 1])
}

/// A contiguous block of edits located in both inputs, before any elements
/// are attached: `[s0, s1) x [t0, t1)` plus the number of edit records (of
/// any kind, matches included) inside the block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawHunk {
    pub s0: usize,
    pub s1: usize,
    pub t0: usize,
    pub t1: usize,
    pub nedits: usize,
}

/// Group the edits in `rx`/`ry` into hunks with `context` matches of leading
/// and trailing context.
///
/// Two consecutive hunks are always separated by strictly more than
/// `2 * context` matches; anything closer is merged into a single hunk.
pub(crate) fn hunks(rx: &[bool], ry: &[bool], context: usize) -> Vec<RawHunk> {
    let n = rx.len() - 1;
    let m = ry.len() - 1;

    let mut hunks: Vec<RawHunk> = Vec::new();
    let (mut s, mut t) = (0, 0); // current position in x, y
    let mut open: Option<(usize, usize)> = None; // start of the current hunk
    let mut d = 0; // number of edit records in the current hunk
    let mut run = 0; // number of consecutive matches

    while s < n || t < m {
        if rx[s] || ry[t] {
            run = 0;

            if open.is_none() {
                // Start a new hunk, backfilling up to `context` matches, or
                // continue the previous hunk when the context windows of the
                // two would overlap.
                let mut s0 = s.saturating_sub(context);
                let mut t0 = t.saturating_sub(context);
                d = s - s0;
                if let Some(&prev) = hunks.last() {
                    if prev.s1 >= s0 {
                        hunks.pop();
                        d = prev.nedits + (s - prev.s1);
                        s0 = prev.s0;
                        t0 = prev.t0;
                    }
                }
                open = Some((s0, t0));
            }

            // Consume the whole run of deletions, then the whole run of
            // insertions. This grouping is the sole reason deletions always
            // precede insertions in the output.
            while s < n && rx[s] {
                s += 1;
                d += 1;
            }
            while t < m && ry[t] {
                t += 1;
                d += 1;
            }
        } else {
            while s < n && t < m && !rx[s] && !ry[t] {
                s += 1;
                t += 1;
                run += 1;
                d += 1;
            }
        }

        // Close the hunk once enough matches accumulated that the next edit
        // cannot reach back into this hunk's context, trimming the trailing
        // matches down to the requested context.
        if let Some((s0, t0)) = open {
            if run > 2 * context || (s == n && t == m) {
                let trim = run.saturating_sub(context);
                hunks.push(RawHunk {
                    s0,
                    s1: s - trim,
                    t0,
                    t1: t - trim,
                    nedits: d - trim,
                });
                open = None;
            }
        }
    }

    hunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vecs(rx: &[u8], ry: &[u8]) -> (Vec<bool>, Vec<bool>) {
        let mut rx: Vec<bool> = rx.iter().map(|&b| b != 0).collect();
        let mut ry: Vec<bool> = ry.iter().map(|&b| b != 0).collect();
        rx.push(false);
        ry.push(false);
        (rx, ry)
    }

    #[test]
    fn no_edits_no_hunks() {
        let (rx, ry) = vecs(&[0, 0, 0], &[0, 0, 0]);
        assert_eq!(hunks(&rx, &ry, 3), vec![]);
    }

    #[test]
    fn single_replacement() {
        // x = a b c, y = a X c
        let (rx, ry) = vecs(&[0, 1, 0], &[0, 1, 0]);
        assert_eq!(
            hunks(&rx, &ry, 3),
            vec![RawHunk {
                s0: 0,
                s1: 3,
                t0: 0,
                t1: 3,
                nedits: 4
            }]
        );
    }

    #[test]
    fn trailing_context_is_trimmed() {
        // One deletion at the start followed by a long run of matches.
        let (rx, ry) = vecs(&[1, 0, 0, 0, 0, 0, 0, 0], &[0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            hunks(&rx, &ry, 1),
            vec![RawHunk {
                s0: 0,
                s1: 2,
                t0: 0,
                t1: 1,
                nedits: 2
            }]
        );
    }

    #[test]
    fn nearby_edits_share_a_hunk() {
        // Edits two matches apart with context 1: the separating run is not
        // longer than 2 * context, so a single hunk covers both.
        let (rx, ry) = vecs(&[1, 0, 0, 1, 0], &[0, 0, 0]);
        assert_eq!(
            hunks(&rx, &ry, 1),
            vec![RawHunk {
                s0: 0,
                s1: 5,
                t0: 0,
                t1: 3,
                nedits: 5
            }]
        );
    }

    #[test]
    fn distant_edits_split_into_hunks() {
        let (rx, ry) = vecs(&[1, 0, 0, 0, 0, 0, 1], &[0, 0, 0, 0, 0]);
        assert_eq!(
            hunks(&rx, &ry, 1),
            vec![
                RawHunk {
                    s0: 0,
                    s1: 2,
                    t0: 0,
                    t1: 1,
                    nedits: 2
                },
                RawHunk {
                    s0: 5,
                    s1: 7,
                    t0: 4,
                    t1: 5,
                    nedits: 2
                },
            ]
        );
    }

    #[test]
    fn zero_context_hunks_are_bare() {
        let (rx, ry) = vecs(&[1, 0, 1, 0], &[0, 1, 0]);
        assert_eq!(
            hunks(&rx, &ry, 0),
            vec![
                RawHunk {
                    s0: 0,
                    s1: 1,
                    t0: 0,
                    t1: 0,
                    nedits: 1
                },
                RawHunk {
                    s0: 2,
                    s1: 3,
                    t0: 1,
                    t1: 2,
                    nedits: 2
                },
            ]
        );
    }
}
