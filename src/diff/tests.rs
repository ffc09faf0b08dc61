use super::*;
use crate::options::Mode;

// Render result vectors as a trace of match/delete/insert steps, walking
// both cursors the way every consumer of the vectors does.
fn render(rx: &[bool], ry: &[bool]) -> String {
    let n = rx.len() - 1;
    let m = ry.len() - 1;
    let mut out = String::new();
    let (mut s, mut t) = (0, 0);
    while s < n || t < m {
        if rx[s] {
            out.push('D');
            s += 1;
        } else if ry[t] {
            out.push('I');
            t += 1;
        } else {
            out.push('M');
            s += 1;
            t += 1;
        }
    }
    out
}

fn split_chars(s: &str) -> Vec<String> {
    s.chars().map(|c| c.to_string()).collect()
}

fn trace_cases() -> Vec<(&'static str, Vec<String>, Vec<String>, String)> {
    vec![
        (
            "identical",
            split_chars("abc"),
            split_chars("abc"),
            "MMM".into(),
        ),
        ("empty", vec![], vec![], "".into()),
        ("x-empty", vec![], split_chars("abc"), "III".into()),
        ("y-empty", split_chars("abc"), vec![], "DDD".into()),
        (
            "ABCABBA_to_CBABAC",
            split_chars("ABCABBA"),
            split_chars("CBABAC"),
            "DIMDMMDMI".into(),
        ),
        (
            "same-prefix",
            vec!["foo".into(), "bar".into()],
            vec!["foo".into(), "baz".into()],
            "MDI".into(),
        ),
        (
            "same-suffix",
            vec!["foo".into(), "bar".into()],
            vec!["loo".into(), "bar".into()],
            "DIM".into(),
        ),
        (
            "largish",
            split_chars(&format!("x{}y", "a".repeat(71))),
            split_chars(&format!("w{}it", "a".repeat(71))),
            // One replacement at the front and one at the back survive the
            // one-sided filtering; everything in between matches.
            format!("DI{}DII", "M".repeat(71)),
        ),
    ]
}

#[test]
fn default_mode_traces() {
    for (name, x, y, want) in trace_cases() {
        let (rx, ry) = diff(&x, &y, Mode::Default, false);
        assert_eq!(render(&rx, &ry), want, "case {name}");
    }
}

#[test]
fn minimal_mode_traces() {
    for (name, x, y, want) in trace_cases() {
        let (rx, ry) = diff(&x, &y, Mode::Minimal, false);
        assert_eq!(render(&rx, &ry), want, "case {name}");
    }
}

#[test]
fn forced_anchoring_traces() {
    for (name, x, y, want) in trace_cases() {
        let (rx, ry) = diff(&x, &y, Mode::Default, true);
        assert_eq!(render(&rx, &ry), want, "case {name}");
    }
}

#[test]
fn diff_func_traces() {
    for (name, x, y, want) in trace_cases() {
        let (rx, ry) = diff_func(&x, &y, |a, b| a == b, Mode::Default);
        assert_eq!(render(&rx, &ry), want, "case {name}");
    }
}

#[test]
fn fast_mode_keeps_anchored_matches() {
    let x = ["q", "A", "r", "B", "s"];
    let y = ["z", "A", "w", "B", "v"];
    let (rx, ry) = diff(&x, &y, Mode::Fast, false);
    assert_eq!(render(&rx, &ry), "DIMDIMDI");
}

#[test]
fn fast_mode_without_anchors_drops_everything() {
    // No element is unique on both sides, so there is nothing to anchor on
    // and fast mode degrades to a full rewrite.
    let x = split_chars("ABCABBA");
    let y = split_chars("CBABAC");
    let (rx, ry) = diff(&x, &y, Mode::Fast, false);
    assert_eq!(render(&rx, &ry), format!("{}{}", "D".repeat(7), "I".repeat(6)));
}

#[test]
fn edits_carry_the_elements() {
    let x = ["foo", "bar"];
    let y = ["foo", "baz"];
    assert_eq!(
        edits(&x, &y),
        vec![
            Edit::Match(&"foo", &"foo"),
            Edit::Delete(&"bar"),
            Edit::Insert(&"baz"),
        ]
    );
}

#[test]
fn edits_of_identical_inputs_are_all_matches() {
    let x = [1, 2, 3];
    assert_eq!(
        edits(&x, &x),
        vec![
            Edit::Match(&1, &1),
            Edit::Match(&2, &2),
            Edit::Match(&3, &3),
        ]
    );
}

#[test]
fn edits_func_matches_edits() {
    let x = ["foo", "bar"];
    let y = ["loo", "bar"];
    assert_eq!(edits(&x, &y), edits_func(&x, &y, |a, b| a == b));
}

#[test]
fn hunks_of_identical_inputs_are_empty() {
    let x = ["foo", "bar", "baz"];
    assert_eq!(hunks(&x, &x), vec![]);
}

#[test]
fn single_hunk_with_context() {
    let x = ["foo", "bar"];
    let y = ["foo", "baz"];
    let got = hunks(&x, &y);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].x_range(), 0..2);
    assert_eq!(got[0].y_range(), 0..2);
    assert_eq!(
        got[0].edits(),
        &[
            Edit::Match(&"foo", &"foo"),
            Edit::Delete(&"bar"),
            Edit::Insert(&"baz"),
        ]
    );
}

#[test]
fn zero_context_hunk_positions() {
    let x = split_chars("ABCABBA");
    let y = split_chars("CBABAC");
    let got = DiffOptions::new().set_context_len(0).hunks(&x, &y);
    let ranges: Vec<_> = got.iter().map(|h| h.x_range()).collect();
    assert_eq!(ranges, vec![0..1, 2..3, 5..6, 7..7]);
}

#[test]
fn two_distant_changes_make_two_hunks() {
    let x = [
        "this paragraph",
        "is not",
        "changed and",
        "barely long",
        "enough to",
        "create a",
        "new hunk",
        "",
        "this paragraph",
        "is going to be",
        "removed",
    ];
    let y = [
        "this is a new paragraph",
        "that is inserted at the top",
        "",
        "this paragraph",
        "is not",
        "changed and",
        "barely long",
        "enough to",
        "create a",
        "new hunk",
    ];
    let got = hunks(&x, &y);
    assert_eq!(got.len(), 2);

    assert_eq!(got[0].x_range(), 0..3);
    assert_eq!(got[0].y_range(), 0..6);
    assert_eq!(
        got[0].edits(),
        &[
            Edit::Insert(&"this is a new paragraph"),
            Edit::Insert(&"that is inserted at the top"),
            Edit::Insert(&""),
            Edit::Match(&"this paragraph", &"this paragraph"),
            Edit::Match(&"is not", &"is not"),
            Edit::Match(&"changed and", &"changed and"),
        ]
    );

    assert_eq!(got[1].x_range(), 4..11);
    assert_eq!(got[1].y_range(), 7..10);
    assert_eq!(
        got[1].edits(),
        &[
            Edit::Match(&"enough to", &"enough to"),
            Edit::Match(&"create a", &"create a"),
            Edit::Match(&"new hunk", &"new hunk"),
            Edit::Delete(&""),
            Edit::Delete(&"this paragraph"),
            Edit::Delete(&"is going to be"),
            Edit::Delete(&"removed"),
        ]
    );
}

#[test]
fn nearby_changes_share_one_hunk() {
    let x = [
        "this paragraph",
        "stays but is",
        "not long enough",
        "to create a",
        "new hunk",
        "",
        "this paragraph",
        "is going to be",
        "removed",
    ];
    let y = [
        "this is a new paragraph",
        "that is inserted at the top",
        "",
        "this paragraph",
        "stays but is",
        "not long enough",
        "to create a",
        "new hunk",
    ];
    let got = hunks(&x, &y);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].x_range(), 0..9);
    assert_eq!(got[0].y_range(), 0..8);
}

// Deterministic xorshift so the larger inputs below need no dependency and
// reproduce exactly.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut v = self.0;
        v ^= v << 13;
        v ^= v >> 7;
        v ^= v << 17;
        self.0 = v;
        v
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

// Check that applying the edit script to x reproduces y and that matches
// only pair equal elements.
fn check_reconstruction<T: Hash + Eq + Clone + std::fmt::Debug>(x: &[T], y: &[T], mode: Mode) {
    let (rx, ry) = diff(x, y, mode, false);
    let trace = render(&rx, &ry);
    let mut rebuilt = Vec::new();
    let (mut s, mut t) = (0, 0);
    for op in trace.chars() {
        match op {
            'D' => s += 1,
            'I' => {
                rebuilt.push(y[t].clone());
                t += 1;
            }
            'M' => {
                assert_eq!(x[s], y[t], "match pairs unequal elements");
                rebuilt.push(y[t].clone());
                s += 1;
                t += 1;
            }
            _ => unreachable!(),
        }
    }
    assert_eq!((s, t), (x.len(), y.len()), "walk did not consume the inputs");
    assert_eq!(rebuilt, y);
}

#[test]
fn anchored_diff_of_large_inputs_reconstructs() {
    // Repetitive bodies with unique markers sprinkled in, so the anchoring
    // path triggers naturally (input size over the threshold, anchors
    // present).
    let mut rng = Rng(0x9e3779b97f4a7c15);
    let mut x: Vec<u32> = (0..6000).map(|_| rng.below(40) as u32).collect();
    let mut y: Vec<u32> = x.clone();
    for i in 0..60 {
        x[i * 100 + 3] = 10_000 + i as u32;
        y[i * 100 + 7] = 10_000 + i as u32;
    }
    for _ in 0..300 {
        let i = rng.below(6000) as usize;
        y[i] = rng.below(40) as u32;
    }
    check_reconstruction(&x, &y, Mode::Default);
    check_reconstruction(&x, &y, Mode::Fast);
}

#[test]
fn cost_limited_diff_reconstructs() {
    // Random inputs without anchors whose optimal diff is more expensive
    // than the cost limit, forcing the heuristic splits.
    let mut rng = Rng(0x2545f4914f6cdd1d);
    let x: Vec<u32> = (0..3500).map(|_| rng.below(40) as u32).collect();
    let y: Vec<u32> = (0..3500).map(|_| rng.below(40) as u32).collect();
    check_reconstruction(&x, &y, Mode::Default);
}

#[test]
fn planted_diagonals_reconstruct() {
    // Long identical runs inside otherwise noisy inputs give the engine
    // good diagonals to split on once the search gets expensive.
    let mut rng = Rng(0xdeadbeefcafef00d);
    let mut x: Vec<u32> = Vec::new();
    let mut y: Vec<u32> = Vec::new();
    for block in 0..10 {
        for _ in 0..150 {
            x.push(rng.below(8) as u32);
        }
        for _ in 0..150 {
            y.push(rng.below(8) as u32);
        }
        for i in 0..30 {
            let v = 100 + block * 30 + i;
            x.push(v);
            y.push(v);
        }
    }
    check_reconstruction(&x, &y, Mode::Default);
    check_reconstruction(&x, &y, Mode::Minimal);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn count_ops(edits: &[Edit<'_, i32>]) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for e in edits {
            match e {
                Edit::Match(..) => counts.0 += 1,
                Edit::Delete(_) => counts.1 += 1,
                Edit::Insert(_) => counts.2 += 1,
            }
        }
        counts
    }

    proptest! {
        // Applying the edit script to x yields y, for every mode.
        #[test]
        fn reconstruction(
            x in proptest::collection::vec(0..5i32, 0..40),
            y in proptest::collection::vec(0..5i32, 0..40),
        ) {
            for mode in [Mode::Minimal, Mode::Default, Mode::Fast] {
                let mut opts = DiffOptions::new();
                match mode {
                    Mode::Minimal => { opts.minimal(); }
                    Mode::Default => {}
                    Mode::Fast => { opts.fast(); }
                }
                let edits = opts.edits(&x, &y);
                let mut rebuilt = Vec::new();
                for e in &edits {
                    match e {
                        Edit::Match(a, b) => {
                            prop_assert_eq!(*a, *b);
                            rebuilt.push(**b);
                        }
                        Edit::Delete(_) => {}
                        Edit::Insert(b) => rebuilt.push(**b),
                    }
                }
                prop_assert_eq!(&rebuilt, &y);
            }
        }

        // The op counts agree with the input lengths.
        #[test]
        fn op_counts_are_consistent(
            x in proptest::collection::vec(0..5i32, 0..40),
            y in proptest::collection::vec(0..5i32, 0..40),
        ) {
            let e = edits(&x, &y);
            let (matches, deletes, inserts) = count_ops(&e);
            prop_assert_eq!(matches + deletes, x.len());
            prop_assert_eq!(matches + inserts, y.len());
        }

        // Identical inputs give matches only and no hunks.
        #[test]
        fn identity(x in proptest::collection::vec(0..5i32, 0..40)) {
            let e = edits(&x, &x);
            let (matches, deletes, inserts) = count_ops(&e);
            prop_assert_eq!(matches, x.len());
            prop_assert_eq!(deletes + inserts, 0);
            prop_assert!(hunks(&x, &x).is_empty());
        }

        // A minimal diff is never longer than a default or fast one, and no
        // diff is longer than a full rewrite.
        #[test]
        fn minimal_is_shortest(
            x in proptest::collection::vec(0..5i32, 0..40),
            y in proptest::collection::vec(0..5i32, 0..40),
        ) {
            let cost = |e: &[Edit<'_, i32>]| {
                let (_, deletes, inserts) = count_ops(e);
                deletes + inserts
            };
            let minimal = cost(&DiffOptions::new().minimal().edits(&x, &y));
            let default = cost(&edits(&x, &y));
            let fast = cost(&DiffOptions::new().fast().edits(&x, &y));
            prop_assert!(minimal <= default);
            prop_assert!(minimal <= fast);
            prop_assert!(default <= x.len() + y.len());
            prop_assert!(fast <= x.len() + y.len());
        }

        // Consecutive hunks are separated and context never exceeds the
        // configured length.
        #[test]
        fn hunk_separation_and_context(
            x in proptest::collection::vec(0..5i32, 0..40),
            y in proptest::collection::vec(0..5i32, 0..40),
            context in 0..4usize,
        ) {
            let hunks = DiffOptions::new().set_context_len(context).hunks(&x, &y);
            for pair in hunks.windows(2) {
                // At least one match row between two hunks belongs to
                // neither, so the original edit runs they were built from
                // are more than 2 * context apart.
                prop_assert!(pair[1].x_range().start > pair[0].x_range().end);
                prop_assert!(pair[1].y_range().start > pair[0].y_range().end);
            }
            for h in &hunks {
                let leading = h
                    .edits()
                    .iter()
                    .take_while(|e| matches!(e, Edit::Match(..)))
                    .count();
                let trailing = h
                    .edits()
                    .iter()
                    .rev()
                    .take_while(|e| matches!(e, Edit::Match(..)))
                    .count();
                prop_assert!(leading <= context);
                prop_assert!(trailing <= context);
                prop_assert!(!h.edits().is_empty());
            }
        }

        // Hunk ranges and their edits agree.
        #[test]
        fn hunk_ranges_cover_their_edits(
            x in proptest::collection::vec(0..5i32, 0..40),
            y in proptest::collection::vec(0..5i32, 0..40),
        ) {
            for h in hunks(&x, &y) {
                let (matches, deletes, inserts) = count_ops(h.edits());
                prop_assert_eq!(h.x_range().len(), matches + deletes);
                prop_assert_eq!(h.y_range().len(), matches + inserts);
            }
        }

        // The generic engine agrees with its own contract even without the
        // preprocessor.
        #[test]
        fn func_variant_reconstruction(
            x in proptest::collection::vec(0..5i32, 0..30),
            y in proptest::collection::vec(0..5i32, 0..30),
        ) {
            let edits = edits_func(&x, &y, |a, b| a == b);
            let mut rebuilt = Vec::new();
            for e in &edits {
                match e {
                    Edit::Match(a, b) => {
                        prop_assert_eq!(*a, *b);
                        rebuilt.push(**b);
                    }
                    Edit::Delete(_) => {}
                    Edit::Insert(b) => rebuilt.push(**b),
                }
            }
            prop_assert_eq!(&rebuilt, &y);
        }
    }
}
