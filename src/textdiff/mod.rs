//! Line-by-line comparison of text.
//!
//! Text is split into lines that keep their trailing newline character, so
//! edits and hunks can be concatenated back into the original inputs and a
//! missing newline at the end of an input stays observable.

use crate::diff::{self, rvec, Edit, Hunk};
use crate::options::{
    check_allowed, TextOptions, OPT_CONTEXT, OPT_FAST, OPT_INDENT_HEURISTIC, OPT_MINIMAL,
};
use std::ops;

mod format;
mod indent;
pub(crate) mod lines;

pub use format::UnifiedFormatter;

use lines::split_lines;

/// Compare the lines of `x` and `y` and return an edit for every line of
/// both inputs.
pub fn edits<'a>(x: &'a str, y: &'a str) -> Vec<Edit<'a, str>> {
    TextOptions::new().edits(x, y)
}

/// Compare the lines of `x` and `y` and return the changes grouped into
/// hunks with three lines of context.
pub fn hunks<'a>(x: &'a str, y: &'a str) -> Vec<Hunk<'a, str>> {
    TextOptions::new().hunks(x, y)
}

/// Compare the lines of `x` and `y` and return the changes in unified
/// format. Identical inputs produce an empty string.
///
/// ```
/// use seqdiff::textdiff;
///
/// let diff = textdiff::unified("a\nb\nc\n", "a\nx\nc\n");
/// assert_eq!(diff, "@@ -1,3 +1,3 @@\n a\n-b\n+x\n c\n");
/// ```
pub fn unified(x: &str, y: &str) -> String {
    TextOptions::new().unified(x, y)
}

impl TextOptions {
    /// Compare the lines of `x` and `y` with these options and return an
    /// edit for every line of both inputs.
    ///
    /// # Panics
    ///
    /// Panics if an option that has no meaning for plain edit output, such as
    /// the context length, was set.
    pub fn edits<'a>(&self, x: &'a str, y: &'a str) -> Vec<Edit<'a, str>> {
        check_allowed(
            self.set,
            OPT_MINIMAL | OPT_FAST | OPT_INDENT_HEURISTIC,
            "edits",
        );
        let (xlines, ylines, rx, ry) = self.vectors(x, y);
        walk_line_edits(&xlines, &ylines, &rx, &ry, 0..xlines.len(), 0..ylines.len())
    }

    /// Compare the lines of `x` and `y` with these options and return the
    /// changes grouped into hunks.
    pub fn hunks<'a>(&self, x: &'a str, y: &'a str) -> Vec<Hunk<'a, str>> {
        check_allowed(
            self.set,
            OPT_CONTEXT | OPT_MINIMAL | OPT_FAST | OPT_INDENT_HEURISTIC,
            "hunks",
        );
        self.hunks_impl(x, y)
    }

    /// Compare the lines of `x` and `y` with these options and return the
    /// changes in unified format.
    pub fn unified(&self, x: &str, y: &str) -> String {
        check_allowed(
            self.set,
            OPT_CONTEXT | OPT_MINIMAL | OPT_FAST | OPT_INDENT_HEURISTIC,
            "unified",
        );
        let hunks = self.hunks_impl(x, y);
        let formatted = UnifiedFormatter::new().fmt_hunks(&hunks).to_string();
        formatted
    }

    fn hunks_impl<'a>(&self, x: &'a str, y: &'a str) -> Vec<Hunk<'a, str>> {
        let (xlines, ylines, rx, ry) = self.vectors(x, y);
        rvec::hunks(&rx, &ry, self.context_len)
            .into_iter()
            .map(|h| {
                let edits = walk_line_edits(&xlines, &ylines, &rx, &ry, h.s0..h.s1, h.t0..h.t1);
                Hunk::new(h.s0..h.s1, h.t0..h.t1, edits)
            })
            .collect()
    }

    fn vectors<'a>(&self, x: &'a str, y: &'a str) -> (Vec<&'a str>, Vec<&'a str>, Vec<bool>, Vec<bool>) {
        let xlines = split_lines(x);
        let ylines = split_lines(y);
        let (mut rx, mut ry) = diff::diff(&xlines, &ylines, self.mode, false);
        if self.indent_heuristic {
            indent::apply(&xlines, &ylines, &mut rx, &mut ry);
        }
        (xlines, ylines, rx, ry)
    }
}

fn walk_line_edits<'a>(
    xlines: &[&'a str],
    ylines: &[&'a str],
    rx: &[bool],
    ry: &[bool],
    s_range: ops::Range<usize>,
    t_range: ops::Range<usize>,
) -> Vec<Edit<'a, str>> {
    let mut edits = Vec::new();
    let (mut s, mut t) = (s_range.start, t_range.start);
    while s < s_range.end || t < t_range.end {
        if s < s_range.end && rx[s] {
            edits.push(Edit::Delete(xlines[s]));
            s += 1;
        } else if t < t_range.end && ry[t] {
            edits.push(Edit::Insert(ylines[t]));
            t += 1;
        } else {
            edits.push(Edit::Match(xlines[s], ylines[t]));
            s += 1;
            t += 1;
        }
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TextOptions;

    #[test]
    fn unified_edge_cases() {
        let tests: &[(&str, &str, &str, &str)] = &[
            ("empty", "", "", ""),
            ("identical", "first line\n", "first line\n", ""),
            ("new-lines-only", "\n", "\n", ""),
            ("x-empty", "", "one-line\n", "@@ -1,0 +1,1 @@\n+one-line\n"),
            ("y-empty", "one-line\n", "", "@@ -1,1 +1,0 @@\n-one-line\n"),
            (
                "missing-newline-x",
                "first line",
                "first line\n",
                "@@ -1,1 +1,1 @@\n-first line\n\\ No newline at end of file\n+first line\n",
            ),
            (
                "missing-newline-y",
                "first line\n",
                "first line",
                "@@ -1,1 +1,1 @@\n-first line\n+first line\n\\ No newline at end of file\n",
            ),
            (
                "missing-newline-both",
                "a\nsecond line",
                "b\nsecond line",
                "@@ -1,2 +1,2 @@\n-a\n+b\n second line\n\\ No newline at end of file\n",
            ),
            // An empty input never produces a missing-newline marker.
            ("missing-newline-empty-x", "", "\n", "@@ -1,0 +1,1 @@\n+\n"),
            ("missing-newline-empty-y", "\n", "", "@@ -1,1 +1,0 @@\n-\n"),
        ];
        for (name, x, y, want) in tests {
            assert_eq!(unified(x, y), *want, "case {name}");
        }
    }

    #[test]
    fn unified_replaces_a_line_with_context() {
        let x = "a\nb\nc\nd\ne\nf\ng\n";
        let y = "a\nb\nc\nX\ne\nf\ng\n";
        let want = "@@ -1,7 +1,7 @@\n a\n b\n c\n-d\n+X\n e\n f\n g\n";
        assert_eq!(unified(x, y), want);
    }

    #[test]
    fn unified_splits_distant_changes_into_hunks() {
        let x = "a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl\n";
        let y = "A\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nL\n";
        let want = "\
@@ -1,4 +1,4 @@
-a
+A
 b
 c
 d
@@ -9,4 +9,4 @@
 i
 j
 k
-l
+L
";
        assert_eq!(unified(x, y), want);
    }

    #[test]
    fn unified_with_context_zero() {
        let mut opts = TextOptions::new();
        opts.set_context_len(0);
        let got = opts.unified("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(got, "@@ -2,1 +2,1 @@\n-b\n+x\n");
    }

    #[test]
    fn indent_heuristic_moves_the_insert_to_the_block_boundary() {
        let x = "\
class Foo
  def initialize(name)
    @name = name
  end
end
";
        let y = "\
class Foo
  def initialize(name)
    @name = name
  end

  def to_s
    @name
  end
end
";
        let want_plain = "\
@@ -2,4 +2,8 @@
   def initialize(name)
     @name = name
   end
+
+  def to_s
+    @name
+  end
 end
";
        assert_eq!(unified(x, y), want_plain);

        let mut opts = TextOptions::new();
        opts.indent_heuristic();
        assert_eq!(opts.unified(x, y), want_plain);
    }

    #[test]
    fn text_edits_cover_both_inputs() {
        let got = edits("a\nb\n", "a\nc\n");
        assert_eq!(
            got,
            vec![
                Edit::Match("a\n", "a\n"),
                Edit::Delete("b\n"),
                Edit::Insert("c\n"),
            ]
        );
    }

    #[test]
    fn context_is_rejected_for_text_edits() {
        let result = std::panic::catch_unwind(|| {
            let mut opts = TextOptions::new();
            opts.set_context_len(1);
            opts.edits("a\n", "b\n");
        });
        assert!(result.is_err());
    }
}
