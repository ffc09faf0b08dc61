//! Tools for comparing sequences and producing human-readable diffs
//!
//! ## Overview
//!
//! This library compares two sequences of equality-comparable elements and
//! produces the edits that transform the first into the second, similar to
//! what the Unix `diff` tool does for files. The implementation is based on
//! the linear-space variant of [Myers' diff algorithm], augmented with the
//! cost-limiting heuristics used by GNU Diffutils and [Git] so that large
//! inputs with many differences stay fast.
//!
//! The main entry points are [`edits`], which returns one edit per input
//! element, and [`hunks`], which groups the changes into blocks with
//! surrounding context. Both have `_func` variants for element types that
//! are not hashable. Line-oriented text comparison, including output in the
//! unified format, lives in the [`textdiff`] module.
//!
//! ## Comparing sequences
//!
//! ```
//! use seqdiff::{edits, Edit};
//!
//! let x = b"ABCABBA";
//! let y = b"CBABAC";
//!
//! let trace: String = edits(x, y)
//!     .iter()
//!     .map(|e| match e {
//!         Edit::Match(..) => 'M',
//!         Edit::Delete(_) => 'D',
//!         Edit::Insert(_) => 'I',
//!     })
//!     .collect();
//! assert_eq!(trace, "DIMDMMDMI");
//! ```
//!
//! ## Comparing text
//!
//! ```
//! use seqdiff::textdiff;
//!
//! let original = "The Way of Kings\nWords of Radiance\n";
//! let modified = "The Way of Kings\nWords of Radiance\nOathbringer\n";
//!
//! let diff = textdiff::unified(original, modified);
//! #
//! # let expected = "\
//! # @@ -1,2 +1,3 @@
//! #  The Way of Kings
//! #  Words of Radiance
//! # +Oathbringer
//! # ";
//! #
//! # assert_eq!(diff, expected);
//! ```
//!
//! The output can also be produced with color using a
//! [`textdiff::UnifiedFormatter`].
//!
//! ## Options
//!
//! The comparison functions take no options; configured variants are entry
//! methods on [`DiffOptions`] and [`TextOptions`]:
//!
//! ```
//! use seqdiff::{DiffOptions, TextOptions};
//!
//! let x = [1, 2, 3, 4, 5];
//! let y = [1, 9, 3, 8, 5];
//!
//! // A provably minimal diff, at the price of disabling all heuristics.
//! let edits = DiffOptions::new().minimal().edits(&x, &y);
//! assert_eq!(edits.len(), 7);
//!
//! // Hunks with a single element of context.
//! let hunks = DiffOptions::new().set_context_len(1).hunks(&x, &y);
//! assert_eq!(hunks.len(), 1);
//!
//! // Text diffs can move edit boundaries to match the indentation
//! // structure of the surrounding code.
//! let diff = TextOptions::new()
//!     .indent_heuristic()
//!     .unified("fn a() {}\n", "fn b() {}\n");
//! assert_eq!(diff, "@@ -1,1 +1,1 @@\n-fn a() {}\n+fn b() {}\n");
//! ```
//!
//! By default the result is a good diff that is allowed to be slightly
//! suboptimal on pathological inputs; [`DiffOptions::minimal`] forces an
//! optimal one and [`DiffOptions::fast`] trades quality for speed on very
//! large inputs.
//!
//! Note that the exact output is not guaranteed to be stable across versions
//! of this library; only its validity is.
//!
//! [Myers' diff algorithm]: http://www.xmailserver.org/diff2.pdf
//! [Git]: https://git-scm.com/

mod diff;
mod options;
pub mod textdiff;

pub use diff::{edits, edits_func, hunks, hunks_func, Edit, Hunk};
pub use options::{DiffOptions, TextOptions};
