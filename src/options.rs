//! Configuration for the comparison functions.
//!
//! Options are composed with builder-style setters and validated eagerly:
//! mutually exclusive settings panic in the setter, and every entry point
//! rejects options that were explicitly set but have no meaning for it.
//! Misconfiguration is a programmer error, not a runtime condition.

/// Cost/quality mode used by the diff engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Find a shortest edit script irrespective of cost.
    Minimal,
    /// Find a good edit script, falling back to heuristics on expensive inputs.
    Default,
    /// Patience-style output built from anchors only, no shortest-path search.
    Fast,
}

// Bitmask recording which options were explicitly set, used by entry points
// to reject options they don't recognize.
pub(crate) const OPT_CONTEXT: u8 = 1 << 0;
pub(crate) const OPT_MINIMAL: u8 = 1 << 1;
pub(crate) const OPT_FAST: u8 = 1 << 2;
pub(crate) const OPT_INDENT_HEURISTIC: u8 = 1 << 3;
pub(crate) const OPT_FORCE_ANCHORING: u8 = 1 << 4;

fn opt_name(flag: u8) -> &'static str {
    match flag {
        OPT_CONTEXT => "context",
        OPT_MINIMAL => "minimal",
        OPT_FAST => "fast",
        OPT_INDENT_HEURISTIC => "indent_heuristic",
        OPT_FORCE_ANCHORING => "force_anchoring",
        _ => unreachable!("unknown option flag: {flag}"),
    }
}

pub(crate) fn check_allowed(set: u8, allowed: u8, callee: &str) {
    let disallowed = set & !allowed;
    if disallowed != 0 {
        let flag = 1 << disallowed.trailing_zeros();
        panic!("option `{}` is not applicable to `{callee}`", opt_name(flag));
    }
}

/// A collection of options for modifying the way a diff is performed.
///
/// ```
/// use seqdiff::DiffOptions;
///
/// let x = [1, 7, 2, 9];
/// let y = [3, 7, 9];
/// let hunks = DiffOptions::new().set_context_len(0).hunks(&x, &y);
/// assert_eq!(hunks.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct DiffOptions {
    pub(crate) context_len: usize,
    pub(crate) mode: Mode,
    pub(crate) force_anchoring: bool,
    pub(crate) set: u8,
}

impl DiffOptions {
    /// Construct a new `DiffOptions` with default settings: three elements
    /// of context around each hunk and heuristics enabled.
    pub fn new() -> Self {
        Self {
            context_len: 3,
            mode: Mode::Default,
            force_anchoring: false,
            set: 0,
        }
    }

    /// Set the number of matching elements to include before and after each
    /// hunk. Only meaningful for the hunk-producing entry points.
    pub fn set_context_len(&mut self, context_len: usize) -> &mut Self {
        self.context_len = context_len;
        self.set |= OPT_CONTEXT;
        self
    }

    /// Always produce a shortest edit script, disabling the cost heuristics.
    ///
    /// Runtime becomes O(ND) in the size of the input and the number of
    /// differences.
    ///
    /// # Panics
    ///
    /// Panics if [`fast`](DiffOptions::fast) was also requested.
    pub fn minimal(&mut self) -> &mut Self {
        if self.set & OPT_FAST != 0 {
            panic!("options `minimal` and `fast` are mutually exclusive");
        }
        if self.force_anchoring {
            panic!("option `minimal` cannot be combined with forced anchoring");
        }
        self.mode = Mode::Minimal;
        self.set |= OPT_MINIMAL;
        self
    }

    /// Partition the input around elements unique to both sides and mark
    /// everything in between as deleted or inserted without searching for a
    /// shortest path. Output quality is traded for O(N log N) runtime.
    ///
    /// # Panics
    ///
    /// Panics if [`minimal`](DiffOptions::minimal) was also requested.
    pub fn fast(&mut self) -> &mut Self {
        if self.set & OPT_MINIMAL != 0 {
            panic!("options `minimal` and `fast` are mutually exclusive");
        }
        if self.force_anchoring {
            panic!("option `fast` cannot be combined with forced anchoring");
        }
        self.mode = Mode::Fast;
        self.set |= OPT_FAST;
        self
    }

    // Unconditionally partition around anchors even below the input-size
    // threshold. Exposed to tests only so the anchoring path can be
    // exercised with small inputs.
    #[cfg(test)]
    pub(crate) fn force_anchoring(&mut self) -> &mut Self {
        if self.mode != Mode::Default {
            panic!("forced anchoring requires the default mode");
        }
        self.force_anchoring = true;
        self.set |= OPT_FORCE_ANCHORING;
        self
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A collection of options for modifying the way a text diff is performed.
///
/// In addition to the element-wise options, text diffs can apply the indent
/// heuristic, which moves edit-group boundaries to positions that align with
/// the indentation structure of the surrounding text.
#[derive(Clone, Debug)]
pub struct TextOptions {
    pub(crate) context_len: usize,
    pub(crate) mode: Mode,
    pub(crate) indent_heuristic: bool,
    pub(crate) set: u8,
}

impl TextOptions {
    /// Construct a new `TextOptions` with default settings.
    pub fn new() -> Self {
        Self {
            context_len: 3,
            mode: Mode::Default,
            indent_heuristic: false,
            set: 0,
        }
    }

    /// Set the number of matching lines to include before and after each
    /// hunk. Only meaningful for the hunk-producing entry points.
    pub fn set_context_len(&mut self, context_len: usize) -> &mut Self {
        self.context_len = context_len;
        self.set |= OPT_CONTEXT;
        self
    }

    /// Always produce a shortest edit script, disabling the cost heuristics.
    ///
    /// # Panics
    ///
    /// Panics if [`fast`](TextOptions::fast) was also requested.
    pub fn minimal(&mut self) -> &mut Self {
        if self.set & OPT_FAST != 0 {
            panic!("options `minimal` and `fast` are mutually exclusive");
        }
        self.mode = Mode::Minimal;
        self.set |= OPT_MINIMAL;
        self
    }

    /// Use the patience-style anchor partitioning without shortest-path
    /// search.
    ///
    /// # Panics
    ///
    /// Panics if [`minimal`](TextOptions::minimal) was also requested.
    pub fn fast(&mut self) -> &mut Self {
        if self.set & OPT_MINIMAL != 0 {
            panic!("options `minimal` and `fast` are mutually exclusive");
        }
        self.mode = Mode::Fast;
        self.set |= OPT_FAST;
        self
    }

    /// Shift edit-group boundaries to align with the indentation patterns of
    /// the surrounding lines, which tends to produce diffs that match how
    /// humans would describe the change.
    pub fn indent_heuristic(&mut self) -> &mut Self {
        self.indent_heuristic = true;
        self.set |= OPT_INDENT_HEURISTIC;
        self
    }
}

impl Default for TextOptions {
    fn default() -> Self {
        Self::new()
    }
}
