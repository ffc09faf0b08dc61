//! Indentation heuristic for line diffs, after Michael Haggerty's
//! diff-slider-tools.
//!
//! A diff is rarely unique: a group of deleted or inserted lines can often be
//! shifted up or down without changing what the edit script produces, because
//! the line leaving the group at one edge equals the line entering it at the
//! other. The heuristic uses that freedom to
//!
//! 1. merge adjacent groups into one where sliding connects them,
//! 2. align deletion and insertion groups with each other when possible, and
//! 3. otherwise place group boundaries on lines that read as natural
//!    boundaries to humans, scored by the indentation and blank lines around
//!    the split.
//!
//! The pass runs once over the deletion side and once over the insertion
//! side, keeping a scanner on the other side in lockstep so that merges stay
//! consistent. Applying it a second time leaves the result unchanged.

use std::cmp::Ordering;

// Never move a group more than this many lines.
const MAX_SLIDING: usize = 100;

// Indentation is clamped to this many columns so that unreadable input does
// not cause extra work or overflow.
const MAX_INDENT: i32 = 200;

// Runs of blank lines are counted up to this bound.
const MAX_BLANKS: i32 = 20;

const START_OF_FILE_PENALTY: i32 = 1; // split at the first non-blank line of the input
const END_OF_FILE_PENALTY: i32 = 21; // split at the end of the input
const TOTAL_BLANK_WEIGHT: i32 = -30; // per blank line around the split
const POST_BLANK_WEIGHT: i32 = 6; // per blank line after the split
const RELATIVE_INDENT_PENALTY: i32 = -4; // indented more than the predecessor
const RELATIVE_INDENT_WITH_BLANK_PENALTY: i32 = 10; // same, with blank lines
const RELATIVE_OUTDENT_PENALTY: i32 = 24; // indented less, successor indented more
const RELATIVE_OUTDENT_WITH_BLANK_PENALTY: i32 = 17; // same, with blank lines
const RELATIVE_DENT_PENALTY: i32 = 23; // indented less, successor not indented more
const RELATIVE_DENT_WITH_BLANK_PENALTY: i32 = 17; // same, with blank lines

// Effective indents only compare as less/equal/greater; the sign is weighted
// against the accumulated penalty to decide between two splits.
const INDENT_WEIGHT: i32 = 60;

/// Apply the indent heuristic to both result vectors.
pub(crate) fn apply(x: &[&str], y: &[&str], rx: &mut [bool], ry: &mut [bool]) {
    apply0(x, y, rx, ry); // deletions
    apply0(y, x, ry, rx); // insertions
}

// Apply the heuristic to the groups of set bits in r, using the other side
// for alignment. The two scanners visit the same number of groups because
// both sides contain the same number of matches.
fn apply0(lines: &[&str], lines_o: &[&str], r: &mut [bool], ro: &mut [bool]) {
    let mut s = Scanner::new(lines, r);
    let mut so = Scanner::new(lines_o, ro);
    while s.next_group() {
        if !so.next_group() {
            panic!("scanner desynchronized");
        }

        if s.group_len() == 0 {
            continue;
        }

        let mut matching_end = None; // end at which the other side's group is non-empty
        let mut min_end = s.end; // highest line the group can be shifted to
        let mut grp_len = 0;
        while grp_len != s.group_len() {
            grp_len = s.group_len();
            matching_end = None;

            // Slide up as far as possible, merging with any group this runs
            // into.
            while s.slide_group_up() {
                if !so.prev_group() {
                    panic!("scanner desynchronized");
                }
            }

            min_end = s.end;
            if so.group_len() > 0 {
                matching_end = Some(s.end);
            }

            // Then back down as far as possible, again merging, and remember
            // the lowest position at which the other side had a group of its
            // own.
            while s.slide_group_down() {
                if !so.next_group() {
                    panic!("scanner desynchronized");
                }
                if so.group_len() > 0 {
                    matching_end = Some(s.end);
                }
            }
        }

        if min_end == s.end {
            // No freedom to shift this group.
        } else if matching_end.is_some() {
            // There is a position where the other side changes too; aligning
            // the two groups beats any indentation-based placement.
            while so.group_len() == 0 {
                if !s.slide_group_up() {
                    panic!("matching group disappeared");
                }
                if !so.prev_group() {
                    panic!("scanner desynchronized");
                }
            }
        } else {
            // The group is at its lowest position; score every reachable
            // upward shift and take the best one. Ties go to the lowest
            // position.
            let lo = min_end
                .max(s.end.saturating_sub(grp_len + 1))
                .max(s.end.saturating_sub(MAX_SLIDING));
            let mut best_shift = None;
            let mut best_score = ShiftScore::default();
            for shift in lo..=s.end {
                let mut score = ShiftScore::default();
                score.add(measure_shift(lines, shift));
                score.add(measure_shift(lines, shift - grp_len));
                if best_shift.is_none() || score.compare(&best_score) <= 0 {
                    best_shift = Some(shift);
                    best_score = score;
                }
            }
            let best_shift = match best_shift {
                Some(shift) => shift,
                None => panic!("no best shift found"),
            };

            while s.end > best_shift {
                if !s.slide_group_up() {
                    panic!("best shift unreachable");
                }
                if !so.prev_group() {
                    panic!("scanner desynchronized");
                }
            }
        }
    }

    if so.next_group() {
        panic!("scanner desynchronized");
    }
}

/// Walks the groups of a result vector: the maximal runs of set bits,
/// separated by single steps over unset bits. Between two non-empty groups
/// the scanner reports one empty group per separating match.
struct Scanner<'a, 'r> {
    // First changed line of the current group, or the unchanged line the
    // scanner rests on for an empty group.
    start: usize,
    // First unchanged line after the group; start == end for an empty group.
    end: usize,
    primed: bool,
    lines: &'a [&'a str],
    r: &'r mut [bool],
}

impl<'a, 'r> Scanner<'a, 'r> {
    fn new(lines: &'a [&'a str], r: &'r mut [bool]) -> Self {
        Self {
            start: 0,
            end: 0,
            primed: false,
            lines,
            r,
        }
    }

    fn group_len(&self) -> usize {
        self.end - self.start
    }

    /// Advance to the next (possibly empty) group. Returns false once the
    /// end of the vector is reached.
    fn next_group(&mut self) -> bool {
        if !self.primed {
            self.primed = true;
        } else {
            if self.end == self.r.len() - 1 {
                return false;
            }
            self.start = self.end + 1;
            self.end = self.end + 1;
        }
        while self.end < self.r.len() - 1 && self.r[self.end] {
            self.end += 1;
        }
        true
    }

    /// Step back to the previous (possibly empty) group. Returns false at
    /// the beginning of the vector.
    fn prev_group(&mut self) -> bool {
        if self.start == 0 {
            return false;
        }
        self.end = self.start - 1;
        self.start = self.start - 1;
        while self.start > 0 && self.r[self.start - 1] {
            self.start -= 1;
        }
        true
    }

    /// Slide the group down by one line. Admissible when the first line of
    /// the group equals the first line after it; sliding may connect the
    /// group with the one below it, in which case the two merge.
    fn slide_group_down(&mut self) -> bool {
        if self.end < self.r.len() - 1 && self.lines[self.start] == self.lines[self.end] {
            self.r[self.start] = false;
            self.r[self.end] = true;
            self.start += 1;
            self.end += 1;
            while self.end < self.r.len() - 1 && self.r[self.end] {
                self.end += 1;
            }
            true
        } else {
            false
        }
    }

    /// Slide the group up by one line. Admissible when the line above the
    /// group equals its last line; sliding may connect the group with the one
    /// above it, in which case the two merge.
    fn slide_group_up(&mut self) -> bool {
        if self.start > 0 && self.lines[self.start - 1] == self.lines[self.end - 1] {
            self.r[self.start - 1] = true;
            self.r[self.end - 1] = false;
            self.start -= 1;
            self.end -= 1;
            while self.start > 0 && self.r[self.start - 1] {
                self.start -= 1;
            }
            true
        } else {
            false
        }
    }
}

/// What a potential split position looks like: the indentation at the split
/// line and at the nearest non-blank lines around it, the number of blank
/// lines in between, and whether the split sits at the end of the input.
#[derive(Default)]
struct Measure {
    end_of_file: bool,
    indent: i32,
    pre_blank: i32,
    pre_indent: i32,
    post_blank: i32,
    post_indent: i32,
}

fn measure_shift(lines: &[&str], shift: usize) -> Measure {
    let mut m = Measure::default();
    if shift >= lines.len() {
        m.end_of_file = true;
        m.indent = -1;
    } else {
        m.indent = get_indent(lines[shift]);
    }

    m.pre_indent = -1;
    for i in (0..shift).rev() {
        m.pre_indent = get_indent(lines[i]);
        if m.pre_indent != -1 {
            break;
        }
        m.pre_blank += 1;
        if m.pre_blank == MAX_BLANKS {
            m.pre_indent = 0;
            break;
        }
    }

    m.post_indent = -1;
    for i in shift + 1..lines.len() {
        m.post_indent = get_indent(lines[i]);
        if m.post_indent != -1 {
            break;
        }
        m.post_blank += 1;
        if m.post_blank == MAX_BLANKS {
            m.post_indent = 0;
            break;
        }
    }
    m
}

// Returns the width of the line's indentation with tabs expanding to the
// next multiple of 8, clamped to MAX_INDENT, or -1 for a blank line.
fn get_indent(line: &str) -> i32 {
    let mut indent = 0;
    for &c in line.as_bytes() {
        match c {
            b' ' => indent += 1,
            b'\t' => indent += 8 - indent % 8,
            b'\n' | b'\x0b' | b'\r' => {}
            _ => return indent,
        }
        if indent >= MAX_INDENT {
            return MAX_INDENT;
        }
    }
    -1
}

#[derive(Default, Clone, Copy)]
struct ShiftScore {
    effective_indent: i32, // smaller is better
    penalty: i32,          // smaller is better
}

impl ShiftScore {
    fn add(&mut self, m: Measure) {
        if m.pre_indent == -1 && m.pre_blank == 0 {
            self.penalty += START_OF_FILE_PENALTY;
        }
        if m.end_of_file {
            self.penalty += END_OF_FILE_PENALTY;
        }

        // A blank split line counts itself and the blank lines below it.
        let post_blank = if m.indent == -1 { 1 + m.post_blank } else { 0 };
        let total_blank = m.pre_blank + post_blank;

        self.penalty += TOTAL_BLANK_WEIGHT * total_blank;
        self.penalty += POST_BLANK_WEIGHT * post_blank;

        // A blank split line takes its indentation from the next non-blank
        // line. At the end of the input the effective indent stays -1.
        let indent = if m.indent == -1 { m.post_indent } else { m.indent };
        self.effective_indent += indent;

        if indent == -1 || m.pre_indent == -1 {
            // Nothing to relate the indentation to.
        } else if indent > m.pre_indent {
            self.penalty += if total_blank != 0 {
                RELATIVE_INDENT_WITH_BLANK_PENALTY
            } else {
                RELATIVE_INDENT_PENALTY
            };
        } else if indent == m.pre_indent {
            // Same indentation as the predecessor, no adjustment.
        } else if m.post_indent != -1 && m.post_indent > indent {
            // Indented less than the predecessor but the next line goes
            // deeper again, so this likely starts a new block.
            self.penalty += if total_blank != 0 {
                RELATIVE_OUTDENT_WITH_BLANK_PENALTY
            } else {
                RELATIVE_OUTDENT_PENALTY
            };
        } else {
            // Indented less than the predecessor and nothing below goes
            // deeper; likely a block terminator.
            self.penalty += if total_blank != 0 {
                RELATIVE_DENT_WITH_BLANK_PENALTY
            } else {
                RELATIVE_DENT_PENALTY
            };
        }
    }

    fn compare(&self, other: &ShiftScore) -> i32 {
        let ord = match self.effective_indent.cmp(&other.effective_indent) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        INDENT_WEIGHT * ord + self.penalty - other.penalty
    }
}
