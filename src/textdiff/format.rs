//! Rendering of line hunks in the unified format.

use crate::diff::{Edit, Hunk};
use ansi_term::{Color, Style};
use std::fmt::{Display, Formatter, Result};

const NO_NEWLINE_AT_EOF: &str = "\\ No newline at end of file";

/// Renders hunks in the unified format, optionally with color.
///
/// ```
/// use seqdiff::textdiff::{self, UnifiedFormatter};
///
/// let hunks = textdiff::hunks("a\nb\n", "a\nc\n");
/// let f = UnifiedFormatter::new().with_color();
/// print!("{}", f.fmt_hunks(&hunks));
/// ```
#[derive(Debug)]
pub struct UnifiedFormatter {
    with_color: bool,

    context: Style,
    delete: Style,
    insert: Style,
    hunk_header: Style,
}

impl UnifiedFormatter {
    /// Construct a new formatter.
    pub fn new() -> Self {
        Self {
            with_color: false,

            context: Style::new(),
            delete: Color::Red.normal(),
            insert: Color::Green.normal(),
            hunk_header: Color::Cyan.normal(),
        }
    }

    /// Enable colored output.
    pub fn with_color(mut self) -> Self {
        self.with_color = true;
        self
    }

    /// Returns a `Display` impl rendering the given hunks.
    pub fn fmt_hunks<'a>(&'a self, hunks: &'a [Hunk<'a, str>]) -> impl Display + 'a {
        HunksDisplay { f: self, hunks }
    }
}

impl Default for UnifiedFormatter {
    fn default() -> Self {
        Self::new()
    }
}

struct HunksDisplay<'a> {
    f: &'a UnifiedFormatter,
    hunks: &'a [Hunk<'a, str>],
}

impl Display for HunksDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for hunk in self.hunks {
            let (xr, yr) = (hunk.x_range(), hunk.y_range());
            if self.f.with_color {
                write!(f, "{}", self.f.hunk_header.prefix())?;
            }
            write!(
                f,
                "@@ -{},{} +{},{} @@",
                xr.start + 1,
                xr.len(),
                yr.start + 1,
                yr.len()
            )?;
            if self.f.with_color {
                write!(f, "{}", self.f.hunk_header.suffix())?;
            }
            writeln!(f)?;

            for edit in hunk.edits() {
                let (sign, line, style) = match edit {
                    Edit::Match(line, _) => (' ', *line, self.f.context),
                    Edit::Delete(line) => ('-', *line, self.f.delete),
                    Edit::Insert(line) => ('+', *line, self.f.insert),
                };

                if self.f.with_color {
                    write!(f, "{}", style.prefix())?;
                }
                write!(f, "{}{}", sign, line)?;
                if self.f.with_color {
                    write!(f, "{}", style.suffix())?;
                }

                // A line can only be missing its newline at the very end of
                // its input.
                if !line.ends_with('\n') {
                    writeln!(f)?;
                    writeln!(f, "{}", NO_NEWLINE_AT_EOF)?;
                }
            }
        }

        Ok(())
    }
}
