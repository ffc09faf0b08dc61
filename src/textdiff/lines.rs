//! Line splitting for text diffs.

/// Iterator over the lines of a string, including the `\n` character.
///
/// The final line is yielded without a `\n` when the text does not end with
/// one; a text ending in `\n` produces no empty trailing line.
pub(crate) struct LineIter<'a>(&'a str);

impl<'a> LineIter<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self(text)
    }
}

impl<'a> Iterator for LineIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }

        let end = if let Some(idx) = self.0.find('\n') {
            idx + 1
        } else {
            self.0.len()
        };

        let (line, remaining) = self.0.split_at(end);
        self.0 = remaining;
        Some(line)
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    LineIter::new(text).collect()
}
