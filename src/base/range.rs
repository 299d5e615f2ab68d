use std::ops::Index;

/// Half-open `[start, end)` span into the parsed input.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);

        Range { start, end }
    }

    /// Shrinks the range by the given amounts from both sides. Used to strip
    /// markup delimiters (e.g. `<!--` and `-->`) from a matched span.
    #[inline]
    pub fn shrink(&self, from_start: usize, from_end: usize) -> Self {
        let start = (self.start + from_start).min(self.end);
        let end = self.end.saturating_sub(from_end).max(start);

        Range { start, end }
    }
}

impl Index<Range> for str {
    type Output = str;

    #[inline]
    fn index(&self, range: Range) -> &str {
        &self[range.start..range.end]
    }
}
