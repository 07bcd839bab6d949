use serde::Serialize;

/// Source location of a node: byte offsets plus the start line recorded by
/// the parser, when it recorded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: Option<u32>,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Span that only knows its line, as produced by line-oriented parsers
    pub fn at_line(line: u32) -> Self {
        Self::default().with_line(line)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Start line, or 0 when the parser did not record it (PHP-Parser's
    /// `startLine` attribute default).
    pub fn start_line(&self) -> u32 {
        self.line.unwrap_or(0)
    }

    /// Smallest span covering both
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.or(other.line),
        }
    }
}
