use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into a file's source text.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// A cursor sitting directly after the last byte still counts as inside,
    /// which is what completion needs for a partially typed identifier.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            span: Span::empty(at),
            new_text: text.into(),
        }
    }

    pub fn delete(span: Span) -> Self {
        Self {
            span,
            new_text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_at_the_end() {
        let span = Span::new(4, 7);
        assert!(span.contains(4));
        assert!(span.contains(7));
        assert!(!span.contains(8));
        assert!(!span.contains(3));
    }

    #[test]
    fn text_is_clamped_to_source() {
        let span = Span::new(2, 50);
        assert_eq!(span.text("hello"), "");
        assert_eq!(Span::new(1, 3).text("hello"), "el");
    }
}
