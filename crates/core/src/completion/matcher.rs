use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Fuzzy matcher for the typed prefix.
///
/// Scores are normalized against the prefix matched with itself, so an
/// exact match scores 1 and everything else falls in `(0, 1]`.
pub struct FuzzyMatcher {
    matcher: Matcher,
    pattern: Option<Pattern>,
    best: f64,
    buf: Vec<char>,
}

impl FuzzyMatcher {
    pub fn new(prefix: &str) -> Self {
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();
        if prefix.is_empty() {
            return Self {
                matcher,
                pattern: None,
                best: 1.0,
                buf,
            };
        }

        let pattern = Pattern::parse(prefix, CaseMatching::Ignore, Normalization::Smart);
        let best = pattern
            .score(Utf32Str::new(prefix, &mut buf), &mut matcher)
            .unwrap_or(1)
            .max(1) as f64;
        Self {
            matcher,
            pattern: Some(pattern),
            best,
            buf,
        }
    }

    /// 0 when `candidate` does not match.
    pub fn score(&mut self, candidate: &str) -> f64 {
        let Some(pattern) = &self.pattern else {
            return 1.0;
        };
        match pattern.score(Utf32Str::new(candidate, &mut self.buf), &mut self.matcher) {
            Some(raw) => (raw as f64 / self.best).clamp(f64::MIN_POSITIVE, 1.0),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_matches_everything() {
        let mut m = FuzzyMatcher::new("");
        assert_eq!(m.score("anything"), 1.0);
    }

    #[test]
    fn exact_prefix_scores_highest() {
        let mut m = FuzzyMatcher::new("buf");
        let exact = m.score("buf");
        assert_eq!(exact, 1.0);
        let longer = m.score("buffer");
        assert!(longer > 0.0 && longer <= exact);
        assert_eq!(m.score("n"), 0.0);
    }

    #[test]
    fn deep_names_match_their_tail() {
        let mut m = FuzzyMatcher::new("Size");
        assert!(m.score("conn.Reader().Size") > 0.0);
        assert!(m.score("size") > 0.0);
    }
}
