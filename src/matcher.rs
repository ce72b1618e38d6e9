use std::ops::Range;

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32Str};

/// Outcome of scoring one candidate string against a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub score: i64,               // 0 when the candidate does not match
    pub spans: Vec<Range<usize>>, // Matched char ranges in the candidate
}

/// Relevance function used by title resolution and ranking.
pub trait Relevance {
    fn score(&mut self, query: &str, candidate: &str) -> MatchScore;
}

pub struct FuzzyMatcher {
    matcher: Matcher,
    pattern: Pattern,
    query: String,
    buf: Vec<char>,
    indices: Vec<u32>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            pattern: Pattern::parse("", CaseMatching::Smart, Normalization::Smart),
            query: String::new(),
            buf: Vec::new(),
            indices: Vec::new(),
        }
    }

    // The same query is scored against every catalog field, so parse it once.
    fn prepare(&mut self, query: &str) {
        if self.query != query {
            self.pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);
            self.query.clear();
            self.query.push_str(query);
        }
    }
}

impl Relevance for FuzzyMatcher {
    fn score(&mut self, query: &str, candidate: &str) -> MatchScore {
        self.prepare(query);
        self.indices.clear();

        let haystack = Utf32Str::new(candidate, &mut self.buf);
        let Some(score) = self
            .pattern
            .indices(haystack, &mut self.matcher, &mut self.indices)
        else {
            return MatchScore::default();
        };

        self.indices.sort_unstable();
        self.indices.dedup();
        MatchScore {
            score: score as i64,
            spans: collapse_spans(&self.indices),
        }
    }
}

/// Turns sorted char indices into contiguous ranges.
pub fn collapse_spans(indices: &[u32]) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    for &index in indices {
        let index = index as usize;
        match spans.last_mut() {
            Some(last) if last.end == index => last.end += 1,
            _ => spans.push(index..index + 1),
        }
    }
    spans
}
