use regex::{Regex, RegexBuilder};

/// A half-open byte range `[start, end)` into one leaf's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Case-insensitive literal matcher for one query.
///
/// The query is user input, not a pattern: every character is escaped before
/// it reaches the regex engine.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    regex: Regex,
}

impl QueryMatcher {
    /// Build a matcher for `query`. Blank queries mean "no search" and yield
    /// `None`, as does a query too large for the regex size limit.
    pub fn new(query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }
        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(Self { regex }),
            Err(err) => {
                log::warn!("query of {} bytes not searchable: {err}", query.len());
                None
            }
        }
    }

    /// Ordered, non-overlapping matches in `text`.
    pub fn spans(&self, text: &str) -> Vec<MatchSpan> {
        self.regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| MatchSpan {
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}

/// One-shot convenience over [`QueryMatcher`].
pub fn find_spans(text: &str, query: &str) -> Vec<MatchSpan> {
    QueryMatcher::new(query)
        .map(|matcher| matcher.spans(text))
        .unwrap_or_default()
}
