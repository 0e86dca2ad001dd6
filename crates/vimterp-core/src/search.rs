//! Search: regex match lists with cyclic `n` / `N` navigation.
//!
//! A search (`/pattern` or `?pattern`) compiles the pattern, collects every
//! match in the document in order, and remembers the direction it was typed
//! in. It does not move the cursor. `n` and `N` then hop between matches:
//!
//! - `n` moves in the search's own direction, `N` in the opposite one;
//! - a hop goes to the first match strictly after the cursor (forward) or
//!   strictly before it (backward), wrapping to the other end of the list;
//! - a count is that many single hops, each one free to wrap.
//!
//! Matching is case-sensitive over the whole document. Offsets are char
//! indices; empty matches are dropped.

use std::ops::Range;

use regex::Regex;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction: `/` is forward, `?` backward.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A search match: start offset and length, both in chars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub len: usize,
}

impl Match {
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Every non-empty match of `re` in `text`, as char offsets.
#[must_use]
pub fn find_all(re: &Regex, text: &str) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;

    for m in re.find_iter(text) {
        if m.is_empty() {
            continue;
        }
        char_pos += text[byte_pos..m.start()].chars().count();
        let len = m.as_str().chars().count();
        matches.push(Match {
            start: char_pos,
            len,
        });
        char_pos += len;
        byte_pos = m.end();
    }

    matches
}

// ---------------------------------------------------------------------------
// SearchController
// ---------------------------------------------------------------------------

/// The result of the last search.
#[derive(Debug, Clone)]
struct SearchResult {
    direction: SearchDirection,
    matches: Vec<Match>,
}

/// Owns the last search and navigates its matches.
#[derive(Debug, Default)]
pub struct SearchController {
    last: Option<SearchResult>,
}

impl SearchController {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Run a new search over `text`, replacing the previous result.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPattern`](crate::error::EngineError::InvalidPattern)
    /// if `pattern` does not compile; the previous result is kept.
    pub fn search(
        &mut self,
        text: &str,
        pattern: &str,
        direction: SearchDirection,
    ) -> Result<&[Match]> {
        let re = Regex::new(pattern)?;
        let result = self.last.insert(SearchResult {
            direction,
            matches: find_all(&re, text),
        });
        Ok(&result.matches)
    }

    /// Matches of the last search, in document order.
    #[must_use]
    pub fn matches(&self) -> &[Match] {
        self.last.as_ref().map_or(&[], |r| r.matches.as_slice())
    }

    /// Match ranges, for the search decoration layer.
    #[must_use]
    pub fn spans(&self) -> Vec<Range<usize>> {
        self.matches().iter().map(|m| m.range()).collect()
    }

    /// Where `count` hops from `cursor` land. `reverse` is `false` for `n`
    /// and `true` for `N`. `None` when there are no matches.
    #[must_use]
    pub fn next(&self, cursor: usize, count: usize, reverse: bool) -> Option<usize> {
        let result = self.last.as_ref()?;
        let direction = if reverse {
            result.direction.opposite()
        } else {
            result.direction
        };

        if result.matches.is_empty() {
            return None;
        }
        // After the first hop the cursor sits on a match, and the list
        // repeats every `len` hops.
        let hops = 1 + (count.max(1) - 1) % result.matches.len();
        let mut pos = cursor;
        for _ in 0..hops {
            pos = hop(&result.matches, pos, direction)?;
        }
        Some(pos)
    }
}

/// One hop from `cursor` to the neighboring match start, wrapping.
fn hop(matches: &[Match], cursor: usize, direction: SearchDirection) -> Option<usize> {
    let first = matches.first()?;
    let last = matches.last()?;

    let target = match direction {
        SearchDirection::Forward => {
            let place = matches.partition_point(|m| m.start <= cursor);
            matches.get(place).unwrap_or(first)
        }
        SearchDirection::Backward => {
            let place = matches.partition_point(|m| m.start < cursor);
            place.checked_sub(1).and_then(|i| matches.get(i)).unwrap_or(last)
        }
    };
    Some(target.start)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
