//! Search over the record store.
//!
//! An empty query bypasses filtering entirely; anything else is matched
//! against name, email and role.

use regex::{Regex, RegexBuilder};

use crate::records::UserRecord;

/// A compiled search query.
///
/// Queries are case-insensitive regular expressions. A query that does not
/// compile is matched as a plain case-insensitive substring instead.
#[derive(Clone, Debug)]
pub enum SearchPattern {
    Regex(Regex),
    Literal(String),
}

impl SearchPattern {
    pub fn compile(query: &str) -> Self {
        match RegexBuilder::new(query).case_insensitive(true).build() {
            Ok(re) => SearchPattern::Regex(re),
            Err(err) => {
                tracing::debug!(query, error = %err, "invalid search pattern, matching literally");
                SearchPattern::Literal(query.to_lowercase())
            }
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, SearchPattern::Literal(_))
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            SearchPattern::Regex(re) => re.is_match(haystack),
            SearchPattern::Literal(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }

    /// A record matches when any of name, email or role matches.
    pub fn matches(&self, record: &UserRecord) -> bool {
        self.is_match(&record.name) || self.is_match(&record.email) || self.is_match(&record.role)
    }
}

/// Records matching `query`, in store order.
///
/// Returns `None` for an empty query: the caller should show the full store
/// rather than a filtered copy of it.
pub fn filter(records: &[UserRecord], query: &str) -> Option<Vec<UserRecord>> {
    if query.is_empty() {
        return None;
    }
    Some(filter_with(&SearchPattern::compile(query), records))
}

/// Records matching an already compiled pattern, in store order.
pub fn filter_with(pattern: &SearchPattern, records: &[UserRecord]) -> Vec<UserRecord> {
    records.iter().filter(|r| pattern.matches(r)).cloned().collect()
}
