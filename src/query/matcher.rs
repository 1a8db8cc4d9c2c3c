//! Rule matching: first match in catalog order wins.

use tracing::debug;

use super::catalog::{QueryRule, RuleCatalog};

/// Outcome of resolving a query against a catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    Matched(&'a QueryRule),
    NoMatch,
}

impl<'a> MatchResult<'a> {
    pub fn rule(&self) -> Option<&'a QueryRule> {
        match self {
            MatchResult::Matched(rule) => Some(rule),
            MatchResult::NoMatch => None,
        }
    }
}

impl RuleCatalog {
    /// Resolve a query against this catalog and the dataset's column names.
    ///
    /// The query is lower-cased once; each rule's substrings are tested by
    /// containment. A rule whose text matches but whose required columns
    /// are absent is an ordinary non-match: evaluation continues so a
    /// later, less column-demanding rule can catch the same phrasing.
    /// Iteration short-circuits at the first rule satisfying both
    /// predicates.
    pub fn resolve<'a>(&'a self, query: &str, columns: &[String]) -> MatchResult<'a> {
        let lower = query.to_lowercase();
        for rule in self.rules() {
            if !rule.text.matches(&lower) {
                continue;
            }
            if !rule
                .required_columns
                .iter()
                .all(|required| columns.iter().any(|c| c == required))
            {
                debug!(
                    "Rule '{}' text matched but required columns are missing",
                    rule.name
                );
                continue;
            }
            debug!("Rule '{}' matched query", rule.name);
            return MatchResult::Matched(rule);
        }
        debug!("No rule matched query");
        MatchResult::NoMatch
    }
}
