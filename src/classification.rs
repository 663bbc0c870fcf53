//! Result of reconciling known accounts against provider accounts.

use std::fmt;

use crate::{AccountFields, describe};

/// A (known, provider) pair of borrowed account records.
pub type Pair<'a, K, P> = (&'a K, &'a P);

/// Partition of both input sequences.
///
/// Every known account appears exactly once across `perfect_matches`,
/// `duplicate_candidates` and `known_orphans`; every provider account exactly
/// once across `perfect_matches`, `duplicate_candidates` and
/// `provider_orphans`. All references point into the slices passed to
/// [`reconcile`](crate::reconcile).
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Classification<'a, K, P = K> {
    /// Unchanged accounts.
    pub perfect_matches: Vec<Pair<'a, K, P>>,
    /// Probably the same account, but changed. Awaiting a merge decision.
    pub duplicate_candidates: Vec<Pair<'a, K, P>>,
    /// Known accounts the provider no longer reports.
    pub known_orphans: Vec<&'a K>,
    /// Provider accounts with no known counterpart.
    pub provider_orphans: Vec<&'a P>,
}

impl<'a, K, P> Classification<'a, K, P> {
    pub(crate) fn new() -> Self {
        Self {
            perfect_matches: Vec::new(),
            duplicate_candidates: Vec::new(),
            known_orphans: Vec::new(),
            provider_orphans: Vec::new(),
        }
    }

    /// Returns true if the provider reported exactly the known accounts.
    pub fn is_unchanged(&self) -> bool {
        self.duplicate_candidates.is_empty()
            && self.known_orphans.is_empty()
            && self.provider_orphans.is_empty()
    }

    /// Returns true if a human must decide on at least one pair.
    pub fn needs_review(&self) -> bool {
        !self.duplicate_candidates.is_empty()
    }

    /// Number of known accounts covered by this classification.
    pub fn known_len(&self) -> usize {
        self.perfect_matches.len() + self.duplicate_candidates.len() + self.known_orphans.len()
    }

    /// Number of provider accounts covered by this classification.
    pub fn provider_len(&self) -> usize {
        self.perfect_matches.len()
            + self.duplicate_candidates.len()
            + self.provider_orphans.len()
    }

    /// One-line count summary.
    pub fn summary(&self) -> String {
        format!(
            "{} perfect, {} candidates, {} known orphans, {} provider orphans",
            self.perfect_matches.len(),
            self.duplicate_candidates.len(),
            self.known_orphans.len(),
            self.provider_orphans.len()
        )
    }
}

// Only references are cloned, so no `K: Clone` bound.
impl<K, P> Clone for Classification<'_, K, P> {
    fn clone(&self) -> Self {
        Self {
            perfect_matches: self.perfect_matches.clone(),
            duplicate_candidates: self.duplicate_candidates.clone(),
            known_orphans: self.known_orphans.clone(),
            provider_orphans: self.provider_orphans.clone(),
        }
    }
}

impl<K: AccountFields, P: AccountFields> fmt::Display for Classification<'_, K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ACCOUNT DIFF: {}", self.summary())?;
        for (known, _) in &self.perfect_matches {
            writeln!(f, "  = {} {}", known.access_id(), describe(*known))?;
        }
        for (known, provider) in &self.duplicate_candidates {
            writeln!(f, "  ~ {} {}", known.access_id(), describe(*known))?;
            writeln!(f, "      -> {}", describe(*provider))?;
        }
        for known in &self.known_orphans {
            writeln!(f, "  - {} {}", known.access_id(), describe(*known))?;
        }
        for provider in &self.provider_orphans {
            writeln!(f, "  + {} {}", provider.access_id(), describe(*provider))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessId, Account};

    #[test]
    fn empty_is_unchanged() {
        let c: Classification<'_, Account> = Classification::new();
        assert!(c.is_unchanged());
        assert!(!c.needs_review());
        assert_eq!(c.known_len(), 0);
        assert_eq!(c.provider_len(), 0);
    }

    #[test]
    fn counts_and_summary() {
        let a = Account::new(AccessId(0), "Checking", "1");
        let b = Account::new(AccessId(0), "Savings", "2");
        let c = Account::new(AccessId(0), "Savings", "3");
        let d = Account::new(AccessId(0), "Card", "4");

        let mut result = Classification::new();
        result.perfect_matches.push((&a, &a));
        result.duplicate_candidates.push((&b, &c));
        result.provider_orphans.push(&d);

        assert!(!result.is_unchanged());
        assert!(result.needs_review());
        assert_eq!(result.known_len(), 2);
        assert_eq!(result.provider_len(), 3);
        assert_eq!(
            result.summary(),
            "1 perfect, 1 candidates, 0 known orphans, 1 provider orphans"
        );
    }

    #[test]
    fn display_format() {
        let a = Account::new(AccessId(0), "Checking", "1");
        let b = Account::new(AccessId(1), "Savings", "2");

        let mut result = Classification::new();
        result.known_orphans.push(&a);
        result.provider_orphans.push(&b);

        let s = format!("{result}");
        assert!(s.starts_with("ACCOUNT DIFF:"));
        assert!(s.contains("  - access#0 Checking [1]"));
        assert!(s.contains("  + access#1 Savings [2]"));
    }

    #[test]
    fn clone_keeps_references() {
        let a = Account::new(AccessId(0), "Checking", "1");
        let mut result: Classification<'_, Account> = Classification::new();
        result.known_orphans.push(&a);

        let copy = result.clone();
        assert!(std::ptr::eq(copy.known_orphans[0], &a));
    }
}
