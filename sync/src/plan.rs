//! Synchronization plan: what to do with each account after a diff.
//!
//! The reconciler only classifies. This module turns a classification into
//! one action per account, and resolves duplicate candidates once a human
//! (or `auto_merge`) has decided on them.

use std::fmt;

use acctdiff::{Account, Classification};
use serde::Serialize;

use crate::config::SyncConfig;
use crate::error::Result;

/// One step of a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction<'a> {
    /// Unchanged account.
    Keep {
        known: &'a Account,
        provider: &'a Account,
    },
    /// Probably the same account, awaiting a decision.
    Review {
        known: &'a Account,
        provider: &'a Account,
    },
    /// Update the known account with the provider's fields.
    Merge {
        known: &'a Account,
        provider: &'a Account,
    },
    /// Two distinct accounts after all: the provider account is created and
    /// the known one is left as is.
    KeepSeparate {
        known: &'a Account,
        provider: &'a Account,
    },
    /// Known account no longer reported; mark it disabled.
    Disable { known: &'a Account },
    /// Known account no longer reported; leave it untouched.
    Ignore { known: &'a Account },
    /// Newly reported account.
    Create { provider: &'a Account },
}

impl SyncAction<'_> {
    /// Short upper-case name, as shown in reports.
    pub fn name(&self) -> &'static str {
        match self {
            SyncAction::Keep { .. } => "KEEP",
            SyncAction::Review { .. } => "REVIEW",
            SyncAction::Merge { .. } => "MERGE",
            SyncAction::KeepSeparate { .. } => "SEPARATE",
            SyncAction::Disable { .. } => "DISABLE",
            SyncAction::Ignore { .. } => "IGNORE",
            SyncAction::Create { .. } => "CREATE",
        }
    }
}

impl fmt::Display for SyncAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Keep { known, .. } => write!(f, "{:8} {}", self.name(), known),
            SyncAction::Review { known, provider }
            | SyncAction::Merge { known, provider }
            | SyncAction::KeepSeparate { known, provider } => {
                write!(f, "{:8} {} -> {}", self.name(), known, provider)
            }
            SyncAction::Disable { known } | SyncAction::Ignore { known } => {
                write!(f, "{:8} {}", self.name(), known)
            }
            SyncAction::Create { provider } => write!(f, "{:8} {}", self.name(), provider),
        }
    }
}

/// Per-action totals of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanCounts {
    pub keep: usize,
    pub review: usize,
    pub merge: usize,
    pub keep_separate: usize,
    pub disable: usize,
    pub ignore: usize,
    pub create: usize,
}

/// Ordered list of sync actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPlan<'a> {
    pub actions: Vec<SyncAction<'a>>,
}

impl<'a> SyncPlan<'a> {
    /// Build a plan from a classification.
    ///
    /// Actions follow the classification order: perfect matches, duplicate
    /// candidates, known orphans, provider orphans.
    pub fn from_classification(diff: &Classification<'a, Account>, config: &SyncConfig) -> Self {
        let mut actions = Vec::with_capacity(diff.known_len() + diff.provider_orphans.len());

        for &(known, provider) in &diff.perfect_matches {
            actions.push(SyncAction::Keep { known, provider });
        }
        for &(known, provider) in &diff.duplicate_candidates {
            actions.push(SyncAction::Review { known, provider });
        }
        for &known in &diff.known_orphans {
            actions.push(if config.disable_known_orphans {
                SyncAction::Disable { known }
            } else {
                SyncAction::Ignore { known }
            });
        }
        for &provider in &diff.provider_orphans {
            actions.push(SyncAction::Create { provider });
        }

        Self { actions }
    }

    /// Number of actions still waiting for a decision.
    pub fn pending_reviews(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::Review { .. }))
            .count()
    }

    /// Decide every pending review.
    ///
    /// `decide` returns `true` to merge the pair. The first error stops the
    /// resolution and is returned.
    pub fn resolve<F>(self, mut decide: F) -> Result<Self>
    where
        F: FnMut(&Account, &Account) -> Result<bool>,
    {
        let mut actions = Vec::with_capacity(self.actions.len());
        for action in self.actions {
            actions.push(match action {
                SyncAction::Review { known, provider } => {
                    if decide(known, provider)? {
                        SyncAction::Merge { known, provider }
                    } else {
                        SyncAction::KeepSeparate { known, provider }
                    }
                }
                other => other,
            });
        }
        Ok(Self { actions })
    }

    /// Per-action totals.
    pub fn counts(&self) -> PlanCounts {
        let mut counts = PlanCounts::default();
        for action in &self.actions {
            match action {
                SyncAction::Keep { .. } => counts.keep += 1,
                SyncAction::Review { .. } => counts.review += 1,
                SyncAction::Merge { .. } => counts.merge += 1,
                SyncAction::KeepSeparate { .. } => counts.keep_separate += 1,
                SyncAction::Disable { .. } => counts.disable += 1,
                SyncAction::Ignore { .. } => counts.ignore += 1,
                SyncAction::Create { .. } => counts.create += 1,
            }
        }
        counts
    }

    /// Returns true if applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.actions
            .iter()
            .all(|a| matches!(a, SyncAction::Keep { .. } | SyncAction::Ignore { .. }))
    }
}

impl fmt::Display for SyncPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SYNC PLAN:")?;
        if self.actions.is_empty() {
            writeln!(f, "  (no accounts)")?;
        }
        for (i, action) in self.actions.iter().enumerate() {
            writeln!(f, "  {:>3}  {action}", i + 1)?;
        }
        Ok(())
    }
}
