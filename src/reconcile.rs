//! Reconciliation engine: pairs known accounts with provider accounts.
//!
//! Accounts are grouped by access and each group is resolved on its own:
//! 1. Exact matches first, for every known account of the group
//! 2. Plausible duplicates among what is left, strongest similarity in the
//!    group first
//! 3. Anything still unpaired is an orphan on its side
//!
//! Output follows the order of the known sequence within a group. Groups are
//! emitted in order of first appearance in the known sequence, followed by
//! groups that only the provider reports.

use std::cmp::Reverse;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::similarity::{is_exact_match, is_plausible_duplicate, similarity_score};
use crate::{AccessId, AccountFields, Classification};

/// Classify `known` accounts against freshly fetched `provider` accounts.
///
/// Never fails; the returned pairs borrow the input records.
///
/// ```
/// use acctdiff::{reconcile, AccessId, Account};
///
/// let known = vec![Account::new(AccessId(0), "Checking account", "1234abcd")];
/// let provider = vec![Account::new(AccessId(0), "Checking account", "1234abcd")];
///
/// let result = reconcile(&known, &provider);
/// assert_eq!(result.perfect_matches.len(), 1);
/// assert!(std::ptr::eq(result.perfect_matches[0].0, &known[0]));
/// assert!(std::ptr::eq(result.perfect_matches[0].1, &provider[0]));
/// ```
pub fn reconcile<'a, K, P>(known: &'a [K], provider: &'a [P]) -> Classification<'a, K, P>
where
    K: AccountFields,
    P: AccountFields,
{
    let mut result = Classification::new();

    for (access_id, group) in group_by_access(known, provider) {
        let before = (
            result.perfect_matches.len(),
            result.duplicate_candidates.len(),
            result.known_orphans.len(),
            result.provider_orphans.len(),
        );

        reconcile_group(known, provider, &group, &mut result);

        debug!(
            "{access_id}: {} known, {} provider -> {} perfect, {} candidates, {} known orphans, {} provider orphans",
            group.known.len(),
            group.provider.len(),
            result.perfect_matches.len() - before.0,
            result.duplicate_candidates.len() - before.1,
            result.known_orphans.len() - before.2,
            result.provider_orphans.len() - before.3,
        );
    }

    debug_assert_eq!(result.known_len(), known.len(), "known account lost or duplicated");
    debug_assert_eq!(
        result.provider_len(),
        provider.len(),
        "provider account lost or duplicated"
    );

    result
}

/// Positions (into the caller's slices) of one access's accounts.
#[derive(Debug, Default)]
struct AccessGroup {
    known: Vec<usize>,
    provider: Vec<usize>,
}

/// Partition both inputs by access, preserving input order inside each group.
fn group_by_access<K, P>(known: &[K], provider: &[P]) -> Vec<(AccessId, AccessGroup)>
where
    K: AccountFields,
    P: AccountFields,
{
    let mut order: Vec<AccessId> = Vec::new();
    let mut groups: FxHashMap<AccessId, AccessGroup> = FxHashMap::default();

    for (i, account) in known.iter().enumerate() {
        let id = account.access_id();
        groups
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                AccessGroup::default()
            })
            .known
            .push(i);
    }
    for (i, account) in provider.iter().enumerate() {
        let id = account.access_id();
        groups
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                AccessGroup::default()
            })
            .provider
            .push(i);
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id).map(|group| (id, group)))
        .collect()
}

/// Resolution state of one known account within its group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Unprocessed,
    /// Exact match with the provider account at this position.
    Exact(usize),
    /// Plausible duplicate of the provider account at this position.
    Fuzzy(usize),
    Orphan,
}

fn reconcile_group<'a, K, P>(
    known: &'a [K],
    provider: &'a [P],
    group: &AccessGroup,
    result: &mut Classification<'a, K, P>,
) where
    K: AccountFields,
    P: AccountFields,
{
    let mut pool = ProviderPool::new(provider, &group.provider);
    let mut outcomes = vec![Outcome::Unprocessed; group.known.len()];

    for (outcome, &k) in outcomes.iter_mut().zip(&group.known) {
        if let Some(p) = pool.take_exact(&known[k]) {
            *outcome = Outcome::Exact(p);
        }
    }

    // Strongest evidence first, so a weak match never takes the counterpart
    // of another known account. Ties go to the earlier known account, then
    // the earlier provider account.
    let mut candidates: Vec<(u32, usize, usize)> = Vec::new();
    for (i, &k) in group.known.iter().enumerate() {
        if outcomes[i] == Outcome::Unprocessed {
            candidates.extend(
                pool.plausible_duplicates(&known[k])
                    .into_iter()
                    .map(|(score, p)| (score, i, p)),
            );
        }
    }
    candidates.sort_unstable_by_key(|&(score, i, p)| (Reverse(score), i, p));

    for (_, i, p) in candidates {
        if outcomes[i] == Outcome::Unprocessed && pool.take(p) {
            outcomes[i] = Outcome::Fuzzy(p);
        }
    }
    for outcome in &mut outcomes {
        if *outcome == Outcome::Unprocessed {
            *outcome = Outcome::Orphan;
        }
    }

    for (outcome, &k) in outcomes.iter().zip(&group.known) {
        let account = &known[k];
        match *outcome {
            Outcome::Exact(p) => result.perfect_matches.push((account, &provider[p])),
            Outcome::Fuzzy(p) => result.duplicate_candidates.push((account, &provider[p])),
            Outcome::Orphan => result.known_orphans.push(account),
            Outcome::Unprocessed => unreachable!("known account left unresolved"),
        }
    }

    result
        .provider_orphans
        .extend(pool.remaining().map(|p| &provider[p]));
}

/// Provider accounts of one access, indexed for lookup, with consumption
/// tracked explicitly.
///
/// Index entries keep provider order, so the first hit is the first
/// encountered provider account.
struct ProviderPool<'a, P> {
    accounts: &'a [P],
    members: &'a [usize],
    by_vendor_id: FxHashMap<&'a str, Vec<usize>>,
    by_iban: FxHashMap<&'a str, Vec<usize>>,
    by_label: FxHashMap<&'a str, Vec<usize>>,
    consumed: FxHashSet<usize>,
}

impl<'a, P: AccountFields> ProviderPool<'a, P> {
    fn new(accounts: &'a [P], members: &'a [usize]) -> Self {
        let mut by_vendor_id: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
        let mut by_iban: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();
        let mut by_label: FxHashMap<&'a str, Vec<usize>> = FxHashMap::default();

        for &p in members {
            let account = &accounts[p];
            by_vendor_id
                .entry(account.vendor_account_id())
                .or_default()
                .push(p);
            if let Some(iban) = account.iban() {
                by_iban.entry(iban).or_default().push(p);
            }
            by_label.entry(account.label()).or_default().push(p);
        }

        Self {
            accounts,
            members,
            by_vendor_id,
            by_iban,
            by_label,
            consumed: FxHashSet::default(),
        }
    }

    fn is_available(&self, p: usize) -> bool {
        !self.consumed.contains(&p)
    }

    /// Consume an available provider account exactly matching `known`.
    ///
    /// A hit with the same label is preferred, then the first one in
    /// provider order.
    fn take_exact<K: AccountFields>(&mut self, known: &K) -> Option<usize> {
        let hits = self.by_vendor_id.get(known.vendor_account_id())?;
        let mut exact = hits
            .iter()
            .copied()
            .filter(|&p| self.is_available(p) && is_exact_match(known, &self.accounts[p]));
        let first = exact.next()?;
        let p = std::iter::once(first)
            .chain(exact)
            .find(|&p| self.accounts[p].label() == known.label())
            .unwrap_or(first);
        self.consumed.insert(p);
        Some(p)
    }

    /// Available plausible duplicates of `known`, with their similarity
    /// scores, in provider order.
    ///
    /// Candidates share a vendor id, an IBAN or a label with `known`.
    fn plausible_duplicates<K: AccountFields>(&self, known: &K) -> Vec<(u32, usize)> {
        let mut candidates: Vec<usize> = Vec::new();
        if let Some(hits) = self.by_vendor_id.get(known.vendor_account_id()) {
            candidates.extend_from_slice(hits);
        }
        if let Some(hits) = known.iban().and_then(|iban| self.by_iban.get(iban)) {
            candidates.extend_from_slice(hits);
        }
        if let Some(hits) = self.by_label.get(known.label()) {
            candidates.extend_from_slice(hits);
        }
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .filter(|&p| self.is_available(p) && is_plausible_duplicate(known, &self.accounts[p]))
            .map(|p| (similarity_score(known, &self.accounts[p]), p))
            .collect()
    }

    /// Consume `p`. Returns false if it was already consumed.
    fn take(&mut self, p: usize) -> bool {
        self.consumed.insert(p)
    }

    /// Unconsumed provider accounts, in provider order.
    fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied().filter(|&p| self.is_available(p))
    }
}
