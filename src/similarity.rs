//! Similarity judgments between a known account and a provider account.
//!
//! No single field identifies an account across syncs: providers renumber
//! accounts and start (or stop) reporting IBANs. Two accounts are therefore
//! compared on several fields:
//!
//! 1. **Exact match**: vendor id, currency and IBAN all identical. A renamed
//!    account is still the same account.
//! 2. **Plausible duplicate**: probably the same account, but changed. Needs
//!    a human decision before the two records are merged.
//!
//! The reconciler only asks the second question of accounts left over after
//! every exact match has been taken.

use crate::AccountFields;

/// Score for an identical vendor account id.
pub const SAME_VENDOR_ID: u32 = 4;
/// Score for identical, present IBANs.
pub const SAME_IBAN: u32 = 2;
/// Score for an identical label.
pub const SAME_LABEL: u32 = 2;
/// Score for an identical currency (both absent counts as identical).
pub const SAME_CURRENCY: u32 = 1;

/// Returns true if both records describe the account without any change.
///
/// An absent IBAN or currency is distinct from every present value.
#[inline]
pub fn is_exact_match<K, P>(known: &K, provider: &P) -> bool
where
    K: AccountFields + ?Sized,
    P: AccountFields + ?Sized,
{
    known.vendor_account_id() == provider.vendor_account_id()
        && known.currency() == provider.currency()
        && known.iban() == provider.iban()
}

/// Returns true if the two records are probably the same account.
///
/// - Two present IBANs that differ always mean two distinct accounts.
/// - Two present IBANs that agree are enough.
/// - Otherwise the vendor id must agree, or, when the vendor id was
///   renumbered, the label must.
///
/// Currency is never evidence on its own.
pub fn is_plausible_duplicate<K, P>(known: &K, provider: &P) -> bool
where
    K: AccountFields + ?Sized,
    P: AccountFields + ?Sized,
{
    match (known.iban(), provider.iban()) {
        (Some(a), Some(b)) => a == b,
        _ => {
            known.vendor_account_id() == provider.vendor_account_id()
                || known.label() == provider.label()
        }
    }
}

/// Ranks plausible candidates for the same known account. Higher is closer.
pub fn similarity_score<K, P>(known: &K, provider: &P) -> u32
where
    K: AccountFields + ?Sized,
    P: AccountFields + ?Sized,
{
    let mut score = 0;
    if known.vendor_account_id() == provider.vendor_account_id() {
        score += SAME_VENDOR_ID;
    }
    if let (Some(a), Some(b)) = (known.iban(), provider.iban()) {
        if a == b {
            score += SAME_IBAN;
        }
    }
    if known.label() == provider.label() {
        score += SAME_LABEL;
    }
    if known.currency() == provider.currency() {
        score += SAME_CURRENCY;
    }
    score
}
