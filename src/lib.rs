//! # acctdiff
//!
//! Deterministic reconciliation of bank accounts: given the accounts you
//! already know and the accounts a data provider just returned, find out
//! which ones are unchanged, which ones disappeared, which ones are new, and
//! which ones are probably the same account with changed details.
//!
//! ## Why not match on an identifier?
//!
//! Providers renumber accounts, and start or stop reporting IBANs between two
//! syncs. No single field identifies an account, so pairing is a similarity
//! judgment over the vendor account id, IBAN, label and currency.
//!
//! ## Quick Start
//!
//! ```
//! use acctdiff::{reconcile, AccessId, Account};
//!
//! let known = vec![
//!     Account::new(AccessId(0), "Checking account", "1234abcd"),
//!     Account::new(AccessId(0), "Savings account", "0147200001")
//!         .with_iban("1234 5678 9012 34")
//!         .with_currency("EUR"),
//! ];
//!
//! // The provider renumbered the checking account and dropped the savings IBAN.
//! let provider = vec![
//!     Account::new(AccessId(0), "Savings account", "0147200001").with_currency("EUR"),
//!     Account::new(AccessId(0), "Checking account", "lolololol"),
//! ];
//!
//! let result = reconcile(&known, &provider);
//!
//! assert!(result.perfect_matches.is_empty());
//! assert_eq!(result.duplicate_candidates.len(), 2);
//! assert!(std::ptr::eq(result.duplicate_candidates[0].0, &known[0]));
//! assert!(std::ptr::eq(result.duplicate_candidates[0].1, &provider[1]));
//! ```
//!
//! ## Classification
//!
//! | List | Meaning | Typical follow-up |
//! |------|---------|-------------------|
//! | `perfect_matches` | unchanged | nothing |
//! | `duplicate_candidates` | probably the same account, but changed | ask a human: merge or keep separate |
//! | `known_orphans` | no longer reported | mark disabled |
//! | `provider_orphans` | newly reported | create |
//!
//! Accounts from different accesses (bank connections) are never paired.
//!
//! ## Your own record types
//!
//! Implement [`AccountFields`] to reconcile records without converting them:
//!
//! ```
//! use acctdiff::{reconcile, AccessId, AccountFields};
//!
//! struct Row {
//!     id: i64,
//!     access: u64,
//!     name: String,
//!     number: String,
//! }
//!
//! impl AccountFields for Row {
//!     fn access_id(&self) -> AccessId { AccessId(self.access) }
//!     fn label(&self) -> &str { &self.name }
//!     fn vendor_account_id(&self) -> &str { &self.number }
//!     fn iban(&self) -> Option<&str> { None }
//!     fn currency(&self) -> Option<&str> { None }
//! }
//!
//! let stored = vec![Row { id: 17, access: 1, name: "Card".into(), number: "42".into() }];
//! let fetched = vec![Row { id: 0, access: 1, name: "Card".into(), number: "42".into() }];
//!
//! let result = reconcile(&stored, &fetched);
//! assert_eq!(result.perfect_matches[0].0.id, 17);
//! ```

mod account;
mod classification;
mod reconcile;
pub mod similarity;
mod types;

// Re-export public API
pub use account::{Account, AccountFields, describe};
pub use classification::{Classification, Pair};
pub use reconcile::reconcile;
pub use types::AccessId;
