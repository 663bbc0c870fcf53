//! Account list files (known.json / provider.json) loading.
//!
//! A file holds a top-level JSON array of account objects. Anything else at
//! the top level is rejected.

use std::path::Path;

use acctdiff::Account;
use log::warn;
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Load an account list from a JSON file.
pub fn load(path: &Path) -> Result<Vec<Account>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::AccountsRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let accounts = from_json(&contents)?;
    warn_on_repeats(&accounts, &path.display().to_string());
    Ok(accounts)
}

/// Parse an account list from a JSON string (useful for testing).
pub fn from_json(json: &str) -> Result<Vec<Account>> {
    Ok(serde_json::from_str(json)?)
}

/// Accounts repeating an (access, vendor id) pair seen earlier in the list.
///
/// Repeats are legal input; each record is still classified once.
pub fn repeated_vendor_ids(accounts: &[Account]) -> Vec<&Account> {
    let mut seen = FxHashSet::default();
    accounts
        .iter()
        .filter(|a| !seen.insert((a.access_id, a.vendor_account_id.as_str())))
        .collect()
}

fn warn_on_repeats(accounts: &[Account], source: &str) {
    for account in repeated_vendor_ids(accounts) {
        warn!(
            "{source}: vendor id {} appears more than once under {}",
            account.vendor_account_id, account.access_id
        );
    }
}
