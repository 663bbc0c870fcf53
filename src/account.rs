//! Account records and the field accessors the reconciler reads.

use std::fmt;

use crate::AccessId;

/// Read access to the fields the reconciler compares.
///
/// Implement this for your own record type to reconcile it directly; the
/// returned [`Classification`](crate::Classification) borrows your records
/// rather than copying them.
pub trait AccountFields {
    /// Bank connection this account belongs to.
    fn access_id(&self) -> AccessId;

    /// Human-readable name.
    fn label(&self) -> &str;

    /// Identifier assigned by the data provider. Not stable across syncs.
    fn vendor_account_id(&self) -> &str;

    /// International Bank Account Number, when the provider reports one.
    fn iban(&self) -> Option<&str>;

    /// Currency code, when the provider reports one.
    fn currency(&self) -> Option<&str>;
}

/// A bank account as reported by a provider or as previously persisted.
///
/// Provider payloads usually carry more fields (balances, types, dates);
/// those are ignored on deserialization.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Account {
    pub access_id: AccessId,
    pub label: String,
    pub vendor_account_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub iban: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub currency: Option<String>,
}

impl Account {
    /// Create an account with no IBAN and no currency.
    pub fn new(
        access_id: AccessId,
        label: impl Into<String>,
        vendor_account_id: impl Into<String>,
    ) -> Self {
        Self {
            access_id,
            label: label.into(),
            vendor_account_id: vendor_account_id.into(),
            iban: None,
            currency: None,
        }
    }

    /// Set the IBAN.
    pub fn with_iban(mut self, iban: impl Into<String>) -> Self {
        self.iban = Some(iban.into());
        self
    }

    /// Set the currency code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

impl AccountFields for Account {
    fn access_id(&self) -> AccessId {
        self.access_id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn vendor_account_id(&self) -> &str {
        &self.vendor_account_id
    }

    fn iban(&self) -> Option<&str> {
        self.iban.as_deref()
    }

    fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", describe(self))
    }
}

/// One-line description of any account record, used in reports.
///
/// `Checking account [1234abcd] EUR iban=FR76...`
pub fn describe<A: AccountFields + ?Sized>(account: &A) -> String {
    let mut out = format!("{} [{}]", account.label(), account.vendor_account_id());
    if let Some(currency) = account.currency() {
        out.push(' ');
        out.push_str(currency);
    }
    if let Some(iban) = account.iban() {
        out.push_str(" iban=");
        out.push_str(iban);
    }
    out
}
