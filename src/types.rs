//! Core types: AccessId

use std::fmt;

/// Identifier of the bank connection ("access") an account was fetched through.
///
/// Opaque to the reconciler: it is only ever compared for equality. Accounts
/// under different accesses are never paired with each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessId(pub u64);

impl fmt::Display for AccessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "access#{}", self.0)
    }
}

impl From<u64> for AccessId {
    fn from(id: u64) -> Self {
        AccessId(id)
    }
}
