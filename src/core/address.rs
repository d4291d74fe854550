//! Account Addresses
//!
//! Identities reach the protocol already authenticated; the core only needs
//! their canonical string form, which is what gets hashed into commitments.

use std::fmt;
use serde::{Serialize, Deserialize};

use super::hash::hash_bytes;

/// Number of digest bytes kept for a module account address.
const MODULE_ADDRESS_LEN: usize = 20;

/// Account identity in canonical string form.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an already-verified identity string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Derive the account owned by a protocol module.
    ///
    /// This is the only escrow derivation: deposits at creation and payouts
    /// at reveal both go through it.
    pub fn module_account(module_name: &str) -> Self {
        let digest = hash_bytes(module_name.as_bytes());
        Self(hex::encode(&digest[..MODULE_ADDRESS_LEN]))
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty identity, which no message may carry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_account_is_stable() {
        let a = Address::module_account("scavenge");
        let b = Address::module_account("scavenge");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "8f781b5e8f53fe5e6800e27df62f06bac7494bbb");
    }

    #[test]
    fn test_module_accounts_differ_by_name() {
        assert_ne!(Address::module_account("scavenge"), Address::module_account("bank"));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Address::new("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
