//! Ledger Collaborator
//!
//! The protocol never moves value itself. It asks a [`Bank`] to transfer
//! coins between accounts; the bank must apply a transfer completely or not
//! at all.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::core::{Address, Coins, CoinsError};

/// Errors reported by a bank transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Sender cannot cover the amount.
    #[error("insufficient funds in {address}: {source}")]
    InsufficientFunds {
        /// Sending account.
        address: Address,
        /// Underlying arithmetic failure.
        #[source]
        source: CoinsError,
    },
    /// Receiver balance would overflow.
    #[error("balance overflow in {address}: {source}")]
    Overflow {
        /// Receiving account.
        address: Address,
        /// Underlying arithmetic failure.
        #[source]
        source: CoinsError,
    },
    /// The ledger refused the transfer for its own reasons.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Value-transfer capability of the host ledger.
pub trait Bank {
    /// Move `amount` from `from` to `to`. Must not partially apply.
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<(), TransferError>;

    /// Current balance of an account.
    fn balance(&self, address: &Address) -> Coins;
}

/// In-memory ledger with per-account balances.
#[derive(Clone, Debug, Default)]
pub struct MemoryBank {
    balances: BTreeMap<Address, Coins>,
}

impl MemoryBank {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit newly created coins to an account.
    pub fn mint(&mut self, address: &Address, amount: &Coins) -> Result<(), TransferError> {
        let updated = self
            .balance(address)
            .checked_add(amount)
            .map_err(|source| TransferError::Overflow { address: address.clone(), source })?;
        self.set_balance(address, updated);
        Ok(())
    }

    /// All non-zero balances, ordered by address.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Coins)> {
        self.balances.iter()
    }

    /// Overwrite balances buffered by a [`BankCache`].
    pub fn apply(&mut self, balances: BTreeMap<Address, Coins>) {
        for (address, amount) in balances {
            self.set_balance(&address, amount);
        }
    }

    fn set_balance(&mut self, address: &Address, amount: Coins) {
        if amount.is_zero() {
            self.balances.remove(address);
        } else {
            self.balances.insert(address.clone(), amount);
        }
    }
}

impl Bank for MemoryBank {
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<(), TransferError> {
        let (from_after, to_after) = settle(&*self, from, to, amount)?;
        self.set_balance(from, from_after);
        self.set_balance(to, to_after);

        debug!(%from, %to, %amount, "transfer applied");
        Ok(())
    }

    fn balance(&self, address: &Address) -> Coins {
        self.balances.get(address).cloned().unwrap_or_default()
    }
}

/// Balances of both sides after a transfer, computed before writing either.
fn settle(bank: &dyn Bank, from: &Address, to: &Address, amount: &Coins) -> Result<(Coins, Coins), TransferError> {
    let from_after = bank
        .balance(from)
        .checked_sub(amount)
        .map_err(|source| TransferError::InsufficientFunds { address: from.clone(), source })?;
    let to_before = if from == to { from_after.clone() } else { bank.balance(to) };
    let to_after = to_before
        .checked_add(amount)
        .map_err(|source| TransferError::Overflow { address: to.clone(), source })?;
    Ok((from_after, to_after))
}

/// Write buffer over a [`MemoryBank`].
///
/// Transfers update only the accounts they touch, in the buffer. The parent
/// is unchanged until the buffered balances are applied with
/// [`MemoryBank::apply`].
#[derive(Debug)]
pub struct BankCache<'a> {
    parent: &'a MemoryBank,
    dirty: BTreeMap<Address, Coins>,
}

impl<'a> BankCache<'a> {
    /// Start an empty buffer over `parent`.
    pub fn new(parent: &'a MemoryBank) -> Self {
        Self { parent, dirty: BTreeMap::new() }
    }

    /// Final balances of every touched account.
    pub fn into_balances(self) -> BTreeMap<Address, Coins> {
        self.dirty
    }
}

impl Bank for BankCache<'_> {
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<(), TransferError> {
        let (from_after, to_after) = settle(&*self, from, to, amount)?;
        self.dirty.insert(from.clone(), from_after);
        self.dirty.insert(to.clone(), to_after);
        Ok(())
    }

    fn balance(&self, address: &Address) -> Coins {
        match self.dirty.get(address) {
            Some(coins) => coins.clone(),
            None => self.parent.balance(address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        Coins::parse(s).unwrap()
    }

    #[test]
    fn test_transfer_moves_value() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &coins("100token")).unwrap();

        bank.transfer(&alice, &bob, &coins("30token")).unwrap();

        assert_eq!(bank.balance(&alice), coins("70token"));
        assert_eq!(bank.balance(&bob), coins("30token"));
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &coins("10token")).unwrap();

        let err = bank.transfer(&alice, &bob, &coins("5token,1stake")).unwrap_err();

        assert!(matches!(err, TransferError::InsufficientFunds { .. }));
        assert_eq!(bank.balance(&alice), coins("10token"));
        assert!(bank.balance(&bob).is_zero());
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let alice = Address::new("alice");
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &coins("10token")).unwrap();

        bank.transfer(&alice, &alice, &coins("10token")).unwrap();

        assert_eq!(bank.balance(&alice), coins("10token"));
    }

    #[test]
    fn test_zero_transfer_from_empty_account() {
        let mut bank = MemoryBank::new();
        bank.transfer(&Address::new("nobody"), &Address::new("alice"), &Coins::new())
            .unwrap();
        assert_eq!(bank.balances().count(), 0);
    }

    #[test]
    fn test_cache_leaves_parent_until_applied() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &coins("100token")).unwrap();

        let mut cache = BankCache::new(&bank);
        cache.transfer(&alice, &bob, &coins("30token")).unwrap();
        cache.transfer(&bob, &alice, &coins("10token")).unwrap();
        assert_eq!(cache.balance(&alice), coins("80token"));
        assert_eq!(cache.balance(&bob), coins("20token"));

        let balances = cache.into_balances();
        assert_eq!(bank.balance(&alice), coins("100token"));
        assert!(bank.balance(&bob).is_zero());

        bank.apply(balances);
        assert_eq!(bank.balance(&alice), coins("80token"));
        assert_eq!(bank.balance(&bob), coins("20token"));
    }

    #[test]
    fn test_cache_rejects_like_parent() {
        let alice = Address::new("alice");
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &coins("10token")).unwrap();

        let mut cache = BankCache::new(&bank);
        let err = cache.transfer(&alice, &Address::new("bob"), &coins("11token")).unwrap_err();

        assert!(matches!(err, TransferError::InsufficientFunds { .. }));
        assert!(cache.into_balances().is_empty());
    }

    #[test]
    fn test_apply_drops_emptied_accounts() {
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        let mut bank = MemoryBank::new();
        bank.mint(&alice, &coins("10token")).unwrap();

        let mut cache = BankCache::new(&bank);
        cache.transfer(&alice, &bob, &coins("10token")).unwrap();
        let balances = cache.into_balances();
        bank.apply(balances);

        let holders: Vec<&Address> = bank.balances().map(|(a, _)| a).collect();
        assert_eq!(holders, vec![&bob]);
    }
}
