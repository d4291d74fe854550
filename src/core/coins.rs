//! Reward Amounts
//!
//! Multi-denomination amounts used for rewards and account balances.
//! A `Coins` value is always normalized: sorted by denom, one entry per denom,
//! no zero entries. The empty set is the zero amount.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Minimum denom length.
const DENOM_MIN_LEN: usize = 3;

/// Maximum denom length.
const DENOM_MAX_LEN: usize = 128;

/// Errors produced while building or combining amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinsError {
    /// Denom fails the naming rules.
    #[error("invalid denom: {0:?}")]
    InvalidDenom(String),
    /// A coin string could not be parsed.
    #[error("invalid coin expression: {0:?}")]
    InvalidCoin(String),
    /// The same denom appears twice.
    #[error("duplicate denom: {0}")]
    DuplicateDenom(String),
    /// Addition overflowed.
    #[error("amount overflow in {0}")]
    Overflow(String),
    /// Subtraction would go negative.
    #[error("insufficient {denom}: have {available}, need {needed}")]
    Insufficient {
        /// Denom that ran short.
        denom: String,
        /// Amount held.
        available: u64,
        /// Amount requested.
        needed: u64,
    },
}

/// A single denomination and amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination name, e.g. `token`.
    pub denom: String,
    /// Amount in base units.
    pub amount: u64,
}

impl Coin {
    /// Create a coin, validating the denom.
    pub fn new(denom: impl Into<String>, amount: u64) -> Result<Self, CoinsError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self { denom, amount })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinsError::InvalidCoin(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoinsError::InvalidCoin(s.to_string()));
        }
        let amount = amount
            .parse::<u64>()
            .map_err(|_| CoinsError::InvalidCoin(s.to_string()))?;
        Coin::new(denom, amount)
    }
}

/// Check a denom against the naming rules.
///
/// 3-128 characters, starting with a lowercase letter, followed by lowercase
/// letters, digits or one of `/:._-`.
pub fn validate_denom(denom: &str) -> Result<(), CoinsError> {
    let bytes = denom.as_bytes();
    let len_ok = (DENOM_MIN_LEN..=DENOM_MAX_LEN).contains(&bytes.len());
    let head_ok = bytes.first().is_some_and(|b| b.is_ascii_lowercase());
    let tail_ok = bytes.iter().skip(1).all(|&b| {
        b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'/' | b':' | b'.' | b'_' | b'-')
    });

    if len_ok && head_ok && tail_ok {
        Ok(())
    } else {
        Err(CoinsError::InvalidDenom(denom.to_string()))
    }
}

/// Normalized set of coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// The zero amount.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A single-denom amount.
    pub fn single(denom: impl Into<String>, amount: u64) -> Result<Self, CoinsError> {
        Self::from_coins(vec![Coin::new(denom, amount)?])
    }

    /// Normalize a list of coins. Zero entries are dropped.
    pub fn from_coins(coins: Vec<Coin>) -> Result<Self, CoinsError> {
        let mut by_denom: BTreeMap<String, u64> = BTreeMap::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            if by_denom.contains_key(&coin.denom) {
                return Err(CoinsError::DuplicateDenom(coin.denom));
            }
            by_denom.insert(coin.denom, coin.amount);
        }
        Ok(Self::from_map(by_denom))
    }

    /// Parse the comma-separated text form, e.g. `100token,5stake`.
    ///
    /// The empty string parses to the zero amount.
    pub fn parse(s: &str) -> Result<Self, CoinsError> {
        if s.trim().is_empty() {
            return Ok(Self::new());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_coins(coins)
    }

    fn from_map(map: BTreeMap<String, u64>) -> Self {
        Self(
            map.into_iter()
                .filter(|(_, amount)| *amount > 0)
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        )
    }

    fn to_map(&self) -> BTreeMap<String, u64> {
        self.0.iter().map(|c| (c.denom.clone(), c.amount)).collect()
    }

    /// True for the zero amount.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount held of one denom.
    pub fn amount_of(&self, denom: &str) -> u64 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map_or(0, |c| c.amount)
    }

    /// Iterate coins in denom order.
    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    /// Sum of two amounts.
    pub fn checked_add(&self, other: &Coins) -> Result<Coins, CoinsError> {
        let mut sum = self.to_map();
        for coin in &other.0 {
            let entry = sum.entry(coin.denom.clone()).or_insert(0);
            *entry = entry
                .checked_add(coin.amount)
                .ok_or_else(|| CoinsError::Overflow(coin.denom.clone()))?;
        }
        Ok(Self::from_map(sum))
    }

    /// Difference of two amounts; fails if any denom would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Result<Coins, CoinsError> {
        let mut diff = self.to_map();
        for coin in &other.0 {
            let available = diff.get(&coin.denom).copied().unwrap_or(0);
            let remaining = available
                .checked_sub(coin.amount)
                .ok_or_else(|| CoinsError::Insufficient {
                    denom: coin.denom.clone(),
                    available,
                    needed: coin.amount,
                })?;
            diff.insert(coin.denom.clone(), remaining);
        }
        Ok(Self::from_map(diff))
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinsError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Self::from_coins(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", coin)?;
        }
        Ok(())
    }
}
