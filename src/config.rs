//! Engine Configuration
//!
//! Policy knobs for the protocol engine. Loaded from the environment by the
//! binary; tests build it directly.

use serde::{Serialize, Deserialize};

use crate::core::Address;

/// Module name used when nothing else is configured.
pub const DEFAULT_MODULE_NAME: &str = "scavenge";

/// What to do when a reveal's supplied solution hash disagrees with the hash
/// of the revealed plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashMismatchPolicy {
    /// Reject the reveal with `HashMismatch`.
    #[default]
    Strict,
    /// Log a warning and continue with the derived hash.
    Lenient,
}

impl HashMismatchPolicy {
    /// Parse `strict` / `lenient` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "lenient" => Some(Self::Lenient),
            _ => None,
        }
    }
}

/// Protocol engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Module name; the escrow account is derived from it.
    pub module_name: String,
    /// Handling of supplied-vs-derived solution hash disagreement.
    pub hash_policy: HashMismatchPolicy,
    /// Whether a scavenge may be posted with a zero reward.
    pub allow_zero_reward: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            hash_policy: HashMismatchPolicy::Strict,
            allow_zero_reward: true,
        }
    }
}

/// Parse a boolean flag: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`
/// (case-insensitive).
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    ///
    /// Unset or unparseable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Create config from any variable source, e.g. a map in tests.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let module_name = var("SCAVENGE_MODULE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.module_name);
        let hash_policy = var("SCAVENGE_HASH_POLICY")
            .and_then(|v| HashMismatchPolicy::parse(&v))
            .unwrap_or(defaults.hash_policy);
        let allow_zero_reward = var("SCAVENGE_ALLOW_ZERO_REWARD")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.allow_zero_reward);

        Self {
            module_name,
            hash_policy,
            allow_zero_reward,
        }
    }

    /// The escrow account holding posted rewards.
    pub fn escrow_account(&self) -> Address {
        Address::module_account(&self.module_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.module_name, "scavenge");
        assert_eq!(config.hash_policy, HashMismatchPolicy::Strict);
        assert!(config.allow_zero_reward);
        assert_eq!(config.escrow_account(), Address::module_account("scavenge"));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(HashMismatchPolicy::parse("Strict"), Some(HashMismatchPolicy::Strict));
        assert_eq!(HashMismatchPolicy::parse(" lenient "), Some(HashMismatchPolicy::Lenient));
        assert_eq!(HashMismatchPolicy::parse("loose"), None);
    }

    #[test]
    fn test_flag_parse() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" yes "), Some(true));
        assert_eq!(parse_flag("Off"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [
            ("SCAVENGE_MODULE_NAME", "hunt"),
            ("SCAVENGE_HASH_POLICY", "LENIENT"),
            ("SCAVENGE_ALLOW_ZERO_REWARD", "No"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::from_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.module_name, "hunt");
        assert_eq!(config.hash_policy, HashMismatchPolicy::Lenient);
        assert!(!config.allow_zero_reward);
        assert_eq!(config.escrow_account(), Address::module_account("hunt"));
    }

    #[test]
    fn test_from_vars_falls_back_on_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("SCAVENGE_MODULE_NAME", "  "),
            ("SCAVENGE_HASH_POLICY", "loose"),
            ("SCAVENGE_ALLOW_ZERO_REWARD", "TRUE-ish"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::from_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.module_name, DEFAULT_MODULE_NAME);
        assert_eq!(config.hash_policy, HashMismatchPolicy::Strict);
        assert!(config.allow_zero_reward);
    }

    #[test]
    fn test_from_env() {
        // only test in the crate that touches these variables
        std::env::set_var("SCAVENGE_HASH_POLICY", "Lenient");
        std::env::set_var("SCAVENGE_ALLOW_ZERO_REWARD", "TRUE");
        std::env::remove_var("SCAVENGE_MODULE_NAME");

        let config = EngineConfig::from_env();

        std::env::remove_var("SCAVENGE_HASH_POLICY");
        std::env::remove_var("SCAVENGE_ALLOW_ZERO_REWARD");

        assert_eq!(config.module_name, DEFAULT_MODULE_NAME);
        assert_eq!(config.hash_policy, HashMismatchPolicy::Lenient);
        assert!(config.allow_zero_reward);
    }
}
