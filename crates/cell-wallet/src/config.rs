//! Wallet configuration.
//!
//! Provides [`WalletConfig`] with defaults for the minimum cell capacity and
//! the pagination window. It can be built programmatically, deserialized
//! from a host application's config file, or read from the environment.

use std::env::VarError;

use serde::Deserialize;

use cell_core::constants::{DEFAULT_MIN_CELL_CAPACITY, DEFAULT_PAGE_WINDOW};

use crate::error::WalletError;

/// Environment variable overriding [`WalletConfig::min_capacity`].
pub const ENV_MIN_CAPACITY: &str = "CELL_WALLET_MIN_CAPACITY";

/// Environment variable overriding [`WalletConfig::page_window`].
pub const ENV_PAGE_WINDOW: &str = "CELL_WALLET_PAGE_WINDOW";

/// Tunables for a [`Wallet`](crate::Wallet).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Smallest capacity an output cell may carry.
    pub min_capacity: u64,
    /// Number of blocks covered by each cell query.
    pub page_window: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CELL_CAPACITY,
            page_window: DEFAULT_PAGE_WINDOW,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, WalletError> {
        let defaults = Self::default();
        let config = Self {
            min_capacity: env_u64(ENV_MIN_CAPACITY, defaults.min_capacity)?,
            page_window: env_u64(ENV_PAGE_WINDOW, defaults.page_window)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pager cannot work with.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.page_window == 0 {
            return Err(WalletError::Config("page_window must be non-zero".into()));
        }
        Ok(())
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, WalletError> {
    parse_u64_var(name, std::env::var(name), default)
}

fn parse_u64_var(
    name: &str,
    value: Result<String, VarError>,
    default: u64,
) -> Result<u64, WalletError> {
    match value {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| WalletError::Config(format!("{name} must be a non-negative integer"))),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => {
            Err(WalletError::Config(format!("{name} is not valid UTF-8")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = WalletConfig::default();
        assert_eq!(cfg.min_capacity, DEFAULT_MIN_CELL_CAPACITY);
        assert_eq!(cfg.page_window, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_window_rejected() {
        let cfg = WalletConfig {
            page_window: 0,
            ..WalletConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(WalletError::Config(_))));
    }

    #[test]
    fn deserialize_partial_uses_defaults() {
        let cfg: WalletConfig = serde_json::from_str(r#"{"min_capacity": 61}"#).unwrap();
        assert_eq!(cfg.min_capacity, 61);
        assert_eq!(cfg.page_window, DEFAULT_PAGE_WINDOW);
    }

    #[test]
    fn env_u64_falls_back_when_unset() {
        assert_eq!(env_u64("CELL_WALLET_TEST_SURELY_UNSET_VAR", 7).unwrap(), 7);
    }

    #[test]
    fn set_but_non_utf8_is_config_error() {
        let raw = std::ffi::OsString::from("61");
        let err = parse_u64_var(ENV_MIN_CAPACITY, Err(VarError::NotUnicode(raw)), 7).unwrap_err();
        assert!(matches!(err, WalletError::Config(ref m) if m.contains(ENV_MIN_CAPACITY)));
    }

    #[test]
    fn set_but_unparsable_is_config_error() {
        let err = parse_u64_var(ENV_PAGE_WINDOW, Ok("ten".into()), 7).unwrap_err();
        assert_eq!(
            err,
            WalletError::Config(format!("{ENV_PAGE_WINDOW} must be a non-negative integer"))
        );
    }

    #[test]
    fn set_value_is_trimmed() {
        assert_eq!(parse_u64_var(ENV_PAGE_WINDOW, Ok(" 250\n".into()), 7).unwrap(), 250);
    }
}
