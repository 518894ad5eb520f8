//! Module mode switch.

use std::env;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Environment variable controlling module mode.
pub const MODULES_ENV: &str = "MODFETCH_MODULES";

/// Whether module-aware operation is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModuleMode {
    /// Always enabled.
    On,
    /// Explicitly disabled; downloads are refused.
    Off,
    /// Enabled (the default).
    #[default]
    Auto,
}

impl ModuleMode {
    /// Read the mode from `MODFETCH_MODULES`; unset or blank means `Auto`.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(MODULES_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::Auto),
        }
    }

    /// Whether module mode is disabled.
    pub const fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }
}

impl FromStr for ModuleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "auto" => Ok(Self::Auto),
            _ => Err(ConfigError::InvalidMode {
                var: MODULES_ENV,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ModuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Auto => "auto",
        })
    }
}
