// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration.
//!
//! The alignment factor is the only tunable. It is validated when it enters
//! the system (`TryFrom<u8>`, `FromStr`, environment, config file), so an
//! [`Engine`](crate::Engine) can never hold an invalid one.
//!
//! ```
//! use alignbin::{AlignFactor, EngineConfig};
//!
//! let config = EngineConfig::default().with_align(AlignFactor::Four);
//! assert_eq!(config.align.as_u8(), 4);
//! assert!(AlignFactor::try_from(3u8).is_err());
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Environment variable read by [`EngineConfig::from_env`].
pub const ENV_ALIGN_FACTOR: &str = "ALIGNBIN_ALIGN_FACTOR";

/// Maximum alignment honored for any field, the moral equivalent of
/// `#pragma pack(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "u8"))]
#[repr(u8)]
pub enum AlignFactor {
    /// Natural alignment of every type, no capping.
    #[default]
    Default = 0,
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl AlignFactor {
    /// Raw value (0 for `Default`).
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Effective alignment for a type whose natural alignment is `natural`.
    pub const fn cap(self, natural: usize) -> usize {
        match self {
            AlignFactor::Default => natural,
            other => {
                let max = other as usize;
                if natural < max {
                    natural
                } else {
                    max
                }
            }
        }
    }
}

impl TryFrom<u8> for AlignFactor {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(AlignFactor::Default),
            1 => Ok(AlignFactor::One),
            2 => Ok(AlignFactor::Two),
            4 => Ok(AlignFactor::Four),
            8 => Ok(AlignFactor::Eight),
            other => Err(Error::InvalidAlignFactor(other)),
        }
    }
}

impl FromStr for AlignFactor {
    type Err = Error;

    /// Accepts `default`, `natural`, a number, or `pack(n)`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_ascii_lowercase();
        if trimmed == "default" || trimmed == "natural" {
            return Ok(AlignFactor::Default);
        }
        let digits = trimmed
            .strip_prefix("pack(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(&trimmed);
        let raw: u8 = digits.trim().parse().map_err(|_| Error::InvalidConfig {
            key: "align_factor",
            value: s.to_string(),
        })?;
        AlignFactor::try_from(raw)
    }
}

impl fmt::Display for AlignFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignFactor::Default => write!(f, "default"),
            other => write!(f, "pack({})", other.as_u8()),
        }
    }
}

/// Settings for building an [`Engine`](crate::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct EngineConfig {
    /// Maximum field alignment.
    pub align: AlignFactor,
}

impl EngineConfig {
    pub fn with_align(mut self, align: AlignFactor) -> Self {
        self.align = align;
        self
    }

    /// Read the configuration from `ALIGNBIN_ALIGN_FACTOR`.
    ///
    /// Unset means `AlignFactor::Default`; a value that does not parse fails.
    pub fn from_env() -> Result<Self> {
        Self::from_env_value(std::env::var(ENV_ALIGN_FACTOR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self> {
        let align = match value {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => AlignFactor::Default,
        };
        Ok(Self { align })
    }
}
