// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every alignbin operation.

use thiserror::Error;

/// Errors returned by layout calculation, codec compilation and encode/decode.
///
/// `ShortBuffer` and `Io` are ordinary runtime conditions. Every other variant
/// means the calling program handed the engine something it can never accept.
#[derive(Debug, Error)]
pub enum Error {
    /// Alignment factor is not 0 (default) or a power of two <= 8.
    #[error("invalid alignment factor: {0} (must be 0, 1, 2, 4 or 8)")]
    InvalidAlignFactor(u8),

    /// A configuration value could not be parsed.
    #[error("invalid configuration value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    /// The value or descriptor is not a scalar, fixed array or fixed aggregate.
    #[error("unsupported type {type_name}: {reason}")]
    UnsupportedType {
        type_name: String,
        reason: &'static str,
    },

    /// Decode source holds fewer bytes than the computed size.
    #[error("short buffer: need {need} bytes, have {have}")]
    ShortBuffer { need: usize, have: usize },

    /// A value visited a different scalar than its compiled plan expected.
    #[error("leaf plan mismatch: expected {expected}, found {found}")]
    PlanMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A leaf span fell outside the region it addresses.
    #[error("layout violation: {width} bytes at offset {offset} exceed region of {region} bytes")]
    LayoutViolation {
        offset: usize,
        width: usize,
        region: usize,
    },

    /// Error raised by the byte sink or source, passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unsupported(type_name: impl Into<String>, reason: &'static str) -> Self {
        Error::UnsupportedType {
            type_name: type_name.into(),
            reason,
        }
    }

    /// `true` for conditions a caller may retry or recover from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ShortBuffer { .. } | Error::Io(_))
    }

    /// Kind of the underlying sink/source error, if this is one.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Error::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_variants() {
        let err = Error::ShortBuffer { need: 4, have: 3 };
        assert_eq!(err.to_string(), "short buffer: need 4 bytes, have 3");

        let err = Error::InvalidAlignFactor(3);
        assert_eq!(
            err.to_string(),
            "invalid alignment factor: 3 (must be 0, 1, 2, 4 or 8)"
        );

        let err = Error::unsupported("Vec<u8>", "dynamic-length sequence");
        assert_eq!(
            err.to_string(),
            "unsupported type Vec<u8>: dynamic-length sequence"
        );

        let err = Error::LayoutViolation {
            offset: 10,
            width: 4,
            region: 12,
        };
        assert_eq!(
            err.to_string(),
            "layout violation: 4 bytes at offset 10 exceed region of 12 bytes"
        );
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io.into();
        assert_eq!(err.to_string(), "pipe closed");
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::BrokenPipe));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_programmer_errors_are_not_recoverable() {
        assert!(!Error::InvalidAlignFactor(16).is_recoverable());
        assert!(!Error::InvalidConfig {
            key: "align",
            value: "seven".into()
        }
        .is_recoverable());
        assert!(!Error::unsupported("Map", "not fixed-size").is_recoverable());
        assert!(!Error::PlanMismatch {
            expected: "u32",
            found: "i32"
        }
        .is_recoverable());
        assert!(Error::ShortBuffer { need: 8, have: 0 }.is_recoverable());
        assert_eq!(Error::ShortBuffer { need: 8, have: 0 }.io_kind(), None);
    }
}
