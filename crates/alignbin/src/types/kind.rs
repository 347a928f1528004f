// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar kinds and the complex number value type.

use std::fmt;

/// Every scalar the codec knows how to put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Two `f32`s, real part first.
    Complex64,
    /// Two `f64`s, real part first.
    Complex128,
}

impl ScalarKind {
    /// All kinds, in declaration order.
    pub const ALL: [ScalarKind; 13] = [
        ScalarKind::Bool,
        ScalarKind::I8,
        ScalarKind::U8,
        ScalarKind::I16,
        ScalarKind::U16,
        ScalarKind::I32,
        ScalarKind::U32,
        ScalarKind::I64,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
        ScalarKind::Complex64,
        ScalarKind::Complex128,
    ];

    /// Size in bytes, in memory and on the wire.
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 | Self::Complex64 => 8,
            Self::Complex128 => 16,
        }
    }

    /// Alignment under `AlignFactor::Default`. Always equal to the width.
    ///
    /// For the complex kinds this is stricter than C's `_Complex` types and
    /// Rust's [`Complex`], which align to their component (4 and 8). Layouts
    /// holding complex fields match a C struct only under a pack factor at or
    /// below the component width.
    pub const fn natural_align(self) -> usize {
        self.width()
    }

    /// Short lowercase name, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complex number stored as `re` followed by `im`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// Two `f32`s, 8 bytes on the wire, aligned to 8 under `AlignFactor::Default`.
pub type Complex64 = Complex<f32>;
/// Two `f64`s, 16 bytes on the wire, aligned to 16 under `AlignFactor::Default`.
pub type Complex128 = Complex<f64>;
