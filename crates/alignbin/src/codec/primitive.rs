// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive codec: one scalar to or from exactly `width()` bytes.
//!
//! Callers hand in slices of the exact width; every bounds decision is made by
//! the sinks in [`super::cursor`] before a primitive ever sees the bytes.

use crate::types::{Complex, ScalarKind};
use byteorder::ByteOrder;
use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A value with a fixed wire representation of `KIND.width()` bytes.
///
/// Sealed: the set of scalars is closed.
pub trait Scalar:
    sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const KIND: ScalarKind;

    /// Write `self` into `buf`, which is exactly `KIND.width()` bytes.
    fn write<B: ByteOrder>(self, buf: &mut [u8]);

    /// Read a value from `buf`, which is exactly `KIND.width()` bytes.
    fn read<B: ByteOrder>(buf: &[u8]) -> Self;
}

/// Generate `Scalar` for multi-byte integers (eliminates code duplication)
macro_rules! impl_scalar_int {
    ($type:ty, $kind:ident, $write:ident, $read:ident) => {
        impl sealed::Sealed for $type {}

        impl Scalar for $type {
            const KIND: ScalarKind = ScalarKind::$kind;

            #[inline]
            fn write<B: ByteOrder>(self, buf: &mut [u8]) {
                B::$write(buf, self);
            }

            #[inline]
            fn read<B: ByteOrder>(buf: &[u8]) -> Self {
                B::$read(buf)
            }
        }
    };
}

impl_scalar_int!(i16, I16, write_i16, read_i16);
impl_scalar_int!(u16, U16, write_u16, read_u16);
impl_scalar_int!(i32, I32, write_i32, read_i32);
impl_scalar_int!(u32, U32, write_u32, read_u32);
impl_scalar_int!(i64, I64, write_i64, read_i64);
impl_scalar_int!(u64, U64, write_u64, read_u64);

impl sealed::Sealed for u8 {}

impl Scalar for u8 {
    const KIND: ScalarKind = ScalarKind::U8;

    #[inline]
    fn write<B: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = self;
    }

    #[inline]
    fn read<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0]
    }
}

impl sealed::Sealed for i8 {}

impl Scalar for i8 {
    const KIND: ScalarKind = ScalarKind::I8;

    #[inline]
    fn write<B: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = self as u8;
    }

    #[inline]
    fn read<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0] as i8
    }
}

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    #[inline]
    fn write<B: ByteOrder>(self, buf: &mut [u8]) {
        buf[0] = u8::from(self);
    }

    /// Any non-zero byte is `true`.
    #[inline]
    fn read<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

// Floats travel as their IEEE-754 bit patterns so NaN payloads survive.
impl sealed::Sealed for f32 {}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    #[inline]
    fn write<B: ByteOrder>(self, buf: &mut [u8]) {
        B::write_u32(buf, self.to_bits());
    }

    #[inline]
    fn read<B: ByteOrder>(buf: &[u8]) -> Self {
        f32::from_bits(B::read_u32(buf))
    }
}

impl sealed::Sealed for f64 {}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    #[inline]
    fn write<B: ByteOrder>(self, buf: &mut [u8]) {
        B::write_u64(buf, self.to_bits());
    }

    #[inline]
    fn read<B: ByteOrder>(buf: &[u8]) -> Self {
        f64::from_bits(B::read_u64(buf))
    }
}

/// Generate `Scalar` for complex numbers: real part, then imaginary part.
macro_rules! impl_scalar_complex {
    ($part:ty, $kind:ident, $half:expr) => {
        impl sealed::Sealed for Complex<$part> {}

        impl Scalar for Complex<$part> {
            const KIND: ScalarKind = ScalarKind::$kind;

            #[inline]
            fn write<B: ByteOrder>(self, buf: &mut [u8]) {
                let (re, im) = buf.split_at_mut($half);
                self.re.write::<B>(re);
                self.im.write::<B>(im);
            }

            #[inline]
            fn read<B: ByteOrder>(buf: &[u8]) -> Self {
                let (re, im) = buf.split_at($half);
                Complex::new(<$part>::read::<B>(re), <$part>::read::<B>(im))
            }
        }
    };
}

impl_scalar_complex!(f32, Complex64, 4);
impl_scalar_complex!(f64, Complex128, 8);

/// Re-encode one scalar of `kind` from byte order `S` in `src` to byte order
/// `D` in `dst`. Both slices are exactly `kind.width()` bytes.
///
/// Booleans are normalized to 0/1 on the way through.
pub(crate) fn transcode<S: ByteOrder, D: ByteOrder>(kind: ScalarKind, src: &[u8], dst: &mut [u8]) {
    match kind {
        ScalarKind::Bool => bool::read::<S>(src).write::<D>(dst),
        ScalarKind::I8 | ScalarKind::U8 => dst[0] = src[0],
        ScalarKind::I16 | ScalarKind::U16 => D::write_u16(dst, S::read_u16(src)),
        ScalarKind::I32 | ScalarKind::U32 | ScalarKind::F32 => {
            D::write_u32(dst, S::read_u32(src));
        }
        ScalarKind::I64 | ScalarKind::U64 | ScalarKind::F64 => {
            D::write_u64(dst, S::read_u64(src));
        }
        ScalarKind::Complex64 => Complex::<f32>::read::<S>(src).write::<D>(dst),
        ScalarKind::Complex128 => Complex::<f64>::read::<S>(src).write::<D>(dst),
    }
}
