// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `Aligned` trait and the leaf visitor seams it is built on.
//!
//! An `Aligned` type describes its own shape ([`Aligned::descriptor`]) and
//! walks its scalar leaves in declaration order ([`Aligned::store`] /
//! [`Aligned::load`]). Where those leaves land, in the wire buffer or in a
//! memory image, is decided by the compiled plan behind the sink or source,
//! never by the value.

use crate::codec::Scalar;
use crate::error::Result;
use crate::types::{Complex, ScalarKind, TypeDescriptor};

/// Receives the scalar leaves of a value, in declaration order.
pub trait LeafSink {
    fn put<T: Scalar>(&mut self, value: T) -> Result<()>;
}

/// Yields the scalar leaves of a value, in declaration order.
pub trait LeafSource {
    fn take<T: Scalar>(&mut self) -> Result<T>;
}

/// A fixed-size value the codec can lay out, encode and decode.
///
/// Implemented for every scalar, for [`Complex`], for `[T; N]`, and by
/// `#[derive(Aligned)]` for structs. Hand-written impls must visit exactly the
/// leaves their descriptor declares, in order, skipping skip fields; the
/// engine reports a `PlanMismatch` otherwise.
pub trait Aligned: Sized + 'static {
    /// `Some` for bare scalars, enabling the descriptor-free fast path.
    const SCALAR: Option<ScalarKind> = None;

    /// Shape of the type.
    fn descriptor() -> TypeDescriptor;

    /// Visit every non-skipped scalar leaf.
    fn store<S: LeafSink>(&self, sink: &mut S) -> Result<()>;

    /// Overwrite every non-skipped scalar leaf from `src`.
    fn load<S: LeafSource>(&mut self, src: &mut S) -> Result<()>;
}

/// Generate `Aligned` for scalars (eliminates code duplication)
macro_rules! impl_aligned_scalar {
    ($($type:ty),* $(,)?) => {
        $(
            impl Aligned for $type {
                const SCALAR: Option<ScalarKind> = Some(<$type as Scalar>::KIND);

                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Scalar(<$type as Scalar>::KIND)
                }

                #[inline]
                fn store<S: LeafSink>(&self, sink: &mut S) -> Result<()> {
                    sink.put(*self)
                }

                #[inline]
                fn load<S: LeafSource>(&mut self, src: &mut S) -> Result<()> {
                    *self = src.take::<$type>()?;
                    Ok(())
                }
            }
        )*
    };
}

impl_aligned_scalar!(bool, i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, Complex<f32>, Complex<f64>);

impl<T: Aligned, const N: usize> Aligned for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array(T::descriptor(), N)
    }

    fn store<S: LeafSink>(&self, sink: &mut S) -> Result<()> {
        self.iter().try_for_each(|item| item.store(sink))
    }

    fn load<S: LeafSource>(&mut self, src: &mut S) -> Result<()> {
        self.iter_mut().try_for_each(|item| item.load(src))
    }
}

/// Anything the engine accepts as a message: one `Aligned` value or a slice
/// of them.
///
/// Both views collapse to a slice of items, so the engine only has one shape
/// to dispatch on.
pub trait Message {
    type Item: Aligned;

    fn items(&self) -> &[Self::Item];

    fn items_mut(&mut self) -> &mut [Self::Item];
}

impl<T: Aligned> Message for T {
    type Item = T;

    fn items(&self) -> &[T] {
        std::slice::from_ref(self)
    }

    fn items_mut(&mut self) -> &mut [T] {
        std::slice::from_mut(self)
    }
}

impl<T: Aligned> Message for [T] {
    type Item = T;

    fn items(&self) -> &[T] {
        self
    }

    fn items_mut(&mut self) -> &mut [T] {
        self
    }
}
