// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked leaf sinks and sources.
//!
//! Two families:
//! - dense cursors walk a buffer sequentially, for bare scalars and scalar slices
//! - plan cursors place each leaf at the offset its compiled [`Leaf`] names,
//!   either in the wire buffer (byte order `B`) or in a native-endian memory image
//!
//! Every access is checked against the buffer, and every leaf is checked
//! against the kind the plan expects, so a value whose `Aligned` impl disagrees
//! with its descriptor fails instead of scribbling over the wrong bytes.

use super::plan::Leaf;
use super::primitive::Scalar;
use crate::error::{Error, Result};
use crate::traits::{LeafSink, LeafSource};
use crate::types::ScalarKind;
use byteorder::{ByteOrder, NativeEndian};
use std::marker::PhantomData;

/// Which offset of a [`Leaf`] a plan cursor addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Region {
    Wire,
    Memory,
}

impl Region {
    #[inline]
    fn offset(self, leaf: &Leaf) -> usize {
        match self {
            Region::Wire => leaf.wire_offset,
            Region::Memory => leaf.mem_offset,
        }
    }
}

/// Resolve `width` bytes at `offset` inside a buffer of `have` bytes.
#[inline]
fn span(offset: usize, width: usize, have: usize) -> Result<std::ops::Range<usize>> {
    match offset.checked_add(width) {
        Some(end) if end <= have => Ok(offset..end),
        Some(end) => Err(Error::ShortBuffer { need: end, have }),
        None => Err(Error::ShortBuffer {
            need: usize::MAX,
            have,
        }),
    }
}

#[inline]
fn check_kind<T: Scalar>(expected: ScalarKind) -> Result<()> {
    if T::KIND != expected {
        return Err(Error::PlanMismatch {
            expected: expected.name(),
            found: T::KIND.name(),
        });
    }
    Ok(())
}

fn plan_exhausted<T: Scalar>() -> Error {
    Error::PlanMismatch {
        expected: "end of value",
        found: T::KIND.name(),
    }
}

fn plan_unfinished(remaining: &Leaf) -> Error {
    Error::PlanMismatch {
        expected: remaining.kind.name(),
        found: "end of value",
    }
}

/// Sequential writer for one scalar kind.
pub(crate) struct DenseWriter<'a, B> {
    buf: &'a mut [u8],
    kind: ScalarKind,
    pos: usize,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> DenseWriter<'a, B> {
    pub(crate) fn new(kind: ScalarKind, buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            kind,
            pos: 0,
            _order: PhantomData,
        }
    }

    /// Bytes written so far.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl<B: ByteOrder> LeafSink for DenseWriter<'_, B> {
    #[inline]
    fn put<T: Scalar>(&mut self, value: T) -> Result<()> {
        check_kind::<T>(self.kind)?;
        let range = span(self.pos, T::KIND.width(), self.buf.len())?;
        self.pos = range.end;
        value.write::<B>(&mut self.buf[range]);
        Ok(())
    }
}

/// Sequential reader for one scalar kind.
pub(crate) struct DenseReader<'a, B> {
    buf: &'a [u8],
    kind: ScalarKind,
    pos: usize,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> DenseReader<'a, B> {
    pub(crate) fn new(kind: ScalarKind, buf: &'a [u8]) -> Self {
        Self {
            buf,
            kind,
            pos: 0,
            _order: PhantomData,
        }
    }

    /// Bytes consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl<B: ByteOrder> LeafSource for DenseReader<'_, B> {
    #[inline]
    fn take<T: Scalar>(&mut self) -> Result<T> {
        check_kind::<T>(self.kind)?;
        let range = span(self.pos, T::KIND.width(), self.buf.len())?;
        self.pos = range.end;
        Ok(T::read::<B>(&self.buf[range]))
    }
}

/// Writer that follows a compiled leaf plan.
pub(crate) struct PlanWriter<'a, B> {
    leaves: &'a [Leaf],
    next: usize,
    region: Region,
    buf: &'a mut [u8],
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> PlanWriter<'a, B> {
    /// Write leaves at their wire offsets, in byte order `B`.
    pub(crate) fn wire(leaves: &'a [Leaf], buf: &'a mut [u8]) -> Self {
        Self::with_region(leaves, buf, Region::Wire)
    }

    fn with_region(leaves: &'a [Leaf], buf: &'a mut [u8], region: Region) -> Self {
        Self {
            leaves,
            next: 0,
            region,
            buf,
            _order: PhantomData,
        }
    }

    /// Fail unless every leaf in the plan was written.
    pub(crate) fn finish(self) -> Result<()> {
        match self.leaves.get(self.next) {
            Some(leaf) => Err(plan_unfinished(leaf)),
            None => Ok(()),
        }
    }
}

impl<'a> PlanWriter<'a, NativeEndian> {
    /// Write leaves at their memory offsets, in native byte order.
    pub(crate) fn memory(leaves: &'a [Leaf], image: &'a mut [u8]) -> Self {
        Self::with_region(leaves, image, Region::Memory)
    }
}

impl<B: ByteOrder> LeafSink for PlanWriter<'_, B> {
    #[inline]
    fn put<T: Scalar>(&mut self, value: T) -> Result<()> {
        let leaf = self.leaves.get(self.next).ok_or_else(plan_exhausted::<T>)?;
        check_kind::<T>(leaf.kind)?;
        let range = span(self.region.offset(leaf), T::KIND.width(), self.buf.len())?;
        self.next += 1;
        value.write::<B>(&mut self.buf[range]);
        Ok(())
    }
}

/// Reader that follows a compiled leaf plan.
pub(crate) struct PlanReader<'a, B> {
    leaves: &'a [Leaf],
    next: usize,
    region: Region,
    buf: &'a [u8],
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> PlanReader<'a, B> {
    /// Read leaves from their wire offsets, in byte order `B`.
    pub(crate) fn wire(leaves: &'a [Leaf], buf: &'a [u8]) -> Self {
        Self::with_region(leaves, buf, Region::Wire)
    }

    fn with_region(leaves: &'a [Leaf], buf: &'a [u8], region: Region) -> Self {
        Self {
            leaves,
            next: 0,
            region,
            buf,
            _order: PhantomData,
        }
    }

    /// Fail unless every leaf in the plan was read.
    pub(crate) fn finish(self) -> Result<()> {
        match self.leaves.get(self.next) {
            Some(leaf) => Err(plan_unfinished(leaf)),
            None => Ok(()),
        }
    }
}

impl<'a> PlanReader<'a, NativeEndian> {
    /// Read leaves from their memory offsets, in native byte order.
    pub(crate) fn memory(leaves: &'a [Leaf], image: &'a [u8]) -> Self {
        Self::with_region(leaves, image, Region::Memory)
    }
}

impl<B: ByteOrder> LeafSource for PlanReader<'_, B> {
    #[inline]
    fn take<T: Scalar>(&mut self) -> Result<T> {
        let leaf = self.leaves.get(self.next).ok_or_else(plan_exhausted::<T>)?;
        check_kind::<T>(leaf.kind)?;
        let range = span(self.region.offset(leaf), T::KIND.width(), self.buf.len())?;
        self.next += 1;
        Ok(T::read::<B>(&self.buf[range]))
    }
}
