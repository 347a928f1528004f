// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout calculator: memory size, alignment and field offsets of a type
//! under a given alignment factor.
//!
//! These are the rules a C compiler applies under `#pragma pack(n)`:
//!
//! - a scalar is aligned to `min(width, n)` (its width under the default factor)
//! - an array has the alignment of its element and `len` times its size
//! - an aggregate places each field at the next multiple of the field's
//!   alignment, takes the largest field alignment (at least 1) as its own, and
//!   rounds its size up to that alignment
//!
//! One extra rule: a non-empty aggregate whose last field has zero size gets
//! one byte of tail padding, so the trailing field never addresses one past
//! the end of the aggregate.

use crate::config::AlignFactor;
use crate::error::{Error, Result};
use crate::types::TypeDescriptor;

/// Round `x` up to a multiple of `n`. `n` must be a power of two.
#[inline]
pub const fn round_up(x: usize, n: usize) -> usize {
    (x + n - 1) & !(n - 1)
}

/// Memory layout of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Total size in bytes, a multiple of `align`.
    pub size: usize,
    /// Alignment in bytes (a power of two, at least 1).
    pub align: usize,
    /// Byte offset of every field in declaration order. Empty unless the type
    /// is an aggregate.
    pub offsets: Vec<usize>,
}

/// Size and alignment of `desc` under `af`.
pub fn size_align(desc: &TypeDescriptor, af: AlignFactor) -> Result<(usize, usize)> {
    match desc {
        TypeDescriptor::Scalar(kind) => Ok((kind.width(), af.cap(kind.natural_align()))),
        TypeDescriptor::Array { element, len } => {
            let (size, align) = size_align(element, af)?;
            let total = size
                .checked_mul(*len)
                .ok_or_else(|| Error::unsupported(desc.type_name(), "array size overflows usize"))?;
            Ok((total, align))
        }
        TypeDescriptor::Aggregate { .. } => {
            let layout = compute_layout(desc, af)?;
            Ok((layout.size, layout.align))
        }
        TypeDescriptor::Sequence { .. } => Err(Error::unsupported(
            desc.type_name(),
            "dynamic-length sequence has no fixed layout",
        )),
    }
}

/// Full layout of `desc` under `af`, including per-field offsets for aggregates.
pub fn compute_layout(desc: &TypeDescriptor, af: AlignFactor) -> Result<Layout> {
    let TypeDescriptor::Aggregate { fields, .. } = desc else {
        let (size, align) = size_align(desc, af)?;
        return Ok(Layout {
            size,
            align,
            offsets: Vec::new(),
        });
    };

    let overflow = || Error::unsupported(desc.type_name(), "aggregate size overflows usize");

    let mut offsets = Vec::with_capacity(fields.len());
    let mut cursor = 0usize;
    let mut align = 1usize;
    let mut last_zero = 0usize;

    for field in fields {
        let (field_size, field_align) = size_align(&field.ty, af)?;
        align = align.max(field_align);

        let offset = if field_align > 1 {
            cursor
                .checked_add(field_align - 1)
                .map(|_| round_up(cursor, field_align))
                .ok_or_else(overflow)?
        } else {
            cursor
        };
        cursor = offset.checked_add(field_size).ok_or_else(overflow)?;
        if field_size == 0 {
            last_zero = cursor;
        }
        offsets.push(offset);
    }

    if cursor > 0 && last_zero == cursor {
        cursor = cursor.checked_add(1).ok_or_else(overflow)?;
    }
    let size = cursor
        .checked_add(align - 1)
        .map(|_| round_up(cursor, align))
        .ok_or_else(overflow)?;

    Ok(Layout {
        size,
        align,
        offsets,
    })
}
