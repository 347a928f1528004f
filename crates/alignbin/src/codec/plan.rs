// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec compiler: turns a [`TypeDescriptor`] into a flat leaf plan.
//!
//! Every scalar leaf gets two addresses:
//! - its memory offset, from the layout calculator (padded per alignment factor)
//! - its wire offset, the running sum of the leaves before it (never padded)
//!
//! A compiled plan is immutable and shared behind an `Arc`.

use super::primitive::transcode;
use crate::config::AlignFactor;
use crate::error::{Error, Result};
use crate::layout::{compute_layout, size_align};
use crate::types::{ScalarKind, TypeDescriptor};
use byteorder::{ByteOrder, NativeEndian};

/// One scalar in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub kind: ScalarKind,
    /// Offset inside the memory image.
    pub mem_offset: usize,
    /// Offset inside the wire buffer.
    pub wire_offset: usize,
}

impl Leaf {
    fn shifted(self, mem: usize, wire: usize) -> Self {
        Self {
            kind: self.kind,
            mem_offset: self.mem_offset + mem,
            wire_offset: self.wire_offset + wire,
        }
    }
}

/// Placement of one top-level field of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    pub mem_offset: usize,
    pub mem_size: usize,
    /// For skip fields this is where the field would have started; `wire_size` is 0.
    pub wire_offset: usize,
    pub wire_size: usize,
    pub skip: bool,
}

/// Encode/decode plan for one type under one alignment factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCodec {
    type_name: String,
    align_factor: AlignFactor,
    memory_size: usize,
    memory_align: usize,
    wire_size: usize,
    fields: Vec<FieldPlan>,
    leaves: Vec<Leaf>,
}

/// Intermediate result for one node of the type tree.
struct Node {
    mem_size: usize,
    mem_align: usize,
    wire_size: usize,
    leaves: Vec<Leaf>,
    fields: Vec<FieldPlan>,
}

impl CompiledCodec {
    /// Compile `desc` under `af`.
    ///
    /// Fails with `UnsupportedType` for sequences and size overflow, and with
    /// `LayoutViolation` if any leaf would fall outside its region.
    pub fn compile(desc: &TypeDescriptor, af: AlignFactor) -> Result<Self> {
        let node = compile_node(desc, af)?;
        let codec = Self {
            type_name: desc.type_name(),
            align_factor: af,
            memory_size: node.mem_size,
            memory_align: node.mem_align,
            wire_size: node.wire_size,
            fields: node.fields,
            leaves: node.leaves,
        };
        codec.validate()?;

        log::debug!(
            "[alignbin] compiled {} under {}: memory {} bytes (align {}), wire {} bytes, {} leaves",
            codec.type_name,
            af,
            codec.memory_size,
            codec.memory_align,
            codec.wire_size,
            codec.leaves.len()
        );
        Ok(codec)
    }

    /// Check every leaf and field span against the region it addresses.
    fn validate(&self) -> Result<()> {
        for leaf in &self.leaves {
            let width = leaf.kind.width();
            check_span(leaf.mem_offset, width, self.memory_size)?;
            check_span(leaf.wire_offset, width, self.wire_size)?;
        }
        for field in &self.fields {
            check_span(field.mem_offset, field.mem_size, self.memory_size)?;
            check_span(field.wire_offset, field.wire_size, self.wire_size)?;
        }
        Ok(())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn align_factor(&self) -> AlignFactor {
        self.align_factor
    }

    /// Size of the memory image, padding included.
    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn memory_align(&self) -> usize {
        self.memory_align
    }

    /// Size of the encoded form: the sum of all non-skipped leaf widths.
    pub fn wire_size(&self) -> usize {
        self.wire_size
    }

    /// Top-level fields. Empty unless the type is an aggregate.
    pub fn fields(&self) -> &[FieldPlan] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldPlan> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Flattened scalar leaves in wire order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Encode a native-endian memory image into a wire buffer in byte order `B`.
    ///
    /// Padding and skip fields in the image are ignored.
    pub fn image_to_wire<B: ByteOrder>(&self, image: &[u8]) -> Result<Vec<u8>> {
        let mut wire = vec![0u8; self.wire_size];
        self.image_to_wire_into::<B>(image, &mut wire)?;
        Ok(wire)
    }

    /// Like [`image_to_wire`](Self::image_to_wire), into a caller buffer.
    /// Returns the number of bytes written.
    pub fn image_to_wire_into<B: ByteOrder>(&self, image: &[u8], wire: &mut [u8]) -> Result<usize> {
        require(self.memory_size, image.len())?;
        require(self.wire_size, wire.len())?;
        for leaf in &self.leaves {
            let width = leaf.kind.width();
            transcode::<NativeEndian, B>(
                leaf.kind,
                &image[leaf.mem_offset..leaf.mem_offset + width],
                &mut wire[leaf.wire_offset..leaf.wire_offset + width],
            );
        }
        Ok(self.wire_size)
    }

    /// Decode a wire buffer in byte order `B` into a fresh, zero-padded
    /// native-endian memory image.
    pub fn wire_to_image<B: ByteOrder>(&self, wire: &[u8]) -> Result<Vec<u8>> {
        let mut image = vec![0u8; self.memory_size];
        self.wire_to_image_into::<B>(wire, &mut image)?;
        Ok(image)
    }

    /// Like [`wire_to_image`](Self::wire_to_image), into an existing image.
    /// Padding and skip fields in `image` are left untouched.
    pub fn wire_to_image_into<B: ByteOrder>(&self, wire: &[u8], image: &mut [u8]) -> Result<()> {
        require(self.wire_size, wire.len())?;
        require(self.memory_size, image.len())?;
        for leaf in &self.leaves {
            let width = leaf.kind.width();
            transcode::<B, NativeEndian>(
                leaf.kind,
                &wire[leaf.wire_offset..leaf.wire_offset + width],
                &mut image[leaf.mem_offset..leaf.mem_offset + width],
            );
        }
        Ok(())
    }
}

fn check_span(offset: usize, width: usize, region: usize) -> Result<()> {
    match offset.checked_add(width) {
        Some(end) if end <= region => Ok(()),
        _ => Err(Error::LayoutViolation {
            offset,
            width,
            region,
        }),
    }
}

fn require(need: usize, have: usize) -> Result<()> {
    if have < need {
        return Err(Error::ShortBuffer { need, have });
    }
    Ok(())
}

fn compile_node(desc: &TypeDescriptor, af: AlignFactor) -> Result<Node> {
    match desc {
        TypeDescriptor::Scalar(kind) => Ok(Node {
            mem_size: kind.width(),
            mem_align: af.cap(kind.natural_align()),
            wire_size: kind.width(),
            leaves: vec![Leaf {
                kind: *kind,
                mem_offset: 0,
                wire_offset: 0,
            }],
            fields: Vec::new(),
        }),
        TypeDescriptor::Array { element, len } => {
            let elem = compile_node(element, af)?;
            let overflow = || Error::unsupported(desc.type_name(), "array size overflows usize");
            let mem_size = elem.mem_size.checked_mul(*len).ok_or_else(overflow)?;
            let wire_size = elem.wire_size.checked_mul(*len).ok_or_else(overflow)?;
            let count = elem.leaves.len().checked_mul(*len).ok_or_else(overflow)?;

            // Zero-leaf elements (empty aggregates) replicate to nothing, whatever `len` is.
            let mut leaves = Vec::new();
            if count > 0 {
                leaves.try_reserve_exact(count).map_err(|_| {
                    Error::unsupported(desc.type_name(), "array has too many leaves to plan")
                })?;
                for i in 0..*len {
                    let (mem_base, wire_base) = (i * elem.mem_size, i * elem.wire_size);
                    leaves.extend(elem.leaves.iter().map(|l| l.shifted(mem_base, wire_base)));
                }
            }
            Ok(Node {
                mem_size,
                mem_align: elem.mem_align,
                wire_size,
                leaves,
                fields: Vec::new(),
            })
        }
        TypeDescriptor::Aggregate { fields, .. } => {
            let layout = compute_layout(desc, af)?;
            let mut leaves = Vec::new();
            let mut plans = Vec::with_capacity(fields.len());
            let mut wire = 0usize;

            for (field, &mem_offset) in fields.iter().zip(&layout.offsets) {
                if field.skip {
                    let (mem_size, _) = size_align(&field.ty, af)?;
                    plans.push(FieldPlan {
                        name: field.name.clone(),
                        mem_offset,
                        mem_size,
                        wire_offset: wire,
                        wire_size: 0,
                        skip: true,
                    });
                    continue;
                }

                let child = compile_node(&field.ty, af)?;
                leaves.extend(child.leaves.iter().map(|l| l.shifted(mem_offset, wire)));
                plans.push(FieldPlan {
                    name: field.name.clone(),
                    mem_offset,
                    mem_size: child.mem_size,
                    wire_offset: wire,
                    wire_size: child.wire_size,
                    skip: false,
                });
                wire = wire.checked_add(child.wire_size).ok_or_else(|| {
                    Error::unsupported(desc.type_name(), "wire size overflows usize")
                })?;
            }

            Ok(Node {
                mem_size: layout.size,
                mem_align: layout.align,
                wire_size: wire,
                leaves,
                fields: plans,
            })
        }
        TypeDescriptor::Sequence { .. } => Err(Error::unsupported(
            desc.type_name(),
            "dynamic-length sequence cannot be encoded",
        )),
    }
}
