// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder for aggregate descriptors registered at runtime.
//!
//! Used when the layout comes from somewhere other than a Rust type, e.g. a
//! C header describing a struct that only ever exists as raw bytes:
//!
//! ```
//! use alignbin::{ScalarKind, TypeDescriptorBuilder};
//!
//! let desc = TypeDescriptorBuilder::new("sensor_frame")
//!     .field("valid", ScalarKind::Bool)
//!     .array_field("tag", ScalarKind::I8, 4)
//!     .field("length", ScalarKind::I32)
//!     .build();
//! assert_eq!(desc.fields().map(<[_]>::len), Some(3));
//! ```

use super::{FieldDescriptor, ScalarKind, TypeDescriptor};

/// Builder for an aggregate [`TypeDescriptor`].
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a scalar field.
    pub fn field(mut self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, TypeDescriptor::Scalar(kind)));
        self
    }

    /// Add a fixed array of scalars.
    pub fn array_field(mut self, name: impl Into<String>, kind: ScalarKind, len: usize) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            TypeDescriptor::array(TypeDescriptor::Scalar(kind), len),
        ));
        self
    }

    /// Add a field of any shape (nested aggregate, array of aggregates, ...).
    pub fn nested_field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor::new(name, ty));
        self
    }

    /// Add a field that takes up memory but never reaches the wire.
    pub fn skipped_field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor::skipped(name, ty));
        self
    }

    /// Add a dynamic-length sequence. Compiling the result fails; this exists
    /// so foreign schemas can be described faithfully and rejected loudly.
    pub fn sequence_field(mut self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.fields.push(FieldDescriptor::new(
            name,
            TypeDescriptor::sequence(TypeDescriptor::Scalar(kind)),
        ));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::aggregate(self.name, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order_and_skip() {
        let inner = TypeDescriptorBuilder::new("point")
            .field("x", ScalarKind::F32)
            .field("y", ScalarKind::F32)
            .build();
        let desc = TypeDescriptorBuilder::new("frame")
            .field("id", ScalarKind::U32)
            .skipped_field("pad", ScalarKind::U16.into())
            .nested_field("origin", inner.clone())
            .array_field("samples", ScalarKind::I16, 8)
            .build();

        let fields = desc.fields().expect("aggregate");
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "pad", "origin", "samples"]);
        assert!(fields[1].skip);
        assert!(!fields[2].skip);
        assert_eq!(fields[2].ty, inner);
        assert_eq!(
            fields[3].ty,
            TypeDescriptor::array(ScalarKind::I16.into(), 8)
        );
    }

    #[test]
    fn test_sequence_field_is_not_fixed_size() {
        let desc = TypeDescriptorBuilder::new("blob")
            .field("len", ScalarKind::U32)
            .sequence_field("data", ScalarKind::U8)
            .build();
        assert!(!desc.is_fixed_size());
    }
}
