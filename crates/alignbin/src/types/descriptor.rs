// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the shape of a value, independent of any alignment factor.

use super::ScalarKind;

/// Shape of an encodable value.
///
/// Descriptors are produced by [`Aligned::descriptor`](crate::Aligned::descriptor)
/// (usually generated by `#[derive(Aligned)]`) or built at runtime with
/// [`TypeDescriptorBuilder`](crate::TypeDescriptorBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A single scalar.
    Scalar(ScalarKind),
    /// Fixed-length array.
    Array {
        element: Box<TypeDescriptor>,
        len: usize,
    },
    /// Struct-like aggregate with ordered, named fields.
    Aggregate {
        name: String,
        fields: Vec<FieldDescriptor>,
    },
    /// Dynamic-length sequence. Describable, never encodable.
    Sequence { element: Box<TypeDescriptor> },
}

impl TypeDescriptor {
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }

    pub fn array(element: TypeDescriptor, len: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn aggregate(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::Aggregate {
            name: name.into(),
            fields,
        }
    }

    pub fn sequence(element: TypeDescriptor) -> Self {
        Self::Sequence {
            element: Box::new(element),
        }
    }

    /// Human-readable type name, used in diagnostics and logs.
    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.name().to_string(),
            Self::Array { element, len } => format!("[{}; {}]", element.type_name(), len),
            Self::Aggregate { name, .. } => name.clone(),
            Self::Sequence { element } => format!("sequence<{}>", element.type_name()),
        }
    }

    /// Fields of an aggregate.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match self {
            Self::Aggregate { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// `true` when no `Sequence` appears anywhere in the shape.
    pub fn is_fixed_size(&self) -> bool {
        match self {
            Self::Scalar(_) => true,
            Self::Array { element, .. } => element.is_fixed_size(),
            Self::Aggregate { fields, .. } => fields.iter().all(|f| f.ty.is_fixed_size()),
            Self::Sequence { .. } => false,
        }
    }

    /// Number of scalars that travel on the wire (skipped fields excluded).
    ///
    /// Saturates instead of overflowing for absurd array lengths.
    pub fn wire_leaf_count(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Array { element, len } => element.wire_leaf_count().saturating_mul(*len),
            Self::Aggregate { fields, .. } => fields
                .iter()
                .filter(|f| !f.skip)
                .fold(0usize, |acc, f| acc.saturating_add(f.ty.wire_leaf_count())),
            Self::Sequence { .. } => 0,
        }
    }
}

impl From<ScalarKind> for TypeDescriptor {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

/// One field of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Present in memory, absent from the wire.
    pub skip: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            skip: false,
        }
    }

    /// A field that occupies memory but is never encoded.
    pub fn skipped(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            skip: true,
        }
    }
}
