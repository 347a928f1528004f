// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type description: scalar kinds, descriptors and the runtime builder.

mod builder;
mod descriptor;
mod kind;

pub use builder::TypeDescriptorBuilder;
pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use kind::{Complex, Complex128, Complex64, ScalarKind};
