// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive codec, codec compiler, leaf cursors and the codec cache.

mod cache;
pub(crate) mod cursor;
mod plan;
mod primitive;

pub use cache::{CacheStats, CodecCache};
pub use plan::{CompiledCodec, FieldPlan, Leaf};
pub use primitive::Scalar;
