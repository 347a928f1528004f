// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # alignbin - alignment-aware binary codec
//!
//! Encodes and decodes fixed-size values (scalars, fixed arrays, structs) to a
//! densely packed wire form, and lays the same values out in memory exactly as
//! a C compiler would under `#pragma pack(n)`.
//!
//! ## Quick Start
//!
//! ```rust
//! use alignbin::{Aligned, AlignFactor, Engine, LittleEndian};
//!
//! #[derive(Aligned, Debug, Default, PartialEq)]
//! struct Header {
//!     valid: bool,
//!     tag: [i8; 4],
//!     length: i32,
//! }
//!
//! let engine = Engine::new(AlignFactor::Four);
//! let header = Header { valid: true, tag: [1, 2, 3, 4], length: 0x0102_0304 };
//!
//! let wire = engine.encode::<LittleEndian, _>(&header)?;
//! assert_eq!(wire, [1, 1, 2, 3, 4, 4, 3, 2, 1]);
//!
//! let codec = engine.codec_for::<Header>()?;
//! let offsets: Vec<_> = codec.fields().iter().map(|f| f.mem_offset).collect();
//! assert_eq!(offsets, [0, 1, 8]);
//! assert_eq!(codec.memory_size(), 12);
//!
//! let mut back = Header::default();
//! engine.decode::<LittleEndian, _>(&wire, &mut back)?;
//! assert_eq!(back, header);
//! # Ok::<(), alignbin::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  Engine: encode / decode / write / read  (+ default engine)  |
//! |     fast path: scalars, scalar slices                        |
//! |     general path: CodecCache -> CompiledCodec                |
//! +--------------------------------------------------------------+
//! |  Codec compiler: leaf plan (memory offset, wire offset)      |
//! |  Layout calculator: size, alignment, field offsets           |
//! +--------------------------------------------------------------+
//! |  Primitive codec: one scalar <-> width() bytes (byteorder)   |
//! +--------------------------------------------------------------+
//! ```
//!
//! The wire form has no header, no tags and no padding. Padding only exists
//! in the memory image, governed by the engine's [`AlignFactor`].

// Allow the derive macro to work inside this crate's tests
extern crate self as alignbin;

/// Codec compiler, leaf cursors, primitive codec and codec cache.
pub mod codec;
/// Alignment factor and engine configuration.
pub mod config;
/// The encode/decode engine.
pub mod engine;
/// Crate error type.
pub mod error;
/// Process-wide default engine.
pub mod global;
/// Layout calculator.
pub mod layout;
/// `Aligned`, leaf visitors and `Message`.
pub mod traits;
/// Type descriptors and scalar kinds.
pub mod types;

pub use codec::{CacheStats, CodecCache, CompiledCodec, FieldPlan, Leaf, Scalar};
pub use config::{AlignFactor, EngineConfig, ENV_ALIGN_FACTOR};
pub use engine::Engine;
pub use error::{Error, Result};
pub use global::{
    decode, default_engine, encode, encode_into, read, replace_default_engine, write,
};
pub use layout::{compute_layout, round_up, size_align, Layout};
pub use traits::{Aligned, LeafSink, LeafSource, Message};
pub use types::{
    Complex, Complex128, Complex64, FieldDescriptor, ScalarKind, TypeDescriptor,
    TypeDescriptorBuilder,
};

/// `#[derive(Aligned)]` for structs; `#[alignbin(skip)]` marks skip fields.
pub use alignbin_codegen::Aligned;

pub use byteorder::{BigEndian, ByteOrder, LittleEndian, NativeEndian, NetworkEndian};
