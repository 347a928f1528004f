// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode/decode engine.
//!
//! An [`Engine`] owns one alignment factor and one [`CodecCache`]. Engines
//! share nothing; a process may run several with different factors.
//!
//! Dispatch happens once per call on the item type of the message:
//! - bare scalars and scalar slices take the fast path: `width * count` bytes,
//!   written sequentially, no descriptor, no cache
//! - everything else goes through the compiled plan for the item type, one
//!   `wire_size()` chunk per item
//!
//! ```
//! use alignbin::{AlignFactor, BigEndian, Engine};
//!
//! let engine = Engine::new(AlignFactor::Default);
//! let wire = engine.encode::<BigEndian, _>(&[0x0102u16, 0x0304][..])?;
//! assert_eq!(wire, [1, 2, 3, 4]);
//!
//! let mut back = [0u16; 2];
//! engine.decode::<BigEndian, _>(&wire, &mut back[..])?;
//! assert_eq!(back, [0x0102, 0x0304]);
//! # Ok::<(), alignbin::Error>(())
//! ```

use crate::codec::cursor::{DenseReader, DenseWriter, PlanReader, PlanWriter};
use crate::codec::{CacheStats, CodecCache, CompiledCodec};
use crate::config::{AlignFactor, EngineConfig};
use crate::error::{Error, Result};
use crate::traits::{Aligned, Message};
use crate::types::{ScalarKind, TypeDescriptor};
use byteorder::ByteOrder;
use std::io;
use std::sync::Arc;

/// Encoder/decoder bound to one alignment factor.
#[derive(Debug)]
pub struct Engine {
    align: AlignFactor,
    cache: CodecCache,
}

/// How the items of one message are laid out on the wire.
enum Dispatch {
    /// Fast path: consecutive scalars of one kind.
    Dense(ScalarKind),
    /// General path: one compiled chunk per item.
    Compiled(Arc<CompiledCodec>),
}

impl Dispatch {
    fn wire_stride(&self) -> usize {
        match self {
            Dispatch::Dense(kind) => kind.width(),
            Dispatch::Compiled(codec) => codec.wire_size(),
        }
    }
}

impl Engine {
    pub fn new(align: AlignFactor) -> Self {
        log::debug!("[Engine] new (align={align})");
        Self {
            align,
            cache: CodecCache::new(align),
        }
    }

    /// Build from a raw alignment factor, rejecting anything but 0, 1, 2, 4, 8.
    pub fn with_align(raw: u8) -> Result<Self> {
        Ok(Self::new(AlignFactor::try_from(raw)?))
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.align)
    }

    pub fn align_factor(&self) -> AlignFactor {
        self.align
    }

    pub fn cache(&self) -> &CodecCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Compiled codec for `T` under this engine's alignment factor (cached).
    pub fn codec_for<T: Aligned>(&self) -> Result<Arc<CompiledCodec>> {
        self.cache.get_or_compile::<T>()
    }

    /// Compile a descriptor built at runtime. Not cached: the caller keeps the
    /// returned codec for as long as it needs it.
    ///
    /// Shapes holding a sequence anywhere are rejected up front, named after
    /// the outermost type.
    pub fn compile_descriptor(&self, desc: &TypeDescriptor) -> Result<Arc<CompiledCodec>> {
        if !desc.is_fixed_size() {
            return Err(Error::unsupported(
                desc.type_name(),
                "contains a dynamic-length sequence",
            ));
        }
        CompiledCodec::compile(desc, self.align).map(Arc::new)
    }

    fn dispatch<T: Aligned>(&self) -> Result<Dispatch> {
        match T::SCALAR {
            Some(kind) => Ok(Dispatch::Dense(kind)),
            None => self.cache.get_or_compile::<T>().map(Dispatch::Compiled),
        }
    }

    fn wire_len<T: Aligned>(dispatch: &Dispatch, count: usize) -> Result<usize> {
        dispatch.wire_stride().checked_mul(count).ok_or_else(|| {
            Error::unsupported(std::any::type_name::<T>(), "message size overflows usize")
        })
    }

    /// Number of bytes `msg` occupies on the wire.
    pub fn encoded_size<M: Message + ?Sized>(&self, msg: &M) -> Result<usize> {
        let dispatch = self.dispatch::<M::Item>()?;
        Self::wire_len::<M::Item>(&dispatch, msg.items().len())
    }

    /// Encode `msg` into a fresh buffer in byte order `B`.
    pub fn encode<B: ByteOrder, M: Message + ?Sized>(&self, msg: &M) -> Result<Vec<u8>> {
        let items = msg.items();
        let dispatch = self.dispatch::<M::Item>()?;
        let mut buf = vec![0u8; Self::wire_len::<M::Item>(&dispatch, items.len())?];
        Self::store_items::<B, M::Item>(&dispatch, items, &mut buf)?;
        Ok(buf)
    }

    /// Encode `msg` into the front of `buf`. Returns the number of bytes written.
    pub fn encode_into<B: ByteOrder, M: Message + ?Sized>(
        &self,
        msg: &M,
        buf: &mut [u8],
    ) -> Result<usize> {
        let items = msg.items();
        let dispatch = self.dispatch::<M::Item>()?;
        let need = Self::wire_len::<M::Item>(&dispatch, items.len())?;
        if buf.len() < need {
            return Err(Error::ShortBuffer {
                need,
                have: buf.len(),
            });
        }
        Self::store_items::<B, M::Item>(&dispatch, items, &mut buf[..need])?;
        Ok(need)
    }

    /// Write `items` into `buf`, which is exactly their wire length.
    fn store_items<B: ByteOrder, T: Aligned>(
        dispatch: &Dispatch,
        items: &[T],
        buf: &mut [u8],
    ) -> Result<()> {
        match dispatch {
            Dispatch::Dense(kind) => {
                let len = buf.len();
                let mut writer = DenseWriter::<B>::new(*kind, buf);
                for item in items {
                    item.store(&mut writer)?;
                }
                if writer.position() != len {
                    return Err(Error::PlanMismatch {
                        expected: kind.name(),
                        found: "end of value",
                    });
                }
            }
            Dispatch::Compiled(codec) => {
                let stride = codec.wire_size();
                for (i, item) in items.iter().enumerate() {
                    let chunk = &mut buf[i * stride..(i + 1) * stride];
                    let mut writer = PlanWriter::<B>::wire(codec.leaves(), chunk);
                    item.store(&mut writer)?;
                    writer.finish()?;
                }
            }
        }
        Ok(())
    }

    /// Encode `msg` and hand the bytes to `writer` in one `write_all`.
    /// Sink errors come back untouched as `Error::Io`.
    pub fn write<B: ByteOrder, W: io::Write + ?Sized, M: Message + ?Sized>(
        &self,
        writer: &mut W,
        msg: &M,
    ) -> Result<()> {
        let buf = self.encode::<B, M>(msg)?;
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Decode `data` into `msg` in byte order `B`. Returns the number of bytes
    /// consumed; trailing bytes are ignored.
    ///
    /// The length is checked before anything is written, so a short buffer
    /// leaves `msg` untouched. Skip fields are never written.
    pub fn decode<B: ByteOrder, M: Message + ?Sized>(
        &self,
        data: &[u8],
        msg: &mut M,
    ) -> Result<usize> {
        let items = msg.items_mut();
        let dispatch = self.dispatch::<M::Item>()?;
        let need = Self::wire_len::<M::Item>(&dispatch, items.len())?;
        if data.len() < need {
            return Err(Error::ShortBuffer {
                need,
                have: data.len(),
            });
        }
        Self::load_items::<B, M::Item>(&dispatch, &data[..need], items)?;
        Ok(need)
    }

    /// Read `items` from `data`, which is exactly their wire length.
    fn load_items<B: ByteOrder, T: Aligned>(
        dispatch: &Dispatch,
        data: &[u8],
        items: &mut [T],
    ) -> Result<()> {
        match dispatch {
            Dispatch::Dense(kind) => {
                let mut reader = DenseReader::<B>::new(*kind, data);
                for item in items.iter_mut() {
                    item.load(&mut reader)?;
                }
                if reader.position() != data.len() {
                    return Err(Error::PlanMismatch {
                        expected: kind.name(),
                        found: "end of value",
                    });
                }
            }
            Dispatch::Compiled(codec) => {
                let stride = codec.wire_size();
                for (i, item) in items.iter_mut().enumerate() {
                    let chunk = &data[i * stride..(i + 1) * stride];
                    let mut reader = PlanReader::<B>::wire(codec.leaves(), chunk);
                    item.load(&mut reader)?;
                    reader.finish()?;
                }
            }
        }
        Ok(())
    }

    /// Read exactly `encoded_size(msg)` bytes from `reader` and decode them.
    ///
    /// A source that ends early surfaces as `Error::Io` with
    /// `ErrorKind::UnexpectedEof`.
    pub fn read<B: ByteOrder, R: io::Read + ?Sized, M: Message + ?Sized>(
        &self,
        reader: &mut R,
        msg: &mut M,
    ) -> Result<()> {
        let items = msg.items_mut();
        let dispatch = self.dispatch::<M::Item>()?;
        let mut buf = vec![0u8; Self::wire_len::<M::Item>(&dispatch, items.len())?];
        reader.read_exact(&mut buf)?;
        Self::load_items::<B, M::Item>(&dispatch, &buf, items)
    }

    /// Lay `value` out as a native-endian memory image with this engine's
    /// alignment factor. Padding and skip fields are zero.
    pub fn to_image<T: Aligned>(&self, value: &T) -> Result<Vec<u8>> {
        let codec = self.codec_for::<T>()?;
        let mut image = vec![0u8; codec.memory_size()];
        let mut writer = PlanWriter::memory(codec.leaves(), &mut image);
        value.store(&mut writer)?;
        writer.finish()?;
        Ok(image)
    }

    /// Load `value` from a native-endian memory image laid out with this
    /// engine's alignment factor.
    pub fn from_image<T: Aligned>(&self, image: &[u8], value: &mut T) -> Result<()> {
        let codec = self.codec_for::<T>()?;
        if image.len() < codec.memory_size() {
            return Err(Error::ShortBuffer {
                need: codec.memory_size(),
                have: image.len(),
            });
        }
        let mut reader = PlanReader::memory(codec.leaves(), image);
        value.load(&mut reader)?;
        reader.finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(AlignFactor::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{LeafSink, LeafSource};
    use crate::types::TypeDescriptorBuilder;
    use byteorder::{BigEndian, LittleEndian};

    /// Hand-written impl of `{ bool, [i8; 4], i32 }`.
    #[derive(Debug, Default, PartialEq)]
    struct Header {
        valid: bool,
        tag: [i8; 4],
        length: i32,
    }

    impl Aligned for Header {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptorBuilder::new("Header")
                .field("valid", ScalarKind::Bool)
                .array_field("tag", ScalarKind::I8, 4)
                .field("length", ScalarKind::I32)
                .build()
        }

        fn store<S: LeafSink>(&self, sink: &mut S) -> Result<()> {
            self.valid.store(sink)?;
            self.tag.store(sink)?;
            self.length.store(sink)
        }

        fn load<S: LeafSource>(&mut self, src: &mut S) -> Result<()> {
            self.valid.load(src)?;
            self.tag.load(src)?;
            self.length.load(src)
        }
    }

    /// Declares an i32 but visits a u32.
    #[derive(Default)]
    struct Liar(u32);

    impl Aligned for Liar {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptorBuilder::new("Liar")
                .field("v", ScalarKind::I32)
                .build()
        }

        fn store<S: LeafSink>(&self, sink: &mut S) -> Result<()> {
            sink.put(self.0)
        }

        fn load<S: LeafSource>(&mut self, src: &mut S) -> Result<()> {
            self.0 = src.take()?;
            Ok(())
        }
    }

    fn sample() -> Header {
        Header {
            valid: true,
            tag: [1, 2, 3, 4],
            length: 0x0102_0304,
        }
    }

    #[test]
    fn test_header_wire_bytes() {
        let engine = Engine::new(AlignFactor::Four);
        let wire = engine.encode::<LittleEndian, _>(&sample()).unwrap();
        assert_eq!(wire, [1, 1, 2, 3, 4, 4, 3, 2, 1]);

        let mut back = Header::default();
        assert_eq!(engine.decode::<LittleEndian, _>(&wire, &mut back).unwrap(), 9);
        assert_eq!(back, sample());
    }

    #[test]
    fn test_header_memory_image() {
        let engine = Engine::new(AlignFactor::Four);
        let image = engine.to_image(&sample()).unwrap();
        assert_eq!(image.len(), 12);
        assert_eq!(&image[..5], &[1, 1, 2, 3, 4]);
        assert_eq!(&image[5..8], &[0, 0, 0]);
        assert_eq!(&image[8..], &0x0102_0304i32.to_ne_bytes());

        let mut back = Header::default();
        engine.from_image(&image, &mut back).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_short_decode_leaves_target_untouched() {
        let engine = Engine::default();
        let mut target = 0xDEAD_BEEFu32;
        let err = engine
            .decode::<BigEndian, _>(&[1, 2, 3], &mut target)
            .unwrap_err();
        assert!(matches!(err, Error::ShortBuffer { need: 4, have: 3 }));
        assert_eq!(target, 0xDEAD_BEEF);

        let mut header = Header::default();
        let err = engine
            .decode::<BigEndian, _>(&[1; 8], &mut header)
            .unwrap_err();
        assert!(matches!(err, Error::ShortBuffer { need: 9, have: 8 }));
        assert_eq!(header, Header::default());
    }

    #[test]
    fn test_fast_path_skips_cache() {
        let engine = Engine::default();
        engine.encode::<LittleEndian, _>(&7u64).unwrap();
        engine.encode::<LittleEndian, _>(&[1.0f32, 2.0][..]).unwrap();
        assert_eq!(engine.cache_stats().entries, 0);

        engine.encode::<LittleEndian, _>(&[1.0f32, 2.0]).unwrap();
        engine.encode::<LittleEndian, _>(&[1.0f32, 2.0]).unwrap();
        let stats = engine.cache_stats();
        assert_eq!((stats.entries, stats.misses, stats.hits), (1, 1, 1));
    }

    #[test]
    fn test_encode_into_reports_short_output() {
        let engine = Engine::new(AlignFactor::Four);
        let mut out = [0u8; 8];
        assert!(matches!(
            engine.encode_into::<LittleEndian, _>(&sample(), &mut out),
            Err(Error::ShortBuffer { need: 9, have: 8 })
        ));
        let mut out = [0xAAu8; 12];
        assert_eq!(
            engine.encode_into::<LittleEndian, _>(&sample(), &mut out).unwrap(),
            9
        );
        assert_eq!(&out[9..], &[0xAA; 3]);
    }

    #[test]
    fn test_aggregate_slice_uses_wire_stride() {
        let engine = Engine::new(AlignFactor::Eight);
        let items = [sample(), Header::default()];
        let wire = engine.encode::<BigEndian, _>(&items[..]).unwrap();
        assert_eq!(wire.len(), 18);
        assert_eq!(&wire[9..], &[0u8; 9]);

        let mut back = [Header::default(), sample()];
        engine.decode::<BigEndian, _>(&wire, &mut back[..]).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn test_inconsistent_impl_is_a_plan_mismatch() {
        let engine = Engine::default();
        let err = engine.encode::<LittleEndian, _>(&Liar(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::PlanMismatch {
                expected: "i32",
                found: "u32"
            }
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_with_align_validates() {
        assert!(matches!(
            Engine::with_align(3),
            Err(Error::InvalidAlignFactor(3))
        ));
        assert_eq!(Engine::with_align(2).unwrap().align_factor(), AlignFactor::Two);
        let config = EngineConfig::default().with_align(AlignFactor::One);
        assert_eq!(Engine::from_config(&config).align_factor(), AlignFactor::One);
    }

    #[test]
    fn test_compile_descriptor_is_uncached() {
        let engine = Engine::new(AlignFactor::Two);
        let codec = engine.compile_descriptor(&Header::descriptor()).unwrap();
        assert_eq!(codec.memory_size(), 10);
        assert_eq!(codec.wire_size(), 9);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_streaming_passes_io_errors_through() {
        let engine = Engine::default();
        let mut src: &[u8] = &[1, 2];
        let mut target = 0u32;
        let err = engine.read::<BigEndian, _, _>(&mut src, &mut target).unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::UnexpectedEof));

        let mut sink = Vec::new();
        engine
            .write::<BigEndian, _, _>(&mut sink, &0x0A0Bu16)
            .unwrap();
        assert_eq!(sink, [0x0A, 0x0B]);
    }
}
