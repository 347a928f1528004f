// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide default engine and the free functions that forward to it.
//!
//! The default engine uses `AlignFactor::Default` and is created on first
//! use. [`replace_default_engine`] swaps it atomically (`ArcSwap`, no lock);
//! calls already running keep the engine they started with.

use crate::config::AlignFactor;
use crate::engine::Engine;
use crate::error::Result;
use crate::traits::Message;
use arc_swap::ArcSwap;
use byteorder::ByteOrder;
use std::io;
use std::sync::{Arc, OnceLock};

static DEFAULT_ENGINE: OnceLock<ArcSwap<Engine>> = OnceLock::new();

fn slot() -> &'static ArcSwap<Engine> {
    DEFAULT_ENGINE.get_or_init(|| ArcSwap::from_pointee(Engine::new(AlignFactor::Default)))
}

/// The current default engine.
pub fn default_engine() -> Arc<Engine> {
    slot().load_full()
}

/// Install `engine` as the default. Returns the previous one.
pub fn replace_default_engine(engine: Engine) -> Arc<Engine> {
    log::debug!(
        "[alignbin] default engine replaced (align={})",
        engine.align_factor()
    );
    slot().swap(Arc::new(engine))
}

/// [`Engine::encode`] on the default engine.
pub fn encode<B: ByteOrder, M: Message + ?Sized>(msg: &M) -> Result<Vec<u8>> {
    slot().load().encode::<B, M>(msg)
}

/// [`Engine::encode_into`] on the default engine.
pub fn encode_into<B: ByteOrder, M: Message + ?Sized>(msg: &M, buf: &mut [u8]) -> Result<usize> {
    slot().load().encode_into::<B, M>(msg, buf)
}

/// [`Engine::write`] on the default engine.
pub fn write<B: ByteOrder, W: io::Write + ?Sized, M: Message + ?Sized>(
    writer: &mut W,
    msg: &M,
) -> Result<()> {
    slot().load().write::<B, W, M>(writer, msg)
}

/// [`Engine::decode`] on the default engine.
pub fn decode<B: ByteOrder, M: Message + ?Sized>(data: &[u8], msg: &mut M) -> Result<usize> {
    slot().load().decode::<B, M>(data, msg)
}

/// [`Engine::read`] on the default engine.
pub fn read<B: ByteOrder, R: io::Read + ?Sized, M: Message + ?Sized>(
    reader: &mut R,
    msg: &mut M,
) -> Result<()> {
    slot().load().read::<B, R, M>(reader, msg)
}
