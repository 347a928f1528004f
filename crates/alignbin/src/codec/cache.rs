// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent cache of compiled codecs, keyed by Rust type.
//!
//! Lookups are lock-free reads on a sharded map. On a miss the codec is
//! compiled outside any lock; if several threads race on the same type, each
//! compiles, the first insert wins and everyone returns that entry. Compilation
//! is deterministic, so the losers only waste time.

use super::plan::CompiledCodec;
use crate::config::AlignFactor;
use crate::error::Result;
use crate::traits::Aligned;
use dashmap::DashMap;
use std::any::{type_name, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Distinct types currently cached.
    pub entries: usize,
}

/// Per-engine cache of compiled codecs. Entries live as long as the cache.
pub struct CodecCache {
    align: AlignFactor,
    codecs: DashMap<TypeId, Arc<CompiledCodec>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CodecCache {
    #[must_use]
    pub fn new(align: AlignFactor) -> Self {
        Self {
            align,
            codecs: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the codec for `T`, compiling it on first use.
    pub fn get_or_compile<T: Aligned>(&self) -> Result<Arc<CompiledCodec>> {
        let key = TypeId::of::<T>();
        if let Some(codec) = self.codecs.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("[CodecCache] hit {}", type_name::<T>());
            return Ok(Arc::clone(codec.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = Arc::new(CompiledCodec::compile(&T::descriptor(), self.align)?);
        let stored = self.codecs.entry(key).or_insert(compiled);
        Ok(Arc::clone(stored.value()))
    }

    /// Cached codec for `T`, without compiling.
    pub fn peek<T: Aligned>(&self) -> Option<Arc<CompiledCodec>> {
        self.codecs
            .get(&TypeId::of::<T>())
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.codecs.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Drop every cached codec. Outstanding `Arc`s stay valid.
    pub fn clear(&self) {
        self.codecs.clear();
    }
}

impl std::fmt::Debug for CodecCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecCache")
            .field("align", &self.align)
            .field("stats", &self.stats())
            .finish()
    }
}
