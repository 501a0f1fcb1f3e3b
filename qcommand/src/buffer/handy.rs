use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use bytes::BytesMut;
use derive_builder::Builder;
use getset::CopyGetters;

use super::BufferPool;

#[derive(Builder, CopyGetters, Debug, Clone, Copy, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct HeapPoolConfig {
    /// How many released buffers the pool keeps for reuse.
    #[getset(get_copy = "pub")]
    max_retained: usize,
}

impl Default for HeapPoolConfig {
    fn default() -> Self {
        Self { max_retained: 64 }
    }
}

/// A [`BufferPool`] keeping released buffers on a bounded free list.
///
/// Every buffer lives on the heap, so the `direct` hint is ignored.
#[derive(Debug, Default)]
pub struct HeapPool {
    config: HeapPoolConfig,
    free: Mutex<Vec<BytesMut>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl HeapPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeapPoolConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Number of buffers handed out so far.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::Acquire)
    }

    /// Number of buffers given back so far.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::Acquire)
    }

    /// Buffers currently held by their owners.
    pub fn outstanding(&self) -> usize {
        self.acquired().saturating_sub(self.released())
    }

    /// Buffers waiting on the free list.
    pub fn retained(&self) -> usize {
        self.free.lock().unwrap().len()
    }
}

impl BufferPool for HeapPool {
    fn acquire(&self, min_capacity: usize, _direct: bool) -> BytesMut {
        self.acquired.fetch_add(1, Ordering::AcqRel);
        let mut free = self.free.lock().unwrap();
        match free.iter().position(|buf| buf.capacity() >= min_capacity) {
            Some(index) => free.swap_remove(index),
            None => BytesMut::with_capacity(min_capacity),
        }
    }

    fn release(&self, mut buffer: BytesMut) {
        self.released.fetch_add(1, Ordering::AcqRel);
        buffer.clear();
        let mut free = self.free.lock().unwrap();
        if free.len() < self.config.max_retained {
            free.push(buffer);
        }
    }
}
