//! Process-wide scratch buffer pool.
//!
//! Chunk decoding needs a temporary byte buffer per payload; those decodes
//! happen on whichever worker currently owns a session, so the pool must be
//! safe for concurrent `get`/`put`. Callers return buffers on every exit
//! path of a decode.

use parking_lot::Mutex;

/// Initial capacity of freshly allocated pool buffers.
const DEFAULT_BUFFER_CAPACITY: usize = 16 * 1024;

/// Buffers larger than this are dropped on `put` instead of retained.
const MAX_RETAINED_CAPACITY: usize = 1024 * 1024;

/// A shared pool of reusable byte buffers.
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
        }
    }

    /// Takes a cleared buffer from the pool, allocating if none are free.
    #[must_use]
    pub fn get(&self) -> Vec<u8> {
        self.buffers
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(DEFAULT_BUFFER_CAPACITY))
    }

    /// Returns a buffer to the pool. Oversized buffers are dropped so a
    /// single huge chunk cannot pin memory for the rest of the process.
    pub fn put(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buffer.clear();
        self.buffers.lock().push(buffer);
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide pool used for chunk-decode scratch space.
pub static SCRATCH: BufferPool = BufferPool::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_reused() {
        let pool = BufferPool::new();
        let mut a = pool.get();
        a.extend_from_slice(b"payload");
        let ptr = a.as_ptr();
        pool.put(a);

        let b = pool.get();
        assert!(b.is_empty());
        assert_eq!(b.as_ptr(), ptr);
    }

    #[test]
    fn oversized_buffers_are_dropped() {
        let pool = BufferPool::new();
        pool.put(Vec::with_capacity(MAX_RETAINED_CAPACITY + 1));
        assert_eq!(pool.buffers.lock().len(), 0);
    }
}
