use bytes::BytesMut;

pub mod handy;

/// A shared source of reusable send buffers.
///
/// Every buffer handed out by [`acquire`] has exactly one owner until it is
/// given back through [`release`]. Implementations must allow concurrent
/// acquire and release, because commands may be submitted from several
/// threads through an [`ArcCommandManager`].
///
/// [`acquire`]: BufferPool::acquire
/// [`release`]: BufferPool::release
/// [`ArcCommandManager`]: crate::manager::ArcCommandManager
pub trait BufferPool: Send + Sync {
    /// Get an empty buffer whose capacity is at least `min_capacity`.
    ///
    /// `direct` asks for a buffer suited to direct socket I/O, pools that
    /// make no such distinction are free to ignore it.
    fn acquire(&self, min_capacity: usize, direct: bool) -> BytesMut;

    /// Give a buffer back to the pool.
    fn release(&self, buffer: BytesMut);
}
