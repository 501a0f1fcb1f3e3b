use std::{fmt, net::SocketAddr};

use bytes::BytesMut;

use crate::{buffer::BufferPool, channel::ArcChannel, error::Result};

/// Sends one already encoded datagram to a peer.
pub struct ChannelWriteCommand {
    buffer: Option<BytesMut>,
    channel: ArcChannel,
    peer: SocketAddr,
}

impl ChannelWriteCommand {
    pub fn new(channel: ArcChannel, buffer: BytesMut, peer: SocketAddr) -> Self {
        Self {
            buffer: Some(buffer),
            channel,
            peer,
        }
    }

    /// On completion the buffer goes back to `pool`. A blocked send leaves
    /// the buffer untouched for the next attempt.
    pub fn attempt(&mut self, pool: &dyn BufferPool) -> Result<bool> {
        let Some(buffer) = self.buffer.as_ref() else {
            return Ok(true);
        };
        // an empty datagram has nothing to transfer, and a channel would
        // report it as blocked forever
        if !buffer.is_empty() && self.channel.send(buffer, self.peer)? == 0 {
            return Ok(false);
        }
        if let Some(buffer) = self.buffer.take() {
            pool.release(buffer);
        }
        Ok(true)
    }

    pub(crate) fn into_buffer(self) -> Option<BytesMut> {
        self.buffer
    }
}

impl fmt::Debug for ChannelWriteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelWriteCommand")
            .field("peer", &self.peer)
            .field("len", &self.buffer.as_ref().map(BytesMut::len))
            .finish_non_exhaustive()
    }
}
