use std::fmt;

use bytes::BytesMut;
use derive_more::Display;

use crate::{
    buffer::BufferPool,
    channel::ArcChannel,
    config::{CloseFlush, CommandConfig},
    conn::ArcConnection,
    error::Result,
};

/// Why a [`QuicSendCommand`] was created, only used in diagnostics.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[display("send")]
    Send,
    #[display("timeout")]
    Timeout,
}

/// Pulls datagrams out of a QUIC connection and pushes them onto a channel
/// until either the engine runs dry or the channel blocks.
///
/// A datagram the channel refused stays in the held buffer, and the next
/// attempt sends it before asking the engine for anything else. The engine
/// is therefore never polled while one of its datagrams is still unsent.
pub struct QuicSendCommand {
    role: Role,
    connection: ArcConnection,
    channel: ArcChannel,
    config: CommandConfig,
    buffer: Option<BytesMut>,
    close_forced: bool,
}

impl QuicSendCommand {
    pub fn new(connection: ArcConnection, channel: ArcChannel, config: CommandConfig) -> Self {
        Self::with_role(Role::Send, connection, channel, config)
    }

    pub(crate) fn with_role(
        role: Role,
        connection: ArcConnection,
        channel: ArcChannel,
        config: CommandConfig,
    ) -> Self {
        Self {
            role,
            connection,
            channel,
            config,
            buffer: None,
            close_forced: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn attempt(&mut self, pool: &dyn BufferPool) -> Result<bool> {
        loop {
            let buffer = self.buffer.get_or_insert_with(|| {
                let mut buffer = pool.acquire(
                    self.config.min_buffer_capacity(),
                    self.config.direct_buffers(),
                );
                buffer.clear();
                buffer
            });

            // a non-empty buffer was refused by the channel last time
            if buffer.is_empty() && self.connection.produce_next_datagram(buffer)? == 0 {
                if self.config.flush_on_close() == CloseFlush::ForceOnce
                    && !self.close_forced
                    && self.connection.is_marked_closed()
                {
                    self.close_forced = true;
                    if self.connection.force_close()? {
                        continue;
                    }
                }
                if let Some(buffer) = self.buffer.take() {
                    pool.release(buffer);
                }
                return Ok(true);
            }

            if self.channel.send(&buffer[..], self.connection.remote_address())? == 0 {
                return Ok(false);
            }
            buffer.clear();
        }
    }

    pub(crate) fn into_buffer(self) -> Option<BytesMut> {
        self.buffer
    }
}

impl fmt::Debug for QuicSendCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuicSendCommand")
            .field("role", &self.role)
            .field("pending", &self.buffer.as_ref().map(BytesMut::len))
            .field("close_forced", &self.close_forced)
            .finish_non_exhaustive()
    }
}
