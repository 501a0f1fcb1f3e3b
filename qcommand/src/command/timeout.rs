use std::fmt;

use bytes::BytesMut;

use super::{QuicSendCommand, Role};
use crate::{
    buffer::BufferPool, channel::ArcChannel, config::CommandConfig, conn::ArcConnection,
    error::Result,
};

/// Notifies a QUIC connection that its timer fired, then flushes whatever
/// the engine produced in response, retransmissions or a closing packet.
///
/// The timer notification fires once per command no matter how many
/// attempts the flush takes. If asked to, the connection is disposed after
/// the last of those datagrams is on the wire, never earlier.
pub struct QuicTimeoutCommand {
    send: QuicSendCommand,
    connection: ArcConnection,
    dispose: bool,
    timeout_fired: bool,
    disposed: bool,
}

impl QuicTimeoutCommand {
    pub fn new(
        connection: ArcConnection,
        channel: ArcChannel,
        dispose: bool,
        config: CommandConfig,
    ) -> Self {
        Self {
            send: QuicSendCommand::with_role(Role::Timeout, connection.clone(), channel, config),
            connection,
            dispose,
            timeout_fired: false,
            disposed: false,
        }
    }

    pub fn attempt(&mut self, pool: &dyn BufferPool) -> Result<bool> {
        if !self.timeout_fired {
            self.connection.on_timeout()?;
            self.timeout_fired = true;
        }
        if !self.send.attempt(pool)? {
            return Ok(false);
        }
        if self.dispose && !self.disposed {
            tracing::debug!(target: "quic", remote = %self.connection.remote_address(), "Disposing quic connection");
            self.connection.dispose();
            self.disposed = true;
        }
        Ok(true)
    }

    pub(crate) fn into_buffer(self) -> Option<BytesMut> {
        self.send.into_buffer()
    }
}

impl fmt::Debug for QuicTimeoutCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuicTimeoutCommand")
            .field("send", &self.send)
            .field("dispose", &self.dispose)
            .field("timeout_fired", &self.timeout_fired)
            .finish_non_exhaustive()
    }
}
