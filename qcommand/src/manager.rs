use std::{
    collections::VecDeque,
    fmt,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use bytes::BytesMut;

use crate::{
    buffer::BufferPool,
    channel::{ArcChannel, handy::UdpChannel},
    command::{ChannelWriteCommand, Command, QuicSendCommand, QuicTimeoutCommand},
    config::CommandConfig,
    conn::ArcConnection,
    error::Result,
};

/// Runs send commands right away, and queues the ones the channel refused
/// until the channel becomes writable again.
///
/// Queued commands resume strictly in submission order: a blocked command
/// holds back every command behind it, so datagrams leave in the order the
/// events producing them occured.
///
/// All methods take `&mut self`, the manager is meant to live on the I/O
/// thread that also learns about writability. Use [`ArcCommandManager`] when
/// commands are submitted from several threads.
pub struct CommandManager {
    commands: VecDeque<Command>,
    pool: Arc<dyn BufferPool>,
    config: CommandConfig,
}

impl CommandManager {
    pub fn new(pool: Arc<dyn BufferPool>) -> Self {
        Self::with_config(pool, CommandConfig::default())
    }

    pub fn with_config(pool: Arc<dyn BufferPool>, config: CommandConfig) -> Self {
        Self {
            commands: VecDeque::new(),
            pool,
            config,
        }
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }

    /// Send `buffer` to `peer`, the buffer goes back to the pool once sent.
    ///
    /// Returns `false` if the datagram was sent right away, `true` if it was
    /// queued.
    pub fn submit_channel_write(
        &mut self,
        channel: ArcChannel,
        buffer: BytesMut,
        peer: SocketAddr,
    ) -> Result<bool> {
        tracing::debug!(target: "quic", %peer, len = buffer.len(), "Submit channel write");
        self.submit(ChannelWriteCommand::new(channel, buffer, peer).into())
    }

    /// Flush everything the connection has to send.
    ///
    /// Returns `false` if the flush completed right away, `true` if it was
    /// queued.
    pub fn submit_quic_send(
        &mut self,
        connection: ArcConnection,
        channel: ArcChannel,
    ) -> Result<bool> {
        tracing::debug!(target: "quic", remote = %connection.remote_address(), "Submit quic send");
        self.submit(QuicSendCommand::new(connection, channel, self.config).into())
    }

    /// Fire the connection's timer and flush what it produced, then dispose
    /// the connection if `dispose` is set.
    ///
    /// Returns `false` if everything completed right away, `true` if it was
    /// queued.
    pub fn submit_quic_timeout(
        &mut self,
        connection: ArcConnection,
        channel: ArcChannel,
        dispose: bool,
    ) -> Result<bool> {
        tracing::debug!(target: "quic", remote = %connection.remote_address(), dispose, "Submit quic timeout");
        self.submit(QuicTimeoutCommand::new(connection, channel, dispose, self.config).into())
    }

    fn submit(&mut self, mut command: Command) -> Result<bool> {
        match command.attempt(self.pool.as_ref()) {
            Ok(true) => Ok(false),
            Ok(false) => {
                self.commands.push_back(command);
                Ok(true)
            }
            Err(error) => {
                command.abandon(self.pool.as_ref());
                Err(error)
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Number of queued commands.
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Resume queued commands in order until one blocks again.
    ///
    /// Returns `true` if commands are left in the queue, `false` once it is
    /// empty. A command that fails is dropped and the error returned, the
    /// commands behind it stay queued.
    pub fn drain(&mut self) -> Result<bool> {
        if self.commands.is_empty() {
            return Ok(false);
        }
        tracing::trace!(target: "quic", pending = self.commands.len(), "Draining commands");
        while let Some(mut command) = self.commands.pop_front() {
            match command.attempt(self.pool.as_ref()) {
                Ok(true) => {}
                Ok(false) => {
                    self.commands.push_front(command);
                    return Ok(true);
                }
                Err(error) => {
                    command.abandon(self.pool.as_ref());
                    return Err(error);
                }
            }
        }
        Ok(false)
    }
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("commands", &self.commands)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A [`CommandManager`] shared between threads.
///
/// Every operation locks the manager for its whole duration, which keeps
/// queue mutation and command attempts serialized.
#[derive(Debug, Clone)]
pub struct ArcCommandManager(Arc<Mutex<CommandManager>>);

impl ArcCommandManager {
    pub fn new(manager: CommandManager) -> Self {
        Self(Arc::new(Mutex::new(manager)))
    }

    pub fn submit_channel_write(
        &self,
        channel: ArcChannel,
        buffer: BytesMut,
        peer: SocketAddr,
    ) -> Result<bool> {
        self.0
            .lock()
            .unwrap()
            .submit_channel_write(channel, buffer, peer)
    }

    pub fn submit_quic_send(&self, connection: ArcConnection, channel: ArcChannel) -> Result<bool> {
        self.0.lock().unwrap().submit_quic_send(connection, channel)
    }

    pub fn submit_quic_timeout(
        &self,
        connection: ArcConnection,
        channel: ArcChannel,
        dispose: bool,
    ) -> Result<bool> {
        self.0
            .lock()
            .unwrap()
            .submit_quic_timeout(connection, channel, dispose)
    }

    pub fn has_pending(&self) -> bool {
        self.0.lock().unwrap().has_pending()
    }

    pub fn pending(&self) -> usize {
        self.0.lock().unwrap().pending()
    }

    pub fn drain(&self) -> Result<bool> {
        self.0.lock().unwrap().drain()
    }

    /// Wait for `channel` to become writable and drain, until nothing is
    /// left in the queue.
    ///
    /// The lock is never held across an await point.
    pub async fn flush_when_writable(&self, channel: &UdpChannel) -> Result<()> {
        while self.has_pending() {
            channel.writable().await?;
            self.drain()?;
        }
        Ok(())
    }
}

impl From<CommandManager> for ArcCommandManager {
    fn from(manager: CommandManager) -> Self {
        Self::new(manager)
    }
}
