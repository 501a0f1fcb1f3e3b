use derive_more::From;

use crate::{buffer::BufferPool, error::Result};

mod send;
mod timeout;
mod write;

pub use send::{QuicSendCommand, Role};
pub use timeout::QuicTimeoutCommand;
pub use write::ChannelWriteCommand;

/// A unit of deferred, resumable send work.
///
/// [`attempt`] makes as much progress as the datagram channel allows and
/// reports whether the command completed. An incomplete command keeps its
/// partial state, the next [`attempt`] resumes exactly where it stopped.
///
/// [`attempt`]: Command::attempt
#[derive(Debug, From)]
pub enum Command {
    ChannelWrite(ChannelWriteCommand),
    QuicSend(QuicSendCommand),
    QuicTimeout(QuicTimeoutCommand),
}

impl Command {
    /// Returns `Ok(true)` once the command is done, `Ok(false)` if the channel
    /// would block and the command must be attempted again later.
    pub fn attempt(&mut self, pool: &dyn BufferPool) -> Result<bool> {
        tracing::debug!(target: "quic", command = %self.kind(), "Attempting command");
        let completed = match self {
            Command::ChannelWrite(cmd) => cmd.attempt(pool),
            Command::QuicSend(cmd) => cmd.attempt(pool),
            Command::QuicTimeout(cmd) => cmd.attempt(pool),
        }?;
        tracing::debug!(target: "quic", command = %self.kind(), completed, "Attempted command");
        Ok(completed)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::ChannelWrite(_) => "channel write",
            Command::QuicSend(cmd) => match cmd.role() {
                Role::Send => "quic send",
                Role::Timeout => "quic timeout send",
            },
            Command::QuicTimeout(_) => "quic timeout",
        }
    }

    /// Return the buffer a failed command still holds to the pool.
    pub(crate) fn abandon(self, pool: &dyn BufferPool) {
        tracing::warn!(target: "quic", command = %self.kind(), "Abandoning failed command");
        let buffer = match self {
            Command::ChannelWrite(cmd) => cmd.into_buffer(),
            Command::QuicSend(cmd) => cmd.into_buffer(),
            Command::QuicTimeout(cmd) => cmd.into_buffer(),
        };
        if let Some(buffer) = buffer {
            pool.release(buffer);
        }
    }
}
