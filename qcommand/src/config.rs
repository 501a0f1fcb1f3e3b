use derive_builder::Builder;
use getset::CopyGetters;

/// The smallest UDP payload a QUIC client may use for its Initial datagrams,
/// see [RFC 9000 section 14.1](https://www.rfc-editor.org/rfc/rfc9000.html#section-14.1).
pub const MIN_CLIENT_INITIAL_LEN: usize = 1200;

/// What a quic send command does when the engine has nothing left to send
/// but the connection has been marked for closing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CloseFlush {
    /// Give up as soon as the engine produces nothing.
    #[default]
    Disabled,
    /// Ask the engine once to finalize the close, then poll it again so the
    /// closing packet reaches the wire.
    ForceOnce,
}

/// Settings shared by every command a [`CommandManager`] creates.
///
/// [`CommandManager`]: crate::manager::CommandManager
#[derive(Builder, CopyGetters, Debug, Clone, Copy, PartialEq, Eq)]
#[builder(default, setter(into), build_fn(skip))]
pub struct CommandConfig {
    /// Capacity requested from the pool for every fresh send buffer.
    #[getset(get_copy = "pub")]
    min_buffer_capacity: usize,
    /// Forwarded to [`BufferPool::acquire`].
    ///
    /// [`BufferPool::acquire`]: crate::buffer::BufferPool::acquire
    #[getset(get_copy = "pub")]
    direct_buffers: bool,
    #[getset(get_copy = "pub")]
    flush_on_close: CloseFlush,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            min_buffer_capacity: MIN_CLIENT_INITIAL_LEN,
            direct_buffers: true,
            flush_on_close: CloseFlush::Disabled,
        }
    }
}

impl CommandConfig {
    pub fn builder() -> CommandConfigBuilder {
        CommandConfigBuilder::default()
    }
}

impl CommandConfigBuilder {
    pub fn build(&mut self) -> Result<CommandConfig, &'static str> {
        let default = CommandConfig::default();
        let min_buffer_capacity = self
            .min_buffer_capacity
            .unwrap_or(default.min_buffer_capacity);
        if min_buffer_capacity == 0 {
            return Err("min_buffer_capacity must be greater than 0");
        }
        Ok(CommandConfig {
            min_buffer_capacity,
            direct_buffers: self.direct_buffers.unwrap_or(default.direct_buffers),
            flush_on_close: self.flush_on_close.unwrap_or(default.flush_on_close),
        })
    }
}
