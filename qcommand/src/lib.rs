//! The deferred-send pipeline between a QUIC engine and a non-blocking
//! datagram socket.
//!
//! A [`CommandManager`] attempts every send right away. When the socket
//! refuses a datagram the command is queued with its partial state, and
//! [`CommandManager::drain`] resumes the queue in order once the socket is
//! writable again.
//!
//! The QUIC engine, the socket and the buffer pool are external and plugged
//! in through [`QuicConnection`], [`DatagramChannel`] and [`BufferPool`].
//! [`HeapPool`] and [`UdpChannel`] are ready-made implementations of the
//! last two.
//!
//! [`HeapPool`]: buffer::handy::HeapPool
//! [`UdpChannel`]: channel::handy::UdpChannel

pub mod buffer;
pub mod channel;
pub mod command;
pub mod config;
pub mod conn;
pub mod error;
pub mod manager;

pub use buffer::BufferPool;
pub use channel::DatagramChannel;
pub use config::{CloseFlush, CommandConfig};
pub use conn::QuicConnection;
pub use error::{EngineError, EngineOp, Error, Result};
pub use manager::{ArcCommandManager, CommandManager};
