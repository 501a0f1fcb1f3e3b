use std::{net::SocketAddr, sync::Arc};

use bytes::BytesMut;

use crate::error::EngineError;

/// The send-side view of a QUIC connection driven by an external engine.
///
/// The engine keeps all protocol state: packet numbers, timers, the closing
/// handshake. Commands only pull encoded datagrams out of it and push them to
/// a [`DatagramChannel`], so every method here takes `&self` and the engine is
/// expected to synchronize itself.
///
/// [`DatagramChannel`]: crate::channel::DatagramChannel
pub trait QuicConnection: Send + Sync {
    /// Encode the next outgoing datagram into the spare capacity of `buf`.
    ///
    /// Returns the number of bytes appended, `0` when nothing is pending.
    /// Each call advances the engine, so a produced datagram that never
    /// reaches the wire is lost.
    fn produce_next_datagram(&self, buf: &mut BytesMut) -> Result<usize, EngineError>;

    /// Where datagrams of this connection are sent to.
    fn remote_address(&self) -> SocketAddr;

    /// Tell the engine its timer fired.
    fn on_timeout(&self) -> Result<(), EngineError>;

    /// Whether the connection has been marked for closing.
    fn is_marked_closed(&self) -> bool;

    /// Make the engine finalize its close so a closing packet becomes
    /// available. Returns whether finalization happened.
    fn force_close(&self) -> Result<bool, EngineError>;

    /// Release the engine's resources. Nothing may target the connection
    /// afterwards.
    fn dispose(&self);
}

pub type ArcConnection = Arc<dyn QuicConnection>;
