use std::{io, net::SocketAddr, sync::Arc};

pub mod handy;

/// A non-blocking datagram socket.
///
/// Datagram sends are atomic: [`send`] either transfers the whole payload
/// and returns its length, or transfers nothing and returns `Ok(0)` because
/// the socket would block. Genuine failures are returned as errors.
///
/// [`send`]: DatagramChannel::send
pub trait DatagramChannel: Send + Sync {
    fn send(&self, datagram: &[u8], dst: SocketAddr) -> io::Result<usize>;
}

pub type ArcChannel = Arc<dyn DatagramChannel>;
