use std::{
    io,
    net::SocketAddr,
    task::{Context, Poll},
};

use socket2::{Domain, Socket, Type};

use super::DatagramChannel;

/// A UDP socket registered with the tokio reactor, sending without ever
/// waiting.
///
/// Must be bound from within a tokio runtime.
#[derive(Debug)]
pub struct UdpChannel {
    io: tokio::net::UdpSocket,
}

impl UdpChannel {
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let domain = if addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::DGRAM, None)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        let io = tokio::net::UdpSocket::from_std(socket.into())?;
        Ok(Self { io })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.io.local_addr()
    }

    /// Wait until the socket may accept another datagram.
    pub async fn writable(&self) -> io::Result<()> {
        self.io.writable().await
    }

    pub fn poll_send_ready(&self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.io.poll_send_ready(cx)
    }

    pub async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.io.recv_from(buf).await
    }
}

impl DatagramChannel for UdpChannel {
    fn send(&self, datagram: &[u8], dst: SocketAddr) -> io::Result<usize> {
        match self.io.try_send_to(datagram, dst) {
            Ok(sent) => Ok(sent),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }
}
