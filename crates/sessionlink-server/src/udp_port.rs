//! Real UDP [`DatagramPort`] backed by `tokio::net::UdpSocket`.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use sessionlink_core::transport::{DatagramPort, PortError};
use sessionlink_proto::packet::MAX_WIRE_SIZE;
use tokio::net::UdpSocket;

/// A bound UDP socket exposed through [`DatagramPort`].
pub struct UdpPort {
    socket: UdpSocket,
    read_deadline: Mutex<Option<Duration>>,
    write_deadline: Mutex<Option<Duration>>,
}

impl UdpPort {
    /// Bind a new UDP port at `addr`.
    ///
    /// # Errors
    /// Any OS-level bind failure, as [`PortError::Io`].
    pub async fn bind(addr: &str) -> Result<Self, PortError> {
        let socket = UdpSocket::bind(addr).await.map_err(|err| PortError::Io(err.to_string()))?;
        Ok(Self { socket, read_deadline: Mutex::new(None), write_deadline: Mutex::new(None) })
    }
}

#[async_trait]
impl DatagramPort for UdpPort {
    async fn send(&self, bytes: &[u8], peer_addr: &str) -> Result<(), PortError> {
        let deadline = *self.write_deadline.lock().expect("deadline mutex poisoned");
        let write = async {
            self.socket
                .send_to(bytes, peer_addr)
                .await
                .map(|_| ())
                .map_err(|err| PortError::Io(err.to_string()))
        };

        match deadline {
            Some(d) => {
                tokio::time::timeout(d, write).await.map_err(|_| PortError::DeadlineExceeded)?
            },
            None => write.await,
        }
    }

    async fn recv(&self) -> Result<(Bytes, String), PortError> {
        let deadline = *self.read_deadline.lock().expect("deadline mutex poisoned");
        let mut buf = vec![0u8; MAX_WIRE_SIZE];

        let read = async {
            self.socket.recv_from(&mut buf).await.map_err(|err| PortError::Io(err.to_string()))
        };

        let (n, peer) = match deadline {
            Some(d) => tokio::time::timeout(d, read).await.map_err(|_| PortError::DeadlineExceeded)??,
            None => read.await?,
        };

        buf.truncate(n);
        Ok((Bytes::from(buf), peer.to_string()))
    }

    fn set_read_deadline(&self, deadline: Option<Duration>) {
        *self.read_deadline.lock().expect("deadline mutex poisoned") = deadline;
    }

    fn set_write_deadline(&self, deadline: Option<Duration>) {
        *self.write_deadline.lock().expect("deadline mutex poisoned") = deadline;
    }

    async fn close(&self) {
        // UdpSocket has no explicit close; dropping it releases the fd. This
        // port is typically held for the process lifetime.
    }
}
