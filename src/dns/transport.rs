//! UDP transport for direct probes (RFC 1035 §4.2.1).
//!
//! Every exchange binds its own ephemeral socket, sends one datagram and waits
//! for one reply. There is no pooling and no fallback to TCP.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::net::UdpSocket;

use crate::config::MAX_UDP_RESPONSE_SIZE;
use crate::error_handling::LookupError;

/// Sends an encoded DNS message and returns the raw reply.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends `message` to `server` and waits up to `timeout` for the reply.
    async fn exchange(
        &self,
        server: SocketAddr,
        message: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, LookupError>;
}

/// Plain DNS over UDP.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpTransport;

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        message: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, LookupError> {
        let bind_addr: SocketAddr = if server.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| LookupError::Transport(format!("failed to bind UDP socket: {e}")))?;

        // Connecting filters datagrams from any other source
        socket.connect(server).await.map_err(|e| {
            LookupError::Transport(format!("failed to connect UDP socket to {server}: {e}"))
        })?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message))
            .await
            .map_err(|_| LookupError::Timeout)?
            .map_err(|e| LookupError::Transport(format!("failed to send to {server}: {e}")))?;

        debug!("UDP query sent to {server} ({bytes_sent} bytes)");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| LookupError::Timeout)?
            .map_err(|e| {
                LookupError::Transport(format!("failed to receive from {server}: {e}"))
            })?;

        if bytes_received == 0 {
            warn!("Empty UDP datagram from {server}");
            return Err(LookupError::Malformed("empty datagram".to_string()));
        }

        recv_buf.truncate(bytes_received);
        debug!("UDP response received from {server} ({bytes_received} bytes)");
        Ok(recv_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_with_local_responder() {
        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = responder.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (len, peer) = responder.recv_from(&mut buf).await.unwrap();
            let mut reply = buf[..len].to_vec();
            reply.reverse();
            responder.send_to(&reply, peer).await.unwrap();
        });

        let reply = UdpTransport
            .exchange(server, &[1, 2, 3, 4], Duration::from_secs(2))
            .await
            .expect("exchange should succeed");
        assert_eq!(reply, vec![4, 3, 2, 1]);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_exchange_times_out_when_nobody_answers() {
        // Bound but never read from: the datagram is queued and ignored
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = silent.local_addr().unwrap();

        let result = UdpTransport
            .exchange(server, &[0u8; 12], Duration::from_millis(100))
            .await;
        assert_eq!(result, Err(LookupError::Timeout));
        drop(silent);
    }
}
