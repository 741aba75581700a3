//! Listening for server Offers on the LAN.
//!
//! The client binds the well-known discovery port (13122) on all interfaces
//! and waits for the first datagram that decodes as a valid Offer.  Anything
//! else arriving on the port (other protocols, corrupted packets, records of
//! the wrong type) is dropped silently and listening continues.
//!
//! # Port sharing
//!
//! Several clients may run on the same host, and all of them need port 13122.
//! The socket is therefore created with `SO_REUSEADDR` (and `SO_REUSEPORT` on
//! Unix) before it is bound, which `tokio::net::UdpSocket::bind` cannot do on
//! its own.  The socket is built with `socket2` and handed to Tokio afterwards.

use std::net::{Ipv4Addr, SocketAddr};

use blackjack_core::{OfferMessage, Record};
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info};

/// Large enough for any datagram we care about; longer ones are truncated
/// by the OS and then fail to decode.
const RECV_BUFFER: usize = 1024;

/// Error type for offer discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The UDP socket could not be created, configured, or bound.
    #[error("failed to bind discovery socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred while receiving a datagram.
    #[error("recv error: {0}")]
    Recv(#[source] std::io::Error),
}

/// A server that answered discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOffer {
    /// Sender's IP combined with the advertised TCP port.
    pub addr: SocketAddr,
    pub server_name: String,
}

/// Binds a shareable UDP socket on `port` (all interfaces).
///
/// # Errors
///
/// Returns [`DiscoveryError::BindFailed`] if any step of socket setup fails.
pub fn bind_discovery_socket(port: u16) -> Result<UdpSocket, DiscoveryError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let bind_failed = |source| DiscoveryError::BindFailed { addr, source };

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(bind_failed)?;
    socket.set_reuse_address(true).map_err(bind_failed)?;
    #[cfg(unix)]
    socket.set_reuse_port(true).map_err(bind_failed)?;
    socket.set_broadcast(true).map_err(bind_failed)?;
    socket.set_nonblocking(true).map_err(bind_failed)?;
    socket.bind(&addr.into()).map_err(bind_failed)?;

    UdpSocket::from_std(socket.into()).map_err(bind_failed)
}

/// Waits for the first valid Offer on `socket`.
///
/// # Errors
///
/// Returns [`DiscoveryError::Recv`] if the socket itself fails.  Invalid
/// datagrams are never errors.
pub async fn wait_for_offer(socket: &UdpSocket) -> Result<ServerOffer, DiscoveryError> {
    let mut buf = vec![0u8; RECV_BUFFER];
    loop {
        let (len, src) = socket.recv_from(&mut buf).await.map_err(DiscoveryError::Recv)?;
        match OfferMessage::decode(&buf[..len]) {
            Ok(offer) => {
                let server = ServerOffer {
                    addr: SocketAddr::new(src.ip(), offer.tcp_port),
                    server_name: offer.server_name,
                };
                info!(
                    "received offer from '{}' at {}",
                    server.server_name,
                    src.ip()
                );
                return Ok(server);
            }
            Err(e) => debug!("ignoring datagram from {src}: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn offer_bytes(port: u16, name: &str) -> Vec<u8> {
        OfferMessage {
            tcp_port: port,
            server_name: name.to_string(),
        }
        .encode()
    }

    fn loopback_target(socket: &UdpSocket) -> SocketAddr {
        let port = socket.local_addr().unwrap().port();
        SocketAddr::from((Ipv4Addr::LOCALHOST, port))
    }

    #[tokio::test]
    async fn test_wait_for_offer_skips_garbage_until_valid_offer() {
        // Arrange
        let listener = bind_discovery_socket(0).unwrap();
        let target = loopback_target(&listener);
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut wrong_magic = offer_bytes(1, "x");
        wrong_magic[0] ^= 0xFF;

        sender.send_to(b"hello", target).await.unwrap();
        sender.send_to(&wrong_magic, target).await.unwrap();
        sender.send_to(&offer_bytes(4242, "TeamDealer"), target).await.unwrap();

        // Act
        let offer = timeout(Duration::from_secs(3), wait_for_offer(&listener))
            .await
            .expect("offer within 3 s")
            .unwrap();

        // Assert
        assert_eq!(offer.server_name, "TeamDealer");
        assert_eq!(offer.addr, SocketAddr::from((Ipv4Addr::LOCALHOST, 4242)));
    }

    #[tokio::test]
    async fn test_wrong_record_type_is_ignored() {
        // Arrange: a Request-typed record is not an Offer
        let listener = bind_discovery_socket(0).unwrap();
        let target = loopback_target(&listener);
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut request_typed = offer_bytes(9, "y");
        request_typed[4] = 0x03;
        sender.send_to(&request_typed, target).await.unwrap();

        // Act
        let result = timeout(Duration::from_millis(300), wait_for_offer(&listener)).await;

        // Assert
        assert!(result.is_err(), "no offer should have been accepted");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_two_clients_can_share_the_discovery_port() {
        let first = bind_discovery_socket(0).unwrap();
        let port = first.local_addr().unwrap().port();

        let second = bind_discovery_socket(port);

        assert!(second.is_ok(), "port reuse must allow a second listener");
    }
}
