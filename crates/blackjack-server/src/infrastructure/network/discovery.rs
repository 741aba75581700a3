//! UDP offer broadcasting.
//!
//! While the server is running it announces itself once per second by sending
//! an Offer record to the LAN broadcast address on the discovery port
//! (default 13122).  The Offer carries the server's display name and the TCP
//! port clients should connect to.
//!
//! # How the broadcast reaches clients (for beginners)
//!
//! A datagram addressed to `255.255.255.255` is delivered to every host on the
//! local network segment.  Clients bind the discovery port and simply wait for
//! the next Offer; the server never learns who heard it.  Because UDP does not
//! guarantee delivery, the Offer is repeated every second rather than sent once.
//!
//! Broadcasting needs `SO_BROADCAST` on the socket; without it the OS refuses
//! to send to a broadcast address.
//!
//! # Failure policy
//!
//! A failed send (for example while the network interface is down) is logged
//! and the loop carries on with the next tick.  The broadcaster only stops
//! when the `running` flag is cleared.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use blackjack_core::{OfferMessage, Record};
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, trace, warn};

/// Time between two consecutive Offer broadcasts.
pub const OFFER_INTERVAL: Duration = Duration::from_secs(1);

/// Error type for the offer broadcaster.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The UDP socket could not be bound.
    #[error("failed to bind broadcast socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// `SO_BROADCAST` could not be enabled.
    #[error("failed to enable broadcast on socket: {0}")]
    Broadcast(#[source] std::io::Error),
}

/// Binds an ephemeral UDP socket, enables broadcast, and spawns a task that
/// sends `offer` to `target` every [`OFFER_INTERVAL`].
///
/// `target` is normally `255.255.255.255:<discovery_port>`; tests pass a
/// loopback address instead.
///
/// # Errors
///
/// Returns [`DiscoveryError::BindFailed`] or [`DiscoveryError::Broadcast`] if
/// the socket cannot be prepared.  Send failures inside the task are logged,
/// never returned.
pub async fn start_offer_broadcaster(
    target: SocketAddr,
    offer: OfferMessage,
    running: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, DiscoveryError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    let socket = UdpSocket::bind(addr)
        .await
        .map_err(|source| DiscoveryError::BindFailed { addr, source })?;
    socket.set_broadcast(true).map_err(DiscoveryError::Broadcast)?;

    info!(
        "broadcasting offers for '{}' (tcp {}) to {target}",
        offer.server_name, offer.tcp_port
    );
    let packet = offer.encode();
    Ok(tokio::spawn(broadcast_loop(socket, target, packet, running)))
}

/// Sends `packet` once per tick until `running` is cleared.
async fn broadcast_loop(
    socket: UdpSocket,
    target: SocketAddr,
    packet: Vec<u8>,
    running: Arc<AtomicBool>,
) {
    let mut ticker = interval(OFFER_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
        match socket.send_to(&packet, target).await {
            Ok(_) => trace!("offer sent to {target}"),
            Err(e) => warn!("failed to broadcast offer to {target}: {e}"),
        }
    }

    info!("offer broadcaster stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
