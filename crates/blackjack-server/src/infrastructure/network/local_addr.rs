//! Best-effort discovery of the host's LAN address for the startup banner.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Public address used only to pick the outbound interface.  Connecting a UDP
/// socket sends no packets.
const ROUTE_PROBE: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 80);

/// Returns the address of the interface the OS would route external traffic
/// through, or `127.0.0.1` when there is no route (offline host).
pub fn local_ip() -> IpAddr {
    probe_route().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn probe_route() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect(ROUTE_PROBE)?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_is_never_unspecified() {
        let ip = local_ip();
        assert!(!ip.is_unspecified(), "got {ip}");
    }
}
