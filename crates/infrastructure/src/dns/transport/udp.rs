//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). A reply with the TC bit set is
//! returned unchanged; the caller decides whether to retry over TCP.

use super::{transport_error, DnsTransport};
use async_trait::async_trait;
use ferrous_route_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| transport_error(self.server_addr, format!("Failed to bind UDP socket: {}", e)))?;

        // Connected socket: the kernel drops datagrams from other sources.
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| transport_error(self.server_addr, e))?;

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| transport_error(self.server_addr, format!("Failed to send UDP query: {}", e)))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let bytes_received = socket.recv(&mut recv_buf).await.map_err(|e| {
                transport_error(self.server_addr, format!("Failed to receive UDP response: {}", e))
            })?;
            let reply = &recv_buf[..bytes_received];

            match validate_response_id(message_bytes, reply, self.server_addr) {
                Ok(()) => {
                    debug!(server = %self.server_addr, bytes_received, "UDP response received");
                    return Ok(reply.to_vec());
                }
                Err(e) => debug!(error = %e, "Discarding UDP datagram"),
            }
        }
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

/// Checks that `response` carries the ID of `query`.
pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(transport_error(server, "message too short to carry an ID"));
    }
    let query_id = u16::from_be_bytes([query[0], query[1]]);
    let response_id = u16::from_be_bytes([response[0], response[1]]);
    if query_id != response_id {
        return Err(transport_error(
            server,
            format!("ID mismatch: sent {:#06x}, got {:#06x}", query_id, response_id),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod udp_test;
