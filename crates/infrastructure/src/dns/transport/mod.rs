pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_route_domain::{DomainError, UpstreamEndpoint, UpstreamProtocol};

#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends one query and returns the raw reply. Deadlines are the caller's.
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

pub fn create_transport(endpoint: &UpstreamEndpoint) -> Transport {
    match endpoint.protocol {
        UpstreamProtocol::Udp => Transport::Udp(udp::UdpTransport::new(endpoint.addr)),
        UpstreamProtocol::Tcp => Transport::Tcp(tcp::TcpTransport::new(endpoint.addr)),
    }
}

pub(crate) fn transport_error(server: impl ToString, reason: impl ToString) -> DomainError {
    DomainError::TransportError {
        server: server.to_string(),
        reason: reason.to_string(),
    }
}
