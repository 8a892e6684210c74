use super::Question;
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportProtocol {
    Udp,
    Tcp,
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProtocol::Udp => f.write_str("udp"),
            TransportProtocol::Tcp => f.write_str("tcp"),
        }
    }
}

/// An inbound query as delivered by a listener.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub id: u16,
    pub questions: Vec<Question>,
    pub client: SocketAddr,
    pub protocol: TransportProtocol,
    pub recursion_desired: bool,
}

impl DnsRequest {
    pub fn new(
        id: u16,
        questions: Vec<Question>,
        client: SocketAddr,
        protocol: TransportProtocol,
    ) -> Self {
        Self {
            id,
            questions,
            client,
            protocol,
            recursion_desired: true,
        }
    }
}
