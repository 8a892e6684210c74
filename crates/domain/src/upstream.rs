use crate::errors::DomainError;
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpstreamProtocol {
    #[default]
    Udp,
    Tcp,
}

impl UpstreamProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamProtocol::Udp => "UDP",
            UpstreamProtocol::Tcp => "TCP",
        }
    }
}

/// A single upstream server: address, port and the protocol used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpstreamEndpoint {
    pub addr: SocketAddr,
    pub protocol: UpstreamProtocol,
}

impl UpstreamEndpoint {
    pub fn udp(addr: SocketAddr) -> Self {
        Self {
            addr,
            protocol: UpstreamProtocol::Udp,
        }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        Self {
            addr,
            protocol: UpstreamProtocol::Tcp,
        }
    }
}

impl fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            UpstreamProtocol::Udp => write!(f, "{}", self.addr),
            UpstreamProtocol::Tcp => write!(f, "tcp://{}", self.addr),
        }
    }
}

fn parse_socket_addr(s: &str) -> Option<SocketAddr> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Some(addr);
    }
    let bare = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    bare.parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
}

impl FromStr for UpstreamEndpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (protocol, addr_str) = if let Some(rest) = s.strip_prefix("udp://") {
            (UpstreamProtocol::Udp, rest)
        } else if let Some(rest) = s.strip_prefix("tcp://") {
            (UpstreamProtocol::Tcp, rest)
        } else if s.contains("://") {
            return Err(DomainError::InvalidUpstream(format!(
                "Unsupported scheme in '{}'. Expected 'udp://' or 'tcp://'",
                s
            )));
        } else {
            (UpstreamProtocol::Udp, s)
        };

        let addr = parse_socket_addr(addr_str).ok_or_else(|| {
            DomainError::InvalidUpstream(format!(
                "Invalid address '{}'. Expected 'IP' or 'IP:PORT'",
                addr_str
            ))
        })?;

        Ok(Self { addr, protocol })
    }
}

/// Upstream servers arranged as a tree: leaves are servers, groups race their children.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTopology")]
pub enum UpstreamTopology {
    Server(UpstreamEndpoint),
    Group(Vec<UpstreamTopology>),
}

impl UpstreamTopology {
    pub fn empty() -> Self {
        UpstreamTopology::Group(Vec::new())
    }

    /// Number of servers anywhere in the tree.
    pub fn server_count(&self) -> usize {
        match self {
            UpstreamTopology::Server(_) => 1,
            UpstreamTopology::Group(children) => children.iter().map(Self::server_count).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.server_count() == 0
    }

    pub fn servers(&self) -> Vec<&UpstreamEndpoint> {
        let mut out = Vec::new();
        self.collect_servers(&mut out);
        out
    }

    fn collect_servers<'a>(&'a self, out: &mut Vec<&'a UpstreamEndpoint>) {
        match self {
            UpstreamTopology::Server(endpoint) => out.push(endpoint),
            UpstreamTopology::Group(children) => {
                for child in children {
                    child.collect_servers(out);
                }
            }
        }
    }
}

impl Default for UpstreamTopology {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<UpstreamEndpoint> for UpstreamTopology {
    fn from(endpoint: UpstreamEndpoint) -> Self {
        UpstreamTopology::Server(endpoint)
    }
}

impl FromStr for UpstreamTopology {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<UpstreamEndpoint>().map(UpstreamTopology::Server)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTopology {
    Server(String),
    Group(Vec<RawTopology>),
}

impl TryFrom<RawTopology> for UpstreamTopology {
    type Error = DomainError;

    fn try_from(raw: RawTopology) -> Result<Self, Self::Error> {
        match raw {
            RawTopology::Server(s) => s.parse(),
            RawTopology::Group(children) => children
                .into_iter()
                .map(UpstreamTopology::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(UpstreamTopology::Group),
        }
    }
}
