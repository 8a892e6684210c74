//! TCP Transport for DNS queries (RFC 1035 §4.2.2): two-byte length prefix framing.

use super::{transport_error, DnsTransport};
use async_trait::async_trait;
use ferrous_route_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect(&self) -> Result<TcpStream, DomainError> {
        let stream = TcpStream::connect(self.server_addr).await.map_err(|e| {
            transport_error(self.server_addr, format!("Connection refused: {}", e))
        })?;

        stream.set_nodelay(true).map_err(|e| {
            transport_error(self.server_addr, format!("Failed to set TCP_NODELAY: {}", e))
        })?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let mut stream = self.connect().await?;

        send_with_length_prefix(&mut stream, message_bytes)
            .await
            .map_err(|e| transport_error(self.server_addr, format!("Failed to send TCP query: {}", e)))?;

        debug!(server = %self.server_addr, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes = read_with_length_prefix(&mut stream)
            .await
            .map_err(|e| transport_error(self.server_addr, format!("Failed to read TCP response: {}", e)))?;

        debug!(server = %self.server_addr, response_len = response_bytes.len(), "TCP response received");

        Ok(response_bytes)
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "DNS message exceeds 65535 bytes"))?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let mut message = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut message).await?;

    Ok(message)
}
