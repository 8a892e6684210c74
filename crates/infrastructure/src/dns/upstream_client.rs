use super::codec::{MessageBuilder, ParsedReply, ResponseParser};
use super::transport::{create_transport, tcp::TcpTransport, DnsTransport};
use async_trait::async_trait;
use ferrous_route_application::ports::UpstreamTransport;
use ferrous_route_domain::{
    DomainError, PartialResponse, Question, UpstreamEndpoint, UpstreamProtocol,
};
use tracing::debug;

/// Sends questions to upstream servers over UDP or TCP.
///
/// A truncated UDP reply is retried once over TCP against the same address.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpstreamClient;

impl UpstreamClient {
    pub fn new() -> Self {
        Self
    }

    fn check_reply(
        endpoint: &UpstreamEndpoint,
        query_id: u16,
        reply: ParsedReply,
    ) -> Result<ParsedReply, DomainError> {
        if reply.id != query_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} answered with ID {:#06x}, expected {:#06x}",
                endpoint, reply.id, query_id
            )));
        }
        Ok(reply)
    }
}

#[async_trait]
impl UpstreamTransport for UpstreamClient {
    async fn exchange(
        &self,
        endpoint: &UpstreamEndpoint,
        question: &Question,
    ) -> Result<Vec<PartialResponse>, DomainError> {
        let (query_id, query) = MessageBuilder::build_query(question)?;
        let transport = create_transport(endpoint);

        let bytes = transport.send(&query).await?;
        let mut reply = Self::check_reply(endpoint, query_id, ResponseParser::parse(&bytes)?)?;

        if reply.truncated && endpoint.protocol == UpstreamProtocol::Udp {
            debug!(server = %endpoint, domain = %question.name, "Truncated reply, retrying over TCP");
            let bytes = TcpTransport::new(endpoint.addr).send(&query).await?;
            reply = Self::check_reply(endpoint, query_id, ResponseParser::parse(&bytes)?)?;
        }

        Ok(vec![reply.partial])
    }
}
