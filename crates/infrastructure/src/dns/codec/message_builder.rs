//! DNS Message Builder
//!
//! Constructs upstream query messages in wire format using `hickory-proto`.

use ferrous_route_domain::{DomainError, Question};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `question` with a random ID.
    ///
    /// Returns the ID for reply matching together with the serialized bytes.
    pub fn build_query(question: &Question) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Self::parse_name(&question.name)?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordType::from(question.record_type));
        query.set_query_class(DNSClass::from(question.class));

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn parse_name(domain: &str) -> Result<Name, DomainError> {
        let fqdn = if domain.is_empty() || domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{}.", domain)
        };
        Name::from_str(&fqdn).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })
    }

    /// Serialize a Message to wire format bytes
    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
