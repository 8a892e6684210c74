//! Response encoding.
//!
//! The question section echoes the client's decoded queries unchanged. RDATA
//! is copied as received from upstream, so aliased owner names need no
//! fix-ups inside it.

use ferrous_route_application::SentResponse;
use ferrous_route_domain::{DomainError, ResourceRecord, ResponseCode};
use hickory_proto::op::{self, Message, OpCode, Query};
use hickory_proto::rr::rdata::NULL;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};

/// Largest UDP reply sent to clients; the request's EDNS0 size is not honoured.
pub const MAX_UDP_PAYLOAD: usize = 512;
pub const MAX_TCP_MESSAGE_SIZE: usize = 65535;

/// Encodes `response` with `queries` as its question section. If the full
/// message exceeds `max_size`, the header and questions are sent alone with
/// the TC bit set.
pub fn encode_response(
    response: &SentResponse,
    queries: &[Query],
    max_size: usize,
) -> Result<Vec<u8>, DomainError> {
    let mut message = reply_header(
        response.id,
        response.recursion_desired,
        response.rcode,
    );
    message.add_queries(queries.iter().cloned());

    let sections = &response.sections;
    message.add_answers(to_records(&sections.answer)?);
    message.add_name_servers(to_records(&sections.authority)?);
    message.add_additionals(to_records(&sections.additional)?);

    let bytes = serialize(&message)?;
    if bytes.len() <= max_size {
        return Ok(bytes);
    }

    let mut truncated = reply_header(
        response.id,
        response.recursion_desired,
        response.rcode,
    );
    truncated.add_queries(queries.iter().cloned());
    truncated.set_truncated(true);
    serialize(&truncated)
}

/// Header-only reply carrying `rcode`, used when a request could not be parsed
/// or served.
pub fn encode_error(
    id: u16,
    recursion_desired: bool,
    rcode: ResponseCode,
) -> Result<Vec<u8>, DomainError> {
    serialize(&reply_header(id, recursion_desired, rcode))
}

fn reply_header(id: u16, recursion_desired: bool, rcode: ResponseCode) -> Message {
    let mut message = Message::error_msg(
        id,
        OpCode::Query,
        <op::ResponseCode as From<u16>>::from(u16::from(rcode.to_u8())),
    );
    message.set_recursion_desired(recursion_desired);
    message.set_recursion_available(true);
    message
}

fn to_records(records: &[ResourceRecord]) -> Result<Vec<Record>, DomainError> {
    records.iter().map(to_record).collect()
}

fn to_record(record: &ResourceRecord) -> Result<Record, DomainError> {
    let bytes = record.data.as_bytes();
    if bytes.len() > usize::from(u16::MAX) {
        return Err(DomainError::InvalidDnsResponse(format!(
            "RDATA too long for {}",
            record.name
        )));
    }
    let rdata = if bytes.is_empty() {
        NULL::new()
    } else {
        NULL::with(bytes.to_vec())
    };

    let mut wire = Record::from_rdata(
        owner_name(&record.name)?,
        record.ttl,
        RData::Unknown {
            code: RecordType::from(record.record_type),
            rdata,
        },
    );
    wire.set_dns_class(DNSClass::from(record.class));
    Ok(wire)
}

fn owner_name(name: &str) -> Result<Name, DomainError> {
    if name.is_empty() || name == "." {
        return Ok(Name::root());
    }
    let mut parsed = Name::from_ascii(name).map_err(|e| {
        DomainError::InvalidDomainName(format!("Cannot encode name '{}': {}", name, e))
    })?;
    parsed.set_fqdn(true);
    Ok(parsed)
}

fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
    message.to_vec().map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to serialize DNS reply: {}", e))
    })
}
