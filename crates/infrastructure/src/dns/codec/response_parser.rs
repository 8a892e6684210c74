use super::HEADER_LEN;
use ferrous_route_domain::{
    DomainError, PartialResponse, RecordData, RecordSections, ResourceRecord, ResponseCode,
};
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use tracing::debug;

const TC_BIT: u8 = 0x02;
const QR_BIT: u8 = 0x80;

/// An upstream reply reduced to what the router needs.
#[derive(Debug, Clone)]
pub struct ParsedReply {
    pub id: u16,
    pub truncated: bool,
    pub partial: PartialResponse,
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<ParsedReply, DomainError> {
        if response_bytes.len() < HEADER_LEN {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Reply too short: {} bytes",
                response_bytes.len()
            )));
        }
        if response_bytes[2] & QR_BIT == 0 {
            return Err(DomainError::InvalidDnsResponse(
                "Reply does not have the QR bit set".to_string(),
            ));
        }

        let id = u16::from_be_bytes([response_bytes[0], response_bytes[1]]);
        let truncated = response_bytes[2] & TC_BIT != 0;
        let rcode = ResponseCode::from_u8(response_bytes[3] & 0x0F);

        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let sections = RecordSections {
            answer: convert_all(message.answers())?,
            authority: convert_all(message.name_servers())?,
            additional: convert_all(message.additionals())?,
        };

        debug!(
            id,
            rcode = %rcode,
            truncated,
            answers = sections.answer.len(),
            authority = sections.authority.len(),
            additional = sections.additional.len(),
            "DNS response parsed"
        );

        Ok(ParsedReply {
            id,
            truncated,
            partial: PartialResponse::new(rcode, sections),
        })
    }
}

fn convert_all(records: &[Record]) -> Result<Vec<ResourceRecord>, DomainError> {
    records.iter().map(convert_record).collect()
}

fn convert_record(record: &Record) -> Result<ResourceRecord, DomainError> {
    let mut rdata = Vec::new();
    let mut encoder = BinEncoder::new(&mut rdata);
    // Names inside RDATA must not point into a message we are not going to send.
    // Canonical form also lowercases them.
    encoder.set_canonical_form(true);
    record.data().emit(&mut encoder).map_err(|e| {
        DomainError::InvalidDnsResponse(format!(
            "Failed to encode RDATA for {}: {}",
            record.name(),
            e
        ))
    })?;

    let name = record.name().to_ascii();
    Ok(ResourceRecord::new(
        name.trim_end_matches('.'),
        u16::from(record.record_type()),
        u16::from(record.dns_class()),
        record.ttl(),
        RecordData::new(rdata),
    ))
}
