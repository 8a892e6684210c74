//! Inbound query parsing.
//!
//! The header is checked by hand so a reply can be addressed even when the
//! rest of the packet is unreadable; everything after it is decoded by
//! `hickory-proto`. The decoded queries are kept as-is for the question echo.

use super::HEADER_LEN;
use ferrous_route_domain::Question;
use hickory_proto::op::{Message, Query};
use hickory_proto::rr::Name;

const QR_BIT: u8 = 0x80;
const RD_BIT: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub id: u16,
    pub opcode: u8,
    pub recursion_desired: bool,
    /// Questions as received, echoed verbatim in the reply.
    pub queries: Vec<Query>,
    pub questions: Vec<Question>,
}

/// A packet that cannot be served. `id` is set when the header was readable,
/// so the caller can still answer with FORMERR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRequest {
    pub id: Option<u16>,
    pub recursion_desired: bool,
    pub reason: String,
}

impl MalformedRequest {
    fn headerless(reason: &str) -> Self {
        Self {
            id: None,
            recursion_desired: false,
            reason: reason.to_string(),
        }
    }
}

pub fn parse_request(buf: &[u8]) -> Result<ParsedRequest, MalformedRequest> {
    if buf.len() < HEADER_LEN {
        return Err(MalformedRequest::headerless("packet shorter than header"));
    }
    if buf[2] & QR_BIT != 0 {
        return Err(MalformedRequest::headerless("packet is a response"));
    }

    let id = u16::from_be_bytes([buf[0], buf[1]]);
    let recursion_desired = buf[2] & RD_BIT != 0;

    let mut message = Message::from_vec(buf).map_err(|e| MalformedRequest {
        id: Some(id),
        recursion_desired,
        reason: e.to_string(),
    })?;

    let queries = message.take_queries();
    let questions = queries
        .iter()
        .map(|query| {
            Question::with_codes(
                question_name(query.name()),
                u16::from(query.query_type()),
                u16::from(query.query_class()),
            )
        })
        .collect();

    Ok(ParsedRequest {
        id,
        opcode: u8::from(message.op_code()),
        recursion_desired,
        queries,
        questions,
    })
}

/// Presentation form used for routing: escaped ASCII, no trailing dot.
/// Bytes that are not printable ASCII are escaped rather than replaced.
fn question_name(name: &Name) -> String {
    let ascii = name.to_ascii();
    match ascii.strip_suffix('.') {
        Some(trimmed) => trimmed.to_string(),
        None => ascii,
    }
}
