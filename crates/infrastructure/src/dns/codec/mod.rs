//! Wire-format adapters between raw DNS packets and the routing core's types.

pub mod message_builder;
pub mod request_parser;
pub mod response_parser;
pub mod wire_response;

pub use message_builder::MessageBuilder;
pub use request_parser::{parse_request, MalformedRequest, ParsedRequest};
pub use response_parser::{ParsedReply, ResponseParser};
pub use wire_response::{encode_error, encode_response, MAX_TCP_MESSAGE_SIZE, MAX_UDP_PAYLOAD};

pub(crate) const HEADER_LEN: usize = 12;
