//! Ferrous Route Domain Layer
pub mod alias;
pub mod config;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod normalizer;
pub mod pattern;
pub mod question;
pub mod record_fields;
pub mod response_code;
pub mod upstream;

pub use alias::AliasBinding;
pub use config::{
    AliasConfig, CliOverrides, Config, ConfigError, LoggingConfig, PatternConfig, RouteAction,
    RouteConfig, ServerConfig, UpstreamConfig,
};
pub use dns_record::{PartialResponse, RecordClass, RecordData, RecordSections, RecordType, ResourceRecord};
pub use dns_request::{DnsRequest, TransportProtocol};
pub use errors::DomainError;
pub use normalizer::{finalize, normalize};
pub use pattern::{Pattern, Predicate};
pub use question::Question;
pub use record_fields::{FieldEntry, FieldValue, RecordFields, Scalar};
pub use response_code::ResponseCode;
pub use upstream::{UpstreamEndpoint, UpstreamProtocol, UpstreamTopology};
