use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Unknown {field} symbol: {value}")]
    UnknownSymbol { field: String, value: String },

    #[error("Illegal multivalue field: {field}")]
    IllegalMultivalue { field: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid upstream server: {0}")]
    InvalidUpstream(String),

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    TransportError { server: String, reason: String },

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("No upstream servers configured")]
    NoUpstreamServers,

    #[error("All {} upstream branches failed", .errors.len())]
    AllUpstreamsFailed { errors: Vec<DomainError> },

    #[error("Response already sent")]
    ResponseAlreadySent,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Upstream failures that a handler reports as SERVFAIL instead of propagating.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. }
                | DomainError::TransportError { .. }
                | DomainError::InvalidDnsResponse(_)
                | DomainError::NoUpstreamServers
                | DomainError::AllUpstreamsFailed { .. }
        )
    }
}
