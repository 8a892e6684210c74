use crate::ports::RequestHandler;
use crate::response::Response;
use async_trait::async_trait;
use ferrous_route_domain::{DnsRequest, DomainError, ResponseCode};

/// Answers every request with REFUSED.
pub struct RefuseHandler;

#[async_trait]
impl RequestHandler for RefuseHandler {
    async fn handle(
        &self,
        _request: &mut DnsRequest,
        response: &mut Response,
    ) -> Result<(), DomainError> {
        response.fail(ResponseCode::Refused)
    }

    fn name(&self) -> &'static str {
        "refuse"
    }
}

/// Answers every request with NXDOMAIN.
pub struct NxDomainHandler;

#[async_trait]
impl RequestHandler for NxDomainHandler {
    async fn handle(
        &self,
        _request: &mut DnsRequest,
        response: &mut Response,
    ) -> Result<(), DomainError> {
        response.fail(ResponseCode::NXDomain)
    }

    fn name(&self) -> &'static str {
        "nxdomain"
    }
}
