use crate::response::Response;
use async_trait::async_trait;
use ferrous_route_domain::{DnsRequest, DomainError};

#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handles a matched request. A handler that resolves the request must
    /// call `response.send()` exactly once; one that does not lets the next
    /// handler in the chain run.
    async fn handle(
        &self,
        request: &mut DnsRequest,
        response: &mut Response,
    ) -> Result<(), DomainError>;

    fn name(&self) -> &'static str;
}
