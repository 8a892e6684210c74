use crate::ports::RequestHandler;
use crate::response::Response;
use crate::services::UpstreamResolver;
use async_trait::async_trait;
use ferrous_route_domain::{DnsRequest, DomainError, ResponseCode};
use std::sync::Arc;

/// Resolves every question upstream and sends the merged response.
/// Upstream failures are answered with SERVFAIL; any other error is returned
/// to the dispatcher.
pub struct ProxyRequestHandler {
    resolver: Arc<UpstreamResolver>,
}

impl ProxyRequestHandler {
    pub fn new(resolver: Arc<UpstreamResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl RequestHandler for ProxyRequestHandler {
    async fn handle(
        &self,
        request: &mut DnsRequest,
        response: &mut Response,
    ) -> Result<(), DomainError> {
        match self.resolver.proxy_request(request, response).await {
            Ok(()) => response.send(),
            Err(e) if e.is_upstream_failure() => response.fail(ResponseCode::ServFail),
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}
