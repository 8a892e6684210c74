use async_trait::async_trait;
use ferrous_route_domain::{DomainError, PartialResponse, Question, UpstreamEndpoint};

#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Sends `question` to a single upstream server and returns every message
    /// received before the end of transmission, in arrival order.
    ///
    /// Callers apply their own deadline; implementations need not time out.
    async fn exchange(
        &self,
        endpoint: &UpstreamEndpoint,
        question: &Question,
    ) -> Result<Vec<PartialResponse>, DomainError>;
}
