use crate::ports::RequestHandler;
use crate::response::Response;
use crate::services::UpstreamResolver;
use async_trait::async_trait;
use ferrous_route_domain::{AliasBinding, DnsRequest, DomainError, Pattern, ResponseCode};
use std::sync::Arc;
use tracing::debug;

/// Serves the `fake` zone by resolving the `real` one.
///
/// Question names are rewritten fake to real before proxying, answer owner
/// names real to fake before sending. Authority and additional records are
/// passed through unchanged.
pub struct AliasProxyHandler {
    binding: AliasBinding,
    resolver: Arc<UpstreamResolver>,
}

impl AliasProxyHandler {
    pub fn new(binding: AliasBinding, resolver: Arc<UpstreamResolver>) -> Self {
        Self { binding, resolver }
    }

    pub fn binding(&self) -> &AliasBinding {
        &self.binding
    }

    /// Default-class questions whose name ends with the fake suffix.
    pub fn pattern(&self) -> Pattern {
        Pattern::Regex(self.binding.fake_pattern().clone())
    }
}

#[async_trait]
impl RequestHandler for AliasProxyHandler {
    async fn handle(
        &self,
        request: &mut DnsRequest,
        response: &mut Response,
    ) -> Result<(), DomainError> {
        for question in request.questions.iter_mut() {
            if let Some(real) = self.binding.to_real(&question.name) {
                debug!(fake = %question.name, real = %real, "Alias rewrite");
                question.name = real;
            }
        }

        match self.resolver.proxy_request(request, response).await {
            Ok(()) => {}
            Err(e) if e.is_upstream_failure() => return response.fail(ResponseCode::ServFail),
            Err(e) => return Err(e),
        }

        for record in response.sections.answer.iter_mut() {
            if let Some(fake) = self.binding.to_fake(&record.name) {
                record.name = fake;
            }
        }

        response.send()
    }

    fn name(&self) -> &'static str {
        "alias"
    }
}
