use super::merger::merge;
use crate::ports::UpstreamTransport;
use crate::response::Response;
use ferrous_route_domain::{
    DnsRequest, DomainError, PartialResponse, Question, UpstreamEndpoint, UpstreamTopology,
};
use futures::future::{join_all, BoxFuture};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Resolves questions against an upstream topology.
///
/// A leaf is queried once and must reply within the timeout. A group races
/// all of its children and yields the first success; the remaining branches
/// are dropped at that point. A group fails only when every child failed.
pub struct UpstreamResolver {
    transport: Arc<dyn UpstreamTransport>,
    topology: UpstreamTopology,
    timeout: Duration,
}

impl UpstreamResolver {
    pub fn new(
        transport: Arc<dyn UpstreamTransport>,
        topology: UpstreamTopology,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            topology,
            timeout,
        }
    }

    pub fn topology(&self) -> &UpstreamTopology {
        &self.topology
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `question` against `node` and its subtree.
    pub fn resolve<'a>(
        &'a self,
        question: &'a Question,
        node: &'a UpstreamTopology,
    ) -> BoxFuture<'a, Result<PartialResponse, DomainError>> {
        match node {
            UpstreamTopology::Server(endpoint) => self.resolve_leaf(question, endpoint).boxed(),
            UpstreamTopology::Group(children) => self.race(question, children).boxed(),
        }
    }

    async fn resolve_leaf(
        &self,
        question: &Question,
        endpoint: &UpstreamEndpoint,
    ) -> Result<PartialResponse, DomainError> {
        let messages = match timeout(self.timeout, self.transport.exchange(endpoint, question)).await
        {
            Ok(result) => result?,
            Err(_) => {
                debug!(server = %endpoint, domain = %question.name, "Upstream timed out");
                return Err(DomainError::TransportTimeout {
                    server: endpoint.to_string(),
                });
            }
        };

        if messages.is_empty() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} closed without replying",
                endpoint
            )));
        }

        let mut partial = PartialResponse::default();
        for message in &messages {
            partial.absorb_rcode(message.rcode);
        }
        merge(&mut partial.sections, [messages.as_slice()]);

        debug!(
            server = %endpoint,
            domain = %question.name,
            rcode = %partial.rcode,
            answers = partial.sections.answer.len(),
            "Upstream replied"
        );
        Ok(partial)
    }

    async fn race(
        &self,
        question: &Question,
        children: &[UpstreamTopology],
    ) -> Result<PartialResponse, DomainError> {
        let mut pending: FuturesUnordered<_> = children
            .iter()
            .map(|child| self.resolve(question, child))
            .collect();
        let mut errors = Vec::with_capacity(children.len());

        while let Some(result) = pending.next().await {
            match result {
                Ok(partial) => return Ok(partial),
                Err(e) => {
                    debug!(error = %e, domain = %question.name, "Upstream branch failed");
                    errors.push(e);
                }
            }
        }

        Err(DomainError::AllUpstreamsFailed { errors })
    }

    /// Resolves `question` against the configured topology.
    pub async fn lookup(&self, question: &Question) -> Result<PartialResponse, DomainError> {
        if self.topology.is_empty() {
            return Err(DomainError::NoUpstreamServers);
        }
        self.resolve(question, &self.topology).await
    }

    /// Resolves `question` and appends the result to an existing response.
    pub async fn lookup_into(
        &self,
        question: &Question,
        response: &mut Response,
    ) -> Result<(), DomainError> {
        let partial = self.lookup(question).await?;
        response.absorb_rcode(&partial);
        merge(&mut response.sections, [&partial]);
        Ok(())
    }

    /// Resolves every question of `request` concurrently and merges the
    /// results into `response` in question order, whatever order they
    /// completed in. Fails without touching `response` if any question fails.
    pub async fn proxy_request(
        &self,
        request: &DnsRequest,
        response: &mut Response,
    ) -> Result<(), DomainError> {
        let results = join_all(request.questions.iter().map(|q| self.lookup(q))).await;

        let partials = match results.into_iter().collect::<Result<Vec<_>, _>>() {
            Ok(partials) => partials,
            Err(e) => {
                warn!(error = %e, id = request.id, client = %request.client, "Upstream resolution failed");
                return Err(e);
            }
        };

        for partial in &partials {
            response.absorb_rcode(partial);
        }
        merge(&mut response.sections, [&partials]);
        Ok(())
    }
}
