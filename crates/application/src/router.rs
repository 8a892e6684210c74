use crate::ports::RequestHandler;
use crate::response::Response;
use crate::services::{Dispatcher, Matcher, Route, UpstreamResolver};
use crate::use_cases::{AliasProxyHandler, ProxyRequestHandler};
use ferrous_route_domain::{AliasBinding, DnsRequest, DomainError, Pattern};
use std::sync::Arc;
use tracing::debug;

/// Registration surface for routes and aliases, and the entry point
/// listeners hand requests to.
pub struct Router {
    dispatcher: Dispatcher,
    resolver: Arc<UpstreamResolver>,
}

impl Router {
    pub fn new(resolver: Arc<UpstreamResolver>) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            resolver,
        }
    }

    pub fn resolver(&self) -> &Arc<UpstreamResolver> {
        &self.resolver
    }

    pub fn route_count(&self) -> usize {
        self.dispatcher.route_count()
    }

    /// Compiles `pattern` and appends a route running `handlers` in order.
    pub fn hook(
        &mut self,
        pattern: Pattern,
        handlers: Vec<Arc<dyn RequestHandler>>,
    ) -> Result<(), DomainError> {
        let matcher = Matcher::compile(pattern)?;
        debug!(handlers = handlers.len(), "Route registered");
        self.dispatcher.register(Route::new(matcher, handlers));
        Ok(())
    }

    /// Registers an alias proxy answering for names under `fake` with data from `real`.
    pub fn alias(&mut self, fake: &str, real: &str) -> Result<(), DomainError> {
        let handler = AliasProxyHandler::new(AliasBinding::new(fake, real)?, self.resolver.clone());
        let pattern = handler.pattern();
        let handler: Arc<dyn RequestHandler> = Arc::new(handler);
        self.hook(pattern, vec![handler])
    }

    /// Handler that proxies every question to the configured upstreams.
    pub fn proxy_handler(&self) -> Arc<dyn RequestHandler> {
        Arc::new(ProxyRequestHandler::new(self.resolver.clone()))
    }

    /// Dispatches to the first matching route. Returns `false` if none matched.
    pub async fn handle(&self, request: &mut DnsRequest, response: &mut Response) -> bool {
        self.dispatcher.dispatch(request, response).await
    }
}
