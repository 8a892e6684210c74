use super::matcher::Matcher;
use crate::ports::RequestHandler;
use crate::response::Response;
use ferrous_route_domain::{DnsRequest, ResponseCode};
use std::sync::Arc;
use tracing::{debug, warn};

/// A matcher and the handler chain it guards.
pub struct Route {
    matcher: Matcher,
    handlers: Vec<Arc<dyn RequestHandler>>,
}

impl Route {
    pub fn new(matcher: Matcher, handlers: Vec<Arc<dyn RequestHandler>>) -> Self {
        Self { matcher, handlers }
    }

    pub fn matches(&self, request: &DnsRequest) -> bool {
        self.matcher.matches(request)
    }
}

/// Ordered routes; the first whose matcher accepts a request handles it.
#[derive(Default)]
pub struct Dispatcher {
    routes: Vec<Route>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Runs the first matching chain until a handler sends the response.
    ///
    /// A handler error ends the chain with SERVFAIL unless the response was
    /// already sent. Returns `false` when no route matched; nothing is sent
    /// in that case.
    pub async fn dispatch(&self, request: &mut DnsRequest, response: &mut Response) -> bool {
        let Some(route) = self.routes.iter().find(|route| route.matches(&*request)) else {
            debug!(id = request.id, client = %request.client, "No route matched; dropping request");
            return false;
        };

        for handler in &route.handlers {
            if let Err(e) = handler.handle(request, response).await {
                warn!(handler = handler.name(), error = %e, id = request.id, "Handler failed");
                if !response.is_sent() {
                    if let Err(e) = response.fail(ResponseCode::ServFail) {
                        warn!(error = %e, "Failed to send SERVFAIL");
                    }
                }
                return true;
            }
            if response.is_sent() {
                return true;
            }
        }

        debug!(id = request.id, "Handler chain finished without sending a response");
        true
    }
}
