use anyhow::Context;
use ferrous_route_application::ports::RequestHandler;
use ferrous_route_application::services::UpstreamResolver;
use ferrous_route_application::use_cases::{NxDomainHandler, RefuseHandler};
use ferrous_route_application::Router;
use ferrous_route_domain::{Config, Pattern, RouteAction};
use ferrous_route_infrastructure::dns::UpstreamClient;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DnsServices {
    pub resolver: Arc<UpstreamResolver>,
    pub router: Arc<Router>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing routing services");

        let resolver = Self::build_resolver(config);
        let router = Self::build_router(config, resolver.clone())?;

        info!(routes = router.route_count(), "Router ready");
        Ok(Self {
            resolver,
            router: Arc::new(router),
        })
    }

    fn build_resolver(config: &Config) -> Arc<UpstreamResolver> {
        if config.upstream.servers.is_empty() {
            warn!("No upstream servers configured; proxied questions will get SERVFAIL");
        }

        Arc::new(UpstreamResolver::new(
            Arc::new(UpstreamClient::new()),
            config.upstream.servers.clone(),
            config.upstream.timeout(),
        ))
    }

    /// Aliases first, then routes in file order, then the fallback catch-all.
    fn build_router(config: &Config, resolver: Arc<UpstreamResolver>) -> anyhow::Result<Router> {
        let mut router = Router::new(resolver);

        for alias in &config.aliases {
            router
                .alias(&alias.fake, &alias.real)
                .with_context(|| format!("alias {} -> {}", alias.fake, alias.real))?;
            info!(fake = %alias.fake, real = %alias.real, "Alias registered");
        }

        for (index, route) in config.routes.iter().enumerate() {
            let pattern = Pattern::try_from(route.pattern.clone())
                .with_context(|| format!("route #{}", index + 1))?;
            let handlers = Self::action_handlers(&router, route.action);
            router
                .hook(pattern, handlers)
                .with_context(|| format!("route #{}", index + 1))?;
        }

        if config.fallback != RouteAction::Drop {
            let handlers = Self::action_handlers(&router, config.fallback);
            router.hook(Pattern::any(), handlers)?;
        }

        Ok(router)
    }

    /// `Drop` gets an empty chain: the route claims the request and sends nothing.
    fn action_handlers(router: &Router, action: RouteAction) -> Vec<Arc<dyn RequestHandler>> {
        match action {
            RouteAction::Proxy => vec![router.proxy_handler()],
            RouteAction::Refuse => vec![Arc::new(RefuseHandler) as Arc<dyn RequestHandler>],
            RouteAction::NxDomain => vec![Arc::new(NxDomainHandler) as Arc<dyn RequestHandler>],
            RouteAction::Drop => Vec::new(),
        }
    }
}
