mod alias_proxy;
mod proxy_request;
mod static_rcode;

pub use alias_proxy::AliasProxyHandler;
pub use proxy_request::ProxyRequestHandler;
pub use static_rcode::{NxDomainHandler, RefuseHandler};
