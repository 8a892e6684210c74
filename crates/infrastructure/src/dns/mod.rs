pub mod codec;
pub mod server;
pub mod transport;
pub mod upstream_client;

pub use server::{DnsServer, ListenerObserver, TracingObserver};
pub use upstream_client::UpstreamClient;
