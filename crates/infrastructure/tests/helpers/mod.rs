#![allow(dead_code)]

mod fake_upstream;
mod recording_observer;

pub use fake_upstream::{read_question, FakeUpstream, UpstreamMode};
pub use recording_observer::RecordingObserver;

use ferrous_route_application::services::UpstreamResolver;
use ferrous_route_domain::{UpstreamEndpoint, UpstreamTopology};
use ferrous_route_infrastructure::dns::UpstreamClient;
use std::sync::Arc;
use std::time::Duration;

pub fn client_resolver(topology: UpstreamTopology, timeout_ms: u64) -> Arc<UpstreamResolver> {
    Arc::new(UpstreamResolver::new(
        Arc::new(UpstreamClient::new()),
        topology,
        Duration::from_millis(timeout_ms),
    ))
}

pub fn udp_leaf(upstream: &FakeUpstream) -> UpstreamTopology {
    UpstreamTopology::Server(UpstreamEndpoint::udp(upstream.addr))
}
