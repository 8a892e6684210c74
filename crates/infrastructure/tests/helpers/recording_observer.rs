use ferrous_route_domain::{DnsRequest, TransportProtocol};
use ferrous_route_infrastructure::dns::ListenerObserver;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Mutex;

/// Keeps every listener event as a short string, e.g. `"listening udp"`.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ListenerObserver for RecordingObserver {
    fn listening(&self, protocol: TransportProtocol, _addr: SocketAddr) {
        self.push(format!("listening {}", protocol));
    }

    fn closed(&self, protocol: TransportProtocol, _addr: SocketAddr) {
        self.push(format!("closed {}", protocol));
    }

    fn transport_error(
        &self,
        protocol: TransportProtocol,
        _peer: Option<SocketAddr>,
        error: &dyn fmt::Display,
    ) {
        self.push(format!("error {} {}", protocol, error));
    }

    fn request(&self, request: &DnsRequest) {
        let names: Vec<&str> = request.questions.iter().map(|q| q.name.as_str()).collect();
        self.push(format!("request {} {}", request.protocol, names.join(",")));
    }
}
