#![allow(dead_code)]

mod mock_transport;

pub use mock_transport::{MockTransport, Script};

use ferrous_route_application::services::UpstreamResolver;
use ferrous_route_application::{Response, SentResponse};
use ferrous_route_domain::{
    DnsRequest, PartialResponse, Question, RecordData, RecordSections, RecordType,
    ResourceRecord, ResponseCode, TransportProtocol, UpstreamEndpoint, UpstreamTopology,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

pub const TIMEOUT: Duration = Duration::from_millis(5000);

pub fn server(n: u8) -> UpstreamEndpoint {
    UpstreamEndpoint::udp(SocketAddr::from((Ipv4Addr::new(10, 0, 0, n), 53)))
}

pub fn leaf(n: u8) -> UpstreamTopology {
    UpstreamTopology::Server(server(n))
}

pub fn group(children: Vec<UpstreamTopology>) -> UpstreamTopology {
    UpstreamTopology::Group(children)
}

pub fn a_record(name: &str, ip: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(name, 1, 1, 300, RecordData::new(ip.to_vec()))
}

pub fn answer(records: Vec<ResourceRecord>) -> PartialResponse {
    PartialResponse::new(
        ResponseCode::NoError,
        RecordSections {
            answer: records,
            ..RecordSections::default()
        },
    )
}

pub fn request(names: &[&str]) -> DnsRequest {
    DnsRequest::new(
        4242,
        names
            .iter()
            .map(|name| Question::new(*name, RecordType::A))
            .collect(),
        "192.168.1.100:53000".parse().unwrap(),
        TransportProtocol::Udp,
    )
}

pub fn resolver(transport: Arc<MockTransport>, topology: UpstreamTopology) -> Arc<UpstreamResolver> {
    Arc::new(UpstreamResolver::new(transport, topology, TIMEOUT))
}

pub fn response_for(request: &DnsRequest) -> (Response, oneshot::Receiver<SentResponse>) {
    Response::channel(request)
}

pub fn answer_names(sections: &RecordSections) -> Vec<String> {
    sections.answer.iter().map(|r| r.name.clone()).collect()
}
