mod request_handler;
mod upstream_transport;

pub use request_handler::RequestHandler;
pub use upstream_transport::UpstreamTransport;
