//! UDP and TCP listeners feeding inbound queries to the router.

use super::codec::{
    encode_error, encode_response, parse_request, MAX_TCP_MESSAGE_SIZE, MAX_UDP_PAYLOAD,
};
use super::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use ferrous_route_application::{Response, Router};
use ferrous_route_domain::{DnsRequest, ResponseCode, TransportProtocol};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::watch;
use tracing::{debug, info, warn};

const UDP_RECV_BUFFER: usize = 4096;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Receives listener lifecycle events.
pub trait ListenerObserver: Send + Sync {
    fn listening(&self, protocol: TransportProtocol, addr: SocketAddr);

    fn closed(&self, protocol: TransportProtocol, addr: SocketAddr);

    fn transport_error(
        &self,
        protocol: TransportProtocol,
        peer: Option<SocketAddr>,
        error: &dyn fmt::Display,
    );

    fn request(&self, request: &DnsRequest);
}

/// Logs listener events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ListenerObserver for TracingObserver {
    fn listening(&self, protocol: TransportProtocol, addr: SocketAddr) {
        info!(protocol = %protocol, address = %addr, "DNS listener ready");
    }

    fn closed(&self, protocol: TransportProtocol, addr: SocketAddr) {
        info!(protocol = %protocol, address = %addr, "DNS listener closed");
    }

    fn transport_error(
        &self,
        protocol: TransportProtocol,
        peer: Option<SocketAddr>,
        error: &dyn fmt::Display,
    ) {
        match peer {
            Some(peer) => warn!(protocol = %protocol, client = %peer, error = %error, "Transport error"),
            None => warn!(protocol = %protocol, error = %error, "Transport error"),
        }
    }

    fn request(&self, request: &DnsRequest) {
        match request.questions.first() {
            Some(question) => debug!(
                id = request.id,
                client = %request.client,
                protocol = %request.protocol,
                question = %question,
                questions = request.questions.len(),
                "DNS query received"
            ),
            None => debug!(id = request.id, client = %request.client, "DNS query without questions"),
        }
    }
}

pub struct DnsServer {
    router: Arc<Router>,
    observer: Arc<dyn ListenerObserver>,
}

impl DnsServer {
    pub fn new(router: Arc<Router>, observer: Arc<dyn ListenerObserver>) -> Self {
        Self { router, observer }
    }

    /// Parses, routes and encodes one query. `None` means nothing is sent back.
    pub async fn handle_packet(
        &self,
        packet: &[u8],
        client: SocketAddr,
        protocol: TransportProtocol,
    ) -> Option<Vec<u8>> {
        let parsed = match parse_request(packet) {
            Ok(parsed) => parsed,
            Err(malformed) => {
                self.observer
                    .transport_error(protocol, Some(client), &malformed.reason);
                let id = malformed.id?;
                return self.encode_error_reply(
                    id,
                    malformed.recursion_desired,
                    ResponseCode::FormErr,
                    client,
                    protocol,
                );
            }
        };

        if parsed.opcode != 0 {
            return self.encode_error_reply(
                parsed.id,
                parsed.recursion_desired,
                ResponseCode::NotImp,
                client,
                protocol,
            );
        }

        let mut request = DnsRequest::new(parsed.id, parsed.questions, client, protocol);
        request.recursion_desired = parsed.recursion_desired;
        self.observer.request(&request);

        let (mut response, receiver) = Response::channel(&request);
        self.router.handle(&mut request, &mut response).await;
        drop(response);

        let sent = receiver.await.ok()?;
        let max_size = match protocol {
            TransportProtocol::Udp => MAX_UDP_PAYLOAD,
            TransportProtocol::Tcp => MAX_TCP_MESSAGE_SIZE,
        };

        match encode_response(&sent, &parsed.queries, max_size) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.observer.transport_error(protocol, Some(client), &e);
                self.encode_error_reply(
                    sent.id,
                    sent.recursion_desired,
                    ResponseCode::ServFail,
                    client,
                    protocol,
                )
            }
        }
    }

    fn encode_error_reply(
        &self,
        id: u16,
        recursion_desired: bool,
        rcode: ResponseCode,
        client: SocketAddr,
        protocol: TransportProtocol,
    ) -> Option<Vec<u8>> {
        match encode_error(id, recursion_desired, rcode) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.observer.transport_error(protocol, Some(client), &e);
                None
            }
        }
    }

    /// Serves UDP queries until `shutdown` changes or its sender is dropped.
    pub async fn serve_udp(
        self: Arc<Self>,
        socket: UdpSocket,
        mut shutdown: watch::Receiver<bool>,
    ) -> io::Result<()> {
        let local_addr = socket.local_addr()?;
        let socket = Arc::new(socket);
        self.observer.listening(TransportProtocol::Udp, local_addr);

        let mut recv_buf = vec![0u8; UDP_RECV_BUFFER];
        loop {
            let (n, client) = tokio::select! {
                _ = shutdown.changed() => break,
                received = socket.recv_from(&mut recv_buf) => match received {
                    Ok(received) => received,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.observer.transport_error(TransportProtocol::Udp, None, &e);
                        continue;
                    }
                },
            };

            let server = self.clone();
            let socket = socket.clone();
            let packet = recv_buf[..n].to_vec();
            tokio::spawn(async move {
                if let Some(reply) = server
                    .handle_packet(&packet, client, TransportProtocol::Udp)
                    .await
                {
                    if let Err(e) = socket.send_to(&reply, client).await {
                        server
                            .observer
                            .transport_error(TransportProtocol::Udp, Some(client), &e);
                    }
                }
            });
        }

        self.observer.closed(TransportProtocol::Udp, local_addr);
        Ok(())
    }

    /// Accepts TCP connections until `shutdown` changes or its sender is dropped.
    pub async fn serve_tcp(
        self: Arc<Self>,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> io::Result<()> {
        let local_addr = listener.local_addr()?;
        self.observer.listening(TransportProtocol::Tcp, local_addr);

        loop {
            let (stream, client) = tokio::select! {
                _ = shutdown.changed() => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        self.observer.transport_error(TransportProtocol::Tcp, None, &e);
                        continue;
                    }
                },
            };

            let server = self.clone();
            tokio::spawn(async move {
                server.serve_tcp_connection(stream, client).await;
            });
        }

        self.observer.closed(TransportProtocol::Tcp, local_addr);
        Ok(())
    }

    async fn serve_tcp_connection(&self, mut stream: TcpStream, client: SocketAddr) {
        loop {
            let packet =
                match tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream))
                    .await
                {
                    Err(_) => break,
                    Ok(Ok(packet)) => packet,
                    Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                    Ok(Err(e)) => {
                        self.observer
                            .transport_error(TransportProtocol::Tcp, Some(client), &e);
                        break;
                    }
                };

            let Some(reply) = self
                .handle_packet(&packet, client, TransportProtocol::Tcp)
                .await
            else {
                continue;
            };

            if let Err(e) = send_with_length_prefix(&mut stream, &reply).await {
                self.observer
                    .transport_error(TransportProtocol::Tcp, Some(client), &e);
                break;
            }
        }
        debug!(client = %client, "TCP connection closed");
    }
}
