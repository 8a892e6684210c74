use ferrous_route_domain::ServerConfig;
use ferrous_route_infrastructure::dns::DnsServer;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Binds the configured listeners and serves until `shutdown` fires.
pub async fn start_dns_server(
    config: &ServerConfig,
    server: Arc<DnsServer>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config.listen_address().parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    info!(bind_address = %socket_addr, tcp = config.tcp_enabled, "Starting DNS listeners");

    let mut join_set: JoinSet<io::Result<()>> = JoinSet::new();

    let udp_socket = create_udp_socket(domain, socket_addr)?;
    join_set.spawn(server.clone().serve_udp(udp_socket, shutdown.clone()));

    if config.tcp_enabled {
        let tcp_listener = create_tcp_listener(domain, socket_addr)?;
        join_set.spawn(server.clone().serve_tcp(tcp_listener, shutdown.clone()));
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "DNS listener failed"),
            Err(e) => error!(error = %e, "DNS listener task aborted"),
        }
    }
    Ok(())
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
