use ferrous_route_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, UdpSocket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Answer every query with an A record.
    Answer,
    /// Send an empty TC reply over UDP; answer normally over TCP.
    TruncateUdp,
}

/// A throwaway DNS server on 127.0.0.1 answering over UDP and TCP on one port.
///
/// Names starting with `nx.` get NXDOMAIN.
pub struct FakeUpstream {
    pub addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    names: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    pub async fn start(mode: UpstreamMode, answer: Ipv4Addr) -> Self {
        let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = tcp.local_addr().unwrap();
        let udp = UdpSocket::bind(addr).await.unwrap();

        let upstream = Self {
            addr,
            udp_queries: Arc::new(AtomicUsize::new(0)),
            tcp_queries: Arc::new(AtomicUsize::new(0)),
            names: Arc::new(Mutex::new(Vec::new())),
        };

        let (count, names) = (upstream.udp_queries.clone(), upstream.names.clone());
        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            while let Ok((n, client)) = udp.recv_from(&mut buf).await {
                count.fetch_add(1, Ordering::SeqCst);
                let reply = build_reply(&buf[..n], answer, mode == UpstreamMode::TruncateUdp, &names);
                let _ = udp.send_to(&reply, client).await;
            }
        });

        let (count, names) = (upstream.tcp_queries.clone(), upstream.names.clone());
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = tcp.accept().await {
                let (count, names) = (count.clone(), names.clone());
                tokio::spawn(async move {
                    while let Ok(query) = read_with_length_prefix(&mut stream).await {
                        count.fetch_add(1, Ordering::SeqCst);
                        let reply = build_reply(&query, answer, false, &names);
                        if send_with_length_prefix(&mut stream, &reply).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        upstream
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    /// Question names received, in arrival order, without trailing dots.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

fn build_reply(query: &[u8], answer: Ipv4Addr, truncate: bool, names: &Mutex<Vec<String>>) -> Vec<u8> {
    let (name, question_end) = read_question(query);
    names.lock().unwrap().push(name.clone());

    let nxdomain = !truncate && name.starts_with("nx.");
    let answers: u16 = if truncate || nxdomain { 0 } else { 1 };

    let mut reply = Vec::with_capacity(512);
    reply.extend_from_slice(&query[0..2]);
    reply.push(if truncate { 0x83 } else { 0x81 });
    reply.push(if nxdomain { 0x83 } else { 0x80 });
    reply.extend_from_slice(&[0x00, 0x01]);
    reply.extend_from_slice(&answers.to_be_bytes());
    reply.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    reply.extend_from_slice(&query[12..question_end]);

    if answers == 1 {
        reply.extend_from_slice(&[
            0xc0, 0x0c,
            0x00, 0x01,
            0x00, 0x01,
            0x00, 0x00, 0x00, 0x3c,
            0x00, 0x04,
        ]);
        reply.extend_from_slice(&answer.octets());
    }

    reply
}

/// Reads the single uncompressed question; returns its dotted name and end offset.
pub fn read_question(query: &[u8]) -> (String, usize) {
    let mut labels = Vec::new();
    let mut pos = 12;
    while query[pos] != 0 {
        let len = query[pos] as usize;
        labels.push(String::from_utf8_lossy(&query[pos + 1..pos + 1 + len]).into_owned());
        pos += 1 + len;
    }
    (labels.join("."), pos + 1 + 4)
}
