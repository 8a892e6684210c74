use async_trait::async_trait;
use ferrous_route_application::ports::UpstreamTransport;
use ferrous_route_domain::{
    DomainError, PartialResponse, Question, UpstreamEndpoint,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted behaviour of one upstream for one question name.
#[derive(Clone)]
pub enum Script {
    Reply {
        delay: Duration,
        messages: Vec<PartialResponse>,
    },
    Fail {
        delay: Duration,
    },
    Hang,
    /// Fails at once with the given error.
    Reject(DomainError),
}

impl Script {
    pub fn reply(delay_ms: u64, partial: PartialResponse) -> Self {
        Script::Reply {
            delay: Duration::from_millis(delay_ms),
            messages: vec![partial],
        }
    }

    pub fn fail(delay_ms: u64) -> Self {
        Script::Fail {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

const ANY_NAME: &str = "*";

#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<(SocketAddr, String), Script>>,
    calls: Mutex<Vec<(SocketAddr, String)>>,
    completed: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, server: &UpstreamEndpoint, name: &str, script: Script) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .insert((server.addr, name.to_string()), script);
        self
    }

    /// Script used for any question name without a dedicated entry.
    pub fn on_any(&self, server: &UpstreamEndpoint, script: Script) -> &Self {
        self.on(server, ANY_NAME, script)
    }

    pub fn calls(&self) -> Vec<(SocketAddr, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Exchanges that ran to completion (reply or scripted failure).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn script_for(&self, server: &UpstreamEndpoint, name: &str) -> Option<Script> {
        let scripts = self.scripts.lock().unwrap();
        scripts
            .get(&(server.addr, name.to_string()))
            .or_else(|| scripts.get(&(server.addr, ANY_NAME.to_string())))
            .cloned()
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn exchange(
        &self,
        endpoint: &UpstreamEndpoint,
        question: &Question,
    ) -> Result<Vec<PartialResponse>, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.addr, question.name.clone()));

        match self.script_for(endpoint, &question.name) {
            Some(Script::Reply { delay, messages }) => {
                tokio::time::sleep(delay).await;
                self.completed.fetch_add(1, Ordering::SeqCst);
                Ok(messages)
            }
            Some(Script::Fail { delay }) => {
                tokio::time::sleep(delay).await;
                self.completed.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::TransportError {
                    server: endpoint.to_string(),
                    reason: "connection refused".to_string(),
                })
            }
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Reject(error)) => Err(error),
            None => Err(DomainError::TransportError {
                server: endpoint.to_string(),
                reason: format!("no script for {}", question.name),
            }),
        }
    }
}
