/*!
 * Asynchronous transport for provider exchanges.
 *
 * Adapters build `WireRequest`s; the transport executes them. Sessions never
 * await a transport directly: they start a `PendingExchange`, which runs the
 * request on a spawned task, and poll it non-blockingly from their tick.
 * Dropping a pending exchange aborts the task, so an abandoned session can
 * never leak an in-flight request.
 */

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::errors::ProviderError;
use crate::providers::{RequestBody, WireRequest};

/// Executes built provider requests
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Execute a request and return the raw response bytes
    ///
    /// Backend-level failures with structured bodies are returned as `Ok`
    /// bytes for the adapter to parse; only wire-level failures map to
    /// `ProviderError::Transport`.
    async fn execute(&self, request: WireRequest) -> Result<Bytes, ProviderError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    /// HTTP client, built once with the configured timeout
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: WireRequest) -> Result<Bytes, ProviderError> {
        let mut builder = self.client.post(&request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match &request.body {
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("Request failed: {}", e)))?;

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read response: {}", e)))
    }
}

/// Outcome of polling a pending exchange
#[derive(Debug)]
pub enum ExchangePoll {
    /// Still waiting on the transport
    Pending,
    /// The exchange completed; carries the transport result
    Finished(Result<Bytes, ProviderError>),
}

/// A single in-flight request, polled from the session tick
pub struct PendingExchange {
    /// Completion channel from the spawned task
    receiver: oneshot::Receiver<Result<Bytes, ProviderError>>,
    /// Task handle kept for abort-on-drop
    handle: JoinHandle<()>,
}

impl PendingExchange {
    /// Start executing a request on a spawned task
    pub fn start(transport: Arc<dyn Transport>, request: WireRequest) -> Self {
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = transport.execute(request).await;
            // Receiver may be gone if the session was destroyed mid-flight
            let _ = sender.send(result);
        });
        Self { receiver, handle }
    }

    /// Poll for completion without blocking
    pub fn poll(&mut self) -> ExchangePoll {
        match self.receiver.try_recv() {
            Ok(result) => ExchangePoll::Finished(result),
            Err(oneshot::error::TryRecvError::Empty) => ExchangePoll::Pending,
            Err(oneshot::error::TryRecvError::Closed) => ExchangePoll::Finished(Err(
                ProviderError::Transport("Exchange task dropped its result".to_string()),
            )),
        }
    }

    /// Abort the underlying task
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for PendingExchange {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
