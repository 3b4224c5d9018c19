//! Newline-delimited JSON host protocol on stdin/stdout.
//!
//! The extension side forwards UI requests and platform triggers to us and
//! executes the bridge and platform calls we emit, answering them with
//! `replyTo` lines.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, oneshot};
use tokio_util::sync::CancellationToken;
use wordget_capture::{BridgeError, PageBridge};
use wordget_types::{
    ColorSample, FrameSnapshot, PageReply, PageRequest, Request, Response, TabHandle, TabId,
    Trigger, UiEvent,
};

use crate::events::{handle_request, handle_trigger};
use crate::platform::{Platform, PlatformError};
use crate::state::AppState;

/// How long a bridge or platform call waits for the host's reply
pub const CALL_TIMEOUT: Duration = Duration::from_secs(5);

const NO_RECEIVER: &str = "Receiving end does not exist";

/// Host -> coordinator line
#[derive(Debug, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Inbound {
    Reply { reply_to: u64, reply: Value },
    Request { id: Value, request: Request },
    Trigger { trigger: Trigger, tab: TabHandle },
}

/// Coordinator -> host line
#[derive(Debug, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Outbound {
    Response { id: Value, response: Response },
    Event { event: UiEvent },
    Call { call_id: u64, call: HostCall },
}

/// Work the host performs on our behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCall {
    SendMessage { tab_id: TabId, message: PageRequest },
    InjectAgent { tab_id: TabId },
    FrameSnapshots { tab_id: TabId },
    SampleColors { tab_id: TabId },
    OpenSidePanel { window_id: i64 },
    SetBadge { tab_id: TabId, text: String },
    ClearBadge { tab_id: TabId },
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Host did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Host connection closed")]
    Closed,

    #[error("{0}")]
    Remote(String),

    #[error("Invalid reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Correlates outgoing host calls with their replies
pub struct HostRelay {
    out_tx: AsyncSender<Outbound>,
    pending: Mutex<HashMap<u64, oneshot::Sender<Value>>>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl HostRelay {
    pub fn new(out_tx: AsyncSender<Outbound>, timeout: Duration) -> Self {
        Self {
            out_tx,
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            timeout,
        }
    }

    /// Emit `call` and wait for its reply. A reply carrying an `error` string fails the call.
    pub async fn call(&self, call: HostCall) -> Result<Value, RelayError> {
        let call_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            // callers that gave up before their reply came
            pending.retain(|_, waiting| !waiting.is_closed());
            pending.insert(call_id, tx);
        }

        if self.out_tx.send(Outbound::Call { call_id, call }).await.is_err() {
            self.pending.lock().await.remove(&call_id);
            return Err(RelayError::Closed);
        }

        let reply = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => return Err(RelayError::Closed),
            Err(_) => {
                self.pending.lock().await.remove(&call_id);
                return Err(RelayError::Timeout(self.timeout));
            }
        };

        if let Some(message) = reply.get("error").and_then(Value::as_str) {
            return Err(RelayError::Remote(message.to_string()));
        }

        Ok(reply)
    }

    pub async fn resolve(&self, call_id: u64, reply: Value) {
        match self.pending.lock().await.remove(&call_id) {
            Some(tx) => {
                let _ = tx.send(reply);
            }
            None => tracing::debug!("Reply to unknown or expired call {}", call_id),
        }
    }

    /// Fail every call still waiting
    pub async fn close(&self) {
        let mut pending = self.pending.lock().await;
        if !pending.is_empty() {
            tracing::debug!("Failing {} pending host calls", pending.len());
        }
        pending.clear();
    }

    #[cfg(test)]
    pub(crate) async fn pending_calls(&self) -> usize {
        self.pending.lock().await.len()
    }
}

fn bridge_error(tab_id: TabId, error: RelayError) -> BridgeError {
    match error {
        RelayError::Timeout(_) | RelayError::Closed => BridgeError::Unreachable(tab_id),
        RelayError::Remote(message) if message.contains(NO_RECEIVER) => {
            BridgeError::NoReceiver(tab_id)
        }
        RelayError::Remote(message) => BridgeError::Script(message),
        RelayError::Decode(e) => BridgeError::Script(e.to_string()),
    }
}

impl From<RelayError> for PlatformError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::Timeout(_) => PlatformError::Timeout,
            RelayError::Closed => PlatformError::Closed,
            other => PlatformError::Failed(other.to_string()),
        }
    }
}

#[async_trait]
impl PageBridge for HostRelay {
    async fn send_message(
        &self,
        tab: &TabHandle,
        request: PageRequest,
    ) -> Result<PageReply, BridgeError> {
        let call = HostCall::SendMessage {
            tab_id: tab.id,
            message: request,
        };
        let reply = self.call(call).await.map_err(|e| bridge_error(tab.id, e))?;
        serde_json::from_value(reply).map_err(|e| bridge_error(tab.id, e.into()))
    }

    async fn inject_agent(&self, tab: &TabHandle) -> Result<(), BridgeError> {
        self.call(HostCall::InjectAgent { tab_id: tab.id })
            .await
            .map_err(|e| bridge_error(tab.id, e))?;
        Ok(())
    }

    async fn frame_snapshots(&self, tab: &TabHandle) -> Result<Vec<FrameSnapshot>, BridgeError> {
        let reply = self
            .call(HostCall::FrameSnapshots { tab_id: tab.id })
            .await
            .map_err(|e| bridge_error(tab.id, e))?;
        serde_json::from_value(reply).map_err(|e| bridge_error(tab.id, e.into()))
    }

    async fn sample_colors(&self, tab: &TabHandle) -> Result<ColorSample, BridgeError> {
        let reply = self
            .call(HostCall::SampleColors { tab_id: tab.id })
            .await
            .map_err(|e| bridge_error(tab.id, e))?;
        serde_json::from_value(reply).map_err(|e| bridge_error(tab.id, e.into()))
    }
}

#[async_trait]
impl Platform for HostRelay {
    async fn open_side_panel(&self, window_id: i64) -> Result<(), PlatformError> {
        self.call(HostCall::OpenSidePanel { window_id }).await?;
        Ok(())
    }

    async fn set_badge(&self, tab_id: TabId, text: &str) -> Result<(), PlatformError> {
        self.call(HostCall::SetBadge {
            tab_id,
            text: text.to_string(),
        })
        .await?;
        Ok(())
    }

    async fn clear_badge(&self, tab_id: TabId) -> Result<(), PlatformError> {
        self.call(HostCall::ClearBadge { tab_id }).await?;
        Ok(())
    }
}

/// Dispatch host lines until the input ends or `cancel` fires
pub async fn read_loop<R>(
    reader: R,
    state: Arc<AppState>,
    relay: Arc<HostRelay>,
    out_tx: AsyncSender<Outbound>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::info!("Host input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Inbound>(&line) {
            Ok(Inbound::Reply { reply_to, reply }) => relay.resolve(reply_to, reply).await,
            Ok(Inbound::Request { id, request }) => {
                let state = state.clone();
                let out_tx = out_tx.clone();
                tokio::spawn(async move {
                    let response = handle_request(state, request).await;
                    if let Err(e) = out_tx.send(Outbound::Response { id, response }).await {
                        tracing::warn!("Failed to queue response: {}", e);
                    }
                });
            }
            Ok(Inbound::Trigger { trigger, tab }) => {
                tokio::spawn(handle_trigger(state.clone(), trigger, tab));
            }
            Err(e) => tracing::warn!("Ignoring malformed host line: {}", e),
        }
    }

    relay.close().await;
    Ok(())
}

/// Serialize outbound messages, one per line
pub async fn write_loop<W>(
    mut writer: W,
    out_rx: AsyncReceiver<Outbound>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => break,
            message = out_rx.recv() => match message {
                Ok(message) => message,
                Err(_) => break,
            },
        };

        let mut line = serde_json::to_vec(&message)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Forward UI broadcasts to the host
pub async fn forward_events(
    ui_rx: AsyncReceiver<UiEvent>,
    out_tx: AsyncSender<Outbound>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        if out_tx.send(Outbound::Event { event }).await.is_err() {
            tracing::warn!("Outbound channel closed, dropping UI events");
            break;
        }
    }

    Ok(())
}
