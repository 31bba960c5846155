//! Scripted channel IO

use async_trait::async_trait;
use shield_channel::{ChannelIo, ClientEvent, ServerEvent};
use shield_core::ShieldError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Create a scripted channel endpoint and the harness that drives it.
///
/// The [`ScriptedIo`] half goes into the capture channel; the
/// [`IoHarness`] half stays with the test to inject inbound events and
/// observe everything the client sent. Dropping the harness's event sender
/// looks to the client like the peer closing the connection.
pub fn scripted_io() -> (ScriptedIo, IoHarness) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));

    (
        ScriptedIo {
            inbound: event_rx,
            sent: sent_tx,
            closed: Arc::clone(&closed),
        },
        IoHarness {
            events: event_tx,
            sent: sent_rx,
            closed,
        },
    )
}

/// Test-side [`ChannelIo`] implementation.
pub struct ScriptedIo {
    inbound: mpsc::UnboundedReceiver<Result<ServerEvent, ShieldError>>,
    sent: mpsc::UnboundedSender<ClientEvent>,
    closed: Arc<AtomicBool>,
}

/// The test's handle on a [`ScriptedIo`].
pub struct IoHarness {
    /// Inject inbound events; drop to simulate the peer closing.
    pub events: mpsc::UnboundedSender<Result<ServerEvent, ShieldError>>,
    /// Everything the client sent, in order.
    pub sent: mpsc::UnboundedReceiver<ClientEvent>,
    closed: Arc<AtomicBool>,
}

impl IoHarness {
    /// Inject one inbound event.
    pub fn push(&self, event: ServerEvent) {
        let _ = self.events.send(Ok(event));
    }

    /// Whether the client closed its end.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Drain everything sent so far without waiting.
    pub fn drain_sent(&mut self) -> Vec<ClientEvent> {
        let mut sent = Vec::new();
        while let Ok(event) = self.sent.try_recv() {
            sent.push(event);
        }
        sent
    }
}

#[async_trait]
impl ChannelIo for ScriptedIo {
    async fn send(&mut self, event: ClientEvent) -> Result<(), ShieldError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ShieldError::channel("io closed"));
        }
        self.sent
            .send(event)
            .map_err(|_| ShieldError::channel("harness dropped"))
    }

    async fn next(&mut self) -> Option<Result<ServerEvent, ShieldError>> {
        self.inbound.recv().await
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
