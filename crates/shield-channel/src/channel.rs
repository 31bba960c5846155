//! The capture channel
//!
//! One task owns the socket, the camera, and the session projection. The
//! event loop is single-threaded: every frame tick, inbound event, and
//! command is serialized through one `select!`, so the session state never
//! races and a teardown observed at the top of the loop is final. No frame
//! or event is emitted after teardown.

use crate::events::{ClientEvent, ServerEvent};
use crate::session::{reduce, CaptureSession, ChannelPhase, Terminal};
use crate::streamer::CaptureMode;
use async_trait::async_trait;
use shield_core::{FrameSource, ShieldError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

/// Socket-shaped IO for the channel loop.
///
/// [`ChannelTransport`](crate::transport::ChannelTransport) implements this
/// over a websocket; tests drive the loop with a scripted implementation.
#[async_trait]
pub trait ChannelIo: Send {
    /// Emit one outbound event.
    async fn send(&mut self, event: ClientEvent) -> Result<(), ShieldError>;

    /// Next inbound event. `None` means the peer closed the connection.
    async fn next(&mut self) -> Option<Result<ServerEvent, ShieldError>>;

    /// Close the connection.
    async fn close(&mut self);
}

/// Tunables for a capture session.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// How long a recognition session streams before the client asks for the
    /// final decision.
    pub recognition_window: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            recognition_window: Duration::from_secs(5),
        }
    }
}

enum Command {
    StartTraining,
    RequestFinalAuthorization,
}

/// Handle to a running capture session.
///
/// Dropping the handle tears the session down; [`stop`](Self::stop) does the
/// same but waits for the loop to finish and returns the final snapshot.
pub struct CaptureChannel {
    updates: watch::Receiver<CaptureSession>,
    commands: mpsc::Sender<Command>,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CaptureChannel {
    /// Start a capture session over the given IO and camera.
    pub fn spawn<I>(
        io: I,
        frames: Box<dyn FrameSource>,
        mode: CaptureMode,
        config: ChannelConfig,
    ) -> Self
    where
        I: ChannelIo + 'static,
    {
        let (tx, updates) = watch::channel(CaptureSession::new());
        let (commands, command_rx) = mpsc::channel(8);
        let (stop, stop_rx) = watch::channel(false);

        let task = tokio::spawn(run(io, frames, mode, config, tx, command_rx, stop_rx));

        Self {
            updates,
            commands,
            stop,
            task,
        }
    }

    /// Subscribe to session snapshots.
    pub fn subscribe(&self) -> watch::Receiver<CaptureSession> {
        self.updates.clone()
    }

    /// The current session snapshot.
    pub fn snapshot(&self) -> CaptureSession {
        self.updates.borrow().clone()
    }

    /// Ask the backend to train the model over the captured samples.
    pub async fn start_training(&self) -> Result<(), ShieldError> {
        self.commands
            .send(Command::StartTraining)
            .await
            .map_err(|_| ShieldError::channel("capture session already ended"))
    }

    /// Ask for the final decision now instead of waiting out the recognition
    /// window.
    pub async fn request_final_authorization(&self) -> Result<(), ShieldError> {
        self.commands
            .send(Command::RequestFinalAuthorization)
            .await
            .map_err(|_| ShieldError::channel("capture session already ended"))
    }

    /// Tear the session down and wait for the loop to exit.
    pub async fn stop(self) -> CaptureSession {
        // send_replace rather than send: the loop may already have exited.
        self.stop.send_replace(true);
        if let Err(error) = self.task.await {
            warn!(error = %error, "capture task join failed");
        }
        self.updates.borrow().clone()
    }
}

async fn run<I: ChannelIo>(
    mut io: I,
    mut frames: Box<dyn FrameSource>,
    mode: CaptureMode,
    config: ChannelConfig,
    tx: watch::Sender<CaptureSession>,
    mut commands: mpsc::Receiver<Command>,
    mut stop: watch::Receiver<bool>,
) {
    tx.send_modify(|s| s.phase = ChannelPhase::Streaming);

    // No immediate tick: the first frame goes out one cadence after start.
    let mut ticker = interval_at(Instant::now() + mode.cadence(), mode.cadence());

    let window = tokio::time::sleep(config.recognition_window);
    tokio::pin!(window);
    let mut window_armed = matches!(mode, CaptureMode::Recognition { .. });

    loop {
        let streaming = tx.borrow().is_streaming();
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    debug!("capture session torn down");
                    io.close().await;
                    tx.send_modify(|s| s.phase = ChannelPhase::Closed);
                    return;
                }
            }

            _ = ticker.tick(), if streaming => {
                // A teardown signaled while this branch was chosen must win.
                if *stop.borrow() {
                    continue;
                }
                let frame = match frames.next_frame().await {
                    Ok(frame) => frame,
                    Err(error) => {
                        warn!(error = %error, "camera frame failed");
                        fail(&tx, &mut io, "camera unavailable").await;
                        return;
                    }
                };
                if let Err(error) = io.send(mode.frame_event(&frame)).await {
                    warn!(error = %error, "frame send failed");
                    fail(&tx, &mut io, "connection lost").await;
                    return;
                }
                tx.send_modify(|s| s.frames_sent += 1);
            }

            _ = &mut window, if window_armed && streaming => {
                window_armed = false;
                tx.send_modify(|s| {
                    if s.phase == ChannelPhase::Streaming {
                        s.phase = ChannelPhase::Settling;
                    }
                });
                if send_final_request(&tx, &mut io, &mode).await.is_err() {
                    fail(&tx, &mut io, "connection lost").await;
                    return;
                }
            }

            command = commands.recv() => {
                let Some(command) = command else {
                    // All handles dropped; treat as teardown.
                    io.close().await;
                    tx.send_modify(|s| s.phase = ChannelPhase::Closed);
                    return;
                };
                let sent = match command {
                    Command::StartTraining => io.send(ClientEvent::StartTraining).await,
                    Command::RequestFinalAuthorization => {
                        window_armed = false;
                        send_final_request(&tx, &mut io, &mode).await
                    }
                };
                if let Err(error) = sent {
                    warn!(error = %error, "command send failed");
                    fail(&tx, &mut io, "connection lost").await;
                    return;
                }
            }

            inbound = io.next() => {
                match inbound {
                    Some(Ok(event)) => {
                        debug!(event = event.name(), "channel event");
                        tx.send_modify(|s| reduce(s, &event));
                        let terminal = tx.borrow().terminal;
                        if let Some(terminal) = terminal {
                            info!(completed = matches!(terminal, Terminal::Completed), "capture session ended");
                            io.close().await;
                            return;
                        }
                    }
                    // Malformed or unknown payloads are skipped, not fatal.
                    Some(Err(ShieldError::Channel { message })) => {
                        warn!(error = %message, "unreadable channel event, skipping");
                    }
                    Some(Err(error)) => {
                        warn!(error = %error, "channel receive failed");
                        fail(&tx, &mut io, "connection lost").await;
                        return;
                    }
                    None => {
                        warn!("channel closed by peer");
                        fail(&tx, &mut io, "connection closed").await;
                        return;
                    }
                }
            }
        }
    }
}

async fn send_final_request<I: ChannelIo>(
    tx: &watch::Sender<CaptureSession>,
    io: &mut I,
    mode: &CaptureMode,
) -> Result<(), ShieldError> {
    let Some(username) = mode.username() else {
        // Enrollment sessions have no final decision to request.
        return Ok(());
    };
    let recognized_faces = tx.borrow().recognized_faces.clone();
    debug!(faces = recognized_faces.len(), "requesting final authorization");
    io.send(ClientEvent::GetFinalAuthorization {
        recognized_faces,
        username: username.clone(),
    })
    .await
}

async fn fail<I: ChannelIo>(tx: &watch::Sender<CaptureSession>, io: &mut I, message: &str) {
    io.close().await;
    tx.send_modify(|s| {
        s.error = Some(message.to_string());
        s.terminal = Some(Terminal::Failed);
        s.phase = ChannelPhase::Closed;
    });
}
