//! Capture session projection
//!
//! One mutable snapshot of everything the UI needs to render a capture or
//! recognition screen, advanced exclusively through [`reduce`]. Face lists
//! are replaced wholesale on every event (last write wins); no history is
//! kept.

use crate::events::ServerEvent;
use shield_core::{DetectedFace, FinalAuthorization, RecognizedFace};

/// Lifecycle of the channel driving a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    /// Socket not yet established.
    Connecting,
    /// Connected and emitting frames on the cadence.
    Streaming,
    /// Frame emission stopped; follow-up events (training, the final
    /// decision) may still arrive.
    Settling,
    /// The session reached a terminal event or was torn down.
    Closed,
}

/// How a capture session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// The flow ran to completion. For recognition the outcome itself lives
    /// in [`CaptureSession::final_authorization`].
    Completed,
    /// The backend reported an error or the connection was lost.
    Failed,
}

/// Projection of one capture or recognition session.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSession {
    /// Channel lifecycle phase.
    pub phase: ChannelPhase,
    /// Frames emitted so far.
    pub frames_sent: u32,
    /// Faces detected in the most recent enrollment frame.
    pub detected_faces: Vec<DetectedFace>,
    /// Faces matched in the most recent recognition frame.
    pub recognized_faces: Vec<RecognizedFace>,
    /// Latest human-readable status message from the backend.
    pub status: Option<String>,
    /// Enrollment progress, 0 to 100.
    pub progress: u8,
    /// The backend's final recognition decision, once delivered.
    pub final_authorization: Option<FinalAuthorization>,
    /// Backend failure description, when the session failed.
    pub error: Option<String>,
    /// Set once the session reaches a terminal event.
    pub terminal: Option<Terminal>,
}

impl CaptureSession {
    /// Fresh session in the connecting phase.
    pub fn new() -> Self {
        Self {
            phase: ChannelPhase::Connecting,
            frames_sent: 0,
            detected_faces: Vec::new(),
            recognized_faces: Vec::new(),
            status: None,
            progress: 0,
            final_authorization: None,
            error: None,
            terminal: None,
        }
    }

    /// Whether frames should still be emitted.
    pub fn is_streaming(&self) -> bool {
        self.phase == ChannelPhase::Streaming
    }

    /// Whether the session has ended, one way or the other.
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    fn stop_frames(&mut self) {
        if self.phase == ChannelPhase::Streaming {
            self.phase = ChannelPhase::Settling;
        }
    }

    fn close(&mut self, terminal: Terminal) {
        self.terminal = Some(terminal);
        self.phase = ChannelPhase::Closed;
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold one inbound event into the session.
///
/// Every event is handled here and nowhere else, so the match stays
/// exhaustive when the protocol grows.
pub fn reduce(session: &mut CaptureSession, event: &ServerEvent) {
    match event {
        ServerEvent::FrameCaptured {
            faces,
            status,
            progress,
            completed,
        } => {
            if let Some(faces) = faces {
                session.detected_faces = faces.clone();
            }
            if let Some(status) = status {
                session.status = Some(status.clone());
            }
            if let Some(progress) = progress {
                session.progress = (*progress).min(100);
            }
            if *completed {
                // Sample budget reached; the backend no longer wants frames.
                session.stop_frames();
            }
        }
        ServerEvent::CaptureCompleted { status } => {
            session.status = Some(status.clone());
            session.progress = 100;
            session.stop_frames();
        }
        ServerEvent::TrainingStarted { status } => {
            session.status = Some(status.clone());
        }
        ServerEvent::TrainingCompleted { status } => {
            session.status = Some(status.clone());
            session.close(Terminal::Completed);
        }
        ServerEvent::TrainingError { status } => {
            session.status = Some("Training failed.".to_string());
            session.error = Some(status.clone());
            session.close(Terminal::Failed);
        }
        ServerEvent::RecognitionResult { faces, status } => {
            session.recognized_faces = faces.clone();
            if let Some(status) = status {
                session.status = Some(status.clone());
            }
        }
        ServerEvent::FinalAuthorization(auth) => {
            session.final_authorization = Some(auth.clone());
            session.close(Terminal::Completed);
        }
        ServerEvent::Error { message } => {
            session.error = Some(message.clone());
            session.close(Terminal::Failed);
        }
    }
}
