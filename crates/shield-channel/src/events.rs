//! Typed channel events
//!
//! Wire format is a tagged JSON envelope, `{"event": <name>, "data": {...}}`,
//! matching the backend's socket event names verbatim. Inbound payload fields
//! are lenient: the backend omits fields freely between revisions, so
//! everything optional defaults instead of failing the whole event.

use serde::{Deserialize, Serialize};
use shield_core::{DetectedFace, FaceId, FinalAuthorization, RecognizedFace, Username};

/// Outbound events emitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// One enrollment frame: a JPEG data URL plus the subject's face id.
    UploadImage {
        /// `data:image/jpeg;base64,`-prefixed frame snapshot.
        image: String,
        /// Subject the backend should file the sample under.
        face_id: FaceId,
    },
    /// One recognition frame.
    RecognizeFace {
        /// `data:image/jpeg;base64,`-prefixed frame snapshot.
        image: String,
        /// Claimed subject to match against.
        username: Username,
    },
    /// Ask for the final decision over the faces recognized so far.
    GetFinalAuthorization {
        /// Last recognized-face list the client observed.
        #[serde(rename = "recognizedFaces")]
        recognized_faces: Vec<RecognizedFace>,
        /// Claimed subject.
        username: Username,
    },
    /// Kick off model training over the captured samples.
    StartTraining,
}

/// Inbound events from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A frame was processed during enrollment.
    FrameCaptured {
        /// Faces detected in the frame; replaces the previous list.
        #[serde(default)]
        faces: Option<Vec<DetectedFace>>,
        /// Human-readable progress message.
        #[serde(default)]
        status: Option<String>,
        /// Enrollment progress, 0–100.
        #[serde(default)]
        progress: Option<u8>,
        /// Set once the backend has captured enough samples.
        #[serde(default)]
        completed: bool,
    },
    /// Enrollment capture finished.
    CaptureCompleted {
        /// Final status message.
        status: String,
    },
    /// Model training began.
    TrainingStarted {
        /// Status message.
        status: String,
    },
    /// Model training finished.
    TrainingCompleted {
        /// Status message.
        status: String,
    },
    /// Model training failed.
    TrainingError {
        /// Backend failure description.
        status: String,
    },
    /// A recognition frame was matched.
    RecognitionResult {
        /// Recognized faces; replaces the previous list.
        #[serde(default)]
        faces: Vec<RecognizedFace>,
        /// Status message.
        #[serde(default)]
        status: Option<String>,
    },
    /// The backend's final recognition decision.
    FinalAuthorization(FinalAuthorization),
    /// Explicit backend error.
    Error {
        /// Failure description.
        message: String,
    },
}

impl ServerEvent {
    /// Wire event name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FrameCaptured { .. } => "frame_captured",
            Self::CaptureCompleted { .. } => "capture_completed",
            Self::TrainingStarted { .. } => "training_started",
            Self::TrainingCompleted { .. } => "training_completed",
            Self::TrainingError { .. } => "training_error",
            Self::RecognitionResult { .. } => "recognition_result",
            Self::FinalAuthorization(_) => "final_authorization",
            Self::Error { .. } => "error",
        }
    }
}
