//! Frame emission
//!
//! Maps capture modes to their emit cadence and turns raw JPEG frames into
//! the outbound events the backend expects. Frames travel as base64 data
//! URLs, matching what a browser canvas would produce.

use crate::events::ClientEvent;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use shield_core::{FaceId, JpegFrame, Username};
use std::time::Duration;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Enrollment frames go out fast to fill the sample budget quickly.
pub const ENROLLMENT_CADENCE: Duration = Duration::from_millis(100);
/// Recognition frames go out slower; each one costs a model lookup.
pub const RECOGNITION_CADENCE: Duration = Duration::from_millis(500);

/// What a capture session is for, and who it is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureMode {
    /// Collect face samples for a new subject.
    Enrollment {
        /// Subject the samples are filed under.
        face_id: FaceId,
    },
    /// Match live frames against the trained model.
    Recognition {
        /// Claimed subject to verify.
        username: Username,
    },
}

impl CaptureMode {
    /// Interval between frame emissions for this mode.
    pub fn cadence(&self) -> Duration {
        match self {
            Self::Enrollment { .. } => ENROLLMENT_CADENCE,
            Self::Recognition { .. } => RECOGNITION_CADENCE,
        }
    }

    /// Wrap one frame in the outbound event for this mode.
    pub fn frame_event(&self, frame: &JpegFrame) -> ClientEvent {
        let image = encode_data_url(frame);
        match self {
            Self::Enrollment { face_id } => ClientEvent::UploadImage {
                image,
                face_id: face_id.clone(),
            },
            Self::Recognition { username } => ClientEvent::RecognizeFace {
                image,
                username: username.clone(),
            },
        }
    }

    /// The claimed subject, for recognition sessions.
    pub fn username(&self) -> Option<&Username> {
        match self {
            Self::Recognition { username } => Some(username),
            Self::Enrollment { .. } => None,
        }
    }
}

/// Encode a JPEG frame as a `data:image/jpeg;base64,` URL.
pub fn encode_data_url(frame: &JpegFrame) -> String {
    format!("{DATA_URL_PREFIX}{}", STANDARD.encode(frame.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_per_mode() {
        let enroll = CaptureMode::Enrollment {
            face_id: FaceId::from("alice"),
        };
        let recognize = CaptureMode::Recognition {
            username: Username::from("alice"),
        };
        assert_eq!(enroll.cadence(), Duration::from_millis(100));
        assert_eq!(recognize.cadence(), Duration::from_millis(500));
    }

    #[test]
    fn test_data_url_encoding() {
        let url = encode_data_url(&JpegFrame(vec![0xFF, 0xD8, 0xFF]));
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_enrollment_frame_event() {
        let mode = CaptureMode::Enrollment {
            face_id: FaceId::from("alice"),
        };
        match mode.frame_event(&JpegFrame(vec![1, 2, 3])) {
            ClientEvent::UploadImage { image, face_id } => {
                assert!(image.starts_with(DATA_URL_PREFIX));
                assert_eq!(face_id, FaceId::from("alice"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_recognition_frame_event() {
        let mode = CaptureMode::Recognition {
            username: Username::from("bob"),
        };
        match mode.frame_event(&JpegFrame(vec![1, 2, 3])) {
            ClientEvent::RecognizeFace { image, username } => {
                assert!(image.starts_with(DATA_URL_PREFIX));
                assert_eq!(username, Username::from("bob"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
