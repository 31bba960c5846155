//! Per-frame face records
//!
//! Produced by inbound channel events and replaced wholesale on every new
//! event. Nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Bounding box of a face found in an enrollment frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Left edge, pixels.
    pub x: i32,
    /// Top edge, pixels.
    pub y: i32,
    /// Box width, pixels.
    pub width: i32,
    /// Box height, pixels.
    pub height: i32,
}

/// A face matched against the trained model during recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedFace {
    /// Left edge, pixels.
    pub x: i32,
    /// Top edge, pixels.
    pub y: i32,
    /// Box width, pixels.
    pub width: i32,
    /// Box height, pixels.
    pub height: i32,
    /// Name of the matched subject.
    pub name: String,
    /// Match confidence reported by the recognizer.
    pub confidence: f64,
}

/// The backend's final decision for a recognition session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAuthorization {
    /// Decision string, `"Authorized"` on success.
    pub status: String,
    /// Subject the recognizer settled on, when authorized.
    #[serde(rename = "recognizedAs", default)]
    pub recognized_as: Option<String>,
}

impl FinalAuthorization {
    /// Wire value of an authorized decision.
    pub const AUTHORIZED: &'static str = "Authorized";

    /// True when the backend authorized the subject.
    pub fn is_authorized(&self) -> bool {
        self.status == Self::AUTHORIZED
    }

    /// Whether dismissing the result should navigate back home.
    ///
    /// Only an authorized decision navigates; a denial keeps the user on the
    /// recognition screen.
    pub fn should_navigate_home(&self) -> bool {
        self.is_authorized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_authorization_decision() {
        let ok = FinalAuthorization {
            status: "Authorized".to_string(),
            recognized_as: Some("alice".to_string()),
        };
        assert!(ok.is_authorized());
        assert!(ok.should_navigate_home());

        let denied = FinalAuthorization {
            status: "Denied".to_string(),
            recognized_as: None,
        };
        assert!(!denied.is_authorized());
        assert!(!denied.should_navigate_home());
    }

    #[test]
    fn test_recognized_face_decodes_backend_payload() {
        let face: RecognizedFace = serde_json::from_str(
            r#"{"x": 10, "y": 20, "width": 100, "height": 120, "name": "alice", "confidence": 87.5}"#,
        )
        .unwrap();
        assert_eq!(face.name, "alice");
        assert!((face.confidence - 87.5).abs() < f64::EPSILON);
    }
}
