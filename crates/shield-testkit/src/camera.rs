//! Scripted camera

use async_trait::async_trait;
use shield_core::{FrameSource, JpegFrame, ShieldError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// [`FrameSource`] that yields the same frame forever and counts grabs.
///
/// The counter is shared so a test can keep a handle after the source moves
/// into the capture task.
pub struct ScriptedFrameSource {
    frame: JpegFrame,
    grabs: Arc<AtomicUsize>,
    fail_after: Option<usize>,
}

impl ScriptedFrameSource {
    /// Endless source of one fixed frame.
    pub fn steady() -> Self {
        Self {
            frame: JpegFrame(vec![0xFF, 0xD8, 0xFF, 0xD9]),
            grabs: Arc::new(AtomicUsize::new(0)),
            fail_after: None,
        }
    }

    /// Source that fails with a device error after `n` successful grabs.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::steady()
        }
    }

    /// Shared grab counter.
    pub fn grabs(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.grabs)
    }
}

#[async_trait]
impl FrameSource for ScriptedFrameSource {
    async fn next_frame(&mut self) -> Result<JpegFrame, ShieldError> {
        let grabbed = self.grabs.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if grabbed >= limit {
                return Err(ShieldError::transport("camera stopped"));
            }
        }
        Ok(self.frame.clone())
    }
}
