//! Capture/recognition channel
//!
//! Bidirectional event channel to the face-detection backend. The client
//! streams JPEG frames at a fixed cadence (100 ms for enrollment, 500 ms for
//! recognition) and reduces inbound events into a UI-facing projection
//! through a single reducer, so event handling stays exhaustive and testable
//! without a live socket.
//!
//! Lifecycle: `Connecting → Streaming → Settling → Closed`. `Settling` is
//! the stretch after frame emission stops (sample budget reached, or the
//! recognition window ran out) while follow-up events such as training
//! progress or the final decision are still arriving; the session records
//! how it ended in a separate `Terminal` marker once it closes. Tearing the
//! channel down stops emission synchronously, and nothing is emitted
//! afterwards.

pub mod channel;
pub mod events;
pub mod reconnect;
pub mod session;
pub mod streamer;
pub mod transport;

pub use channel::{CaptureChannel, ChannelConfig, ChannelIo};
pub use events::{ClientEvent, ServerEvent};
pub use reconnect::ReconnectConfig;
pub use session::{reduce, CaptureSession, ChannelPhase, Terminal};
pub use streamer::CaptureMode;
pub use transport::{ChannelTransport, TransportConfig};
