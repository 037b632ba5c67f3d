//! Sketch modal for meeting participants.
//!
//! A participant draws on a small canvas ([`canvas`] crate), then submits the
//! drawing: the raster is downscaled, compressed under a byte budget, and
//! emitted as a `forwardDrawing` frame ([`frames`] crate) on the meeting
//! channel. The channel belongs to the caller; a session only borrows it.
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | `DrawingSession`: tool, surface, stage, submit |
//! | [`export`] | Rasterize → resize → encode under budget |
//! | [`channel`] | `Channel` trait and the WebSocket implementation |
//! | [`stage`] | Modal stage and its transitions |
//! | [`script`] | Stroke scripts for the headless participant |
//! | [`config`] | Environment configuration |

pub mod channel;
pub mod config;
pub mod export;
pub mod script;
pub mod session;
pub mod stage;

pub use channel::{Channel, ChannelError, WsChannel};
pub use config::MeetdrawConfig;
pub use export::{EncodedImage, ExportError, ExportFormat, ExportPolicy};
pub use session::{DrawingPayload, DrawingSession, PendingSubmission, SessionError};
pub use stage::{Stage, StageEvent};
