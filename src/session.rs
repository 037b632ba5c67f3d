//! `DrawingSession`: one participant's sketch modal.
//!
//! DESIGN
//! ======
//! The session owns the local UI state (tool, surface, stage) and borrows a
//! channel from its caller. Submitting is split in two so the UI never waits
//! on encoding:
//!
//! - `begin_submit` runs synchronously: it claims the single export slot and
//!   copies the raster. Strokes drawn afterwards do not leak into the export.
//! - `PendingSubmission::send` encodes off-thread and emits the frame. The
//!   slot is released when it completes or is dropped.
//!
//! `submit` chains the two for callers that do not need to keep drawing.

use std::sync::Arc;

use canvas::{BrushWidth, Color, PaintOp, Point, Surface, ToolState};
use frames::{Frame, syscall};
use image::RgbaImage;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

use crate::channel::{Channel, ChannelError};
use crate::config::MeetdrawConfig;
use crate::export::{self, EncodedImage, ExportError, ExportPolicy};
use crate::stage::{Stage, StageEvent};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another submission is still encoding or sending.
    #[error("a drawing is already being submitted")]
    ExportInFlight,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// A drawing ready to leave through the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingPayload {
    pub submitter_name: String,
    pub image: EncodedImage,
}

impl DrawingPayload {
    /// The `forwardDrawing` frame carrying this payload.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        Frame::event(syscall::FORWARD_DRAWING)
            .with_from(self.submitter_name.clone())
            .with_data("userName", self.submitter_name.clone())
            .with_data("mime", self.image.format.mime())
            .with_data("width", self.image.width)
            .with_data("height", self.image.height)
            .with_blob(self.image.bytes.clone())
    }
}

pub struct DrawingSession {
    display_name: String,
    channel: Arc<dyn Channel>,
    policy: ExportPolicy,
    tool: ToolState,
    surface: Surface,
    stage: Stage,
    export_slot: Arc<Semaphore>,
}

impl DrawingSession {
    #[must_use]
    pub fn new(config: MeetdrawConfig, display_name: impl Into<String>, channel: Arc<dyn Channel>) -> Self {
        let display_name = display_name.into();
        info!(name = %display_name, "session: opened");
        Self {
            display_name,
            channel,
            policy: config.export,
            tool: ToolState::default(),
            surface: Surface::new(config.geometry),
            stage: Stage::default(),
            export_slot: Arc::new(Semaphore::new(1)),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn tool(&self) -> ToolState {
        self.tool
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.surface.is_drawing()
    }

    /// Whether a submission currently holds the export slot.
    #[must_use]
    pub fn export_in_flight(&self) -> bool {
        self.export_slot.available_permits() == 0
    }

    // --- Tool ---

    pub fn set_color(&mut self, color: Color) {
        self.tool.set_color(color);
    }

    pub fn set_brush_width(&mut self, width: BrushWidth) {
        self.tool.set_width(width);
    }

    // --- Pointer input (display coordinates) ---
    //
    // Input, clear and submit are never gated on the stage.

    pub fn pointer_down(&mut self, at: Point) -> PaintOp {
        self.surface.pointer_down(at)
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<PaintOp> {
        self.surface.pointer_move(at, &self.tool)
    }

    pub fn pointer_up(&mut self) -> Option<PaintOp> {
        self.surface.pointer_up()
    }

    /// Wipe the canvas back to the background. Cannot be undone.
    pub fn clear(&mut self) -> PaintOp {
        self.surface.clear()
    }

    // --- Inbound ---

    /// React to a frame from the channel. Returns the new stage if it changed
    /// or was reset.
    pub fn handle_frame(&mut self, frame: &Frame) -> Option<Stage> {
        match frame.syscall.as_str() {
            syscall::START_DRAWING => {
                self.stage = self.stage.apply(StageEvent::StartDrawing);
                info!(stage = %self.stage, "session: drawing (re)started");
                Some(self.stage)
            }
            other => {
                debug!(syscall = other, "session: ignoring frame");
                None
            }
        }
    }

    // --- Submit ---

    /// Claim the export slot and copy the raster.
    ///
    /// # Errors
    ///
    /// - [`SessionError::ExportInFlight`] if another submission holds the slot
    /// - [`SessionError::Export`] with [`ExportError::EmptyCanvas`] when there
    ///   is nothing to rasterize; nothing is emitted in that case
    pub fn begin_submit(&self) -> Result<PendingSubmission, SessionError> {
        let permit = Arc::clone(&self.export_slot)
            .try_acquire_owned()
            .map_err(|_| SessionError::ExportInFlight)?;
        let snapshot = export::rasterize(&self.surface)?;
        Ok(PendingSubmission {
            snapshot,
            submitter_name: self.display_name.clone(),
            policy: self.policy.clone(),
            channel: Arc::clone(&self.channel),
            _permit: permit,
        })
    }

    /// Record that a drawing went out. The canvas stays usable.
    pub fn mark_submitted(&mut self) {
        self.stage = self.stage.apply(StageEvent::Submitted);
    }

    /// Encode the current drawing and emit it, then label the stage `Submitted`.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::begin_submit`] or [`PendingSubmission::send`].
    pub async fn submit(&mut self) -> Result<DrawingPayload, SessionError> {
        let payload = self.begin_submit()?.send().await?;
        self.mark_submitted();
        Ok(payload)
    }

    /// End the session. The channel is left connected for its owner.
    pub fn close(self) {
        info!(name = %self.display_name, stage = %self.stage, "session: closed");
    }
}

/// A copied raster waiting to be encoded and emitted.
pub struct PendingSubmission {
    snapshot: RgbaImage,
    submitter_name: String,
    policy: ExportPolicy,
    channel: Arc<dyn Channel>,
    _permit: OwnedSemaphorePermit,
}

impl PendingSubmission {
    /// Encode under the export policy and emit `forwardDrawing`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Export`] if encoding fails, [`SessionError::Channel`]
    /// if the channel is closed.
    pub async fn send(self) -> Result<DrawingPayload, SessionError> {
        let image = export::export(self.snapshot, &self.policy).await?;
        let payload = DrawingPayload { submitter_name: self.submitter_name, image };
        let frame = payload.to_frame();
        let frame_id = frame.id.clone();
        self.channel.emit(frame).await?;
        info!(
            name = %payload.submitter_name,
            %frame_id,
            bytes = payload.image.len(),
            width = payload.image.width,
            height = payload.image.height,
            "session: drawing submitted"
        );
        Ok(payload)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
