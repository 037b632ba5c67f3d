use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use canvas::CanvasGeometry;
use frames::Status;

use super::*;
use crate::export::ExportFormat;

// =============================================================================
// HELPERS
// =============================================================================

#[derive(Default)]
struct RecordingChannel {
    frames: Mutex<Vec<Frame>>,
    closed: AtomicBool,
}

impl RecordingChannel {
    fn sent(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    async fn emit(&self, frame: Frame) -> Result<(), ChannelError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

fn session_with(config: MeetdrawConfig) -> (DrawingSession, Arc<RecordingChannel>) {
    let channel = Arc::new(RecordingChannel::default());
    let session = DrawingSession::new(config, "mina", channel.clone());
    (session, channel)
}

fn session() -> (DrawingSession, Arc<RecordingChannel>) {
    session_with(MeetdrawConfig::default())
}

fn drag(session: &mut DrawingSession, from: (f64, f64), to: (f64, f64)) {
    session.pointer_down(Point::new(from.0, from.1));
    session.pointer_move(Point::new(to.0, to.1));
    session.pointer_up();
}

fn decode(frame: &Frame) -> image::RgbImage {
    let bytes = frame.blob.as_deref().unwrap();
    image::load_from_memory(bytes).unwrap().to_rgb8()
}

fn start_drawing() -> Frame {
    Frame::event(syscall::START_DRAWING)
}

// =============================================================================
// STATE
// =============================================================================

#[test]
fn new_session_starts_blank_in_drawing_stage() {
    let (s, _) = session();
    assert_eq!(s.stage(), Stage::Drawing);
    assert_eq!(s.tool(), ToolState::default());
    assert_eq!(s.display_name(), "mina");
    assert!(s.surface().is_blank());
    assert!(!s.is_drawing());
    assert!(!s.export_in_flight());
}

#[test]
fn tool_setters_apply_to_following_strokes() {
    let (mut s, _) = session();
    s.set_color(Color::Blue);
    s.set_brush_width(BrushWidth::Thin);
    drag(&mut s, (40.0, 40.0), (200.0, 40.0));
    s.set_color(Color::Orange);
    s.set_brush_width(BrushWidth::Thick);
    drag(&mut s, (40.0, 200.0), (200.0, 200.0));

    assert_eq!(s.surface().pixel(100, 30), Some(Color::Blue.rgba()));
    assert_eq!(s.surface().pixel(100, 150), Some(Color::Orange.rgba()));
    // The thin stroke never grew to the thick width.
    assert_ne!(s.surface().pixel(100, 35), Some(Color::Blue.rgba()));
}

#[test]
fn clear_wipes_drawing() {
    let (mut s, _) = session();
    drag(&mut s, (10.0, 10.0), (300.0, 300.0));
    assert!(!s.surface().is_blank());
    assert_eq!(s.clear(), PaintOp::Clear);
    assert!(s.surface().is_blank());
}

// =============================================================================
// INBOUND
// =============================================================================

#[test]
fn start_drawing_frame_returns_drawing_stage() {
    let (mut s, _) = session();
    assert_eq!(s.handle_frame(&start_drawing()), Some(Stage::Drawing));
    assert_eq!(s.stage(), Stage::Drawing);
}

#[test]
fn unrelated_frames_are_ignored() {
    let (mut s, _) = session();
    assert_eq!(s.handle_frame(&Frame::event("chat:message")), None);
    assert_eq!(s.stage(), Stage::Drawing);
}

// =============================================================================
// SUBMIT
// =============================================================================

#[tokio::test]
async fn submit_emits_forward_drawing_with_name_and_image() {
    let (mut s, channel) = session();
    drag(&mut s, (50.0, 50.0), (300.0, 250.0));

    let payload = s.submit().await.unwrap();
    let sent = channel.sent();
    assert_eq!(sent.len(), 1);

    let frame = &sent[0];
    assert_eq!(frame.syscall, syscall::FORWARD_DRAWING);
    assert_eq!(frame.status, Status::Request);
    assert_eq!(frame.data_str("userName"), Some("mina"));
    assert_eq!(frame.data_str("mime"), Some("image/jpeg"));
    assert_eq!(frame.data["width"], 135);
    assert_eq!(frame.data["height"], 120);
    assert_eq!(frame.from.as_deref(), Some("mina"));
    assert!(frame.blob.as_ref().is_some_and(|b| !b.is_empty()));
    assert_eq!(frame.blob.as_deref(), Some(payload.image.bytes.as_slice()));
    assert_eq!(payload.submitter_name, "mina");
    assert_eq!(s.stage(), Stage::Submitted);
    assert!(!s.export_in_flight());
}

#[tokio::test]
async fn red_vertical_line_arrives_downscaled_within_budget() {
    let (mut s, channel) = session();
    s.set_color(Color::Red);
    s.set_brush_width(BrushWidth::Thick);
    drag(&mut s, (100.0, 100.0), (100.0, 160.0));
    s.submit().await.unwrap();

    let frame = &channel.sent()[0];
    let blob = frame.blob.as_deref().unwrap();
    assert!(blob.len() <= 104_857);
    assert_eq!(&blob[..2], &[0xff, 0xd8]);

    let img = decode(frame);
    assert!(img.width() <= 135);
    let px = img.get_pixel(37, 48).0;
    assert!(px[0] > 180 && px[1] < 90 && px[2] < 90, "{px:?}");
    let above = img.get_pixel(37, 20).0;
    assert!(above[0] > 200 && above[1] > 200, "{above:?}");
}

#[tokio::test]
async fn empty_canvas_emits_nothing() {
    let config = MeetdrawConfig {
        geometry: CanvasGeometry { logical_width: 0, logical_height: 0, ..CanvasGeometry::default() },
        ..MeetdrawConfig::default()
    };
    let (mut s, channel) = session_with(config);
    let err = s.submit().await.unwrap_err();
    assert!(matches!(err, SessionError::Export(ExportError::EmptyCanvas)));
    assert!(channel.sent().is_empty());
    assert_eq!(s.stage(), Stage::Drawing);
    assert!(!s.export_in_flight());
}

#[tokio::test]
async fn webp_policy_is_forwarded_in_frame() {
    let mut config = MeetdrawConfig::default();
    config.export.format = ExportFormat::WebP;
    let (mut s, channel) = session_with(config);
    s.submit().await.unwrap();
    assert_eq!(channel.sent()[0].data_str("mime"), Some("image/webp"));
}

#[test]
fn second_submission_is_rejected_while_first_is_pending() {
    let (s, _) = session();
    let first = s.begin_submit().unwrap();
    assert!(s.export_in_flight());
    assert!(matches!(s.begin_submit(), Err(SessionError::ExportInFlight)));

    drop(first);
    assert!(!s.export_in_flight());
    assert!(s.begin_submit().is_ok());
}

#[tokio::test]
async fn drawing_after_begin_submit_is_not_exported() {
    let (mut s, channel) = session();
    let pending = s.begin_submit().unwrap();

    s.set_color(Color::Black);
    s.set_brush_width(BrushWidth::Thick);
    drag(&mut s, (0.0, 160.0), (360.0, 160.0));
    assert!(!s.surface().is_blank());

    let sending = tokio::spawn(pending.send());
    drag(&mut s, (180.0, 0.0), (180.0, 320.0));
    sending.await.unwrap().unwrap();
    s.mark_submitted();

    let img = decode(&channel.sent()[0]);
    for px in img.pixels() {
        assert!(px.0.iter().all(|c| *c > 200), "stroke leaked into export: {px:?}");
    }
    assert_eq!(s.stage(), Stage::Submitted);
}

#[tokio::test]
async fn closed_channel_surfaces_error_and_frees_slot() {
    let (mut s, channel) = session();
    channel.closed.store(true, Ordering::SeqCst);

    let err = s.submit().await.unwrap_err();
    assert!(matches!(err, SessionError::Channel(ChannelError::Closed)));
    assert_eq!(s.stage(), Stage::Drawing);
    assert!(!s.export_in_flight());
}

// =============================================================================
// STAGES
// =============================================================================

#[tokio::test]
async fn can_keep_drawing_and_submit_again() {
    let (mut s, channel) = session();
    drag(&mut s, (10.0, 10.0), (300.0, 10.0));
    s.submit().await.unwrap();
    assert_eq!(s.stage(), Stage::Submitted);

    s.set_color(Color::Red);
    s.set_brush_width(BrushWidth::Thick);
    drag(&mut s, (100.0, 100.0), (100.0, 160.0));
    assert_eq!(s.surface().pixel(75, 90), Some(Color::Red.rgba()));
    s.submit().await.unwrap();

    let sent = channel.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|f| f.syscall == syscall::FORWARD_DRAWING));
    assert_ne!(sent[0].id, sent[1].id);
    let second = decode(&sent[1]);
    let px = second.get_pixel(37, 48).0;
    assert!(px[0] > 180 && px[1] < 90 && px[2] < 90, "{px:?}");
}

#[tokio::test]
async fn stroke_open_across_submit_closes_on_pointer_up() {
    let (mut s, _) = session();
    s.pointer_down(Point::new(10.0, 10.0));
    s.submit().await.unwrap();

    assert_eq!(s.pointer_up(), Some(PaintOp::ClosePath));
    assert!(!s.is_drawing());

    assert_eq!(s.handle_frame(&start_drawing()), Some(Stage::Drawing));
    assert_eq!(s.pointer_move(Point::new(300.0, 300.0)), None);
    assert!(s.surface().is_blank());
}

#[tokio::test]
async fn input_and_clear_follow_the_same_rule_in_every_stage() {
    let (mut s, _) = session();
    s.submit().await.unwrap();
    assert_eq!(s.stage(), Stage::Submitted);

    drag(&mut s, (10.0, 10.0), (200.0, 200.0));
    assert!(!s.surface().is_blank());
    assert_eq!(s.clear(), PaintOp::Clear);
    assert!(s.surface().is_blank());

    assert_eq!(s.handle_frame(&start_drawing()), Some(Stage::Drawing));
    drag(&mut s, (10.0, 10.0), (200.0, 200.0));
    assert!(!s.surface().is_blank());
}

#[tokio::test]
async fn closing_session_leaves_channel_usable() {
    let (s, channel) = session();
    s.close();
    assert!(channel.emit(Frame::event("after-close")).await.is_ok());
    assert_eq!(channel.sent().len(), 1);
}
