use super::*;
use crate::consts::BACKGROUND;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn tool(color: Color, width: BrushWidth) -> ToolState {
    ToolState::new(color, width)
}

/// Press at `from`, drag to `to`, release. Display coordinates.
fn stroke(surface: &mut Surface, from: (f64, f64), to: (f64, f64), tool: &ToolState) {
    surface.pointer_down(Point::new(from.0, from.1));
    surface.pointer_move(Point::new(to.0, to.1), tool);
    surface.pointer_up();
}

// =============================================================
// Creation
// =============================================================

#[test]
fn new_surface_is_background_filled() {
    let s = Surface::default();
    assert_eq!(s.pixels().dimensions(), (270, 240));
    assert!(s.is_blank());
    assert_eq!(s.pixel(0, 0), Some(BACKGROUND));
    assert_eq!(s.pixel(269, 239), Some(BACKGROUND));
    assert_eq!(s.pixel(270, 0), None);
}

#[test]
fn new_surface_is_idle() {
    let s = Surface::default();
    assert!(!s.is_drawing());
    assert_eq!(s.input(), InputState::Idle);
}

// =============================================================
// Pointer handlers
// =============================================================

#[test]
fn pointer_down_begins_path_at_scaled_point() {
    let mut s = Surface::default();
    let op = s.pointer_down(Point::new(100.0, 40.0));
    assert_eq!(op, PaintOp::BeginPath { at: Point::new(75.0, 30.0) });
    assert!(s.is_drawing());
}

#[test]
fn click_without_move_leaves_no_mark() {
    let mut s = Surface::default();
    s.pointer_down(Point::new(100.0, 100.0));
    assert_eq!(s.pointer_up(), Some(PaintOp::ClosePath));
    assert!(s.is_blank());
    assert!(!s.is_drawing());
}

#[test]
fn move_without_press_is_ignored() {
    let mut s = Surface::default();
    assert_eq!(s.pointer_move(Point::new(10.0, 10.0), &ToolState::default()), None);
    assert!(s.is_blank());
}

#[test]
fn move_after_release_is_ignored() {
    let mut s = Surface::default();
    let t = ToolState::default();
    stroke(&mut s, (10.0, 10.0), (20.0, 10.0), &t);
    let before = s.snapshot();
    assert_eq!(s.pointer_move(Point::new(200.0, 200.0), &t), None);
    assert_eq!(s.pixels(), &before);
}

#[test]
fn release_without_press_returns_none() {
    let mut s = Surface::default();
    assert_eq!(s.pointer_up(), None);
}

#[test]
fn move_reports_segment_in_raster_space() {
    let mut s = Surface::default();
    let t = tool(Color::Green, BrushWidth::Thin);
    s.pointer_down(Point::new(40.0, 40.0));
    let op = s.pointer_move(Point::new(80.0, 40.0), &t);
    assert_eq!(
        op,
        Some(PaintOp::LineTo {
            from: Point::new(30.0, 30.0),
            to: Point::new(60.0, 30.0),
            color: Color::Green,
            width: BrushWidth::Thin,
        })
    );
}

#[test]
fn consecutive_moves_chain_segments() {
    let mut s = Surface::default();
    let t = ToolState::default();
    s.pointer_down(Point::new(40.0, 40.0));
    s.pointer_move(Point::new(80.0, 40.0), &t);
    let op = s.pointer_move(Point::new(80.0, 80.0), &t);
    assert!(matches!(op, Some(PaintOp::LineTo { from, .. }) if from == Point::new(60.0, 30.0)));
    assert!(matches!(s.input(), InputState::Drawing { segments: 2, origin, .. } if origin == Point::new(30.0, 30.0)));
}

#[test]
fn vertical_red_stroke_lands_at_scaled_coordinates() {
    let mut s = Surface::default();
    let t = tool(Color::Red, BrushWidth::Thick);
    stroke(&mut s, (100.0, 100.0), (100.0, 160.0), &t);

    // Display (100,100)-(100,160) is raster (75,75)-(75,120).
    for y in [75, 90, 105, 119] {
        assert_eq!(s.pixel(75, y), Some(RED), "y = {y}");
    }
    // Width 12 spans x in 69..81 on the shaft.
    assert_eq!(s.pixel(69, 100), Some(RED));
    assert_eq!(s.pixel(80, 100), Some(RED));
    assert_eq!(s.pixel(67, 100), Some(BACKGROUND));
    assert_eq!(s.pixel(82, 100), Some(BACKGROUND));
    // Nothing far above or below the stroke.
    assert_eq!(s.pixel(75, 60), Some(BACKGROUND));
    assert_eq!(s.pixel(75, 135), Some(BACKGROUND));
}

// =============================================================
// Tool changes
// =============================================================

#[test]
fn color_change_affects_only_later_strokes() {
    let mut s = Surface::default();
    let mut t = tool(Color::Red, BrushWidth::Medium);
    stroke(&mut s, (40.0, 40.0), (120.0, 40.0), &t);
    t.set_color(Color::Blue);
    stroke(&mut s, (40.0, 200.0), (120.0, 200.0), &t);

    assert_eq!(s.pixel(60, 30), Some(RED));
    assert_eq!(s.pixel(60, 150), Some(BLUE));
}

#[test]
fn color_change_mid_stroke_keeps_earlier_segments() {
    let mut s = Surface::default();
    let mut t = tool(Color::Red, BrushWidth::Medium);
    s.pointer_down(Point::new(40.0, 40.0));
    s.pointer_move(Point::new(120.0, 40.0), &t);
    t.set_color(Color::Blue);
    s.pointer_move(Point::new(120.0, 200.0), &t);
    s.pointer_up();

    assert_eq!(s.pixel(50, 30), Some(RED));
    assert_eq!(s.pixel(90, 120), Some(BLUE));
}

#[test]
fn width_change_affects_only_later_strokes() {
    let mut s = Surface::default();
    let mut t = tool(Color::Black, BrushWidth::Thin);
    stroke(&mut s, (40.0, 40.0), (200.0, 40.0), &t);
    t.set_width(BrushWidth::Thick);
    stroke(&mut s, (40.0, 200.0), (200.0, 200.0), &t);

    // Thin line at y = 30: radius 2.5 keeps row 34 clear.
    assert_eq!(s.pixel(100, 34), Some(BACKGROUND));
    assert_eq!(s.pixel(100, 30), Some(Color::Black.rgba()));
    // Thick line at y = 150: radius 6 reaches row 155.
    assert_eq!(s.pixel(100, 155), Some(Color::Black.rgba()));
}

// =============================================================
// Clear and snapshot
// =============================================================

#[test]
fn clear_restores_uniform_background() {
    let mut s = Surface::default();
    for c in Color::ALL {
        stroke(&mut s, (0.0, 0.0), (360.0, 320.0), &tool(c, BrushWidth::Thick));
    }
    assert!(!s.is_blank());
    assert_eq!(s.clear(), PaintOp::Clear);
    assert!(s.is_blank());
}

#[test]
fn clear_ends_open_path() {
    let mut s = Surface::default();
    s.pointer_down(Point::new(10.0, 10.0));
    s.clear();
    assert!(!s.is_drawing());
    assert_eq!(s.pointer_move(Point::new(50.0, 50.0), &ToolState::default()), None);
    assert!(s.is_blank());
}

#[test]
fn snapshot_is_detached_from_later_drawing() {
    let mut s = Surface::default();
    let snap = s.snapshot();
    stroke(&mut s, (10.0, 10.0), (300.0, 300.0), &ToolState::default());
    assert!(snap.pixels().all(|p| p.0 == BACKGROUND));
    assert!(!s.is_blank());
}

#[test]
fn zero_sized_surface_accepts_input_without_painting() {
    let g = CanvasGeometry { logical_width: 0, logical_height: 0, ..CanvasGeometry::default() };
    let mut s = Surface::new(g);
    stroke(&mut s, (10.0, 10.0), (20.0, 20.0), &ToolState::default());
    assert_eq!(s.pixels().dimensions(), (0, 0));
}
