use kerfcraft_core::constants::CUTOUT_WIDTH;
use kerfcraft_core::{DrawMode, MachineProfile, Point};
use kerfcraft_designer::pattern::{Kerf, Pattern};
use kerfcraft_designer::pcb::{NetId, NetTable, Participation, PcbPattern, EDGE_CUTS, FRONT_COPPER};
use kerfcraft_export::{layer_color, ExportError, StrokeSource, SvgExporter, SvgOptions};
use tempfile::TempDir;

#[test]
fn test_kerfed_line_preview_includes_caps() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Some(Kerf::new(1.0).with_samples(4)),
            DrawMode::Cut,
        )
        .unwrap();
    // two edges plus three chords per cap
    let strokes = pattern.strokes().unwrap();
    assert_eq!(strokes.len(), 2 + 3 + 3);
    let svg = SvgExporter::render(&pattern, &SvgOptions::default()).unwrap();
    assert_eq!(svg.matches("<line ").count(), 8);
    assert!(svg.contains(r#"height="2mm""#));
}

#[test]
fn test_polygon_preview_is_closed() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_rectangle(Point::new(0.0, 0.0), Point::new(2.0, 1.0), DrawMode::Cut)
        .unwrap();
    let strokes = pattern.strokes().unwrap();
    assert_eq!(strokes.len(), 4);
    assert_eq!(strokes[3].to, Point::new(0.0, 0.0));
}

#[test]
fn test_board_preview_styles() {
    let mut board = PcbPattern::new(NetTable::new());
    board
        .add_trace(
            &[Point::new(0.0, 0.0), Point::new(4.0, 0.0)],
            0.5,
            NetId::UNCONNECTED,
            FRONT_COPPER,
            Participation::NONE,
        )
        .unwrap();
    board
        .add_graphic_line(
            &[Point::new(0.0, 1.0), Point::new(4.0, 1.0)],
            EDGE_CUTS,
            Participation::CUT,
        )
        .unwrap();
    let strokes = board.strokes().unwrap();
    assert_eq!(strokes.len(), 2);
    assert_eq!(strokes[0].width, 0.5);
    assert_eq!(strokes[0].color, layer_color(FRONT_COPPER));
    assert_eq!(strokes[1].width, CUTOUT_WIDTH);
    assert_eq!(strokes[1].color, layer_color(EDGE_CUTS));
}

#[test]
fn test_write_file() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_circle(Point::new(0.0, 0.0), 1.0, Some(8), DrawMode::Engrave)
        .unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("circle.svg");
    SvgExporter::write_file(&pattern, &SvgOptions::default(), &path).unwrap();
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert_eq!(svg.matches("<line ").count(), 7);
    assert!(svg.contains(r#"stroke="rgb(255,255,255)""#));
}

#[test]
fn test_non_finite_offsets_are_rejected() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_rectangle(Point::new(0.0, 0.0), Point::new(2.0, 1.0), DrawMode::Cut)
        .unwrap();
    let options = SvgOptions {
        offset_x: f64::INFINITY,
        ..Default::default()
    };
    assert!(matches!(
        SvgExporter::render(&pattern, &options),
        Err(ExportError::InvalidOption { ref name, .. }) if name == "offset_x"
    ));

    let options = SvgOptions {
        offset_y: f64::NAN,
        ..Default::default()
    };
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nan.svg");
    assert!(SvgExporter::write_file(&pattern, &options, &path).is_err());
    assert!(!path.exists());
}
