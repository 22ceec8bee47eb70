use kerfcraft_core::{DrawMode, MachineProfile, Point, Rgb};
use kerfcraft_designer::pattern::{Kerf, Pattern, Shape};

#[test]
fn test_kerfed_square_outline() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(20.0, 20.0),
        Point::new(0.0, 20.0),
        Point::new(0.0, 0.0),
    ];
    pattern
        .add_lines(&corners, Some(Kerf::new(0.1).with_samples(6)), DrawMode::Cut)
        .unwrap();
    assert_eq!(pattern.len(), 16);
    let arcs = pattern
        .primitives()
        .iter()
        .filter(|p| matches!(p.shape, Shape::Arc { samples: 6, .. }))
        .count();
    assert_eq!(arcs, 8);
    assert!(pattern.primitives().iter().all(|p| p.style.color == Rgb::RED));
}

#[test]
fn test_mode_selects_style() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_circle(Point::new(5.0, 5.0), 2.0, Some(12), DrawMode::Raster)
        .unwrap();
    let style = pattern.primitives()[0].style;
    assert_eq!(style.mode, DrawMode::Raster);
    assert_eq!(style.line_width, 1.0);
}

#[test]
fn test_failed_call_records_nothing() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    let bad = Point::new(f64::NAN, 0.0);
    assert!(pattern
        .add_line(bad, Point::new(1.0, 1.0), None, DrawMode::Cut)
        .is_err());
    assert!(pattern
        .add_arc(Point::new(0.0, 0.0), 1.0, 0.0, 1.0, 1, DrawMode::Cut)
        .is_err());
    assert!(pattern
        .add_polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], DrawMode::Cut)
        .is_err());
    assert!(pattern.is_empty());
}
