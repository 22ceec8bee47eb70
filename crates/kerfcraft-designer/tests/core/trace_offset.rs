use kerfcraft_core::Point;
use kerfcraft_designer::geometry::{offset_trace, open_ring, polygon_area};
use proptest::prelude::*;

#[test]
fn test_offset_trace_needs_two_points() {
    assert!(offset_trace(&[Point::new(0.0, 0.0)], 1.0, false).is_err());
    assert!(offset_trace(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], -1.0, false).is_err());
}

#[test]
fn test_round_caps_enclose_more_area() {
    let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    let flat = polygon_area(&offset_trace(&pts, 2.0, false).unwrap()).abs();
    let round = polygon_area(&offset_trace(&pts, 2.0, true).unwrap()).abs();
    assert!((flat - 20.0).abs() < 1e-9);
    assert!(round > flat);
    assert!(round < 20.0 + std::f64::consts::PI);
}

proptest! {
    #[test]
    fn straight_trace_is_l_by_w_rectangle(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        angle in -3.1f64..3.1,
        length in 0.5f64..40.0,
        width in 0.05f64..5.0,
    ) {
        let p1 = Point::new(x, y);
        let p2 = p1.polar(length, angle);
        let outline = offset_trace(&[p1, p2], width, false).unwrap();
        let ring = open_ring(&outline);
        prop_assert_eq!(ring.len(), 4);
        prop_assert!((ring[0].distance_to(&ring[1]) - length).abs() < 1e-9);
        prop_assert!((ring[1].distance_to(&ring[2]) - width).abs() < 1e-9);
        prop_assert!((ring[2].distance_to(&ring[3]) - length).abs() < 1e-9);
        prop_assert!((ring[3].distance_to(&ring[0]) - width).abs() < 1e-9);
        prop_assert!((polygon_area(ring).abs() - length * width).abs() < 1e-6);
    }
}

#[test]
fn test_round_caps_keep_the_ring_simple() {
    use kerfcraft_designer::validate::find_self_intersection;
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(15.0, 5.0),
    ];
    let outline = offset_trace(&pts, 1.0, true).unwrap();
    assert!(find_self_intersection(&outline).is_none());
}
