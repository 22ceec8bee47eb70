use kerfcraft_core::Point;
use kerfcraft_designer::geometry::kerf_outline;
use proptest::prelude::*;
use std::f64::consts::SQRT_2;

const EPS: f64 = 1e-9;

fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / (dx * dx + dy * dy).sqrt()
}

#[test]
fn test_kerf_corners_diagonal_segment() {
    let p1 = Point::new(1.0, 1.0);
    let p2 = Point::new(4.0, 5.0);
    let outline = kerf_outline(p1, p2, 0.5).unwrap();
    let [p1top, p2top, p1bot, p2bot] = outline.corners();
    assert!((p1top.distance_to(&p1) - 0.5 * SQRT_2).abs() < EPS);
    assert!((p1bot.distance_to(&p1) - 0.5 * SQRT_2).abs() < EPS);
    assert!((p2top.distance_to(&p2) - 0.5 * SQRT_2).abs() < EPS);
    assert!((p2bot.distance_to(&p2) - 0.5 * SQRT_2).abs() < EPS);
}

#[test]
fn test_kerf_caps_join_the_edges() {
    let outline = kerf_outline(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 1.0).unwrap();
    assert!(outline.far_cap.start_point().approx_eq(&outline.top.1, EPS));
    assert!(outline.far_cap.end_point().approx_eq(&outline.bottom.0, EPS));
    assert!(outline.near_cap.start_point().approx_eq(&outline.bottom.1, EPS));
    assert!(outline.near_cap.end_point().approx_eq(&outline.top.0, EPS));
}

proptest! {
    #[test]
    fn kerf_corners_at_k_sqrt2(
        x1 in -100.0f64..100.0,
        y1 in -100.0f64..100.0,
        dx in 0.5f64..50.0,
        dy in -50.0f64..50.0,
        k in 0.01f64..2.0,
    ) {
        let p1 = Point::new(x1, y1);
        let p2 = Point::new(x1 + dx, y1 + dy);
        let outline = kerf_outline(p1, p2, k).unwrap();
        let [p1top, p2top, p1bot, p2bot] = outline.corners();
        let expected = k * SQRT_2;
        prop_assert!((p1top.distance_to(&p1) - expected).abs() < 1e-9);
        prop_assert!((p2top.distance_to(&p2) - expected).abs() < 1e-9);
        prop_assert!((p1bot.distance_to(&p1) - expected).abs() < 1e-9);
        prop_assert!((p2bot.distance_to(&p2) - expected).abs() < 1e-9);
    }

    #[test]
    fn kerf_edges_parallel_and_2k_apart(
        dx in 0.5f64..50.0,
        dy in -50.0f64..50.0,
        k in 0.01f64..2.0,
    ) {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(dx, dy);
        let outline = kerf_outline(p1, p2, k).unwrap();
        let (a, b) = outline.top;
        let (c, d) = outline.bottom;
        // every edge endpoint sits k from the original line
        for p in [a, b, c, d] {
            prop_assert!((line_distance(p, p1, p2) - k).abs() < 1e-9);
        }
        // and the two edges sit 2k apart
        prop_assert!((line_distance(c, a, b) - 2.0 * k).abs() < 1e-9);
        prop_assert!((line_distance(d, a, b) - 2.0 * k).abs() < 1e-9);
    }
}
