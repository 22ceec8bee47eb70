use kerfcraft_core::Point;
use kerfcraft_designer::geometry::{polygon_area, rectangle};
use kerfcraft_designer::pcb::{
    NetTable, NetId, Participation, PcbPattern, BACK_COPPER, EDGE_CUTS, FRONT_COPPER,
};
use kerfcraft_export::merge::primitive_polygon;
use kerfcraft_export::{merge_layers, union_polygons, PcbDxfOptions};

const EPS: f64 = 1e-6;

fn square(x: f64, y: f64, side: f64) -> Vec<Point> {
    rectangle(Point::new(x, y), Point::new(x + side, y + side)).unwrap()
}

fn same_ring(a: &[Point], b: &[Point]) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|p| b.iter().any(|q| p.approx_eq(q, EPS)))
}

#[test]
fn test_disjoint_polygons_come_back_unchanged() {
    let input = vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 2.0)];
    let merged = union_polygons(&input);
    assert_eq!(merged.len(), 2);
    for ring in &input {
        assert!(merged.iter().any(|m| same_ring(m, ring)));
    }
}

#[test]
fn test_overlapping_squares_union_area() {
    let merged = union_polygons(&[square(0.0, 0.0, 1.0), square(0.5, 0.5, 1.0)]);
    assert_eq!(merged.len(), 1);
    assert!((polygon_area(&merged[0]).abs() - 1.75).abs() < EPS);
}

#[test]
fn test_cut_and_etch_sets_are_separate() {
    let mut board = PcbPattern::new(NetTable::new());
    board
        .add_fill_zone_polygon(
            &square(0.0, 0.0, 2.0),
            NetId::UNCONNECTED,
            0.01,
            FRONT_COPPER,
            Participation::ETCH,
        )
        .unwrap();
    board
        .add_fill_zone_polygon(
            &square(1.0, 1.0, 2.0),
            NetId::UNCONNECTED,
            0.01,
            FRONT_COPPER,
            Participation::CUT,
        )
        .unwrap();
    board
        .add_fill_zone_polygon(
            &square(0.0, 0.0, 2.0),
            NetId::UNCONNECTED,
            0.01,
            BACK_COPPER,
            Participation::ETCH,
        )
        .unwrap();

    let options = PcbDxfOptions {
        cut_layers: vec![EDGE_CUTS.to_string(), FRONT_COPPER.to_string()],
        ..Default::default()
    };
    let merged = merge_layers(&board, &options).unwrap();
    // B.Cu is neither a cut nor an etch layer
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].layer, FRONT_COPPER);
    assert_eq!(merged[0].cut.len(), 1);
    assert_eq!(merged[0].etch.len(), 1);
    assert!(same_ring(&merged[0].etch[0], &square(0.0, 0.0, 2.0)));
    assert!(same_ring(&merged[0].cut[0], &square(1.0, 1.0, 2.0)));
}

#[test]
fn test_overlapping_traces_merge_into_one_region() {
    let mut board = PcbPattern::new(NetTable::new());
    for points in [
        [Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        [Point::new(5.0, -5.0), Point::new(5.0, 5.0)],
    ] {
        board
            .add_trace(
                &points,
                1.0,
                NetId::UNCONNECTED,
                FRONT_COPPER,
                Participation::ETCH,
            )
            .unwrap();
    }
    let merged = merge_layers(&board, &PcbDxfOptions::default()).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].etch.len(), 1);
    assert!(merged[0].cut.is_empty());
    // two 10 x 1 ribbons sharing a 1 x 1 crossing
    assert!((polygon_area(&merged[0].etch[0]).abs() - 19.0).abs() < EPS);
}

#[test]
fn test_arcs_sampled_for_merging() {
    let mut board = PcbPattern::new(NetTable::new());
    board
        .add_graphic_arc(
            Point::new(0.0, 0.0),
            1.0,
            0.0,
            std::f64::consts::PI,
            FRONT_COPPER,
            Participation::ETCH,
        )
        .unwrap();
    let primitive = board.primitives().next().unwrap();
    let ring = primitive_polygon(primitive).unwrap();
    assert_eq!(ring.len(), 10);
    assert!(ring.iter().all(|p| (p.distance_to(&Point::new(0.0, 0.0)) - 1.0).abs() < 1e-9));
}
