use ::dxf::entities::EntityType;
use ::dxf::Drawing;
use kerfcraft_core::{DrawMode, MachineProfile, Point};
use kerfcraft_designer::pattern::{Kerf, Pattern};
use kerfcraft_designer::pcb::{
    NetClass, NetId, NetTable, Participation, PcbPattern, BACK_COPPER, EDGE_CUTS, FRONT_COPPER,
    FRONT_SILKSCREEN,
};
use kerfcraft_export::{
    DxfExporter, DxfOptions, DxfVersion, ExportError, PcbDxfOptions, DXF_LAYER,
};
use tempfile::TempDir;

const EPS: f64 = 1e-9;

#[derive(Debug, Default, PartialEq)]
struct Tally {
    lines: usize,
    arcs: usize,
    circles: usize,
    polylines: usize,
}

fn tally(drawing: &Drawing) -> Tally {
    let mut t = Tally::default();
    for entity in drawing.entities() {
        assert_eq!(entity.common.layer, DXF_LAYER);
        match entity.specific {
            EntityType::Line(_) => t.lines += 1,
            EntityType::Arc(_) => t.arcs += 1,
            EntityType::Circle(_) => t.circles += 1,
            EntityType::Polyline(_) => t.polylines += 1,
            _ => panic!("unexpected entity {:?}", entity.specific),
        }
    }
    t
}

fn polylines(drawing: &Drawing) -> Vec<Vec<(f64, f64)>> {
    drawing
        .entities()
        .filter_map(|e| match &e.specific {
            EntityType::Polyline(p) => {
                assert!(p.is_closed());
                Some(p.vertices().map(|v| (v.location.x, v.location.y)).collect())
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_rectangle_becomes_one_closed_polyline() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_rectangle(Point::new(0.0, 0.0), Point::new(10.0, 20.0), DrawMode::Cut)
        .unwrap();
    let drawing = DxfExporter::pattern_document(&pattern, &DxfOptions::default()).unwrap();
    assert_eq!(
        tally(&drawing),
        Tally {
            polylines: 1,
            ..Default::default()
        }
    );
    assert_eq!(
        polylines(&drawing),
        vec![vec![(0.0, 0.0), (0.0, 20.0), (10.0, 20.0), (10.0, 0.0)]]
    );
}

#[test]
fn test_kerfed_line_edges_and_caps() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_line(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Some(Kerf::new(1.0)),
            DrawMode::Cut,
        )
        .unwrap();
    let drawing = DxfExporter::pattern_document(&pattern, &DxfOptions::default()).unwrap();
    assert_eq!(
        tally(&drawing),
        Tally {
            lines: 2,
            arcs: 2,
            ..Default::default()
        }
    );

    let mut ys = Vec::new();
    for entity in drawing.entities() {
        match &entity.specific {
            EntityType::Line(l) => {
                assert!((l.p1.y - l.p2.y).abs() < EPS);
                assert!(((l.p2.x - l.p1.x).abs() - 8.0).abs() < EPS);
                ys.push(l.p1.y);
            }
            EntityType::Arc(a) => {
                assert!((a.radius - 1.0).abs() < EPS);
                // clockwise caps come out counter-clockwise with swapped ends
                let start = a.start_angle.round() as i64;
                let end = a.end_angle.round() as i64;
                if (a.center.x - 9.0).abs() < EPS {
                    assert_eq!((start, end), (270, 90));
                } else {
                    assert!((a.center.x - 1.0).abs() < EPS);
                    assert_eq!((start, end), (90, 270));
                }
            }
            _ => unreachable!(),
        }
    }
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((ys[0] + 1.0).abs() < EPS);
    assert!((ys[1] - 1.0).abs() < EPS);
}

#[test]
fn test_full_circle_and_offsets() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_circle(Point::new(1.0, 1.0), 2.0, None, DrawMode::Cut)
        .unwrap();
    pattern
        .add_visual_line(Point::new(0.0, 0.0), Point::new(1.0, 0.0), DrawMode::Engrave)
        .unwrap();
    let options = DxfOptions {
        offset_x: 10.0,
        offset_y: 5.0,
        version: DxfVersion::R2013,
    };
    let drawing = DxfExporter::pattern_document(&pattern, &options).unwrap();
    assert_eq!(
        tally(&drawing),
        Tally {
            circles: 1,
            ..Default::default()
        }
    );
    let circle = drawing
        .entities()
        .find_map(|e| match &e.specific {
            EntityType::Circle(c) => Some(c.clone()),
            _ => None,
        })
        .unwrap();
    assert!((circle.center.x - 11.0).abs() < EPS);
    assert!((circle.center.y - 6.0).abs() < EPS);
    assert!((circle.radius - 2.0).abs() < EPS);
}

fn routing_board() -> PcbPattern {
    let nets = NetTable::from_names(&[("/GND", NetClass::Default)]).unwrap();
    let mut board = PcbPattern::new(nets);
    let gnd = board.nets().require("/GND").unwrap();
    board
        .add_graphic_line(
            &[
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 20.0),
            ],
            EDGE_CUTS,
            Participation::CUT,
        )
        .unwrap();
    board
        .add_fill_zone_rectangle(
            Point::new(1.0, 1.0),
            Point::new(5.0, 5.0),
            gnd,
            0.01,
            FRONT_COPPER,
            Participation::ETCH,
        )
        .unwrap();
    board
        .add_fill_zone_rectangle(
            Point::new(1.0, 1.0),
            Point::new(5.0, 5.0),
            gnd,
            0.01,
            BACK_COPPER,
            Participation::ETCH,
        )
        .unwrap();
    board
        .add_graphic_line(
            &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            FRONT_SILKSCREEN,
            Participation::BOTH,
        )
        .unwrap();
    board
        .add_via(
            Point::new(10.0, 10.0),
            0.8,
            0.4,
            gnd,
            (FRONT_COPPER, BACK_COPPER),
            Participation::BOTH,
        )
        .unwrap();
    board
}

#[test]
fn test_pcb_routing_with_default_options() {
    let board = routing_board();
    let docs = DxfExporter::pcb_documents(&board, &PcbDxfOptions::default()).unwrap();
    // outline lines plus the via drill
    assert_eq!(
        tally(&docs.cut),
        Tally {
            lines: 2,
            circles: 1,
            ..Default::default()
        }
    );
    // F.Cu zone and via pad merged per layer, B.Cu is not an etch layer
    assert_eq!(
        tally(&docs.etch),
        Tally {
            polylines: 2,
            ..Default::default()
        }
    );
}

#[test]
fn test_traces_only_etched_on_request() {
    let mut board = PcbPattern::new(NetTable::new());
    board
        .add_trace(
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            1.0,
            NetId::UNCONNECTED,
            FRONT_COPPER,
            Participation::BOTH,
        )
        .unwrap();
    let mut options = PcbDxfOptions {
        cut_layers: vec![EDGE_CUTS.to_string(), FRONT_COPPER.to_string()],
        merge_layers: Vec::new(),
        ..Default::default()
    };
    let docs = DxfExporter::pcb_documents(&board, &options).unwrap();
    assert_eq!(tally(&docs.cut).lines, 1);
    assert_eq!(tally(&docs.etch), Tally::default());

    options.include_traces_etch = true;
    let docs = DxfExporter::pcb_documents(&board, &options).unwrap();
    assert_eq!(tally(&docs.etch).polylines, 1);
    let ring = &polylines(&docs.etch)[0];
    assert_eq!(ring.len(), 4);
    let near = |x: f64, y: f64| {
        ring.iter()
            .any(|(px, py)| (px - x).abs() < 1e-9 && (py - y).abs() < 1e-9)
    };
    assert!(near(0.0, 0.5));
    assert!(near(10.0, -0.5));
}

#[test]
fn test_pcb_documents_written_to_disk() {
    let board = routing_board();
    let dir = TempDir::new().unwrap();
    let cut = dir.path().join("board.cut.dxf");
    let etch = dir.path().join("board.etch.dxf");
    DxfExporter::write_pcb(&board, &PcbDxfOptions::default(), &cut, &etch).unwrap();

    let reloaded = Drawing::load_file(&cut).unwrap();
    assert_eq!(reloaded.entities().count(), 3);
    let reloaded = Drawing::load_file(&etch).unwrap();
    assert_eq!(reloaded.entities().count(), 2);
}

#[test]
fn test_non_finite_offsets_are_rejected() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_rectangle(Point::new(0.0, 0.0), Point::new(10.0, 20.0), DrawMode::Cut)
        .unwrap();
    let options = DxfOptions {
        offset_x: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        DxfExporter::pattern_document(&pattern, &options),
        Err(ExportError::InvalidOption { ref name, .. }) if name == "offset_x"
    ));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nan.dxf");
    assert!(DxfExporter::write_pattern(&pattern, &options, &path).is_err());
    assert!(!path.exists());

    let options = PcbDxfOptions {
        offset_y: f64::INFINITY,
        ..Default::default()
    };
    assert!(matches!(
        DxfExporter::pcb_documents(&routing_board(), &options),
        Err(ExportError::InvalidOption { ref name, .. }) if name == "offset_y"
    ));
}

#[test]
fn test_offsets_move_polylines_and_arcs() {
    let mut pattern = Pattern::new(MachineProfile::laser_cutter());
    pattern
        .add_rectangle(Point::new(0.0, 0.0), Point::new(10.0, 20.0), DrawMode::Cut)
        .unwrap();
    pattern
        .add_arc(
            Point::new(5.0, 5.0),
            1.0,
            0.0,
            std::f64::consts::PI,
            8,
            DrawMode::Cut,
        )
        .unwrap();
    let options = DxfOptions {
        offset_x: -2.0,
        offset_y: 3.0,
        ..Default::default()
    };
    let drawing = DxfExporter::pattern_document(&pattern, &options).unwrap();
    assert_eq!(
        polylines(&drawing),
        vec![vec![(-2.0, 3.0), (-2.0, 23.0), (8.0, 23.0), (8.0, 3.0)]]
    );
    let arc = drawing
        .entities()
        .find_map(|e| match &e.specific {
            EntityType::Arc(a) => Some(a.clone()),
            _ => None,
        })
        .unwrap();
    assert!((arc.center.x - 3.0).abs() < EPS);
    assert!((arc.center.y - 8.0).abs() < EPS);
    assert_eq!(
        (arc.start_angle.round() as i64, arc.end_angle.round() as i64),
        (0, 180)
    );
}
