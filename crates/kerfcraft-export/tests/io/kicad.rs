use kerfcraft_core::Point;
use kerfcraft_designer::pcb::{
    FootprintKind, NetClass, NetId, NetTable, Participation, PcbPattern, BACK_COPPER, EDGE_CUTS,
    FRONT_COPPER, FRONT_SILKSCREEN,
};
use kerfcraft_export::{BoardCounts, ExportError, KicadExporter, KicadOptions};
use std::f64::consts::FRAC_PI_2;
use tempfile::TempDir;

fn board() -> PcbPattern {
    let nets = NetTable::from_names(&[
        ("/GND", NetClass::Default),
        ("/HV1", NetClass::Power),
    ])
    .unwrap();
    PcbPattern::new(nets)
}

fn render(board: &PcbPattern) -> String {
    KicadExporter::render(board, &KicadOptions::default()).unwrap()
}

#[test]
fn test_header_net_table_and_classes() {
    let text = render(&board());
    assert!(text.starts_with("(kicad_pcb (version 20171130) (host pcbnew \"(5.1.10)-1\")\n"));
    assert!(text.contains("  (net 0 \"\")\n  (net 1 \"/GND\")\n  (net 2 \"/HV1\")\n"));
    assert!(text.contains("    (nets 3)\n"));
    assert!(text.contains("(44 Edge.Cuts user)"));

    let default_class = text.find("(net_class Default").unwrap();
    let power_class = text.find("(net_class Power").unwrap();
    let gnd = text.find("(add_net \"/GND\")").unwrap();
    let hv = text.find("(add_net \"/HV1\")").unwrap();
    assert!(default_class < gnd && gnd < power_class && power_class < hv);
    assert!(text.contains("    (trace_width 0.5)\n"));
    assert!(text.trim_end().ends_with(')'));
}

#[test]
fn test_trace_segments_with_offset() {
    let mut b = board();
    let gnd = b.nets().require("/GND").unwrap();
    b.add_trace(
        &[
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
        ],
        0.25,
        gnd,
        FRONT_COPPER,
        Participation::NONE,
    )
    .unwrap();
    let options = KicadOptions {
        offset_x: 10.0,
        offset_y: 20.0,
        ..Default::default()
    };
    let text = KicadExporter::render(&b, &options).unwrap();
    assert_eq!(text.matches("(segment ").count(), 2);
    assert!(text.contains(
        "  (segment (start 10 20) (end 15 20) (width 0.25) (layer F.Cu) (net 1))\n"
    ));
    assert!(text.contains(
        "  (segment (start 15 20) (end 15 25) (width 0.25) (layer F.Cu) (net 1))\n"
    ));
    assert!(text.contains("    (tracks 2)\n"));
}

#[test]
fn test_zone_record() {
    let mut b = board();
    let hv = b.nets().require("/HV1").unwrap();
    b.add_fill_zone_rectangle(
        Point::new(0.0, 0.0),
        Point::new(2.0, 1.0),
        hv,
        0.01,
        BACK_COPPER,
        Participation::ETCH,
    )
    .unwrap();
    let text = render(&b);
    assert!(text.contains(
        "  (zone (net 2) (net_name \"/HV1\") (layer B.Cu) (tstamp 0) (hatch edge 0.508)\n"
    ));
    assert!(text.contains("    (min_thickness 0.01)\n"));
    assert!(text.contains("        (xy 0 0) (xy 0 1) (xy 2 1) (xy 2 0)\n"));
    assert!(text.contains("    (zones 1)\n"));
}

#[test]
fn test_graphic_records() {
    let mut b = board();
    b.add_graphic_line(
        &[Point::new(0.0, 0.0), Point::new(3.0, 0.0)],
        EDGE_CUTS,
        Participation::CUT,
    )
    .unwrap();
    b.add_graphic_arc(
        Point::new(0.0, 0.0),
        2.0,
        0.0,
        FRAC_PI_2,
        EDGE_CUTS,
        Participation::CUT,
    )
    .unwrap();
    b.add_graphic_polygon(
        &[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ],
        0.1,
        FRONT_SILKSCREEN,
        Participation::NONE,
    )
    .unwrap();
    b.add_text("hi", Point::new(1.0, 2.0), FRAC_PI_2, 0.5, 0.125, FRONT_SILKSCREEN)
        .unwrap();
    let text = render(&b);
    assert!(text.contains("  (gr_line (start 0 0) (end 3 0) (layer Edge.Cuts) (width 0.05))\n"));
    assert!(text.contains(
        "  (gr_arc (start 0 0) (end 2 0) (angle 90) (layer Edge.Cuts) (width 0.05))\n"
    ));
    assert!(text.contains(
        "  (gr_poly (pts (xy 0 0) (xy 1 0) (xy 1 1)) (layer F.SilkS) (width 0.1))\n"
    ));
    assert!(text.contains("  (gr_text \"hi\" (at 1 2 90) (layer F.SilkS)\n"));
    assert!(text.contains("    (effects (font (size 0.5 0.5) (thickness 0.125)))\n"));
    assert!(text.contains("    (drawings 4)\n"));
}

#[test]
fn test_synthesized_circles_are_not_drawn() {
    let mut b = board();
    let gnd = b.nets().require("/GND").unwrap();
    b.add_m2_drill(Point::new(5.0, 5.0), true, Participation::BOTH)
        .unwrap();
    b.add_via(
        Point::new(3.0, 3.0),
        0.8,
        0.4,
        gnd,
        (FRONT_COPPER, BACK_COPPER),
        Participation::BOTH,
    )
    .unwrap();
    let text = render(&b);
    assert!(!text.contains("gr_arc"));
    assert!(text.contains("  (via (at 3 3) (size 0.8) (drill 0.4) (layers F.Cu B.Cu) (net 1))\n"));
    assert!(text.contains("  (module MountingHole:MountingHole_2.2mm_M2_Pad (layer F.Cu)"));
    assert!(text.contains("(pad \"1\" thru_hole circle (at 0 0) (size 3.8 3.8) (drill 2.2)"));
    assert_eq!(
        BoardCounts::of(&b),
        BoardCounts {
            drawings: 0,
            tracks: 1,
            zones: 0,
            modules: 1,
            nets: 3,
        }
    );
}

#[test]
fn test_component_module_from_pad_table() {
    let mut b = board();
    let gnd = b.nets().require("/GND").unwrap();
    b.add_component(
        FootprintKind::Resistor1206,
        Point::new(10.0, 10.0),
        90.0,
        "R1",
        Some("10k"),
        &[gnd, NetId::UNCONNECTED],
    )
    .unwrap();
    let text = render(&b);
    assert!(text.contains("  (module Resistor_SMD:R_1206_3216Metric (layer F.Cu) (tedit 0) (tstamp 0)\n"));
    assert!(text.contains("    (at 10 10 90)\n"));
    assert!(text.contains("    (fp_text reference \"R1\" (at 0 -1.82 90) (layer F.SilkS)\n"));
    assert!(text.contains("    (fp_text value \"10k\" (at 0 1.82 90) (layer F.Fab)\n"));
    assert!(text.contains(
        "    (pad \"1\" smd rect (at -1.55 0 90) (size 1.2 1.8) (layers F.Cu F.Paste F.Mask) (net 1 \"/GND\"))\n"
    ));
    assert!(text.contains(
        "    (pad \"2\" smd rect (at 1.55 0 90) (size 1.2 1.8) (layers F.Cu F.Paste F.Mask))\n"
    ));
}

#[test]
fn test_pin_header_module() {
    let mut b = board();
    let gnd = b.nets().require("/GND").unwrap();
    let hv = b.nets().require("/HV1").unwrap();
    b.add_pin_header(
        Point::new(0.0, 0.0),
        2,
        1,
        2.54,
        &[gnd, hv],
        "J1",
        Some(Point::new(0.0, -3.0)),
        Participation::CUT,
    )
    .unwrap();
    let text = render(&b);
    assert!(text.contains("(module Connector_PinHeader_2.54mm:PinHeader_2x01_P2.54mm_Vertical"));
    assert!(text.contains("(fp_text reference \"J1\" (at 0 -3) (layer F.SilkS)"));
    assert!(text.contains("(pad \"1\" thru_hole rect (at 0 0) (size 1.7 1.7) (drill 1)"));
    assert!(text.contains("(pad \"2\" thru_hole oval (at 2.54 0) (size 1.7 1.7) (drill 1) (layers *.Cu *.Mask) (net 2 \"/HV1\"))"));
}

#[test]
fn test_raw_block_verbatim_and_file_written() {
    let mut b = board();
    b.add_raw_block("  (gr_text \"raw\" (at 100 100) (layer F.SilkS))");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.kicad_pcb");
    KicadExporter::write_file(&b, &KicadOptions { offset_x: 50.0, ..Default::default() }, &path)
        .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("  (gr_text \"raw\" (at 100 100) (layer F.SilkS))\n)\n"));
}

#[test]
fn test_non_finite_offsets_are_rejected() {
    let options = KicadOptions {
        offset_x: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        KicadExporter::render(&board(), &options),
        Err(ExportError::InvalidOption { ref name, .. }) if name == "offset_x"
    ));
}
