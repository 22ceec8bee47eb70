//! Demo patterns written by the `kerfcraft` binary.

use kerfcraft_core::constants::{PIN_HEADER_SPACING, TRACE_CAP_SAMPLES};
use kerfcraft_core::{mils_to_mm, DrawMode, GeometryResult, Point};
use kerfcraft_designer::pcb::{
    FootprintKind, NetClass, NetTable, Participation, PcbPattern, BACK_COPPER, EDGE_CUTS,
    FRONT_COPPER, FRONT_SILKSCREEN,
};
use kerfcraft_designer::{Kerf, Pattern, TextAnchor};
use kerfcraft_settings::Config;
use std::f64::consts::PI;

/// Side of the kerf test square in millimeters.
pub const SQUARE_SIDE: f64 = 20.0;
/// Kerf radius of the test square cuts.
pub const SQUARE_KERF: f64 = 0.1;

pub const BOARD_WIDTH: f64 = 40.0;
pub const BOARD_HEIGHT: f64 = 30.0;
const MOUNT_INSET: f64 = 3.0;

/// A kerf-compensated square with a hole at its center and an engraved label.
pub fn square_test_cut(config: &Config) -> GeometryResult<Pattern> {
    let mut pattern = Pattern::new(config.machine.clone());
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(SQUARE_SIDE, 0.0),
        Point::new(SQUARE_SIDE, SQUARE_SIDE),
        Point::new(0.0, SQUARE_SIDE),
    ];
    for i in 0..corners.len() {
        pattern.add_line(
            corners[i],
            corners[(i + 1) % corners.len()],
            Some(Kerf::new(SQUARE_KERF)),
            DrawMode::Cut,
        )?;
    }
    let center = Point::new(SQUARE_SIDE / 2.0, SQUARE_SIDE / 2.0);
    pattern.add_circle(center, 2.0, None, DrawMode::Cut)?;
    pattern.add_text(
        center.offset(0.0, SQUARE_SIDE / 4.0),
        format!("kerf {} mm", SQUARE_KERF),
        1.5,
        TextAnchor::MiddleCenter,
    )?;
    Ok(pattern)
}

/// A small two-layer board exercising every record kind.
pub fn test_board(config: &Config) -> GeometryResult<PcbPattern> {
    let nets = NetTable::from_names(&[
        ("/GND", NetClass::Default),
        ("/HV1", NetClass::Power),
        ("/CTRL_HV1", NetClass::Default),
    ])?;
    let mut board = PcbPattern::new(nets);
    let gnd = board.nets().require("/GND")?;
    let hv = board.nets().require("/HV1")?;
    let ctrl = board.nets().require("/CTRL_HV1")?;

    let outline = [
        Point::new(0.0, 0.0),
        Point::new(BOARD_WIDTH, 0.0),
        Point::new(BOARD_WIDTH, BOARD_HEIGHT),
        Point::new(0.0, BOARD_HEIGHT),
        Point::new(0.0, 0.0),
    ];
    board.add_graphic_line(&outline, EDGE_CUTS, Participation::CUT)?;

    for (x, y) in [
        (MOUNT_INSET, MOUNT_INSET),
        (BOARD_WIDTH - MOUNT_INSET, MOUNT_INSET),
        (BOARD_WIDTH - MOUNT_INSET, BOARD_HEIGHT - MOUNT_INSET),
        (MOUNT_INSET, BOARD_HEIGHT - MOUNT_INSET),
    ] {
        board.add_m2_drill(Point::new(x, y), true, Participation::BOTH)?;
    }

    let header_origin = Point::new(10.0, 5.0);
    board.add_pin_header(
        header_origin,
        3,
        1,
        PIN_HEADER_SPACING,
        &[gnd, hv, ctrl],
        "J1",
        None,
        Participation::BOTH,
    )?;

    let resistor_center = Point::new(20.0, 15.0);
    board.add_component(
        FootprintKind::Resistor1206,
        resistor_center,
        90.0,
        "R1",
        Some("10k"),
        &[ctrl, gnd],
    )?;
    let r1_top = board
        .footprints()
        .last()
        .map(|f| f.pad_location("1"))
        .transpose()?
        .unwrap_or(resistor_center);

    let trace_width = mils_to_mm(12.0);
    let ctrl_pin = header_origin.offset(2.0 * PIN_HEADER_SPACING, 0.0);
    board.add_trace_rounded(
        &[ctrl_pin, Point::new(ctrl_pin.x, r1_top.y), r1_top],
        trace_width,
        1.0,
        TRACE_CAP_SAMPLES,
        ctrl,
        FRONT_COPPER,
        Participation::ETCH,
    )?;

    board.add_fill_zone_rounded_rectangle(
        Point::new(24.0, 14.0),
        Point::new(34.0, 24.0),
        1.0,
        4,
        hv,
        0.01,
        FRONT_COPPER,
        Participation::ETCH,
    )?;
    board.add_fill_zone_rectangle(
        Point::new(1.0, 1.0),
        Point::new(BOARD_WIDTH - 1.0, BOARD_HEIGHT - 1.0),
        gnd,
        0.01,
        BACK_COPPER,
        Participation::NONE,
    )?;

    board.add_via(
        Point::new(29.0, 19.0),
        config.board.via_size,
        config.board.via_drill,
        hv,
        (FRONT_COPPER, BACK_COPPER),
        Participation::BOTH,
    )?;

    board.add_graphic_arc(
        Point::new(BOARD_WIDTH / 2.0, BOARD_HEIGHT),
        3.0,
        PI,
        2.0 * PI,
        EDGE_CUTS,
        Participation::NONE,
    )?;
    board.add_text(
        "KerfCraft test",
        Point::new(BOARD_WIDTH / 2.0, 2.0),
        0.0,
        1.0,
        0.15,
        FRONT_SILKSCREEN,
    )?;
    Ok(board)
}
