//! KiCad 5 layout export (`.kicad_pcb`, file version 20171130).
//!
//! The file is a header, one body record per board item in insertion order,
//! and a closing parenthesis. Circles synthesized from footprints and vias are
//! skipped: the `module` and `via` records already describe them.

use kerfcraft_core::constants::{BOARD_EDGE_SPACING_EFF, CUTOUT_WIDTH, LINESPACE};
use kerfcraft_core::{format_mm, Point};
use kerfcraft_designer::geometry::{open_ring, CircularArc};
use kerfcraft_designer::pcb::{
    BoardItem, FootprintPlacement, NetClass, NetId, PcbPattern, PcbPrimitive, PcbShape, PcbText,
    Via, FRONT_COPPER, FRONT_SILKSCREEN,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{check_offsets, ExportError, ExportResult};

const FILE_VERSION: u32 = 20171130;
const HOST: &str = r#"pcbnew "(5.1.10)-1""#;
const BOARD_THICKNESS: f64 = 1.6;
const ZONE_CLEARANCE: f64 = 0.508;
const FP_TEXT_SIZE: f64 = 1.0;
const FP_TEXT_THICKNESS: f64 = 0.15;
const FP_VALUE_LAYER: &str = "F.Fab";
const INDENT: &str = "  ";

const LAYER_TABLE: &str = r#"  (layers
    (0 F.Cu signal)
    (31 B.Cu signal)
    (32 B.Adhes user)
    (33 F.Adhes user)
    (34 B.Paste user)
    (35 F.Paste user)
    (36 B.SilkS user)
    (37 F.SilkS user)
    (38 B.Mask user)
    (39 F.Mask user)
    (40 Dwgs.User user)
    (41 Cmts.User user)
    (42 Eco1.User user)
    (43 Eco2.User user)
    (44 Edge.Cuts user)
    (45 Margin user)
    (46 B.CrtYd user)
    (47 F.CrtYd user)
    (48 B.Fab user)
    (49 F.Fab user)
  )
"#;

const SETUP: &str = r#"  (setup
    (last_trace_width 0.25)
    (trace_clearance 0.2)
    (zone_clearance 0.508)
    (zone_45_only no)
    (trace_min 0.06)
    (via_size 0.8)
    (via_drill 0.4)
    (via_min_size 0.4)
    (via_min_drill 0.3)
    (uvia_size 0.3)
    (uvia_drill 0.1)
    (uvias_allowed no)
    (uvia_min_size 0.2)
    (uvia_min_drill 0.1)
    (edge_width 0.05)
    (segment_width 0.2)
    (pcb_text_width 0.3)
    (pcb_text_size 1.5 1.5)
    (mod_edge_width 0.12)
    (mod_text_size 1 1)
    (mod_text_width 0.15)
    (pad_size 1.524 1.524)
    (pad_drill 0.762)
    (pad_to_mask_clearance 0)
    (aux_axis_origin 0 0)
    (visible_elements 7FFFFFFF)
    (pcbplotparams
      (layerselection 0x010a8_7fffffff)
      (usegerberextensions false)
      (usegerberattributes true)
      (usegerberadvancedattributes true)
      (creategerberjobfile true)
      (excludeedgelayer true)
      (linewidth 0.100000)
      (plotframeref false)
      (viasonmask false)
      (mode 1)
      (useauxorigin false)
      (hpglpennumber 1)
      (hpglpenspeed 20)
      (hpglpendiameter 15.000000)
      (psnegative false)
      (psa4output false)
      (plotreference true)
      (plotvalue true)
      (plotinvisibletext false)
      (padsonsilk false)
      (subtractmaskfromsilk false)
      (outputformat 1)
      (mirror false)
      (drillshape 0)
      (scaleselection 1)
      (outputdirectory ""))
  )
"#;

/// Offsets and net class rules of a layout file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KicadOptions {
    pub offset_x: f64,
    pub offset_y: f64,
    pub default_clearance: f64,
    pub default_linewidth: f64,
    pub power_clearance: f64,
    pub power_linewidth: f64,
}

impl Default for KicadOptions {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            default_clearance: BOARD_EDGE_SPACING_EFF,
            default_linewidth: LINESPACE,
            power_clearance: BOARD_EDGE_SPACING_EFF,
            power_linewidth: 0.5,
        }
    }
}

impl KicadOptions {
    fn check(&self) -> ExportResult<()> {
        for (name, value) in [
            ("default_clearance", self.default_clearance),
            ("default_linewidth", self.default_linewidth),
            ("power_clearance", self.power_clearance),
            ("power_linewidth", self.power_linewidth),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ExportError::InvalidOption {
                    name: name.to_string(),
                    reason: format!("{} must be > 0", value),
                });
            }
        }
        check_offsets(self.offset_x, self.offset_y)
    }
}

/// Record counts of the `general` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardCounts {
    pub drawings: usize,
    pub tracks: usize,
    pub zones: usize,
    pub modules: usize,
    pub nets: usize,
}

impl BoardCounts {
    pub fn of(board: &PcbPattern) -> Self {
        let mut counts = BoardCounts {
            nets: board.nets().len(),
            ..Default::default()
        };
        for item in board.items() {
            match item {
                BoardItem::Primitive(p) if p.exact_for_export => match &p.shape {
                    PcbShape::Trace { points, .. } => {
                        counts.tracks += points.len().saturating_sub(1)
                    }
                    PcbShape::Zone { .. } => counts.zones += 1,
                    PcbShape::GraphicLine { points } => {
                        counts.drawings += points.len().saturating_sub(1)
                    }
                    PcbShape::GraphicArc { .. }
                    | PcbShape::GraphicPolygon { .. }
                    | PcbShape::Circle { .. } => counts.drawings += 1,
                },
                BoardItem::Primitive(_) | BoardItem::Raw(_) => {}
                BoardItem::Text(_) => counts.drawings += 1,
                BoardItem::Via(_) => counts.tracks += 1,
                BoardItem::Footprint(_) => counts.modules += 1,
            }
        }
        counts
    }
}

pub struct KicadExporter;

impl KicadExporter {
    pub fn render(board: &PcbPattern, options: &KicadOptions) -> ExportResult<String> {
        options.check()?;
        let mut writer = KicadWriter {
            out: String::new(),
            board,
            offset: (options.offset_x, options.offset_y),
        };
        writer.header(options)?;
        for item in board.items() {
            match item {
                BoardItem::Primitive(p) => writer.primitive(p)?,
                BoardItem::Text(t) => writer.text(t)?,
                BoardItem::Via(v) => writer.via(v)?,
                BoardItem::Footprint(f) => writer.module(f)?,
                BoardItem::Raw(text) => writer.raw(text),
            }
        }
        writer.out.push(')');
        writer.out.push('\n');
        debug!("KiCad layout: {} board items", board.len());
        Ok(writer.out)
    }

    pub fn write_file(
        board: &PcbPattern,
        options: &KicadOptions,
        path: impl AsRef<Path>,
    ) -> ExportResult<()> {
        let text = Self::render(board, options)?;
        fs::write(path.as_ref(), text)?;
        info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}

struct KicadWriter<'a> {
    out: String,
    board: &'a PcbPattern,
    offset: (f64, f64),
}

impl KicadWriter<'_> {
    /// Absolute board coordinates of `p` as `x y`.
    fn xy(&self, p: Point) -> String {
        format!(
            "{} {}",
            format_mm(p.x + self.offset.0),
            format_mm(p.y + self.offset.1)
        )
    }

    fn net_name(&self, net: NetId) -> ExportResult<&str> {
        Ok(self.board.nets().name(net)?)
    }

    fn net_number(&self, net: NetId) -> ExportResult<u32> {
        Ok(self.board.nets().number(net)?)
    }

    fn header(&mut self, options: &KicadOptions) -> ExportResult<()> {
        let counts = BoardCounts::of(self.board);
        writeln!(
            self.out,
            "(kicad_pcb (version {}) (host {})\n",
            FILE_VERSION, HOST
        )?;
        writeln!(
            self.out,
            "  (general\n    (thickness {})\n    (drawings {})\n    (tracks {})\n    (zones {})\n    (modules {})\n    (nets {})\n  )\n",
            format_mm(BOARD_THICKNESS),
            counts.drawings,
            counts.tracks,
            counts.zones,
            counts.modules,
            counts.nets
        )?;
        self.out.push_str("  (page A4)\n");
        self.out.push_str(LAYER_TABLE);
        self.out.push('\n');
        self.out.push_str(SETUP);
        self.out.push('\n');

        let nets = self.board.nets();
        for net in nets.iter() {
            writeln!(self.out, "  (net {} {})", net.id, quoted(&net.name))?;
        }
        self.out.push('\n');

        self.net_class(
            NetClass::Default,
            "This is the default net class.",
            options.default_clearance,
            options.default_linewidth,
        )?;
        self.net_class(
            NetClass::Power,
            "Power nets",
            options.power_clearance,
            options.power_linewidth,
        )?;
        Ok(())
    }

    fn net_class(
        &mut self,
        class: NetClass,
        description: &str,
        clearance: f64,
        trace_width: f64,
    ) -> ExportResult<()> {
        writeln!(
            self.out,
            "  (net_class {} {}\n    (clearance {})\n    (trace_width {})\n    (via_dia 0.8)\n    (via_drill 0.4)\n    (uvia_dia 0.3)\n    (uvia_drill 0.1)",
            class,
            quoted(description),
            format_mm(clearance),
            format_mm(trace_width)
        )?;
        for net in self.board.nets().in_class(class) {
            writeln!(self.out, "    (add_net {})", quoted(&net.name))?;
        }
        self.out.push_str("  )\n\n");
        Ok(())
    }

    fn primitive(&mut self, primitive: &PcbPrimitive) -> ExportResult<()> {
        if !primitive.exact_for_export {
            return Ok(());
        }
        let layer = primitive.layer.as_str();
        match &primitive.shape {
            PcbShape::Trace { points, width, net } => {
                let net = self.net_number(*net)?;
                for pair in points.windows(2) {
                    let line = format!(
                        "(segment (start {}) (end {}) (width {}) (layer {}) (net {}))",
                        self.xy(pair[0]),
                        self.xy(pair[1]),
                        format_mm(*width),
                        layer,
                        net
                    );
                    self.line(&line);
                }
            }
            PcbShape::Zone {
                points,
                net,
                min_thickness,
            } => {
                let pts = self.pts(open_ring(points));
                let zone = format!(
                    "(zone (net {}) (net_name {}) (layer {}) (tstamp 0) (hatch edge {})\n  (connect_pads (clearance {}))\n  (min_thickness {})\n  (fill yes (arc_segments 32) (thermal_gap {}) (thermal_bridge_width {}))\n  (polygon\n    (pts\n      {}\n    )\n  )\n)",
                    self.net_number(*net)?,
                    quoted(self.net_name(*net)?),
                    layer,
                    format_mm(ZONE_CLEARANCE),
                    format_mm(ZONE_CLEARANCE),
                    format_mm(*min_thickness),
                    format_mm(ZONE_CLEARANCE),
                    format_mm(ZONE_CLEARANCE),
                    pts
                );
                self.block(&zone);
            }
            PcbShape::GraphicLine { points } => {
                for pair in points.windows(2) {
                    let line = format!(
                        "(gr_line (start {}) (end {}) (layer {}) (width {}))",
                        self.xy(pair[0]),
                        self.xy(pair[1]),
                        layer,
                        format_mm(CUTOUT_WIDTH)
                    );
                    self.line(&line);
                }
            }
            PcbShape::GraphicArc { arc } | PcbShape::Circle { arc } => self.arc(arc, layer),
            PcbShape::GraphicPolygon { points, width } => {
                let poly = format!(
                    "(gr_poly (pts {}) (layer {}) (width {}))",
                    self.pts(open_ring(points)),
                    layer,
                    format_mm(*width)
                );
                self.line(&poly);
            }
        }
        Ok(())
    }

    /// Centre, start point and sweep in degrees.
    fn arc(&mut self, arc: &CircularArc, layer: &str) {
        let line = format!(
            "(gr_arc (start {}) (end {}) (angle {}) (layer {}) (width {}))",
            self.xy(arc.center),
            self.xy(arc.start_point()),
            format_mm(arc.sweep().to_degrees()),
            layer,
            format_mm(CUTOUT_WIDTH)
        );
        self.line(&line);
    }

    fn text(&mut self, text: &PcbText) -> ExportResult<()> {
        let block = format!(
            "(gr_text {} (at {} {}) (layer {})\n  (effects (font (size {} {}) (thickness {})))\n)",
            quoted(&text.text),
            self.xy(text.center),
            format_mm(text.angle.to_degrees()),
            text.layer,
            format_mm(text.scale),
            format_mm(text.scale),
            format_mm(text.thickness)
        );
        self.block(&block);
        Ok(())
    }

    fn via(&mut self, via: &Via) -> ExportResult<()> {
        let line = format!(
            "(via (at {}) (size {}) (drill {}) (layers {} {}) (net {}))",
            self.xy(via.center),
            format_mm(via.size),
            format_mm(via.drill),
            via.layers.0,
            via.layers.1,
            self.net_number(via.net)?
        );
        self.line(&line);
        Ok(())
    }

    /// One `module` block generated from the footprint's pad table.
    fn module(&mut self, placement: &FootprintPlacement) -> ExportResult<()> {
        let def = placement.kind.definition()?;
        let angle = format_mm(placement.angle_deg);
        let reference_offset = placement.reference_offset.unwrap_or(def.reference_offset);

        let mut block = String::new();
        writeln!(
            block,
            "(module {} (layer {}) (tedit 0) (tstamp 0)",
            def.library, FRONT_COPPER
        )?;
        writeln!(block, "  (at {}{})", self.xy(placement.center), rotation(&angle))?;
        for (kind, text, offset, layer) in [
            ("reference", &placement.reference, reference_offset, FRONT_SILKSCREEN),
            ("value", &placement.value, def.value_offset, FP_VALUE_LAYER),
        ] {
            writeln!(
                block,
                "  (fp_text {} {} (at {} {}{}) (layer {})\n    (effects (font (size {} {}) (thickness {})))\n  )",
                kind,
                quoted(text),
                format_mm(offset.x),
                format_mm(offset.y),
                rotation(&angle),
                layer,
                format_mm(FP_TEXT_SIZE),
                format_mm(FP_TEXT_SIZE),
                format_mm(FP_TEXT_THICKNESS)
            )?;
        }
        for (index, pad) in def.pads.iter().enumerate() {
            write!(
                block,
                "  (pad {} {} {} (at {} {}{}) (size {} {})",
                quoted(&pad.number),
                pad.pad_type,
                pad.shape,
                format_mm(pad.offset.x),
                format_mm(pad.offset.y),
                rotation(&angle),
                format_mm(pad.size.0),
                format_mm(pad.size.1)
            )?;
            if let Some(drill) = pad.drill {
                write!(block, " (drill {})", format_mm(drill))?;
            }
            write!(block, " (layers {})", pad.layers)?;
            let net = placement.pad_net(index);
            if net.is_connected() {
                write!(
                    block,
                    " (net {} {})",
                    self.net_number(net)?,
                    quoted(self.net_name(net)?)
                )?;
            }
            block.push_str(")\n");
        }
        block.push(')');
        self.block(&block);

        debug!(
            "Module {} {} with {} pads",
            def.library,
            placement.reference,
            def.pads.len()
        );
        Ok(())
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        if !text.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn pts(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| format!("(xy {})", self.xy(*p)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn line(&mut self, record: &str) {
        self.out.push_str(INDENT);
        self.out.push_str(record);
        self.out.push('\n');
    }

    fn block(&mut self, record: &str) {
        for line in record.lines() {
            self.line(line);
        }
    }
}

/// ` angle` when the footprint is rotated, empty otherwise.
fn rotation(angle: &str) -> String {
    if angle == "0" {
        String::new()
    } else {
        format!(" {}", angle)
    }
}

/// S-expression string literal.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
