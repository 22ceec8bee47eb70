//! PCB pattern model: layers, nets, cut/etch participation and footprints.

pub mod footprint;
pub mod nets;
pub mod pattern;

pub use footprint::{
    pad_location, FootprintDef, FootprintKind, FootprintPlacement, PadShape, PadSpec, PadType,
};
pub use nets::{Net, NetClass, NetId, NetTable};
pub use pattern::{
    BoardItem, Participation, PcbPattern, PcbPrimitive, PcbShape, PcbText, Via, BACK_COPPER,
    EDGE_CUTS, FRONT_COPPER, FRONT_MASK, FRONT_SILKSCREEN,
};
