//! Color and layer conventions for the downstream laser-control application.
//!
//! The laser software keys its passes off fill/stroke colors, so the mapping
//! from board layer category to color is fixed.

/// Etch passes (isolation regions).
pub const TRACES_COLOR: &str = "#000000";
/// Contour cut (board outline).
pub const CONTOUR_COLOR: &str = "#00ff00";
/// Drill holes.
pub const HOLES_COLOR: &str = "#ff7f56";
/// Solder mask openings.
pub const MASK_COLOR: &str = "#ffff00";
/// Scoring/annotation lines from the comments layer.
pub const COMMENTS_COLOR: &str = "#00befe";

/// Stroke width for the board outline contour.
pub const CONTOUR_STROKE_WIDTH: &str = "0.1";

pub const FRONT_COPPER: &str = "F.Cu";
pub const BACK_COPPER: &str = "B.Cu";
/// Canonical name of the user comments layer in board files.
pub const COMMENTS_LAYER: &str = "Cmts.User";

/// Which board side(s) to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Both,
}

impl Side {
    /// Copper layers selected by this side, front first.
    pub fn copper_layers(&self) -> Vec<&'static str> {
        match self {
            Side::Front => vec![FRONT_COPPER],
            Side::Back => vec![BACK_COPPER],
            Side::Both => vec![FRONT_COPPER, BACK_COPPER],
        }
    }
}

/// Solder mask layer paired with a copper layer.
pub fn mask_layer_for(copper_layer: &str) -> &'static str {
    if copper_layer.starts_with("B.") {
        "B.Mask"
    } else {
        "F.Mask"
    }
}

/// File-name stem for a layer, with dots flattened (`F.Cu` -> `F_Cu`).
pub fn layer_file_stem(layer: &str) -> String {
    layer.replace('.', "_")
}
