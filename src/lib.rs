//! # kicad-laser-svg
//!
//! Convert KiCad PCB files into vector drawings for a laser fabrication
//! workflow.
//!
//! ## Outputs
//!
//! - **Isolation routing**: per copper layer, the board area minus all copper
//!   (tracks, pads, vias, zone fills) as a black filled region to etch away
//! - **Edge cuts**: the board outline as a green contour cut
//! - **Drill holes**, **solder mask openings** and **user comment** scoring
//!   lines as separate drawings
//! - **Merged multi-color**: everything in one SVG per side, colors keyed to
//!   laser passes; the back side is mirrored for flipped processing
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use kicad_laser_svg::{convert, kicad};
//!
//! let board = kicad::load_board(Path::new("board.kicad_pcb")).unwrap();
//! convert::generate_isolation_svg(&board, "F.Cu", Path::new("output")).unwrap();
//! convert::generate_edge_cuts_svg(&board, Path::new("output")).unwrap();
//! ```

pub mod convert;
pub mod error;
pub mod geom;
pub mod kicad;
pub mod style;
pub mod svg;

// Re-export commonly used items
pub use convert::{
    generate_drill_holes_svg, generate_edge_cuts_svg, generate_isolation_svg,
    generate_multi_color_svg, generate_multi_color_svg_back, generate_solder_mask_svg,
    generate_user_comments_svg,
};
pub use error::Error;
pub use kicad::{Board, load_board};
pub use style::Side;
