//! KiCad board file support.
//!
//! This module reads `.kicad_pcb` files (an s-expression format) into a
//! [`Board`](types::Board) model carrying the items the laser workflow cares
//! about: the layer table, tracks, vias, footprint pads, zone fills and
//! board-level drawings.

pub mod parser;
pub mod sexpr;
pub mod types;

use std::fs;
use std::path::Path;

use crate::error::Error;

pub use parser::parse_board;
pub use types::*;

/// Read and parse a board file.
pub fn load_board(path: &Path) -> Result<Board, Error> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_board(&content)
}
