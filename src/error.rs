use std::path::PathBuf;

use thiserror::Error;

use crate::kicad::sexpr::SexprError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("s-expression syntax error: {0}")]
    Syntax(#[from] SexprError),

    #[error("not a kicad_pcb file (root tag is {found:?})")]
    NotABoard { found: String },

    #[error("malformed {node} node: {reason}")]
    MalformedNode { node: &'static str, reason: String },

    #[error("layer {0:?} is not present in the board stack-up")]
    UnknownLayer(String),
}

impl Error {
    pub(crate) fn malformed(node: &'static str, reason: impl Into<String>) -> Self {
        Error::MalformedNode {
            node,
            reason: reason.into(),
        }
    }
}
