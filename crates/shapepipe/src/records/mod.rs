//! Side-channel records written by the grooming stages.
//!
//! Each alignment step leaves a small text artifact next to its output
//! volumes: the center-of-mass stage a labeled translation, the re-centering
//! stage a bare translation, the rigid stage a 4×4 matrix. Their line layout
//! is a contract with the producing stage and is parsed exactly as written.
//!
//! Lookup goes through [`RecordIndex`], a map built from one directory scan,
//! rather than rescanning the listing per query.

mod index;
mod parse;

pub use index::{RecordFilter, RecordIndex};
pub use parse::{read_center_translation, read_com_translation, read_rigid_matrix};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while locating or reading a grooming record.
///
/// All variants are fatal to the pipeline run: clipping on a wrong or
/// half-computed plane would corrupt results silently, so nothing here is
/// retried or downgraded.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("no record matching '{prefix}' in {}", .dir.display())]
    Missing { prefix: String, dir: PathBuf },

    #[error("malformed record {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests;
