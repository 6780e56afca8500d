//! Carries a cutting plane through the grooming transform chain.
//!
//! The plane is picked on one sample's ungroomed geometry. That sample then
//! goes through center-of-mass alignment, re-centering, and rigid alignment,
//! each of which records its transform as a text artifact. Replaying those
//! records against the plane's three points yields the plane in the aligned
//! frame, where a single clip applies to every sample.

use std::path::{Path, PathBuf};

use crate::plane::CuttingPlane;
use crate::records::{
    read_center_translation, read_com_translation, read_rigid_matrix, RecordError, RecordFilter,
    RecordIndex,
};

/// Locations of the per-sample transform records, one directory per
/// grooming stage.
#[derive(Clone, Debug)]
pub struct RecordDirs {
    /// Center-of-mass alignment records (labeled translation).
    pub com: PathBuf,
    /// Re-centering records (bare translation).
    pub center: PathBuf,
    /// Rigid-alignment matrices. Shared with the image-space matrices,
    /// which are filtered out by `img_suffix`.
    pub rigid: PathBuf,
}

impl RecordDirs {
    /// Conventional layout under a grooming output root.
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            com: root.join("com_aligned/segmentations"),
            center: root.join("centered/segmentations"),
            rigid: root.join("aligned/transformations"),
        }
    }
}

/// Express `plane` in the rigidly-aligned frame of the sample identified by
/// `prefix`.
///
/// Applies, in order: COM translation (subtracted), re-centering translation
/// (subtracted), the segmentation-space rigid matrix (homogeneous multiply),
/// and the flipped-height catch. Records whose filename contains
/// `img_suffix` are image-space matrices and are never used here.
///
/// Any missing or malformed record aborts the whole chain; there is no
/// partial result.
pub fn propagate_cutting_plane(
    plane: CuttingPlane,
    prefix: &str,
    dirs: &RecordDirs,
    img_suffix: &str,
) -> Result<CuttingPlane, RecordError> {
    let com_index = RecordIndex::scan(&dirs.com)?;
    let com_path = com_index.find(prefix, RecordFilter::requiring(".txt"))?;
    let com = read_com_translation(com_path)?;
    let plane = plane.translate(com);

    let center_index = RecordIndex::scan(&dirs.center)?;
    let center_path = center_index.find(prefix, RecordFilter::requiring(".txt"))?;
    let center = read_center_translation(center_path)?;
    let plane = plane.translate(center);

    let rigid_index = RecordIndex::scan(&dirs.rigid)?;
    let rigid_path = rigid_index.find(prefix, RecordFilter::excluding(img_suffix))?;
    let rigid = read_rigid_matrix(rigid_path)?;
    let plane = plane.transform(&rigid);

    Ok(plane.correct_flipped_height())
}
