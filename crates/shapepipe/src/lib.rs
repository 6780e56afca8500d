//! Grooming glue for a particle-based shape-modeling pipeline.
//!
//! The heavy lifting (volume grooming, particle optimization, surface
//! reconstruction) lives in an external toolkit driven by the `cli` crate.
//! This crate holds the one in-repo piece of geometry: propagating a
//! hand-picked cutting plane through the recorded grooming transforms so it
//! can be applied to every sample's aligned segmentation.

pub mod plane;
pub mod propagate;
pub mod records;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::plane::CuttingPlane;
    pub use crate::propagate::{propagate_cutting_plane, RecordDirs};
    pub use crate::records::{RecordError, RecordFilter, RecordIndex};
    pub use nalgebra::{Matrix4 as Mat4, Vector3 as Vec3};
}
