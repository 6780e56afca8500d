//! Parameter sets for the external particle optimizer.
//!
//! Field names and defaults follow the optimizer's documented parameter
//! file; the values are the ones tuned for the femur cohort.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Fixed-particle-count optimization.
#[derive(Clone, Debug, Serialize)]
pub struct SingleScaleParams {
    pub number_of_particles: u32,
    #[serde(flatten)]
    pub common: CommonParams,
}

/// Hierarchical optimization over several particle-count levels.
#[derive(Clone, Debug, Serialize)]
pub struct MultiScaleParams {
    pub starting_particles: u32,
    pub number_of_levels: u32,
    #[serde(flatten)]
    pub common: CommonParams,
}

/// Knobs shared by both optimization modes.
#[derive(Clone, Debug, Serialize)]
pub struct CommonParams {
    pub use_normals: u32,
    pub normal_weight: f64,
    pub checkpointing_interval: u32,
    pub keep_checkpoints: u32,
    pub iterations_per_split: u32,
    pub optimization_iterations: u32,
    pub starting_regularization: f64,
    pub ending_regularization: f64,
    pub recompute_regularization_interval: u32,
    pub domains_per_shape: u32,
    pub relative_weighting: f64,
    pub initial_relative_weighting: f64,
    pub procrustes_interval: u32,
    pub procrustes_scaling: u32,
    pub save_init_splits: u32,
    pub debug_projection: u32,
    pub verbosity: u32,
    pub use_statistics_in_init: u32,
}

impl Default for CommonParams {
    fn default() -> Self {
        Self {
            use_normals: 0,
            normal_weight: 10.0,
            checkpointing_interval: 10,
            keep_checkpoints: 1,
            iterations_per_split: 4000,
            optimization_iterations: 4000,
            starting_regularization: 100.0,
            ending_regularization: 0.1,
            recompute_regularization_interval: 2,
            domains_per_shape: 1,
            relative_weighting: 10.0,
            initial_relative_weighting: 1.0,
            procrustes_interval: 1,
            procrustes_scaling: 1,
            save_init_splits: 1,
            debug_projection: 0,
            verbosity: 3,
            use_statistics_in_init: 0,
        }
    }
}

impl Default for SingleScaleParams {
    fn default() -> Self {
        Self {
            number_of_particles: 1024,
            common: CommonParams::default(),
        }
    }
}

impl Default for MultiScaleParams {
    fn default() -> Self {
        Self {
            starting_particles: 64,
            number_of_levels: 5,
            common: CommonParams::default(),
        }
    }
}

/// Serialize `params` as pretty JSON at `path`, creating parent directories.
pub fn write_params<T: Serialize>(path: &Path, params: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(params)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn single_scale_defaults_serialize_flat() {
        let params = SingleScaleParams::default();
        let v: Value = serde_json::to_value(&params).unwrap();
        assert_eq!(v["number_of_particles"], 1024);
        assert_eq!(v["iterations_per_split"], 4000);
        assert_eq!(v["ending_regularization"], 0.1);
        // Common knobs are flattened, not nested.
        assert!(v.get("common").is_none());
    }

    #[test]
    fn multi_scale_defaults() {
        let params = MultiScaleParams::default();
        assert_eq!(params.starting_particles, 64);
        assert_eq!(params.number_of_levels, 5);
    }

    #[test]
    fn write_params_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("point_files/params.json");
        write_params(&path, &SingleScaleParams::default()).unwrap();
        let v: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(v["verbosity"], 3);
    }
}
