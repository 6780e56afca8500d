//! Groom → optimize → analyze sequencing for the femur cohort.
//!
//! Every computational step is an external toolkit operation; this module
//! only decides the order, the directory layout, and which files feed which
//! stage. The one in-process step is the cutting-plane propagation, which
//! replays the recorded grooming transforms on the picked plane.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use nalgebra::Vector3;
use shapepipe::plane::CuttingPlane;
use shapepipe::propagate::{propagate_cutting_plane, RecordDirs};

use crate::params::{write_params, MultiScaleParams, SingleScaleParams};
use crate::tools::{pause, Toolkit};

/// Which side the un-reflected femurs are on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceSide {
    Left,
    Right,
}

impl ReferenceSide {
    fn as_str(self) -> &'static str {
        match self {
            ReferenceSide::Left => "left",
            ReferenceSide::Right => "right",
        }
    }
}

/// Explicit pipeline configuration; one flag per branch the run can take.
#[derive(Args, Clone, Debug)]
pub struct PipelineConfig {
    /// Pause between stages and pick the cutting plane interactively.
    #[arg(long)]
    pub interactive: bool,

    /// Optimize with a fixed particle count instead of multi-scale levels.
    #[arg(long)]
    pub single_scale: bool,

    /// Skip grooming and read pre-computed distance transforms.
    #[arg(long)]
    pub start_with_prepped_data: bool,

    /// Trim the cohort to the first 3 samples.
    #[arg(long)]
    pub tiny_test: bool,

    /// Evenly strided subsample of the cohort.
    #[arg(long, value_name = "N")]
    pub use_subsample: Option<usize>,

    /// Input root holding images/ and meshes/.
    #[arg(long, default_value = "TestFemur/femurdata")]
    pub data_dir: PathBuf,

    /// Grooming output root.
    #[arg(long, default_value = "TestFemur/PrepOutput")]
    pub out_dir: PathBuf,

    /// Filename marker of image-space records sharing the transform
    /// directory with segmentation-space ones.
    #[arg(long, default_value = "1x_hip")]
    pub img_suffix: String,

    /// External toolkit binary.
    #[arg(long, default_value = "shapeworks")]
    pub toolkit: PathBuf,

    /// Pre-selected cutting plane: JSON array of three [x, y, z] points,
    /// in the frame of the sample it was picked on. Required unless
    /// --interactive or --start-with-prepped-data.
    #[arg(long)]
    pub plane: Option<PathBuf>,

    /// Prefix of the sample the plane was picked on.
    #[arg(long)]
    pub plane_prefix: Option<String>,
}

#[inline]
fn os(s: impl AsRef<OsStr>) -> OsString {
    s.as_ref().to_os_string()
}

/// Full pipeline run.
pub fn run(cfg: &PipelineConfig) -> Result<()> {
    let toolkit = Toolkit::new(cfg.toolkit.clone());

    let dt_dir = if cfg.start_with_prepped_data {
        tracing::info!("starting from prepped data");
        cfg.out_dir.join("distance_transforms")
    } else {
        groom(cfg, &toolkit)?
    };
    let dt_files = sorted_files(&dt_dir)?;
    if dt_files.is_empty() {
        bail!("no distance transforms under {}", dt_dir.display());
    }
    tracing::info!(count = dt_files.len(), "distance transforms ready");

    if cfg.interactive {
        pause("Step: Optimize - particle based optimization")?;
    }
    let point_dir = cfg.out_dir.join("point_files");
    fs::create_dir_all(&point_dir)?;
    let params_path = point_dir.join("params.json");
    if cfg.single_scale {
        write_params(&params_path, &SingleScaleParams::default())?;
    } else {
        write_params(&params_path, &MultiScaleParams::default())?;
    }
    toolkit.run("optimize", [os(&params_path), os(&dt_dir), os(&point_dir)])?;

    if cfg.interactive {
        pause("Step: Analyze - reconstruct and visualize")?;
    }
    toolkit.run("studio", [os(&point_dir), os(&dt_dir)])?;
    Ok(())
}

/// Grooming chain. Returns the distance-transform directory.
fn groom(cfg: &PipelineConfig, toolkit: &Toolkit) -> Result<PathBuf> {
    if cfg.interactive {
        pause("Step: Groom - data pre-processing")?;
    }

    let (images, meshes) = discover_inputs(&cfg.data_dir)?;
    let (images, meshes) = trim_cohort(cfg, images, meshes);
    if meshes.is_empty() {
        bail!("no meshes under {}", cfg.data_dir.join("meshes").display());
    }
    tracing::info!(samples = meshes.len(), "cohort selected");

    // In the hand-picked case the plane is loaded up front so a bad file
    // fails the run before hours of grooming, and the picked sample's side
    // decides the reflection reference.
    let picked = if cfg.interactive {
        None
    } else {
        let plane_path = cfg
            .plane
            .as_ref()
            .context("--plane is required unless --interactive")?;
        let prefix = cfg
            .plane_prefix
            .as_ref()
            .context("--plane-prefix is required unless --interactive")?;
        if !meshes
            .iter()
            .filter_map(|m| sample_prefix(m))
            .any(|p| p == *prefix)
        {
            bail!("--plane-prefix '{prefix}' matches no mesh in the cohort");
        }
        Some((load_plane(plane_path)?, prefix.clone()))
    };
    let side = match &picked {
        Some((_, prefix)) if prefix.ends_with('R') => ReferenceSide::Right,
        _ => ReferenceSide::Left,
    };

    let out = &cfg.out_dir;
    fs::create_dir_all(out)?;

    // Reflect the off-side femurs so left and right can be aligned
    // together. The trimmed cohort is passed file by file; everything
    // downstream consumes the previous stage's output directory.
    let reflected = out.join("reflected");
    let mut reflect_args = vec![os("--side"), os(side.as_str()), os("--output"), os(&reflected)];
    reflect_args.push(os("--meshes"));
    reflect_args.extend(meshes.iter().map(os));
    reflect_args.push(os("--images"));
    reflect_args.extend(images.iter().map(os));
    toolkit.run("reflect", reflect_args)?;

    // Mesh segmentations become binary volumes.
    let volumes = out.join("volumes");
    toolkit.run(
        "meshes-to-volumes",
        [os(reflected.join("meshes")), os(&volumes)],
    )?;

    // Segmentations and images are resampled independently to uniform
    // spacing, then padded in case a segmentation touches the boundary.
    let resampled_seg = out.join("resampled/segmentations");
    let resampled_img = out.join("resampled/images");
    toolkit.run(
        "resample",
        [os("--binary"), os(&volumes), os(&resampled_seg)],
    )?;
    toolkit.run(
        "resample",
        [os(reflected.join("images")), os(&resampled_img)],
    )?;

    let padded_seg = out.join("padded/segmentations");
    let padded_img = out.join("padded/images");
    toolkit.run(
        "pad",
        [os("--padding"), os("10"), os(&resampled_seg), os(&padded_seg)],
    )?;
    toolkit.run(
        "pad",
        [os("--padding"), os("10"), os(&resampled_img), os(&padded_img)],
    )?;

    // Alignment: center of mass, re-centering, then rigid against the
    // median sample. Each stage records its transform next to its output;
    // those records are what the plane propagation replays.
    let com = out.join("com_aligned");
    toolkit.run("com-align", [os(&padded_seg), os(&padded_img), os(&com)])?;
    let centered = out.join("centered");
    toolkit.run(
        "center",
        [
            os(com.join("segmentations")),
            os(com.join("images")),
            os(&centered),
        ],
    )?;
    let aligned = out.join("aligned");
    toolkit.run(
        "rigid-align",
        [
            os("--reference"),
            os("median"),
            os(centered.join("segmentations")),
            os(centered.join("images")),
            os(&aligned),
        ],
    )?;

    // The cut must happen in the aligned frame. Either the user picks it
    // there directly, or the hand-picked plane is propagated through the
    // recorded transforms of its sample.
    let plane = match picked {
        None => {
            pause("Select the cutting plane on the reference distance transform")?;
            let plane_out = out.join("cutting_plane.json");
            toolkit.run(
                "select-plane",
                [os(aligned.join("segmentations")), os(&plane_out)],
            )?;
            load_plane(&plane_out)?
        }
        Some((plane, prefix)) => {
            let dirs = RecordDirs::under(out);
            let propagated = propagate_cutting_plane(plane, &prefix, &dirs, &cfg.img_suffix)?;
            tracing::info!(prefix, points = ?propagated.flat(), "cutting plane propagated");
            propagated
        }
    };

    let clipped = out.join("clipped_segmentations");
    let mut clip_args = vec![os(aligned.join("segmentations")), os(&clipped)];
    clip_args.extend(plane.flat().iter().map(|c| os(c.to_string())));
    toolkit.run("clip", clip_args)?;

    // Largest bounding box over the clipped cohort, applied to both kinds.
    let cropped = out.join("cropped");
    toolkit.run(
        "crop",
        [os(&clipped), os(aligned.join("images")), os(&cropped)],
    )?;

    if cfg.interactive {
        pause("Step: Groom - convert to distance transforms")?;
    }
    let dt = out.join("distance_transforms");
    toolkit.run(
        "distance-transform",
        [os(cropped.join("segmentations")), os(&dt)],
    )?;
    Ok(dt)
}

/// Sorted listings of the images/ and meshes/ input directories.
pub fn discover_inputs(data_dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let images = sorted_files(&data_dir.join("images"))?;
    let meshes = sorted_files(&data_dir.join("meshes"))?;
    Ok((images, meshes))
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Apply the --tiny-test / --use-subsample cohort trims, index-aligned
/// across images and meshes.
pub fn trim_cohort(
    cfg: &PipelineConfig,
    mut images: Vec<PathBuf>,
    mut meshes: Vec<PathBuf>,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    if cfg.tiny_test {
        images.truncate(3);
        meshes.truncate(3);
    }
    if let Some(n) = cfg.use_subsample {
        let idx = subsample_indices(meshes.len(), n);
        images = idx.iter().filter_map(|&i| images.get(i).cloned()).collect();
        meshes = idx.iter().map(|&i| meshes[i].clone()).collect();
    }
    (images, meshes)
}

/// Evenly strided selection of `n` out of `len` indices.
fn subsample_indices(len: usize, n: usize) -> Vec<usize> {
    if n == 0 || len == 0 {
        return Vec::new();
    }
    if n >= len {
        return (0..len).collect();
    }
    (0..n).map(|k| k * len / n).collect()
}

/// Sample identifier: the first two `_`-separated components of the stem,
/// e.g. `m03_L` from `m03_L_femur.ply`.
pub fn sample_prefix(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let mut parts = stem.split('_');
    let a = parts.next()?;
    let b = parts.next()?;
    Some(format!("{a}_{b}"))
}

/// Read a plane as a JSON array of three `[x, y, z]` points.
pub fn load_plane(path: &Path) -> Result<CuttingPlane> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: [[f64; 3]; 3] =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(CuttingPlane::new(raw.map(|p| Vector3::new(p[0], p[1], p[2]))))
}

#[cfg(test)]
mod tests;
