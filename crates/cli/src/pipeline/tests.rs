use super::*;
use std::fs;
use tempfile::tempdir;

fn cfg() -> PipelineConfig {
    PipelineConfig {
        interactive: false,
        single_scale: false,
        start_with_prepped_data: false,
        tiny_test: false,
        use_subsample: None,
        data_dir: PathBuf::from("data"),
        out_dir: PathBuf::from("out"),
        img_suffix: "1x_hip".to_string(),
        toolkit: PathBuf::from("shapeworks"),
        plane: None,
        plane_prefix: None,
    }
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn sample_prefix_takes_first_two_components() {
    assert_eq!(
        sample_prefix(Path::new("meshes/m03_L_femur.ply")).as_deref(),
        Some("m03_L")
    );
    assert_eq!(
        sample_prefix(Path::new("m12_R_femur.aligned.ply")).as_deref(),
        Some("m12_R")
    );
    assert_eq!(sample_prefix(Path::new("noseparator.ply")), None);
}

#[test]
fn tiny_test_keeps_first_three() {
    let mut c = cfg();
    c.tiny_test = true;
    let imgs = paths(&["a.nrrd", "b.nrrd", "c.nrrd", "d.nrrd"]);
    let meshes = paths(&["a.ply", "b.ply", "c.ply", "d.ply"]);
    let (i, m) = trim_cohort(&c, imgs, meshes);
    assert_eq!(i.len(), 3);
    assert_eq!(m, paths(&["a.ply", "b.ply", "c.ply"]));
}

#[test]
fn subsample_is_strided_and_index_aligned() {
    let mut c = cfg();
    c.use_subsample = Some(2);
    let imgs = paths(&["a.nrrd", "b.nrrd", "c.nrrd", "d.nrrd"]);
    let meshes = paths(&["a.ply", "b.ply", "c.ply", "d.ply"]);
    let (i, m) = trim_cohort(&c, imgs, meshes);
    assert_eq!(m, paths(&["a.ply", "c.ply"]));
    assert_eq!(i, paths(&["a.nrrd", "c.nrrd"]));
}

#[test]
fn subsample_larger_than_cohort_keeps_all() {
    let mut c = cfg();
    c.use_subsample = Some(10);
    let meshes = paths(&["a.ply", "b.ply"]);
    let (_, m) = trim_cohort(&c, Vec::new(), meshes.clone());
    assert_eq!(m, meshes);
}

#[test]
fn discover_inputs_sorts_listings() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("images")).unwrap();
    fs::create_dir_all(dir.path().join("meshes")).unwrap();
    for name in ["b.nrrd", "a.nrrd"] {
        fs::write(dir.path().join("images").join(name), "").unwrap();
    }
    for name in ["m2_R_femur.ply", "m1_L_femur.ply"] {
        fs::write(dir.path().join("meshes").join(name), "").unwrap();
    }
    let (images, meshes) = discover_inputs(dir.path()).unwrap();
    assert!(images[0].ends_with("a.nrrd"));
    assert!(meshes[0].ends_with("m1_L_femur.ply"));
}

#[test]
fn load_plane_reads_three_points() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plane.json");
    fs::write(&path, "[[0,1,0],[1,1,0],[0,1,1]]").unwrap();
    let plane = load_plane(&path).unwrap();
    assert_eq!(plane.flat(), [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn load_plane_rejects_wrong_arity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plane.json");
    fs::write(&path, "[[0,1,0],[1,1,0]]").unwrap();
    assert!(load_plane(&path).is_err());
}
