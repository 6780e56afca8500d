use super::*;
use nalgebra::vector;
use std::fs;
use tempfile::tempdir;

#[test]
fn index_finds_by_prefix() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("m1_L_femur.com.txt"), "").unwrap();
    fs::write(dir.path().join("m2_R_femur.com.txt"), "").unwrap();
    let idx = RecordIndex::scan(dir.path()).unwrap();
    assert_eq!(idx.len(), 2);
    let path = idx.find("m2_R", RecordFilter::default()).unwrap();
    assert!(path.ends_with("m2_R_femur.com.txt"));
}

#[test]
fn missing_prefix_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("m1_L_femur.com.txt"), "").unwrap();
    let idx = RecordIndex::scan(dir.path()).unwrap();
    let err = idx.find("m9_X", RecordFilter::default()).unwrap_err();
    assert!(matches!(err, RecordError::Missing { .. }));
}

#[test]
fn require_filter_narrows_matches() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("m1_L_femur.nrrd"), "").unwrap();
    fs::write(dir.path().join("m1_L_femur.com.txt"), "").unwrap();
    let idx = RecordIndex::scan(dir.path()).unwrap();
    let path = idx.find("m1_L", RecordFilter::requiring(".txt")).unwrap();
    assert!(path.ends_with("m1_L_femur.com.txt"));
}

#[test]
fn exclude_filter_skips_image_space_records() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("m1_L_1x_hip.transform.txt"), "").unwrap();
    fs::write(dir.path().join("m1_L_femur.transform.txt"), "").unwrap();
    let idx = RecordIndex::scan(dir.path()).unwrap();
    let path = idx.find("m1_L", RecordFilter::excluding("1x_hip")).unwrap();
    assert!(path.ends_with("m1_L_femur.transform.txt"));
    // With nothing but image-space records left, the lookup must fail
    // rather than fall back to the wrong coordinate frame.
    let err = idx.find("m1_L_1x", RecordFilter::excluding("1x")).unwrap_err();
    assert!(matches!(err, RecordError::Missing { .. }));
}

#[test]
fn com_translation_reads_labeled_third_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m1_L.com.txt");
    fs::write(&path, "center of mass\n1 2 3\ntranslation: 4.5 -6.0 7.25\n").unwrap();
    let t = read_com_translation(&path).unwrap();
    assert_eq!(t, vector![4.5, -6.0, 7.25]);
}

#[test]
fn com_translation_rejects_short_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m1_L.com.txt");
    fs::write(&path, "only\ntwo lines\n").unwrap();
    let err = read_com_translation(&path).unwrap_err();
    assert!(matches!(err, RecordError::Malformed { .. }));
}

#[test]
fn center_translation_reads_first_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m1_L.center.txt");
    fs::write(&path, "-1.0 0.5 2.0\n").unwrap();
    let t = read_center_translation(&path).unwrap();
    assert_eq!(t, vector![-1.0, 0.5, 2.0]);
}

#[test]
fn vec3_with_wrong_arity_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m1_L.center.txt");
    fs::write(&path, "1.0 2.0\n").unwrap();
    let err = read_center_translation(&path).unwrap_err();
    assert!(matches!(err, RecordError::Malformed { .. }));
}

#[test]
fn rigid_matrix_parses_row_major() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m1_L.transform.txt");
    fs::write(
        &path,
        "1 0 0 10\n0 1 0 20\n0 0 1 30\n0 0 0 1\n",
    )
    .unwrap();
    let m = read_rigid_matrix(&path).unwrap();
    assert_eq!(m[(0, 3)], 10.0);
    assert_eq!(m[(1, 3)], 20.0);
    assert_eq!(m[(2, 3)], 30.0);
    assert_eq!(m[(3, 3)], 1.0);
    assert_eq!(m[(1, 1)], 1.0);
}

#[test]
fn rigid_matrix_rejects_bad_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m1_L.transform.txt");
    fs::write(&path, "1 0 0\n0 1 0\n0 0 1\n").unwrap();
    let err = read_rigid_matrix(&path).unwrap_err();
    assert!(matches!(err, RecordError::Malformed { .. }));

    fs::write(&path, "1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 x 1\n").unwrap();
    let err = read_rigid_matrix(&path).unwrap_err();
    assert!(matches!(err, RecordError::Malformed { .. }));
}
