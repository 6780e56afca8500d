use std::fs;
use std::path::Path;

use nalgebra::{Matrix4, Vector3};

use super::RecordError;

/// Label written by the center-of-mass stage in front of its offset.
const COM_LABEL: &str = "translation:";

fn malformed(path: &Path, reason: impl Into<String>) -> RecordError {
    RecordError::Malformed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn parse_vec3(path: &Path, line: &str) -> Result<Vector3<f64>, RecordError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(malformed(
            path,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    }
    let mut v = Vector3::zeros();
    for (i, field) in fields.iter().enumerate() {
        v[i] = field
            .parse::<f64>()
            .map_err(|_| malformed(path, format!("not a float: '{field}'")))?;
    }
    Ok(v)
}

/// Center-of-mass translation: third line of the record, after the
/// `translation:` label.
pub fn read_com_translation(path: &Path) -> Result<Vector3<f64>, RecordError> {
    let text = fs::read_to_string(path)?;
    let line = text
        .lines()
        .nth(2)
        .ok_or_else(|| malformed(path, "fewer than 3 lines"))?;
    parse_vec3(path, &line.replace(COM_LABEL, ""))
}

/// Re-centering translation: bare 3-vector on the first line.
pub fn read_center_translation(path: &Path) -> Result<Vector3<f64>, RecordError> {
    let text = fs::read_to_string(path)?;
    let line = text
        .lines()
        .next()
        .ok_or_else(|| malformed(path, "empty file"))?;
    parse_vec3(path, line)
}

/// Rigid-alignment matrix: 4 lines of 4 whitespace-separated floats.
pub fn read_rigid_matrix(path: &Path) -> Result<Matrix4<f64>, RecordError> {
    let text = fs::read_to_string(path)?;
    let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if rows.len() != 4 {
        return Err(malformed(
            path,
            format!("expected 4 rows, found {}", rows.len()),
        ));
    }
    let mut values = [0.0f64; 16];
    for (r, row) in rows.iter().enumerate() {
        let fields: Vec<&str> = row.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(malformed(
                path,
                format!("row {} has {} fields, expected 4", r, fields.len()),
            ));
        }
        for (c, field) in fields.iter().enumerate() {
            values[r * 4 + c] = field
                .parse::<f64>()
                .map_err(|_| malformed(path, format!("not a float: '{field}'")))?;
        }
    }
    Ok(Matrix4::from_row_slice(&values))
}
