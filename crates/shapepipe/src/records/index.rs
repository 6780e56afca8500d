use std::fs;
use std::path::{Path, PathBuf};

use super::RecordError;

/// Substring filters applied on top of the sample-prefix match.
///
/// The grooming stages drop more than one record type into a directory; the
/// rigid stage in particular stores image-space and segmentation-space
/// matrices side by side, told apart only by an image-suffix marker in the
/// filename.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordFilter<'a> {
    /// Filename must also contain this substring.
    pub require: Option<&'a str>,
    /// Filename must not contain this substring.
    pub exclude: Option<&'a str>,
}

impl<'a> RecordFilter<'a> {
    #[inline]
    pub fn requiring(s: &'a str) -> Self {
        Self {
            require: Some(s),
            exclude: None,
        }
    }

    #[inline]
    pub fn excluding(s: &'a str) -> Self {
        Self {
            require: None,
            exclude: Some(s),
        }
    }

    fn accepts(&self, name: &str) -> bool {
        if let Some(req) = self.require {
            if !name.contains(req) {
                return false;
            }
        }
        if let Some(exc) = self.exclude {
            if name.contains(exc) {
                return false;
            }
        }
        true
    }
}

/// Filename index over one record directory, built from a single scan.
#[derive(Clone, Debug)]
pub struct RecordIndex {
    dir: PathBuf,
    entries: Vec<(String, PathBuf)>,
}

impl RecordIndex {
    /// Read the directory listing once. Entries are sorted by filename so
    /// lookups are deterministic regardless of filesystem order.
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self, RecordError> {
        let dir = dir.as_ref().to_path_buf();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if let Ok(name) = entry.file_name().into_string() {
                entries.push((name, entry.path()));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { dir, entries })
    }

    /// First filename containing `prefix` and passing `filter`.
    pub fn find(&self, prefix: &str, filter: RecordFilter<'_>) -> Result<&Path, RecordError> {
        self.entries
            .iter()
            .find(|(name, _)| name.contains(prefix) && filter.accepts(name))
            .map(|(_, path)| path.as_path())
            .ok_or_else(|| RecordError::Missing {
                prefix: prefix.to_string(),
                dir: self.dir.clone(),
            })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
