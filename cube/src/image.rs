//! In-memory image cube with JSON persistence.

use crate::label::Label;
use crate::size::CubeSize;
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading, saving or combining cubes
#[derive(Error, Debug)]
pub enum CubeError {
    #[error("Cube I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cube format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Cube dimensions {found} do not match expected {expected}")]
    DimensionMismatch { expected: CubeSize, found: CubeSize },
}

/// Image cube: pixel data shaped `(bands, lines, samples)` plus its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    #[serde(default)]
    pub label: Label,
    pub data: Array3<f64>,
}

impl Cube {
    /// Create a zero-filled cube with an empty label
    pub fn new(size: CubeSize) -> Self {
        Self {
            label: Label::new(),
            data: size.zeros(),
        }
    }

    pub fn size(&self) -> CubeSize {
        CubeSize::from_shape(self.data.dim())
    }

    /// Pixel value at 1-based sample/line in the given 0-based band
    pub fn pixel(&self, band: usize, sample: usize, line: usize) -> Option<f64> {
        if sample == 0 || line == 0 {
            return None;
        }
        self.data.get((band, line - 1, sample - 1)).copied()
    }

    /// Cube with the same label and dimensions, every pixel set to `value`
    pub fn like(&self, value: f64) -> Self {
        Self {
            label: self.label.clone(),
            data: self.size().filled(value),
        }
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), CubeError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json).map_err(|source| CubeError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CubeError> {
        let json = std::fs::read_to_string(path).map_err(|source| CubeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cube: Cube = serde_json::from_str(&json)?;
        log::debug!("Loaded cube {} from {}", cube.size(), path.display());
        Ok(cube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelGroup;
    use crate::special::NULL8;

    #[test]
    fn test_pixel_is_one_based() {
        let mut cube = Cube::new(CubeSize::new(3, 2, 1));
        cube.data[[0, 1, 2]] = 7.0;
        assert_eq!(cube.pixel(0, 3, 2), Some(7.0));
        assert_eq!(cube.pixel(0, 0, 1), None);
        assert_eq!(cube.pixel(0, 4, 1), None);
    }

    #[test]
    fn test_like_keeps_label_and_size() {
        let mut cube = Cube::new(CubeSize::new(2, 2, 2));
        cube.label.add_group(LabelGroup::new("BandBin").with("Center", 0.5));
        let nulls = cube.like(NULL8);
        assert_eq!(nulls.size(), cube.size());
        assert_eq!(nulls.label, cube.label);
        assert!(nulls.data.iter().all(|v| v.to_bits() == NULL8.to_bits()));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.json");

        let mut cube = Cube::new(CubeSize::new(4, 3, 2));
        cube.data[[1, 2, 3]] = 12.5;
        cube.data[[0, 0, 0]] = NULL8;
        cube.label.add_group(LabelGroup::new("BandBin").with("Center", 0.75));
        cube.save_to_file(&path).unwrap();

        let loaded = Cube::load_from_file(&path).unwrap();
        assert_eq!(loaded.size(), CubeSize::new(4, 3, 2));
        assert_eq!(loaded.data[[1, 2, 3]], 12.5);
        assert_eq!(loaded.data[[0, 0, 0]].to_bits(), NULL8.to_bits());
        assert_eq!(loaded.label.group_f64("BandBin", "Center"), Some(0.75));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Cube::load_from_file(Path::new("/nonexistent/cube.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cube.json"));
    }
}
