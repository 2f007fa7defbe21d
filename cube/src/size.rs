//! Cube dimensions

use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cube dimensions.
///
/// Data arrays built from a `CubeSize` are laid out `(bands, lines, samples)`,
/// so a single image line is a contiguous row of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeSize {
    /// Pixels per line
    pub samples: usize,
    /// Lines per band
    pub lines: usize,
    /// Number of bands
    pub bands: usize,
}

impl CubeSize {
    pub fn new(samples: usize, lines: usize, bands: usize) -> Self {
        Self {
            samples,
            lines,
            bands,
        }
    }

    /// Create an array of zeros with this size, shaped `(bands, lines, samples)`
    pub fn zeros(&self) -> Array3<f64> {
        Array3::zeros(self.shape())
    }

    /// Create an array filled with `value`
    pub fn filled(&self, value: f64) -> Array3<f64> {
        Array3::from_elem(self.shape(), value)
    }

    /// ndarray shape tuple `(bands, lines, samples)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.bands, self.lines, self.samples)
    }

    /// Build from an ndarray shape tuple `(bands, lines, samples)`
    pub fn from_shape(shape: (usize, usize, usize)) -> Self {
        Self {
            samples: shape.2,
            lines: shape.1,
            bands: shape.0,
        }
    }

    /// Total number of pixels across all bands
    pub fn pixel_count(&self) -> usize {
        self.samples * self.lines * self.bands
    }

    /// True when both cubes cover the same sample/line footprint
    pub fn same_footprint(&self, other: &CubeSize) -> bool {
        self.samples == other.samples && self.lines == other.lines
    }
}

impl fmt::Display for CubeSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}x{}", self.samples, self.lines, self.bands)
    }
}
