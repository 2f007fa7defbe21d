//! Camera backed by a precomputed geometry cube.
//!
//! Band layout: phase, incidence, emission, then optionally local incidence
//! and local emission. A special phase value marks the pixel off target.

use crate::geometry::{Angles, Camera, GeometryError, Pixel};
use cube::{is_special, Cube};
use std::path::Path;

pub struct GeometryCubeCamera {
    planes: Cube,
}

impl GeometryCubeCamera {
    const PHASE: usize = 0;
    const INCIDENCE: usize = 1;
    const EMISSION: usize = 2;
    const LOCAL_INCIDENCE: usize = 3;
    const LOCAL_EMISSION: usize = 4;

    pub fn new(planes: Cube) -> Result<Self, GeometryError> {
        let bands = planes.size().bands;
        if bands < 3 {
            return Err(GeometryError::GeometryCubeBands { bands });
        }
        Ok(Self { planes })
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let planes = Cube::load_from_file(path)?;
        Ok(Self::new(planes)?)
    }

    pub fn has_local_angles(&self) -> bool {
        self.planes.size().bands > Self::LOCAL_EMISSION
    }

    fn value(&self, band: usize, pixel: Pixel) -> Option<f64> {
        self.planes
            .pixel(band, pixel.sample, pixel.line)
            .filter(|v| !is_special(*v))
    }
}

impl Camera for GeometryCubeCamera {
    fn angles(&self, pixel: Pixel) -> Option<Angles> {
        let phase = self.value(Self::PHASE, pixel)?;
        Some(Angles::new(
            phase,
            self.value(Self::INCIDENCE, pixel)?,
            self.value(Self::EMISSION, pixel)?,
        ))
    }

    fn local_angles(&self, pixel: Pixel) -> Option<(f64, f64)> {
        if !self.has_local_angles() {
            return None;
        }
        Some((
            self.value(Self::LOCAL_INCIDENCE, pixel)?,
            self.value(Self::LOCAL_EMISSION, pixel)?,
        ))
    }
}
