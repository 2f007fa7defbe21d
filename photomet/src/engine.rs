//! Correction engine: resolved configuration plus a linked numeric model.
//!
//! The numeric models sit behind [`PhotometryModel`]. The engine picks the
//! surface angle pair, attaches the run wavelength and turns any model
//! failure into "no correction" for the pixel.

use crate::catalog::ModelKind;
use crate::config::ResolvedConfiguration;
use crate::geometry::GeometrySample;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{model} model failed: {reason}")]
    Numeric { model: String, reason: String },

    #[error("The {name} {kind} model is not available in this build")]
    NotLinked { kind: ModelKind, name: String },
}

/// Everything a numeric model sees for one pixel. Angles are degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInput {
    pub phase: f64,
    pub incidence: f64,
    pub emission: f64,
    /// Surface incidence handed to the model (local or ellipsoid)
    pub dem_incidence: f64,
    /// Surface emission handed to the model (local or ellipsoid)
    pub dem_emission: f64,
    pub dn: f64,
    pub wavelength: f64,
}

/// Linear correction `dn * multiplier + base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub multiplier: f64,
    pub base: f64,
}

impl Correction {
    pub fn new(multiplier: f64, base: f64) -> Self {
        Self { multiplier, base }
    }

    #[inline]
    pub fn apply(&self, dn: f64) -> f64 {
        dn * self.multiplier + self.base
    }
}

/// A linked photometric correction.
pub trait PhotometryModel: Send + Sync {
    fn compute(&self, input: &ModelInput) -> Result<Correction, ModelError>;
}

/// Builds a [`PhotometryModel`] for a resolved configuration.
pub trait ModelLibrary {
    fn instantiate(
        &self,
        config: &ResolvedConfiguration,
    ) -> Result<Box<dyn PhotometryModel>, ModelError>;
}

pub struct CorrectionEngine {
    config: ResolvedConfiguration,
    model: Box<dyn PhotometryModel>,
    use_dem: bool,
}

impl CorrectionEngine {
    /// Link the configured models from `library`.
    ///
    /// # Errors
    /// `ModelError::NotLinked` when the library has no implementation for a
    /// resolved variant.
    pub fn new(
        config: ResolvedConfiguration,
        library: &dyn ModelLibrary,
        use_dem: bool,
    ) -> Result<Self, ModelError> {
        let model = library.instantiate(&config)?;
        Ok(Self::with_model(config, model, use_dem))
    }

    pub fn with_model(
        config: ResolvedConfiguration,
        model: Box<dyn PhotometryModel>,
        use_dem: bool,
    ) -> Self {
        Self {
            config,
            model,
            use_dem,
        }
    }

    pub fn config(&self) -> &ResolvedConfiguration {
        &self.config
    }

    pub fn use_dem(&self) -> bool {
        self.use_dem
    }

    /// Correction for one pixel, `None` when the model cannot produce one
    pub fn compute(&self, sample: &GeometrySample, dn: f64) -> Option<Correction> {
        let (dem_incidence, dem_emission) = sample.surface_angles(self.use_dem);
        let input = ModelInput {
            phase: sample.phase,
            incidence: sample.incidence,
            emission: sample.emission,
            dem_incidence,
            dem_emission,
            dn,
            wavelength: self.config.wavelength,
        };
        self.model.compute(&input).ok()
    }
}
