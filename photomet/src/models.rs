//! Reference numeric models.
//!
//! Covers the closed-form surface functions and ALBEDO normalization, enough
//! to run the tool end to end. Variants outside this set are reported as not
//! linked when the engine is built.

use crate::catalog::ModelKind;
use crate::config::ResolvedConfiguration;
use crate::engine::{Correction, ModelError, ModelInput, ModelLibrary, PhotometryModel};
use crate::resolver::ModelSpec;

/// Closed-form photometric surface functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceFunction {
    Lambert,
    LommelSeeliger,
    Minnaert { k: f64 },
    LunarLambert { l: f64 },
}

impl SurfaceFunction {
    fn from_spec(spec: &ModelSpec) -> Result<Self, ModelError> {
        match spec.name.as_str() {
            "LAMBERT" => Ok(Self::Lambert),
            "LOMMELSEELIGER" => Ok(Self::LommelSeeliger),
            "MINNAERT" => Ok(Self::Minnaert {
                k: number(spec, "K")?,
            }),
            "LUNARLAMBERT" => Ok(Self::LunarLambert {
                l: number(spec, "L")?,
            }),
            _ => Err(not_linked(spec)),
        }
    }

    /// Relative surface brightness; angles in degrees
    pub fn albedo(&self, _phase: f64, incidence: f64, emission: f64) -> f64 {
        let mu0 = incidence.to_radians().cos();
        let mu = emission.to_radians().cos();
        if mu0 <= 0.0 {
            return 0.0;
        }
        match *self {
            Self::Lambert => mu0,
            Self::LommelSeeliger => {
                if mu <= 0.0 {
                    0.0
                } else {
                    2.0 * mu0 / (mu0 + mu)
                }
            }
            Self::Minnaert { k } => {
                if mu <= 0.0 {
                    0.0
                } else {
                    mu0.powf(k) * mu.powf(k - 1.0)
                }
            }
            Self::LunarLambert { l } => 2.0 * l * mu0 / (mu0 + mu) + (1.0 - l) * mu0,
        }
    }
}

/// ALBEDO normalization over a surface function.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbedoNormalization {
    surface: SurfaceFunction,
    thresh: f64,
    albedo: f64,
    /// Surface brightness at the reference geometry
    psurfref: f64,
}

impl AlbedoNormalization {
    pub fn new(surface: SurfaceFunction, incref: f64, thresh: f64, albedo: f64) -> Self {
        Self {
            surface,
            thresh,
            albedo,
            psurfref: surface.albedo(incref, incref, 0.0),
        }
    }
}

impl PhotometryModel for AlbedoNormalization {
    fn compute(&self, input: &ModelInput) -> Result<Correction, ModelError> {
        let psurf = self
            .surface
            .albedo(input.phase, input.dem_incidence, input.dem_emission);
        if self.psurfref > psurf * self.thresh {
            return Err(ModelError::Numeric {
                model: "ALBEDO".to_string(),
                reason: format!(
                    "surface brightness {psurf} below threshold for reference {}",
                    self.psurfref
                ),
            });
        }
        if self.albedo == 0.0 {
            return Err(ModelError::Numeric {
                model: "ALBEDO".to_string(),
                reason: "ALBEDO is zero".to_string(),
            });
        }
        Ok(Correction::new(self.psurfref / (psurf * self.albedo), 0.0))
    }
}

/// Built-in library of reference models.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceLibrary;

impl ModelLibrary for ReferenceLibrary {
    fn instantiate(
        &self,
        config: &ResolvedConfiguration,
    ) -> Result<Box<dyn PhotometryModel>, ModelError> {
        if let Some(atm) = config.atmospheric() {
            return Err(not_linked(atm));
        }
        let surface = SurfaceFunction::from_spec(config.photometric())?;
        let norm = config.normalization();
        if norm.name != "ALBEDO" {
            return Err(not_linked(norm));
        }
        log::debug!("Linked {:?} surface with ALBEDO normalization", surface);
        Ok(Box::new(AlbedoNormalization::new(
            surface,
            number(norm, "INCREF")?,
            number(norm, "THRESH")?,
            number(norm, "ALBEDO")?,
        )))
    }
}

fn number(spec: &ModelSpec, parameter: &str) -> Result<f64, ModelError> {
    spec.get_f64(parameter).ok_or_else(|| ModelError::Numeric {
        model: spec.name.clone(),
        reason: format!("missing numeric parameter {parameter}"),
    })
}

fn not_linked(spec: &ModelSpec) -> ModelError {
    ModelError::NotLinked {
        kind: spec.kind,
        name: spec.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolvedModels;
    use approx::assert_relative_eq;

    fn spec(kind: ModelKind, name: &str, params: &[(&str, &str)]) -> ModelSpec {
        ModelSpec {
            kind,
            name: name.to_string(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn albedo_config(photometric: ModelSpec) -> ResolvedConfiguration {
        ResolvedConfiguration::new(
            ResolvedModels {
                photometric,
                normalization: spec(
                    ModelKind::Normalization,
                    "ALBEDO",
                    &[("INCREF", "30"), ("THRESH", "30"), ("ALBEDO", "0.5")],
                ),
                atmospheric: None,
            },
            1.0,
        )
    }

    fn input(incidence: f64, emission: f64) -> ModelInput {
        ModelInput {
            phase: incidence + emission,
            incidence,
            emission,
            dem_incidence: incidence,
            dem_emission: emission,
            dn: 1.0,
            wavelength: 1.0,
        }
    }

    #[test]
    fn test_surface_functions() {
        assert_relative_eq!(SurfaceFunction::Lambert.albedo(0.0, 60.0, 0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(
            SurfaceFunction::LommelSeeliger.albedo(0.0, 60.0, 0.0),
            2.0 * 0.5 / 1.5,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            SurfaceFunction::Minnaert { k: 1.0 }.albedo(0.0, 60.0, 45.0),
            0.5,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            SurfaceFunction::LunarLambert { l: 0.0 }.albedo(0.0, 60.0, 20.0),
            0.5,
            epsilon = 1e-12
        );
        assert_eq!(SurfaceFunction::Lambert.albedo(0.0, 95.0, 0.0), 0.0);
    }

    #[test]
    fn test_albedo_at_reference_geometry_divides_by_albedo() {
        let model = ReferenceLibrary
            .instantiate(&albedo_config(spec(ModelKind::Photometric, "LAMBERT", &[])))
            .unwrap();
        let correction = model.compute(&input(30.0, 0.0)).unwrap();
        assert_relative_eq!(correction.multiplier, 2.0, epsilon = 1e-12);
        assert_eq!(correction.base, 0.0);
    }

    #[test]
    fn test_albedo_scales_to_reference() {
        let model = ReferenceLibrary
            .instantiate(&albedo_config(spec(ModelKind::Photometric, "LAMBERT", &[])))
            .unwrap();
        let correction = model.compute(&input(60.0, 0.0)).unwrap();
        let expected = 30f64.to_radians().cos() / (0.5 * 0.5);
        assert_relative_eq!(correction.multiplier, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_albedo_threshold_fails() {
        let model = AlbedoNormalization::new(SurfaceFunction::Lambert, 30.0, 1.0, 0.5);
        assert!(model.compute(&input(60.0, 0.0)).is_err());
        assert!(model.compute(&input(20.0, 0.0)).is_ok());
    }

    #[test]
    fn test_minnaert_parameter_is_used() {
        let model = ReferenceLibrary
            .instantiate(&albedo_config(spec(
                ModelKind::Photometric,
                "MINNAERT",
                &[("K", "0.5")],
            )))
            .unwrap();
        assert!(model.compute(&input(45.0, 30.0)).is_ok());
    }

    #[test]
    fn test_unlinked_variants() {
        let err = ReferenceLibrary
            .instantiate(&albedo_config(spec(ModelKind::Photometric, "HAPKEHEN", &[])))
            .err();
        assert_eq!(
            err,
            Some(ModelError::NotLinked {
                kind: ModelKind::Photometric,
                name: "HAPKEHEN".to_string()
            })
        );

        let mut config = albedo_config(spec(ModelKind::Photometric, "LAMBERT", &[]));
        config.models.normalization = spec(ModelKind::Normalization, "SHADE", &[]);
        assert!(matches!(
            ReferenceLibrary.instantiate(&config).err(),
            Some(ModelError::NotLinked { kind: ModelKind::Normalization, .. })
        ));
    }
}
