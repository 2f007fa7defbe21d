//! Per-pixel illumination geometry.
//!
//! A [`GeometryProvider`] answers, for one pixel, the phase, incidence and
//! emission angles (degrees) against the ellipsoid together with the local
//! terrain incidence and emission. `None` means the pixel does not see the
//! target at all, which is different from a sample that is present but
//! unusable (`valid == false`).
//!
//! The strategy is picked once per run by [`build_provider`].

use crate::config::AngleSource;
use cube::{is_special, Cube, CubeSize, Label, NULL8};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Angle source {angle_source} needs a camera")]
    CameraRequired { angle_source: AngleSource },

    #[error("The image center (sample {sample}, line {line}) does not intersect the target")]
    CenterOffTarget { sample: usize, line: usize },

    #[error("Label keyword {keyword} is missing or not numeric")]
    MissingLabelKeyword { keyword: &'static str },

    #[error("{plane} backplane is {found}, expected {expected} with 1 or {bands} band(s)")]
    BackplaneMismatch {
        plane: &'static str,
        expected: CubeSize,
        found: CubeSize,
        bands: usize,
    },

    #[error("Geometry cube has {bands} band(s), needs at least 3 (phase, incidence, emission)")]
    GeometryCubeBands { bands: usize },
}

/// Pixel position: 1-based sample and line, 0-based band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub sample: usize,
    pub line: usize,
    pub band: usize,
}

impl Pixel {
    pub fn new(sample: usize, line: usize, band: usize) -> Self {
        Self { sample, line, band }
    }
}

/// Phase, incidence and emission angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    pub phase: f64,
    pub incidence: f64,
    pub emission: f64,
}

impl Angles {
    pub fn new(phase: f64, incidence: f64, emission: f64) -> Self {
        Self {
            phase,
            incidence,
            emission,
        }
    }

    fn any_special(&self) -> bool {
        is_special(self.phase) || is_special(self.incidence) || is_special(self.emission)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySample {
    pub phase: f64,
    pub incidence: f64,
    pub emission: f64,
    pub dem_incidence: f64,
    pub dem_emission: f64,
    pub valid: bool,
}

impl GeometrySample {
    /// Valid sample whose local angles equal the ellipsoid ones
    pub fn from_angles(angles: Angles) -> Self {
        Self {
            phase: angles.phase,
            incidence: angles.incidence,
            emission: angles.emission,
            dem_incidence: angles.incidence,
            dem_emission: angles.emission,
            valid: true,
        }
    }

    pub fn invalid(angles: Angles) -> Self {
        Self {
            valid: false,
            ..Self::from_angles(angles)
        }
    }

    /// Incidence/emission pair used for limits and correction
    pub fn surface_angles(&self, use_dem: bool) -> (f64, f64) {
        if use_dem {
            (self.dem_incidence, self.dem_emission)
        } else {
            (self.incidence, self.emission)
        }
    }
}

/// External viewing-geometry engine.
///
/// Implementations are queried concurrently from many lines at once.
pub trait Camera: Sync {
    /// Ellipsoid angles at the pixel, `None` when it misses the target
    fn angles(&self, pixel: Pixel) -> Option<Angles>;

    /// Local terrain `(incidence, emission)`, `None` when unavailable
    fn local_angles(&self, pixel: Pixel) -> Option<(f64, f64)>;

    fn is_on_target(&self, pixel: Pixel) -> bool {
        self.angles(pixel).is_some()
    }
}

pub trait GeometryProvider: Sync {
    fn sample(&self, pixel: Pixel) -> Option<GeometrySample>;
}

/// Camera angles against the ellipsoid.
pub struct EllipsoidProvider<'a> {
    camera: &'a dyn Camera,
}

impl GeometryProvider for EllipsoidProvider<'_> {
    fn sample(&self, pixel: Pixel) -> Option<GeometrySample> {
        self.camera.angles(pixel).map(GeometrySample::from_angles)
    }
}

/// Ellipsoid angles plus local terrain angles; a failed local query makes the
/// sample invalid.
pub struct DemProvider<'a> {
    camera: &'a dyn Camera,
}

impl GeometryProvider for DemProvider<'_> {
    fn sample(&self, pixel: Pixel) -> Option<GeometrySample> {
        let angles = self.camera.angles(pixel)?;
        Some(match self.camera.local_angles(pixel) {
            Some((dem_incidence, dem_emission)) => GeometrySample {
                dem_incidence,
                dem_emission,
                ..GeometrySample::from_angles(angles)
            },
            None => GeometrySample::invalid(angles),
        })
    }
}

/// One angle triple for every pixel, optionally masked by a camera's
/// on-target test.
pub struct FixedAngleProvider<'a> {
    angles: Angles,
    camera: Option<&'a dyn Camera>,
}

impl<'a> FixedAngleProvider<'a> {
    pub fn new(angles: Angles, camera: Option<&'a dyn Camera>) -> Self {
        Self { angles, camera }
    }
}

impl GeometryProvider for FixedAngleProvider<'_> {
    fn sample(&self, pixel: Pixel) -> Option<GeometrySample> {
        if let Some(camera) = self.camera {
            if !camera.is_on_target(pixel) {
                return None;
            }
        }
        Some(GeometrySample::from_angles(self.angles))
    }
}

/// Source of one backplane angle.
#[derive(Debug, Clone, Copy)]
pub enum AngleInput<'a> {
    Constant(f64),
    Plane(&'a Cube),
}

impl AngleInput<'_> {
    fn value(&self, pixel: Pixel) -> f64 {
        match self {
            AngleInput::Constant(v) => *v,
            AngleInput::Plane(cube) => {
                let band = if cube.size().bands == 1 { 0 } else { pixel.band };
                cube.pixel(band, pixel.sample, pixel.line)
                    .unwrap_or(NULL8)
            }
        }
    }
}

/// Angles read from per-pixel planes or run-wide constants.
pub struct BackplaneProvider<'a> {
    phase: AngleInput<'a>,
    incidence: AngleInput<'a>,
    emission: AngleInput<'a>,
    camera: Option<&'a dyn Camera>,
}

impl GeometryProvider for BackplaneProvider<'_> {
    fn sample(&self, pixel: Pixel) -> Option<GeometrySample> {
        if let Some(camera) = self.camera {
            if !camera.is_on_target(pixel) {
                return None;
            }
        }
        let angles = Angles::new(
            self.phase.value(pixel),
            self.incidence.value(pixel),
            self.emission.value(pixel),
        );
        if angles.any_special() {
            Some(GeometrySample::invalid(angles))
        } else {
            Some(GeometrySample::from_angles(angles))
        }
    }
}

/// Everything a strategy may draw on.
#[derive(Clone, Copy, Default)]
pub struct GeometryInputs<'a> {
    pub camera: Option<&'a dyn Camera>,
    /// User angles for CENTER_FROM_USER, and backplane constants
    pub user_angles: Option<Angles>,
    pub phase_plane: Option<&'a Cube>,
    pub incidence_plane: Option<&'a Cube>,
    pub emission_plane: Option<&'a Cube>,
}

fn check_plane(
    plane: &'static str,
    cube: &Cube,
    image: CubeSize,
) -> Result<(), GeometryError> {
    let found = cube.size();
    let footprint_ok = found.samples == image.samples && found.lines == image.lines;
    if footprint_ok && (found.bands == 1 || found.bands == image.bands) {
        Ok(())
    } else {
        Err(GeometryError::BackplaneMismatch {
            plane,
            expected: image,
            found,
            bands: image.bands,
        })
    }
}

fn label_angle(label: &Label, keyword: &'static str) -> Result<f64, GeometryError> {
    label
        .find_f64(keyword)
        .ok_or(GeometryError::MissingLabelKeyword { keyword })
}

/// Build the provider for an angle source.
///
/// `image` and `label` describe the cube being corrected.
pub fn build_provider<'a>(
    source: AngleSource,
    inputs: GeometryInputs<'a>,
    image: CubeSize,
    label: &Label,
) -> Result<Box<dyn GeometryProvider + 'a>, GeometryError> {
    let camera = || {
        inputs
            .camera
            .ok_or(GeometryError::CameraRequired { angle_source: source })
    };
    let user = inputs.user_angles.unwrap_or(Angles::new(0.0, 0.0, 0.0));

    let provider: Box<dyn GeometryProvider + 'a> = match source {
        AngleSource::Ellipsoid => Box::new(EllipsoidProvider { camera: camera()? }),
        AngleSource::Dem => Box::new(DemProvider { camera: camera()? }),
        AngleSource::CenterFromImage => {
            let camera = camera()?;
            let center = Pixel::new((image.samples / 2).max(1), (image.lines / 2).max(1), 0);
            let angles = camera.angles(center).ok_or(GeometryError::CenterOffTarget {
                sample: center.sample,
                line: center.line,
            })?;
            Box::new(FixedAngleProvider::new(angles, Some(camera)))
        }
        AngleSource::CenterFromLabel => {
            let angles = Angles::new(
                label_angle(label, "PhaseAngle")?,
                label_angle(label, "IncidenceAngle")?,
                label_angle(label, "EmissionAngle")?,
            );
            Box::new(FixedAngleProvider::new(angles, None))
        }
        AngleSource::CenterFromUser => Box::new(FixedAngleProvider::new(user, None)),
        AngleSource::Backplane => {
            let input = |name: &'static str, plane: Option<&'a Cube>, constant: f64| {
                match plane {
                    Some(cube) => check_plane(name, cube, image).map(|_| AngleInput::Plane(cube)),
                    None => Ok(AngleInput::Constant(constant)),
                }
            };
            Box::new(BackplaneProvider {
                phase: input("Phase", inputs.phase_plane, user.phase)?,
                incidence: input("Incidence", inputs.incidence_plane, user.incidence)?,
                emission: input("Emission", inputs.emission_plane, user.emission)?,
                camera: inputs.camera,
            })
        }
    };

    log::info!("Angle source: {source}");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube::{LabelGroup, NULL8};

    /// Camera that sees the target only in sample columns `<= edge`.
    struct EdgeCamera {
        edge: usize,
        local: bool,
    }

    impl Camera for EdgeCamera {
        fn angles(&self, pixel: Pixel) -> Option<Angles> {
            (pixel.sample <= self.edge).then(|| {
                Angles::new(pixel.sample as f64, pixel.line as f64, pixel.band as f64)
            })
        }

        fn local_angles(&self, pixel: Pixel) -> Option<(f64, f64)> {
            self.local
                .then(|| (pixel.line as f64 + 0.5, pixel.band as f64 + 0.5))
        }
    }

    fn build<'a>(
        source: AngleSource,
        inputs: GeometryInputs<'a>,
        label: &Label,
    ) -> Result<Box<dyn GeometryProvider + 'a>, GeometryError> {
        build_provider(source, inputs, CubeSize::new(4, 4, 2), label)
    }

    #[test]
    fn test_ellipsoid_uses_camera() {
        let camera = EdgeCamera { edge: 2, local: true };
        let inputs = GeometryInputs {
            camera: Some(&camera),
            ..Default::default()
        };
        let provider = build(AngleSource::Ellipsoid, inputs, &Label::new()).unwrap();
        let s = provider.sample(Pixel::new(2, 3, 1)).unwrap();
        assert_eq!((s.phase, s.incidence, s.emission), (2.0, 3.0, 1.0));
        assert_eq!((s.dem_incidence, s.dem_emission), (3.0, 1.0));
        assert!(s.valid);
        assert!(provider.sample(Pixel::new(3, 1, 0)).is_none());
    }

    #[test]
    fn test_camera_modes_require_camera() {
        for source in [
            AngleSource::Ellipsoid,
            AngleSource::Dem,
            AngleSource::CenterFromImage,
        ] {
            let err = build(source, GeometryInputs::default(), &Label::new()).err();
            assert_eq!(
                err,
                Some(GeometryError::CameraRequired {
                    angle_source: source
                })
            );
        }
    }

    #[test]
    fn test_dem_local_angles_and_failure() {
        let camera = EdgeCamera { edge: 4, local: true };
        let inputs = GeometryInputs {
            camera: Some(&camera),
            ..Default::default()
        };
        let provider = build(AngleSource::Dem, inputs, &Label::new()).unwrap();
        let s = provider.sample(Pixel::new(1, 2, 0)).unwrap();
        assert_eq!((s.dem_incidence, s.dem_emission), (2.5, 0.5));
        assert_eq!(s.surface_angles(true), (2.5, 0.5));
        assert_eq!(s.surface_angles(false), (2.0, 0.0));

        let camera = EdgeCamera { edge: 4, local: false };
        let inputs = GeometryInputs {
            camera: Some(&camera),
            ..Default::default()
        };
        let provider = build(AngleSource::Dem, inputs, &Label::new()).unwrap();
        assert!(!provider.sample(Pixel::new(1, 2, 0)).unwrap().valid);
    }

    #[test]
    fn test_center_from_image() {
        let camera = EdgeCamera { edge: 2, local: false };
        let inputs = GeometryInputs {
            camera: Some(&camera),
            ..Default::default()
        };
        let provider = build(AngleSource::CenterFromImage, inputs, &Label::new()).unwrap();
        let s = provider.sample(Pixel::new(1, 4, 1)).unwrap();
        assert_eq!((s.phase, s.incidence, s.emission), (2.0, 2.0, 0.0));
        assert!(provider.sample(Pixel::new(4, 4, 1)).is_none());

        let camera = EdgeCamera { edge: 1, local: false };
        let inputs = GeometryInputs {
            camera: Some(&camera),
            ..Default::default()
        };
        let err = build(AngleSource::CenterFromImage, inputs, &Label::new()).err();
        assert_eq!(err, Some(GeometryError::CenterOffTarget { sample: 2, line: 2 }));
    }

    #[test]
    fn test_center_from_label() {
        let mut label = Label::new();
        label.add_group(
            LabelGroup::new("Instrument")
                .with("PhaseAngle", 40.0)
                .with("IncidenceAngle", 30.0),
        );
        let err = build(AngleSource::CenterFromLabel, GeometryInputs::default(), &label).err();
        assert_eq!(
            err,
            Some(GeometryError::MissingLabelKeyword {
                keyword: "EmissionAngle"
            })
        );

        label.add_group(LabelGroup::new("Mapping").with("EmissionAngle", 10.0));
        let provider = build(AngleSource::CenterFromLabel, GeometryInputs::default(), &label).unwrap();
        let s = provider.sample(Pixel::new(3, 3, 0)).unwrap();
        assert_eq!((s.phase, s.incidence, s.emission), (40.0, 30.0, 10.0));
    }

    #[test]
    fn test_center_from_user() {
        let inputs = GeometryInputs {
            user_angles: Some(Angles::new(50.0, 45.0, 5.0)),
            ..Default::default()
        };
        let provider = build(AngleSource::CenterFromUser, inputs, &Label::new()).unwrap();
        let s = provider.sample(Pixel::new(1, 1, 1)).unwrap();
        assert_eq!((s.dem_incidence, s.dem_emission), (45.0, 5.0));
    }

    #[test]
    fn test_backplane_planes_and_constants() {
        let mut incidence = Cube::new(CubeSize::new(4, 4, 1));
        incidence.data.fill(60.0);
        incidence.data[[0, 1, 2]] = NULL8;
        let inputs = GeometryInputs {
            user_angles: Some(Angles::new(30.0, 0.0, 12.0)),
            incidence_plane: Some(&incidence),
            ..Default::default()
        };
        let provider = build(AngleSource::Backplane, inputs, &Label::new()).unwrap();

        let s = provider.sample(Pixel::new(1, 1, 1)).unwrap();
        assert!(s.valid);
        assert_eq!((s.phase, s.incidence, s.emission), (30.0, 60.0, 12.0));
        assert!(!provider.sample(Pixel::new(3, 2, 0)).unwrap().valid);
    }

    #[test]
    fn test_backplane_masked_by_camera() {
        let camera = EdgeCamera { edge: 1, local: false };
        let inputs = GeometryInputs {
            camera: Some(&camera),
            ..Default::default()
        };
        let provider = build(AngleSource::Backplane, inputs, &Label::new()).unwrap();
        assert!(provider.sample(Pixel::new(1, 1, 0)).is_some());
        assert!(provider.sample(Pixel::new(2, 1, 0)).is_none());
    }

    #[test]
    fn test_backplane_dimension_mismatch() {
        let wrong_footprint = Cube::new(CubeSize::new(3, 4, 1));
        let inputs = GeometryInputs {
            emission_plane: Some(&wrong_footprint),
            ..Default::default()
        };
        let err = build(AngleSource::Backplane, inputs, &Label::new()).err();
        assert!(matches!(
            err,
            Some(GeometryError::BackplaneMismatch { plane: "Emission", .. })
        ));

        let wrong_bands = Cube::new(CubeSize::new(4, 4, 3));
        let inputs = GeometryInputs {
            phase_plane: Some(&wrong_bands),
            ..Default::default()
        };
        assert!(build(AngleSource::Backplane, inputs, &Label::new()).is_err());
    }
}
