//! Run configuration: resolved models plus per-run processing options.

use crate::document::ConfigDocument;
use crate::resolver::{ModelSpec, ResolvedModels};
use cube::Label;

/// Wavelength used when the cube label carries no band center
pub const DEFAULT_WAVELENGTH: f64 = 1.0;

/// First `BandBin/Center` value of a cube label, or [`DEFAULT_WAVELENGTH`]
pub fn wavelength_from_label(label: &Label) -> f64 {
    label
        .group_f64("BandBin", "Center")
        .unwrap_or(DEFAULT_WAVELENGTH)
}

/// Immutable model configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    pub models: ResolvedModels,
    pub wavelength: f64,
}

impl ResolvedConfiguration {
    pub fn new(models: ResolvedModels, wavelength: f64) -> Self {
        Self { models, wavelength }
    }

    /// Take the wavelength from the input cube's label
    pub fn for_label(models: ResolvedModels, label: &Label) -> Self {
        Self::new(models, wavelength_from_label(label))
    }

    pub fn photometric(&self) -> &ModelSpec {
        &self.models.photometric
    }

    pub fn normalization(&self) -> &ModelSpec {
        &self.models.normalization
    }

    pub fn atmospheric(&self) -> Option<&ModelSpec> {
        self.models.atmospheric.as_ref()
    }

    /// Export as a document usable as a prior configuration
    pub fn to_document(&self) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for spec in self.models.iter() {
            doc.add_definition(spec.kind, spec.to_group());
        }
        doc
    }
}

/// Angle limits applied to every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Degrees; pixels with a larger incidence are nulled
    pub max_incidence: f64,
    /// Degrees; pixels with a larger emission are nulled
    pub max_emission: f64,
    /// Compare and correct with the local (terrain) angles
    pub use_dem: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_incidence: 90.0,
            max_emission: 90.0,
            use_dem: false,
        }
    }
}

/// Where per-pixel illumination angles come from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AngleSource {
    /// Camera angles against the target ellipsoid
    #[default]
    Ellipsoid,
    /// Ellipsoid angles plus local terrain angles
    Dem,
    /// One angle triple from the camera at the image center
    #[value(alias = "center_from_image")]
    CenterFromImage,
    /// One angle triple from the cube label
    #[value(alias = "center_from_label")]
    CenterFromLabel,
    /// One angle triple supplied by the user
    #[value(alias = "center_from_user")]
    CenterFromUser,
    /// Per-pixel angle planes or constants
    Backplane,
}

impl AngleSource {
    /// Whether the strategy cannot run without a camera
    pub fn requires_camera(self) -> bool {
        matches!(
            self,
            AngleSource::Ellipsoid | AngleSource::Dem | AngleSource::CenterFromImage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelKind;
    use cube::LabelGroup;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn models() -> ResolvedModels {
        ResolvedModels {
            photometric: ModelSpec {
                kind: ModelKind::Photometric,
                name: "LAMBERT".to_string(),
                parameters: vec![],
            },
            normalization: ModelSpec {
                kind: ModelKind::Normalization,
                name: "ALBEDO".to_string(),
                parameters: vec![
                    ("INCREF".to_string(), "30".to_string()),
                    ("THRESH".to_string(), "30".to_string()),
                    ("ALBEDO".to_string(), "0.5".to_string()),
                ],
            },
            atmospheric: None,
        }
    }

    #[test]
    fn test_wavelength_from_band_center() {
        let mut label = Label::new();
        assert_eq!(wavelength_from_label(&label), 1.0);
        label.add_group(LabelGroup::new("BandBin").with("Center", json!([0.75, 0.9])));
        assert_eq!(wavelength_from_label(&label), 0.75);
        let config = ResolvedConfiguration::for_label(models(), &label);
        assert_eq!(config.wavelength, 0.75);
    }

    #[test]
    fn test_document_export() {
        let config = ResolvedConfiguration::new(models(), 1.0);
        let doc = config.to_document();
        assert_eq!(
            doc.definitions(ModelKind::Normalization)[0].get("INCREF"),
            Some("30")
        );
        assert_eq!(
            doc.definitions(ModelKind::Photometric)[0].model_name(ModelKind::Photometric),
            Some("LAMBERT")
        );
        assert!(doc.definitions(ModelKind::Atmospheric).is_empty());
    }

    #[test]
    fn test_angle_source_names() {
        assert_eq!(AngleSource::CenterFromImage.to_string(), "CENTER_FROM_IMAGE");
        assert_eq!(AngleSource::default(), AngleSource::Ellipsoid);
        let needing_camera: Vec<_> = AngleSource::iter().filter(|s| s.requires_camera()).collect();
        assert_eq!(
            needing_camera,
            [AngleSource::Ellipsoid, AngleSource::Dem, AngleSource::CenterFromImage]
        );
    }
}
