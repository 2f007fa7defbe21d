//! Photometric normalization of planetary image cubes.
//!
//! A run resolves three models (photometric, normalization and, for
//! atmosphere-coupled normalizations, atmospheric) from a prior configuration
//! document, explicitly entered parameters and an inline override string,
//! then rescales every valid pixel with the linked numeric model:
//!
//! - [`catalog`]: supported model variants and their parameters
//! - [`overrides`], [`document`]: the inline and document parameter sources
//! - [`resolver`]: precedence, validation and the prior-configuration helpers
//! - [`config_log`]: audit log of the parameters used
//! - [`geometry`], [`camera`]: per-pixel illumination angles
//! - [`engine`], [`models`]: the numeric model contract and reference models
//! - [`pipeline`]: the per-pixel decision sequence over a cube
//! - [`args`], [`app`]: the command-line tool

pub mod app;
pub mod args;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod config_log;
pub mod document;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod models;
pub mod overrides;
pub mod pipeline;
pub mod resolver;

pub use catalog::ModelKind;
pub use config::{AngleSource, PipelineOptions, ResolvedConfiguration};
pub use config_log::ConfigLog;
pub use document::{AlgorithmGroup, ConfigDocument};
pub use engine::{
    Correction, CorrectionEngine, ModelError, ModelInput, ModelLibrary, PhotometryModel,
};
pub use error::ConfigError;
pub use geometry::{
    build_provider, Angles, Camera, GeometryError, GeometryInputs, GeometryProvider,
    GeometrySample, Pixel,
};
pub use overrides::InlineOverrides;
pub use pipeline::{PipelineStats, PixelOutcome, PixelPipeline};
pub use resolver::{ConfigResolver, InteractiveParams, ModelRequests, ModelSpec, ResolvedModels};
