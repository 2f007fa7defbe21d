//! Configuration errors.
//!
//! Every variant names the model and/or parameter at fault. None of them are
//! recoverable: a run that hits one aborts before any pixel is processed.

use crate::catalog::ModelKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("A {kind} model must be specified before running this program. You need to provide a {kind} model through an input configuration file or by entering a model name")]
    MissingModel { kind: ModelKind },

    #[error("Unsupported {kind} model [{name}]")]
    UnsupportedModel { kind: ModelKind, name: String },

    #[error("The {model} {kind} model requires a value for the {parameter} parameter. {hint}")]
    MissingParameter {
        kind: ModelKind,
        model: String,
        parameter: String,
        hint: String,
    },

    #[error("Invalid value [{value}] for {parameter} in the {model} {kind} model: not a number")]
    InvalidNumber {
        kind: ModelKind,
        model: String,
        parameter: String,
        value: String,
    },

    #[error("Value {value} for {parameter} in the {model} {kind} model is out of range. {hint}")]
    OutOfRange {
        kind: ModelKind,
        model: String,
        parameter: String,
        value: f64,
        hint: String,
    },

    #[error("Invalid value [{value}] for {parameter} in the {model} {kind} model. {hint}")]
    InvalidToken {
        kind: ModelKind,
        model: String,
        parameter: String,
        value: String,
        hint: String,
    },

    #[error("Invalid override [{token}]: you must enter pairs of data formatted as parname=value and separated by spaces")]
    MalformedOverride { token: String },

    #[error("The {normalization} Normalization model requires an Atmospheric model. You need to provide one through an input configuration file or by entering ATMNAME")]
    MissingAtmosphere { normalization: String },

    #[error("{kind} model definition #{index} in the input configuration has no {keyword} or NAME keyword")]
    UnnamedDefinition {
        kind: ModelKind,
        index: usize,
        keyword: &'static str,
    },
}
