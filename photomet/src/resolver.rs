//! Model configuration resolution.
//!
//! Three sources feed each model parameter, highest precedence first:
//!
//! 1. the inline override string ([`InlineOverrides`])
//! 2. values the caller explicitly entered ([`InteractiveParams`])
//! 3. the matching definition in a prior configuration ([`ConfigDocument`])
//!
//! followed by the catalog default for the two token parameters. A single
//! table-driven pass handles every model kind; the catalog supplies which
//! parameters a variant needs and how each is validated.
//!
//! When a prior configuration holds several definitions that match a request,
//! the first one wins. A sentinel request (`NONE`/`FROMPVL`) takes the first
//! named definition.

use crate::catalog::{self, ModelKind, ModelVariant, ParamKind, ParamSpec};
use crate::config_log::ConfigLog;
use crate::document::{AlgorithmGroup, ConfigDocument};
use crate::error::ConfigError;
use crate::overrides::InlineOverrides;
use std::collections::BTreeMap;

/// Interactive value meaning "keep what the prior configuration says"
pub const READ_FROM_PRIOR: &str = "READFROMPVL";

/// Values the caller supplied explicitly, e.g. through command-line flags.
///
/// Returning `None` means the parameter was not entered; implementations must
/// not report defaults as entered values.
pub trait InteractiveParams {
    fn entered(&self, name: &str) -> Option<String>;
}

impl InteractiveParams for BTreeMap<String, String> {
    fn entered(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}

/// Where a resolved parameter value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ParamSource {
    #[strum(serialize = "inline override")]
    Inline,
    #[strum(serialize = "entered value")]
    Interactive,
    #[strum(serialize = "prior configuration")]
    Prior,
    #[strum(serialize = "default")]
    Default,
}

/// A fully resolved and validated model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub kind: ModelKind,
    /// Canonical uppercase variant name
    pub name: String,
    /// Parameters in the variant's declared order, as canonical strings
    pub parameters: Vec<(String, String)>,
}

impl ModelSpec {
    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(parameter))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_f64(&self, parameter: &str) -> Option<f64> {
        self.get(parameter).and_then(|v| v.parse().ok())
    }

    /// Definition group holding the name keyword followed by every parameter
    pub fn to_group(&self) -> AlgorithmGroup {
        let mut group = AlgorithmGroup::new().with(self.kind.name_keyword(), self.name.clone());
        for (name, value) in &self.parameters {
            group.set(name, value.clone());
        }
        group
    }
}

/// Requested model names; `NONE` or `FROMPVL` defer to the prior configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequests {
    pub photometric: String,
    pub normalization: String,
    pub atmospheric: String,
}

impl ModelRequests {
    pub fn new(
        photometric: impl Into<String>,
        normalization: impl Into<String>,
        atmospheric: impl Into<String>,
    ) -> Self {
        Self {
            photometric: photometric.into(),
            normalization: normalization.into(),
            atmospheric: atmospheric.into(),
        }
    }

    pub fn get(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Photometric => &self.photometric,
            ModelKind::Normalization => &self.normalization,
            ModelKind::Atmospheric => &self.atmospheric,
        }
    }
}

impl Default for ModelRequests {
    fn default() -> Self {
        Self::new("NONE", "NONE", "NONE")
    }
}

/// Every model a run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModels {
    pub photometric: ModelSpec,
    pub normalization: ModelSpec,
    /// Present only for atmosphere-coupled normalization models
    pub atmospheric: Option<ModelSpec>,
}

impl ResolvedModels {
    pub fn iter(&self) -> impl Iterator<Item = &ModelSpec> {
        [Some(&self.normalization), self.atmospheric.as_ref(), Some(&self.photometric)]
            .into_iter()
            .flatten()
    }
}

/// Merges the parameter sources into validated [`ModelSpec`]s.
pub struct ConfigResolver<'a> {
    prior: Option<&'a ConfigDocument>,
    overrides: &'a InlineOverrides,
    interactive: &'a dyn InteractiveParams,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(
        prior: Option<&'a ConfigDocument>,
        overrides: &'a InlineOverrides,
        interactive: &'a dyn InteractiveParams,
    ) -> Self {
        Self {
            prior,
            overrides,
            interactive,
        }
    }

    /// Resolve a single model of the given kind.
    pub fn resolve(&self, kind: ModelKind, requested: &str) -> Result<ModelSpec, ConfigError> {
        let requested = requested.trim().to_uppercase();
        let matched = find_definition(self.prior, kind, &requested);

        let name = if catalog::is_sentinel(&requested) {
            matched
                .and_then(|def| def.model_name(kind))
                .map(str::to_uppercase)
                .ok_or(ConfigError::MissingModel { kind })?
        } else {
            requested
        };

        let variant = catalog::lookup(kind, &name).ok_or_else(|| ConfigError::UnsupportedModel {
            kind,
            name: name.clone(),
        })?;

        if let Some(def) = matched {
            report_dropped_keywords(variant, def);
        }

        let mut parameters = Vec::with_capacity(variant.params.len());
        for spec in variant.params {
            let (raw, source) =
                self.lookup_value(spec, matched)
                    .ok_or_else(|| ConfigError::MissingParameter {
                        kind,
                        model: variant.name.to_string(),
                        parameter: spec.name.to_string(),
                        hint: spec.hint().unwrap_or_default(),
                    })?;
            let value = canonicalize(variant, spec, &raw)?;
            log::debug!(
                "{} {}: {} = {} from {}",
                variant.name,
                kind,
                spec.name,
                value,
                source
            );
            parameters.push((spec.name.to_string(), value));
        }

        Ok(ModelSpec {
            kind,
            name: variant.name.to_string(),
            parameters,
        })
    }

    /// Resolve normalization, atmospheric (when coupled) and photometric models
    /// in that order, recording each in a fresh audit log.
    pub fn resolve_all(
        &self,
        requests: &ModelRequests,
    ) -> Result<(ResolvedModels, ConfigLog), ConfigError> {
        let mut log = ConfigLog::new();

        let normalization = self.resolve(ModelKind::Normalization, &requests.normalization)?;
        log.record(&normalization);

        let atmospheric = if catalog::requires_atmosphere(&normalization.name) {
            let atm = self
                .resolve(ModelKind::Atmospheric, &requests.atmospheric)
                .map_err(|err| match err {
                    ConfigError::MissingModel { .. } => ConfigError::MissingAtmosphere {
                        normalization: normalization.name.clone(),
                    },
                    other => other,
                })?;
            log.record(&atm);
            Some(atm)
        } else {
            None
        };

        let photometric = self.resolve(ModelKind::Photometric, &requests.photometric)?;
        log.record(&photometric);

        let models = ResolvedModels {
            photometric,
            normalization,
            atmospheric,
        };
        for spec in models.iter() {
            log::info!("Using {} {} model", spec.name, spec.kind);
        }
        self.report_unused_overrides(&models);

        Ok((models, log))
    }

    fn lookup_value(
        &self,
        spec: &ParamSpec,
        matched: Option<&AlgorithmGroup>,
    ) -> Option<(String, ParamSource)> {
        if let Some(value) = self.overrides.get(spec.name) {
            return Some((value.to_string(), ParamSource::Inline));
        }
        if let Some(value) = self
            .interactive
            .entered(spec.name)
            .filter(|v| !v.trim().eq_ignore_ascii_case(READ_FROM_PRIOR))
        {
            return Some((value, ParamSource::Interactive));
        }
        if let Some(value) = matched.and_then(|def| def.get(spec.name)) {
            return Some((value.to_string(), ParamSource::Prior));
        }
        spec.default
            .map(|value| (value.to_string(), ParamSource::Default))
    }

    fn report_unused_overrides(&self, models: &ResolvedModels) {
        for name in self.overrides.keys() {
            let consumed = models.iter().any(|spec| spec.get(name).is_some());
            if !consumed {
                log::warn!("Override {name} is not used by any selected model");
            }
        }
    }
}

/// First definition matching the request: an exact name match for a concrete
/// request, the first named definition for a sentinel.
fn find_definition<'d>(
    prior: Option<&'d ConfigDocument>,
    kind: ModelKind,
    requested: &str,
) -> Option<&'d AlgorithmGroup> {
    let sentinel = catalog::is_sentinel(requested);
    prior?
        .definitions(kind)
        .iter()
        .find(|def| match def.model_name(kind) {
            Some(name) => sentinel || name.eq_ignore_ascii_case(requested),
            None => false,
        })
}

fn report_dropped_keywords(variant: &ModelVariant, def: &AlgorithmGroup) {
    for (keyword, value) in def.keywords() {
        let is_name = keyword.eq_ignore_ascii_case(variant.kind.name_keyword())
            || keyword.eq_ignore_ascii_case("NAME");
        if !is_name && variant.param(keyword).is_none() {
            log::debug!(
                "Ignoring {keyword} = {value}: not a parameter of the {} {} model",
                variant.name,
                variant.kind
            );
        }
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// Validate a raw value and bring it into canonical string form
fn canonicalize(
    variant: &ModelVariant,
    spec: &ParamSpec,
    raw: &str,
) -> Result<String, ConfigError> {
    let text = unquote(raw);
    match spec.kind {
        ParamKind::Number(range) => {
            let value: f64 = text
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| ConfigError::InvalidNumber {
                    kind: variant.kind,
                    model: variant.name.to_string(),
                    parameter: spec.name.to_string(),
                    value: text.to_string(),
                })?;
            if !range.contains(value) {
                return Err(ConfigError::OutOfRange {
                    kind: variant.kind,
                    model: variant.name.to_string(),
                    parameter: spec.name.to_string(),
                    value,
                    hint: range.hint(spec.name),
                });
            }
            Ok(value.to_string())
        }
        ParamKind::Token(tokens) => {
            let token = text.to_uppercase();
            if tokens.contains(&token.as_str()) {
                Ok(token)
            } else {
                Err(ConfigError::InvalidToken {
                    kind: variant.kind,
                    model: variant.name.to_string(),
                    parameter: spec.name.to_string(),
                    value: text.to_string(),
                    hint: spec.hint().unwrap_or_default(),
                })
            }
        }
        ParamKind::List => Ok(text.to_string()),
    }
}

/// Parameters a prior configuration contributes to the requested models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorParameters {
    /// Model names found for each kind, in resolution order
    pub models: Vec<(ModelKind, String)>,
    /// Declared parameters present in the matched definitions
    pub parameters: Vec<(String, String)>,
}

impl PriorParameters {
    /// `NAME=VALUE` pairs separated by spaces, usable as an override string.
    ///
    /// List values carry no whitespace, so the string parses back unchanged.
    pub fn to_override_string(&self) -> String {
        self.parameters
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collect the parameters a prior configuration holds for the requested
/// models, without requiring them to be complete.
///
/// Every definition must be named. Names must be supported variants and token
/// parameters must hold one of their legal tokens. Atmospheric parameters are
/// only collected for atmosphere-coupled normalization models.
pub fn load_prior_parameters(
    prior: &ConfigDocument,
    requests: &ModelRequests,
) -> Result<PriorParameters, ConfigError> {
    let mut loaded = PriorParameters::default();

    for kind in [
        ModelKind::Normalization,
        ModelKind::Atmospheric,
        ModelKind::Photometric,
    ] {
        if kind == ModelKind::Atmospheric {
            let coupled = loaded
                .models
                .iter()
                .any(|(k, name)| *k == ModelKind::Normalization && catalog::requires_atmosphere(name));
            if !coupled {
                continue;
            }
        }

        for (index, def) in prior.definitions(kind).iter().enumerate() {
            if !def.has_name_keyword(kind) {
                return Err(ConfigError::UnnamedDefinition {
                    kind,
                    index: index + 1,
                    keyword: kind.name_keyword(),
                });
            }
        }

        let requested = requests.get(kind).trim().to_uppercase();
        let Some(def) = find_definition(Some(prior), kind, &requested) else {
            continue;
        };
        let name = def
            .model_name(kind)
            .map(str::to_uppercase)
            .unwrap_or_default();
        let variant = catalog::lookup(kind, &name)
            .ok_or_else(|| ConfigError::UnsupportedModel { kind, name })?;

        for spec in variant.params {
            let Some(raw) = def.get(spec.name) else {
                continue;
            };
            let value = match spec.kind {
                ParamKind::Token(_) => canonicalize(variant, spec, raw)?,
                ParamKind::List => unquote(raw).split_whitespace().collect(),
                ParamKind::Number(_) => unquote(raw).to_string(),
            };
            match loaded.parameters.iter_mut().find(|(n, _)| n == spec.name) {
                Some(entry) => entry.1 = value,
                None => loaded.parameters.push((spec.name.to_string(), value)),
            }
        }
        loaded.models.push((kind, variant.name.to_string()));
    }

    Ok(loaded)
}

/// Render a prior configuration as keyword text
pub fn print_prior(prior: &ConfigDocument) -> String {
    prior.to_string()
}
