//! Catalog of supported photometric, normalization and atmospheric models.
//!
//! Each variant declares the parameters it requires, in the order they are
//! resolved and logged, together with the legal range or token set of every
//! parameter. The numeric models themselves live elsewhere; this table is what
//! the resolver validates against.

use std::fmt;

/// The three sub-models making up a photometric correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ModelKind {
    Photometric,
    Normalization,
    Atmospheric,
}

impl ModelKind {
    /// Object name used in configuration documents
    pub fn object_name(self) -> &'static str {
        match self {
            ModelKind::Photometric => "PhotometricModel",
            ModelKind::Normalization => "NormalizationModel",
            ModelKind::Atmospheric => "AtmosphericModel",
        }
    }

    /// Keyword carrying the model name inside a definition
    pub fn name_keyword(self) -> &'static str {
        match self {
            ModelKind::Photometric => "PHTNAME",
            ModelKind::Normalization => "NORMNAME",
            ModelKind::Atmospheric => "ATMNAME",
        }
    }

    /// Group name used in the parameter audit log
    pub fn log_group(self) -> &'static str {
        match self {
            ModelKind::Photometric => "PhotometricModelParametersUsed",
            ModelKind::Normalization => "NormalizationModelParametersUsed",
            ModelKind::Atmospheric => "AtmosphericModelParametersUsed",
        }
    }
}

/// One end of a legal parameter range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

/// Legal numeric range of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: Bound,
    pub max: Bound,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        min: Bound::Unbounded,
        max: Bound::Unbounded,
    };

    pub const fn new(min: Bound, max: Bound) -> Self {
        Self { min, max }
    }

    /// `min <= x`
    pub const fn at_least(min: f64) -> Self {
        Self::new(Bound::Inclusive(min), Bound::Unbounded)
    }

    pub fn contains(&self, value: f64) -> bool {
        let above = match self.min {
            Bound::Unbounded => true,
            Bound::Inclusive(m) => value >= m,
            Bound::Exclusive(m) => value > m,
        };
        let below = match self.max {
            Bound::Unbounded => true,
            Bound::Inclusive(m) => value <= m,
            Bound::Exclusive(m) => value < m,
        };
        above && below
    }

    /// Human-readable description, e.g. `The normal range for WH is: 0 < WH <= 1`
    pub fn hint(&self, name: &str) -> String {
        if *self == Range::UNBOUNDED {
            return format!("The {name} parameter has no limited range");
        }
        let mut text = format!("The normal range for {name} is: ");
        match self.min {
            Bound::Unbounded => {}
            Bound::Inclusive(m) => text.push_str(&format!("{m} <= ")),
            Bound::Exclusive(m) => text.push_str(&format!("{m} < ")),
        }
        text.push_str(name);
        match self.max {
            Bound::Unbounded => {}
            Bound::Inclusive(m) => text.push_str(&format!(" <= {m}")),
            Bound::Exclusive(m) => text.push_str(&format!(" < {m}")),
        }
        text
    }
}

/// How a parameter value is validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Floating point value inside a legal range
    Number(Range),
    /// One of a fixed set of uppercase tokens
    Token(&'static [&'static str]),
    /// Raw delimited list, parsed by the numeric model
    List,
}

/// A parameter required by a model variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Value used when no source supplies one
    pub default: Option<&'static str>,
}

impl ParamSpec {
    const fn number(name: &'static str, range: Range) -> Self {
        Self {
            name,
            kind: ParamKind::Number(range),
            default: None,
        }
    }

    const fn token(
        name: &'static str,
        tokens: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind: ParamKind::Token(tokens),
            default: Some(default),
        }
    }

    const fn list(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::List,
            default: None,
        }
    }

    /// Hint attached to errors about this parameter, if any
    pub fn hint(&self) -> Option<String> {
        match self.kind {
            ParamKind::Number(range) => Some(range.hint(self.name)),
            ParamKind::Token(tokens) => Some(format!(
                "The valid values for {} are: {}",
                self.name,
                tokens.join(", ")
            )),
            ParamKind::List => None,
        }
    }
}

/// A named model variant and its required parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelVariant {
    pub kind: ModelKind,
    pub name: &'static str,
    pub params: &'static [ParamSpec],
}

impl ModelVariant {
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind)
    }
}

/// Sentinel model names meaning "take the model from the prior configuration"
pub const NAME_SENTINELS: [&str; 2] = ["NONE", "FROMPVL"];

/// Normalization variants that require an atmospheric model
pub const ATMOSPHERE_COUPLED: [&str; 3] = ["ALBEDOATM", "SHADEATM", "TOPOATM"];

pub const BOOLEAN_TOKENS: &[&str] = &["TRUE", "FALSE"];
pub const YES_NO_TOKENS: &[&str] = &["YES", "NO"];

pub fn is_sentinel(name: &str) -> bool {
    NAME_SENTINELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name.trim()))
}

pub fn requires_atmosphere(normalization: &str) -> bool {
    ATMOSPHERE_COUPLED
        .iter()
        .any(|n| n.eq_ignore_ascii_case(normalization))
}

// Photometric parameters
const THETA: ParamSpec = ParamSpec::number(
    "THETA",
    Range::new(Bound::Inclusive(0.0), Bound::Inclusive(90.0)),
);
const WH: ParamSpec = ParamSpec::number(
    "WH",
    Range::new(Bound::Exclusive(0.0), Bound::Inclusive(1.0)),
);
const HH: ParamSpec = ParamSpec::number("HH", Range::at_least(0.0));
const B0: ParamSpec = ParamSpec::number("B0", Range::at_least(0.0));
const ZEROB0STANDARD: ParamSpec = ParamSpec::token("ZEROB0STANDARD", BOOLEAN_TOKENS, "TRUE");
const HG1: ParamSpec = ParamSpec::number(
    "HG1",
    Range::new(Bound::Exclusive(-1.0), Bound::Exclusive(1.0)),
);
const HG2: ParamSpec = ParamSpec::number(
    "HG2",
    Range::new(Bound::Inclusive(0.0), Bound::Inclusive(1.0)),
);
const BH: ParamSpec = ParamSpec::number(
    "BH",
    Range::new(Bound::Inclusive(-1.0), Bound::Inclusive(1.0)),
);
const CH: ParamSpec = ParamSpec::number(
    "CH",
    Range::new(Bound::Inclusive(-1.0), Bound::Inclusive(1.0)),
);
const PHASELIST: ParamSpec = ParamSpec::list("PHASELIST");
const PHASECURVELIST: ParamSpec = ParamSpec::list("PHASECURVELIST");
const KLIST: ParamSpec = ParamSpec::list("KLIST");
const LLIST: ParamSpec = ParamSpec::list("LLIST");
const L: ParamSpec = ParamSpec::number("L", Range::UNBOUNDED);
const K: ParamSpec = ParamSpec::number("K", Range::at_least(0.0));

// Normalization parameters
const INCREF: ParamSpec = ParamSpec::number(
    "INCREF",
    Range::new(Bound::Inclusive(0.0), Bound::Exclusive(90.0)),
);
const INCMAT: ParamSpec = ParamSpec::number(
    "INCMAT",
    Range::new(Bound::Inclusive(0.0), Bound::Exclusive(90.0)),
);
const THRESH: ParamSpec = ParamSpec::number("THRESH", Range::UNBOUNDED);
const ALBEDO: ParamSpec = ParamSpec::number("ALBEDO", Range::UNBOUNDED);
const D: ParamSpec = ParamSpec::number("D", Range::UNBOUNDED);
const E: ParamSpec = ParamSpec::number("E", Range::UNBOUNDED);
const F: ParamSpec = ParamSpec::number("F", Range::UNBOUNDED);
const G2: ParamSpec = ParamSpec::number("G2", Range::UNBOUNDED);
const XMUL: ParamSpec = ParamSpec::number("XMUL", Range::UNBOUNDED);
const WL: ParamSpec = ParamSpec::number("WL", Range::UNBOUNDED);
const H: ParamSpec = ParamSpec::number("H", Range::UNBOUNDED);
const BSH1: ParamSpec = ParamSpec::number("BSH1", Range::at_least(0.0));
const XB1: ParamSpec = ParamSpec::number("XB1", Range::UNBOUNDED);
const XB2: ParamSpec = ParamSpec::number("XB2", Range::UNBOUNDED);

// Atmospheric parameters
const HNORM: ParamSpec = ParamSpec::number("HNORM", Range::at_least(0.0));
const TAU: ParamSpec = ParamSpec::number("TAU", Range::at_least(0.0));
const TAUREF: ParamSpec = ParamSpec::number("TAUREF", Range::at_least(0.0));
const WHA: ParamSpec = ParamSpec::number(
    "WHA",
    Range::new(Bound::Exclusive(0.0), Bound::Exclusive(1.0)),
);
const NULNEG: ParamSpec = ParamSpec::token("NULNEG", YES_NO_TOKENS, "NO");
const BHA: ParamSpec = ParamSpec::number(
    "BHA",
    Range::new(Bound::Inclusive(-1.0), Bound::Inclusive(1.0)),
);
const HGA: ParamSpec = ParamSpec::number(
    "HGA",
    Range::new(Bound::Exclusive(-1.0), Bound::Exclusive(1.0)),
);

const HAPKEHEN_PARAMS: &[ParamSpec] = &[THETA, WH, HH, B0, ZEROB0STANDARD, HG1, HG2];
const HAPKELEG_PARAMS: &[ParamSpec] = &[THETA, WH, HH, B0, ZEROB0STANDARD, BH, CH];
const ISOTROPIC_PARAMS: &[ParamSpec] = &[HNORM, TAU, TAUREF, WHA, NULNEG];
const ANISOTROPIC_PARAMS: &[ParamSpec] = &[HNORM, TAU, TAUREF, WHA, NULNEG, BHA];
const HAPKEATM_PARAMS: &[ParamSpec] = &[HNORM, TAU, TAUREF, WHA, NULNEG, HGA];
const LUNARLAMBERTEMPIRICAL_PARAMS: &[ParamSpec] = &[PHASELIST, PHASECURVELIST, LLIST];
const MINNAERTEMPIRICAL_PARAMS: &[ParamSpec] = &[PHASELIST, PHASECURVELIST, KLIST];
const ALBEDO_PARAMS: &[ParamSpec] = &[INCREF, THRESH, ALBEDO];
const MIXED_PARAMS: &[ParamSpec] = &[INCREF, INCMAT, THRESH, ALBEDO];
const MOONALBEDO_PARAMS: &[ParamSpec] = &[D, E, F, G2, XMUL, WL, H, BSH1, XB1, XB2];
const SHADE_PARAMS: &[ParamSpec] = &[INCREF, ALBEDO];
const TOPO_PARAMS: &[ParamSpec] = &[INCREF, THRESH, ALBEDO];
const INCREF_ONLY: &[ParamSpec] = &[INCREF];
const L_ONLY: &[ParamSpec] = &[L];
const K_ONLY: &[ParamSpec] = &[K];
const NO_PARAMS: &[ParamSpec] = &[];

const fn variant(
    kind: ModelKind,
    name: &'static str,
    params: &'static [ParamSpec],
) -> ModelVariant {
    ModelVariant { kind, name, params }
}

pub static PHOTOMETRIC_MODELS: &[ModelVariant] = &[
    variant(ModelKind::Photometric, "LAMBERT", NO_PARAMS),
    variant(ModelKind::Photometric, "LOMMELSEELIGER", NO_PARAMS),
    variant(ModelKind::Photometric, "LUNARLAMBERTMCEWEN", NO_PARAMS),
    variant(ModelKind::Photometric, "HAPKEHEN", HAPKEHEN_PARAMS),
    variant(ModelKind::Photometric, "HAPKELEG", HAPKELEG_PARAMS),
    variant(
        ModelKind::Photometric,
        "LUNARLAMBERTEMPIRICAL",
        LUNARLAMBERTEMPIRICAL_PARAMS,
    ),
    variant(
        ModelKind::Photometric,
        "MINNAERTEMPIRICAL",
        MINNAERTEMPIRICAL_PARAMS,
    ),
    variant(ModelKind::Photometric, "LUNARLAMBERT", L_ONLY),
    variant(ModelKind::Photometric, "MINNAERT", K_ONLY),
];

pub static NORMALIZATION_MODELS: &[ModelVariant] = &[
    variant(ModelKind::Normalization, "ALBEDO", ALBEDO_PARAMS),
    variant(ModelKind::Normalization, "MIXED", MIXED_PARAMS),
    variant(ModelKind::Normalization, "MOONALBEDO", MOONALBEDO_PARAMS),
    variant(ModelKind::Normalization, "SHADE", SHADE_PARAMS),
    variant(ModelKind::Normalization, "TOPO", TOPO_PARAMS),
    variant(ModelKind::Normalization, "ALBEDOATM", INCREF_ONLY),
    variant(ModelKind::Normalization, "SHADEATM", SHADE_PARAMS),
    variant(ModelKind::Normalization, "TOPOATM", SHADE_PARAMS),
];

pub static ATMOSPHERIC_MODELS: &[ModelVariant] = &[
    variant(ModelKind::Atmospheric, "ANISOTROPIC1", ANISOTROPIC_PARAMS),
    variant(ModelKind::Atmospheric, "ANISOTROPIC2", ANISOTROPIC_PARAMS),
    variant(ModelKind::Atmospheric, "HAPKEATM1", HAPKEATM_PARAMS),
    variant(ModelKind::Atmospheric, "HAPKEATM2", HAPKEATM_PARAMS),
    variant(ModelKind::Atmospheric, "ISOTROPIC1", ISOTROPIC_PARAMS),
    variant(ModelKind::Atmospheric, "ISOTROPIC2", ISOTROPIC_PARAMS),
];

/// All variants of one kind
pub fn variants(kind: ModelKind) -> &'static [ModelVariant] {
    match kind {
        ModelKind::Photometric => PHOTOMETRIC_MODELS,
        ModelKind::Normalization => NORMALIZATION_MODELS,
        ModelKind::Atmospheric => ATMOSPHERIC_MODELS,
    }
}

/// Case-insensitive variant lookup
pub fn lookup(kind: ModelKind, name: &str) -> Option<&'static ModelVariant> {
    variants(kind)
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
}

/// Every parameter name any variant of any kind declares
pub fn all_parameter_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for kind in [
        ModelKind::Photometric,
        ModelKind::Normalization,
        ModelKind::Atmospheric,
    ] {
        for param in variants(kind).iter().flat_map(|v| v.params.iter()) {
            if !names.contains(&param.name) {
                names.push(param.name);
            }
        }
    }
    names
}
