//! Command-line arguments for the `photomet` binary.

use crate::config::{AngleSource, PipelineOptions};
use crate::geometry::Angles;
use crate::resolver::{InteractiveParams, ModelRequests};
use clap::{Args, Parser};
use std::path::PathBuf;

/// Explicitly entered model parameters, one flag per catalog parameter.
///
/// Values stay raw strings; the resolver validates them against the
/// selected model. `READFROMPVL` keeps the prior configuration's value.
#[derive(Args, Debug, Clone, Default)]
pub struct ParameterArgs {
    /// Hapke macroscopic roughness, degrees
    #[arg(long)]
    pub theta: Option<String>,
    /// Hapke single-scattering albedo
    #[arg(long)]
    pub wh: Option<String>,
    /// Hapke opposition surge width
    #[arg(long)]
    pub hh: Option<String>,
    /// Hapke opposition surge strength
    #[arg(long)]
    pub b0: Option<String>,
    /// Zero B0 at the standard conditions (TRUE/FALSE)
    #[arg(long)]
    pub zerob0standard: Option<String>,
    /// Henyey-Greenstein asymmetry, first lobe
    #[arg(long)]
    pub hg1: Option<String>,
    /// Henyey-Greenstein lobe weight
    #[arg(long)]
    pub hg2: Option<String>,
    /// Legendre phase function first coefficient
    #[arg(long)]
    pub bh: Option<String>,
    /// Legendre phase function second coefficient
    #[arg(long)]
    pub ch: Option<String>,
    /// Phase angles of the empirical phase curves
    #[arg(long)]
    pub phaselist: Option<String>,
    /// Empirical phase curve values, one per phase angle
    #[arg(long)]
    pub phasecurvelist: Option<String>,
    /// Minnaert exponents, one per phase angle
    #[arg(long)]
    pub klist: Option<String>,
    /// Lunar-Lambert weights, one per phase angle
    #[arg(long)]
    pub llist: Option<String>,
    /// Lunar-Lambert weight
    #[arg(long)]
    pub l: Option<String>,
    /// Minnaert exponent
    #[arg(long)]
    pub k: Option<String>,
    /// Reference incidence angle, degrees
    #[arg(long)]
    pub incref: Option<String>,
    /// Incidence angle where the mixed normalization switches, degrees
    #[arg(long)]
    pub incmat: Option<String>,
    /// Upper limit on the reference to actual brightness ratio
    #[arg(long)]
    pub thresh: Option<String>,
    /// Normal albedo the image is scaled to
    #[arg(long)]
    pub albedo: Option<String>,
    /// Moon albedo model coefficient D
    #[arg(long)]
    pub d: Option<String>,
    /// Moon albedo model coefficient E
    #[arg(long)]
    pub e: Option<String>,
    /// Moon albedo model coefficient F
    #[arg(long)]
    pub f: Option<String>,
    /// Moon albedo model coefficient G2
    #[arg(long)]
    pub g2: Option<String>,
    /// Moon albedo model brightness multiplier
    #[arg(long)]
    pub xmul: Option<String>,
    /// Moon albedo model wavelength, micrometers
    #[arg(long)]
    pub wl: Option<String>,
    /// Moon albedo model opposition surge width
    #[arg(long)]
    pub h: Option<String>,
    /// Moon albedo model opposition surge strength
    #[arg(long)]
    pub bsh1: Option<String>,
    /// Moon albedo model first phase coefficient
    #[arg(long)]
    pub xb1: Option<String>,
    /// Moon albedo model second phase coefficient
    #[arg(long)]
    pub xb2: Option<String>,
    /// Atmospheric normalization factor
    #[arg(long)]
    pub hnorm: Option<String>,
    /// Atmospheric optical depth
    #[arg(long)]
    pub tau: Option<String>,
    /// Reference optical depth
    #[arg(long)]
    pub tauref: Option<String>,
    /// Atmospheric single-scattering albedo
    #[arg(long)]
    pub wha: Option<String>,
    /// Null negative atmosphere-corrected values (YES/NO)
    #[arg(long)]
    pub nulneg: Option<String>,
    /// Atmospheric Legendre phase coefficient
    #[arg(long)]
    pub bha: Option<String>,
    /// Atmospheric Henyey-Greenstein asymmetry
    #[arg(long)]
    pub hga: Option<String>,
}

impl ParameterArgs {
    fn value(&self, name: &str) -> Option<&String> {
        match name.to_ascii_uppercase().as_str() {
            "THETA" => self.theta.as_ref(),
            "WH" => self.wh.as_ref(),
            "HH" => self.hh.as_ref(),
            "B0" => self.b0.as_ref(),
            "ZEROB0STANDARD" => self.zerob0standard.as_ref(),
            "HG1" => self.hg1.as_ref(),
            "HG2" => self.hg2.as_ref(),
            "BH" => self.bh.as_ref(),
            "CH" => self.ch.as_ref(),
            "PHASELIST" => self.phaselist.as_ref(),
            "PHASECURVELIST" => self.phasecurvelist.as_ref(),
            "KLIST" => self.klist.as_ref(),
            "LLIST" => self.llist.as_ref(),
            "L" => self.l.as_ref(),
            "K" => self.k.as_ref(),
            "INCREF" => self.incref.as_ref(),
            "INCMAT" => self.incmat.as_ref(),
            "THRESH" => self.thresh.as_ref(),
            "ALBEDO" => self.albedo.as_ref(),
            "D" => self.d.as_ref(),
            "E" => self.e.as_ref(),
            "F" => self.f.as_ref(),
            "G2" => self.g2.as_ref(),
            "XMUL" => self.xmul.as_ref(),
            "WL" => self.wl.as_ref(),
            "H" => self.h.as_ref(),
            "BSH1" => self.bsh1.as_ref(),
            "XB1" => self.xb1.as_ref(),
            "XB2" => self.xb2.as_ref(),
            "HNORM" => self.hnorm.as_ref(),
            "TAU" => self.tau.as_ref(),
            "TAUREF" => self.tauref.as_ref(),
            "WHA" => self.wha.as_ref(),
            "NULNEG" => self.nulneg.as_ref(),
            "BHA" => self.bha.as_ref(),
            "HGA" => self.hga.as_ref(),
            _ => None,
        }
    }
}

impl InteractiveParams for ParameterArgs {
    fn entered(&self, name: &str) -> Option<String> {
        self.value(name).cloned()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "photomet",
    about = "Photometric normalization of planetary image cubes",
    long_about = None
)]
pub struct PhotometArgs {
    /// Input cube (JSON)
    #[arg(long, required_unless_present_any = ["print_pvl", "load_pvl"])]
    pub from: Option<PathBuf>,

    /// Output cube (JSON)
    #[arg(long, required_unless_present_any = ["print_pvl", "load_pvl"])]
    pub to: Option<PathBuf>,

    /// Prior model configuration (JSON)
    #[arg(long)]
    pub frompvl: Option<PathBuf>,

    /// Write the resolved model configuration here
    #[arg(long)]
    pub topvl: Option<PathBuf>,

    /// Write the parameters-used audit log here
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Photometric model name, or NONE/FROMPVL to take it from --frompvl
    #[arg(long, default_value = "NONE")]
    pub phtname: String,

    /// Normalization model name, or NONE/FROMPVL to take it from --frompvl
    #[arg(long, default_value = "NONE")]
    pub normname: String,

    /// Atmospheric model name, or NONE/FROMPVL to take it from --frompvl
    #[arg(long, default_value = "NONE")]
    pub atmname: String,

    /// Inline overrides, e.g. "WH=0.52 THETA=30"
    #[arg(long, default_value = "NONE")]
    pub chngpar: String,

    /// Null pixels with a larger incidence angle (degrees)
    #[arg(long, default_value_t = 90.0)]
    pub maxincidence: f64,

    /// Null pixels with a larger emission angle (degrees)
    #[arg(long, default_value_t = 90.0)]
    pub maxemission: f64,

    /// Use local terrain angles for limits and correction
    #[arg(long)]
    pub usedem: bool,

    /// Where illumination angles come from
    #[arg(long, value_enum, ignore_case = true, default_value_t = AngleSource::Ellipsoid)]
    pub anglesource: AngleSource,

    /// Phase angle for center-from-user, or backplane constant (degrees)
    #[arg(long, default_value_t = 0.0)]
    pub phase_angle: f64,

    /// Incidence angle for center-from-user, or backplane constant (degrees)
    #[arg(long, default_value_t = 0.0)]
    pub incidence_angle: f64,

    /// Emission angle for center-from-user, or backplane constant (degrees)
    #[arg(long, default_value_t = 0.0)]
    pub emission_angle: f64,

    /// Phase angle backplane cube
    #[arg(long)]
    pub phase_angle_file: Option<PathBuf>,

    /// Incidence angle backplane cube
    #[arg(long)]
    pub incidence_angle_file: Option<PathBuf>,

    /// Emission angle backplane cube
    #[arg(long)]
    pub emission_angle_file: Option<PathBuf>,

    /// Geometry cube with phase, incidence, emission (and optionally local
    /// incidence, local emission) bands
    #[arg(long)]
    pub camera: Option<PathBuf>,

    /// Print the --frompvl configuration and exit
    #[arg(long)]
    pub print_pvl: bool,

    /// Print the --frompvl parameters for the requested models as an override string and exit
    #[arg(long)]
    pub load_pvl: bool,

    #[command(flatten)]
    pub parameters: ParameterArgs,
}

impl PhotometArgs {
    pub fn requests(&self) -> ModelRequests {
        ModelRequests::new(&self.phtname, &self.normname, &self.atmname)
    }

    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            max_incidence: self.maxincidence,
            max_emission: self.maxemission,
            use_dem: self.usedem,
        }
    }

    pub fn user_angles(&self) -> Angles {
        Angles::new(self.phase_angle, self.incidence_angle, self.emission_angle)
    }
}
