//! End-to-end run of the `photomet` command.

use crate::args::PhotometArgs;
use crate::camera::GeometryCubeCamera;
use crate::config::ResolvedConfiguration;
use crate::document::ConfigDocument;
use crate::engine::{CorrectionEngine, ModelLibrary};
use crate::geometry::{build_provider, Camera, GeometryError, GeometryInputs};
use crate::models::ReferenceLibrary;
use crate::overrides::InlineOverrides;
use crate::pipeline::{PipelineStats, PixelPipeline};
use crate::resolver::{load_prior_parameters, print_prior, ConfigResolver};
use anyhow::{bail, Context};
use cube::Cube;
use std::path::Path;

/// Run with the built-in reference models
pub fn run(args: &PhotometArgs) -> anyhow::Result<()> {
    run_with_library(args, &ReferenceLibrary)
}

/// Run with a caller-supplied model library.
///
/// All configuration is resolved and the models are linked before any file
/// is written or any pixel is read.
pub fn run_with_library(args: &PhotometArgs, library: &dyn ModelLibrary) -> anyhow::Result<()> {
    let prior = args
        .frompvl
        .as_deref()
        .map(|path| {
            ConfigDocument::load_from_file(path)
                .with_context(|| format!("Failed to read configuration {}", path.display()))
        })
        .transpose()?;

    if args.print_pvl || args.load_pvl {
        let Some(prior) = prior.as_ref() else {
            bail!("--print-pvl and --load-pvl need --frompvl");
        };
        if args.print_pvl {
            println!("{}", print_prior(prior));
        }
        if args.load_pvl {
            let loaded = load_prior_parameters(prior, &args.requests())?;
            for (kind, name) in &loaded.models {
                println!("{} = {}", kind.name_keyword(), name);
            }
            println!("CHNGPAR = \"{}\"", loaded.to_override_string());
        }
        return Ok(());
    }

    let overrides = InlineOverrides::parse(&args.chngpar)?;
    let resolver = ConfigResolver::new(prior.as_ref(), &overrides, &args.parameters);
    let (models, audit) = resolver.resolve_all(&args.requests())?;
    audit.log_info();

    let (Some(from), Some(to)) = (args.from.as_deref(), args.to.as_deref()) else {
        bail!("--from and --to are required");
    };
    let input = load_cube(from)?;
    let config = ResolvedConfiguration::for_label(models, &input.label);
    log::info!("Wavelength {}", config.wavelength);

    if args.anglesource.requires_camera() && args.camera.is_none() {
        return Err(GeometryError::CameraRequired {
            angle_source: args.anglesource,
        }
        .into());
    }
    let camera = args
        .camera
        .as_deref()
        .map(GeometryCubeCamera::load_from_file)
        .transpose()
        .context("Failed to load camera geometry")?;
    let phase = args.phase_angle_file.as_deref().map(load_cube).transpose()?;
    let incidence = args.incidence_angle_file.as_deref().map(load_cube).transpose()?;
    let emission = args.emission_angle_file.as_deref().map(load_cube).transpose()?;

    let inputs = GeometryInputs {
        camera: camera.as_ref().map(|c| c as &dyn Camera),
        user_angles: Some(args.user_angles()),
        phase_plane: phase.as_ref(),
        incidence_plane: incidence.as_ref(),
        emission_plane: emission.as_ref(),
    };
    let provider = build_provider(args.anglesource, inputs, input.size(), &input.label)?;

    let options = args.options();
    let engine = CorrectionEngine::new(config, library, options.use_dem)?;

    if let Some(path) = &args.log {
        audit
            .save_to_file(path)
            .with_context(|| format!("Failed to write log {}", path.display()))?;
    }
    if let Some(path) = &args.topvl {
        engine
            .config()
            .to_document()
            .save_to_file(path)
            .with_context(|| format!("Failed to write configuration {}", path.display()))?;
    }

    let pipeline = PixelPipeline::new(&engine, provider.as_ref(), options);
    let (output, stats) = pipeline.run(&input)?;
    report(&stats);

    output
        .save_to_file(to)
        .with_context(|| format!("Failed to write {}", to.display()))?;
    Ok(())
}

fn load_cube(path: &Path) -> anyhow::Result<Cube> {
    Cube::load_from_file(path).with_context(|| format!("Failed to read cube {}", path.display()))
}

fn report(stats: &PipelineStats) {
    if stats.corrected == 0 && stats.total() > 0 {
        log::warn!("No pixel could be corrected");
    }
}
