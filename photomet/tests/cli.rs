//! End-to-end runs of the command through its argument parser.

use approx::assert_relative_eq;
use clap::Parser;
use cube::{Cube, CubeSize, LabelGroup, NULL8};
use ndarray::Axis;
use photomet::app;
use photomet::args::PhotometArgs;
use photomet::{ConfigDocument, ConfigError, GeometryError, ModelError, ModelKind};
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_input(dir: &Path) -> std::path::PathBuf {
    let mut cube = Cube::new(CubeSize::new(3, 2, 1));
    cube.data.fill(0.5);
    cube.data[[0, 0, 0]] = NULL8;
    cube.label
        .add_group(LabelGroup::new("BandBin").with("Center", 0.9));
    cube.label.add_group(
        LabelGroup::new("Instrument")
            .with("PhaseAngle", 30.0)
            .with("IncidenceAngle", 30.0)
            .with("EmissionAngle", 0.0),
    );
    let path = dir.join("input.json");
    cube.save_to_file(&path).unwrap();
    path
}

fn write_geometry(dir: &Path, incidence: f64) -> std::path::PathBuf {
    let mut planes = Cube::new(CubeSize::new(3, 2, 3));
    for (band, value) in [incidence, incidence, 0.0].into_iter().enumerate() {
        planes.data.index_axis_mut(Axis(0), band).fill(value);
    }
    let path = dir.join("geometry.json");
    planes.save_to_file(&path).unwrap();
    path
}

fn parse(args: &[&str]) -> PhotometArgs {
    PhotometArgs::try_parse_from(std::iter::once("photomet").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_full_run_writes_cube_log_and_configuration() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let from = write_input(dir.path());
    let camera = write_geometry(dir.path(), 60.0);
    let to = dir.path().join("output.json");
    let log = dir.path().join("photomet.log");
    let topvl = dir.path().join("resolved.json");

    let args = parse(&[
        "--from",
        from.to_str().unwrap(),
        "--to",
        to.to_str().unwrap(),
        "--camera",
        camera.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
        "--topvl",
        topvl.to_str().unwrap(),
        "--phtname",
        "lambert",
        "--normname",
        "albedo",
        "--incref",
        "30",
        "--thresh",
        "30",
        "--chngpar",
        "albedo=0.5",
    ]);
    app::run(&args).unwrap();

    let output = Cube::load_from_file(&to).unwrap();
    assert_eq!(output.size(), CubeSize::new(3, 2, 1));
    assert_eq!(output.data[[0, 0, 0]].to_bits(), NULL8.to_bits());
    let expected = 0.5 * 30f64.to_radians().cos() / (0.5 * 0.5);
    assert_relative_eq!(output.data[[0, 1, 2]], expected, epsilon = 1e-12);
    assert_eq!(output.label.group_f64("BandBin", "Center"), Some(0.9));

    let log_text = std::fs::read_to_string(&log).unwrap();
    assert!(log_text.contains("Group = NormalizationModelParametersUsed"));
    assert!(log_text.contains("ALBEDO   = 0.5"));

    let resolved = ConfigDocument::load_from_file(&topvl).unwrap();
    let norm = &resolved.definitions(ModelKind::Normalization)[0];
    assert_eq!(norm.model_name(ModelKind::Normalization), Some("ALBEDO"));
    assert_eq!(norm.get("THRESH"), Some("30"));
}

#[test]
fn test_resolved_configuration_feeds_back_as_prior() {
    let dir = tempfile::tempdir().unwrap();
    let from = write_input(dir.path());
    let first_out = dir.path().join("first.json");
    let second_out = dir.path().join("second.json");
    let topvl = dir.path().join("resolved.json");

    let first = parse(&[
        "--from",
        from.to_str().unwrap(),
        "--to",
        first_out.to_str().unwrap(),
        "--topvl",
        topvl.to_str().unwrap(),
        "--anglesource",
        "center_from_label",
        "--phtname",
        "MINNAERT",
        "--normname",
        "ALBEDO",
        "--chngpar",
        "K=0.7 INCREF=30 THRESH=30 ALBEDO=0.5",
    ]);
    app::run(&first).unwrap();

    let second = parse(&[
        "--from",
        from.to_str().unwrap(),
        "--to",
        second_out.to_str().unwrap(),
        "--frompvl",
        topvl.to_str().unwrap(),
        "--anglesource",
        "CENTER_FROM_LABEL",
    ]);
    app::run(&second).unwrap();

    let a = Cube::load_from_file(&first_out).unwrap();
    let b = Cube::load_from_file(&second_out).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn test_configuration_errors_abort_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let from = write_input(dir.path());
    let to = dir.path().join("output.json");

    let args = parse(&[
        "--from",
        from.to_str().unwrap(),
        "--to",
        to.to_str().unwrap(),
        "--phtname",
        "HAPKEHEN",
        "--normname",
        "ALBEDO",
        "--chngpar",
        "INCREF=30 THRESH=30 ALBEDO=0.5",
    ]);
    let err = app::run(&args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingParameter { parameter, .. }) if parameter == "THETA"
    ));
    assert!(!to.exists());

    let args = parse(&[
        "--from",
        from.to_str().unwrap(),
        "--to",
        to.to_str().unwrap(),
        "--phtname",
        "LAMBERT",
        "--normname",
        "ALBEDO",
        "--chngpar",
        "INCREF=30 THRESH=30 ALBEDO=0.5",
    ]);
    let err = app::run(&args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GeometryError>(),
        Some(GeometryError::CameraRequired { .. })
    ));
    assert!(!to.exists());
}

#[test]
fn test_unlinked_model_writes_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let from = write_input(dir.path());
    let to = dir.path().join("output.json");
    let log = dir.path().join("photomet.log");
    let topvl = dir.path().join("resolved.json");

    let args = parse(&[
        "--from",
        from.to_str().unwrap(),
        "--to",
        to.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
        "--topvl",
        topvl.to_str().unwrap(),
        "--anglesource",
        "center_from_label",
        "--phtname",
        "LAMBERT",
        "--normname",
        "SHADE",
        "--chngpar",
        "INCREF=30 ALBEDO=0.5",
    ]);
    let err = app::run(&args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ModelError>(),
        Some(ModelError::NotLinked { kind: ModelKind::Normalization, .. })
    ));
    assert!(!to.exists());
    assert!(!log.exists());
    assert!(!topvl.exists());
}

#[test]
fn test_helpers_need_prior_and_do_not_process() {
    let dir = tempfile::tempdir().unwrap();
    let prior = dir.path().join("prior.json");
    std::fs::write(
        &prior,
        r#"{"PhotometricModel": {"Algorithm": [{"PHTNAME": "MINNAERT", "K": 0.7}]},
            "NormalizationModel": {"Algorithm": [{"NORMNAME": "ALBEDO", "INCREF": 30}]}}"#,
    )
    .unwrap();

    let args = parse(&["--frompvl", prior.to_str().unwrap(), "--print-pvl", "--load-pvl"]);
    app::run(&args).unwrap();

    let args = parse(&["--print-pvl"]);
    assert!(app::run(&args).is_err());
}
