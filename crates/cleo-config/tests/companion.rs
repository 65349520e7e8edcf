//! Loading companion files from disk.

use std::fs;

use tempfile::TempDir;

use cleo_config::{
    CompanionConfig, ConfigError, ConfigValue, Constants, SetupConfig, resolve_scale_factor,
};

const CONSTANTS_HPP: &str = "\
namespace dimless_constants
{
  constexpr double W0 = 1.0;            // characteristic velocity [m/s]
  constexpr double TIME0 = 1000.0;      // timescale [s]
  constexpr double COORD0 = TIME0 * W0; // coordinate grid scale [m]
  constexpr double R0 = 1e-6;
  constexpr double P0 = 100000.0;
  constexpr double TEMP0 = 273.15;
  constexpr double CP_DRY = 1004.64;
}
";

const SETUP_TXT: &str = "\
# 1-D rainshaft
[domain]
nspacedims = 1
ngbxs = 3

[superdroplets]
totnsupers = 12

[timesteps]
COUPLTSTEP = 2
T_END = 20
";

#[test]
fn test_load_companion_files() {
    let dir = TempDir::new().unwrap();
    let setup = dir.path().join("setup.txt");
    let consts = dir.path().join("cleoconstants.hpp");
    fs::write(&setup, SETUP_TXT).unwrap();
    fs::write(&consts, CONSTANTS_HPP).unwrap();

    let config = CompanionConfig::load(&setup, &consts).unwrap();
    let counts = config.counts();
    assert_eq!(counts.ngridboxes, Some(3));
    assert_eq!(counts.nsuperdroplets, Some(12));
    assert_eq!(counts.nspacedims, Some(1));
    assert_eq!(counts.ntimesteps, Some(11));

    assert_eq!(config.scale_factor("zhalf").unwrap(), 1000.0);
    assert_eq!(config.scale_factor("press").unwrap(), 100_000.0);
    assert!(config.constants.contains("MASS0"));
    assert_eq!(
        config.get("timesteps.T_END").and_then(ConfigValue::as_f64),
        Some(20.0)
    );
}

#[test]
fn test_missing_files() {
    let dir = TempDir::new().unwrap();
    let err = SetupConfig::load(&dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));

    let err = Constants::load(&dir.path().join("absent.hpp")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_setup_reports_line() {
    let dir = TempDir::new().unwrap();
    let setup = dir.path().join("setup.txt");
    fs::write(&setup, "ngbxs = 3\n\n!!!\n").unwrap();

    let err = SetupConfig::load(&setup).unwrap_err();
    match err {
        ConfigError::ConfigParse { path, line, .. } => {
            assert_eq!(path, setup);
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_constant_for_quantity() {
    let consts = Constants::parse("constexpr double P0 = 100000.0;\n", "c.hpp".as_ref()).unwrap();
    let err = resolve_scale_factor("temp", &consts).unwrap_err();
    assert!(matches!(err, ConfigError::MissingConstant { name } if name == "TEMP0"));
}

#[test]
fn test_serialise_config() {
    let config = CompanionConfig::new(
        SetupConfig::new().with("ngbxs", ConfigValue::Integer(2)),
        Constants::new().with("P0", 100_000.0),
    );
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["setup"]["ngbxs"], 2);
    assert_eq!(json["constants"]["P0"], 100_000.0);

    let back: CompanionConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}
