//! Environment layer of Settings::load.
//!
//! Kept in its own test binary with a single test function: the process
//! environment is global, so nothing else may run alongside it.

use std::env;
use std::fs;

use tempfile::TempDir;

use treeshade::application::ApplicationError;
use treeshade::config::Settings;
use treeshade::domain::ValueFormat;
use treeshade::util::testing;

const VARS: [&str; 5] = [
    "TREESHADE_INTENSITY__START",
    "TREESHADE_VALUE_FORMAT",
    "TREESHADE_PALETTE",
    "TREESHADE_SORT_SIBLINGS",
    "TREESHADE_COLOR_SOURCE",
];

fn clear_vars() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn given_treeshade_env_vars_when_loading_then_they_override_files() {
    testing::init_test_setup();
    let xdg = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", xdg.path());
    clear_vars();

    // explicit file sets a format the env layer must beat
    let file = xdg.path().join("explicit.toml");
    fs::write(&file, "value_format = \"grouped\"\n").unwrap();

    env::set_var("TREESHADE_INTENSITY__START", "0.7");
    env::set_var("TREESHADE_VALUE_FORMAT", "currency");
    env::set_var("TREESHADE_PALETTE", "#000000,#ffffff");
    env::set_var("TREESHADE_SORT_SIBLINGS", "false");

    let settings = Settings::load(Some(&file)).unwrap();
    assert_eq!(settings.intensity.start, 0.7);
    assert_eq!(settings.intensity.end, 0.8);
    assert_eq!(settings.value_format, ValueFormat::Currency);
    assert_eq!(settings.palette, vec!["#000000", "#ffffff"]);
    assert_eq!(settings.palette_colors().unwrap().len(), 2);
    assert!(!settings.sort_siblings);

    // a set but unparsable value is an error, not a silent default
    env::set_var("TREESHADE_INTENSITY__START", "abc");
    let err = Settings::load(None).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }), "{:?}", err);
    assert!(err.to_string().contains("intensity.start"), "{}", err);

    env::set_var("TREESHADE_INTENSITY__START", "0.7");
    env::set_var("TREESHADE_COLOR_SOURCE", "rainbow");
    let err = Settings::load(None).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }), "{:?}", err);

    clear_vars();
    let settings = Settings::load(None).unwrap();
    assert_eq!(settings, Settings::default());
}
