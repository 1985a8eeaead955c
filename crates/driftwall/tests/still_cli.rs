use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use driftconfig::DriftConfig;
use tempfile::TempDir;

fn driftwall(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_driftwall"))
        .env("DRIFTWALL_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("failed to run driftwall")
}

#[test]
fn still_writes_png_of_requested_size() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("frame.png");

    let result = driftwall(
        root.path(),
        &[
            "still",
            "--output",
            output.to_str().unwrap(),
            "--size",
            "64x48",
            "--time",
            "3",
        ],
    );
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let image = image::open(&output).expect("decode still").to_rgba8();
    assert_eq!(image.dimensions(), (64, 48));
    assert!(image.pixels().all(|pixel| pixel.0[3] == 255));
}

#[test]
fn still_uses_palette_from_config() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("driftwall.toml"),
        r##"
version = 1

[field.palette]
base = "#336699"
warm_low = "#336699"
warm_mid = "#336699"
cool = "#336699"
warm_high = "#336699"
highlight = "#336699"

[field.grain]
strength = 0.0
"##,
    )
    .unwrap();
    let output = root.path().join("flat.png");

    let result = driftwall(
        root.path(),
        &["still", "-o", output.to_str().unwrap(), "--size", "20x10"],
    );
    assert!(result.status.success());

    let image = image::open(&output).unwrap().to_rgba8();
    assert!(image.pixels().all(|pixel| pixel.0 == [0x33, 0x66, 0x99, 0xff]));
}

#[test]
fn still_rejects_non_png_output() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("frame.jpg");
    let result = driftwall(root.path(), &["still", "--output", output.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(!output.exists());
}

#[test]
fn config_dump_prints_parseable_defaults() {
    let root = TempDir::new().unwrap();
    let result = driftwall(root.path(), &["config", "dump"]);
    assert!(result.status.success());

    let text = String::from_utf8(result.stdout).unwrap();
    assert!(text.contains("version = 1"));
    let parsed = DriftConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed, DriftConfig::default());
}

#[test]
fn config_where_reports_the_override_directory() {
    let root = TempDir::new().unwrap();
    let result = driftwall(root.path(), &["config", "where"]);
    assert!(result.status.success());

    let text = String::from_utf8(result.stdout).unwrap();
    assert!(text.contains(&root.path().join("driftwall.toml").display().to_string()));
    assert!(text.contains("missing"));
}

#[test]
fn invalid_config_fails_with_message() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("driftwall.toml"), "version = 9\n").unwrap();

    let result = driftwall(root.path(), &["config", "dump"]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unsupported config version"), "stderr: {stderr}");
}

#[test]
fn explicit_config_must_exist() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope.toml");
    let result = driftwall(
        root.path(),
        &["--config", missing.to_str().unwrap(), "config", "dump"],
    );
    assert!(!result.status.success());
}

#[test]
fn shader_prints_generated_glsl() {
    let root = TempDir::new().unwrap();
    let result = driftwall(root.path(), &["shader"]);
    assert!(result.status.success());

    let text = String::from_utf8(result.stdout).unwrap();
    assert!(text.starts_with("#version 450"));
    assert!(text.contains("float gradient_noise(vec2 p)"));
    assert!(text.contains("uniform FieldUniforms"));
}
