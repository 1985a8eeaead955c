use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use noisefield::FieldParams;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub const CONFIG_VERSION: u32 = 1;
pub const CONFIG_FILE_NAME: &str = "driftwall.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriftConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub field: FieldParams,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RenderSettings {
    /// Frame rate cap; `0` or absent renders at the display refresh rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antialias: Option<AntialiasSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SurfaceSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fullscreen: bool,
    /// Hold the field at this shader time instead of animating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub still_time: Option<f32>,
}

/// MSAA preference as written in the config file: `"auto"`, `"off"` or a
/// sample count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples(u32),
}

impl AntialiasSetting {
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            0 | 1 => Some(Self::Off),
            2 | 4 | 8 | 16 => Some(Self::Samples(samples)),
            _ => None,
        }
    }
}

impl FromStr for AntialiasSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "auto" | "max" | "default" => Ok(Self::Auto),
            "off" | "none" | "disable" | "disabled" => Ok(Self::Off),
            other => other
                .parse::<u32>()
                .ok()
                .and_then(Self::from_samples)
                .ok_or_else(|| {
                    format!("invalid antialias setting '{other}'; use auto/off or 2/4/8/16")
                }),
        }
    }
}

impl fmt::Display for AntialiasSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Off => f.write_str("off"),
            Self::Samples(samples) => write!(f, "{samples}"),
        }
    }
}

impl Serialize for AntialiasSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AntialiasSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Str(String),
            Num(i64),
        }

        match Helper::deserialize(deserializer)? {
            Helper::Str(raw) => raw.parse().map_err(de::Error::custom),
            Helper::Num(value) => {
                let samples = u32::try_from(value)
                    .map_err(|_| de::Error::custom("antialias value must be non-negative"))?;
                Self::from_samples(samples).ok_or_else(|| {
                    de::Error::custom(format!(
                        "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                    ))
                })
            }
        }
    }
}

/// Window size in physical pixels, written as `"WIDTHxHEIGHT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FromStr for SurfaceSize {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        parse_size(spec).map(|(width, height)| Self::new(width, height))
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for SurfaceSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SurfaceSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Parses `WIDTHxHEIGHT` (either `x` or `X` as separator); both axes must be
/// non-zero.
pub fn parse_size(spec: &str) -> Result<(u32, u32), String> {
    let (width, height) = spec
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| "invalid width in size specification".to_string())?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| "invalid height in size specification".to_string())?;

    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            render: RenderSettings::default(),
            field: FieldParams::default(),
        }
    }
}

impl DriftConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: DriftConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        if let Some(fps) = self.render.fps {
            if !fps.is_finite() || fps < 0.0 {
                return Err(ConfigError::Invalid("render.fps must be >= 0".into()));
            }
        }

        if let Some(time) = self.render.still_time {
            if !time.is_finite() || time < 0.0 {
                return Err(ConfigError::Invalid(
                    "render.still_time must be a non-negative number".into(),
                ));
            }
        }

        if let Some(title) = &self.render.title {
            if title.trim().is_empty() {
                return Err(ConfigError::Invalid("render.title may not be empty".into()));
            }
        }

        self.field
            .validate()
            .map_err(|err| ConfigError::Invalid(format!("field: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noisefield::Rgb;
    use tempfile::TempDir;

    const SAMPLE: &str = r##"
version = 1

[render]
fps = 30
antialias = 4
size = "1280x720"
title = "lobby screen"

[field]
zoom = 2.0

[field.palette]
base = "#000000"
highlight = [0.25, 0.5, 1.0]

[field.grain]
strength = 0.3

[field.time]
frame_scale = 0.05
"##;

    #[test]
    fn parses_sample_config() {
        let config = DriftConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.render.fps, Some(30.0));
        assert_eq!(config.render.antialias, Some(AntialiasSetting::Samples(4)));
        assert_eq!(config.render.size, Some(SurfaceSize::new(1280, 720)));
        assert_eq!(config.render.title.as_deref(), Some("lobby screen"));
        assert!(!config.render.fullscreen);

        assert_eq!(config.field.zoom, 2.0);
        assert_eq!(config.field.palette.base, Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(config.field.palette.highlight, Rgb::new(0.25, 0.5, 1.0));
        assert_eq!(
            config.field.palette.warm_low,
            noisefield::Palette::default().warm_low
        );
        assert_eq!(config.field.grain.strength, 0.3);
        assert_eq!(config.field.grain.scale, 0.05);
        assert_eq!(config.field.time.frame_scale, 0.05);
        assert_eq!(config.field.time.field_scale, 0.1);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = DriftConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, DriftConfig::default());
    }

    #[test]
    fn defaults_survive_a_round_trip() {
        let text = DriftConfig::default().to_toml_string().unwrap();
        assert!(text.contains("version = 1"));
        let parsed = DriftConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, DriftConfig::default());
    }

    #[test]
    fn rejects_unknown_version() {
        let err = DriftConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_fps() {
        let err = DriftConfig::from_toml_str("[render]\nfps = -5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_field_values() {
        let err = DriftConfig::from_toml_str("[field]\nzoom = 0.0").unwrap_err();
        assert!(err.to_string().contains("zoom"));

        let err = DriftConfig::from_toml_str("[field.palette]\nbase = \"#12\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn antialias_accepts_strings_and_numbers() {
        for (raw, expected) in [
            ("\"auto\"", AntialiasSetting::Auto),
            ("\"off\"", AntialiasSetting::Off),
            ("\"8\"", AntialiasSetting::Samples(8)),
            ("0", AntialiasSetting::Off),
            ("16", AntialiasSetting::Samples(16)),
        ] {
            let config = DriftConfig::from_toml_str(&format!("[render]\nantialias = {raw}"))
                .unwrap_or_else(|err| panic!("{raw}: {err}"));
            assert_eq!(config.render.antialias, Some(expected));
        }

        assert!(DriftConfig::from_toml_str("[render]\nantialias = 3").is_err());
        assert!(DriftConfig::from_toml_str("[render]\nantialias = \"ultra\"").is_err());
    }

    #[test]
    fn size_parsing_rejects_degenerate_values() {
        assert_eq!(parse_size("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_size(" 800 X 600 "), Ok((800, 600)));
        assert!(parse_size("0x600").is_err());
        assert!(parse_size("1920").is_err());
        assert!(parse_size("widexhigh").is_err());
        assert!(DriftConfig::from_toml_str("[render]\nsize = \"10x0\"").is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let root = TempDir::new().unwrap();
        let path = root.path().join(CONFIG_FILE_NAME);
        let config = DriftConfig::load_or_default(&path).unwrap();
        assert_eq!(config, DriftConfig::default());
        assert!(matches!(
            DriftConfig::load(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn loads_config_from_disk() {
        let root = TempDir::new().unwrap();
        let path = root.path().join(CONFIG_FILE_NAME);
        fs::write(&path, SAMPLE).unwrap();
        let config = DriftConfig::load(&path).unwrap();
        assert_eq!(config.render.size, Some(SurfaceSize::new(1280, 720)));
    }
}
