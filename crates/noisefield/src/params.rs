use std::fmt;

use glam::Vec3;
use serde::de::{self, Deserializer, SeqAccess};
use serde::{Deserialize, Serialize};

/// Number of entries in the blend palette.
pub const PALETTE_LEN: usize = 6;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color '{0}' must look like #RRGGBB")]
    Format(String),
    #[error("color '{0}' contains non-hexadecimal digits")]
    Digits(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("{field} must be finite and greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
    #[error("{field} edges must be strictly increasing (got {lower} >= {upper})")]
    Edges {
        field: &'static str,
        lower: f32,
        upper: f32,
    },
    #[error("{0} must contain at least one noise layer")]
    NoLayers(&'static str),
    #[error("palette entry {index} has a component outside [0, 1]")]
    ColorRange { index: usize },
    #[error("grain.strength must lie in [0, 1] (got {0})")]
    GrainStrength(f32),
}

/// Linear RGB triple with components in [0, 1].
///
/// Deserializes from either `"#RRGGBB"` or `[r, g, b]`; always serializes as
/// the array form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    pub fn from_hex(raw: &str) -> Result<Self, ColorParseError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .filter(|rest| rest.len() == 6 && rest.is_ascii())
            .ok_or_else(|| ColorParseError::Format(trimmed.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|value| f32::from(value) / 255.0)
                .map_err(|_| ColorParseError::Digits(trimmed.to_string()))
        };
        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::from(self.0)
    }

    fn in_unit_range(self) -> bool {
        self.0
            .iter()
            .all(|component| component.is_finite() && (0.0..=1.0).contains(component))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Rgb;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a \"#RRGGBB\" string or an [r, g, b] array of floats")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Rgb::from_hex(v).map_err(E::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut components = [0.0_f32; 3];
                for (index, slot) in components.iter_mut().enumerate() {
                    *slot = seq
                        .next_element::<f32>()?
                        .ok_or_else(|| de::Error::invalid_length(index, &self))?;
                }
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }
                Ok(Rgb(components))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// The six blend targets, in cascade order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Starting color before any blend weight applies.
    pub base: Rgb,
    /// Reached by the first red threshold.
    pub warm_low: Rgb,
    /// Reached by the second red threshold.
    pub warm_mid: Rgb,
    /// Target of the blue blend weight.
    pub cool: Rgb,
    /// Reached by the third red threshold.
    pub warm_high: Rgb,
    /// Target of the yellow blend weight.
    pub highlight: Rgb,
}

impl Palette {
    /// Colors in their fixed order `c1..c6`.
    pub fn colors(&self) -> [Rgb; PALETTE_LEN] {
        [
            self.base,
            self.warm_low,
            self.warm_mid,
            self.cool,
            self.warm_high,
            self.highlight,
        ]
    }

    pub fn from_colors(colors: [Rgb; PALETTE_LEN]) -> Self {
        let [base, warm_low, warm_mid, cool, warm_high, highlight] = colors;
        Self {
            base,
            warm_low,
            warm_mid,
            cool,
            warm_high,
            highlight,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let cream = Rgb::new(0.980, 0.961, 0.941);
        let ice = Rgb::new(0.940, 0.995, 1.000);
        let peach = Rgb::new(1.000, 0.932, 0.880);
        Self::from_colors([cream, ice, peach, ice, peach, peach])
    }
}

/// One noise sample: `noise((uv + offset) * scale + t * drift)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    #[serde(default)]
    pub offset: [f32; 2],
    pub scale: f32,
    pub drift: f32,
}

impl NoiseLayer {
    pub const fn new(offset: [f32; 2], scale: f32, drift: f32) -> Self {
        Self {
            offset,
            scale,
            drift,
        }
    }
}

/// Averaged noise layers thresholded into a single blend weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendChannel {
    /// `smoothstep` edges applied to the remapped average.
    pub edges: [f32; 2],
    pub layers: Vec<NoiseLayer>,
}

impl BlendChannel {
    pub fn red() -> Self {
        Self {
            edges: [0.35, 0.75],
            layers: vec![
                NoiseLayer::new([0.0, 0.0], 0.5, 0.2),
                NoiseLayer::new([0.0, 0.0], 0.75, -0.15),
                NoiseLayer::new([0.0, 0.0], 1.0, 0.1),
            ],
        }
    }

    pub fn blue() -> Self {
        Self {
            edges: [0.35, 0.75],
            layers: vec![
                NoiseLayer::new([0.2, -0.3], 0.6, -0.12),
                NoiseLayer::new([-0.4, 0.1], 0.8, 0.18),
                NoiseLayer::new([0.3, 0.2], 1.0, -0.09),
            ],
        }
    }

    pub fn yellow() -> Self {
        Self {
            edges: [0.45, 0.70],
            layers: vec![
                NoiseLayer::new([0.5, -0.2], 0.4, 0.07),
                NoiseLayer::new([-0.3, 0.4], 0.45, -0.05),
            ],
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), ParamsError> {
        if self.layers.is_empty() {
            return Err(ParamsError::NoLayers(field));
        }
        check_edges(field, self.edges)?;
        for layer in &self.layers {
            let values = [layer.offset[0], layer.offset[1], layer.scale, layer.drift];
            if values.iter().any(|value| !value.is_finite()) {
                return Err(ParamsError::NotFinite { field });
            }
        }
        Ok(())
    }
}

/// Time scaling shared by the render loop and the shader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeParams {
    /// Shader time units gained per wall-clock millisecond.
    pub frame_scale: f32,
    /// Factor applied to shader time before it drives the noise layers.
    pub field_scale: f32,
}

impl Default for TimeParams {
    fn default() -> Self {
        Self {
            frame_scale: 0.025,
            field_scale: 0.1,
        }
    }
}

/// Per-pixel darkening noise layered over the blended palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainParams {
    /// Multiplier applied to the raw pixel coordinate.
    pub frequency: f32,
    /// Radius of the time-driven jitter added to the sample position.
    pub amplitude: f32,
    /// Angular rates of the `sin` / `cos` jitter terms.
    pub rates: [f32; 2],
    /// Scale applied to the raw noise sample.
    pub scale: f32,
    /// Mix factor between the color and its darkened copy.
    pub strength: f32,
}

impl Default for GrainParams {
    fn default() -> Self {
        Self {
            frequency: 4.0,
            amplitude: 20.0,
            rates: [2.0, 3.0],
            scale: 0.05,
            strength: 0.15,
        }
    }
}

/// Every constant the composer and the generated shader depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Multiplier applied to normalized screen coordinates.
    pub zoom: f32,
    /// `smoothstep` edges of the three cascaded red mixes (`c2`, `c3`, `c5`).
    pub red_cascade: [[f32; 2]; 3],
    pub time: TimeParams,
    pub palette: Palette,
    pub red: BlendChannel,
    pub blue: BlendChannel,
    pub yellow: BlendChannel,
    pub grain: GrainParams,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            zoom: 1.2,
            red_cascade: [[0.0, 0.3], [0.2, 0.6], [0.7, 1.0]],
            time: TimeParams::default(),
            palette: Palette::default(),
            red: BlendChannel::red(),
            blue: BlendChannel::blue(),
            yellow: BlendChannel::yellow(),
            grain: GrainParams::default(),
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_positive("zoom", self.zoom)?;
        check_non_negative("time.frame_scale", self.time.frame_scale)?;
        check_finite("time.field_scale", self.time.field_scale)?;

        for (index, edges) in self.red_cascade.iter().enumerate() {
            let field = ["red_cascade[0]", "red_cascade[1]", "red_cascade[2]"][index];
            check_edges(field, *edges)?;
        }

        self.red.validate("red")?;
        self.blue.validate("blue")?;
        self.yellow.validate("yellow")?;

        for (index, color) in self.palette.colors().iter().enumerate() {
            if !color.in_unit_range() {
                return Err(ParamsError::ColorRange { index });
            }
        }

        check_finite("grain.frequency", self.grain.frequency)?;
        check_finite("grain.amplitude", self.grain.amplitude)?;
        check_finite("grain.rates", self.grain.rates[0])?;
        check_finite("grain.rates", self.grain.rates[1])?;
        check_non_negative("grain.scale", self.grain.scale)?;
        if !(0.0..=1.0).contains(&self.grain.strength) {
            return Err(ParamsError::GrainStrength(self.grain.strength));
        }

        Ok(())
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ParamsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::NotPositive { field, value })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ParamsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::Negative { field, value })
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ParamsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamsError::NotFinite { field })
    }
}

fn check_edges(field: &'static str, [lower, upper]: [f32; 2]) -> Result<(), ParamsError> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(ParamsError::NotFinite { field });
    }
    if lower >= upper {
        return Err(ParamsError::Edges {
            field,
            lower,
            upper,
        });
    }
    Ok(())
}
