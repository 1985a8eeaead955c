use glam::{Vec2, Vec3};

use crate::noise::gradient_noise;
use crate::params::{BlendChannel, FieldParams};

/// Hermite step: 0 below `edge0`, 1 above `edge1`, smooth in between.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL-style linear interpolation.
#[inline]
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Per-pixel weights driving the palette blend, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BlendWeights {
    pub red: f32,
    pub blue: f32,
    pub yellow: f32,
}

/// CPU evaluation of the fragment program.
///
/// `shade` is a pure function of `(frag_coord, resolution, time)`; the
/// composer holds no per-frame state.
#[derive(Debug, Clone)]
pub struct Composer {
    params: FieldParams,
}

impl Composer {
    pub fn new(params: FieldParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Normalized, zoomed coordinate for a fragment. Zero-sized axes are
    /// treated as one pixel wide.
    pub fn field_uv(&self, frag_coord: Vec2, resolution: Vec2) -> Vec2 {
        frag_coord / resolution.max(Vec2::ONE) * self.params.zoom
    }

    pub fn blend_weights(&self, uv: Vec2, time: f32) -> BlendWeights {
        let t = time * self.params.time.field_scale;
        BlendWeights {
            red: channel_weight(&self.params.red, uv, t),
            blue: channel_weight(&self.params.blue, uv, t),
            yellow: channel_weight(&self.params.yellow, uv, t),
        }
    }

    /// Palette cascade: three thresholded red mixes, then linear blue and
    /// yellow mixes.
    pub fn blend(&self, weights: BlendWeights) -> Vec3 {
        let palette = &self.params.palette;
        let [low, mid, high] = self.params.red_cascade;

        let mut color = mix(
            palette.base.to_vec3(),
            palette.warm_low.to_vec3(),
            smoothstep(low[0], low[1], weights.red),
        );
        color = mix(
            color,
            palette.warm_mid.to_vec3(),
            smoothstep(mid[0], mid[1], weights.red),
        );
        color = mix(
            color,
            palette.warm_high.to_vec3(),
            smoothstep(high[0], high[1], weights.red),
        );

        color = mix(color, palette.cool.to_vec3(), weights.blue);
        mix(color, palette.highlight.to_vec3(), weights.yellow)
    }

    /// Signed grain term for a fragment, already scaled by `grain.scale`.
    pub fn grain(&self, frag_coord: Vec2, time: f32) -> f32 {
        let grain = &self.params.grain;
        let jitter = Vec2::new(
            (time * grain.rates[0]).sin(),
            (time * grain.rates[1]).cos(),
        ) * grain.amplitude;
        gradient_noise(frag_coord * grain.frequency + jitter) * grain.scale
    }

    /// Final RGBA for one fragment. `frag_coord` uses a bottom-left origin
    /// with pixel centers at `+0.5`.
    pub fn shade(&self, frag_coord: Vec2, resolution: Vec2, time: f32) -> [f32; 4] {
        let uv = self.field_uv(frag_coord, resolution);
        let color = self.blend(self.blend_weights(uv, time));

        let grain = self.grain(frag_coord, time);
        let color = mix(color, color * (1.0 - grain), self.params.grain.strength)
            .clamp(Vec3::ZERO, Vec3::ONE);

        [color.x, color.y, color.z, 1.0]
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(FieldParams::default())
    }
}

fn channel_weight(channel: &BlendChannel, uv: Vec2, t: f32) -> f32 {
    let sum: f32 = channel
        .layers
        .iter()
        .map(|layer| {
            let p = (uv + Vec2::from(layer.offset)) * layer.scale + Vec2::splat(t * layer.drift);
            gradient_noise(p)
        })
        .sum();
    let average = sum / channel.layers.len().max(1) as f32;
    smoothstep(channel.edges[0], channel.edges[1], average * 0.5 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Palette, Rgb};
    use rand::prelude::*;

    fn distinct_palette() -> Composer {
        let params = FieldParams {
            palette: Palette::from_colors([
                Rgb::new(0.0, 0.0, 0.0),
                Rgb::new(1.0, 0.0, 0.0),
                Rgb::new(0.0, 1.0, 0.0),
                Rgb::new(0.0, 0.0, 1.0),
                Rgb::new(1.0, 1.0, 0.0),
                Rgb::new(0.0, 1.0, 1.0),
            ]),
            ..FieldParams::default()
        };
        Composer::new(params)
    }

    fn assert_close(actual: Vec3, expected: Rgb) {
        let expected = expected.to_vec3();
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn smoothstep_clamps_and_eases() {
        assert_eq!(smoothstep(0.35, 0.75, 0.0), 0.0);
        assert_eq!(smoothstep(0.35, 0.75, 1.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!(smoothstep(0.0, 1.0, 0.25) < 0.25);
        assert!(smoothstep(0.0, 1.0, 0.75) > 0.75);
    }

    #[test]
    fn output_stays_in_gamut_with_opaque_alpha() {
        let composer = Composer::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20_000 {
            let resolution = Vec2::new(
                rng.gen_range(1..=4096) as f32,
                rng.gen_range(1..=4096) as f32,
            );
            let frag = Vec2::new(
                rng.gen_range(0.0..resolution.x) + 0.5,
                rng.gen_range(0.0..resolution.y) + 0.5,
            );
            let time = rng.gen_range(0.0..50_000.0);
            let [r, g, b, a] = composer.shade(frag, resolution, time);
            for component in [r, g, b] {
                assert!((0.0..=1.0).contains(&component), "component {component}");
            }
            assert_eq!(a, 1.0);
        }
    }

    #[test]
    fn shading_is_pure() {
        let composer = Composer::default();
        let frag = Vec2::new(123.5, 456.5);
        let resolution = Vec2::new(800.0, 600.0);
        let first = composer.shade(frag, resolution, 17.25);
        let second = composer.shade(frag, resolution, 17.25);
        assert_eq!(first, second);
    }

    #[test]
    fn grain_vanishes_on_pixel_centers_at_time_zero() {
        let composer = Composer::default();
        for x in (0..800).step_by(37) {
            for y in (0..600).step_by(29) {
                let frag = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                assert_eq!(composer.grain(frag, 0.0).abs(), 0.0);
            }
        }
    }

    #[test]
    fn time_zero_matches_palette_blend() {
        let composer = Composer::default();
        let resolution = Vec2::new(800.0, 600.0);
        for frag in [Vec2::new(0.5, 0.5), Vec2::new(400.5, 300.5), Vec2::new(799.5, 599.5)] {
            let uv = composer.field_uv(frag, resolution);
            let expected = composer.blend(composer.blend_weights(uv, 0.0));
            let [r, g, b, _] = composer.shade(frag, resolution, 0.0);
            assert!(Vec3::new(r, g, b).abs_diff_eq(expected, 1e-6));
        }
    }

    #[test]
    fn weights_stay_in_unit_range() {
        let composer = Composer::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..5_000 {
            let uv = Vec2::new(rng.gen_range(0.0..1.2), rng.gen_range(0.0..1.2));
            let weights = composer.blend_weights(uv, rng.gen_range(0.0..10_000.0));
            for weight in [weights.red, weights.blue, weights.yellow] {
                assert!((0.0..=1.0).contains(&weight));
            }
        }
    }

    #[test]
    fn every_palette_entry_is_reachable() {
        let composer = distinct_palette();
        let colors = composer.params().palette.colors();
        let blend = |red, blue, yellow| composer.blend(BlendWeights { red, blue, yellow });

        assert_close(blend(0.0, 0.0, 0.0), colors[0]);
        assert_close(blend(0.65, 0.0, 0.0), colors[2]);
        assert_close(blend(0.0, 1.0, 0.0), colors[3]);
        assert_close(blend(1.0, 0.0, 0.0), colors[4]);
        assert_close(blend(0.0, 0.0, 1.0), colors[5]);

        // The first red threshold saturates before the second starts, so c2
        // dominates around red = 0.2 rather than matching exactly.
        let near_low = blend(0.2, 0.0, 0.0);
        let nearest = colors
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = near_low.distance(a.to_vec3());
                let db = near_low.distance(b.to_vec3());
                da.total_cmp(&db)
            })
            .map(|(index, _)| index);
        assert_eq!(nearest, Some(1));
    }

    #[test]
    fn zero_sized_resolution_does_not_produce_nan() {
        let composer = Composer::default();
        let color = composer.shade(Vec2::new(0.5, 300.5), Vec2::new(0.0, 600.0), 12.0);
        assert!(color.iter().all(|component| component.is_finite()));
    }

    #[test]
    fn zoom_changes_the_sampled_field() {
        let base = Composer::default();
        let zoomed = Composer::new(FieldParams {
            zoom: 3.0,
            ..FieldParams::default()
        });
        let frag = Vec2::new(640.0, 200.0);
        let resolution = Vec2::new(1280.0, 720.0);
        assert_ne!(
            base.field_uv(frag, resolution),
            zoomed.field_uv(frag, resolution)
        );
        assert!((zoomed.field_uv(frag, resolution).x - 1.5).abs() < 1e-6);
    }
}
