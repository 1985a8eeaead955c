//! GLSL generation for the noise field.
//!
//! The fragment program is emitted from [`FieldParams`] so the GPU and
//! [`noisefield::Composer`] evaluate the same formulas with the same
//! constants.

use std::fmt::Write as _;

use noisefield::{BlendChannel, FieldParams, Rgb, LATTICE_HASH_ROWS, LATTICE_HASH_SCALE};

/// Number of vertices drawn for the full-screen quad (two triangles).
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Full-screen quad built from `gl_VertexIndex`; no vertex buffer is bound.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450

const vec2 positions[6] = vec2[6](
    vec2(-1.0, -1.0),
    vec2(1.0, -1.0),
    vec2(-1.0, 1.0),
    vec2(-1.0, 1.0),
    vec2(1.0, -1.0),
    vec2(1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    gl_Position = vec4(positions[vertex_index], 0.0, 1.0);
}
";

/// Uniform block shared with [`crate::uniforms::FieldUniforms`].
const PRELUDE: &str = r"#version 450
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform FieldUniforms {
    vec2 u_resolution;
    float u_time;
    float u_padding;
} field;
";

/// Builds the fragment program for `params`.
pub fn fragment_source(params: &FieldParams) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(PRELUDE);
    out.push('\n');
    push_noise(&mut out);
    push_channel(&mut out, "red_weight", &params.red);
    push_channel(&mut out, "blue_weight", &params.blue);
    push_channel(&mut out, "yellow_weight", &params.yellow);
    push_main(&mut out, params);
    out
}

fn push_noise(out: &mut String) {
    let [row_x, row_y] = LATTICE_HASH_ROWS;
    let _ = write!(
        out,
        r"vec2 lattice_hash(vec2 cell) {{
    vec2 scrambled = vec2(dot(cell, {row_x}), dot(cell, {row_y}));
    return vec2(-1.0) + 2.0 * fract(sin(scrambled) * {scale});
}}

float gradient_noise(vec2 p) {{
    vec2 cell = floor(p);
    vec2 local = p - cell;
    vec2 fade = local * local * (vec2(3.0) - 2.0 * local);

    float c00 = dot(lattice_hash(cell), local);
    float c10 = dot(lattice_hash(cell + vec2(1.0, 0.0)), local - vec2(1.0, 0.0));
    float c01 = dot(lattice_hash(cell + vec2(0.0, 1.0)), local - vec2(0.0, 1.0));
    float c11 = dot(lattice_hash(cell + vec2(1.0, 1.0)), local - vec2(1.0, 1.0));

    return mix(mix(c00, c10, fade.x), mix(c01, c11, fade.x), fade.y);
}}

",
        row_x = vec2(row_x),
        row_y = vec2(row_y),
        scale = float(LATTICE_HASH_SCALE),
    );
}

fn push_channel(out: &mut String, name: &str, channel: &BlendChannel) {
    let _ = writeln!(out, "float {name}(vec2 uv, float t) {{");
    out.push_str("    float sum = 0.0;\n");
    for layer in &channel.layers {
        let _ = writeln!(
            out,
            "    sum += gradient_noise((uv + {offset}) * {scale} + vec2(t * {drift}));",
            offset = vec2(layer.offset),
            scale = float(layer.scale),
            drift = float(layer.drift),
        );
    }
    let _ = writeln!(
        out,
        "    float average = sum / {count};",
        count = float(channel.layers.len().max(1) as f32)
    );
    let _ = write!(
        out,
        "    return smoothstep({low}, {high}, average * 0.5 + 0.5);\n}}\n\n",
        low = float(channel.edges[0]),
        high = float(channel.edges[1]),
    );
}

fn push_main(out: &mut String, params: &FieldParams) {
    let palette = &params.palette;
    let [low, mid, high] = params.red_cascade;
    let grain = &params.grain;

    let _ = write!(
        out,
        r"void main() {{
    vec2 fragCoord = vec2(gl_FragCoord.x, field.u_resolution.y - gl_FragCoord.y);
    vec2 uv = fragCoord / max(field.u_resolution, vec2(1.0)) * {zoom};
    float t = field.u_time * {field_scale};

    float red = red_weight(uv, t);
    float blue = blue_weight(uv, t);
    float yellow = yellow_weight(uv, t);

    vec3 color = mix({base}, {warm_low}, vec3(smoothstep({low0}, {low1}, red)));
    color = mix(color, {warm_mid}, vec3(smoothstep({mid0}, {mid1}, red)));
    color = mix(color, {warm_high}, vec3(smoothstep({high0}, {high1}, red)));
    color = mix(color, {cool}, vec3(blue));
    color = mix(color, {highlight}, vec3(yellow));

    vec2 jitter = vec2(sin(field.u_time * {rate0}), cos(field.u_time * {rate1})) * {amplitude};
    float grain = gradient_noise(fragCoord * {frequency} + jitter) * {grain_scale};
    color = mix(color, color * (1.0 - grain), vec3({strength}));

    outColor = vec4(clamp(color, vec3(0.0), vec3(1.0)), 1.0);
}}
",
        zoom = float(params.zoom),
        field_scale = float(params.time.field_scale),
        base = rgb(palette.base),
        warm_low = rgb(palette.warm_low),
        warm_mid = rgb(palette.warm_mid),
        warm_high = rgb(palette.warm_high),
        cool = rgb(palette.cool),
        highlight = rgb(palette.highlight),
        low0 = float(low[0]),
        low1 = float(low[1]),
        mid0 = float(mid[0]),
        mid1 = float(mid[1]),
        high0 = float(high[0]),
        high1 = float(high[1]),
        rate0 = float(grain.rates[0]),
        rate1 = float(grain.rates[1]),
        amplitude = float(grain.amplitude),
        frequency = float(grain.frequency),
        grain_scale = float(grain.scale),
        strength = float(grain.strength),
    );
}

/// GLSL float literal. `Debug` always keeps a fractional part or exponent.
fn float(value: f32) -> String {
    if value < 0.0 {
        format!("({value:?})")
    } else {
        format!("{value:?}")
    }
}

fn vec2([x, y]: [f32; 2]) -> String {
    format!("vec2({}, {})", float(x), float(y))
}

fn rgb(color: Rgb) -> String {
    let [r, g, b] = color.0;
    format!("vec3({}, {}, {})", float(r), float(g), float(b))
}
