use glam::Vec2;

/// Rows of the matrix that scrambles a lattice coordinate before hashing.
pub const LATTICE_HASH_ROWS: [[f32; 2]; 2] = [[127.1, 311.7], [269.5, 183.3]];

/// Multiplier applied to `sin()` before taking the fractional part.
pub const LATTICE_HASH_SCALE: f32 = 43_758.547;

#[inline]
pub(crate) fn fract(value: f32) -> f32 {
    value - value.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Pseudo-random gradient for an integer lattice point, components in [-1, 1].
///
/// Pure function of `cell`; the same lattice point always hashes to the same
/// gradient.
pub fn lattice_gradient(cell: Vec2) -> Vec2 {
    let [row_x, row_y] = LATTICE_HASH_ROWS;
    let scrambled = Vec2::new(cell.dot(Vec2::from(row_x)), cell.dot(Vec2::from(row_y)));
    Vec2::new(
        -1.0 + 2.0 * fract(scrambled.x.sin() * LATTICE_HASH_SCALE),
        -1.0 + 2.0 * fract(scrambled.y.sin() * LATTICE_HASH_SCALE),
    )
}

/// 2D gradient noise sampled at `p`, roughly in [-1, 1].
///
/// The four surrounding lattice gradients are dotted with the offset to `p`
/// and blended with the `3t² - 2t³` fade on both axes. Evaluates to exactly
/// zero on lattice points.
pub fn gradient_noise(p: Vec2) -> f32 {
    let cell = p.floor();
    let local = p - cell;
    let fade = local * local * (Vec2::splat(3.0) - 2.0 * local);

    let corner = |offset: Vec2| lattice_gradient(cell + offset).dot(local - offset);

    mix(
        mix(corner(Vec2::ZERO), corner(Vec2::X), fade.x),
        mix(corner(Vec2::Y), corner(Vec2::ONE), fade.x),
        fade.y,
    )
}
