use std::f32::consts::FRAC_PI_4;

/// Equal-power pan law: returns `(left, right)` gains for `pan` in [-1, 1].
///
/// Centre gives both channels ~0.707 so a sweep across the field keeps the
/// perceived loudness constant.
#[inline]
pub fn equal_power(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}
