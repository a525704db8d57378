//! Float math matching the Bedrock client.
//!
//! The client computes directional impulses through a quantized sine table
//! rather than calling libm directly; reproducing that table keeps the
//! movement simulation bit-comparable with what the client actually does.

pub mod aabb;

use std::sync::OnceLock;

/// Number of entries in the client's sine table.
const SIN_TABLE_SIZE: usize = 65536;

/// Conversion factor from radians to table indices (`65536 / 2π`).
const SIN_TO_INDEX: f32 = 10430.378;

fn sin_table() -> &'static [f32; SIN_TABLE_SIZE] {
    static TABLE: OnceLock<Box<[f32; SIN_TABLE_SIZE]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = vec![0.0f32; SIN_TABLE_SIZE];
        for (i, v) in table.iter_mut().enumerate() {
            *v = f64::sin(i as f64 * std::f64::consts::TAU / SIN_TABLE_SIZE as f64) as f32;
        }
        table.into_boxed_slice().try_into().expect("table length is fixed")
    })
}

/// Sine of `rad` as the client computes it, through the quantized table.
#[must_use]
pub fn mc_sin(rad: f32) -> f32 {
    sin_table()[(rad * SIN_TO_INDEX) as i32 as usize & (SIN_TABLE_SIZE - 1)]
}

/// Cosine of `rad` as the client computes it, through the quantized table.
#[must_use]
pub fn mc_cos(rad: f32) -> f32 {
    sin_table()[((rad * SIN_TO_INDEX) as i32 as usize).wrapping_add(SIN_TABLE_SIZE / 4)
        & (SIN_TABLE_SIZE - 1)]
}

/// Rounds `v` to `places` decimal places. Used for log/event payloads only,
/// never inside the simulation itself.
#[must_use]
pub fn round(v: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (v * factor).round() / factor
}

/// Returns true when `a` and `b` differ by no more than `threshold`.
#[must_use]
pub fn float_equal_threshold(a: f32, b: f32, threshold: f32) -> bool {
    (a - b).abs() <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sine_tracks_libm() {
        for i in 0..100 {
            let rad = i as f32 * 0.17;
            assert!((mc_sin(rad) - rad.sin()).abs() < 1e-3, "sin({rad}) diverged");
            assert!((mc_cos(rad) - rad.cos()).abs() < 1e-3, "cos({rad}) diverged");
        }
    }

    #[test]
    fn round_truncates_to_places() {
        assert!((round(0.123_456, 2) - 0.12).abs() < 1e-6);
        assert!((round(-1.987, 1) + 2.0).abs() < 1e-6);
    }
}
