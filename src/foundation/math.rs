/// `round(x * y / 255)` in integer arithmetic.
pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Nearest-integer rounding for non-negative counts; non-finite or negative input maps to 0.
pub(crate) fn round_to_u64(v: f64) -> u64 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.round() as u64
}
