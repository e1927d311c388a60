//! GST conversions.
//!
//! Pure functions converting between GST-inclusive and GST-exclusive
//! amounts at the fixed 18% rate.  Every function rounds its result to
//! two decimals with [`round2`], which is also the rounding helper the
//! rest of the engine uses for intermediate money values.  Rounding at
//! each step, instead of once at the end, keeps computed schedules
//! identical to the ones already stored by the surrounding application.

/// GST rate applied to GST-exclusive amounts.
pub const GST_RATE: f64 = 0.18;

/// Factor turning a GST-exclusive amount into a GST-inclusive one.
pub const GST_MULTIPLIER: f64 = 1.18;

/// Rounds to two decimals the way `Math.round(x * 100) / 100` does:
/// halves round towards positive infinity, so `-0.125` becomes
/// `-0.12` rather than `-0.13`.
pub fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// GST owed on a GST-exclusive `base`.
pub fn calculate_gst(base: f64) -> f64 {
    round2(base * GST_RATE)
}

/// The GST portion contained in a GST-inclusive `total`.
pub fn extract_gst_from_total(total: f64) -> f64 {
    round2(total - total / GST_MULTIPLIER)
}

/// The GST-exclusive portion of a GST-inclusive `total`.
pub fn extract_base_amount_from_total(total: f64) -> f64 {
    round2(total / GST_MULTIPLIER)
}

/// `base` plus GST.
pub fn calculate_total_with_gst(base: f64) -> f64 {
    round2(base * GST_MULTIPLIER)
}
