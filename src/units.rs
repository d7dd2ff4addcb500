//! Physical unit conversion into WordprocessingML layout units.
//!
//! Twips are twentieths of a point (1440 per inch), font sizes are expressed
//! in half-points, and drawing extents in English Metric Units.
//!
//! Rounding matches half-up semantics so values stay stable across presets:
//! `20 mm` is always `1134` twips.

/// Millimeters per inch.
const MM_PER_INCH: f64 = 25.4;

/// Twips per inch.
const TWIPS_PER_INCH: f64 = 1440.0;

/// Twips per single line of text (line spacing 1.0).
const TWIPS_PER_LINE: f64 = 240.0;

/// EMU per pixel at 96 DPI.
const EMU_PER_PIXEL: u64 = 9525;

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Convert millimeters to twips.
pub fn mm_to_twips(mm: f64) -> i64 {
    round_half_up((mm / MM_PER_INCH) * TWIPS_PER_INCH)
}

/// Convert centimeters to twips.
pub fn cm_to_twips(cm: f64) -> i64 {
    mm_to_twips(cm * 10.0)
}

/// Convert points to half-points (font size unit).
pub fn pt_to_half_points(pt: f64) -> i64 {
    round_half_up(pt * 2.0)
}

/// Convert points to twips (paragraph spacing unit).
pub fn pt_to_twips(pt: f64) -> i64 {
    round_half_up(pt * 20.0)
}

/// Convert a line-spacing multiplier to the "auto" line rule value.
pub fn line_spacing_to_twips(multiplier: f64) -> i64 {
    round_half_up(TWIPS_PER_LINE * multiplier)
}

/// Convert pixels to English Metric Units.
pub fn px_to_emu(px: u32) -> u64 {
    u64::from(px) * EMU_PER_PIXEL
}
