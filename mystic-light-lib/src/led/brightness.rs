//! Conversion between the host brightness scale (0..=255) and the daemon's levels (1..=5).

/// Host brightness covered by one daemon level.
pub const STEP: u8 = 50;

/// Lowest daemon level.
pub const MIN_LEVEL: u8 = 1;

/// Highest daemon level.
pub const MAX_LEVEL: u8 = 5;

/// Daemon level → host brightness, `level * 50`. Levels above 5 are capped first so the
/// product fits the host scale.
pub fn to_host(level: u8) -> u8 {
    level.min(MAX_LEVEL) * STEP
}

/// Host brightness → daemon level, rounding up: `ceil(brightness / 50)` clamped to 1..=5.
pub fn to_level(brightness: u8) -> u8 {
    let level = (u16::from(brightness) + u16::from(STEP) - 1) / u16::from(STEP);
    // at most 6 after the division, so the cast is lossless
    (level as u8).clamp(MIN_LEVEL, MAX_LEVEL)
}
