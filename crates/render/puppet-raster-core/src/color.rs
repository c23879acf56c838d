//! Hex color parsing for backgrounds and joint markers.

use image::Rgba;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn byte(hex: &str, at: usize) -> Option<u8> {
    hex.get(at..at + 2).and_then(|s| u8::from_str_radix(s, 16).ok())
}

/// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
pub fn parse_hex(color: &str) -> Option<Rgba<u8>> {
    let hex = color.trim().trim_start_matches('#');
    match hex.len() {
        6 => Some(Rgba([byte(hex, 0)?, byte(hex, 2)?, byte(hex, 4)?, 255])),
        8 => Some(Rgba([byte(hex, 0)?, byte(hex, 2)?, byte(hex, 4)?, byte(hex, 6)?])),
        _ => None,
    }
}

/// Background fill: anything unparseable becomes opaque white.
pub fn parse_background(color: &str) -> Rgba<u8> {
    parse_hex(color).unwrap_or(WHITE)
}
