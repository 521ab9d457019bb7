//! Hex color helpers. Catalog colors are `#RRGGBB`; background tints append a
//! two-digit alpha suffix, giving `#RRGGBBAA`.

/// Parse the RGB part of `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    if digits.len() == 8 {
        channel(6)?;
    }
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Append an alpha suffix (e.g. `"30"`) to a `#RRGGBB` color.
pub fn with_alpha_suffix(hex: &str, suffix: &str) -> String {
    format!("{hex}{suffix}")
}

/// CSS `rgba()` string for a hex color. Unparseable input renders as black.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// Brighten each channel by `percent` of full scale, saturating at 255.
pub fn lighten(hex: &str, percent: f64) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    let amt = (2.55 * percent).round() as i32;
    let up = |c: u8| (c as i32 + amt).clamp(0, 255);
    format!("#{:02x}{:02x}{:02x}", up(r), up(g), up(b))
}
