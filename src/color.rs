//! Theme color parsing and RGBA helpers.

use std::fmt;

/// Straight-alpha color with 8-bit channels and a floating point alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha multiplied by `factor`, clamped to [0, 1].
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Formats as a CSS `rgba()` string.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Parse `#RGB` or `#RRGGBB` into its channels. Returns `None` for anything else.
pub fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            // #RGB -> #RRGGBB (doubled digits)
            let mut out = [0u8; 3];
            for (slot, c) in out.iter_mut().zip(hex.chars()) {
                *slot = c.to_digit(16)? as u8 * 17;
            }
            Some(out)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

/// Convert a hex theme color to RGBA at a fixed alpha.
pub fn hex_to_rgba(s: &str, alpha: f32) -> Option<Rgba> {
    let [r, g, b] = parse_hex(s)?;
    Some(Rgba::new(r, g, b, alpha.clamp(0.0, 1.0)))
}

/// Like [`hex_to_rgba`] but falls back to `default` when `value` is unset or
/// unparseable. `default` must itself be valid hex.
pub fn resolve_theme_color(value: Option<&str>, default: &str, alpha: f32) -> Rgba {
    if let Some(v) = value {
        if let Some(color) = hex_to_rgba(v, alpha) {
            return color;
        }
        log::warn!("Ignoring theme color {:?}, using {}", v, default);
    }
    hex_to_rgba(default, alpha).unwrap_or(Rgba::WHITE.with_alpha(alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_roundtrip() {
        let c = hex_to_rgba("#7c3aed", 0.55).unwrap();
        assert_eq!((c.r, c.g, c.b), (0x7c, 0x3a, 0xed));
        assert_eq!(c.a, 0.55);
    }

    #[test]
    fn test_three_digit_doubles_digits() {
        let c = hex_to_rgba("#1bF", 0.4).unwrap();
        assert_eq!((c.r, c.g, c.b), (0x11, 0xbb, 0xff));
        assert_eq!(c.a, 0.4);
    }

    #[test]
    fn test_every_channel_value_survives() {
        for v in 0..=255u8 {
            let hex = format!("#{:02x}{:02X}{:02x}", v, v, 255 - v);
            let c = hex_to_rgba(&hex, 0.3).unwrap();
            assert_eq!((c.r, c.g, c.b), (v, v, 255 - v), "channel mismatch for {}", hex);
            assert_eq!(c.a, 0.3);
        }
        for d in 0..16u8 {
            let hex = format!("#{:x}{:x}{:x}", d, d, d);
            let c = hex_to_rgba(&hex, 1.0).unwrap();
            assert_eq!(c.r, d * 17);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("7c3aed"), None);
        assert_eq!(parse_hex("#7c3ae"), None);
        assert_eq!(parse_hex("#zzz"), None);
        assert_eq!(parse_hex("#7c3aedff"), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(parse_hex("  #fff "), Some([255, 255, 255]));
    }

    #[test]
    fn test_theme_fallback() {
        let c = resolve_theme_color(Some("not-a-color"), "#14b8a6", 0.5);
        assert_eq!((c.r, c.g, c.b, c.a), (0x14, 0xb8, 0xa6, 0.5));
        let c = resolve_theme_color(None, "#3b82f6", 0.5);
        assert_eq!((c.r, c.g, c.b), (0x3b, 0x82, 0xf6));
    }

    #[test]
    fn test_css_string() {
        let c = Rgba::new(124, 58, 237, 0.55);
        assert_eq!(c.to_string(), "rgba(124, 58, 237, 0.55)");
    }
}
