#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque RGB color. Opacity of strokes and fills is set separately, the way the map library
/// expects it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_css()
    }
}

impl Color {
    /// Black color: `#000000`
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Dark ink used for route city markers: `#252525`
    pub const INK: Color = Color::from_hex("#252525");
    /// Brown used for the route lines: `#5d2521`
    pub const ROUTE: Color = Color::from_hex("#5d2521");
    /// Sand used for region polygons: `#A67B5B`
    pub const SAND: Color = Color::from_hex("#A67B5B");

    /// Constructs color from its RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts the color into CSS hex string: `#rrggbb`.
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses a color from the hex string `#RRGGBB`. Returns `None` if the string is not a valid
    /// color.
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        if hex_string.len() != 7 || !hex_string.starts_with('#') {
            return None;
        }

        let r = u8::from_str_radix(hex_string.get(1..3)?, 16).ok()?;
        let g = u8::from_str_radix(hex_string.get(3..5)?, 16).ok()?;
        let b = u8::from_str_radix(hex_string.get(5..7)?, 16).ok()?;

        Some(Self { r, g, b })
    }

    /// Parses a color from the hex string `#RRGGBB` at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the parsing fails.
    pub const fn from_hex(hex_string: &'static str) -> Self {
        let bytes = hex_string.as_bytes();
        if bytes.len() != 7 || bytes[0] != b'#' {
            panic!("Invalid color hex string");
        }

        Self {
            r: decode_byte(bytes[1], bytes[2]),
            g: decode_byte(bytes[3], bytes[4]),
            b: decode_byte(bytes[5], bytes[6]),
        }
    }

    /// Red component.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component.
    pub fn b(&self) -> u8 {
        self.b
    }
}

const fn decode_byte(high: u8, low: u8) -> u8 {
    decode_char(high) * 16 + decode_char(low)
}

const fn decode_char(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => panic!("Invalid hex character"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_round_trip() {
        let color = Color::try_from_hex("#A67B5B").expect("valid color");
        assert_eq!(color, Color::SAND);
        assert_eq!(color.to_css(), "#a67b5b");
        assert_eq!(Color::from_hex("#5d2521"), Color::rgb(0x5d, 0x25, 0x21));
    }

    #[test]
    fn invalid_hex() {
        assert!(Color::try_from_hex("5d2521").is_none());
        assert!(Color::try_from_hex("#5d25").is_none());
        assert!(Color::try_from_hex("#zz2521").is_none());
        assert!(Color::try_from_hex("#5d2521ff").is_none());
    }
}
