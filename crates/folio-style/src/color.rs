//! Color types and CSS formatting.

use std::fmt;

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value. Upper bits are ignored.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// CSS hex notation, e.g. `#22d3ee`.
    #[must_use]
    pub fn to_css_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(input: &str) -> Result<Self, ParseColorError> {
        let digits = input.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(input.to_owned()));
        }
        match digits.len() {
            3 => {
                let packed = u32::from_str_radix(digits, 16)
                    .map_err(|_| ParseColorError::InvalidDigit(input.to_owned()))?;
                let expand = |nibble: u32| ((nibble & 0xf) * 0x11) as u8;
                Ok(Self::new(
                    expand(packed >> 8),
                    expand(packed >> 4),
                    expand(packed),
                ))
            }
            6 => u32::from_str_radix(digits, 16)
                .map(Self::from_hex)
                .map_err(|_| ParseColorError::InvalidDigit(input.to_owned())),
            len => Err(ParseColorError::InvalidLength(len)),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_css_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

/// Error returned by [`Rgb::parse_hex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    /// Hex notation must have 3 or 6 digits.
    InvalidLength(usize),
    /// The input contains a non-hex character.
    InvalidDigit(String),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "hex color must have 3 or 6 digits, got {len}")
            }
            Self::InvalidDigit(input) => write!(f, "invalid hex color: {input:?}"),
        }
    }
}

impl std::error::Error for ParseColorError {}
