use crate::foundation::error::{CardError, CardResult};
use serde::{Deserialize, Serialize};

/// Canvas dimensions in pixels.
///
/// The raster surface is addressed with `u16` coordinates, so both axes are
/// bounded by `u16::MAX` and must be non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CardSize {
    /// Create a validated size with non-zero axes inside the raster bound.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::validation("card size axes must be non-zero"));
        }
        if width > u16::MAX as u32 || height > u16::MAX as u32 {
            return Err(CardError::validation(format!(
                "card size {width}x{height} exceeds the {} raster bound",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Width as a raster-surface coordinate.
    pub(crate) fn width_u16(self) -> u16 {
        self.width as u16
    }

    /// Height as a raster-surface coordinate.
    pub(crate) fn height_u16(self) -> u16 {
        self.height as u16
    }
}

impl Default for CardSize {
    /// The flashcard default, 600x400.
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(s: &str) -> CardResult<Self> {
        let t = s.trim().trim_start_matches('#');
        if t.len() != 6 || !t.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CardError::validation(format!("invalid hex color '{s}'")));
        }
        let byte = |i: usize| u8::from_str_radix(&t[i..i + 2], 16).unwrap_or(0);
        Ok(Self::new(byte(0), byte(2), byte(4)))
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbObj { r: u8, g: u8, b: u8 },
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Rgb8::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(Rgb8::new(r, g, b)),
            Repr::Arr(v) => {
                if v.len() != 3 {
                    return Err(serde::de::Error::custom(
                        "color arrays must have exactly 3 channels",
                    ));
                }
                Ok(Rgb8::new(v[0], v[1], v[2]))
            }
        }
    }
}
