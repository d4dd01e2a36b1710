//! Per-render styling: the palette boundary model and the selection seam.
//!
//! Style selection is injected through [`StylePicker`] so renders are
//! reproducible under test; production code uses [`UniformPicker`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CardError, CardResult};
use crate::fonts::source::{FontSource, NamedFont, default_fonts};

/// The immutable style tuple governing one render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleChoice {
    /// Display name of the chosen font family.
    pub font_name: String,
    /// Source of the chosen font.
    pub font: FontSource,
    /// Gradient start color (top scanline).
    pub gradient_start: Rgb8,
    /// Gradient end color (bottom scanline).
    pub gradient_end: Rgb8,
}

/// The JSON-facing style palette: named fonts and the two gradient color sets.
///
/// One entry of each set is drawn independently and uniformly at random per
/// render. [`StylePalette::default`] carries the built-in palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StylePalette {
    /// Candidate fonts.
    #[serde(default = "default_fonts")]
    pub fonts: Vec<NamedFont>,
    /// Candidate gradient start colors.
    #[serde(default = "default_gradient_starts")]
    pub gradient_starts: Vec<Rgb8>,
    /// Candidate gradient end colors.
    #[serde(default = "default_gradient_ends")]
    pub gradient_ends: Vec<Rgb8>,
}

fn default_gradient_starts() -> Vec<Rgb8> {
    vec![
        Rgb8::new(255, 87, 34),
        Rgb8::new(33, 150, 243),
        Rgb8::new(76, 175, 80),
    ]
}

fn default_gradient_ends() -> Vec<Rgb8> {
    vec![
        Rgb8::new(255, 193, 7),
        Rgb8::new(233, 30, 99),
        Rgb8::new(156, 39, 176),
    ]
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            fonts: default_fonts(),
            gradient_starts: default_gradient_starts(),
            gradient_ends: default_gradient_ends(),
        }
    }
}

impl StylePalette {
    /// Parse a palette from a JSON reader.
    ///
    /// Missing fields fall back to the built-in palette sets.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardResult<Self> {
        let palette: StylePalette = serde_json::from_reader(r)
            .map_err(|e| CardError::validation(format!("parse palette JSON: {e}")))?;
        palette.validate()?;
        Ok(palette)
    }

    /// Parse a palette from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::validation(format!("open palette JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject palettes with an empty selection set.
    pub fn validate(&self) -> CardResult<()> {
        if self.fonts.is_empty() {
            return Err(CardError::validation("palette has no fonts"));
        }
        if self.gradient_starts.is_empty() || self.gradient_ends.is_empty() {
            return Err(CardError::validation("palette has no gradient colors"));
        }
        Ok(())
    }
}

/// The injected style-selection seam.
pub trait StylePicker {
    /// Draw one style from the palette.
    fn pick(&mut self, palette: &StylePalette) -> CardResult<StyleChoice>;
}

/// Uniform random selection, independent per set. The production picker.
#[derive(Debug, Default)]
pub struct UniformPicker;

impl StylePicker for UniformPicker {
    fn pick(&mut self, palette: &StylePalette) -> CardResult<StyleChoice> {
        palette.validate()?;
        let mut rng = rand::rng();
        let font = palette
            .fonts
            .choose(&mut rng)
            .ok_or_else(|| CardError::validation("palette has no fonts"))?;
        let start = palette
            .gradient_starts
            .choose(&mut rng)
            .ok_or_else(|| CardError::validation("palette has no gradient colors"))?;
        let end = palette
            .gradient_ends
            .choose(&mut rng)
            .ok_or_else(|| CardError::validation("palette has no gradient colors"))?;
        Ok(StyleChoice {
            font_name: font.name.clone(),
            font: font.source.clone(),
            gradient_start: *start,
            gradient_end: *end,
        })
    }
}

/// Always yields the same pre-chosen style. For reproducible renders.
#[derive(Clone, Debug)]
pub struct FixedPicker {
    choice: StyleChoice,
}

impl FixedPicker {
    /// Pin the given style.
    pub fn new(choice: StyleChoice) -> Self {
        Self { choice }
    }
}

impl StylePicker for FixedPicker {
    fn pick(&mut self, _palette: &StylePalette) -> CardResult<StyleChoice> {
        Ok(self.choice.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_matches_builtin_sets() {
        let p = StylePalette::default();
        assert_eq!(p.fonts.len(), 7);
        assert_eq!(p.gradient_starts.len(), 3);
        assert_eq!(p.gradient_ends.len(), 3);
        assert_eq!(p.gradient_starts[0], Rgb8::new(255, 87, 34));
        assert_eq!(p.gradient_ends[2], Rgb8::new(156, 39, 176));
    }

    #[test]
    fn palette_json_round_trips() {
        let p = StylePalette::default();
        let json = serde_json::to_string(&p).unwrap();
        let back = StylePalette::from_reader(json.as_bytes()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn partial_palette_json_fills_defaults() {
        let json = r##"{ "gradient_starts": ["#000000"] }"##;
        let p = StylePalette::from_reader(json.as_bytes()).unwrap();
        assert_eq!(p.gradient_starts, vec![Rgb8::new(0, 0, 0)]);
        assert_eq!(p.fonts.len(), 7);
        assert_eq!(p.gradient_ends.len(), 3);
    }

    #[test]
    fn empty_set_is_rejected() {
        let json = r#"{ "fonts": [] }"#;
        assert!(StylePalette::from_reader(json.as_bytes()).is_err());
    }

    #[test]
    fn uniform_picker_draws_from_palette() {
        let palette = StylePalette::default();
        let mut picker = UniformPicker;
        for _ in 0..32 {
            let choice = picker.pick(&palette).unwrap();
            assert!(palette.fonts.iter().any(|f| f.source == choice.font));
            assert!(palette.gradient_starts.contains(&choice.gradient_start));
            assert!(palette.gradient_ends.contains(&choice.gradient_end));
        }
    }

    #[test]
    fn fixed_picker_is_deterministic() {
        let choice = StyleChoice {
            font_name: "Cookie".to_string(),
            font: FontSource::from("Cookie-Regular.ttf"),
            gradient_start: Rgb8::new(1, 2, 3),
            gradient_end: Rgb8::new(4, 5, 6),
        };
        let mut picker = FixedPicker::new(choice.clone());
        assert_eq!(picker.pick(&StylePalette::default()).unwrap(), choice);
        assert_eq!(picker.pick(&StylePalette::default()).unwrap(), choice);
    }
}
