//! Parley-backed single-word layout and the best-fit size search.
//!
//! Everything here is pure given resolved font bytes; IO happens earlier in
//! [`crate::fonts::resolve`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::CardSize;
use crate::foundation::error::{CardError, CardResult};
use crate::fonts::resolve::ResolvedFont;

/// Size the probe starts from.
pub const START_FONT_SIZE: u32 = 400;

/// Guaranteed minimum when nothing in the schedule fits.
pub const MIN_FONT_SIZE: u32 = 50;

/// Default uniform padding margin in pixels.
pub const DEFAULT_PADDING: u32 = 20;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Opaque white, the flashcard text color.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

/// Measured extents of a laid-out word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasuredWord {
    /// Full advance width in pixels.
    pub width: f32,
    /// Full line-box height in pixels.
    pub height: f32,
    /// Gap between the line-box top and the ascent line of the first line.
    ///
    /// Used for optical vertical centering, compensating ascent/descent
    /// asymmetry of display fonts.
    pub bearing: f32,
}

/// Stateful helper for building Parley text layouts from resolved fonts.
///
/// Custom font bytes are registered with the font collection once per byte
/// buffer; the resolved family name is cached so the ~74-probe size search
/// does not re-register on every probe. Unusable bytes degrade to the system
/// sans-serif stack with a warning, mirroring the resolver's fetch fallback.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: HashMap<usize, Option<String>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, bytes: &Arc<Vec<u8>>) -> Option<String> {
        let key = Arc::as_ptr(bytes) as usize;
        if let Some(cached) = self.registered.get(&key) {
            return cached.clone();
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
        let name = families
            .first()
            .map(|(id, _)| *id)
            .and_then(|id| self.font_ctx.collection.family_name(id))
            .map(|s| s.to_string());
        self.registered.insert(key, name.clone());
        name
    }

    /// Shape and lay out a single run of text at the given pixel size.
    pub fn layout_word(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> CardResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let stack = match font {
            ResolvedFont::Custom(bytes) => match self.family_for(bytes) {
                Some(name) => parley::style::FontStack::Source(Cow::Owned(name)),
                None => {
                    tracing::warn!("font bytes did not register as a family, using fallback");
                    fallback_stack()
                }
            },
            ResolvedFont::Fallback => fallback_stack(),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(stack));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Measure a word at the given size without keeping the layout.
    pub fn measure(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
    ) -> CardResult<MeasuredWord> {
        let layout = self.layout_word(text, font, size_px, TextBrushRgba8::default())?;
        Ok(measure_layout(&layout))
    }
}

fn fallback_stack<'a>() -> parley::style::FontStack<'a> {
    parley::style::FontStack::Single(parley::style::FontFamily::Generic(
        parley::style::GenericFamily::SansSerif,
    ))
}

/// Extract measured extents from a finished layout.
pub fn measure_layout(layout: &parley::Layout<TextBrushRgba8>) -> MeasuredWord {
    let bearing = layout
        .lines()
        .next()
        .map(|line| {
            let m = line.metrics();
            (m.baseline - m.ascent).max(0.0)
        })
        .unwrap_or(0.0);
    MeasuredWord {
        width: layout.width(),
        height: layout.height(),
        bearing,
    }
}

/// The coarse-to-fine probe schedule: 10 steps of 20, 6 of 10, 8 of 5, 50 of 2.
///
/// The probe sequence is fixed because it determines the visual result; it
/// only ever decreases, with no re-increase after an early overshoot.
pub fn probe_schedule() -> Vec<u32> {
    let mut steps = Vec::with_capacity(74);
    steps.extend(std::iter::repeat_n(20u32, 10));
    steps.extend(std::iter::repeat_n(10u32, 6));
    steps.extend(std::iter::repeat_n(5u32, 8));
    steps.extend(std::iter::repeat_n(2u32, 50));
    steps
}

/// Find the largest probed size at which `text` fits the card minus padding.
///
/// Starts at [`START_FONT_SIZE`] and walks [`probe_schedule`] downward. A
/// size fits when measured width plus padding is strictly below the card
/// width and likewise for height (padding counted once per axis). When no
/// probed size fits, returns [`MIN_FONT_SIZE`].
pub fn find_best_font_size(
    engine: &mut TextLayoutEngine,
    text: &str,
    font: &ResolvedFont,
    card: CardSize,
    padding: u32,
) -> CardResult<u32> {
    let pad = padding as f32;
    let mut size = START_FONT_SIZE;
    for step in probe_schedule() {
        if size == 0 {
            break;
        }
        let m = engine.measure(text, font, size as f32)?;
        if m.width + pad < card.width as f32 && m.height + pad < card.height as f32 {
            return Ok(size);
        }
        size = size.saturating_sub(step);
    }
    Ok(MIN_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_bounded_and_ordered_coarse_to_fine() {
        let steps = probe_schedule();
        assert_eq!(steps.len(), 74);
        assert_eq!(steps.iter().sum::<u32>(), START_FONT_SIZE);
        assert!(steps.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(&steps[..10], &[20; 10]);
        assert_eq!(&steps[64..], &[2; 10]);
    }

    #[test]
    fn size_probe_never_goes_below_minimum() {
        let mut engine = TextLayoutEngine::new();
        // Padding alone exceeds the canvas, so nothing can fit.
        let card = CardSize::new(10, 10).unwrap();
        let size = find_best_font_size(
            &mut engine,
            "incomprehensibilities",
            &ResolvedFont::Fallback,
            card,
            DEFAULT_PADDING,
        )
        .unwrap();
        assert_eq!(size, MIN_FONT_SIZE);
    }

    #[test]
    fn fitting_size_actually_fits() {
        let mut engine = TextLayoutEngine::new();
        let card = CardSize::default();
        let font = ResolvedFont::Fallback;
        let size = find_best_font_size(&mut engine, "hello", &font, card, DEFAULT_PADDING).unwrap();
        assert!(size >= MIN_FONT_SIZE);
        let m = engine.measure("hello", &font, size as f32).unwrap();
        if size > MIN_FONT_SIZE {
            assert!(m.width + (DEFAULT_PADDING as f32) < card.width as f32);
            assert!(m.height + (DEFAULT_PADDING as f32) < card.height as f32);
        }
    }

    #[test]
    fn garbage_font_bytes_degrade_to_fallback_stack() {
        let mut engine = TextLayoutEngine::new();
        let bogus = ResolvedFont::Custom(std::sync::Arc::new(b"definitely not a font".to_vec()));
        // Must not error; layout proceeds on the fallback stack.
        let layout = engine
            .layout_word("cat", &bogus, 64.0, TextBrushRgba8::WHITE)
            .unwrap();
        let m = measure_layout(&layout);
        assert!(m.width >= 0.0 && m.height >= 0.0);
    }

    #[test]
    fn invalid_size_is_rejected() {
        let mut engine = TextLayoutEngine::new();
        assert!(
            engine
                .layout_word("cat", &ResolvedFont::Fallback, 0.0, TextBrushRgba8::WHITE)
                .is_err()
        );
        assert!(
            engine
                .layout_word(
                    "cat",
                    &ResolvedFont::Fallback,
                    f32::NAN,
                    TextBrushRgba8::WHITE
                )
                .is_err()
        );
    }
}
