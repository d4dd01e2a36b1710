//! Glyphcard renders AAC word tiles as stylized flashcard images.
//!
//! Given a word, the renderer draws it centered in white over a vertical
//! color gradient, using a randomly styled font, and returns the finished
//! canvas as PNG bytes (or base64 / data URL for embedding). It is the local
//! fallback illustrator for tile UIs whose richer illustrations come from
//! external services.
//!
//! # Pipeline overview
//!
//! 1. **Pick**: draw a [`StyleChoice`] (font + gradient colors) from the
//!    [`StylePalette`] through the injected [`StylePicker`]
//! 2. **Resolve**: fetch or read the font bytes ([`FontResolver`]), degrading
//!    to the system sans-serif stack on any failure
//! 3. **Fit**: probe the coarse-to-fine size schedule for the largest size
//!    that fits the padded canvas ([`find_best_font_size`])
//! 4. **Raster**: gradient background + centered glyph runs on the CPU
//! 5. **Encode**: PNG bytes in an [`EncodedCard`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Total rendering**: font and fit failures degrade internally; only bad
//!   input and canvas encoding surface as errors.
//! - **No IO in layout/raster**: network and disk access are front-loaded in
//!   [`FontResolver`].
//! - **Reproducible under injection**: a pinned style ([`FixedPicker`] or
//!   [`CardRenderer::render_with_style`]) yields byte-identical output.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Font sources and resolution.
pub mod fonts;
/// Text layout and the best-fit size search.
pub mod layout;
/// Rasterization and PNG encoding.
pub mod render;
/// Style palette and selection.
pub mod style;

pub use foundation::core::{CardSize, Rgb8};
pub use foundation::error::{CardError, CardResult};

pub use fonts::resolve::{DEFAULT_FETCH_TIMEOUT, FontResolver, ResolvedFont};
pub use fonts::source::{FontSource, NamedFont};
pub use layout::{
    DEFAULT_PADDING, MIN_FONT_SIZE, MeasuredWord, START_FONT_SIZE, TextBrushRgba8,
    TextLayoutEngine, find_best_font_size, measure_layout, probe_schedule,
};
pub use render::card::{CardOptions, CardRenderer, EncodedCard};
pub use render::gradient::gradient_bytes;
pub use style::{FixedPicker, StyleChoice, StylePalette, StylePicker, UniformPicker};
