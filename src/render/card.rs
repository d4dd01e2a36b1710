//! Flashcard orchestration: style -> font -> layout -> raster -> PNG.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::core::CardSize;
use crate::foundation::error::{CardError, CardResult};
use crate::fonts::resolve::FontResolver;
use crate::layout::{DEFAULT_PADDING, TextBrushRgba8, TextLayoutEngine, find_best_font_size, measure_layout};
use crate::render::gradient::gradient_paint;
use crate::style::{StyleChoice, StylePalette, StylePicker, UniformPicker};

/// Canvas size and padding for rendered cards.
#[derive(Clone, Copy, Debug)]
pub struct CardOptions {
    /// Canvas dimensions.
    pub size: CardSize,
    /// Uniform padding margin used by the fit search.
    pub padding: u32,
}

impl CardOptions {
    /// Return options with the given canvas size.
    pub fn with_size(mut self, size: CardSize) -> Self {
        self.size = size;
        self
    }

    /// Return options with the given padding margin.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }
}

impl Default for CardOptions {
    /// 600x400 with a 20px margin.
    fn default() -> Self {
        Self {
            size: CardSize::default(),
            padding: DEFAULT_PADDING,
        }
    }
}

/// A finished flashcard: PNG bytes plus its pixel dimensions.
#[derive(Clone, Debug)]
pub struct EncodedCard {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl EncodedCard {
    /// Pixel width of the encoded image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height of the encoded image.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Consume into the encoded PNG bytes.
    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// Base64 text encoding of the PNG bytes.
    pub fn base64(&self) -> String {
        BASE64.encode(&self.png)
    }

    /// `data:image/png;base64,...` URL for direct embedding.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.base64())
    }

    /// Write the PNG to disk. Opt-in; rendering itself never touches disk.
    pub fn save_to(&self, path: impl AsRef<Path>) -> CardResult<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.png).map_err(|e| {
            CardError::encode(format!("write card PNG '{}': {e}", path.display()))
        })
    }
}

/// Renders words into stylized flashcard images.
///
/// Each render is independent: the style is drawn fresh from the palette, the
/// canvas is created and destroyed within the call, and nothing is shared
/// between renderer instances. The renderer keeps per-instance caches only
/// (font bytes, layout contexts, the raster context).
pub struct CardRenderer {
    palette: StylePalette,
    picker: Box<dyn StylePicker>,
    resolver: FontResolver,
    engine: TextLayoutEngine,
    ctx: Option<vello_cpu::RenderContext>,
    opts: CardOptions,
}

impl CardRenderer {
    /// Renderer with the built-in palette, uniform random styling, and
    /// default options.
    pub fn new() -> Self {
        Self::with_parts(
            StylePalette::default(),
            Box::new(UniformPicker),
            FontResolver::new(),
            CardOptions::default(),
        )
    }

    /// Renderer with default styling but explicit canvas options.
    pub fn with_options(opts: CardOptions) -> Self {
        Self::with_parts(
            StylePalette::default(),
            Box::new(UniformPicker),
            FontResolver::new(),
            opts,
        )
    }

    /// Fully injected constructor: palette, style picker, font resolver,
    /// canvas options.
    pub fn with_parts(
        palette: StylePalette,
        picker: Box<dyn StylePicker>,
        resolver: FontResolver,
        opts: CardOptions,
    ) -> Self {
        Self {
            palette,
            picker,
            resolver,
            engine: TextLayoutEngine::new(),
            ctx: None,
            opts,
        }
    }

    /// Render a word with a freshly drawn style.
    ///
    /// Font acquisition failures and words that fit at no probed size degrade
    /// internally; the only hard failures are invalid input and encoding.
    #[tracing::instrument(skip(self))]
    pub fn render(&mut self, word: &str) -> CardResult<EncodedCard> {
        let style = self.picker.pick(&self.palette)?;
        self.render_with_style(word, &style)
    }

    /// Render a word with an explicit style, bypassing selection.
    ///
    /// With the same word, style, and options this produces byte-identical
    /// output across calls.
    pub fn render_with_style(&mut self, word: &str, style: &StyleChoice) -> CardResult<EncodedCard> {
        if word.is_empty() {
            return Err(CardError::validation("word must be non-empty"));
        }
        let CardOptions { size, padding } = self.opts;

        let font = self.resolver.resolve(&style.font);
        let best_size = find_best_font_size(&mut self.engine, word, &font, size, padding)?;
        let layout = self
            .engine
            .layout_word(word, &font, best_size as f32, TextBrushRgba8::WHITE)?;
        let measured = measure_layout(&layout);

        let x = (size.width as f32 - measured.width) / 2.0;
        let y = (size.height as f32 - measured.height) / 2.0 - measured.bearing / 2.0;
        tracing::debug!(
            font = %style.font_name,
            size = best_size,
            width = measured.width,
            height = measured.height,
            "flashcard layout chosen"
        );

        let background = gradient_paint(size, style.gradient_start, style.gradient_end)?;
        let pixmap = self.with_ctx_mut(size.width_u16(), size.height_u16(), |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(background);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                size.width as f64,
                size.height as f64,
            ));

            ctx.set_transform(vello_cpu::kurbo::Affine::translate((x as f64, y as f64)));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let font = run.run().font();
                    let font_data = vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(font.data.as_ref().to_vec()),
                        font.index,
                    );
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font_data)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }

            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(size.width_u16(), size.height_u16());
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        encode_png(&pixmap, size)
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> CardResult<R>,
    ) -> CardResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_png(pixmap: &vello_cpu::Pixmap, size: CardSize) -> CardResult<EncodedCard> {
    let mut straight = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(size.width, size.height, straight)
        .ok_or_else(|| CardError::encode("raster buffer does not match canvas size"))?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| CardError::encode(format!("png encode: {e}")))?;
    Ok(EncodedCard {
        width: size.width,
        height: size.height,
        png,
    })
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpremultiply_handles_zero_and_full_alpha() {
        let mut px = [128, 64, 32, 0, 128, 64, 32, 255];
        unpremultiply_in_place(&mut px);
        assert_eq!(&px[..4], &[0, 0, 0, 0]);
        assert_eq!(&px[4..], &[128, 64, 32, 255]);
    }

    #[test]
    fn empty_word_is_rejected() {
        let mut renderer = CardRenderer::new();
        assert!(matches!(
            renderer.render_with_style(
                "",
                &StyleChoice {
                    font_name: "x".to_string(),
                    font: crate::fonts::source::FontSource::from("missing.ttf"),
                    gradient_start: crate::foundation::core::Rgb8::new(1, 2, 3),
                    gradient_end: crate::foundation::core::Rgb8::new(4, 5, 6),
                },
            ),
            Err(CardError::Validation(_))
        ));
    }

    #[test]
    fn options_compose() {
        let opts = CardOptions::default()
            .with_size(CardSize::new(128, 96).unwrap())
            .with_padding(4);
        assert_eq!(opts.size.width, 128);
        assert_eq!(opts.size.height, 96);
        assert_eq!(opts.padding, 4);
    }
}
