//! Vertical linear gradient backgrounds.

use std::sync::Arc;

use crate::foundation::core::{CardSize, Rgb8};
use crate::foundation::error::{CardError, CardResult};

/// Fill a tightly packed RGBA8 buffer with a vertical gradient.
///
/// Scanline `i` (0-indexed) interpolates each channel between `start` and
/// `end` with fraction `i / height`, so the top row is exactly `start` and
/// the bottom row approaches `end` within rounding. Deterministic given
/// inputs. All pixels are opaque, so the bytes double as premultiplied RGBA8.
pub fn gradient_bytes(size: CardSize, start: Rgb8, end: Rgb8) -> Vec<u8> {
    let (w, h) = (size.width as usize, size.height as usize);
    let mut bytes = vec![0u8; w * h * 4];
    for y in 0..h {
        let t = y as f32 / h as f32;
        let lerp = |a: u8, b: u8| -> u8 {
            let af = a as f32;
            let bf = b as f32;
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        let c = [lerp(start.r, end.r), lerp(start.g, end.g), lerp(start.b, end.b), 255];
        for px in bytes[y * w * 4..(y + 1) * w * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}

/// Build the gradient as a pixmap paint for the raster context.
pub(crate) fn gradient_paint(
    size: CardSize,
    start: Rgb8,
    end: Rgb8,
) -> CardResult<vello_cpu::Image> {
    let bytes = gradient_bytes(size, start, end);
    let pixmap = pixmap_from_premul_bytes(&bytes, size.width, size.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CardError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(bytes: &[u8], size: CardSize, y: u32) -> [u8; 4] {
        let idx = (y as usize * size.width as usize) * 4;
        [bytes[idx], bytes[idx + 1], bytes[idx + 2], bytes[idx + 3]]
    }

    #[test]
    fn top_row_is_exactly_start() {
        let size = CardSize::new(8, 16).unwrap();
        let start = Rgb8::new(255, 87, 34);
        let end = Rgb8::new(156, 39, 176);
        let bytes = gradient_bytes(size, start, end);
        assert_eq!(row(&bytes, size, 0), [255, 87, 34, 255]);
    }

    #[test]
    fn bottom_row_approaches_end_within_rounding() {
        let size = CardSize::new(8, 200).unwrap();
        let start = Rgb8::new(33, 150, 243);
        let end = Rgb8::new(255, 193, 7);
        let bytes = gradient_bytes(size, start, end);
        let [r, g, b, a] = row(&bytes, size, size.height - 1);
        assert_eq!(a, 255);
        assert!((r as i32 - end.r as i32).abs() <= 2);
        assert!((g as i32 - end.g as i32).abs() <= 2);
        assert!((b as i32 - end.b as i32).abs() <= 2);
    }

    #[test]
    fn rows_are_uniform_and_monotone() {
        let size = CardSize::new(4, 64).unwrap();
        let bytes = gradient_bytes(size, Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255));
        let mut prev = 0u8;
        for y in 0..size.height {
            let [r, g, b, _] = row(&bytes, size, y);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert!(r >= prev);
            prev = r;
            // Every pixel of the scanline carries the same color.
            let row_start = (y as usize * size.width as usize) * 4;
            for px in bytes[row_start..row_start + size.width as usize * 4].chunks_exact(4) {
                assert_eq!(px[0], r);
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_bytes() {
        let size = CardSize::default();
        let a = gradient_bytes(size, Rgb8::new(76, 175, 80), Rgb8::new(233, 30, 99));
        let b = gradient_bytes(size, Rgb8::new(76, 175, 80), Rgb8::new(233, 30, 99));
        assert_eq!(a, b);
    }
}
