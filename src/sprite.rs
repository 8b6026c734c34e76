//! Sprite decoding: PNG bytes in, a small RGBA pixel grid out.

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};

/// Longest edge of a decoded sprite, in pixels.
pub const SPRITE_MAX_EDGE: u32 = 48;
const ALPHA_VISIBLE: u8 = 128;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl SpriteData {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let rgba = self.pixels.get(offset..offset + 4)?;
        Some([rgba[0], rgba[1], rgba[2], rgba[3]])
    }

    /// Opaque colour at `(x, y)`, `None` for transparent pixels.
    pub fn visible_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let [r, g, b, a] = self.pixel(x, y)?;
        (a >= ALPHA_VISIBLE).then_some((r, g, b))
    }

    /// Largest `(cols, rows)` inside the bounds that keeps the aspect ratio.
    /// One cell covers one pixel column and two pixel rows.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if max_cols == 0 || max_rows == 0 || self.width == 0 || self.height == 0 {
            return (0, 0);
        }
        let ratio = self.width as f32 / self.height as f32;
        let cols_for_rows = ratio * f32::from(max_rows) * 2.0;
        if cols_for_rows <= f32::from(max_cols) {
            let cols = cols_for_rows.round().max(1.0) as u16;
            return (cols.min(max_cols), max_rows);
        }
        let rows = (f32::from(max_cols) / ratio / 2.0).round().max(1.0) as u16;
        (max_cols, rows.min(max_rows))
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, image::ImageError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let cropped = crop_to_content(&image);
    let (width, height) = thumbnail_size(cropped.width(), cropped.height());
    let thumb = if (width, height) == cropped.dimensions() {
        cropped
    } else {
        imageops::thumbnail(&cropped, width, height)
    };
    Ok(SpriteData {
        width: thumb.width(),
        height: thumb.height(),
        pixels: thumb.into_raw(),
    })
}

/// Trims fully transparent borders; artwork carries a wide margin.
fn crop_to_content(image: &RgbaImage) -> RgbaImage {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    if min_x > max_x || min_y > max_y {
        return image.clone();
    }
    imageops::crop_imm(image, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image()
}

fn thumbnail_size(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height).max(1);
    if longest <= SPRITE_MAX_EDGE {
        return (width.max(1), height.max(1));
    }
    let scale = SPRITE_MAX_EDGE as f32 / longest as f32;
    let scaled = |edge: u32| ((edge as f32 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(image: RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_crops_transparent_margin() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        for x in 5..15 {
            for y in 8..12 {
                image.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }

        let sprite = decode_sprite(&png_bytes(image)).unwrap();

        assert_eq!((sprite.width, sprite.height), (10, 4));
        assert_eq!(sprite.visible_rgb(0, 0), Some((255, 0, 0)));
    }

    #[test]
    fn test_decode_downscales_large_images() {
        let image = RgbaImage::from_pixel(480, 240, Rgba([10, 20, 30, 255]));

        let sprite = decode_sprite(&png_bytes(image)).unwrap();

        assert_eq!((sprite.width, sprite.height), (48, 24));
        assert_eq!(sprite.pixels.len(), 48 * 24 * 4);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_sprite(b"not a png").is_err());
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let sprite = SpriteData {
            width: 40,
            height: 40,
            pixels: vec![0; 40 * 40 * 4],
        };
        assert_eq!(sprite.fit(30, 10), (20, 10));
        assert_eq!(sprite.fit(10, 10), (10, 5));
        assert_eq!(sprite.fit(0, 10), (0, 0));
    }

    #[test]
    fn test_transparent_pixels_are_hidden() {
        let sprite = SpriteData {
            width: 1,
            height: 2,
            pixels: vec![1, 2, 3, 255, 4, 5, 6, 0],
        };
        assert_eq!(sprite.visible_rgb(0, 0), Some((1, 2, 3)));
        assert_eq!(sprite.visible_rgb(0, 1), None);
        assert_eq!(sprite.visible_rgb(1, 0), None);
    }
}
