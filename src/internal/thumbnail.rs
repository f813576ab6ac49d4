//! Decoded photo pixels sized for terminal drawing.
//!
//! Each terminal cell shows two vertical pixels with an upper half block:
//! the foreground paints the top pixel and the background the bottom one.

use std::fmt;

/// Upper bound on stored thumbnail width. Wide enough for a full-width card
/// on a large terminal, small enough to keep per-frame sampling cheap.
pub const MAX_THUMBNAIL_WIDTH: u32 = 160;

pub type Rgb = [u8; 3];

#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Thumbnail {
    /// Decode an encoded image (JPEG, PNG or WebP) and downsample it.
    pub fn decode(bytes: &[u8], max_width: u32) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?;
        let img = match img.width() > max_width {
            true => {
                let scaled_height =
                    ((img.height() as f64 * max_width as f64) / img.width() as f64).round();
                img.thumbnail(max_width, (scaled_height as u32).max(1))
            }
            false => img,
        };
        let rgb = img.to_rgb8();
        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            pixels: rgb.pixels().map(|p| p.0).collect(),
        })
    }

    /// Build from raw pixels in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        match (width as usize) * (height as usize) == pixels.len() && !pixels.is_empty() {
            true => Some(Self {
                width,
                height,
                pixels,
            }),
            false => None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u64, y: u64) -> Rgb {
        let x = x.min(self.width as u64 - 1) as usize;
        let y = y.min(self.height as u64 - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Nearest-neighbour sample into `rows` x `cols` cells of (top, bottom) pixels.
    pub fn cells(&self, cols: u16, rows: u16) -> Vec<Vec<(Rgb, Rgb)>> {
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let target_h = rows as u64 * 2;
        let sample = |cx: u64, py: u64| {
            let sx = (cx * self.width as u64) / cols as u64;
            let sy = (py * self.height as u64) / target_h;
            self.pixel(sx, sy)
        };

        (0..rows as u64)
            .map(|row| {
                (0..cols as u64)
                    .map(|col| (sample(col, row * 2), sample(col, row * 2 + 1)))
                    .collect()
            })
            .collect()
    }
}
