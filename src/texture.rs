use image::io::Reader;
use image::{ImageFormat, Pixel};

use std::fs::File;
use std::io::BufReader;
use std::ops::Index;
use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::math::{V2, V4};

/// Anything that can be sampled with normalized coordinates.
pub trait Surface {
    fn get_f(&self, index: V2) -> V4;
}

#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<V4>,
    wrapping: WrapMode,
}

impl Texture {
    pub fn load_png<P: AsRef<Path>>(path: P, wrapping: WrapMode) -> Result<Self> {
        let path = path.as_ref();

        let file = BufReader::new(
            File::open(path).with_context(|| format!("unable to open {}", path.display()))?,
        );
        let image = Reader::with_format(file, ImageFormat::Png)
            .decode()
            .with_context(|| format!("unable to decode {}", path.display()))?;
        let image = image.to_rgba8();

        let width = image.width();
        let height = image.height();
        let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
        for p in image.pixels() {
            bytes.extend_from_slice(p.channels());
        }

        tracing::info!(path = %path.display(), width, height, "texture loaded");

        Self::from_rgba8(bytes, width, height, wrapping)
    }

    pub fn from_rgba8<I: Into<Vec<u8>>>(
        bytes: I,
        width: u32,
        height: u32,
        wrapping: WrapMode,
    ) -> Result<Self> {
        let bytes = bytes.into();
        ensure!(width > 0 && height > 0, "texture has no pixels");
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4));
        ensure!(
            expected == Some(bytes.len()),
            "expected {} bytes for a {}x{} rgba texture, got {}",
            width as u64 * height as u64 * 4,
            width,
            height,
            bytes.len()
        );

        let normalize_component = |c: u8| c as f32 / 255.0;

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                V4::new(
                    normalize_component(p[0]),
                    normalize_component(p[1]),
                    normalize_component(p[2]),
                    normalize_component(p[3]),
                )
            })
            .collect();

        Ok(Texture {
            width,
            height,
            pixels,
            wrapping,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Index<(usize, usize)> for Texture {
    type Output = V4;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.pixels[index.1 * self.width as usize + index.0]
    }
}

impl Surface for Texture {
    /// Bilinear sample.
    fn get_f(&self, index: V2) -> V4 {
        let index = self.wrapping.wrap(index);

        let x = index.x() * (self.width() - 1) as f32;
        let y = index.y() * (self.height() - 1) as f32;

        let x0 = x.floor() as usize;
        let x1 = x.ceil() as usize;

        let y0 = y.floor() as usize;
        let y1 = y.ceil() as usize;

        let t = x - x0 as f32;

        let p0 = self[(x0, y0)] * (1.0 - t) + self[(x1, y0)] * t;
        let p1 = self[(x0, y1)] * (1.0 - t) + self[(x1, y1)] * t;

        let t = y - y0 as f32;

        p1 * t + p0 * (1.0 - t)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SolidColor(pub V4);

impl Surface for SolidColor {
    fn get_f(&self, _index: V2) -> V4 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

impl WrapMode {
    fn wrap(&self, orig: V2) -> V2 {
        match self {
            WrapMode::Repeat => V2::new(orig.x().rem_euclid(1.0), orig.y().rem_euclid(1.0)),
            WrapMode::Clamp => {
                let x = orig.x().min(1.0).max(0.0);
                let y = orig.y().min(1.0).max(0.0);

                V2::new(x, y)
            }
        }
    }
}
