use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::DecodeError;

/// Decoded RGBA8 image: row-major, top-left origin, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zeroed (transparent black) bitmap.
    pub(crate) fn new(width: u32, height: u32) -> Result<Self, DecodeError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(DecodeError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; len],
        })
    }

    /// Write one pixel. Coordinates outside the bitmap are ignored.
    ///
    /// All decoders address pixels through here, so row/column handling is
    /// identical across formats.
    #[inline]
    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[off..off + 4].copy_from_slice(&rgba);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (width * height).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Read one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[off..off + 4]);
        Some(out)
    }

    /// RGBA bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Reinterpret the buffer as typed RGBA pixels.
    #[cfg(feature = "rgb")]
    pub fn as_rgba(&self) -> &[rgb::RGBA8] {
        self.pixels[..].as_pixels()
    }

    /// Zero-copy view as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGBA8> {
        imgref::ImgRef::new(self.as_rgba(), self.width as usize, self.height as usize)
    }

    /// Copy into an owned [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(
            self.as_rgba().to_vec(),
            self.width as usize,
            self.height as usize,
        )
    }
}

/// Color table shared by the indexed decoders.
///
/// Lookups past the loaded entries return opaque black instead of failing.
#[derive(Clone, Debug, Default)]
pub(crate) struct Palette {
    entries: Vec<[u8; 4]>,
}

impl Palette {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n.min(256)),
        }
    }

    /// Build from packed RGB triples.
    pub(crate) fn from_rgb(bytes: &[u8]) -> Self {
        let mut palette = Self::with_capacity(bytes.len() / 3);
        for rgb in bytes.chunks_exact(3).take(256) {
            palette.push([rgb[0], rgb[1], rgb[2], 255]);
        }
        palette
    }

    pub(crate) fn push(&mut self, rgba: [u8; 4]) {
        if self.entries.len() < 256 {
            self.entries.push(rgba);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the color and whether `index` was inside the table.
    #[inline]
    pub(crate) fn lookup(&self, index: u8) -> ([u8; 4], bool) {
        match self.entries.get(usize::from(index)) {
            Some(&c) => (c, true),
            None => ([0, 0, 0, 255], false),
        }
    }
}

#[inline]
pub(crate) fn gray(v: u8) -> [u8; 4] {
    [v, v, v, 255]
}
