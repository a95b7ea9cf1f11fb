//! PCX header parsing, scanline RLE and palette resolution.

use alloc::vec;

use enough::Stop;

use crate::bitmap::{Bitmap, Palette, gray};
use crate::cursor::Cursor;
use crate::error::{DecodeError, DecodeWarning, Warnings};
use crate::limits::check_dimensions;
use crate::pixel::ImageFormat;

pub(crate) const HEADER_SIZE: usize = 128;
const SIGNATURE: u8 = 0x0A;
const PALETTE_LEN: usize = 256 * 3;
const PALETTE_MARKER: u8 = 0x0C;

// ── Layout inference ────────────────────────────────────────────────

/// Sample layout of a PCX scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcxLayout {
    pub bits_per_pixel: u8,
    pub planes: u8,
    /// Decoded bytes per plane per row.
    pub bytes_per_line: usize,
}

impl PcxLayout {
    fn is_indexed(&self) -> bool {
        self.bits_per_pixel == 8 && self.planes == 1
    }
}

/// Resolve the ambiguous header bytes 66–67.
///
/// Writers disagree on whether those bytes hold a 16-bit `BytesPerLine` or
/// separate 8-bit `BitsPerPixel`/`NumPlanes` fields. A 16-bit value in
/// `(0, width*4)` is taken as `BytesPerLine`; anything else is read as the
/// two 8-bit fields and the row stride is computed. Always returns a usable
/// layout.
pub fn infer_layout(candidate: u16, width: u32) -> PcxLayout {
    let [lo, hi] = candidate.to_le_bytes();

    if candidate > 0 && u32::from(candidate) < width.saturating_mul(4) {
        let (bits_per_pixel, planes) = if lo == 0 || lo > 32 || hi == 0 || hi > 32 {
            (8, 1)
        } else {
            (lo, hi)
        };
        return PcxLayout {
            bits_per_pixel,
            planes,
            bytes_per_line: usize::from(candidate),
        };
    }

    let bits_per_pixel = if lo == 0 || lo > 8 { 8 } else { lo };
    let planes = hi.clamp(1, 4);
    let bits = width as usize * usize::from(bits_per_pixel) * usize::from(planes);
    let bytes_per_line = bits.div_ceil(8).next_multiple_of(2);

    PcxLayout {
        bits_per_pixel,
        planes,
        bytes_per_line,
    }
}

// ── Header ──────────────────────────────────────────────────────────

pub(crate) struct PcxHeader {
    pub width: u32,
    pub height: u32,
    pub layout: PcxLayout,
}

pub(crate) fn parse_header(data: &[u8]) -> Result<PcxHeader, DecodeError> {
    let cursor = Cursor::new(data);

    let signature = cursor.u8_at(0)?;
    if signature != SIGNATURE {
        return Err(DecodeError::InvalidSignature {
            format: ImageFormat::Pcx,
            found: signature,
        });
    }
    cursor.slice(0, HEADER_SIZE)?;

    let x_min = i64::from(cursor.u16_le_at(4)?);
    let y_min = i64::from(cursor.u16_le_at(6)?);
    let x_max = i64::from(cursor.u16_le_at(8)?);
    let y_max = i64::from(cursor.u16_le_at(10)?);

    let to_dim = |v: i64| u32::try_from(v).unwrap_or(0);
    let width = to_dim(x_max - x_min + 1);
    let height = to_dim(y_max - y_min + 1);
    check_dimensions(width, height)?;

    let layout = infer_layout(cursor.u16_le_at(66)?, width);

    Ok(PcxHeader {
        width,
        height,
        layout,
    })
}

// ── Palette ─────────────────────────────────────────────────────────

/// Locate the trailing 256-color palette.
///
/// The palette occupies the last 768 bytes. When the `0x0C` marker is not
/// directly in front of it but one byte earlier, the file carries a trailing
/// pad byte and the palette starts one byte sooner.
fn resolve_palette(data: &[u8]) -> Option<Palette> {
    let mut start = data.len().checked_sub(PALETTE_LEN)?;
    if start < HEADER_SIZE {
        return None;
    }
    let marker_at = |i: usize| data.get(i) == Some(&PALETTE_MARKER);
    if !marker_at(start - 1) && start >= HEADER_SIZE + 2 && marker_at(start - 2) {
        start -= 1;
    }
    let palette = Palette::from_rgb(data.get(start..start + PALETTE_LEN)?);
    (palette.len() == 256).then_some(palette)
}

// ── Scanlines ───────────────────────────────────────────────────────

/// Fill `out` from the RLE stream. Returns true if a run had to be clamped.
///
/// A byte with the top two bits set is a run: the low six bits are the
/// count and the next byte is the value. Anything else is a literal.
fn decode_rle_line(cursor: &mut Cursor<'_>, out: &mut [u8]) -> Result<bool, DecodeError> {
    let mut filled = 0;
    let mut clamped = false;
    while filled < out.len() {
        let byte = cursor.read_u8()?;
        if byte & 0xC0 == 0xC0 {
            let count = usize::from(byte & 0x3F);
            let value = cursor.read_u8()?;
            let remaining = out.len() - filled;
            if count > remaining {
                clamped = true;
            }
            let n = count.min(remaining);
            out[filled..filled + n].fill(value);
            filled += n;
        } else {
            out[filled] = byte;
            filled += 1;
        }
    }
    Ok(clamped)
}

pub(crate) fn decode_pixels(
    data: &[u8],
    header: &PcxHeader,
    warnings: &mut Warnings,
    stop: &dyn Stop,
) -> Result<Bitmap, DecodeError> {
    let layout = header.layout;

    let palette = if layout.is_indexed() {
        let palette = resolve_palette(data);
        if palette.is_none() {
            warnings.push(DecodeWarning::MissingPalette);
        }
        palette
    } else {
        None
    };

    let mut bitmap = Bitmap::new(header.width, header.height)?;
    let bpl = layout.bytes_per_line;
    let mut scanline = vec![0u8; bpl * usize::from(layout.planes)];
    let visible = bpl.min(header.width as usize);

    let mut cursor = Cursor::new(data);
    cursor.set_position(HEADER_SIZE)?;

    for y in 0..header.height {
        if y % 16 == 0 {
            stop.check()?;
        }
        for plane in scanline.chunks_exact_mut(bpl) {
            if decode_rle_line(&mut cursor, plane)? {
                warnings.push(DecodeWarning::RunClamped);
            }
        }

        for (x, &sample) in scanline[..visible].iter().enumerate() {
            let rgba = match &palette {
                Some(palette) => palette.lookup(sample).0,
                None => gray(sample),
            };
            bitmap.set_pixel(x as u32, y, rgba);
        }
    }

    Ok(bitmap)
}
