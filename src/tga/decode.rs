//! TGA header, color map and pixel stream decoding.

use enough::Stop;

use crate::bitmap::{Bitmap, Palette, gray};
use crate::cursor::Cursor;
use crate::error::{DecodeError, DecodeWarning, Warnings};
use crate::limits::check_dimensions;

pub(crate) const HEADER_SIZE: usize = 18;

const DESCRIPTOR_RIGHT_TO_LEFT: u8 = 0x10;
const DESCRIPTOR_TOP_TO_BOTTOM: u8 = 0x20;

// ── Header ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct TgaHeader {
    pub id_length: u8,
    pub color_map_type: u8,
    pub image_type: u8,
    pub color_map_length: u16,
    pub color_map_entry_size: u8,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u8,
    pub descriptor: u8,
}

impl TgaHeader {
    fn is_rle(&self) -> bool {
        matches!(self.image_type, 9..=11)
    }

    fn is_grayscale(&self) -> bool {
        matches!(self.image_type, 3 | 11)
    }

    fn flip_horizontal(&self) -> bool {
        self.descriptor & DESCRIPTOR_RIGHT_TO_LEFT != 0
    }

    fn flip_vertical(&self) -> bool {
        self.descriptor & DESCRIPTOR_TOP_TO_BOTTOM == 0
    }
}

pub(crate) fn parse_header(data: &[u8]) -> Result<TgaHeader, DecodeError> {
    let mut cursor = Cursor::new(data);
    cursor.slice(0, HEADER_SIZE)?;

    let id_length = cursor.read_u8()?;
    let color_map_type = cursor.read_u8()?;
    let image_type = cursor.read_u8()?;
    let _color_map_origin = cursor.read_u16_le()?;
    let color_map_length = cursor.read_u16_le()?;
    let color_map_entry_size = cursor.read_u8()?;
    let _x_origin = cursor.read_u16_le()?;
    let _y_origin = cursor.read_u16_le()?;
    let width = u32::from(cursor.read_u16_le()?);
    let height = u32::from(cursor.read_u16_le()?);
    let pixel_depth = cursor.read_u8()?;
    let descriptor = cursor.read_u8()?;

    if !matches!(image_type, 1..=3 | 9..=11) {
        return Err(DecodeError::UnsupportedImageType { image_type });
    }
    check_dimensions(width, height)?;

    Ok(TgaHeader {
        id_length,
        color_map_type,
        image_type,
        color_map_length,
        color_map_entry_size,
        width,
        height,
        pixel_depth,
        descriptor,
    })
}

// ── Samples ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sample {
    Indexed,
    Gray,
    GrayAlpha,
    Rgb555,
    Argb1555,
    Bgr,
    Bgra,
}

impl Sample {
    fn select(header: &TgaHeader) -> Result<Self, DecodeError> {
        let gray = header.is_grayscale();
        Ok(match header.pixel_depth {
            8 if gray => Self::Gray,
            8 => Self::Indexed,
            15 => Self::Rgb555,
            16 if gray => Self::GrayAlpha,
            16 => Self::Argb1555,
            24 => Self::Bgr,
            32 => Self::Bgra,
            depth => {
                return Err(DecodeError::UnsupportedPixelDepth {
                    depth: u32::from(depth),
                });
            }
        })
    }

    fn bytes(self) -> usize {
        match self {
            Self::Indexed | Self::Gray => 1,
            Self::GrayAlpha | Self::Rgb555 | Self::Argb1555 => 2,
            Self::Bgr => 3,
            Self::Bgra => 4,
        }
    }
}

#[inline]
fn expand_555(v: u16) -> [u8; 3] {
    let channel = |shift: u16| ((v >> shift) & 0x1F) as u8 * 8;
    [channel(10), channel(5), channel(0)]
}

struct SampleReader<'p> {
    kind: Sample,
    palette: &'p Palette,
}

impl SampleReader<'_> {
    fn read(&self, cursor: &mut Cursor<'_>, warnings: &mut Warnings) -> Result<[u8; 4], DecodeError> {
        let s = cursor.read_bytes(self.kind.bytes())?;
        Ok(match self.kind {
            Sample::Indexed => {
                let (rgba, found) = self.palette.lookup(s[0]);
                if !found {
                    warnings.push(DecodeWarning::PaletteIndexOutOfRange { index: s[0] });
                }
                rgba
            }
            Sample::Gray => gray(s[0]),
            Sample::GrayAlpha => [s[0], s[0], s[0], s[1]],
            Sample::Rgb555 => {
                let [r, g, b] = expand_555(u16::from_le_bytes([s[0], s[1]]));
                [r, g, b, 255]
            }
            Sample::Argb1555 => {
                let v = u16::from_le_bytes([s[0], s[1]]);
                let [r, g, b] = expand_555(v);
                let a = if v & 0x8000 != 0 { 255 } else { 0 };
                [r, g, b, a]
            }
            Sample::Bgr => [s[2], s[1], s[0], 255],
            Sample::Bgra => [s[2], s[1], s[0], s[3]],
        })
    }
}

// ── Color map ───────────────────────────────────────────────────────

fn read_color_map(
    cursor: &mut Cursor<'_>,
    header: &TgaHeader,
    warnings: &mut Warnings,
) -> Result<Palette, DecodeError> {
    if header.color_map_type != 1 {
        return Ok(Palette::default());
    }
    let count = usize::from(header.color_map_length);
    let mut palette = Palette::with_capacity(count);
    match header.color_map_entry_size {
        24 => {
            for _ in 0..count {
                let e = cursor.read_bytes(3)?;
                palette.push([e[2], e[1], e[0], 255]);
            }
        }
        32 => {
            for _ in 0..count {
                let e = cursor.read_bytes(4)?;
                palette.push([e[2], e[1], e[0], e[3]]);
            }
        }
        other => {
            let entry_bytes = usize::from(other).div_ceil(8);
            cursor.skip(count * entry_bytes)?;
            if count > 0 {
                warnings.push(DecodeWarning::SkippedColorMap { entry_size: other });
            }
        }
    }
    Ok(palette)
}

// ── Destination mapping ─────────────────────────────────────────────

/// Places pixels in file order, applying the descriptor's origin flips.
struct OrientedWriter<'b> {
    bitmap: &'b mut Bitmap,
    width: u32,
    height: u32,
    next: usize,
    total: usize,
    flip_h: bool,
    flip_v: bool,
}

impl<'b> OrientedWriter<'b> {
    fn new(bitmap: &'b mut Bitmap, header: &TgaHeader) -> Self {
        let total = bitmap.pixel_count();
        Self {
            width: header.width,
            height: header.height,
            bitmap,
            next: 0,
            total,
            flip_h: header.flip_horizontal(),
            flip_v: header.flip_vertical(),
        }
    }

    fn is_full(&self) -> bool {
        self.next >= self.total
    }

    /// Stored row of the next pixel.
    fn row(&self) -> usize {
        self.next / self.width as usize
    }

    /// Returns false once the bitmap is full; the pixel is then dropped.
    fn put(&mut self, rgba: [u8; 4]) -> bool {
        if self.is_full() {
            return false;
        }
        let x = (self.next % self.width as usize) as u32;
        let y = (self.next / self.width as usize) as u32;
        let dx = if self.flip_h { self.width - 1 - x } else { x };
        let dy = if self.flip_v { self.height - 1 - y } else { y };
        self.bitmap.set_pixel(dx, dy, rgba);
        self.next += 1;
        true
    }
}

// ── Pixel streams ───────────────────────────────────────────────────

pub(crate) fn decode_pixels(
    data: &[u8],
    header: &TgaHeader,
    warnings: &mut Warnings,
    stop: &dyn Stop,
) -> Result<Bitmap, DecodeError> {
    let mut kind = Sample::select(header)?;

    let mut cursor = Cursor::new(data);
    cursor.set_position(HEADER_SIZE)?;
    cursor.skip(usize::from(header.id_length))?;
    let palette = read_color_map(&mut cursor, header, warnings)?;

    if kind == Sample::Indexed && palette.len() == 0 {
        warnings.push(DecodeWarning::MissingPalette);
        kind = Sample::Gray;
    }
    let reader = SampleReader {
        kind,
        palette: &palette,
    };

    let mut bitmap = Bitmap::new(header.width, header.height)?;
    let mut writer = OrientedWriter::new(&mut bitmap, header);

    if header.is_rle() {
        decode_rle(&mut cursor, &reader, &mut writer, warnings, stop)?;
    } else {
        decode_raw(&mut cursor, &reader, &mut writer, warnings, stop)?;
    }

    Ok(bitmap)
}

fn decode_raw(
    cursor: &mut Cursor<'_>,
    reader: &SampleReader<'_>,
    writer: &mut OrientedWriter<'_>,
    warnings: &mut Warnings,
    stop: &dyn Stop,
) -> Result<(), DecodeError> {
    let mut check_row = 0;
    while !writer.is_full() {
        if writer.row() >= check_row {
            stop.check()?;
            check_row = writer.row() + 16;
        }
        let rgba = reader.read(cursor, warnings)?;
        writer.put(rgba);
    }
    Ok(())
}

/// Packet stream: the lead byte's top bit selects a run (one sample repeated)
/// or a raw packet (independent samples); the low seven bits plus one give
/// the pixel count. Output stops at the bitmap's capacity.
fn decode_rle(
    cursor: &mut Cursor<'_>,
    reader: &SampleReader<'_>,
    writer: &mut OrientedWriter<'_>,
    warnings: &mut Warnings,
    stop: &dyn Stop,
) -> Result<(), DecodeError> {
    let mut check_row = 0;
    while !writer.is_full() {
        if writer.row() >= check_row {
            stop.check()?;
            check_row = writer.row() + 16;
        }
        let lead = cursor.read_u8()?;
        let count = usize::from(lead & 0x7F) + 1;

        if lead & 0x80 != 0 {
            let rgba = reader.read(cursor, warnings)?;
            for _ in 0..count {
                if !writer.put(rgba) {
                    warnings.push(DecodeWarning::ExcessPixelData);
                    break;
                }
            }
        } else {
            for _ in 0..count {
                if writer.is_full() {
                    warnings.push(DecodeWarning::ExcessPixelData);
                    break;
                }
                let rgba = reader.read(cursor, warnings)?;
                writer.put(rgba);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn header(image_type: u8, depth: u8, descriptor: u8, w: u16, h: u16) -> Vec<u8> {
        let mut d = alloc::vec![0u8; HEADER_SIZE];
        d[2] = image_type;
        d[12..14].copy_from_slice(&w.to_le_bytes());
        d[14..16].copy_from_slice(&h.to_le_bytes());
        d[16] = depth;
        d[17] = descriptor;
        d
    }

    fn decode(data: &[u8]) -> (Bitmap, Vec<DecodeWarning>) {
        let h = parse_header(data).unwrap();
        let mut w = Warnings::default();
        let bmp = decode_pixels(data, &h, &mut w, &enough::Unstoppable).unwrap();
        (bmp, w.into_vec())
    }

    #[test]
    fn argb1555_expansion() {
        let mut d = header(2, 16, 0x20, 2, 1);
        // 0x7C00: red, alpha bit clear; 0x83E0: green, alpha bit set
        d.extend_from_slice(&0x7C00u16.to_le_bytes());
        d.extend_from_slice(&0x83E0u16.to_le_bytes());
        let (bmp, _) = decode(&d);
        assert_eq!(bmp.pixel(0, 0), Some([248, 0, 0, 0]));
        assert_eq!(bmp.pixel(1, 0), Some([0, 248, 0, 255]));
    }

    #[test]
    fn color_mapped_rle_with_bgr_map() {
        let mut d = header(9, 8, 0x20, 3, 1);
        d[1] = 1;
        d[5..7].copy_from_slice(&2u16.to_le_bytes());
        d[7] = 24;
        d.extend_from_slice(&[0, 0, 255, 255, 0, 0]); // red, blue
        d.extend_from_slice(&[0x81, 1, 0x00, 5]);
        let (bmp, warnings) = decode(&d);
        assert_eq!(bmp.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(bmp.pixel(1, 0), Some([0, 0, 255, 255]));
        assert_eq!(bmp.pixel(2, 0), Some([0, 0, 0, 255]));
        assert_eq!(
            warnings,
            [DecodeWarning::PaletteIndexOutOfRange { index: 5 }]
        );
    }

    #[test]
    fn unsupported_color_map_entry_size_is_skipped() {
        let mut d = header(1, 8, 0x20, 1, 1);
        d[0] = 2; // id length
        d[1] = 1;
        d[5..7].copy_from_slice(&2u16.to_le_bytes());
        d[7] = 16;
        d.extend_from_slice(b"ID");
        d.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        d.push(0);
        let (bmp, warnings) = decode(&d);
        assert_eq!(bmp.pixel(0, 0), Some([0, 0, 0, 255]));
        assert!(warnings.contains(&DecodeWarning::SkippedColorMap { entry_size: 16 }));
    }

    #[test]
    fn indexed_without_color_map_is_gray() {
        let mut d = header(1, 8, 0x20, 1, 1);
        d.push(77);
        let (bmp, warnings) = decode(&d);
        assert_eq!(bmp.pixel(0, 0), Some([77, 77, 77, 255]));
        assert_eq!(warnings, [DecodeWarning::MissingPalette]);
    }

    #[test]
    fn horizontal_flip() {
        let mut d = header(3, 8, 0x30, 3, 1);
        d.extend_from_slice(&[1, 2, 3]);
        let (bmp, _) = decode(&d);
        assert_eq!(bmp.pixel(0, 0), Some([3, 3, 3, 255]));
        assert_eq!(bmp.pixel(2, 0), Some([1, 1, 1, 255]));
    }

    #[test]
    fn rejects_bad_depth_and_type() {
        let d = header(2, 1, 0, 1, 1);
        let h = parse_header(&d).unwrap();
        assert!(matches!(
            Sample::select(&h),
            Err(DecodeError::UnsupportedPixelDepth { depth: 1 })
        ));
        let d = header(32, 8, 0, 1, 1);
        assert!(matches!(
            parse_header(&d),
            Err(DecodeError::UnsupportedImageType { image_type: 32 })
        ));
    }

    #[test]
    fn truncated_raw_data_is_an_error() {
        let mut d = header(2, 24, 0x20, 2, 1);
        d.extend_from_slice(&[1, 2, 3, 4]);
        let h = parse_header(&d).unwrap();
        let mut w = Warnings::default();
        assert!(matches!(
            decode_pixels(&d, &h, &mut w, &enough::Unstoppable),
            Err(DecodeError::TruncatedBuffer { .. })
        ));
    }
}
