//! Baseline TIFF: header, first IFD, strips, PackBits.

use alloc::vec;

use enough::Stop;

use super::ifd::{Ifd, Tag};
use crate::bitmap::{Bitmap, gray};
use crate::cursor::{Cursor, Endian};
use crate::error::{DecodeError, DecodeWarning, Warnings};
use crate::limits::check_dimensions;

const MAGIC: u16 = 42;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Compression {
    None,
    PackBits,
}

impl Compression {
    fn from_code(code: u32) -> Result<Self, DecodeError> {
        match code {
            1 => Ok(Self::None),
            32773 => Ok(Self::PackBits),
            code => Err(DecodeError::UnsupportedCompression { code }),
        }
    }
}

pub(crate) struct TiffHeader {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u8,
    pub compression: Compression,
    pub white_is_zero: bool,
    ifd: Ifd,
}

pub(crate) fn parse_header(data: &[u8], warnings: &mut Warnings) -> Result<TiffHeader, DecodeError> {
    let cursor = Cursor::new(data);

    let endian = match cursor.slice(0, 2)? {
        b"II" => Endian::Little,
        b"MM" => Endian::Big,
        other => {
            return Err(DecodeError::InvalidByteOrder {
                found: [other[0], other[1]],
            });
        }
    };
    let magic = cursor.u16_at(2, endian)?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }
    let ifd_offset = cursor.u32_at(4, endian)? as usize;
    let ifd = Ifd::read(&cursor, endian, ifd_offset, warnings)?;

    let width = ifd.require(&cursor, Tag::ImageWidth)?;
    let height = ifd.require(&cursor, Tag::ImageLength)?;
    check_dimensions(width, height)?;

    let bits = ifd.value(&cursor, Tag::BitsPerSample)?.unwrap_or(8);
    let samples = ifd.value(&cursor, Tag::SamplesPerPixel)?.unwrap_or(1);
    if bits != 8 || !(1..=4).contains(&samples) {
        return Err(DecodeError::UnsupportedPixelDepth {
            depth: bits.saturating_mul(samples),
        });
    }
    let compression = Compression::from_code(ifd.value(&cursor, Tag::Compression)?.unwrap_or(1))?;
    let photometric = ifd
        .value(&cursor, Tag::PhotometricInterpretation)?
        .unwrap_or(1);

    Ok(TiffHeader {
        width,
        height,
        samples_per_pixel: samples as u8,
        compression,
        white_is_zero: photometric == 0,
        ifd,
    })
}

// ── Sample assembly ─────────────────────────────────────────────────

/// Destination for decoded sample bytes.
pub(crate) trait ByteSink {
    /// Returns false once no more bytes are accepted.
    fn push(&mut self, byte: u8) -> bool;

    fn extend(&mut self, bytes: &[u8]) -> bool {
        bytes.iter().all(|&b| self.push(b))
    }
}

/// Groups sample bytes into pixels and writes them in row-major order.
///
/// A pixel split across two strips is completed by the next strip. Bytes
/// beyond the bitmap's capacity are refused.
struct PixelSink<'b> {
    bitmap: &'b mut Bitmap,
    width: usize,
    samples: usize,
    white_is_zero: bool,
    pending: [u8; 4],
    filled: usize,
    next: usize,
    total: usize,
    overflowed: bool,
}

impl<'b> PixelSink<'b> {
    fn new(bitmap: &'b mut Bitmap, header: &TiffHeader) -> Self {
        let total = bitmap.pixel_count();
        Self {
            width: header.width as usize,
            samples: usize::from(header.samples_per_pixel),
            white_is_zero: header.white_is_zero,
            bitmap,
            pending: [0; 4],
            filled: 0,
            next: 0,
            total,
            overflowed: false,
        }
    }

    fn is_full(&self) -> bool {
        self.next >= self.total
    }

    /// Sample bytes still needed to complete the image.
    fn missing_bytes(&self) -> usize {
        (self.total - self.next) * self.samples - self.filled
    }

    fn emit(&mut self) {
        let p = self.pending;
        let luma = |v: u8| if self.white_is_zero { 255 - v } else { v };
        let rgba = match self.samples {
            1 => gray(luma(p[0])),
            2 => {
                let g = luma(p[0]);
                [g, g, g, p[1]]
            }
            3 => [p[0], p[1], p[2], 255],
            _ => p,
        };
        let x = (self.next % self.width) as u32;
        let y = (self.next / self.width) as u32;
        self.bitmap.set_pixel(x, y, rgba);
        self.next += 1;
    }
}

impl ByteSink for PixelSink<'_> {
    fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            self.overflowed = true;
            return false;
        }
        self.pending[self.filled] = byte;
        self.filled += 1;
        if self.filled == self.samples {
            self.emit();
            self.filled = 0;
        }
        true
    }
}

/// PackBits: control byte `n < 128` copies the next `n + 1` bytes, `n > 128`
/// repeats the next byte `257 - n` times, `n == 128` is a no-op.
///
/// Returns false if the sink stopped accepting bytes.
pub(crate) fn unpack_bits<S: ByteSink>(src: &[u8], sink: &mut S) -> bool {
    let mut i = 0;
    while let Some(&n) = src.get(i) {
        i += 1;
        match n {
            0..=127 => {
                let end = (i + usize::from(n) + 1).min(src.len());
                if !sink.extend(&src[i..end]) {
                    return false;
                }
                i = end;
            }
            128 => {}
            _ => {
                let Some(&value) = src.get(i) else {
                    break;
                };
                i += 1;
                for _ in 0..257 - usize::from(n) {
                    if !sink.push(value) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

// ── Strips ──────────────────────────────────────────────────────────

pub(crate) fn decode_pixels(
    data: &[u8],
    header: &TiffHeader,
    warnings: &mut Warnings,
    stop: &dyn Stop,
) -> Result<Bitmap, DecodeError> {
    let cursor = Cursor::new(data);

    let offsets = header
        .ifd
        .values(&cursor, Tag::StripOffsets)?
        .ok_or(DecodeError::MissingTag {
            tag: Tag::StripOffsets.code(),
        })?;
    let counts = match header.ifd.values(&cursor, Tag::StripByteCounts)? {
        Some(counts) => counts,
        None if offsets.len() == 1 && header.compression == Compression::None => {
            // Uncompressed single strip: the size follows from the dimensions.
            let expected = header.width as usize
                * header.height as usize
                * usize::from(header.samples_per_pixel);
            let available = data.len().saturating_sub(offsets[0] as usize);
            vec![expected.min(available) as u32]
        }
        None => {
            return Err(DecodeError::MissingTag {
                tag: Tag::StripByteCounts.code(),
            });
        }
    };

    if offsets.len() != counts.len() {
        return Err(DecodeError::StripCountMismatch {
            offsets: offsets.len(),
            byte_counts: counts.len(),
        });
    }

    let mut bitmap = Bitmap::new(header.width, header.height)?;
    let mut sink = PixelSink::new(&mut bitmap, header);
    let mut data_end = 0;

    for (&offset, &len) in offsets.iter().zip(&counts) {
        if sink.is_full() {
            if len > 0 {
                sink.overflowed = true;
            }
            break;
        }
        stop.check()?;
        let strip = cursor.slice(offset as usize, len as usize)?;
        data_end = offset as usize + len as usize;
        match header.compression {
            Compression::None => sink.extend(strip),
            Compression::PackBits => unpack_bits(strip, &mut sink),
        };
    }

    if !sink.is_full() {
        return Err(DecodeError::TruncatedBuffer {
            offset: data_end,
            needed: sink.missing_bytes(),
            available: 0,
        });
    }
    if sink.overflowed {
        warnings.push(DecodeWarning::ExcessPixelData);
    }
    Ok(bitmap)
}
