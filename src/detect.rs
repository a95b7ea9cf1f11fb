//! Format sniffing from leading bytes (and, for TGA, the file name).
//!
//! Checks run in a fixed order and the first match wins. TGA has no magic
//! signature, so a TGA file without a `.tga` name is reported as unknown.

use crate::error::DecodeError;
use crate::pixel::ImageFormat;

const TIFF_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00];
const TIFF_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A];

/// Classify `data`, consulting `file_name` only for TGA.
pub fn detect_format(data: &[u8], file_name: Option<&str>) -> Result<ImageFormat, DecodeError> {
    if data.starts_with(b"BM") {
        return Ok(ImageFormat::Bmp);
    }
    if file_name.is_some_and(has_tga_extension) {
        return Ok(ImageFormat::Tga);
    }
    if data.first() == Some(&0x0A) && data.get(2) == Some(&0x01) {
        return Ok(ImageFormat::Pcx);
    }
    if data.starts_with(&TIFF_LE) || data.starts_with(&TIFF_BE) {
        return Ok(ImageFormat::Tiff);
    }
    Err(DecodeError::UnknownFormat)
}

fn has_tga_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(ImageFormat::Tga.extension()))
}
