//! Truevision TGA decoder (internal).
//!
//! Supports color-mapped (1, 9), true-color (2, 10) and grayscale (3, 11)
//! images, raw or RLE, at 8/15/16/24/32 bits per pixel. Origin flips from the
//! image descriptor are applied while pixels are placed.

mod decode;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::{DecodeError, Warnings};
use crate::limits::{Limits, check_limits};
use crate::pixel::{ImageFormat, ImageInfo};

pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, DecodeError> {
    let header = decode::parse_header(data)?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Tga,
    })
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, DecodeError> {
    let header = decode::parse_header(data)?;
    check_limits(limits, header.width, header.height)?;
    stop.check()?;

    let mut warnings = Warnings::default();
    let bitmap = decode::decode_pixels(data, &header, &mut warnings, stop)?;
    Ok(DecodeOutput::new(bitmap, ImageFormat::Tga, warnings))
}
