//! Baseline TIFF decoder (internal).
//!
//! Reads the first image only: 8-bit samples, 1–4 samples per pixel,
//! uncompressed or PackBits strips, either byte order.

mod decode;
mod ifd;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::{DecodeError, Warnings};
use crate::limits::{Limits, check_limits};
use crate::pixel::{ImageFormat, ImageInfo};

pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, DecodeError> {
    let header = decode::parse_header(data, &mut Warnings::default())?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Tiff,
    })
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, DecodeError> {
    let mut warnings = Warnings::default();
    let header = decode::parse_header(data, &mut warnings)?;
    check_limits(limits, header.width, header.height)?;
    stop.check()?;

    let bitmap = decode::decode_pixels(data, &header, &mut warnings, stop)?;
    Ok(DecodeOutput::new(bitmap, ImageFormat::Tiff, warnings))
}
