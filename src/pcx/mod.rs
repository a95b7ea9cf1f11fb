//! ZSoft PCX decoder.
//!
//! Handles the 128-byte header, per-plane scanline RLE and the optional
//! trailing 256-color palette. 8-bit single-plane images with a palette
//! decode as indexed color; everything else decodes as grayscale intensity
//! from the first plane.

mod decode;

pub use decode::{PcxLayout, infer_layout};

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
        format: ImageFormat::Pcx,
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
    Ok(DecodeOutput::new(bitmap, ImageFormat::Pcx, warnings))
}
