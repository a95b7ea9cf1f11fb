//! # zenlegacy
//!
//! Decoders for legacy raster formats (PCX, TGA, baseline TIFF) that turn
//! untrusted bytes into a canonical RGBA8 [`Bitmap`], plus a format sniffer
//! that also recognizes BMP so callers can route it to a native decoder.
//!
//! Every decode is a pure function of the input buffer: no I/O, no global
//! state, no logging from the decoders. Decodes of different buffers can run
//! on any number of threads at once.
//!
//! ## Supported Formats
//!
//! ### PCX (`pcx` feature)
//! - RLE scanlines, any plane count
//! - 8-bit indexed with the trailing 256-color palette (`0x0C` marker optional)
//! - Everything else as grayscale intensity
//!
//! ### TGA (`tga` feature)
//! - Image types 1/2/3 (raw) and 9/10/11 (RLE)
//! - 8-bit indexed or gray, 15/16-bit 5-5-5, 24-bit BGR, 32-bit BGRA
//! - Origin flips from the image descriptor
//! - Detected by `.tga` file extension only (the format has no magic bytes)
//!
//! ### TIFF (`tiff` feature)
//! - First IFD only, either byte order
//! - 8-bit samples, 1–4 samples per pixel
//! - Uncompressed or PackBits strips
//!
//! ## Non-Goals
//!
//! - Encoding of any kind
//! - BMP pixel decoding (detected, then returned as [`DecodeError::Delegated`])
//! - Multi-page TIFF, LZW, Deflate, predictors
//!
//! ## Usage
//!
//! ```no_run
//! use zenlegacy::{DecodeRequest, DecodeWarning, Unstoppable};
//!
//! let data: &[u8] = &[]; // your PCX/TGA/TIFF bytes
//!
//! // Probe without decoding
//! let info = DecodeRequest::new(data).with_file_name("logo.pcx").probe()?;
//! println!("{}x{} {:?}", info.width, info.height, info.format);
//!
//! let decoded = DecodeRequest::new(data)
//!     .with_file_name("logo.pcx")
//!     .decode(Unstoppable)?;
//! if decoded.warnings().contains(&DecodeWarning::MissingPalette) {
//!     println!("no palette, rendered as grayscale");
//! }
//! let rgba: &[u8] = decoded.pixels();
//! # let _ = rgba;
//! # Ok::<(), zenlegacy::DecodeError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(not(all(feature = "pcx", feature = "tga", feature = "tiff")), allow(dead_code))]

extern crate alloc;

mod bitmap;
mod cursor;
mod decode;
mod detect;
mod error;
mod limits;
mod pixel;

#[cfg(feature = "pcx")]
mod pcx;

#[cfg(feature = "tga")]
mod tga;

#[cfg(feature = "tiff")]
mod tiff;

// Re-exports
pub use bitmap::Bitmap;
pub use decode::{DecodeOutput, DecodeRequest};
pub use detect::detect_format;
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeError, DecodeWarning};
pub use limits::{Limits, MAX_DIMENSION};
#[cfg(feature = "pcx")]
pub use pcx::{PcxLayout, infer_layout};
pub use pixel::{ImageFormat, ImageInfo};

/// Sniff and decode `data`. TGA needs a file name; use [`decode_named`].
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).decode(stop)
}

/// Sniff (using `file_name` for TGA) and decode `data`.
pub fn decode_named(
    data: &[u8],
    file_name: &str,
    stop: impl Stop,
) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data)
        .with_file_name(file_name)
        .decode(stop)
}

/// Header-only probe.
pub fn probe(data: &[u8], file_name: Option<&str>) -> Result<ImageInfo, DecodeError> {
    match file_name {
        Some(name) => DecodeRequest::new(data).with_file_name(name).probe(),
        None => DecodeRequest::new(data).probe(),
    }
}

/// Decode PCX without sniffing.
#[cfg(feature = "pcx")]
pub fn decode_pcx(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).decode_as(ImageFormat::Pcx, &stop)
}

/// Decode TGA without sniffing (no file name needed).
#[cfg(feature = "tga")]
pub fn decode_tga(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).decode_as(ImageFormat::Tga, &stop)
}

/// Decode baseline TIFF without sniffing.
#[cfg(feature = "tiff")]
pub fn decode_tiff(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).decode_as(ImageFormat::Tiff, &stop)
}
