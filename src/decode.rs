use alloc::vec::Vec;

use enough::Stop;

use crate::bitmap::Bitmap;
use crate::detect::detect_format;
use crate::error::{DecodeError, DecodeWarning, Warnings};
use crate::limits::Limits;
use crate::pixel::{ImageFormat, ImageInfo};

/// Decoded image plus the soft conditions met while decoding it.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    bitmap: Bitmap,
    warnings: Vec<DecodeWarning>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl DecodeOutput {
    pub(crate) fn new(bitmap: Bitmap, format: ImageFormat, warnings: Warnings) -> Self {
        Self {
            width: bitmap.width(),
            height: bitmap.height(),
            bitmap,
            warnings: warnings.into_vec(),
            format,
        }
    }

    /// RGBA8 pixel data, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        self.bitmap.pixels()
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }

    /// Non-fatal conditions, e.g. [`DecodeWarning::MissingPalette`].
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }
}

/// Builder for a single decode: sniff, check limits, dispatch.
///
/// ```no_run
/// use zenlegacy::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // file contents
/// let limits = Limits { max_pixels: Some(4_000_000), ..Default::default() };
/// let output = DecodeRequest::new(data)
///     .with_file_name("sprite.tga")
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// println!("{}x{} {:?}", output.width, output.height, output.format);
/// # Ok::<(), zenlegacy::DecodeError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    file_name: Option<&'a str>,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            file_name: None,
            limits: None,
        }
    }

    /// File name used only to recognize TGA by its extension.
    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn detect(&self) -> Result<ImageFormat, DecodeError> {
        detect_format(self.data, self.file_name)
    }

    /// Parse only the header of the detected format.
    pub fn probe(&self) -> Result<ImageInfo, DecodeError> {
        let format = self.detect()?;
        if !format.is_decoded_here() {
            return Err(DecodeError::Delegated { format });
        }
        match format {
            #[cfg(feature = "pcx")]
            ImageFormat::Pcx => crate::pcx::probe(self.data),
            #[cfg(feature = "tga")]
            ImageFormat::Tga => crate::tga::probe(self.data),
            #[cfg(feature = "tiff")]
            ImageFormat::Tiff => crate::tiff::probe(self.data),
            #[allow(unreachable_patterns)]
            format => Err(DecodeError::NotCompiled { format }),
        }
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
        let format = self.detect()?;
        #[cfg(feature = "log")]
        log::trace!("decoding {} ({} bytes)", format.name(), self.data.len());

        let output = self.decode_as(format, &stop)?;

        #[cfg(feature = "log")]
        {
            log::trace!("decoded {}x{}", output.width, output.height);
            for warning in output.warnings() {
                log::debug!("{}: {:?}", format.name(), warning);
            }
        }
        Ok(output)
    }

    /// Decode as `format`, skipping detection.
    pub(crate) fn decode_as(
        &self,
        format: ImageFormat,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, DecodeError> {
        if !format.is_decoded_here() {
            return Err(DecodeError::Delegated { format });
        }
        let limits = self.limits;
        match format {
            #[cfg(feature = "pcx")]
            ImageFormat::Pcx => crate::pcx::decode(self.data, limits, stop),
            #[cfg(feature = "tga")]
            ImageFormat::Tga => crate::tga::decode(self.data, limits, stop),
            #[cfg(feature = "tiff")]
            ImageFormat::Tiff => crate::tiff::decode(self.data, limits, stop),
            #[allow(unreachable_patterns)]
            format => Err(DecodeError::NotCompiled { format }),
        }
    }
}
