/// Image format classified by the sniffer.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Windows bitmap. Recognized, but decoded by the caller's native decoder.
    Bmp,
    /// ZSoft PCX.
    Pcx,
    /// Truevision TGA (Targa). Only recognizable by file extension.
    Tga,
    /// Baseline TIFF, either byte order.
    Tiff,
}

impl ImageFormat {
    /// Conventional lowercase file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Pcx => "pcx",
            Self::Tga => "tga",
            Self::Tiff => "tiff",
        }
    }

    /// Human-readable format name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bmp => "BMP",
            Self::Pcx => "PCX",
            Self::Tga => "TGA",
            Self::Tiff => "TIFF",
        }
    }

    /// Whether this crate decodes the format itself (with its feature enabled).
    /// Other formats are only sniffed and come back as
    /// [`DecodeError::Delegated`](crate::DecodeError::Delegated).
    pub fn is_decoded_here(self) -> bool {
        !matches!(self, Self::Bmp)
    }
}

/// Header-only facts about an image, available without decoding pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}
