use alloc::string::String;
use enough::StopReason;

use crate::pixel::ImageFormat;

/// Errors from PCX/TGA/TIFF decoding.
///
/// Every variant is terminal for the buffer being decoded. A decoder never
/// returns a partially filled bitmap alongside an error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("truncated buffer: need {needed} bytes at offset {offset}, only {available} available")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid {format:?} signature byte 0x{found:02X}")]
    InvalidSignature { format: ImageFormat, found: u8 },

    #[error("invalid TIFF byte order mark {found:02X?}")]
    InvalidByteOrder { found: [u8; 2] },

    #[error("invalid TIFF magic number {found} (expected 42)")]
    InvalidMagic { found: u16 },

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported pixel depth: {depth}")]
    UnsupportedPixelDepth { depth: u32 },

    #[error("unsupported compression: {code}")]
    UnsupportedCompression { code: u32 },

    #[error("unsupported TGA image type: {image_type}")]
    UnsupportedImageType { image_type: u8 },

    #[error("required TIFF tag {tag} is missing")]
    MissingTag { tag: u16 },

    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("{format:?} must be decoded by a native decoder")]
    Delegated { format: ImageFormat },

    #[error("{format:?} support is not compiled in")]
    NotCompiled { format: ImageFormat },

    #[error("TIFF has {offsets} strip offsets but {byte_counts} strip byte counts")]
    StripCountMismatch { offsets: usize, byte_counts: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}

/// Soft conditions encountered during a successful decode.
///
/// Each kind is reported at most once per decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeWarning {
    /// An 8-bit indexed image had no usable palette; rendered as grayscale.
    MissingPalette,
    /// A pixel referenced a palette entry that does not exist; rendered black.
    PaletteIndexOutOfRange { index: u8 },
    /// A TGA color map with an undecodable entry size was skipped.
    SkippedColorMap { entry_size: u8 },
    /// A PCX run extended past the end of its row and was clamped.
    RunClamped,
    /// More pixel data was present than the image holds; the rest was discarded.
    ExcessPixelData,
    /// A TIFF tag outside the supported set was ignored.
    IgnoredTag { tag: u16 },
}

/// Collects warnings, keeping the first occurrence of each kind.
#[derive(Debug, Default)]
pub(crate) struct Warnings {
    list: alloc::vec::Vec<DecodeWarning>,
}

/// Cap on distinct `IgnoredTag` entries, so a crafted IFD cannot grow the list.
const MAX_IGNORED_TAGS: usize = 16;

impl Warnings {
    pub(crate) fn push(&mut self, warning: DecodeWarning) {
        let same_kind = |w: &DecodeWarning| {
            core::mem::discriminant(w) == core::mem::discriminant(&warning)
        };
        if let DecodeWarning::IgnoredTag { .. } = warning {
            if self.list.contains(&warning)
                || self.list.iter().filter(|w| same_kind(w)).count() >= MAX_IGNORED_TAGS
            {
                return;
            }
        } else if self.list.iter().any(same_kind) {
            return;
        }
        self.list.push(warning);
    }

    pub(crate) fn into_vec(self) -> alloc::vec::Vec<DecodeWarning> {
        self.list
    }
}
