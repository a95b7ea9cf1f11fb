//! Image File Directory: a fixed table of the tags the decoder consumes.

use alloc::vec::Vec;

use crate::cursor::{Cursor, Endian};
use crate::error::{DecodeError, DecodeWarning, Warnings};

const ENTRY_SIZE: usize = 12;

/// Tags the baseline decoder understands. Anything else is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tag {
    ImageWidth,
    ImageLength,
    BitsPerSample,
    Compression,
    PhotometricInterpretation,
    StripOffsets,
    SamplesPerPixel,
    StripByteCounts,
}

impl Tag {
    const COUNT: usize = 8;

    fn from_u16(v: u16) -> Option<Self> {
        Some(match v {
            256 => Self::ImageWidth,
            257 => Self::ImageLength,
            258 => Self::BitsPerSample,
            259 => Self::Compression,
            262 => Self::PhotometricInterpretation,
            273 => Self::StripOffsets,
            277 => Self::SamplesPerPixel,
            279 => Self::StripByteCounts,
            _ => return None,
        })
    }

    pub(crate) fn code(self) -> u16 {
        match self {
            Self::ImageWidth => 256,
            Self::ImageLength => 257,
            Self::BitsPerSample => 258,
            Self::Compression => 259,
            Self::PhotometricInterpretation => 262,
            Self::StripOffsets => 273,
            Self::SamplesPerPixel => 277,
            Self::StripByteCounts => 279,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldType {
    Byte,
    Short,
    Long,
    /// Any other type: the 4-byte value field is returned as-is.
    Raw,
}

impl FieldType {
    fn from_u16(v: u16) -> Self {
        match v {
            1 => Self::Byte,
            3 => Self::Short,
            4 => Self::Long,
            _ => Self::Raw,
        }
    }

    fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Long | Self::Raw => 4,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    field_type: FieldType,
    count: u32,
    /// Absolute position of the 4-byte value/offset field.
    value_pos: usize,
}

pub(crate) struct Ifd {
    endian: Endian,
    entries: [Option<Entry>; Tag::COUNT],
}

impl Ifd {
    /// Walk the directory at `offset`, keeping the first entry for each known tag.
    pub(crate) fn read(
        cursor: &Cursor<'_>,
        endian: Endian,
        offset: usize,
        warnings: &mut Warnings,
    ) -> Result<Self, DecodeError> {
        let count = usize::from(cursor.u16_at(offset, endian)?);
        let first = offset + 2;
        cursor.slice(first, count * ENTRY_SIZE)?;

        let mut entries = [None; Tag::COUNT];
        for i in 0..count {
            let pos = first + i * ENTRY_SIZE;
            let code = cursor.u16_at(pos, endian)?;
            let Some(tag) = Tag::from_u16(code) else {
                warnings.push(DecodeWarning::IgnoredTag { tag: code });
                continue;
            };
            let slot = &mut entries[tag.slot()];
            if slot.is_none() {
                *slot = Some(Entry {
                    field_type: FieldType::from_u16(cursor.u16_at(pos + 2, endian)?),
                    count: cursor.u32_at(pos + 4, endian)?,
                    value_pos: pos + 8,
                });
            }
        }
        Ok(Self { endian, entries })
    }

    /// All values of `tag`, `None` if the tag is absent.
    ///
    /// Values that fit in four bytes are stored in the entry itself;
    /// larger arrays live at the offset the entry holds.
    pub(crate) fn values(
        &self,
        cursor: &Cursor<'_>,
        tag: Tag,
    ) -> Result<Option<Vec<u32>>, DecodeError> {
        let Some(entry) = self.entries[tag.slot()] else {
            return Ok(None);
        };
        let endian = self.endian;

        if entry.field_type == FieldType::Raw {
            return Ok(Some(alloc::vec![cursor.u32_at(entry.value_pos, endian)?]));
        }

        let size = entry.field_type.size();
        let count = entry.count as usize;
        let total = count
            .checked_mul(size)
            .ok_or(DecodeError::TruncatedBuffer {
                offset: entry.value_pos,
                needed: usize::MAX,
                available: cursor.len().saturating_sub(entry.value_pos),
            })?;
        let base = if total <= 4 {
            entry.value_pos
        } else {
            cursor.u32_at(entry.value_pos, endian)? as usize
        };
        // Bounds-check the whole array before allocating for it.
        cursor.slice(base, total)?;

        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            let pos = base + i * size;
            out.push(match entry.field_type {
                FieldType::Byte => u32::from(cursor.u8_at(pos)?),
                FieldType::Short => u32::from(cursor.u16_at(pos, endian)?),
                FieldType::Long | FieldType::Raw => cursor.u32_at(pos, endian)?,
            });
        }
        Ok(Some(out))
    }

    /// First value of `tag`, `None` if absent or empty.
    pub(crate) fn value(&self, cursor: &Cursor<'_>, tag: Tag) -> Result<Option<u32>, DecodeError> {
        Ok(self
            .values(cursor, tag)?
            .and_then(|v| v.first().copied()))
    }

    pub(crate) fn require(&self, cursor: &Cursor<'_>, tag: Tag) -> Result<u32, DecodeError> {
        self.value(cursor, tag)?
            .ok_or(DecodeError::MissingTag { tag: tag.code() })
    }
}
