//! Synthetic file builders shared by the integration tests.

#![allow(dead_code)]

// ── PCX ──────────────────────────────────────────────────────────────

/// 128-byte PCX header with the given dimensions and bytes 66–67.
pub fn pcx_header(width: u16, height: u16, bytes_66_67: u16) -> Vec<u8> {
    let mut h = vec![0u8; 128];
    h[0] = 0x0A;
    h[1] = 5;
    h[2] = 1;
    h[3] = 8;
    h[8..10].copy_from_slice(&(width - 1).to_le_bytes());
    h[10..12].copy_from_slice(&(height - 1).to_le_bytes());
    h[65] = 1;
    h[66..68].copy_from_slice(&bytes_66_67.to_le_bytes());
    h
}

/// PCX RLE for one row: runs of up to 63, and any byte with the top two
/// bits set goes through a run of one.
pub fn pcx_rle(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < row.len() {
        let v = row[i];
        let mut run = 1;
        while i + run < row.len() && row[i + run] == v && run < 63 {
            run += 1;
        }
        if run > 1 || v >= 0xC0 {
            out.push(0xC0 | run as u8);
            out.push(v);
        } else {
            out.push(v);
        }
        i += run;
    }
    out
}

/// 8-bit single-plane PCX from row-major samples, optional trailing palette.
pub fn pcx_indexed(width: u16, height: u16, samples: &[u8], palette: Option<&[u8; 768]>) -> Vec<u8> {
    let mut data = pcx_header(width, height, width);
    for row in samples.chunks_exact(width as usize) {
        data.extend_from_slice(&pcx_rle(row));
    }
    if let Some(palette) = palette {
        data.push(0x0C);
        data.extend_from_slice(palette);
    }
    data
}

// ── TGA ──────────────────────────────────────────────────────────────

pub const TOP_LEFT: u8 = 0x20;
pub const BOTTOM_LEFT: u8 = 0x00;

pub fn tga_header(image_type: u8, depth: u8, descriptor: u8, width: u16, height: u16) -> Vec<u8> {
    let mut h = vec![0u8; 18];
    h[2] = image_type;
    h[12..14].copy_from_slice(&width.to_le_bytes());
    h[14..16].copy_from_slice(&height.to_le_bytes());
    h[16] = depth;
    h[17] = descriptor;
    h
}

/// TGA RLE packets for fixed-size samples: runs of equal samples become run
/// packets, everything else raw packets, both capped at 128 pixels.
pub fn tga_rle(samples: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < samples.len() {
        let mut run = 1;
        while i + run < samples.len() && samples[i + run] == samples[i] && run < 128 {
            run += 1;
        }
        if run > 1 {
            out.push(0x80 | (run - 1) as u8);
            out.extend_from_slice(samples[i]);
            i += run;
            continue;
        }
        let start = i;
        while i < samples.len()
            && i - start < 128
            && (i + 1 >= samples.len() || samples[i + 1] != samples[i])
        {
            i += 1;
        }
        if i == start {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        for s in &samples[start..i] {
            out.extend_from_slice(s);
        }
    }
    out
}

// ── TIFF ─────────────────────────────────────────────────────────────

pub struct TiffParams<'a> {
    pub big_endian: bool,
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u16,
    pub compression: u16,
    pub photometric: Option<u16>,
    pub strips: &'a [&'a [u8]],
    pub with_byte_counts: bool,
}

impl<'a> TiffParams<'a> {
    pub fn rgb(width: u32, height: u32, strips: &'a [&'a [u8]]) -> Self {
        Self {
            big_endian: false,
            width,
            height,
            samples_per_pixel: 3,
            compression: 1,
            photometric: Some(2),
            strips,
            with_byte_counts: true,
        }
    }
}

/// Build a single-IFD TIFF. Strip data follows the header; the IFD and any
/// out-of-line arrays follow the strips.
pub fn tiff(params: &TiffParams<'_>) -> Vec<u8> {
    let be = params.big_endian;
    let u16b = |v: u16| if be { v.to_be_bytes() } else { v.to_le_bytes() };
    let u32b = |v: u32| if be { v.to_be_bytes() } else { v.to_le_bytes() };

    let mut data = Vec::new();
    data.extend_from_slice(if be { b"MM" } else { b"II" });
    data.extend_from_slice(&u16b(42));
    data.extend_from_slice(&[0; 4]); // IFD offset, patched below

    let mut offsets = Vec::new();
    for strip in params.strips {
        offsets.push(data.len() as u32);
        data.extend_from_slice(strip);
    }
    let counts: Vec<u32> = params.strips.iter().map(|s| s.len() as u32).collect();
    if data.len() % 2 == 1 {
        data.push(0);
    }

    // (tag, type, values)
    let mut entries: Vec<(u16, u16, Vec<u32>)> = vec![
        (256, 4, vec![params.width]),
        (257, 4, vec![params.height]),
        (258, 3, vec![8; params.samples_per_pixel as usize]),
        (259, 3, vec![u32::from(params.compression)]),
    ];
    if let Some(photometric) = params.photometric {
        entries.push((262, 3, vec![u32::from(photometric)]));
    }
    entries.push((273, 4, offsets));
    entries.push((277, 3, vec![u32::from(params.samples_per_pixel)]));
    if params.with_byte_counts {
        entries.push((279, 4, counts));
    }

    let ifd_offset = data.len() as u32;
    data[4..8].copy_from_slice(&u32b(ifd_offset));
    let ifd_len = 2 + entries.len() * 12 + 4;
    let mut extra_offset = ifd_offset as usize + ifd_len;
    let mut extra = Vec::new();

    data.extend_from_slice(&u16b(entries.len() as u16));
    for (tag, ty, values) in &entries {
        data.extend_from_slice(&u16b(*tag));
        data.extend_from_slice(&u16b(*ty));
        data.extend_from_slice(&u32b(values.len() as u32));
        let size = if *ty == 3 { 2 } else { 4 };
        let mut encoded = Vec::new();
        for &v in values {
            if size == 2 {
                encoded.extend_from_slice(&u16b(v as u16));
            } else {
                encoded.extend_from_slice(&u32b(v));
            }
        }
        if encoded.len() <= 4 {
            encoded.resize(4, 0);
            data.extend_from_slice(&encoded);
        } else {
            data.extend_from_slice(&u32b(extra_offset as u32));
            extra_offset += encoded.len();
            extra.extend_from_slice(&encoded);
        }
    }
    data.extend_from_slice(&[0; 4]); // no next IFD
    data.extend_from_slice(&extra);
    data
}

/// PackBits: repeats of two or more become run packets, everything else
/// literal packets, both capped at 128 bytes.
pub fn packbits(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < src.len() {
        let mut run = 1;
        while i + run < src.len() && src[i + run] == src[i] && run < 128 {
            run += 1;
        }
        if run > 1 {
            out.push((257 - run) as u8);
            out.push(src[i]);
            i += run;
            continue;
        }
        let start = i;
        while i < src.len() && i - start < 128 && (i + 1 >= src.len() || src[i + 1] != src[i]) {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&src[start..i]);
    }
    out
}

/// Position of the IFD entry for `tag` in a little-endian file.
pub fn tiff_entry(data: &[u8], tag: u16) -> Option<usize> {
    let ifd = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
    let count = u16::from_le_bytes([data[ifd], data[ifd + 1]]) as usize;
    (0..count)
        .map(|i| ifd + 2 + i * 12)
        .find(|&e| u16::from_le_bytes([data[e], data[e + 1]]) == tag)
}

// ── Pixels ───────────────────────────────────────────────────────────

pub fn checkerboard(w: usize, h: usize) -> Vec<u8> {
    let mut samples = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            samples[y * w + x] = if (x + y) % 2 == 0 { 200 } else { 17 };
        }
    }
    samples
}

pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}
