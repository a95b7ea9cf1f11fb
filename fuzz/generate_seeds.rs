#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // PCX 2x2, 8-bit, RLE rows, trailing palette
    let mut pcx = vec![0u8; 128];
    pcx[0] = 0x0A; pcx[1] = 5; pcx[2] = 1; pcx[3] = 8;
    pcx[8] = 1; pcx[10] = 1; // xmax, ymax
    pcx[65] = 1;
    pcx[66] = 2; // bytes per line
    pcx.extend_from_slice(&[0xC2, 0x01, 0x02, 0xC1, 0xC5]);
    pcx.push(0x0C);
    pcx.extend((0..768).map(|i| (i % 256) as u8));
    fs::write(format!("{dir}/pcx_2x2_palette.pcx"), pcx).unwrap();

    // TGA 2x1 uncompressed BGR, top-left origin
    let mut tga = vec![0u8; 18];
    tga[2] = 2; tga[12] = 2; tga[14] = 1; tga[16] = 24; tga[17] = 0x20;
    tga.extend_from_slice(&[0, 0, 255, 0, 255, 0]);
    fs::write(format!("{dir}/tga_2x1_bgr.tga"), tga).unwrap();

    // TGA 4x2 RLE gray, bottom-left origin
    let mut tga_rle = vec![0u8; 18];
    tga_rle[2] = 11; tga_rle[12] = 4; tga_rle[14] = 2; tga_rle[16] = 8;
    tga_rle.extend_from_slice(&[0x83, 0x40, 0x03, 1, 2, 3, 4]);
    fs::write(format!("{dir}/tga_rle_gray.tga"), tga_rle).unwrap();

    // TIFF 1x1 RGB, little-endian, PackBits strip
    let mut tiff = b"II\x2a\x00\x0c\x00\x00\x00".to_vec();
    tiff.extend_from_slice(&[0x02, 10, 20, 30]); // strip at 8
    let entries: [(u16, u16, u32); 7] = [
        (256, 4, 1),
        (257, 4, 1),
        (258, 3, 8),
        (259, 3, 32773),
        (273, 4, 8),
        (277, 3, 3),
        (279, 4, 4),
    ];
    tiff.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, ty, value) in entries {
        tiff.extend_from_slice(&tag.to_le_bytes());
        tiff.extend_from_slice(&ty.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
        if ty == 3 {
            tiff.extend_from_slice(&(value as u16).to_le_bytes());
            tiff.extend_from_slice(&[0, 0]);
        } else {
            tiff.extend_from_slice(&value.to_le_bytes());
        }
    }
    tiff.extend_from_slice(&[0; 4]);
    fs::write(format!("{dir}/tiff_1x1_packbits.tif"), tiff).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/pcx_sig_only.bin"), b"\x0a\x05\x01\x08").unwrap();
    fs::write(format!("{dir}/tiff_mm_short.bin"), b"MM\x00\x2a\x00\x00").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();

    println!("Generated seed corpus in {dir}/");
}
