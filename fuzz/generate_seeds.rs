#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn info_header(width: i32, height: i32, bpp: u16, compression: u32, colors: u32) -> Vec<u8> {
    let mut h = Vec::new();
    h.extend_from_slice(&40u32.to_le_bytes());
    h.extend_from_slice(&width.to_le_bytes());
    h.extend_from_slice(&height.to_le_bytes());
    h.extend_from_slice(&1u16.to_le_bytes());
    h.extend_from_slice(&bpp.to_le_bytes());
    h.extend_from_slice(&compression.to_le_bytes());
    h.extend_from_slice(&[0; 12]); // image size, resolution
    h.extend_from_slice(&colors.to_le_bytes());
    h.extend_from_slice(&0u32.to_le_bytes());
    h
}

fn bmp_file(dib: &[u8], pixel_offset: usize) -> Vec<u8> {
    let mut f = b"BM".to_vec();
    f.extend_from_slice(&((14 + dib.len()) as u32).to_le_bytes());
    f.extend_from_slice(&0u32.to_le_bytes());
    f.extend_from_slice(&((14 + pixel_offset) as u32).to_le_bytes());
    f.extend_from_slice(dib);
    f
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit
    let mut dib = info_header(1, 1, 24, 0, 0);
    dib.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
    fs::write(format!("{dir}/rgb24_1x1.bmp"), bmp_file(&dib, 40)).unwrap();

    // 2x2 1-bit, black/white table, top-down
    let mut dib = info_header(2, -2, 1, 0, 2);
    dib.extend_from_slice(&[0, 0, 0, 0, 255, 255, 255, 0]);
    dib.extend_from_slice(&[0x80, 0, 0, 0, 0x40, 0, 0, 0]);
    fs::write(format!("{dir}/pal1_2x2.bmp"), bmp_file(&dib, 48)).unwrap();

    // 2x1 16-bit BITFIELDS 565 with trailing masks
    let mut dib = info_header(2, 1, 16, 3, 0);
    for mask in [0xF800u32, 0x07E0, 0x001F, 0] {
        dib.extend_from_slice(&mask.to_le_bytes());
    }
    dib.extend_from_slice(&[0x00, 0xF8, 0x1F, 0x00]);
    fs::write(format!("{dir}/bf565_2x1.bmp"), bmp_file(&dib, 56)).unwrap();

    // Bare DIB, 32-bit
    let mut dib = info_header(1, 1, 32, 0, 0);
    dib.extend_from_slice(&[10, 20, 30, 40]);
    fs::write(format!("{dir}/dib32_1x1.bin"), &dib).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/rle8.bmp"), bmp_file(&info_header(4, 4, 8, 1, 0), 40)).unwrap();

    println!("Generated seed corpus in {dir}/");
}
