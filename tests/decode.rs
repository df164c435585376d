//! Decoding hand-built BMP and DIB streams.

use enough::Unstoppable;
use zenbmp::*;

fn info_header(size: u32, width: i32, height: i32, bpp: u16, compression: u32, colors: u32) -> Vec<u8> {
    let mut h = Vec::with_capacity(size as usize);
    h.extend_from_slice(&size.to_le_bytes());
    h.extend_from_slice(&width.to_le_bytes());
    h.extend_from_slice(&height.to_le_bytes());
    h.extend_from_slice(&1u16.to_le_bytes()); // planes
    h.extend_from_slice(&bpp.to_le_bytes());
    h.extend_from_slice(&compression.to_le_bytes());
    h.extend_from_slice(&0u32.to_le_bytes()); // image size
    h.extend_from_slice(&3780u32.to_le_bytes());
    h.extend_from_slice(&3780u32.to_le_bytes());
    h.extend_from_slice(&colors.to_le_bytes());
    h.extend_from_slice(&0u32.to_le_bytes()); // important colors
    h.resize(size as usize, 0);
    h
}

fn os2_header(width: u16, height: u16, bpp: u16) -> Vec<u8> {
    let mut h = Vec::new();
    h.extend_from_slice(&12u32.to_le_bytes());
    h.extend_from_slice(&width.to_le_bytes());
    h.extend_from_slice(&height.to_le_bytes());
    h.extend_from_slice(&1u16.to_le_bytes());
    h.extend_from_slice(&bpp.to_le_bytes());
    h
}

/// "BM" file with the pixel offset pointing right after `table`.
fn bmp_file(info: &[u8], table: &[u8], rows: &[u8]) -> Vec<u8> {
    let offset = 14 + info.len() + table.len();
    let mut f = b"BM".to_vec();
    f.extend_from_slice(&((offset + rows.len()) as u32).to_le_bytes());
    f.extend_from_slice(&0u32.to_le_bytes());
    f.extend_from_slice(&(offset as u32).to_le_bytes());
    f.extend_from_slice(info);
    f.extend_from_slice(table);
    f.extend_from_slice(rows);
    f
}

fn bgrx(entries: &[(u8, u8, u8)]) -> Vec<u8> {
    entries.iter().flat_map(|&(r, g, b)| [b, g, r, 0]).collect()
}

fn masks(m: [u32; 4]) -> Vec<u8> {
    m.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn gray_table() -> Vec<u8> {
    (0..=255u8).flat_map(|i| [i, i, i, 0]).collect()
}

// 2x2, 24 bpp. Image rows: (red, green) over (blue, white).
const RGB_2X2: [u8; 12] = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
const ROW_RED_GREEN: [u8; 8] = [0, 0, 255, 0, 255, 0, 0, 0];
const ROW_BLUE_WHITE: [u8; 8] = [255, 0, 0, 255, 255, 255, 0, 0];

#[test]
fn bottom_up_24bpp() {
    let rows = [ROW_BLUE_WHITE, ROW_RED_GREEN].concat();
    let file = bmp_file(&info_header(40, 2, 2, 24, 0, 0), &[], &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
    assert_eq!(img.mode, ColorMode::Rgb8);
    assert_eq!(img.pixels(), &RGB_2X2);
}

#[test]
fn negative_height_is_top_down() {
    let rows = [ROW_RED_GREEN, ROW_BLUE_WHITE].concat();
    let file = bmp_file(&info_header(40, 2, -2, 24, 0, 0), &[], &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.height, 2);
    assert_eq!(img.pixels(), &RGB_2X2);

    let info = ImageInfo::from_bytes(&file).unwrap();
    assert_eq!(info.row_direction, RowDirection::TopDown);
}

#[test]
fn reencoding_reproduces_24bpp_pixels() {
    let rows = [ROW_BLUE_WHITE, ROW_RED_GREEN].concat();
    let file = bmp_file(&info_header(124, 2, 2, 24, 0, 0), &[], &rows);
    let first = decode_bmp(&file, Unstoppable).unwrap();
    let encoded = EncodeRequest::new().encode_image(&first, Unstoppable).unwrap();
    let second = decode_bmp(&encoded, Unstoppable).unwrap();
    assert_eq!(second.mode, first.mode);
    assert_eq!(second.pixels(), first.pixels());
    // Same scanline bytes after the 40-byte header.
    assert_eq!(&encoded[54..], &rows[..]);
}

#[test]
fn width_five_rows_skip_padding() {
    // ((5 * 24 + 31) / 32) * 4 = 20 bytes per row: 15 data, 5 pad.
    let mut rows = Vec::new();
    let mut expected = Vec::new();
    for y in 0..2u8 {
        for x in 0..5u8 {
            rows.extend_from_slice(&[x, y, 10 + x]);
            expected.extend_from_slice(&[10 + x, y, x]);
        }
        rows.extend_from_slice(&[0xEE; 5]);
    }
    let file = bmp_file(&info_header(40, 5, -2, 24, 0, 0), &[], &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.pixels(), &expected[..]);
}

#[test]
fn gray_ramp_palette_collapses_to_gray8() {
    let rows = [10u8, 20, 30, 0, 40, 50, 60, 0];
    let file = bmp_file(&info_header(40, 3, 2, 8, 0, 256), &gray_table(), &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Gray8);
    assert!(img.palette().is_none());
    assert_eq!(img.pixels(), &[40, 50, 60, 10, 20, 30]);
}

#[test]
fn black_white_palette_collapses_to_bilevel() {
    let table = bgrx(&[(0, 0, 0), (255, 255, 255)]);
    let rows = [0b1010_0000u8, 0b1100_0000, 0, 0];
    let file = bmp_file(&info_header(40, 10, 1, 1, 0, 0), &table, &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Bilevel);
    assert!(img.palette().is_none());
    assert_eq!(img.pixels(), &[255, 0, 255, 0, 0, 0, 0, 0, 255, 255]);
}

#[test]
fn black_green_palette_stays_indexed() {
    let table = bgrx(&[(0, 0, 0), (0, 255, 0)]);
    let rows = [0b1010_0000u8, 0b1100_0000, 0, 0];
    let file = bmp_file(&info_header(40, 10, 1, 1, 0, 0), &table, &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Indexed8);
    assert_eq!(img.pixels(), &[1, 0, 1, 0, 0, 0, 0, 0, 1, 1]);
    let palette = img.palette().unwrap();
    assert_eq!(
        palette.entries(),
        &[PaletteEntry::new(0, 0, 0), PaletteEntry::new(0, 255, 0)]
    );
}

#[test]
fn four_bit_indices() {
    let table = bgrx(&[
        (1, 1, 1),
        (200, 0, 0),
        (0, 200, 0),
        (0, 0, 200),
        (9, 9, 9),
        (50, 60, 70),
    ]);
    let rows = [0x21u8, 0x50, 0, 0];
    let file = bmp_file(&info_header(40, 3, 1, 4, 0, 6), &table, &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Indexed8);
    assert_eq!(img.pixels(), &[2, 1, 5]);
    assert_eq!(img.palette().unwrap().len(), 6);
    assert_eq!(img.palette().unwrap().get(5), Some(PaletteEntry::new(50, 60, 70)));
}

#[test]
fn oversized_dimensions_rejected_before_reading_pixels() {
    let file = bmp_file(&info_header(40, 65536, 65536, 24, 0, 0), &[], &[]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::ImageTooLarge {
            width: 65536,
            height: 65536
        })
    ));
}

#[test]
fn bitfields_565_after_40_byte_header() {
    let rows = [0x00u8, 0xF8, 0x1F, 0x00];
    let file = bmp_file(
        &info_header(40, 2, 1, 16, 3, 0),
        &masks([0xF800, 0x07E0, 0x001F, 0]),
        &rows,
    );
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Rgb8);
    assert_eq!(img.compression, Compression::BitFields);
    assert_eq!(img.pixels(), &[255, 0, 0, 0, 0, 255]);
}

#[test]
fn bitfields_unknown_masks_rejected() {
    let file = bmp_file(
        &info_header(40, 2, 1, 16, 3, 0),
        &masks([0x1, 0x2, 0x4, 0]),
        &[0; 4],
    );
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::UnsupportedBitfieldLayout {
            bits: 16,
            masks: [1, 2, 4, 0]
        })
    ));
}

#[test]
fn v4_header_with_alpha_mask() {
    let mut info = info_header(108, 1, 1, 32, 3, 0);
    info[40..56].copy_from_slice(&masks([0xFF0000, 0xFF00, 0xFF, 0xFF00_0000]));
    let file = bmp_file(&info, &[], &[10, 20, 30, 40]);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Rgba8);
    assert_eq!(img.pixels(), &[30, 20, 10, 40]);
}

#[test]
fn zero_masks_32bpp_decode_as_rgb() {
    let info = info_header(124, 1, 1, 32, 3, 0);
    let file = bmp_file(&info, &[], &[10, 20, 30, 40]);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Rgb8);
    assert_eq!(img.pixels(), &[30, 20, 10]);
}

#[test]
fn raw_16bpp_is_555() {
    let mut rows = Vec::new();
    rows.extend_from_slice(&0x7C00u16.to_le_bytes());
    rows.extend_from_slice(&0x03E0u16.to_le_bytes());
    let file = bmp_file(&info_header(40, 2, 1, 16, 0, 0), &[], &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.pixels(), &[255, 0, 0, 0, 255, 0]);
}

#[test]
fn short_v4_header_is_truncated() {
    let info = info_header(108, 2, 2, 24, 0, 0);
    let file = bmp_file(&info[..50], &[], &[]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::TruncatedHeader)
    ));
}

#[test]
fn unknown_header_size_rejected() {
    let file = bmp_file(&info_header(56, 2, 2, 24, 0, 0), &[], &[0; 16]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::UnsupportedHeader(56))
    ));
}

#[test]
fn missing_magic_rejected() {
    assert!(matches!(
        decode_bmp(b"GIF89a\x01\x00\x01\x00", Unstoppable),
        Err(BitmapError::NotABitmap)
    ));
    assert!(matches!(
        decode_bmp(&[], Unstoppable),
        Err(BitmapError::NotABitmap)
    ));
}

#[test]
fn compressed_payloads_rejected() {
    for (code, bpp) in [(1u32, 8u16), (2, 4), (4, 24), (5, 24), (9, 24)] {
        let file = bmp_file(&info_header(40, 2, 2, bpp, code, 0), &[], &[0; 64]);
        assert!(
            matches!(
                decode_bmp(&file, Unstoppable),
                Err(BitmapError::UnsupportedCompression(c)) if c == code
            ),
            "compression {code}"
        );
    }
}

#[test]
fn unsupported_depth_rejected() {
    let file = bmp_file(&info_header(40, 2, 2, 2, 0, 0), &[], &[0; 16]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::UnsupportedPixelDepth(2))
    ));
}

#[test]
fn oversized_palette_rejected() {
    let file = bmp_file(&info_header(40, 2, 2, 8, 0, 70_000), &[], &[0; 8]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::InvalidPaletteSize(70_000))
    ));
}

#[test]
fn short_pixel_data_is_truncated() {
    let file = bmp_file(&info_header(40, 2, 2, 24, 0, 0), &[], &[0; 10]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::TruncatedData)
    ));
    // Color table cut short.
    let file = bmp_file(&info_header(40, 2, 2, 8, 0, 0), &[0; 100], &[]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::TruncatedData)
    ));
}

#[test]
fn pixel_offset_from_file_header_is_honored() {
    let info = info_header(40, 2, 2, 24, 0, 0);
    let rows = [ROW_BLUE_WHITE, ROW_RED_GREEN].concat();
    let gap = [0xABu8; 6];
    let offset = 14 + info.len() + gap.len();
    let mut file = b"BM".to_vec();
    file.extend_from_slice(&((offset + rows.len()) as u32).to_le_bytes());
    file.extend_from_slice(&0u32.to_le_bytes());
    file.extend_from_slice(&(offset as u32).to_le_bytes());
    file.extend_from_slice(&info);
    file.extend_from_slice(&gap);
    file.extend_from_slice(&rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.pixels(), &RGB_2X2);
}

#[test]
fn bare_dib_stream() {
    let mut dib = info_header(40, 1, 2, 8, 0, 3);
    dib.extend_from_slice(&bgrx(&[(255, 0, 0), (0, 255, 0), (0, 0, 255)]));
    dib.extend_from_slice(&[2, 0, 0, 0, 0, 0, 0, 0]);
    let img = decode_dib(&dib, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Indexed8);
    assert_eq!(img.pixels(), &[0, 2]);
    assert_eq!(img.palette().unwrap().len(), 3);

    let info = ImageInfo::from_dib_bytes(&dib).unwrap();
    assert_eq!(info.colors, 3);
    assert_eq!(info.mode, ColorMode::Indexed8);
}

#[test]
fn dib_masks_precede_pixels() {
    let mut dib = info_header(40, 2, 1, 16, 3, 0);
    dib.extend_from_slice(&masks([0x7C00, 0x03E0, 0x001F, 0]));
    dib.extend_from_slice(&[0x00, 0x7C, 0x1F, 0x00]);
    let img = decode_dib(&dib, Unstoppable).unwrap();
    assert_eq!(img.pixels(), &[255, 0, 0, 0, 0, 255]);
}

#[test]
fn dib_at_offset_22_keeps_alpha() {
    let mut data = vec![0u8; 22];
    data.extend_from_slice(&info_header(40, 1, 1, 32, 0, 0));
    data.extend_from_slice(&[10, 20, 30, 40]);

    let img = DecodeRequest::dib(&data)
        .with_header_offset(22)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(img.mode, ColorMode::Rgba8);
    assert_eq!(img.pixels(), &[30, 20, 10, 40]);

    // Same header at any other position: plain BGRX.
    let img = decode_dib(&data[22..], Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Rgb8);
    assert_eq!(img.pixels(), &[30, 20, 10]);

    let mut shifted = vec![0u8];
    shifted.extend_from_slice(&data);
    let img = DecodeRequest::dib(&shifted)
        .with_header_offset(23)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(img.mode, ColorMode::Rgb8);
}

#[test]
fn header_offset_past_end_is_truncated() {
    assert!(matches!(
        DecodeRequest::dib(&[0; 8])
            .with_header_offset(64)
            .decode(Unstoppable),
        Err(BitmapError::TruncatedHeader)
    ));
}

#[test]
fn os2_v1_24bpp() {
    let rows = [1u8, 2, 3, 4, 5, 6, 0, 0];
    let file = bmp_file(&os2_header(2, 1, 24), &[], &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Rgb8);
    assert_eq!(img.pixels(), &[3, 2, 1, 6, 5, 4]);
    assert_eq!(img.dpi, None);
}

#[test]
fn os2_v1_three_byte_palette() {
    let table: Vec<u8> = (0..=255u8).flat_map(|i| [i, i, i]).collect();
    let file = bmp_file(&os2_header(2, 1, 8), &table, &[7, 200, 0, 0]);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    assert_eq!(img.mode, ColorMode::Gray8);
    assert_eq!(img.pixels(), &[7, 200]);
}

#[test]
fn dpi_from_header_resolution() {
    let rows = [ROW_BLUE_WHITE, ROW_RED_GREEN].concat();
    let file = bmp_file(&info_header(40, 2, 2, 24, 0, 0), &[], &rows);
    let img = decode_bmp(&file, Unstoppable).unwrap();
    // ceil(3780 / 39.3701)
    assert_eq!(img.dpi, Some((97, 97)));

    let mut info = info_header(40, 2, 2, 24, 0, 0);
    info[24..32].fill(0);
    let file = bmp_file(&info, &[], &rows);
    assert_eq!(decode_bmp(&file, Unstoppable).unwrap().dpi, None);
}

#[test]
fn probe_reports_pre_palette_mode() {
    let file = bmp_file(&info_header(40, 3, 2, 8, 0, 0), &gray_table(), &[0; 8]);
    let info = ImageInfo::from_bytes(&file).unwrap();
    assert_eq!((info.width, info.height), (3, 2));
    assert_eq!(info.bits_per_pixel, 8);
    assert_eq!(info.mode, ColorMode::Indexed8);
    assert_eq!(info.colors, 256);
    assert_eq!(info.compression, Compression::Raw);
    assert_eq!(info.dpi, Some((97, 97)));

    // Probing does not need the pixel data.
    assert!(ImageInfo::from_bytes(&file[..54]).is_ok());
}

#[test]
fn zero_width_rejected() {
    let file = bmp_file(&info_header(40, 0, 2, 24, 0, 0), &[], &[]);
    assert!(matches!(
        decode_bmp(&file, Unstoppable),
        Err(BitmapError::InvalidDimensions { width: 0, height: 2 })
    ));
}
