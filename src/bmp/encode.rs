//! BMP encoder: 14-byte file header, 40-byte info header, optional BGRX
//! color table, bottom-up padded scanlines.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use super::cursor::PutLe;
use super::header::FILE_HEADER_SIZE;
use super::palette::Palette;
use super::utils::pack_bits;
use crate::error::BitmapError;
use crate::pixel::ColorMode;

const INFO_HEADER_SIZE: u32 = 40;

/// 1 meter == 39.3701 inches.
pub(crate) const INCHES_PER_METER: f64 = 39.3701;

/// How one source row becomes stored scanline bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowPacker {
    /// 0x00 or 0xFF bytes to MSB-first bits.
    Bits,
    /// Already in stored order.
    Verbatim,
    /// RGB to BGR.
    SwapRgb,
    /// RGBA to BGRA.
    SwapRgba,
}

/// Stored depth, color table length and row packer for a writable mode.
#[derive(Clone, Copy, Debug)]
struct SaveFormat {
    bits: u16,
    colors: usize,
    packer: RowPacker,
}

fn save_format(mode: ColorMode) -> Result<SaveFormat, BitmapError> {
    let (bits, colors, packer) = match mode {
        ColorMode::Bilevel => (1, 2, RowPacker::Bits),
        ColorMode::Gray8 | ColorMode::Indexed8 => (8, 256, RowPacker::Verbatim),
        ColorMode::Rgb8 => (24, 0, RowPacker::SwapRgb),
        ColorMode::Bgr8 => (24, 0, RowPacker::Verbatim),
        ColorMode::Rgba8 => (32, 0, RowPacker::SwapRgba),
        ColorMode::Bgra8 => (32, 0, RowPacker::Verbatim),
        other => return Err(BitmapError::UnsupportedImageMode(other)),
    };
    Ok(SaveFormat {
        bits,
        colors,
        packer,
    })
}

/// Pixels per meter for a DPI value, rounded to nearest.
pub(crate) fn dpi_to_ppm(dpi: f64) -> u32 {
    if dpi.is_nan() || dpi <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX.
    (dpi * INCHES_PER_METER + 0.5) as u32
}

/// Encode a top-to-bottom pixel buffer as a BMP file. `ppm` is written
/// verbatim as the header resolution.
pub(crate) fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    mode: ColorMode,
    palette: Option<&Palette>,
    ppm: (u32, u32),
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    let SaveFormat {
        bits,
        colors,
        packer,
    } = save_format(mode)?;
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(BitmapError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        });
    }
    let too_large = BitmapError::ImageTooLarge { width, height };

    let w = width as usize;
    let h = height as usize;
    let src_row = w
        .checked_mul(mode.bytes_per_pixel())
        .ok_or(BitmapError::ImageTooLarge { width, height })?;
    let expected = src_row
        .checked_mul(h)
        .ok_or(BitmapError::ImageTooLarge { width, height })?;
    if pixels.len() < expected {
        return Err(BitmapError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }

    let table = match mode {
        ColorMode::Bilevel | ColorMode::Gray8 => Some(Palette::gray_ramp(colors)),
        ColorMode::Indexed8 => match palette {
            Some(p) if !p.is_empty() && p.len() <= colors => Some(p.clone()),
            Some(p) => return Err(BitmapError::InvalidPaletteSize(p.len() as u32)),
            None => return Err(BitmapError::InvalidPaletteSize(0)),
        },
        _ => None,
    };

    let stride = (u64::from(width) * u64::from(bits)).div_ceil(32) * 4;
    let image_size = stride * u64::from(height);
    let offset = FILE_HEADER_SIZE as u64 + u64::from(INFO_HEADER_SIZE) + colors as u64 * 4;
    let file_size = offset + image_size;
    if file_size > u64::from(u32::MAX) {
        return Err(too_large);
    }
    let stride = stride as usize;

    stop.check()?;

    let mut out = Vec::with_capacity(file_size as usize);

    // File header
    out.extend_from_slice(b"BM");
    out.put_u32_le(file_size as u32);
    out.put_u32_le(0); // reserved
    out.put_u32_le(offset as u32);

    // BITMAPINFOHEADER
    out.put_u32_le(INFO_HEADER_SIZE);
    out.put_i32_le(width as i32);
    out.put_i32_le(height as i32); // positive = bottom-up
    out.put_u16_le(1); // planes
    out.put_u16_le(bits);
    out.put_u32_le(0); // compression: raw
    out.put_u32_le(image_size as u32);
    out.put_u32_le(ppm.0);
    out.put_u32_le(ppm.1);
    out.put_u32_le(colors as u32); // colors used
    out.put_u32_le(colors as u32); // colors important

    if let Some(table) = &table {
        table.write_bgrx(&mut out, colors);
    }

    let mut row_buf = vec![0u8; stride];
    for (n, row) in pixels[..expected].chunks_exact(src_row).rev().enumerate() {
        if n % 16 == 0 {
            stop.check()?;
        }
        pack_row(packer, row, &mut row_buf);
        out.extend_from_slice(&row_buf);
    }

    log::trace!(
        "BMP encode: {width}x{height} {mode:?} as {bits} bpp, stride {stride}, {} bytes",
        out.len()
    );
    Ok(out)
}

/// Fill one stored scanline; bytes past the pixel data stay zero.
fn pack_row(packer: RowPacker, src: &[u8], dst: &mut [u8]) {
    match packer {
        RowPacker::Bits => {
            let used = src.len().div_ceil(8);
            pack_bits(src, &mut dst[..used]);
        }
        RowPacker::Verbatim => {
            dst[..src.len()].copy_from_slice(src);
        }
        RowPacker::SwapRgb => {
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
                d.copy_from_slice(&[s[2], s[1], s[0]]);
            }
        }
        RowPacker::SwapRgba => {
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
                d.copy_from_slice(&[s[2], s[1], s[0], s[3]]);
            }
        }
    }
}
