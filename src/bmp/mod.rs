//! BMP/DIB codec core (internal).
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp`], etc.

mod cursor;
mod encode;
mod format;
mod header;
mod palette;
mod scanline;
mod utils;

pub use header::{Compression, RowDirection};
pub use palette::{Palette, PaletteEntry};

pub(crate) use encode::{dpi_to_ppm, encode_bmp};

use enough::Stop;

use crate::decode::DecodedImage;
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::ColorMode;
use cursor::{ByteCursor, Region};
use format::PixelFormat;
use header::{BitmapDescriptor, FILE_HEADER_SIZE};
use palette::PaletteOutcome;
use scanline::RowGeometry;

/// Where the info header lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Container {
    /// "BM" file header first; its pixel offset is authoritative.
    File,
    /// Bare DIB starting at `header_offset`; pixels follow the color table.
    Dib { header_offset: usize },
}

impl Container {
    /// 32-bit raw pixels of a DIB at offset 22 (cursor files) carry alpha.
    fn legacy_rgba(self) -> bool {
        matches!(self, Self::Dib { header_offset: 22 })
    }
}

/// Headers parsed and pixel format resolved; nothing past the masks read.
pub(crate) struct Parsed<'a> {
    pub desc: BitmapDescriptor,
    pub format: PixelFormat,
    cursor: ByteCursor<'a>,
}

pub(crate) fn parse(data: &[u8], container: Container) -> Result<Parsed<'_>, BitmapError> {
    let mut cursor = ByteCursor::new(data);
    let mut desc = match container {
        Container::File => {
            let file = header::parse_file_header(&mut cursor)?;
            log::trace!(
                "BMP file header: {} bytes, pixels at {}",
                file.file_size,
                file.pixel_data_offset
            );
            let mut desc = header::parse_info_header(&mut cursor)?;
            desc.pixel_data_offset = Some(file.pixel_data_offset as usize);
            desc
        }
        Container::Dib { header_offset } => {
            cursor.set_position(header_offset)?;
            header::parse_info_header(&mut cursor)?
        }
    };

    let format = format::resolve(
        desc.bits_per_pixel,
        desc.compression,
        desc.channel_masks,
        container.legacy_rgba() && desc.bits_per_pixel == 32,
    )?;

    if format.mode == ColorMode::Indexed8 {
        let addressable = 1u32 << desc.bits_per_pixel;
        if desc.color_count > addressable {
            log::warn!(
                "BMP declares {} colors but {} bpp addresses only {addressable}",
                desc.color_count,
                desc.bits_per_pixel
            );
        }
    } else {
        // Direct-color images carry no color table worth reading.
        desc.color_count = 0;
    }

    Ok(Parsed {
        desc,
        format,
        cursor,
    })
}

/// Advisory DPI from pixels per meter: `ceil(ppm / 39.3701)` per axis.
pub(crate) fn ppm_to_dpi(ppm: u32) -> u32 {
    // 39.3701 == 393701 / 10000, kept in integers for exact ceiling.
    (u64::from(ppm) * 10_000).div_ceil(393_701) as u32
}

/// Per-axis DPI, when the header has a nonzero resolution.
pub(crate) fn header_dpi(desc: &BitmapDescriptor) -> Option<(u32, u32)> {
    desc.pixels_per_meter
        .filter(|&(x, y)| x != 0 && y != 0)
        .map(|(x, y)| (ppm_to_dpi(x), ppm_to_dpi(y)))
}

/// Decode a whole image into a top-to-bottom pixel buffer.
pub(crate) fn decode(
    data: &[u8],
    container: Container,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodedImage, BitmapError> {
    let Parsed {
        desc,
        format,
        mut cursor,
    } = parse(data, container)?;

    if let Some(limits) = limits {
        limits.check_image(desc.width, desc.height, format.mode.bytes_per_pixel())?;
    }
    stop.check()?;

    let outcome = if format.mode == ColorMode::Indexed8 {
        let table =
            palette::read_palette(&mut cursor, desc.color_count, desc.palette_entry_size)?;
        let outcome = palette::classify_palette(table);
        log::debug!(
            "BMP palette of {} entries: {}",
            desc.color_count,
            match &outcome {
                PaletteOutcome::Bilevel => "bilevel",
                PaletteOutcome::Greyscale => "greyscale",
                PaletteOutcome::Indexed(_) => "indexed",
            }
        );
        Some(outcome)
    } else {
        None
    };

    let after_headers = cursor.position();
    if let Some(offset) = desc.pixel_data_offset {
        let header_end = FILE_HEADER_SIZE + desc.header_size as usize;
        if offset < header_end {
            log::warn!("BMP pixel offset {offset} points inside the headers (end {header_end})");
        }
        cursor.set_position(offset).map_err(|_| BitmapError::TruncatedData)?;
    } else {
        log::trace!("DIB pixel data at {after_headers}");
    }

    let geom = RowGeometry {
        width: desc.width as usize,
        height: desc.height as usize,
        stride: desc.bytes_per_scanline()?,
        direction: desc.row_direction,
    };
    cursor.enter(Region::Data);
    let stored = geom.stored_len().ok_or_else(|| desc.too_large())?;
    let rows = cursor.take(stored)?;
    let mut pixels = scanline::decode_rows(rows, geom, format.raw, stop)?;

    let (mode, palette) = match outcome {
        None => (format.mode, None),
        Some(PaletteOutcome::Greyscale) => (ColorMode::Gray8, None),
        Some(PaletteOutcome::Bilevel) => {
            expand_bilevel(&mut pixels);
            (ColorMode::Bilevel, None)
        }
        Some(PaletteOutcome::Indexed(table)) => (ColorMode::Indexed8, Some(table)),
    };

    let dpi = header_dpi(&desc);

    Ok(DecodedImage::new(
        pixels,
        desc.width,
        desc.height,
        mode,
        palette,
        dpi,
        desc.pixels_per_meter,
        desc.compression,
    ))
}

/// Index 0 is black; every other index is white.
fn expand_bilevel(pixels: &mut [u8]) {
    for p in pixels {
        *p = if *p == 0 { 0x00 } else { 0xFF };
    }
}
