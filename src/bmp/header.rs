//! File header and info header parsing.
//!
//! Five info header sizes are recognized. The 12-byte OS/2 v1 header has
//! 16-bit unsigned dimensions and no compression field. The 40, 64, 108
//! and 124 byte headers share the Windows v2 (BITMAPINFOHEADER) prefix:
//! 32-bit signed dimensions where a negative height means the rows are
//! stored top-down, followed by compression, image size, resolution and
//! color count. Channel masks for BITFIELDS compression sit at header
//! offset 40 when the header is long enough to hold them; for a bare
//! 40-byte header they follow it in the stream instead.

use super::cursor::{ByteCursor, Region};
use crate::error::BitmapError;

/// Size of the "BM" file header that precedes the info header.
pub(crate) const FILE_HEADER_SIZE: usize = 14;

/// Largest pixel count any header may claim.
pub(crate) const MAX_PIXELS: u64 = 1 << 31;

/// Pixel data compression declared by a Windows info header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    Raw,
    Rle8,
    Rle4,
    BitFields,
    Jpeg,
    Png,
    Unknown(u32),
}

impl Compression {
    pub(crate) fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Raw,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 => Self::BitFields,
            4 => Self::Jpeg,
            5 => Self::Png,
            other => Self::Unknown(other),
        }
    }

    /// The on-disk compression code.
    pub fn code(self) -> u32 {
        match self {
            Self::Raw => 0,
            Self::Rle8 => 1,
            Self::Rle4 => 2,
            Self::BitFields => 3,
            Self::Jpeg => 4,
            Self::Png => 5,
            Self::Unknown(code) => code,
        }
    }
}

/// Order in which scanlines are stored in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowDirection {
    /// Last file row is the top image row (positive height).
    BottomUp,
    /// First file row is the top image row (negative height).
    TopDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeaderVariant {
    Os2V1,
    WindowsV2Plus,
}

impl HeaderVariant {
    fn from_size(size: u32) -> Result<Self, BitmapError> {
        match size {
            12 => Ok(Self::Os2V1),
            40 | 64 | 108 | 124 => Ok(Self::WindowsV2Plus),
            other => Err(BitmapError::UnsupportedHeader(other)),
        }
    }

    /// Bytes per color table entry: BGR for OS/2 v1, BGRX otherwise.
    fn palette_entry_size(self) -> usize {
        match self {
            Self::Os2V1 => 3,
            Self::WindowsV2Plus => 4,
        }
    }
}

/// Contents of the 14-byte file header.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FileHeader {
    pub file_size: u32,
    pub pixel_data_offset: u32,
}

/// Header-version-independent description of a bitmap.
#[derive(Clone, Debug)]
pub(crate) struct BitmapDescriptor {
    pub header_size: u32,
    pub width: u32,
    /// Magnitude of the stored height; the sign lives in `row_direction`.
    pub height: u32,
    pub row_direction: RowDirection,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: Compression,
    /// Palette entries; `1 << bits_per_pixel` when the header leaves it at zero.
    pub color_count: u32,
    /// (r, g, b, a) masks, present only for BITFIELDS compression.
    pub channel_masks: Option<[u32; 4]>,
    pub palette_entry_size: usize,
    /// Horizontal and vertical pixels per meter (Windows headers only).
    pub pixels_per_meter: Option<(u32, u32)>,
    /// Absolute offset of the scanline data, when a file header gave one.
    pub pixel_data_offset: Option<usize>,
}

impl BitmapDescriptor {
    /// Padded bytes per stored scanline: `((width * bpp + 31) / 32) * 4`.
    pub(crate) fn bytes_per_scanline(&self) -> Result<usize, BitmapError> {
        let bits = u64::from(self.width) * u64::from(self.bits_per_pixel);
        let stride = bits.div_ceil(32) * 4;
        usize::try_from(stride).map_err(|_| self.too_large())
    }

    pub(crate) fn too_large(&self) -> BitmapError {
        BitmapError::ImageTooLarge {
            width: self.width,
            height: self.height,
        }
    }
}

/// Parse the 14-byte file header at the cursor position.
pub(crate) fn parse_file_header(cursor: &mut ByteCursor<'_>) -> Result<FileHeader, BitmapError> {
    let start = cursor.position();
    if cursor.len() < start + 2 {
        return Err(BitmapError::NotABitmap);
    }
    if cursor.take(2)? != b"BM" {
        return Err(BitmapError::NotABitmap);
    }
    let file_size = cursor.read_u32_le()?;
    let _reserved = cursor.read_u32_le()?;
    let pixel_data_offset = cursor.read_u32_le()?;
    Ok(FileHeader {
        file_size,
        pixel_data_offset,
    })
}

/// Parse the info header at the cursor position.
///
/// On return the cursor sits just past the header and, for a 40-byte
/// header with BITFIELDS compression, past the four trailing masks.
pub(crate) fn parse_info_header(
    cursor: &mut ByteCursor<'_>,
) -> Result<BitmapDescriptor, BitmapError> {
    cursor.enter(Region::Header);
    let header_size = cursor.read_u32_le()?;
    let variant = HeaderVariant::from_size(header_size)?;
    let body = cursor.take(header_size as usize - 4)?;
    let mut fields = ByteCursor::new(body);

    let desc = match variant {
        HeaderVariant::Os2V1 => parse_os2_v1(&mut fields, header_size)?,
        HeaderVariant::WindowsV2Plus => parse_windows(&mut fields, cursor, header_size)?,
    };

    if desc.planes != 1 {
        log::warn!("BMP planes field is {}, expected 1", desc.planes);
    }
    log::trace!(
        "BMP header v{}: {}x{} {:?}, {} bpp, {:?}, {} colors, masks {:x?}",
        desc.header_size,
        desc.width,
        desc.height,
        desc.row_direction,
        desc.bits_per_pixel,
        desc.compression,
        desc.color_count,
        desc.channel_masks
    );

    if u64::from(desc.width) * u64::from(desc.height) > MAX_PIXELS {
        return Err(desc.too_large());
    }
    Ok(desc)
}

fn default_color_count(bits: u16) -> u32 {
    1u32.checked_shl(u32::from(bits)).unwrap_or(u32::MAX)
}

fn parse_os2_v1(
    fields: &mut ByteCursor<'_>,
    header_size: u32,
) -> Result<BitmapDescriptor, BitmapError> {
    let width = fields.read_u16_le()?;
    let height = fields.read_u16_le()?;
    let planes = fields.read_u16_le()?;
    let bits_per_pixel = fields.read_u16_le()?;
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        });
    }
    Ok(BitmapDescriptor {
        header_size,
        width: u32::from(width),
        height: u32::from(height),
        row_direction: RowDirection::BottomUp,
        planes,
        bits_per_pixel,
        compression: Compression::Raw,
        color_count: default_color_count(bits_per_pixel),
        channel_masks: None,
        palette_entry_size: HeaderVariant::Os2V1.palette_entry_size(),
        pixels_per_meter: None,
        pixel_data_offset: None,
    })
}

fn parse_windows(
    fields: &mut ByteCursor<'_>,
    stream: &mut ByteCursor<'_>,
    header_size: u32,
) -> Result<BitmapDescriptor, BitmapError> {
    let raw_width = fields.read_i32_le()?;
    let raw_height = fields.read_i32_le()?;
    let planes = fields.read_u16_le()?;
    let bits_per_pixel = fields.read_u16_le()?;
    let compression = Compression::from_code(fields.read_u32_le()?);
    let _image_data_size = fields.read_u32_le()?;
    let x_ppm = fields.read_u32_le()?;
    let y_ppm = fields.read_u32_le()?;
    let colors_used = fields.read_u32_le()?;
    let _colors_important = fields.read_u32_le()?;

    if raw_width <= 0 || raw_height == 0 {
        return Err(BitmapError::InvalidDimensions {
            width: i64::from(raw_width),
            height: i64::from(raw_height),
        });
    }
    let row_direction = if raw_height < 0 {
        RowDirection::TopDown
    } else {
        RowDirection::BottomUp
    };

    let channel_masks = if compression == Compression::BitFields {
        // Headers of 52 bytes or more embed the masks right after the
        // fixed fields; a 40-byte header is followed by them in the stream.
        if header_size >= 52 {
            Some(read_masks(fields)?)
        } else {
            Some(read_masks(stream)?)
        }
    } else {
        None
    };

    let color_count = if colors_used == 0 {
        default_color_count(bits_per_pixel)
    } else {
        colors_used
    };

    Ok(BitmapDescriptor {
        header_size,
        width: raw_width.unsigned_abs(),
        height: raw_height.unsigned_abs(),
        row_direction,
        planes,
        bits_per_pixel,
        compression,
        color_count,
        channel_masks,
        palette_entry_size: HeaderVariant::WindowsV2Plus.palette_entry_size(),
        pixels_per_meter: Some((x_ppm, y_ppm)),
        pixel_data_offset: None,
    })
}

fn read_masks(source: &mut ByteCursor<'_>) -> Result<[u32; 4], BitmapError> {
    Ok([
        source.read_u32_le()?,
        source.read_u32_le()?,
        source.read_u32_le()?,
        source.read_u32_le()?,
    ])
}
