//! Resolution of (bit depth, compression, masks) into a color mode and a
//! stored scanline layout.

use super::header::Compression;
use crate::error::BitmapError;
use crate::pixel::ColorMode;

/// How one stored pixel is laid out in a scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RawLayout {
    /// 4 bytes: blue, green, red, unused.
    Bgrx,
    /// 4 bytes: blue, green, red, alpha.
    Bgra,
    /// 3 bytes: blue, green, red.
    Bgr,
    /// 16-bit little-endian word, 5-6-5 red/green/blue.
    Bgr16,
    /// 16-bit little-endian word, 5-5-5 red/green/blue.
    Bgr15,
    /// Palette indices packed MSB-first at 1, 4 or 8 bits each.
    Packed(u8),
}

impl RawLayout {
    /// Channel masks used to widen 16-bit words.
    pub(crate) fn word_masks(self) -> Option<[u32; 3]> {
        match self {
            Self::Bgr16 => Some([0xF800, 0x07E0, 0x001F]),
            Self::Bgr15 => Some([0x7C00, 0x03E0, 0x001F]),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelFormat {
    pub mode: ColorMode,
    pub raw: RawLayout,
}

struct MaskLayout {
    bits: u16,
    masks: [u32; 4],
    /// 24 and 16 bpp layouts are matched on the rgb masks alone.
    match_alpha: bool,
    format: PixelFormat,
}

const fn layout(
    bits: u16,
    masks: [u32; 4],
    match_alpha: bool,
    mode: ColorMode,
    raw: RawLayout,
) -> MaskLayout {
    MaskLayout {
        bits,
        masks,
        match_alpha,
        format: PixelFormat { mode, raw },
    }
}

static BITFIELD_LAYOUTS: &[MaskLayout] = &[
    layout(32, [0xFF0000, 0xFF00, 0xFF, 0], true, ColorMode::Rgb8, RawLayout::Bgrx),
    layout(32, [0xFF0000, 0xFF00, 0xFF, 0xFF00_0000], true, ColorMode::Rgba8, RawLayout::Bgra),
    layout(32, [0, 0, 0, 0], true, ColorMode::Rgb8, RawLayout::Bgrx),
    layout(24, [0xFF0000, 0xFF00, 0xFF, 0], false, ColorMode::Rgb8, RawLayout::Bgr),
    layout(16, [0xF800, 0x07E0, 0x1F, 0], false, ColorMode::Rgb8, RawLayout::Bgr16),
    layout(16, [0x7C00, 0x03E0, 0x1F, 0], false, ColorMode::Rgb8, RawLayout::Bgr15),
];

fn lookup_bitfields(bits: u16, masks: [u32; 4]) -> Option<PixelFormat> {
    BITFIELD_LAYOUTS
        .iter()
        .find(|l| {
            l.bits == bits
                && l.masks[..3] == masks[..3]
                && (!l.match_alpha || l.masks[3] == masks[3])
        })
        .map(|l| l.format)
}

/// Map a parsed header onto the pixel format needed to unpack its rows.
///
/// `legacy_rgba` selects the cursor-container convention where 32-bit raw
/// pixels carry alpha.
pub(crate) fn resolve(
    bits: u16,
    compression: Compression,
    masks: Option<[u32; 4]>,
    legacy_rgba: bool,
) -> Result<PixelFormat, BitmapError> {
    if !matches!(bits, 1 | 4 | 8 | 16 | 24 | 32) {
        return Err(BitmapError::UnsupportedPixelDepth(bits));
    }
    let format = match compression {
        Compression::Raw => match bits {
            32 if legacy_rgba => PixelFormat {
                mode: ColorMode::Rgba8,
                raw: RawLayout::Bgra,
            },
            32 => PixelFormat {
                mode: ColorMode::Rgb8,
                raw: RawLayout::Bgrx,
            },
            24 => PixelFormat {
                mode: ColorMode::Rgb8,
                raw: RawLayout::Bgr,
            },
            16 => PixelFormat {
                mode: ColorMode::Rgb8,
                raw: RawLayout::Bgr15,
            },
            _ => PixelFormat {
                mode: ColorMode::Indexed8,
                raw: RawLayout::Packed(bits as u8),
            },
        },
        Compression::BitFields => {
            let masks = masks.unwrap_or_default();
            lookup_bitfields(bits, masks)
                .ok_or(BitmapError::UnsupportedBitfieldLayout { bits, masks })?
        }
        other => return Err(BitmapError::UnsupportedCompression(other.code())),
    };
    log::trace!("BMP pixel format: {bits} bpp {compression:?} -> {format:?}");
    Ok(format)
}
