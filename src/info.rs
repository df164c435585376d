//! Header-only probing.

use crate::bmp::{self, Compression, Container, RowDirection};
use crate::error::BitmapError;
use crate::pixel::ColorMode;

/// What the headers of a BMP declare, read without touching pixel data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    pub compression: Compression,
    pub row_direction: RowDirection,
    /// Color mode before palette inspection: paletted depths report
    /// `Indexed8` even when decoding would collapse them to gray or bilevel.
    pub mode: ColorMode,
    /// Color table entries (0 for direct-color images).
    pub colors: u32,
    /// Advisory resolution, when the header recorded one.
    pub dpi: Option<(u32, u32)>,
}

impl ImageInfo {
    /// Probe a "BM" file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        Self::probe(data, Container::File)
    }

    /// Probe a bare DIB whose info header starts at offset 0.
    pub fn from_dib_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        Self::probe(data, Container::Dib { header_offset: 0 })
    }

    fn probe(data: &[u8], container: Container) -> Result<Self, BitmapError> {
        let parsed = bmp::parse(data, container)?;
        let desc = &parsed.desc;
        Ok(Self {
            width: desc.width,
            height: desc.height,
            bits_per_pixel: desc.bits_per_pixel,
            compression: desc.compression,
            row_direction: desc.row_direction,
            mode: parsed.format.mode,
            colors: desc.color_count,
            dpi: bmp::header_dpi(desc),
        })
    }
}
