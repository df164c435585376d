//! # zenbmp
//!
//! Windows and OS/2 bitmap (BMP/DIB) decoder and encoder.
//!
//! ## Supported Formats
//!
//! ### Decode
//! - Info headers of 12 (OS/2 v1), 40, 64, 108 and 124 bytes
//! - 1, 4 and 8 bpp paletted images; palettes that are a plain
//!   black/white pair or a gray ramp decode as bilevel or grayscale
//! - 16 bpp (5-5-5 and 5-6-5), 24 bpp and 32 bpp direct color
//! - BITFIELDS masks for the common channel layouts
//! - Bottom-up and top-down row order
//! - Bare DIB streams, including DIBs embedded at an offset
//!
//! ### Encode
//! - Bilevel (1 bpp), grayscale and indexed (8 bpp), RGB (24 bpp) and
//!   RGBA (32 bpp), always uncompressed and bottom-up
//!
//! ## Non-Goals
//!
//! - RLE, JPEG and PNG payloads are detected and rejected
//! - Color management, resizing, or conversion beyond what the format needs
//!
//! ## Credits
//!
//! Index unpacking and channel widening draw from
//! [zune-bmp](https://github.com/etemesi254/zune-image) by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib licensed).
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::{ColorMode, DecodeRequest, EncodeRequest, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {} bpp", info.width, info.height, info.bits_per_pixel);
//!
//! // Decode
//! let decoded = DecodeRequest::bmp(data).decode(Unstoppable)?;
//!
//! // Encode back, keeping mode, palette and resolution
//! let encoded = EncodeRequest::new().encode_image(&decoded, Unstoppable)?;
//! # Ok::<(), zenbmp::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod decode;
mod encode;
mod error;
mod info;
mod limits;
mod pixel;

use alloc::vec::Vec;

// Re-exports
pub use bmp::{Compression, Palette, PaletteEntry, RowDirection};
pub use decode::{DecodeRequest, DecodedImage};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::BitmapError;
pub use info::ImageInfo;
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::ColorMode;

/// Decode a BMP file ("BM" header first).
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<DecodedImage, BitmapError> {
    DecodeRequest::bmp(data).decode(stop)
}

/// Decode a bare DIB (info header at offset 0, no file header).
pub fn decode_dib(data: &[u8], stop: impl Stop) -> Result<DecodedImage, BitmapError> {
    DecodeRequest::dib(data).decode(stop)
}

/// Encode a top-to-bottom pixel buffer at 96 DPI.
///
/// `Indexed8` needs a palette; use [`encode_bmp_indexed`] for that.
pub fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    mode: ColorMode,
    stop: impl Stop,
) -> Result<Vec<u8>, BitmapError> {
    EncodeRequest::new().encode(pixels, width, height, mode, stop)
}

/// Encode one palette index per pixel with the given color table.
pub fn encode_bmp_indexed(
    pixels: &[u8],
    width: u32,
    height: u32,
    palette: &Palette,
    stop: impl Stop,
) -> Result<Vec<u8>, BitmapError> {
    EncodeRequest::new()
        .with_palette(palette)
        .encode(pixels, width, height, ColorMode::Indexed8, stop)
}
