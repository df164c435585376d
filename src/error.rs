use alloc::string::String;
use enough::StopReason;

use crate::pixel::ColorMode;

/// Errors from BMP/DIB decoding and encoding.
///
/// Every error aborts the current call; no partial image is returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("not a BMP file (missing \"BM\" magic)")]
    NotABitmap,

    #[error("unsupported BMP header size: {0}")]
    UnsupportedHeader(u32),

    #[error("BMP header is truncated")]
    TruncatedHeader,

    #[error("BMP pixel data is truncated")]
    TruncatedData,

    #[error("unsupported BMP pixel depth: {0}")]
    UnsupportedPixelDepth(u16),

    #[error("unsupported BMP compression: {0}")]
    UnsupportedCompression(u32),

    #[error("unsupported BMP bitfields layout: {bits} bpp with masks {masks:08x?}")]
    UnsupportedBitfieldLayout { bits: u16, masks: [u32; 4] },

    #[error("invalid BMP palette size: {0}")]
    InvalidPaletteSize(u32),

    #[error("BMP image too large: {width}x{height}")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("invalid BMP dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("cannot write color mode {0:?} as BMP")]
    UnsupportedImageMode(ColorMode),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("color mode mismatch: expected {expected:?}, got {actual:?}")]
    ModeMismatch {
        expected: ColorMode,
        actual: ColorMode,
    },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[cfg(feature = "std")]
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitmapError {
    fn from(r: StopReason) -> Self {
        BitmapError::Cancelled(r)
    }
}
