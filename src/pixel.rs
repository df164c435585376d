/// In-memory color model of a pixel buffer.
///
/// Decoding only ever produces `Bilevel`, `Gray8`, `Indexed8`, `Rgb8` and
/// `Rgba8`. The remaining variants describe host buffers handed to the
/// encoder.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// One byte per pixel, either 0x00 (black) or 0xFF (white).
    Bilevel,
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// One byte per pixel holding a palette index.
    Indexed8,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
    /// 3 channels, 8-bit BGR (BMP native order).
    Bgr8,
    /// 4 channels, 8-bit BGRA (BMP native order).
    Bgra8,
    /// Single channel, 16-bit grayscale (native endian). Not writable as BMP.
    Gray16,
    /// 4 channels, 16-bit RGBA (native endian). Not writable as BMP.
    Rgba16,
}

impl ColorMode {
    /// Bytes per pixel for this mode.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Bilevel | Self::Gray8 | Self::Indexed8 => 1,
            Self::Gray16 => 2,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Rgba16 => 8,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Bilevel | Self::Gray8 | Self::Indexed8 | Self::Gray16 => 1,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 | Self::Rgba16 => 4,
        }
    }

    /// Whether pixel values are palette indices rather than color samples.
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed8)
    }

    /// Whether this mode has the same memory representation as `other`.
    ///
    /// A bilevel buffer is a gray buffer restricted to 0x00 and 0xFF.
    pub fn is_memory_compatible(&self, other: ColorMode) -> bool {
        if *self == other {
            return true;
        }
        matches!(
            (*self, other),
            (Self::Bilevel, Self::Gray8) | (Self::Gray8, Self::Bilevel)
        )
    }
}

/// Pixel types that decoded buffers can be viewed as.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    /// The color mode whose buffer layout matches this pixel type.
    fn mode() -> ColorMode;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Rgb<u8> {
    fn mode() -> ColorMode {
        ColorMode::Rgb8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Rgba<u8> {
    fn mode() -> ColorMode {
        ColorMode::Rgba8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Gray<u8> {
    fn mode() -> ColorMode {
        ColorMode::Gray8
    }
}
