use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use enough::Stop;

use crate::bmp::{self, Compression, Container, Palette};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::ColorMode;

/// Decode request builder.
///
/// ```no_run
/// use zenbmp::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // BMP bytes
/// let limits = Limits::none().with_max_pixels(64 << 20);
/// let image = DecodeRequest::bmp(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// # Ok::<(), zenbmp::BitmapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    container: Container,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    /// A file starting with the 14-byte "BM" header.
    pub fn bmp(data: &'a [u8]) -> Self {
        Self {
            data,
            container: Container::File,
            limits: None,
        }
    }

    /// A bare device-independent bitmap: info header at offset 0, pixel
    /// data directly after the masks and color table.
    pub fn dib(data: &'a [u8]) -> Self {
        Self {
            data,
            container: Container::Dib { header_offset: 0 },
            limits: None,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Position of the info header inside `data`, for DIBs embedded in
    /// another container. Ignored for "BM" files.
    ///
    /// 32-bit uncompressed pixels found at offset 22 are decoded with
    /// alpha, matching how cursor files store them.
    pub fn with_header_offset(mut self, offset: usize) -> Self {
        if let Container::Dib { header_offset } = &mut self.container {
            *header_offset = offset;
        }
        self
    }

    /// Decode the whole image.
    pub fn decode(self, stop: impl Stop) -> Result<DecodedImage, BitmapError> {
        bmp::decode(self.data, self.container, self.limits, &stop)
    }
}

/// A fully decoded image. Rows are stored top to bottom without padding.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pixels: Vec<u8>,
    palette: Option<Palette>,
    pub width: u32,
    pub height: u32,
    /// `Bilevel`, `Gray8`, `Indexed8`, `Rgb8` or `Rgba8`.
    pub mode: ColorMode,
    /// Advisory resolution, when the header recorded one.
    pub dpi: Option<(u32, u32)>,
    /// Header resolution as stored, so re-encoding writes it back unchanged.
    ppm: Option<(u32, u32)>,
    /// Compression declared by the header (`Raw` or `BitFields`).
    pub compression: Compression,
}

impl DecodedImage {
    pub(crate) fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        mode: ColorMode,
        palette: Option<Palette>,
        dpi: Option<(u32, u32)>,
        ppm: Option<(u32, u32)>,
        compression: Compression,
    ) -> Self {
        Self {
            pixels,
            palette,
            width,
            height,
            mode,
            dpi,
            ppm,
            compression,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The color table, present only for `Indexed8` images.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Pixels per meter exactly as the header stored them. `None` for OS/2
    /// headers, which carry no resolution.
    pub(crate) fn pixels_per_meter(&self) -> Option<(u32, u32)> {
        self.ppm
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`BitmapError::ModeMismatch`] if the color mode doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if !self.mode.is_memory_compatible(P::mode()) {
            return Err(BitmapError::ModeMismatch {
                expected: P::mode(),
                actual: self.mode,
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// Returns [`BitmapError::ModeMismatch`] if the color mode doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, BitmapError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}
