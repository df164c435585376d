use alloc::vec::Vec;

use enough::Stop;

use crate::bmp::{self, Palette};
use crate::decode::DecodedImage;
use crate::error::BitmapError;
use crate::pixel::ColorMode;

/// Resolution written when neither the caller nor the image sets one.
const DEFAULT_DPI: f64 = 96.0;

/// Encode request builder.
///
/// Output is always an uncompressed bottom-up BMP with a 40-byte info
/// header.
///
/// ```no_run
/// use zenbmp::{ColorMode, EncodeRequest, Unstoppable};
///
/// let pixels = vec![0u8; 4 * 4 * 3];
/// let bmp = EncodeRequest::new()
///     .with_dpi(300.0, 300.0)
///     .encode(&pixels, 4, 4, ColorMode::Rgb8, Unstoppable)?;
/// # Ok::<(), zenbmp::BitmapError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    dpi: Option<(f64, f64)>,
    palette: Option<&'a Palette>,
}

impl Default for EncodeRequest<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EncodeRequest<'a> {
    pub fn new() -> Self {
        Self {
            dpi: None,
            palette: None,
        }
    }

    /// Horizontal and vertical resolution in dots per inch. Defaults to 96.
    pub fn with_dpi(mut self, x: f64, y: f64) -> Self {
        self.dpi = Some((x, y));
        self
    }

    /// Color table for `Indexed8` pixels (at most 256 entries).
    pub fn with_palette(mut self, palette: &'a Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Encode a top-to-bottom pixel buffer.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: ColorMode,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BitmapError> {
        bmp::encode_bmp(pixels, width, height, mode, self.palette, self.ppm(None), &stop)
    }

    /// Re-encode a decoded image, carrying over its palette and stored
    /// resolution unless this request overrides them.
    pub fn encode_image(&self, image: &DecodedImage, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
        let palette = self.palette.or(image.palette());
        bmp::encode_bmp(
            image.pixels(),
            image.width,
            image.height,
            image.mode,
            palette,
            self.ppm(image.pixels_per_meter()),
            &stop,
        )
    }

    /// Header pixels per meter: the requested DPI, else `fallback`, else 96.
    fn ppm(&self, fallback: Option<(u32, u32)>) -> (u32, u32) {
        match (self.dpi, fallback) {
            (Some((x, y)), _) => (bmp::dpi_to_ppm(x), bmp::dpi_to_ppm(y)),
            (None, Some(ppm)) => ppm,
            (None, None) => {
                let ppm = bmp::dpi_to_ppm(DEFAULT_DPI);
                (ppm, ppm)
            }
        }
    }

    /// Encode and write the file to `writer`.
    #[cfg(feature = "std")]
    pub fn encode_to<W: std::io::Write>(
        &self,
        mut writer: W,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: ColorMode,
        stop: impl Stop,
    ) -> Result<(), BitmapError> {
        let bytes = self.encode(pixels, width, height, mode, stop)?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}
