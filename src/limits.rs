use crate::error::BitmapError;

/// Caller-configured resource caps for decoding.
///
/// All fields default to `None` (no cap). The fixed 2^31 pixel guard in
/// the header parser applies regardless of these settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of the decoded pixel buffer, in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// No caps at all.
    pub const fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_memory_bytes: None,
        }
    }

    pub const fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = Some(max_pixels);
        self
    }

    pub const fn with_max_memory_bytes(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    pub const fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    /// Validate a parsed image against every configured cap.
    ///
    /// `out_bytes_per_pixel` is the size of one decoded pixel, used for the
    /// memory cap.
    pub(crate) fn check_image(
        &self,
        width: u32,
        height: u32,
        out_bytes_per_pixel: usize,
    ) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width.filter(|&m| width > m) {
            return Err(exceeded("width", u64::from(width), u64::from(max_w)));
        }
        if let Some(max_h) = self.max_height.filter(|&m| height > m) {
            return Err(exceeded("height", u64::from(height), u64::from(max_h)));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels.filter(|&m| pixels > m) {
            return Err(exceeded("pixel count", pixels, max_px));
        }
        let bytes = pixels.saturating_mul(out_bytes_per_pixel as u64);
        if let Some(max_mem) = self.max_memory_bytes.filter(|&m| bytes > m) {
            return Err(exceeded("output buffer bytes", bytes, max_mem));
        }
        Ok(())
    }
}

fn exceeded(what: &str, value: u64, limit: u64) -> BitmapError {
    BitmapError::LimitExceeded(alloc::format!("{what} {value} exceeds limit {limit}"))
}
