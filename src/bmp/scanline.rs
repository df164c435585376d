//! Padded scanline unpacking (decode direction).

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use super::format::RawLayout;
use super::header::RowDirection;
use super::utils::{unpack_indices, widen_channel};
use crate::error::BitmapError;

/// Shape of the stored scanline block.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RowGeometry {
    pub width: usize,
    pub height: usize,
    /// Stored bytes per row, including padding.
    pub stride: usize,
    pub direction: RowDirection,
}

impl RowGeometry {
    /// Bytes of scanline data the image occupies in the file.
    pub(crate) fn stored_len(&self) -> Option<usize> {
        self.stride.checked_mul(self.height)
    }
}

/// Bytes one pixel occupies after unpacking.
pub(crate) fn unpacked_bytes_per_pixel(raw: RawLayout) -> usize {
    match raw {
        RawLayout::Bgra => 4,
        RawLayout::Bgrx | RawLayout::Bgr | RawLayout::Bgr16 | RawLayout::Bgr15 => 3,
        RawLayout::Packed(_) => 1,
    }
}

/// Unpack every stored row into a top-to-bottom pixel buffer.
///
/// `data` must start at the first stored row. Output is RGB/RGBA for
/// direct layouts and one palette index per pixel for packed layouts.
pub(crate) fn decode_rows(
    data: &[u8],
    geom: RowGeometry,
    raw: RawLayout,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    let stored = geom.stored_len().ok_or(BitmapError::TruncatedData)?;
    if geom.stride == 0 || data.len() < stored {
        return Err(BitmapError::TruncatedData);
    }
    let out_row = geom.width * unpacked_bytes_per_pixel(raw);
    let total = out_row
        .checked_mul(geom.height)
        .ok_or(BitmapError::ImageTooLarge {
            width: geom.width as u32,
            height: geom.height as u32,
        })?;
    let mut out = vec![0u8; total];

    for (file_row, src) in data[..stored].chunks_exact(geom.stride).enumerate() {
        if file_row % 16 == 0 {
            stop.check()?;
        }
        let y = match geom.direction {
            RowDirection::BottomUp => geom.height - 1 - file_row,
            RowDirection::TopDown => file_row,
        };
        unpack_row(raw, src, &mut out[y * out_row..(y + 1) * out_row]);
    }
    Ok(out)
}

fn unpack_row(raw: RawLayout, src: &[u8], dst: &mut [u8]) {
    match raw {
        RawLayout::Bgr => {
            for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
                d.copy_from_slice(&[s[2], s[1], s[0]]);
            }
        }
        RawLayout::Bgrx => {
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
                d.copy_from_slice(&[s[2], s[1], s[0]]);
            }
        }
        RawLayout::Bgra => {
            for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
                d.copy_from_slice(&[s[2], s[1], s[0], s[3]]);
            }
        }
        RawLayout::Bgr16 | RawLayout::Bgr15 => {
            let Some([mr, mg, mb]) = raw.word_masks() else {
                return;
            };
            for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(3)) {
                let word = u32::from(u16::from_le_bytes([s[0], s[1]]));
                d[0] = widen_channel(word, mr);
                d[1] = widen_channel(word, mg);
                d[2] = widen_channel(word, mb);
            }
        }
        RawLayout::Packed(depth) => unpack_indices(depth, src, dst),
    }
}
