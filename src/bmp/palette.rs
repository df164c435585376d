//! Color table reading, greyscale/bilevel detection, and emission.

use alloc::vec::Vec;

use super::cursor::{ByteCursor, PutLe, Region};
use crate::error::BitmapError;

/// Largest color table a header may declare.
pub(crate) const MAX_PALETTE_ENTRIES: u32 = 65536;

/// One color table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaletteEntry {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// Index-addressable color table of an indexed image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Build a palette from packed RGB triples. A trailing partial triple
    /// is ignored.
    pub fn from_rgb(rgb: &[u8]) -> Self {
        let entries = rgb
            .chunks_exact(3)
            .map(|c| PaletteEntry::new(c[0], c[1], c[2]))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PaletteEntry> {
        self.entries.get(index).copied()
    }

    /// Linear gray ramp spread over `count` entries (black to white).
    pub(crate) fn gray_ramp(count: usize) -> Self {
        let last = count.saturating_sub(1).max(1);
        let entries = (0..count)
            .map(|i| PaletteEntry::gray((i * 255 / last) as u8))
            .collect();
        Self { entries }
    }

    /// Emit `count` BGRX entries, padding past the end with black.
    pub(crate) fn write_bgrx(&self, out: &mut Vec<u8>, count: usize) {
        for i in 0..count {
            let e = self.get(i).unwrap_or_default();
            out.put_u32_le(u32::from_le_bytes([e.b, e.g, e.r, 0]));
        }
    }
}

/// What a color table turned out to describe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PaletteOutcome {
    /// Two entries, black then white.
    Bilevel,
    /// Entry `i` is `(i, i, i)` throughout.
    Greyscale,
    Indexed(Palette),
}

/// Decide whether a color table is a plain black/white or gray ramp.
pub(crate) fn classify_palette(palette: Palette) -> PaletteOutcome {
    let entries = palette.entries();
    if entries.len() == 2 {
        if entries[0] == PaletteEntry::gray(0) && entries[1] == PaletteEntry::gray(255) {
            return PaletteOutcome::Bilevel;
        }
    } else if entries.len() <= 256
        && entries
            .iter()
            .enumerate()
            .all(|(i, e)| *e == PaletteEntry::gray(i as u8))
    {
        return PaletteOutcome::Greyscale;
    }
    PaletteOutcome::Indexed(palette)
}

/// Read `color_count` entries of `entry_size` bytes (3 = BGR, 4 = BGRX).
pub(crate) fn read_palette(
    cursor: &mut ByteCursor<'_>,
    color_count: u32,
    entry_size: usize,
) -> Result<Palette, BitmapError> {
    if color_count == 0 || color_count > MAX_PALETTE_ENTRIES {
        return Err(BitmapError::InvalidPaletteSize(color_count));
    }
    cursor.enter(Region::Data);
    let bytes = cursor.take(color_count as usize * entry_size)?;
    let entries = bytes
        .chunks_exact(entry_size)
        .map(|e| PaletteEntry::new(e[2], e[1], e[0]))
        .collect();
    Ok(Palette::new(entries))
}
