//! Little-endian reads over a byte slice, and the matching writes.

use alloc::vec::Vec;

use crate::error::BitmapError;

/// Which structure the cursor is currently inside; decides the error
/// reported when the input runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Region {
    Header,
    Data,
}

pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    region: Region,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            region: Region::Header,
        }
    }

    pub(crate) fn enter(&mut self, region: Region) {
        self.region = region;
    }

    fn eof(&self) -> BitmapError {
        match self.region {
            Region::Header => BitmapError::TruncatedHeader,
            Region::Data => BitmapError::TruncatedData,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), BitmapError> {
        if pos > self.data.len() {
            return Err(self.eof());
        }
        self.pos = pos;
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], BitmapError> {
        let data = self.data;
        let end = self.pos.checked_add(n).ok_or_else(|| self.eof())?;
        let bytes = data.get(self.pos..end).ok_or_else(|| self.eof())?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    pub(crate) fn read_u16_le(&mut self) -> Result<u16, BitmapError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub(crate) fn read_u32_le(&mut self) -> Result<u32, BitmapError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub(crate) fn read_i32_le(&mut self) -> Result<i32, BitmapError> {
        self.read_array().map(i32::from_le_bytes)
    }
}

/// Fixed-width little-endian integer emission.
pub(crate) trait PutLe {
    fn put_u16_le(&mut self, v: u16);
    fn put_u32_le(&mut self, v: u32);
    fn put_i32_le(&mut self, v: i32);
}

impl PutLe for Vec<u8> {
    fn put_u16_le(&mut self, v: u16) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_u32_le(&mut self, v: u32) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put_i32_le(&mut self, v: i32) {
        self.extend_from_slice(&v.to_le_bytes());
    }
}
