//! Bit unpacking helpers for packed indices and 16-bit channel words.
//!
//! The index unpacking and the channel widening tables come from zune-bmp
//! by Caleb Etemesi (MIT/Apache-2.0/Zlib).

/// Unpack MSB-first palette indices of `depth` bits (1, 4 or 8) into one
/// byte each. `out.len()` decides how many indices are produced; stored
/// bits past the end of `out` (row padding) are ignored.
pub(crate) fn unpack_indices(depth: u8, input: &[u8], out: &mut [u8]) {
    match depth {
        1 => {
            let mut out_iter = out.chunks_exact_mut(8);
            let mut in_iter = input.iter();
            (&mut out_iter)
                .zip(&mut in_iter)
                .for_each(|(cur, &byte)| {
                    for (bit, o) in cur.iter_mut().enumerate() {
                        *o = (byte >> (7 - bit)) & 0x01;
                    }
                });
            if let Some(&byte) = in_iter.next() {
                for (bit, o) in out_iter.into_remainder().iter_mut().enumerate() {
                    *o = (byte >> (7 - bit)) & 0x01;
                }
            }
        }
        4 => {
            let mut out_iter = out.chunks_exact_mut(2);
            let mut in_iter = input.iter();
            (&mut out_iter)
                .zip(&mut in_iter)
                .for_each(|(cur, &byte)| {
                    cur[0] = byte >> 4;
                    cur[1] = byte & 0x0f;
                });
            if let Some(&byte) = in_iter.next() {
                if let Some(o) = out_iter.into_remainder().first_mut() {
                    *o = byte >> 4;
                }
            }
        }
        _ => {
            let n = out.len().min(input.len());
            out[..n].copy_from_slice(&input[..n]);
        }
    }
}

/// Pack one-byte-per-pixel values MSB-first at 1 bit each; any nonzero
/// input becomes a set bit. Writes `out.len()` bytes.
pub(crate) fn pack_bits(input: &[u8], out: &mut [u8]) {
    for (dst, src) in out.iter_mut().zip(input.chunks(8)) {
        *dst = src
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &v)| acc | (u8::from(v != 0) << (7 - bit)));
    }
}

/// Bitfield shift/scale table for converting N-bit values to 8-bit.
const MUL_TABLE: [u32; 9] = [
    0,    // 0 bits
    0xff, // 1 bit:  0b11111111
    0x55, // 2 bits: 0b01010101
    0x49, // 3 bits: 0b01001001
    0x11, // 4 bits: 0b00010001
    0x21, // 5 bits: 0b00100001
    0x41, // 6 bits: 0b01000001
    0x81, // 7 bits: 0b10000001
    0x01, // 8 bits: 0b00000001
];

const SHIFT_TABLE: [i32; 9] = [0, 0, 0, 1, 0, 2, 4, 6, 0];

/// Extract the channel selected by `mask` from `word` and widen it to
/// 8 bits by bit replication.
pub(crate) fn widen_channel(word: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let bits = mask.count_ones().min(8);
    // Align the top bit of the mask with bit 7.
    let shift = (32 - mask.leading_zeros()) as i32 - 8;
    let mut v = word & mask;
    if shift < 0 {
        v <<= -shift;
    } else {
        v >>= shift;
    }
    v >>= 8 - bits;
    ((v * MUL_TABLE[bits as usize]) >> SHIFT_TABLE[bits as usize]) as u8
}
