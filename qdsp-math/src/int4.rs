//! Signed 4-bit values packed two per byte.
//!
//! Element `i` lives in byte `i / 2`; even indices take the low nibble,
//! odd indices the high nibble. Values are two's complement in `[-8, 7]`.
//! A weight matrix `[rows][total_ch]` is packed as one linear sequence, so
//! with an odd `total_ch` every other row starts on a high nibble.
//!
//! Packing an odd count leaves the unused high nibble of the last byte zero,
//! so unpacking then re-packing reproduces a byte buffer only up to that pad
//! nibble.

/// Sign-extend the low nibble of `byte`.
#[inline(always)]
pub fn low_nibble(byte: u8) -> i8 {
    ((byte << 4) as i8) >> 4
}

/// Sign-extend the high nibble of `byte`.
#[inline(always)]
pub fn high_nibble(byte: u8) -> i8 {
    (byte as i8) >> 4
}

#[inline(always)]
pub fn nibble_at(packed: &[u8], index: usize) -> i8 {
    let byte = packed[index / 2];
    if index % 2 == 0 {
        low_nibble(byte)
    } else {
        high_nibble(byte)
    }
}

/// Bytes needed to hold `count` packed values.
pub const fn packed_len(count: usize) -> usize {
    (count + 1) / 2
}

/// Pack values (clamped to `[-8, 7]`) into a new buffer.
pub fn pack_s4(values: &[i8]) -> Vec<u8> {
    let mut out = vec![0u8; packed_len(values.len())];
    pack_s4_into(values, &mut out);
    out
}

/// Pack into `out`, which must hold `packed_len(values.len())` bytes. The
/// unused high nibble of an odd-length tail is zero.
pub fn pack_s4_into(values: &[i8], out: &mut [u8]) {
    debug_assert!(out.len() >= packed_len(values.len()));
    for (byte, pair) in out.iter_mut().zip(values.chunks(2)) {
        let lo = (pair[0].clamp(-8, 7) as u8) & 0x0F;
        let hi = pair.get(1).map_or(0, |&v| (v.clamp(-8, 7) as u8) & 0x0F);
        *byte = lo | (hi << 4);
    }
}

pub fn unpack_s4(packed: &[u8], count: usize) -> Vec<i8> {
    let mut out = vec![0i8; count];
    unpack_s4_into(packed, &mut out);
    out
}

pub fn unpack_s4_into(packed: &[u8], out: &mut [i8]) {
    debug_assert!(packed.len() >= packed_len(out.len()));
    for (pair, &byte) in out.chunks_mut(2).zip(packed) {
        pair[0] = low_nibble(byte);
        if let Some(hi) = pair.get_mut(1) {
            *hi = high_nibble(byte);
        }
    }
}

/// Decode `count` (at most 4) consecutive channels of one weight row,
/// starting at channel `first_ch`. Remaining lanes are zero.
///
/// The row starts at nibble `row * total_ch`; the first channel read is on a
/// low nibble when `row * total_ch + first_ch` is even, on a high nibble
/// otherwise, and the following channels alternate from there.
#[inline]
pub fn unpack_row_quad(
    packed: &[u8],
    row: usize,
    total_ch: usize,
    first_ch: usize,
    count: usize,
) -> [i8; 4] {
    let start = row * total_ch + first_ch;
    let count = count.min(4);
    let mut out = [0i8; 4];

    if start % 2 == 0 {
        // aligned: lanes pair up inside bytes
        let base = start / 2;
        for (lane, slot) in out.iter_mut().enumerate().take(count) {
            let byte = packed[base + lane / 2];
            *slot = if lane % 2 == 0 {
                low_nibble(byte)
            } else {
                high_nibble(byte)
            };
        }
    } else {
        // odd start: lane 0 is the high half of the previous byte
        let base = start / 2;
        for (lane, slot) in out.iter_mut().enumerate().take(count) {
            let byte = packed[base + (lane + 1) / 2];
            *slot = if lane % 2 == 0 {
                high_nibble(byte)
            } else {
                low_nibble(byte)
            };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_sign_extension() {
        assert_eq!(low_nibble(0x0F), -1);
        assert_eq!(low_nibble(0x07), 7);
        assert_eq!(low_nibble(0x08), -8);
        assert_eq!(high_nibble(0xF0), -1);
        assert_eq!(high_nibble(0x70), 7);
        assert_eq!(high_nibble(0x80), -8);
    }

    #[test]
    fn test_pack_layout() {
        let packed = pack_s4(&[1, -2, 3]);
        assert_eq!(packed, vec![0xE1, 0x03]);
        assert_eq!(unpack_s4(&packed, 3), vec![1, -2, 3]);
        // out-of-range values clamp
        assert_eq!(unpack_s4(&pack_s4(&[100, -100]), 2), vec![7, -8]);
    }

    #[test]
    fn test_row_quad_odd_channels() {
        // 3 rows x 5 channels: row 1 starts on a high nibble
        let total_ch = 5;
        let values: Vec<i8> = (0..15).map(|i| (i % 16) as i8 - 8).collect();
        let packed = pack_s4(&values);

        for row in 0..3 {
            for first in 0..total_ch {
                let count = (total_ch - first).min(4);
                let quad = unpack_row_quad(&packed, row, total_ch, first, count);
                for lane in 0..count {
                    assert_eq!(
                        quad[lane],
                        values[row * total_ch + first + lane],
                        "row {} ch {} lane {}",
                        row,
                        first,
                        lane
                    );
                }
                for lane in count..4 {
                    assert_eq!(quad[lane], 0);
                }
            }
        }
    }

    #[test]
    fn test_row_quad_even_channels() {
        let total_ch = 4;
        let values: Vec<i8> = vec![1, 2, 3, 4, -1, -2, -3, -4];
        let packed = pack_s4(&values);
        assert_eq!(unpack_row_quad(&packed, 1, total_ch, 0, 4), [-1, -2, -3, -4]);
        assert_eq!(nibble_at(&packed, 5), -2);
    }
}
