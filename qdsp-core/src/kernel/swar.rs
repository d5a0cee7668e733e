use super::{scalar, BlockKernel, KernelTier};

/// SIMD-within-a-register: four `i8` or two `i16` lanes packed in a `u32`.
///
/// Only the activation kernels have a packed form; everything else runs the
/// reference loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwarKernel;

const SIGN_S8: u32 = 0x8080_8080;
const SIGN_S16: u32 = 0x8000_8000;

impl BlockKernel for SwarKernel {
    fn tier(&self) -> KernelTier {
        KernelTier::Swar
    }

    fn relu_s8(&self, data: &mut [i8]) {
        let mut words = data.chunks_exact_mut(4);
        for chunk in &mut words {
            let word = u32::from_ne_bytes([chunk[0] as u8, chunk[1] as u8, chunk[2] as u8, chunk[3] as u8]);
            // sign bit of each byte down to bit 0, then widen to a byte mask
            let mask = ((word & SIGN_S8) >> 7).wrapping_mul(0xFF);
            let bytes = (word & !mask).to_ne_bytes();
            for (dst, b) in chunk.iter_mut().zip(bytes) {
                *dst = b as i8;
            }
        }
        scalar::relu(words.into_remainder());
    }

    fn relu_s16(&self, data: &mut [i16]) {
        let mut words = data.chunks_exact_mut(2);
        for pair in &mut words {
            let word = (pair[0] as u16 as u32) | ((pair[1] as u16 as u32) << 16);
            let mask = ((word & SIGN_S16) >> 15).wrapping_mul(0xFFFF);
            let cleared = word & !mask;
            pair[0] = cleared as u16 as i16;
            pair[1] = (cleared >> 16) as u16 as i16;
        }
        scalar::relu(words.into_remainder());
    }
}
