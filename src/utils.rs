// src/utils.rs
//! Small byte helpers used by the mode implementations
//!
//! Keep this light; split it once it grows.

/// `dst[i] ^= src[i]` over the shorter of the two slices
#[inline(always)]
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= *s;
    }
}
