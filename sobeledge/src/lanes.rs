//! 8-bit to 16-bit lane conversions for the vectorized detector.
//!
//! The convolution doubles samples (shift left by 1) and sums up to six
//! signed terms, bounding intermediates to roughly ±1020, so 16 signed
//! bits is the minimum lane width that cannot overflow.

use wide::i16x8;

/// Widens eight consecutive 8-bit samples into eight signed 16-bit lanes.
///
/// Lane `i` holds `samples[i]` zero-extended.
#[inline]
#[must_use]
pub fn widen(samples: [u8; 8]) -> i16x8 {
    let mut lanes = [0i16; 8];
    for (lane, s) in lanes.iter_mut().zip(samples) {
        *lane = i16::from(s);
    }
    i16x8::from(lanes)
}

/// Narrows eight 16-bit lanes back to bytes.
///
/// Byte `i` is lane `i`'s low 8 bits. Truncating, not saturating: lanes
/// outside `0..=255` wrap, matching the scalar path's `u8` cast.
#[inline]
#[must_use]
pub fn narrow(lanes: i16x8) -> [u8; 8] {
    let arr: [i16; 8] = lanes.into();
    let mut bytes = [0u8; 8];
    for (b, lane) in bytes.iter_mut().zip(arr) {
        *b = lane as u8;
    }
    bytes
}
