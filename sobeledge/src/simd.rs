//! Vectorized Sobel detector processing eight output pixels per step.
//!
//! The kernel coefficients are restricted to {-2, -1, 0, 1, 2}, so every
//! per-lane multiply collapses into a negation and/or a single left shift.
//! For the 3x3 window around a group of eight output pixels, named
//!
//! ```text
//!   a b c
//!   d e f
//!   g h i
//! ```
//!
//! with each letter standing for eight consecutive samples widened to
//! 16-bit lanes, the two kernel applications become
//!
//! ```text
//!   vertical   = i + 2h + g - c - 2b - a      (d, e, f weigh 0)
//!   horizontal = i + 2f - 2d + c - g - a      (b, e, h weigh 0)
//! ```
//!
//! Each sum is taken to its lane-wise absolute value, divided by 8 with an
//! arithmetic right shift (the operand is already nonnegative, so the shift
//! agrees with the scalar path's truncating division), and the two results
//! are added and narrowed back to bytes.
//!
//! Row tails: when the next group of eight would spill past the last
//! interior column, the start column is pulled back so the group ends
//! exactly there; the final two groups then overlap and recompute a few
//! pixels with identical results. Images whose interior is narrower than
//! one group (width < 10) take a staged path instead, because pulling the
//! start column back would push it into or past the left border.

use wide::i16x8;

use crate::lanes::{narrow, widen};
use crate::plane::PlaneBuffer;
use crate::SobelError;

/// Output pixels computed per step.
const LANES: usize = 8;

/// Computes the gradient magnitude image with the vectorized path.
///
/// Numerically equivalent to [`crate::scalar::detect`] at every interior
/// pixel. Border pixels are seeded by copying the input, never computed.
///
/// # Errors
/// Returns [`SobelError::TooSmall`] if `width < 3` or `height < 3`.
pub fn detect(input: &PlaneBuffer) -> Result<PlaneBuffer, SobelError> {
    crate::validate(input)?;
    let mut output = input.clone();
    run(input, &mut output);
    Ok(output)
}

/// Computes the gradient magnitude image into a caller-owned buffer.
///
/// Only interior pixels are written; border pixels of `output` keep
/// whatever values the caller seeded them with.
///
/// # Errors
/// Returns [`SobelError::TooSmall`] if `width < 3` or `height < 3`, or
/// [`SobelError::ShapeMismatch`] if the buffers' dimensions differ.
pub fn detect_into(input: &PlaneBuffer, output: &mut PlaneBuffer) -> Result<(), SobelError> {
    crate::validate_pair(input, output)?;
    run(input, output);
    Ok(())
}

fn run(input: &PlaneBuffer, output: &mut PlaneBuffer) {
    let (width, height) = (input.width(), input.height());
    for p in 0..3 {
        sobel_plane(input.plane(p), output.plane_mut(p), width, height);
    }
}

/// Convolves one plane's interior, eight columns at a time.
///
/// Callers guarantee `width >= 3`, `height >= 3`, and both slices of
/// length `width * height`.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
pub(crate) fn sobel_plane(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    if width - 2 < LANES {
        sobel_plane_staged(src, dst, width, height);
        return;
    }

    for row in 1..height - 1 {
        let up = &src[(row - 1) * width..row * width];
        let mid = &src[row * width..(row + 1) * width];
        let down = &src[(row + 1) * width..(row + 2) * width];
        let out = &mut dst[row * width..(row + 1) * width];

        let mut col = 1;
        while col < width - 1 {
            // Realign the final group so it ends at the last interior
            // column; the overlapped pixels are recomputed identically.
            if col + LANES >= width {
                col = width - 1 - LANES;
            }
            let mag = sobel_group(up, mid, down, col);
            out[col..col + LANES].copy_from_slice(&mag);
            col += LANES;
        }
    }
}

/// Interior narrower than one group: stage the three bracketing rows into
/// zero-padded buffers, run the full 8-lane group on them, and write back
/// only the real interior lanes. The padding never reaches a kept lane's
/// window, and the start column stays at 1.
#[inline]
fn sobel_plane_staged(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    let interior = width - 2;
    for row in 1..height - 1 {
        let mut stage = [[0u8; LANES + 2]; 3];
        for (buf, src_row) in stage.iter_mut().zip(row - 1..) {
            buf[..width].copy_from_slice(&src[src_row * width..(src_row + 1) * width]);
        }
        let [up, mid, down] = &stage;
        let mag = sobel_group(up, mid, down, 1);
        let start = row * width + 1;
        dst[start..start + interior].copy_from_slice(&mag[..interior]);
    }
}

/// Computes eight gradient magnitudes for output columns `col..col + 8` of
/// the row between `up` and `down`. Rows must hold `col + 9` samples.
#[inline]
fn sobel_group(up: &[u8], mid: &[u8], down: &[u8], col: usize) -> [u8; 8] {
    let a = load8(up, col - 1);
    let b = load8(up, col);
    let c = load8(up, col + 1);
    let d = load8(mid, col - 1);
    let f = load8(mid, col + 1);
    let g = load8(down, col - 1);
    let h = load8(down, col);
    let i = load8(down, col + 1);
    // e (the window center) weighs 0 in both kernels and is never loaded.

    let vertical: i16x8 = i + (h << 1) + g - c - (b << 1) - a;
    let horizontal: i16x8 = i + (f << 1) - (d << 1) + c - g - a;

    narrow((vertical.abs() >> 3) + (horizontal.abs() >> 3))
}

#[inline]
fn load8(row: &[u8], start: usize) -> i16x8 {
    let samples: [u8; 8] = row[start..start + 8].try_into().unwrap();
    widen(samples)
}
