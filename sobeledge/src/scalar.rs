//! Scalar Sobel detector, the reference implementation.
//!
//! One pixel at a time, full 3x3 convolution against both kernels with
//! 32-bit accumulation. The vectorized path in [`crate::simd`] must produce
//! bit-identical output for every interior pixel.

use crate::plane::PlaneBuffer;
use crate::SobelError;

/// Vertical Sobel operator (responds to horizontal edges).
pub const KERNEL_V: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Horizontal Sobel operator (responds to vertical edges).
pub const KERNEL_H: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Computes the gradient magnitude image with the scalar reference path.
///
/// The output's border pixels (row 0, the last row, column 0, the last
/// column) are never computed; they are seeded by copying the input.
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

/// Convolves one plane's interior. Callers guarantee `width >= 3`,
/// `height >= 3`, and both slices of length `width * height`.
pub(crate) fn sobel_plane(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    for row in 1..height - 1 {
        for col in 1..width - 1 {
            let mut sumv = 0i32;
            let mut sumh = 0i32;
            for k in 0..3 {
                for l in 0..3 {
                    let sample = i32::from(src[(row + k - 1) * width + (col + l - 1)]);
                    sumv += KERNEL_V[k][l] * sample;
                    sumh += KERNEL_H[k][l] * sample;
                }
            }
            // Each absolute term is at most 1020 / 8 = 127, so the sum fits
            // u8 without wrapping; the cast still truncates rather than
            // saturates, matching the vectorized narrow.
            dst[row * width + col] = ((sumv / 8).abs() + (sumh / 8).abs()) as u8;
        }
    }
}
