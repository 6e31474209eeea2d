//! # Sobeledge
//!
//! Approximate edge-gradient magnitude images from 8-bit true-color rasters
//! using the fixed 3x3 Sobel operators, in two numerically equivalent forms:
//!
//! - [`scalar`]: the straightforward per-pixel reference convolution
//! - [`simd`]: a lane-parallel variant that computes eight output pixels per
//!   step, replacing every kernel multiply with negate/shift/add because the
//!   coefficients are restricted to {-2, -1, 0, 1, 2}
//!
//! Images are handled as three contiguous byte planes ([`PlaneBuffer`]), one
//! per color channel; the same convolution runs on each plane independently,
//! so channel order never matters. Both detectors leave the outermost row
//! and column untouched: the `detect` convenience functions seed borders by
//! copying the input, and `detect_into` leaves the caller's seeding alone.
//!
//! The [`bmp`] module reads and writes the 24-bit uncompressed BMP files the
//! bundled CLI operates on; [`PlaneBuffer::from_rgb`] / [`PlaneBuffer::to_rgb`]
//! bridge to ordinary interleaved [`imgref`]/[`rgb`] images.
//!
//! ## Example
//!
//! ```rust
//! use sobeledge::{Detector, PlaneBuffer};
//!
//! // A flat image has no edges: every interior gradient is zero.
//! let input = PlaneBuffer::filled(16, 16, 128);
//! let edges = Detector::Simd.detect(&input)?;
//! assert_eq!(edges.get(0, 8, 8), 0);
//!
//! // Borders are seeded from the input, never computed.
//! assert_eq!(edges.get(0, 0, 0), 128);
//! # Ok::<(), sobeledge::SobelError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod bmp;
pub mod lanes;
mod plane;
pub mod scalar;
pub mod simd;

pub use plane::PlaneBuffer;

// Re-export imgref and rgb types for convenience
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::{RGB, RGB8};

/// Error type for detector operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SobelError {
    /// Image is too small for any interior pixel to exist (minimum 3x3).
    TooSmall {
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },
    /// Input and output buffer dimensions don't match.
    ShapeMismatch {
        /// Input dimensions.
        expected: (usize, usize),
        /// Output dimensions.
        actual: (usize, usize),
    },
}

impl std::fmt::Display for SobelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooSmall { width, height } => {
                write!(f, "image too small: {width}x{height} (minimum 3x3)")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "buffer shapes don't match: {}x{} vs {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
        }
    }
}

impl std::error::Error for SobelError {}

/// Checks the 3x3-minimum precondition shared by both detectors.
pub(crate) fn validate(input: &PlaneBuffer) -> Result<(), SobelError> {
    if input.width() < 3 || input.height() < 3 {
        return Err(SobelError::TooSmall {
            width: input.width(),
            height: input.height(),
        });
    }
    Ok(())
}

/// Checks the shared precondition plus input/output shape equality.
pub(crate) fn validate_pair(input: &PlaneBuffer, output: &PlaneBuffer) -> Result<(), SobelError> {
    validate(input)?;
    if !input.same_size(output) {
        return Err(SobelError::ShapeMismatch {
            expected: (input.width(), input.height()),
            actual: (output.width(), output.height()),
        });
    }
    Ok(())
}

/// Detector variant selector.
///
/// Mirrors the CLI's integer contract: `0` selects the scalar reference
/// path, `1` the vectorized path. Both produce identical output for every
/// interior pixel; the vectorized path is simply faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    /// Per-pixel reference convolution.
    Scalar,
    /// Eight-lane vectorized convolution.
    Simd,
}

impl Detector {
    /// Maps the CLI's integer flag to a detector: 0 = scalar, 1 = simd.
    #[must_use]
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(Self::Scalar),
            1 => Some(Self::Simd),
            _ => None,
        }
    }

    /// Short lowercase name, as printed by the CLI.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Simd => "simd",
        }
    }

    /// Computes the gradient magnitude image, seeding borders from the
    /// input.
    ///
    /// # Errors
    /// Returns [`SobelError::TooSmall`] if `width < 3` or `height < 3`.
    pub fn detect(self, input: &PlaneBuffer) -> Result<PlaneBuffer, SobelError> {
        match self {
            Self::Scalar => scalar::detect(input),
            Self::Simd => simd::detect(input),
        }
    }

    /// Computes the gradient magnitude image into a caller-owned,
    /// caller-seeded buffer. Only interior pixels are written.
    ///
    /// # Errors
    /// Returns [`SobelError::TooSmall`] if `width < 3` or `height < 3`, or
    /// [`SobelError::ShapeMismatch`] if the buffers' dimensions differ.
    pub fn detect_into(
        self,
        input: &PlaneBuffer,
        output: &mut PlaneBuffer,
    ) -> Result<(), SobelError> {
        match self {
            Self::Scalar => scalar::detect_into(input, output),
            Self::Simd => simd::detect_into(input, output),
        }
    }
}
