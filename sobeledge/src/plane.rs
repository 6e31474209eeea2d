//! Plane-separated image storage.
//!
//! The detectors operate on three equal-size byte planes, one per color
//! channel, stored back to back in a single allocation. Keeping channels
//! contiguous lets the convolution walk one plane at a time with plain
//! row-major indexing and no per-pixel channel arithmetic.

use imgref::{Img, ImgRef, ImgVec};
use rgb::RGB8;

/// Three-plane 8-bit image buffer.
///
/// Stores `3 * width * height` samples: plane 0 first, then plane 1, then
/// plane 2. Within a plane, samples are row-major with no padding, so the
/// sample at `(row, col)` of plane `p` lives at
/// `p * width * height + row * width + col`.
///
/// The buffer is channel-order-agnostic for the detectors; the constructors
/// that name channels ([`PlaneBuffer::from_rgb`], [`PlaneBuffer::to_rgb`])
/// use plane order {red, green, blue} with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl PlaneBuffer {
    /// Creates a new buffer filled with zeros.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0; 3 * width * height],
            width,
            height,
        }
    }

    /// Creates a buffer filled with a constant sample value.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            data: vec![value; 3 * width * height],
            width,
            height,
        }
    }

    /// Creates a buffer from existing plane data.
    ///
    /// # Panics
    /// Panics if `data` length doesn't match `3 * width * height`.
    #[must_use]
    pub fn from_planes(data: Vec<u8>, width: usize, height: usize) -> Self {
        assert_eq!(data.len(), 3 * width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// De-interleaves an RGB image into planes {red, green, blue}.
    #[must_use]
    pub fn from_rgb(img: ImgRef<'_, RGB8>) -> Self {
        let (width, height) = (img.width(), img.height());
        let plane_len = width * height;
        let mut data = vec![0u8; 3 * plane_len];
        {
            let (r_plane, rest) = data.split_at_mut(plane_len);
            let (g_plane, b_plane) = rest.split_at_mut(plane_len);
            for (y, row) in img.rows().enumerate() {
                for (x, px) in row.iter().enumerate() {
                    let i = y * width + x;
                    r_plane[i] = px.r;
                    g_plane[i] = px.g;
                    b_plane[i] = px.b;
                }
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Re-interleaves planes {0, 1, 2} as {red, green, blue}.
    #[must_use]
    pub fn to_rgb(&self) -> ImgVec<RGB8> {
        let plane_len = self.plane_len();
        let mut pixels = Vec::with_capacity(plane_len);
        let (r, g, b) = (self.plane(0), self.plane(1), self.plane(2));
        for i in 0..plane_len {
            pixels.push(RGB8::new(r[i], g[i], b[i]));
        }
        Img::new(pixels, self.width, self.height)
    }

    /// Image width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of samples in one plane (`width * height`).
    #[inline]
    #[must_use]
    pub fn plane_len(&self) -> usize {
        self.width * self.height
    }

    /// Returns a reference to one plane's samples.
    ///
    /// # Panics
    /// Panics if `plane >= 3`.
    #[inline]
    #[must_use]
    pub fn plane(&self, plane: usize) -> &[u8] {
        assert!(plane < 3);
        let start = plane * self.plane_len();
        &self.data[start..start + self.plane_len()]
    }

    /// Returns a mutable reference to one plane's samples.
    ///
    /// # Panics
    /// Panics if `plane >= 3`.
    #[inline]
    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        assert!(plane < 3);
        let len = self.plane_len();
        let start = plane * len;
        &mut self.data[start..start + len]
    }

    /// Returns one row of one plane.
    #[inline]
    #[must_use]
    pub fn plane_row(&self, plane: usize, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.plane(plane)[start..start + self.width]
    }

    /// Gets a single sample.
    #[inline]
    #[must_use]
    pub fn get(&self, plane: usize, x: usize, y: usize) -> u8 {
        self.plane(plane)[y * self.width + x]
    }

    /// Sets a single sample.
    #[inline]
    pub fn set(&mut self, plane: usize, x: usize, y: usize, value: u8) {
        let width = self.width;
        self.plane_mut(plane)[y * width + x] = value;
    }

    /// Returns all three planes as one slice.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns all three planes as one mutable slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Checks if two buffers have the same dimensions.
    #[must_use]
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Fills every plane with a constant sample value.
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }
}
