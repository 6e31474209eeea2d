//! 24-bit uncompressed BMP codec.
//!
//! Reads and writes the classic 54-byte BITMAPFILEHEADER + BITMAPINFOHEADER
//! layout: little-endian fields, bottom-up rows, each row's byte length
//! padded to a 4-byte boundary, pixels stored as interleaved {B, G, R}.
//!
//! Decoding de-interleaves the pixel array into the three-plane layout the
//! detectors consume, keeping the file's channel order {B, G, R} and its
//! bottom-up row order. The detectors are channel- and row-order-agnostic,
//! so a gradient image written back through [`write`] lands right side up.

use std::fs;
use std::path::Path;

use crate::plane::PlaneBuffer;

/// Size of BITMAPFILEHEADER + BITMAPINFOHEADER.
const HEADER_LEN: usize = 54;

/// Shape of a decoded BMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Bits per pixel; always 24 for images this codec accepts.
    pub bits_per_pixel: u16,
}

impl BmpHeader {
    /// Creates a 24-bit header for the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 24,
        }
    }

    /// Byte length of one padded pixel row.
    #[must_use]
    pub fn row_stride(&self) -> usize {
        (3 * self.width as usize + 3) & !3
    }
}

/// Error type for BMP decoding and encoding.
#[derive(Debug)]
#[non_exhaustive]
pub enum BmpError {
    /// Underlying file I/O failed.
    Io(std::io::Error),
    /// The file does not start with the `BM` magic.
    NotBmp,
    /// The file is a BMP, but not 24-bit uncompressed.
    Unsupported {
        /// Bits per pixel declared by the header.
        bits_per_pixel: u16,
        /// Compression method declared by the header.
        compression: u32,
    },
    /// The header declares non-positive dimensions (or a top-down BMP,
    /// which stores height as a negative number).
    BadDimensions {
        /// Width field as stored.
        width: i32,
        /// Height field as stored.
        height: i32,
    },
    /// The file ends before the declared pixel array does.
    Truncated,
    /// The declared dimensions overflow addressable memory.
    TooLarge,
}

impl std::fmt::Display for BmpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::NotBmp => write!(f, "not a BMP file (missing BM magic)"),
            Self::Unsupported {
                bits_per_pixel,
                compression,
            } => {
                write!(
                    f,
                    "unsupported BMP: {bits_per_pixel} bits per pixel, \
                     compression {compression} (need 24-bit uncompressed)"
                )
            }
            Self::BadDimensions { width, height } => {
                write!(f, "bad BMP dimensions: {width}x{height}")
            }
            Self::Truncated => write!(f, "BMP file is truncated"),
            Self::TooLarge => write!(f, "BMP dimensions too large"),
        }
    }
}

impl std::error::Error for BmpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BmpError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reads a 24-bit BMP file into plane-separated form.
///
/// # Errors
/// Returns [`BmpError`] if the file cannot be read, is not a BMP, is not
/// 24-bit uncompressed, or is shorter than its header claims.
pub fn read<P: AsRef<Path>>(path: P) -> Result<(BmpHeader, PlaneBuffer), BmpError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Writes a plane-separated image as a 24-bit BMP file.
///
/// # Errors
/// Returns [`BmpError::BadDimensions`] if the header's dimensions do not
/// match the buffer's, or [`BmpError::Io`] if the file cannot be written.
pub fn write<P: AsRef<Path>>(
    path: P,
    header: &BmpHeader,
    image: &PlaneBuffer,
) -> Result<(), BmpError> {
    let bytes = encode(header, image)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Decodes an in-memory BMP byte stream.
///
/// # Errors
/// Same conditions as [`read`], minus file I/O.
pub fn decode(bytes: &[u8]) -> Result<(BmpHeader, PlaneBuffer), BmpError> {
    if bytes.len() < HEADER_LEN {
        return Err(BmpError::Truncated);
    }
    if &bytes[0..2] != b"BM" {
        return Err(BmpError::NotBmp);
    }

    let data_offset = read_u32(bytes, 10) as usize;
    let width_raw = read_u32(bytes, 18) as i32;
    let height_raw = read_u32(bytes, 22) as i32;
    let bits_per_pixel = read_u16(bytes, 28);
    let compression = read_u32(bytes, 30);

    if bits_per_pixel != 24 || compression != 0 {
        return Err(BmpError::Unsupported {
            bits_per_pixel,
            compression,
        });
    }
    if width_raw <= 0 || height_raw <= 0 {
        return Err(BmpError::BadDimensions {
            width: width_raw,
            height: height_raw,
        });
    }

    let header = BmpHeader::new(width_raw as u32, height_raw as u32);
    let width = header.width as usize;
    let height = header.height as usize;
    let plane_len = width
        .checked_mul(height)
        .filter(|&n| n.checked_mul(3).is_some())
        .ok_or(BmpError::TooLarge)?;

    let stride = header.row_stride();
    let pixel_array_len = stride.checked_mul(height).ok_or(BmpError::TooLarge)?;
    if data_offset < HEADER_LEN || bytes.len() < data_offset + pixel_array_len {
        return Err(BmpError::Truncated);
    }

    // De-interleave {B, G, R} triples into planes, keeping the file's
    // bottom-up row order; padding at each row's end is skipped.
    let mut data = vec![0u8; 3 * plane_len];
    {
        let (b_plane, rest) = data.split_at_mut(plane_len);
        let (g_plane, r_plane) = rest.split_at_mut(plane_len);
        for row in 0..height {
            let src = &bytes[data_offset + row * stride..];
            for col in 0..width {
                let i = row * width + col;
                b_plane[i] = src[3 * col];
                g_plane[i] = src[3 * col + 1];
                r_plane[i] = src[3 * col + 2];
            }
        }
    }

    Ok((header, PlaneBuffer::from_planes(data, width, height)))
}

/// Encodes a plane-separated image as BMP bytes.
///
/// # Errors
/// Returns [`BmpError::BadDimensions`] if the header's dimensions do not
/// match the buffer's.
pub fn encode(header: &BmpHeader, image: &PlaneBuffer) -> Result<Vec<u8>, BmpError> {
    let width = header.width as usize;
    let height = header.height as usize;
    if width != image.width() || height != image.height() {
        return Err(BmpError::BadDimensions {
            width: header.width as i32,
            height: header.height as i32,
        });
    }

    let stride = header.row_stride();
    let pixel_array_len = stride * height;
    let file_len = HEADER_LEN + pixel_array_len;
    let mut bytes = vec![0u8; file_len];

    bytes[0..2].copy_from_slice(b"BM");
    write_u32(&mut bytes, 2, file_len as u32);
    write_u32(&mut bytes, 10, HEADER_LEN as u32);
    write_u32(&mut bytes, 14, 40); // BITMAPINFOHEADER size
    write_u32(&mut bytes, 18, header.width);
    write_u32(&mut bytes, 22, header.height);
    write_u16(&mut bytes, 26, 1); // color planes
    write_u16(&mut bytes, 28, 24);
    write_u32(&mut bytes, 34, pixel_array_len as u32);
    write_u32(&mut bytes, 38, 2835); // 72 dpi
    write_u32(&mut bytes, 42, 2835);

    let (b_plane, g_plane, r_plane) = (image.plane(0), image.plane(1), image.plane(2));
    for row in 0..height {
        let dst = &mut bytes[HEADER_LEN + row * stride..];
        for col in 0..width {
            let i = row * width + col;
            dst[3 * col] = b_plane[i];
            dst[3 * col + 1] = g_plane[i];
            dst[3 * col + 2] = r_plane[i];
        }
    }

    Ok(bytes)
}

#[inline]
fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
fn write_u16(bytes: &mut [u8], at: usize, value: u16) {
    bytes[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

#[inline]
fn write_u32(bytes: &mut [u8], at: usize, value: u32) {
    bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: usize, height: usize) -> PlaneBuffer {
        let mut data = vec![0u8; 3 * width * height];
        for (i, v) in data.iter_mut().enumerate() {
            *v = (i * 37 + 11) as u8;
        }
        PlaneBuffer::from_planes(data, width, height)
    }

    #[test]
    fn test_round_trip_padding_widths() {
        // Strides: width 3 -> 12, 4 -> 12, 5 -> 16, 6 -> 20
        for width in 3..=6 {
            let header = BmpHeader::new(width as u32, 5);
            let image = test_image(width, 5);
            let bytes = encode(&header, &image).unwrap();
            assert_eq!(bytes.len(), HEADER_LEN + header.row_stride() * 5);

            let (back_header, back) = decode(&bytes).unwrap();
            assert_eq!(back_header, header);
            assert_eq!(back, image, "width {width}");
        }
    }

    #[test]
    fn test_row_stride() {
        assert_eq!(BmpHeader::new(3, 1).row_stride(), 12);
        assert_eq!(BmpHeader::new(4, 1).row_stride(), 12);
        assert_eq!(BmpHeader::new(5, 1).row_stride(), 16);
        assert_eq!(BmpHeader::new(6, 1).row_stride(), 20);
        assert_eq!(BmpHeader::new(8, 1).row_stride(), 24);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let image = test_image(4, 4);
        let mut bytes = encode(&BmpHeader::new(4, 4), &image).unwrap();
        bytes[0] = b'P';
        assert!(matches!(decode(&bytes), Err(BmpError::NotBmp)));
    }

    #[test]
    fn test_rejects_non_24_bit() {
        let image = test_image(4, 4);
        let mut bytes = encode(&BmpHeader::new(4, 4), &image).unwrap();
        write_u16(&mut bytes, 28, 32);
        assert!(matches!(
            decode(&bytes),
            Err(BmpError::Unsupported {
                bits_per_pixel: 32,
                compression: 0
            })
        ));
    }

    #[test]
    fn test_rejects_compressed() {
        let image = test_image(4, 4);
        let mut bytes = encode(&BmpHeader::new(4, 4), &image).unwrap();
        write_u32(&mut bytes, 30, 1); // BI_RLE8
        assert!(matches!(decode(&bytes), Err(BmpError::Unsupported { .. })));
    }

    #[test]
    fn test_rejects_truncated_pixel_array() {
        let image = test_image(6, 6);
        let bytes = encode(&BmpHeader::new(6, 6), &image).unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() - 1]),
            Err(BmpError::Truncated)
        ));
        assert!(matches!(decode(&bytes[..20]), Err(BmpError::Truncated)));
    }

    #[test]
    fn test_rejects_top_down() {
        let image = test_image(4, 4);
        let mut bytes = encode(&BmpHeader::new(4, 4), &image).unwrap();
        write_u32(&mut bytes, 22, (-4i32) as u32);
        assert!(matches!(
            decode(&bytes),
            Err(BmpError::BadDimensions { height: -4, .. })
        ));
    }

    #[test]
    fn test_encode_dimension_mismatch() {
        let image = test_image(4, 4);
        assert!(matches!(
            encode(&BmpHeader::new(5, 4), &image),
            Err(BmpError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_plane_order_is_bgr() {
        // A single red pixel: file bytes {B=0, G=0, R=255}.
        let mut image = PlaneBuffer::new(1, 1);
        image.set(2, 0, 0, 255);
        let mut bytes = encode(&BmpHeader::new(1, 1), &image).unwrap();
        assert_eq!(&bytes[HEADER_LEN..HEADER_LEN + 3], &[0, 0, 255]);

        bytes[HEADER_LEN] = 7; // blue channel lands in plane 0
        let (_, back) = decode(&bytes).unwrap();
        assert_eq!(back.get(0, 0, 0), 7);
        assert_eq!(back.get(2, 0, 0), 255);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("sobeledge-bmp-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("round_trip.bmp");

        let header = BmpHeader::new(5, 4);
        let image = test_image(5, 4);
        write(&path, &header, &image).unwrap();
        let (back_header, back) = read(&path).unwrap();
        assert_eq!(back_header, header);
        assert_eq!(back, image);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read("/nonexistent/sobeledge.bmp"),
            Err(BmpError::Io(_))
        ));
    }
}
