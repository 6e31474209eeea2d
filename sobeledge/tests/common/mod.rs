//! Shared helpers for the integration tests.

use sobeledge::PlaneBuffer;

/// Deterministic pseudo-random image, reproducible across runs and
/// platforms (64-bit LCG, high bits taken per sample).
pub fn lcg_image(width: usize, height: usize, seed: u64) -> PlaneBuffer {
    let mut state = seed | 1;
    let mut data = vec![0u8; 3 * width * height];
    for v in &mut data {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *v = (state >> 33) as u8;
    }
    PlaneBuffer::from_planes(data, width, height)
}

/// Asserts two buffers are equal at every sample, reporting the first
/// mismatching position.
pub fn assert_planes_equal(actual: &PlaneBuffer, expected: &PlaneBuffer, context: &str) {
    assert!(actual.same_size(expected), "{context}: shapes differ");
    for p in 0..3 {
        for y in 0..actual.height() {
            for x in 0..actual.width() {
                assert_eq!(
                    actual.get(p, x, y),
                    expected.get(p, x, y),
                    "{context}: plane {p} at ({x}, {y})"
                );
            }
        }
    }
}
