use sobeledge::{Detector, PlaneBuffer};
use std::time::Instant;

fn main() {
    let width = 512;
    let height = 512;

    // Diagonal gradient with a superimposed grid, so both kernels have work
    let mut input = PlaneBuffer::new(width, height);
    for p in 0..3 {
        for y in 0..height {
            for x in 0..width {
                let base = ((x + y) * 200 / (width + height)) as u8;
                let grid = if x % 16 == 0 || y % 16 == 0 { 40 } else { 0 };
                input.set(p, x, y, base.saturating_add(grid));
            }
        }
    }

    let iterations = 10;
    let mut outputs = Vec::new();

    for detector in [Detector::Scalar, Detector::Simd] {
        // Warmup
        let mut output = detector.detect(&input).expect("valid input");

        let start = Instant::now();
        for _ in 0..iterations {
            detector
                .detect_into(&input, &mut output)
                .expect("valid input");
        }
        let elapsed = start.elapsed();

        println!(
            "{:6} 512x512: {:.3}ms per call ({} iterations, total {:.3}s)",
            detector.name(),
            elapsed.as_secs_f64() * 1000.0 / f64::from(iterations),
            iterations,
            elapsed.as_secs_f64()
        );
        outputs.push(output);
    }

    assert_eq!(outputs[0], outputs[1], "detector outputs diverged");
    println!("outputs match");
}
