//! Synthetic pixel buffers for tests and benchmarks

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reproducible random RGBA data: color channels in [0, 1], alpha opaque
pub fn seeded_rgba(width: u32, height: u32, seed: u64) -> Vec<f32> {
    let count = (width * height) as usize;
    let mut bytes = vec![0u8; count * 3];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.fill_bytes(&mut bytes);

    let mut data = Vec::with_capacity(count * 4);
    for rgb in bytes.chunks_exact(3) {
        data.push(rgb[0] as f32 / 255.0);
        data.push(rgb[1] as f32 / 255.0);
        data.push(rgb[2] as f32 / 255.0);
        data.push(1.0);
    }
    data
}

/// A deterministic two-axis gradient with full alpha
pub fn gradient_rgba(width: u32, height: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity((width * height) as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let t = x as f32 / width.max(1) as f32;
            let s = y as f32 / height.max(1) as f32;
            data.extend_from_slice(&[t, s, (t + s) * 0.5, 1.0]);
        }
    }
    data
}

/// A CMYKA buffer with uniform ink values
pub fn cmyka_buffer(width: u32, height: u32, inks: [f32; 4], alpha: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity((width * height) as usize * 5);
    for _ in 0..width * height {
        data.extend_from_slice(&inks);
        data.push(alpha);
    }
    data
}
