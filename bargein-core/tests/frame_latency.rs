use std::time::{Duration, Instant};

use bargein_core::{Detector, DetectorConfig, Encoding};

const FRAMES: usize = 2_000;

/// Deterministic pseudo-random bytes (LCG) so every frame differs.
fn noise_bytes(len: usize, seed: &mut u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            *seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (*seed >> 24) as u8
        })
        .collect()
}

fn mean_frame_time(config: DetectorConfig) -> Duration {
    let mut det = Detector::new(config).unwrap();
    let mut seed = 0x5eed_u32;
    let frames: Vec<Vec<u8>> = (0..FRAMES)
        .map(|_| noise_bytes(det.bytes_per_frame(), &mut seed))
        .collect();

    let start = Instant::now();
    for f in &frames {
        det.process_chunk(f);
    }
    start.elapsed() / FRAMES as u32
}

#[test]
fn narrowband_frame_well_under_realtime() {
    let mean = mean_frame_time(DetectorConfig::default());
    // A frame covers 20 ms of audio; processing must be a small fraction.
    assert!(
        mean < Duration::from_millis(1),
        "mean per-frame time too high: {mean:?}"
    );
}

#[test]
fn wideband_frame_well_under_realtime() {
    let mean = mean_frame_time(DetectorConfig::new(16_000, Encoding::Pcm16));
    assert!(
        mean < Duration::from_millis(1),
        "mean per-frame time too high: {mean:?}"
    );
}
