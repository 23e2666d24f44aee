//! Telephony sample decoding (ITU-T G.711 μ-law and 16-bit linear PCM).
//!
//! Decoders write straight into a caller-owned `f32` buffer scaled to
//! [-1.0, 1.0] so the per-frame path never allocates.
//!
//! The μ-law compressor and its bias/clip constants follow the G.711 codec in
//! pipecat-rs (`src/audio/codec.rs`, Copyright (c) 2024-2026 Daily,
//! BSD-2-Clause).

/// Bias added before μ-law compression (ITU-T G.711).
const MULAW_BIAS: i32 = 0x84; // 132
/// Maximum linear magnitude before clipping.
const MULAW_CLIP: i32 = 32635;
/// Full-scale divisor for 16-bit linear samples.
const PCM_SCALE: f32 = 32768.0;

/// Expand one μ-law byte to a 16-bit linear sample.
pub fn mulaw_to_linear(byte: u8) -> i16 {
    let u = !byte as i32;
    let sign = u & 0x80;
    let exponent = (u >> 4) & 0x07;
    let mantissa = u & 0x0F;

    let magnitude = ((mantissa << 3) + MULAW_BIAS) << exponent;

    if sign != 0 {
        (MULAW_BIAS - magnitude) as i16
    } else {
        (magnitude - MULAW_BIAS) as i16
    }
}

/// Compress a 16-bit linear sample to μ-law.
///
/// Not used on the detection path; handy for building telephony fixtures.
pub fn linear_to_mulaw(sample: i16) -> u8 {
    let sign: i32 = if sample < 0 { 0x80 } else { 0x00 };
    let mut magnitude = (sample as i32).abs().min(MULAW_CLIP);
    magnitude += MULAW_BIAS;

    let mut exponent: i32 = 7;
    let mut mask = 0x4000;
    while exponent > 0 && (magnitude & mask) == 0 {
        exponent -= 1;
        mask >>= 1;
    }

    let mantissa = (magnitude >> (exponent + 3)) & 0x0F;
    !((sign | (exponent << 4) | mantissa) as u8)
}

/// Decode `out.len()` μ-law bytes from the front of `bytes`.
///
/// Returns the number of samples written (fewer when `bytes` is short).
pub fn decode_mulaw(bytes: &[u8], out: &mut [f32]) -> usize {
    let n = bytes.len().min(out.len());
    for (dst, &b) in out.iter_mut().zip(bytes) {
        *dst = mulaw_to_linear(b) as f32 / PCM_SCALE;
    }
    n
}

/// Decode little-endian 16-bit samples from the front of `bytes`.
///
/// A trailing odd byte is ignored. Returns the number of samples written.
pub fn decode_pcm16le(bytes: &[u8], out: &mut [f32]) -> usize {
    let mut n = 0;
    for (dst, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
        *dst = i16::from_le_bytes([pair[0], pair[1]]) as f32 / PCM_SCALE;
        n += 1;
    }
    n
}
