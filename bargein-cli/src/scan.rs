//! Input loading and frame-by-frame scanning.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bargein_core::{Detector, DetectorConfig, Encoding};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub frames: u64,
    /// Frame indices where an onset fired.
    pub onsets: Vec<u64>,
    /// Trailing bytes too short for a whole frame.
    pub skipped_bytes: usize,
}

/// Read `path` as raw samples, or as 16-bit PCM WAV when it ends in `.wav`.
///
/// For WAV input the header's sample rate replaces `config.sample_rate` and
/// the encoding becomes PCM16. Multi-channel files keep channel 0.
pub fn read_input(path: &Path, config: &mut DetectorConfig) -> Result<Vec<u8>> {
    let is_wav = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    if !is_wav {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        info!(
            path = %path.display(),
            bytes = bytes.len(),
            encoding = %config.encoding,
            sample_rate = config.sample_rate,
            "loaded raw audio"
        );
        return Ok(bytes);
    }

    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open WAV {}", path.display()))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        bail!(
            "unsupported WAV format: {:?} {}-bit (need 16-bit integer PCM)",
            spec.sample_format,
            spec.bits_per_sample
        );
    }
    if spec.channels > 1 {
        warn!(channels = spec.channels, "multi-channel WAV, using channel 0");
    }
    if config.encoding != Encoding::Pcm16 {
        debug!(from = %config.encoding, "WAV input overrides encoding to pcm16");
    }

    let channels = spec.channels.max(1) as usize;
    let mut bytes = Vec::with_capacity(reader.len() as usize * 2 / channels);
    for (i, sample) in reader.samples::<i16>().enumerate() {
        let sample = sample.context("corrupt WAV sample data")?;
        if i % channels == 0 {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
    }

    config.sample_rate = spec.sample_rate;
    config.encoding = Encoding::Pcm16;

    info!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        samples = bytes.len() / 2,
        "loaded WAV audio"
    );
    Ok(bytes)
}

/// Feed `audio` to `detector` one frame at a time.
///
/// Writes one JSON `FrameReport` per line when `json` is set, otherwise one
/// line per onset.
pub fn scan<W: Write>(
    detector: &mut Detector,
    audio: &[u8],
    json: bool,
    out: &mut W,
) -> Result<ScanSummary> {
    let frame_bytes = detector.bytes_per_frame();
    let frame_secs = detector.frame_len() as f64 / detector.config().sample_rate as f64;
    let mut summary = ScanSummary::default();

    let chunks = audio.chunks_exact(frame_bytes);
    summary.skipped_bytes = chunks.remainder().len();

    for chunk in chunks {
        let Some(report) = detector.analyze_chunk(chunk) else {
            continue;
        };
        summary.frames += 1;

        if json {
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }
        if report.onset {
            summary.onsets.push(report.frame_index);
            if !json {
                writeln!(
                    out,
                    "onset frame={} t={:.3}s score={:.3} floor={:.3}",
                    report.frame_index,
                    report.frame_index as f64 * frame_secs,
                    report.score(),
                    report.floor.unwrap_or_default()
                )?;
            }
        }
    }

    if summary.skipped_bytes > 0 {
        debug!(
            bytes = summary.skipped_bytes,
            "ignored trailing partial frame"
        );
    }
    Ok(summary)
}
