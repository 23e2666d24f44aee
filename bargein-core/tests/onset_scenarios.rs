use std::f32::consts::PI;

use bargein_core::audio::codec::linear_to_mulaw;
use bargein_core::tuning::MIN_FLOOR_FRAMES;
use bargein_core::vad::SpeechState;
use bargein_core::{Detector, DetectorConfig, Encoding, FrameReport};

/// One frame of a sine at `freq`, encoded for `config`.
fn tone(config: &DetectorConfig, freq: f32, amplitude: f32) -> Vec<u8> {
    let sr = config.sample_rate as f32;
    let pcm = (0..config.frame_len())
        .map(|i| ((amplitude * (2.0 * PI * freq * i as f32 / sr).sin()) * 32767.0) as i16);
    match config.encoding {
        Encoding::Mulaw => pcm.map(linear_to_mulaw).collect(),
        Encoding::Pcm16 => pcm.flat_map(i16::to_le_bytes).collect(),
    }
}

fn silence(config: &DetectorConfig) -> Vec<u8> {
    match config.encoding {
        Encoding::Mulaw => vec![0xFF; config.bytes_per_frame()],
        Encoding::Pcm16 => vec![0x00; config.bytes_per_frame()],
    }
}

/// Mains-style hum: loud but almost entirely below the speech band.
fn hum(config: &DetectorConfig) -> Vec<u8> {
    tone(config, 100.0, 0.5)
}

/// Formant-band tone standing in for voiced speech.
fn voice(config: &DetectorConfig) -> Vec<u8> {
    tone(config, 1_000.0, 0.5)
}

/// Hum, voice, hum, voice.
fn call_script(config: &DetectorConfig) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    frames.extend(std::iter::repeat_n(hum(config), 25));
    frames.extend(std::iter::repeat_n(voice(config), 6));
    frames.extend(std::iter::repeat_n(hum(config), 10));
    frames.extend(std::iter::repeat_n(voice(config), 6));
    frames
}

fn run(detector: &mut Detector, frames: &[Vec<u8>]) -> Vec<FrameReport> {
    frames
        .iter()
        .map(|f| detector.analyze_chunk(f).expect("full frame"))
        .collect()
}

fn onsets(reports: &[FrameReport]) -> Vec<u64> {
    reports
        .iter()
        .filter(|r| r.onset)
        .map(|r| r.frame_index)
        .collect()
}

#[test]
fn silence_then_steady_tone_at_8k() {
    let config = DetectorConfig::default();
    let mut det = Detector::new(config.clone()).unwrap();

    for _ in 0..20 {
        assert!(!det.process_chunk(&silence(&config)));
        assert_eq!(det.history_len(), 0);
    }

    // The floor only exists from the 20th tone frame on, and by then it is
    // the tone itself: a steady tone with no quieter background is not an
    // onset.
    let tone = voice(&config);
    for i in 0..25 {
        let r = det.analyze_chunk(&tone).unwrap();
        assert_eq!(r.floor.is_some(), i + 1 >= MIN_FLOOR_FRAMES, "tone frame {i}");
        assert!(!r.onset, "steady tone fired at tone frame {i}");
    }
    assert_eq!(det.history_len(), 25);
}

#[test]
fn voice_over_hum_fires_once_per_burst() {
    let config = DetectorConfig::default();
    let mut det = Detector::new(config.clone()).unwrap();
    let reports = run(&mut det, &call_script(&config));

    // Third voiced frame of each burst confirms the onset.
    assert_eq!(onsets(&reports), vec![27, 43]);

    let offsets: Vec<u64> = reports
        .iter()
        .filter(|r| r.offset)
        .map(|r| r.frame_index)
        .collect();
    assert_eq!(offsets.len(), 1, "offsets={offsets:?}");
    assert!((31..=40).contains(&offsets[0]));

    // Everything between the rising edges stays false.
    for r in &reports[28..31] {
        assert_eq!(r.state, SpeechState::Speaking);
        assert!(!r.onset);
    }
    assert!(!reports[40].state.is_speaking());
}

#[test]
fn wideband_pcm_stream() {
    let config = DetectorConfig::new(16_000, Encoding::Pcm16);
    let mut det = Detector::new(config.clone()).unwrap();
    assert_eq!(det.frame_len(), 320);
    assert_eq!(det.transform_size(), 512);

    let reports = run(&mut det, &call_script(&config));
    assert_eq!(onsets(&reports), vec![27, 43]);
}

#[test]
fn no_onset_before_floor_is_established() {
    for window in [1, 5, 19, 20, 50] {
        let config = DetectorConfig::default().with_window_frames(window);
        let mut det = Detector::new(config.clone()).unwrap();
        let required = window.min(MIN_FLOOR_FRAMES);

        for frame in call_script(&config) {
            let r = det.analyze_chunk(&frame).unwrap();
            if r.onset {
                assert!(r.floor.is_some());
                assert!(det.history_len() >= required, "window={window}");
            }
            if det.history_len() < required {
                assert!(r.floor.is_none());
            }
        }
    }
}

#[test]
fn all_zero_stream_never_fires() {
    for encoding in [Encoding::Mulaw, Encoding::Pcm16] {
        let config = DetectorConfig::new(8_000, encoding);
        let mut det = Detector::new(config.clone()).unwrap();
        let frame = silence(&config);
        for _ in 0..500 {
            assert!(!det.process_chunk(&frame));
        }
        assert_eq!(det.history_len(), 0);
        assert!(!det.is_speaking());
    }
}

#[test]
fn reset_replays_like_a_fresh_detector() {
    let config = DetectorConfig::default();
    let script = call_script(&config);

    let mut fresh = Detector::new(config.clone()).unwrap();
    let expected = run(&mut fresh, &script);

    let mut reused = Detector::new(config.clone()).unwrap();
    run(&mut reused, &script);
    reused.reset();
    let replay = run(&mut reused, &script);

    assert_eq!(expected.len(), replay.len());
    for (a, b) in expected.iter().zip(&replay) {
        assert_eq!(a.frame_index, b.frame_index);
        assert_eq!(a.features, b.features);
        assert_eq!(a.floor, b.floor);
        assert_eq!(a.state, b.state);
        assert_eq!(a.onset, b.onset);
    }
}

#[test]
fn same_state_same_input_same_output() {
    let config = DetectorConfig::default();
    let script = call_script(&config);

    let mut a = Detector::new(config.clone()).unwrap();
    let mut b = Detector::new(config).unwrap();
    for frame in &script {
        assert_eq!(a.process_chunk(frame), b.process_chunk(frame));
    }
}

#[test]
fn short_chunks_do_not_advance_the_stream() {
    let config = DetectorConfig::default();
    let mut det = Detector::new(config.clone()).unwrap();
    let script = call_script(&config);

    let mut fired = Vec::new();
    for (i, frame) in script.iter().enumerate() {
        // A truncated chunk between every real frame changes nothing.
        assert!(!det.process_chunk(&frame[..frame.len() / 2]));
        if det.process_chunk(frame) {
            fired.push(i);
        }
    }
    assert_eq!(fired, vec![27, 43]);
}
