use super::*;
use crate::foundation::random::StdRandom;

fn spec(duration_secs: f64, sample_rate: u32, min: f64, max: f64) -> ToneSpec {
    ToneSpec {
        duration_secs,
        sample_rate,
        min_freq_hz: min,
        max_freq_hz: max,
    }
}

#[test]
fn frame_count_is_rounded_product() {
    let mut rng = StdRandom::seeded(1);
    let tone = synthesize(&spec(1.0, 96_000, 400.0, 1000.0), &mut rng).unwrap();
    assert_eq!(tone.len_frames(), 96_000);
    assert_eq!(tone.interleaved.len(), 192_000);

    let tone = synthesize(&spec(0.3333, 1000, 400.0, 1000.0), &mut rng).unwrap();
    assert_eq!(tone.len_frames(), 333);

    let tone = synthesize(&spec(0.0125, 44_100, 400.0, 1000.0), &mut rng).unwrap();
    assert_eq!(tone.len_frames(), (44_100.0f64 * 0.0125).round() as usize);
}

#[test]
fn frequency_stays_in_range() {
    let mut rng = StdRandom::seeded(11);
    for _ in 0..64 {
        let tone = synthesize(&spec(0.01, 8_000, 400.0, 1000.0), &mut rng).unwrap();
        assert!((400.0..=1000.0).contains(&tone.frequency_hz));
    }
}

#[test]
fn degenerate_range_is_exact() {
    let mut rng = StdRandom::seeded(5);
    let tone = synthesize(&spec(1.0, 96_000, 400.0, 400.0), &mut rng).unwrap();
    assert_eq!(tone.frequency_hz, 400.0);
}

#[test]
fn channels_are_identical_and_bounded() {
    let mut rng = StdRandom::seeded(2);
    let tone = synthesize(&spec(0.05, 48_000, 400.0, 1000.0), &mut rng).unwrap();
    for i in 0..tone.len_frames() {
        let (l, r) = tone.frame(i).unwrap();
        assert_eq!(l, r);
        assert!(l.abs() <= 0.5 + 1e-6);
    }
    assert!(tone.frame(tone.len_frames()).is_none());
}

#[test]
fn samples_follow_the_sine_formula() {
    let mut rng = StdRandom::seeded(3);
    // 1 kHz at 8 kHz: 8 samples per period.
    let tone = synthesize(&spec(0.001, 8_000, 1000.0, 1000.0), &mut rng).unwrap();
    let left: Vec<f32> = (0..tone.len_frames())
        .map(|i| tone.frame(i).unwrap().0)
        .collect();
    assert_eq!(left.len(), 8);
    assert!(left[0].abs() < 1e-6);
    assert!((left[2] - 0.5).abs() < 1e-6);
    assert!(left[4].abs() < 1e-6);
    assert!((left[6] + 0.5).abs() < 1e-6);
}

#[test]
fn invalid_specs_are_rejected() {
    let mut rng = StdRandom::seeded(4);
    for bad in [
        spec(0.0, 96_000, 400.0, 1000.0),
        spec(-1.0, 96_000, 400.0, 1000.0),
        spec(1.0, 0, 400.0, 1000.0),
        spec(1.0, 96_000, 1000.0, 400.0),
        spec(1e-9, 1_000, 400.0, 1000.0),
    ] {
        let err = synthesize(&bad, &mut rng).unwrap_err();
        assert!(err.is_validation(), "{bad:?}: {err}");
    }
}

#[test]
fn absurd_duration_is_a_validation_error() {
    let mut rng = StdRandom::seeded(3);
    let err = synthesize(&spec(1e20, 96_000, 400.0, 1000.0), &mut rng).unwrap_err();
    assert!(err.is_validation(), "{err}");
}
