//! Integration tests for audio module.

use wavecast::audio::{
    average_amplitude, generate_click_track, generate_sine, generate_silence, generate_test_beat,
    generate_white_noise, Bands, BandSmoother, SpectrumAnalyzer, TemporalState, FFT_SIZE,
    HISTORY_CAPACITY,
};
use wavecast::pipeline::FramePlan;
use wavecast::{analyze_clip, AudioClip};

const SAMPLE_RATE: u32 = 44100;

fn peak_bin(spectrum: &[f32]) -> usize {
    spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

#[test]
fn test_sine_wave_spectrum_peak() {
    let freq = 1000.0;
    let samples = generate_sine(freq, SAMPLE_RATE, 1.0, 1.0);

    let mut analyzer = SpectrumAnalyzer::default();
    let spectrum = analyzer.analyze(&samples);
    let peak_freq = analyzer.bin_to_freq(peak_bin(&spectrum), SAMPLE_RATE);

    assert!(
        (peak_freq - freq).abs() < 50.0,
        "Expected peak at {} Hz, got {} Hz",
        freq,
        peak_freq
    );
}

#[test]
fn test_multiple_frequencies() {
    let low = generate_sine(200.0, SAMPLE_RATE, 0.1, 0.5);
    let high = generate_sine(8000.0, SAMPLE_RATE, 0.1, 0.5);
    let mixed: Vec<f32> = low.iter().zip(&high).map(|(a, b)| a + b).collect();

    let mut analyzer = SpectrumAnalyzer::default();
    let spectrum = analyzer.analyze(&mixed);

    let low_bin = analyzer.freq_to_bin(200.0, SAMPLE_RATE);
    let high_bin = analyzer.freq_to_bin(8000.0, SAMPLE_RATE);
    let floor = spectrum[(low_bin + high_bin) / 2];
    assert!(spectrum[low_bin] > floor * 10.0);
    assert!(spectrum[high_bin] > floor * 10.0);
}

#[test]
fn test_spectrum_is_half_transform_length() {
    let mut analyzer = SpectrumAnalyzer::default();
    assert_eq!(analyzer.analyze(&[0.3; 17]).len(), FFT_SIZE / 2);
    assert_eq!(analyzer.analyze(&[0.3; 5000]).len(), FFT_SIZE / 2);
    assert!(analyzer.analyze(&[]).iter().all(|&m| m == 0.0));
}

#[test]
fn test_silence_has_zero_bands() {
    let mut analyzer = SpectrumAnalyzer::default();
    let bins = analyzer.analyze(&generate_silence(SAMPLE_RATE, 0.05));
    assert_eq!(Bands::from_bins(&bins), Bands::default());
}

#[test]
fn test_low_tone_lands_in_bass_band() {
    let mut analyzer = SpectrumAnalyzer::default();
    let bins = analyzer.analyze(&generate_sine(110.0, SAMPLE_RATE, 0.05, 0.8));
    let bands = Bands::from_bins(&bins);
    assert!(bands.bass > bands.mid);
    assert!(bands.bass > bands.high);
}

#[test]
fn test_white_noise_reaches_every_band() {
    let mut analyzer = SpectrumAnalyzer::default();
    let bins = analyzer.analyze(&generate_white_noise(SAMPLE_RATE, 0.05, 0.5, 7));
    let bands = Bands::from_bins(&bins);
    assert!(bands.bass > 0.0 && bands.mid > 0.0 && bands.high > 0.0);
}

#[test]
fn test_smoothing_converges_toward_steady_input() {
    let mut smoother = BandSmoother::new();
    let target = Bands { bass: 10.0, mid: 4.0, high: 1.0 };

    let first = smoother.update(target);
    assert!((first.bass - 3.0).abs() < 1e-5);

    for _ in 0..60 {
        smoother.update(target);
    }
    assert!((smoother.current().bass - 10.0).abs() < 1e-3);
    assert!((smoother.current().high - 1.0).abs() < 1e-3);
}

#[test]
fn test_temporal_state_tracks_history_and_frames() {
    let samples = generate_test_beat(120.0, SAMPLE_RATE, 2.0);
    let plan = FramePlan::new(samples.len(), SAMPLE_RATE, 30);
    let mut analyzer = SpectrumAnalyzer::default();
    let mut state = TemporalState::new();

    for i in 0..plan.total_frames {
        state.advance(plan.block(&samples, i), &mut analyzer);
    }

    assert_eq!(state.frame(), plan.total_frames as u64);
    assert_eq!(state.history().len(), HISTORY_CAPACITY);
    let newest = state.history().recent(1).next().unwrap();
    assert_eq!(newest, plan.block(&samples, plan.total_frames - 1));
    assert!(state.levels().bass < 1.0);
}

#[test]
fn test_click_track_has_periodic_energy() {
    let samples = generate_click_track(120.0, SAMPLE_RATE, 2.0, 1000.0);
    let plan = FramePlan::new(samples.len(), SAMPLE_RATE, 30);

    let loud: Vec<usize> = (0..plan.total_frames)
        .filter(|&i| average_amplitude(plan.block(&samples, i)) > 0.01)
        .collect();
    // Two beats per second for two seconds.
    assert_eq!(loud.len(), 4);
    assert_eq!(loud[0], 0);
    assert_eq!(loud[1], 15);
}

#[test]
fn test_analyze_clip_reports_every_frame() {
    let clip = AudioClip::new(generate_sine(220.0, SAMPLE_RATE, 1.0, 0.5), SAMPLE_RATE);
    let snapshots = analyze_clip(&clip, 24).unwrap();

    assert_eq!(snapshots.len(), 24);
    assert_eq!(snapshots[0].time, 0.0);
    assert!((snapshots[12].time - 0.5).abs() < 1e-9);
    assert!(snapshots.iter().all(|s| (0.0..1.0).contains(&s.bass)));
    // Smoothing ramps the level up over the first frames.
    assert!(snapshots[0].bass < snapshots[5].bass);
}

#[test]
fn test_snapshots_serialize_to_json() {
    let clip = AudioClip::new(generate_sine(220.0, SAMPLE_RATE, 0.2, 0.5), SAMPLE_RATE);
    let snapshots = analyze_clip(&clip, 10).unwrap();
    let json = serde_json::to_string(&snapshots).unwrap();
    assert!(json.starts_with("[{\"time\":0.0,\"bass\":"));
}
