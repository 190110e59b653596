//! Deterministic test signals for tests, benches and demos.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample_count(sample_rate: u32, duration: f32) -> usize {
    (duration.max(0.0) * sample_rate as f32) as usize
}

/// Generate a sine wave of `amplitude` at `frequency` Hz.
pub fn generate_sine(frequency: f32, sample_rate: u32, duration: f32, amplitude: f32) -> Vec<f32> {
    let step = TAU * frequency / sample_rate.max(1) as f32;
    (0..sample_count(sample_rate, duration))
        .map(|i| amplitude * (step * i as f32).sin())
        .collect()
}

/// Generate seeded uniform white noise in `[-amplitude, amplitude)`.
pub fn generate_white_noise(sample_rate: u32, duration: f32, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..sample_count(sample_rate, duration))
        .map(|_| amplitude * rng.random_range(-1.0f32..1.0))
        .collect()
}

/// Generate digital silence.
pub fn generate_silence(sample_rate: u32, duration: f32) -> Vec<f32> {
    vec![0.0; sample_count(sample_rate, duration)]
}

/// Short decaying sine clicks at every beat of `bpm`.
pub fn generate_click_track(bpm: f32, sample_rate: u32, duration: f32, click_freq: f32) -> Vec<f32> {
    let mut samples = generate_silence(sample_rate, duration);
    let beat_len = ((60.0 / bpm.max(1.0)) * sample_rate as f32).max(1.0) as usize;
    let click = decaying_tone(sample_rate, 0.01, |_| click_freq, 2.0);

    for start in (0..samples.len()).step_by(beat_len) {
        mix_into(&mut samples, start, &click, 1.0);
    }
    samples
}

/// A pitched-down kick drum (150 Hz falling to 50 Hz over 150 ms).
pub fn generate_kick(sample_rate: u32) -> Vec<f32> {
    decaying_tone(sample_rate, 0.15, |t| 50.0 + 100.0 * (-t * 30.0).exp(), 15.0)
}

/// Four-on-the-floor kicks with noise hats on every eighth note.
///
/// Kicks drive the bass band, hats the high band. Output is peak-normalized
/// to at most 1.0.
pub fn generate_test_beat(bpm: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
    let mut samples = generate_silence(sample_rate, duration);
    let beat_len = ((60.0 / bpm.max(1.0)) * sample_rate as f32).max(2.0) as usize;
    let kick = generate_kick(sample_rate);
    let hat_len = sample_count(sample_rate, 0.04);
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for (step, start) in (0..samples.len()).step_by(beat_len / 2).enumerate() {
        if step % 2 == 0 {
            mix_into(&mut samples, start, &kick, 0.8);
        }
        let hat: Vec<f32> = (0..hat_len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (-t * 60.0).exp() * 0.3 * rng.random_range(-1.0f32..1.0)
            })
            .collect();
        mix_into(&mut samples, start, &hat, 1.0);
    }

    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak > 1.0 {
        samples.iter_mut().for_each(|s| *s /= peak);
    }
    samples
}

fn decaying_tone(sample_rate: u32, seconds: f32, freq: impl Fn(f32) -> f32, decay: f32) -> Vec<f32> {
    let mut phase = 0.0f32;
    (0..sample_count(sample_rate, seconds))
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            phase += TAU * freq(t) / sample_rate as f32;
            (-t * decay).exp() * phase.sin()
        })
        .collect()
}

fn mix_into(dst: &mut [f32], start: usize, src: &[f32], gain: f32) {
    if let Some(tail) = dst.get_mut(start..) {
        for (d, s) in tail.iter_mut().zip(src) {
            *d += s * gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine() {
        let samples = generate_sine(440.0, 44100, 1.0, 0.5);
        assert_eq!(samples.len(), 44100);

        let max = samples.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_white_noise_is_seeded() {
        let a = generate_white_noise(8000, 0.5, 1.0, 7);
        let b = generate_white_noise(8000, 0.5, 1.0, 7);
        let c = generate_white_noise(8000, 0.5, 1.0, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().any(|&s| s > 0.0) && a.iter().any(|&s| s < 0.0));
    }

    #[test]
    fn test_generate_silence() {
        let samples = generate_silence(44100, 0.5);
        assert_eq!(samples.len(), 22050);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_click_track_length() {
        let samples = generate_click_track(120.0, 44100, 2.0, 1000.0);
        assert_eq!(samples.len(), 88200);
        assert!(samples[0..100].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_kick_decays() {
        let kick = generate_kick(44100);
        let head = kick[..kick.len() / 10].iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let tail = kick[kick.len() / 2..].iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(head > tail, "Kick should decay over time");
    }

    #[test]
    fn test_beat_is_normalized() {
        let samples = generate_test_beat(120.0, 44100, 2.0);
        assert_eq!(samples.len(), 88200);
        let max = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(max <= 1.0 && max > 0.1);
    }

    #[test]
    fn test_zero_duration_is_empty() {
        assert!(generate_sine(440.0, 44100, 0.0, 1.0).is_empty());
        assert!(generate_test_beat(120.0, 44100, 0.0).is_empty());
    }
}
