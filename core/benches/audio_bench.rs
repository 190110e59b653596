//! Benchmarks for audio processing operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wavecast::audio::{
    generate_sine, generate_test_beat, generate_white_noise, Bands, BandSmoother,
    SpectrumAnalyzer, TemporalState,
};
use wavecast::{analyze_clip, AudioClip};

const SAMPLE_RATE: u32 = 44100;

fn bench_fft_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT Analysis");
    let samples = generate_sine(1000.0, SAMPLE_RATE, 1.0, 1.0);

    // Frame-sized blocks are zero-padded up to the transform length.
    for block in [735, 1470, 2048] {
        group.throughput(Throughput::Elements(block as u64));
        group.bench_with_input(BenchmarkId::new("analyze_into", block), &block, |b, &len| {
            let mut analyzer = SpectrumAnalyzer::default();
            let mut bins = Vec::new();
            b.iter(|| {
                analyzer.analyze_into(black_box(&samples[..len]), &mut bins);
                black_box(&bins);
            });
        });
    }

    group.finish();
}

fn bench_band_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Band Smoothing");

    let samples = generate_white_noise(SAMPLE_RATE, 1.0, 1.0, 42);
    let bins = SpectrumAnalyzer::default().analyze(&samples);

    group.bench_function("from_bins", |b| {
        b.iter(|| black_box(Bands::from_bins(black_box(&bins))));
    });

    group.bench_function("smoother_update", |b| {
        let mut smoother = BandSmoother::new();
        let instant = Bands::from_bins(&bins);
        b.iter(|| black_box(smoother.update(black_box(instant))));
    });

    group.finish();
}

fn bench_temporal_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("Temporal State");
    let samples = generate_test_beat(120.0, SAMPLE_RATE, 1.0);

    group.bench_function("advance_30fps_block", |b| {
        let mut analyzer = SpectrumAnalyzer::default();
        let mut state = TemporalState::new();
        let block = &samples[..1470];
        b.iter(|| state.advance(black_box(block), &mut analyzer));
    });

    group.finish();
}

fn bench_clip_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Clip Analysis");

    for duration in [2.0, 5.0] {
        let clip = AudioClip::new(generate_test_beat(120.0, SAMPLE_RATE, duration), SAMPLE_RATE);

        group.throughput(Throughput::Elements(clip.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("analyze_clip", format!("{}s", duration)),
            &clip,
            |b, clip| {
                b.iter(|| black_box(analyze_clip(clip, 30)));
            },
        );
    }

    group.finish();
}

fn bench_synth_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Audio Synthesis");

    group.bench_function("sine_1s", |b| {
        b.iter(|| {
            black_box(generate_sine(440.0, SAMPLE_RATE, 1.0, 1.0));
        });
    });

    group.bench_function("white_noise_1s", |b| {
        b.iter(|| {
            black_box(generate_white_noise(SAMPLE_RATE, 1.0, 1.0, 42));
        });
    });

    group.bench_function("test_beat_2s", |b| {
        b.iter(|| {
            black_box(generate_test_beat(120.0, SAMPLE_RATE, 2.0));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fft_analysis,
    bench_band_smoothing,
    bench_temporal_state,
    bench_clip_analysis,
    bench_synth_generation,
);
criterion_main!(benches);
