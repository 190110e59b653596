//! Example: Render a visualization from synthetic audio.
//!
//! This example generates a synthetic beat pattern and renders a short,
//! silent video for every design. Requires `ffmpeg` on `PATH`.
//!
//! Run with:
//!     cargo run --example render_synthetic

use std::path::PathBuf;

use wavecast::audio::generate_test_beat;
use wavecast::{default_params, AudioClip, ColorMode, DesignType, Pipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("Wavecast - Synthetic Audio Example");
    println!("==================================\n");

    let sample_rate: u32 = 44100;
    let duration_secs: f32 = 5.0;
    let bpm: f32 = 120.0;

    println!("Generating synthetic beat...");
    println!("  Sample rate: {} Hz", sample_rate);
    println!("  Duration: {} seconds", duration_secs);
    println!("  BPM: {}", bpm);

    let clip = AudioClip::new(generate_test_beat(bpm, sample_rate, duration_secs), sample_rate);
    println!("  Generated {} samples\n", clip.len());

    let out_dir = PathBuf::from("synthetic_demo");
    std::fs::create_dir_all(&out_dir)?;

    for (i, design_type) in DesignType::all().iter().enumerate() {
        let color_mode = ColorMode::all()[i % ColorMode::all().len()];
        let config = PipelineConfig {
            width: 640,
            height: 360,
            design: default_params(*design_type),
            color_mode,
            merge_audio: false,
            ..Default::default()
        };

        let output = out_dir.join(format!("{}.mp4", design_type.name()));
        println!("Rendering {} ({})...", design_type.name(), color_mode.name());
        let outcome = Pipeline::new(config).render(&clip, None, &output)?;
        println!("  {} frames -> {}", outcome.frames_written, outcome.path.display());
    }

    println!("\nDone! Play with: ffplay {}/spectrum-bars.mp4", out_dir.display());
    Ok(())
}
