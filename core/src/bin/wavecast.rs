use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use wavecast::audio::decode_audio_with;
use wavecast::{
    analyze_clip, default_params, parse_hex_color, ColorMode, DesignParams, DesignType,
    FrameGenerator, Pipeline, PipelineConfig, VideoCodec,
};

#[derive(Parser, Debug)]
#[command(name = "wavecast", about = "Audio-reactive visualizer video generator")]
struct Cli {
    /// Input audio file (anything ffmpeg can read)
    input: Option<PathBuf>,

    /// Output video file (or PNG with --preview-frame)
    #[arg(short, long, default_value = "output.mp4")]
    output: PathBuf,

    /// Visualization mode
    #[arg(short, long, default_value = "spectrum-bars")]
    mode: String,

    /// Color policy
    #[arg(short, long, default_value = "hue-rotation")]
    color: String,

    /// Frame size as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720")]
    size: String,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Video codec: h264, prores or vp9
    #[arg(long, default_value = "h264")]
    codec: String,

    /// Encoder CRF quality (lower = better)
    #[arg(long, default_value_t = 18)]
    crf: u32,

    /// JSON file with design parameters; its "mode" overrides --mode
    #[arg(long)]
    params: Option<PathBuf>,

    /// Seed for the design's random choices
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Background color as hex (e.g. #101018)
    #[arg(long, default_value = "#000000")]
    background: String,

    /// Sample rate the input is decoded at
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,

    /// Keep the video silent instead of merging the source audio
    #[arg(long)]
    no_merge: bool,

    /// Render only frame N and write it as a PNG to --output
    #[arg(long, value_name = "N")]
    preview_frame: Option<usize>,

    /// Print per-frame band levels as JSON and exit
    #[arg(long)]
    analyze: bool,

    /// List visualization modes and color policies, then exit
    #[arg(long)]
    list_modes: bool,

    /// ffmpeg executable used for decoding, encoding and merging
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_modes {
        println!("Visualization modes:");
        for design in DesignType::all() {
            let marker = if design.is_stateful() { "*" } else { " " };
            println!("  {:<18}{} {}", design.name(), marker, design.description());
        }
        println!("\nColor policies:");
        for mode in ColorMode::all() {
            println!("  {}", mode.name());
        }
        println!("\n* keeps state between frames");
        return Ok(());
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        bail!("Input file not found: {}", input.display());
    }

    let config = build_config(&cli)?;

    log::info!("Input: {}", input.display());
    let clip = decode_audio_with(&cli.ffmpeg, input, cli.sample_rate)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if cli.analyze {
        let snapshots = analyze_clip(&clip, config.fps)?;
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if let Some(index) = cli.preview_frame {
        let mut frames = FrameGenerator::new(&clip, &config);
        let total = frames.plan().total_frames;
        let frame = frames
            .nth(index)
            .with_context(|| format!("Frame {} is out of range (clip has {} frames)", index, total))?;
        frame
            .save_png(&cli.output)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        log::info!("Wrote frame {} to {}", index, cli.output.display());
        return Ok(());
    }

    let last_decile = Cell::new(0u32);
    let pipeline = Pipeline::new(config).with_progress(move |fraction| {
        let decile = (fraction * 10.0) as u32;
        if decile > last_decile.get() {
            last_decile.set(decile);
            log::info!("Progress: {}%", decile * 10);
        }
    });
    let outcome = pipeline
        .render(&clip, Some(input.as_path()), &cli.output)
        .context("Render failed")?;

    if outcome.frames_dropped > 0 {
        log::warn!("Encoder dropped {} frames", outcome.frames_dropped);
    }
    log::info!(
        "Done: {} ({} frames, audio {})",
        outcome.path.display(),
        outcome.frames_written,
        if outcome.audio_merged { "merged" } else { "not merged" }
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let (width, height) = parse_size(&cli.size)?;
    let codec = VideoCodec::from_str(&cli.codec)
        .with_context(|| format!("Unknown codec '{}'", cli.codec))?;
    let color_mode = ColorMode::from_str(&cli.color)
        .with_context(|| format!("Unknown color policy '{}'", cli.color))?;
    let background = parse_hex_color(&cli.background)
        .with_context(|| format!("Invalid background color '{}'", cli.background))?;

    let design = match &cli.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<DesignParams>(&text)
                .with_context(|| format!("Invalid design parameters in {}", path.display()))?
        }
        None => {
            let design = DesignType::from_str(&cli.mode).with_context(|| {
                format!("Unknown mode '{}' (see --list-modes)", cli.mode)
            })?;
            default_params(design)
        }
    };

    Ok(PipelineConfig {
        width,
        height,
        fps: cli.fps,
        codec,
        crf: Some(cli.crf),
        design,
        color_mode,
        background,
        seed: cli.seed,
        merge_audio: !cli.no_merge,
        ffmpeg: cli.ffmpeg.clone(),
        ..Default::default()
    })
}

fn parse_size(size: &str) -> Result<(u32, u32)> {
    let (w, h) = size
        .split_once(['x', 'X'])
        .with_context(|| format!("Size must look like 1280x720, got '{}'", size))?;
    let width = w.trim().parse().with_context(|| format!("Invalid width '{}'", w))?;
    let height = h.trim().parse().with_context(|| format!("Invalid height '{}'", h))?;
    Ok((width, height))
}
