//! Integration tests for the visualization design system.


use design_fixtures::*;
use wavecast::audio::generate_silence;
use wavecast::designs::{
    create_design, default_params, DesignParams, DesignType, FractalTreeParams,
    ParticleFlowDesign, ParticleFlowParams, SpectrumBarsParams, WaveformParams,
};
use wavecast::{AnalysisContext, ColorMode, Design};

// ==================== Design Factory Integration Tests ====================

#[test]
fn test_all_design_types_can_be_created() {
    for design_type in DesignType::all() {
        let design = create_design(&default_params(*design_type));
        assert_eq!(design.design_type(), *design_type);
    }
}

#[test]
fn test_default_params_match_design_type() {
    for design_type in DesignType::all() {
        assert_eq!(default_params(*design_type).design_type(), *design_type);
    }
}

#[test]
fn test_names_parse_back() {
    for design_type in DesignType::all() {
        assert_eq!(DesignType::from_str(design_type.name()), Some(*design_type));
    }
}

#[test]
fn test_params_load_from_json_file_contents() {
    let json = r#"{ "mode": "fractal-tree", "depth": 5 }"#;
    let params: DesignParams = serde_json::from_str(json).unwrap();
    assert_eq!(
        params,
        DesignParams::FractalTree(FractalTreeParams { depth: 5, ..Default::default() })
    );
    let design = create_design(&params);
    assert_eq!(design.design_type(), DesignType::FractalTree);
}

// ==================== Robustness ====================

#[test]
fn test_all_designs_tolerate_empty_blocks() {
    for design_type in DesignType::all() {
        let mut design = create_design(&default_params(*design_type));
        let mut ctx = test_context();
        for _ in 0..5 {
            ctx.advance(&[]);
            let mut frame = ctx.blank_frame();
            design.render(&mut ctx, &[], &mut frame);
            assert_eq!(
                lit_pixels(&frame),
                0,
                "{:?} drew on an empty block",
                design_type
            );
        }
    }
}

#[test]
fn test_all_designs_tolerate_short_blocks() {
    for design_type in DesignType::all() {
        let mut design = create_design(&default_params(*design_type));
        let mut ctx = test_context();
        let blocks: [&[f32]; 3] = [&[0.9], &[0.5, -0.5, 0.2], &[1.0; 7]];
        for block in blocks {
            ctx.advance(block);
            let mut frame = ctx.blank_frame();
            design.render(&mut ctx, block, &mut frame);
            assert_eq!(frame.as_bytes().len(), 320 * 240 * 3);
        }
    }
}

#[test]
fn test_all_designs_tolerate_tiny_frames() {
    for design_type in DesignType::all() {
        let mut design = create_design(&default_params(*design_type));
        let mut ctx = AnalysisContext::new(1, 1, ColorMode::Emotional, BACKGROUND, SEED);
        render_frames(design.as_mut(), &mut ctx, &beat(0.2));
    }
}

#[test]
fn test_all_designs_are_deterministic_per_seed() {
    let samples = beat(0.5);
    for design_type in DesignType::all() {
        let params = default_params(*design_type);
        let a = render_last(&params, &samples);
        let b = render_last(&params, &samples);
        assert_eq!(a.as_bytes(), b.as_bytes(), "{:?} is not deterministic", design_type);
    }
}

#[test]
fn test_all_designs_draw_on_a_beat() {
    let samples = beat(1.0);
    for design_type in DesignType::all() {
        let frames = {
            let mut design = create_design(&default_params(*design_type));
            let mut ctx = test_context();
            render_frames(design.as_mut(), &mut ctx, &samples)
        };
        let lit: usize = frames.iter().map(lit_pixels).sum();
        assert!(lit > 0, "{:?} drew nothing over a second of beat", design_type);
    }
}

#[test]
fn test_stateless_designs_report_no_entities() {
    for design_type in DesignType::all().iter().filter(|d| !d.is_stateful()) {
        let mut design = create_design(&default_params(*design_type));
        let mut ctx = test_context();
        render_frames(design.as_mut(), &mut ctx, &tone(0.2));
        assert_eq!(design.live_entities(), 0);
    }
}

// ==================== Spectrum Bars ====================

#[test]
fn test_bars_stay_dark_on_silence() {
    let params = DesignParams::SpectrumBars(SpectrumBarsParams::default());
    let frame = render_last(&params, &generate_silence(SAMPLE_RATE, 0.5));
    assert_eq!(lit_pixels(&frame), 0);
}

#[test]
fn test_bars_grow_from_the_bottom() {
    let params = DesignParams::SpectrumBars(SpectrumBarsParams { glow: false, ..Default::default() });
    let frame = render_last(&params, &tone(0.5));
    let (_, min_y, _, max_y) = lit_bounds(&frame).expect("tone should light some bars");
    assert_eq!(max_y, frame.height() - 1);
    assert!(min_y < frame.height() - 10);
}

#[test]
fn test_low_tone_favours_left_bars() {
    let params = DesignParams::SpectrumBars(SpectrumBarsParams {
        log_scale: false,
        glow: false,
        ..Default::default()
    });
    let frame = render_last(&params, &tone(0.5));
    let (left, right) = lit_halves(&frame);
    assert!(left > right, "left {} right {}", left, right);
}

#[test]
fn test_proportional_bars_load_from_json() {
    let json = r#"{ "mode": "spectrum-bars", "proportional": true }"#;
    let params: DesignParams = serde_json::from_str(json).unwrap();
    assert_eq!(
        params,
        DesignParams::SpectrumBars(SpectrumBarsParams { proportional: true, ..Default::default() })
    );
    let frame = render_last(&params, &tone(0.5));
    assert!(lit_pixels(&frame) > 0);
}

// ==================== Waveform ====================

#[test]
fn test_silent_waveform_is_a_flat_center_line() {
    let params = DesignParams::Waveform(WaveformParams::default());
    let frame = render_last(&params, &generate_silence(SAMPLE_RATE, 0.2));
    let (min_x, min_y, max_x, max_y) = lit_bounds(&frame).expect("flat line should be drawn");
    let mid = frame.height() / 2;
    assert!(min_x <= 1 && max_x >= frame.width() - 2);
    assert!(min_y + 3 >= mid && max_y <= mid + 3);
}

#[test]
fn test_loud_waveform_spans_vertically() {
    let params = DesignParams::Waveform(WaveformParams::default());
    let frame = render_last(&params, &tone(0.2));
    let (_, min_y, _, max_y) = lit_bounds(&frame).unwrap();
    assert!(max_y - min_y > frame.height() / 4);
}

// ==================== Particle Flow ====================

#[test]
fn test_silence_spawns_no_particles() {
    let mut design = ParticleFlowDesign::new(ParticleFlowParams::default());
    let mut ctx = test_context();
    let frames = render_frames(&mut design, &mut ctx, &generate_silence(SAMPLE_RATE, 0.5));

    assert_eq!(frames.len(), 15);
    assert_eq!(design.pool().spawned(), 0);
    assert_eq!(design.live_entities(), 0);
    assert!(frames.iter().all(|f| lit_pixels(f) == 0));
}

#[test]
fn test_particles_respect_pool_capacity() {
    let params = ParticleFlowParams {
        max_particles: 50,
        max_spawn_per_frame: 40,
        decay: 0.001,
        ..Default::default()
    };
    let mut design = ParticleFlowDesign::new(params);
    let mut ctx = square_context();
    render_frames(&mut design, &mut ctx, &beat(1.0));

    assert!(design.pool().spawned() > 0);
    assert!(design.live_entities() <= 50);
}

#[test]
fn test_seed_changes_particle_layout() {
    let samples = beat(0.5);
    let render_with = |seed| {
        let mut design = ParticleFlowDesign::new(ParticleFlowParams::default());
        let mut ctx = AnalysisContext::new(320, 240, ColorMode::HueRotation, BACKGROUND, seed);
        render_frames(&mut design, &mut ctx, &samples).pop().unwrap()
    };
    assert_ne!(render_with(1).as_bytes(), render_with(2).as_bytes());
}

// ==================== Kaleidoscope ====================

#[test]
fn test_kaleidoscope_is_balanced_about_the_center() {
    let params = default_params(DesignType::Kaleidoscope);
    let mut design = create_design(&params);
    let mut ctx = square_context();
    let frame = render_frames(design.as_mut(), &mut ctx, &tone(0.3)).pop().unwrap();

    let (left, right) = lit_halves(&frame);
    assert!(left > 0 && right > 0);
    let ratio = left as f32 / right as f32;
    assert!((0.7..1.4).contains(&ratio), "left {} right {}", left, right);
}
