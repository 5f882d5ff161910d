//! Integration tests for the host boundary, shader assembly, and the
//! headless GPU renderer (the GPU tests skip gracefully without an adapter).

use levelbar::{
    assemble_shader, FrameInput, LevelTracker, MeterConfig, MeterRenderer, MeterVariant,
    RenderOptions, StageFeatures,
};

fn small_options(meter: MeterConfig) -> RenderOptions {
    RenderOptions {
        width: 320,
        height: 180,
        background: [0.0, 0.0, 0.0],
        meter,
        ..Default::default()
    }
}

fn frame_for(options: &RenderOptions) -> FrameInput {
    FrameInput {
        level: [0.9, 0.7],
        loudness: 0.8,
        screen_size: [options.width as f32, options.height as f32],
        ..Default::default()
    }
}

// ==================== Shader assembly ====================

#[test]
fn test_shader_assembly_covers_every_flag_combination() {
    for loudness_override in [false, true] {
        for mouse_fade in [false, true] {
            for level_color_modulation in [false, true] {
                for variant in MeterVariant::all() {
                    let config = MeterConfig {
                        variant: *variant,
                        features: StageFeatures {
                            loudness_override,
                            mouse_fade,
                            level_color_modulation,
                        },
                    };
                    let source = assemble_shader(&config);
                    assert!(!source.contains("{{"), "{config:?}");
                    assert!(source.contains("fn vs_main"));
                    assert!(source.contains("fn fs_main"));
                }
            }
        }
    }
}

// ==================== Host boundary + level feed ====================

#[test]
fn test_tracker_feeds_valid_frames() {
    let mut tracker = LevelTracker::new(0.5);
    let window: Vec<f32> = (0..256)
        .map(|i| 0.6 * ((i as f32) * 0.1).sin())
        .collect();

    let mut input = FrameInput {
        screen_size: [640.0, 480.0],
        ..Default::default()
    };

    for _ in 0..10 {
        tracker.update(&window);
        tracker.apply(&mut input);
        let uniforms = input.to_uniforms().expect("tracked frame is valid");
        assert!(uniforms.level[0] >= 0.0);
        assert!(uniforms.loudness >= 0.0);
    }
}

// ==================== Headless renderer ====================

#[tokio::test]
async fn test_meter_frame_lights_pixels_for_nonzero_levels() {
    let options = small_options(MeterConfig::audio_reactive());
    let Ok(renderer) = MeterRenderer::new(options.clone()).await else {
        return; // no adapter on this machine
    };

    let pixels = renderer.render_frame(&frame_for(&options)).unwrap();
    assert_eq!(pixels.len(), (options.width * options.height * 4) as usize);
    let lit = pixels.chunks(4).filter(|p| p[0] > 0 || p[1] > 0 || p[2] > 0);
    assert!(lit.count() > 0, "bars should be visible");
}

#[tokio::test]
async fn test_triangle_variant_renders() {
    let options = small_options(MeterConfig::triangle());
    let Ok(renderer) = MeterRenderer::new(options.clone()).await else {
        return;
    };

    let pixels = renderer.render_frame(&frame_for(&options)).unwrap();
    // The triangle's colors survive untouched (identity fragment stage), so
    // pixels near the vertices sit close to full intensity.
    let near_saturated = pixels.chunks(4).any(|p| p[0] > 240 || p[1] > 240 || p[2] > 240);
    assert!(near_saturated, "triangle should render at full vertex color");
}

#[tokio::test]
async fn test_png_snapshot_written() {
    let options = small_options(MeterConfig::meter());
    let Ok(renderer) = MeterRenderer::new(options.clone()).await else {
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    renderer
        .render_png(&frame_for(&options), &path)
        .expect("snapshot should succeed");
    let meta = std::fs::metadata(&path).unwrap();
    assert!(meta.len() > 0);
}
