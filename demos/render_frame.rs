//! Demo: render one audio-reactive meter frame headlessly and save a PNG.
//!
//! Run with:
//!     cargo run --example render_frame

use levelbar::{FrameInput, LevelTracker, MeterConfig, MeterRenderer, RenderOptions};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = RenderOptions {
        width: 800,
        height: 600,
        background: [0.02, 0.02, 0.03],
        meter: MeterConfig::audio_reactive(),
        ..Default::default()
    };
    println!("render options:\n{}", serde_json::to_string_pretty(&options)?);

    // Synthesize a short burst of stereo audio and track levels from it the
    // way a live host would between frames.
    let mut tracker = LevelTracker::new(0.3);
    for step in 0..30 {
        let t0 = step as f32 * 0.02;
        let window: Vec<f32> = (0..1024)
            .flat_map(|i| {
                let t = t0 + i as f32 / 48000.0;
                let left = 0.8 * (2.0 * std::f32::consts::PI * 220.0 * t).sin();
                let right = 0.5 * (2.0 * std::f32::consts::PI * 330.0 * t).sin();
                [left, right]
            })
            .collect();
        tracker.update(&window);
    }

    let mut input = FrameInput {
        screen_size: [options.width as f32, options.height as f32],
        mouse_pos: [options.width as f32 / 2.0, options.height as f32 / 2.0],
        time: 0.6,
        ..Default::default()
    };
    tracker.apply(&mut input);
    println!(
        "frame input: level=({:.3}, {:.3}) loudness={:.3}",
        input.level[0], input.level[1], input.loudness
    );

    let renderer = pollster::block_on(MeterRenderer::new(options))?;
    println!("adapter: {}", renderer.adapter_info().name);

    let output = "meter_frame.png";
    renderer.render_png(&input, output)?;
    println!("wrote {output}");

    Ok(())
}
