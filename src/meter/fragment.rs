//! Fragment stage: screen-space fades over the interpolated vertex color.
//!
//! CPU mirror of `fs_main` in `gpu/shaders/meter.wgsl`. `frag_position` is in
//! framebuffer pixels, the space WGSL's `@builtin(position)` reports, so the
//! fade denominators come straight from `screen_size`.

use super::{MeterConfig, MeterVariant};
use crate::frame::MeterUniforms;

/// Map an interpolated fragment to its output color.
///
/// Triangle variant is the identity. The meter variant darkens
/// quadratically toward the top of the screen, and optionally by distance
/// from the pointer. The multiplication covers all four components; alpha is
/// carried through unclamped.
pub fn fragment_stage(
    frag_position: [f32; 2],
    color: [f32; 4],
    uniforms: &MeterUniforms,
    config: &MeterConfig,
) -> [f32; 4] {
    if config.variant == MeterVariant::Triangle {
        return color;
    }

    let y_fade = frag_position[1] / uniforms.screen_size[1];
    let mut fade = y_fade * y_fade;

    if config.features.mouse_fade {
        let dx = frag_position[0] - uniforms.mouse_pos[0];
        let dy = frag_position[1] - uniforms.mouse_pos[1];
        let dist = (dx * dx + dy * dy).sqrt();
        fade *= dist / uniforms.screen_size[0].max(uniforms.screen_size[1]);
    }

    [
        color[0] * fade,
        color[1] * fade,
        color[2] * fade,
        color[3] * fade,
    ]
}
