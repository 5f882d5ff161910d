//! Vertex stage: constant tables plus the uniform-driven substitutions.
//!
//! This is the CPU mirror of `vs_main` in `gpu/shaders/meter.wgsl`; the two
//! must stay in lockstep. The tables here are the authoritative statement of
//! the geometry: two triangle strips of four vertices each, column order
//! (top, bottom), left bar then right bar.

use super::{MeterConfig, MeterVariant, LEVEL_DAMPING};
use crate::frame::MeterUniforms;

/// Output of one vertex invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageVertex {
    /// Homogeneous clip-space position, z fixed at 0.0, w = 1.0.
    pub clip_position: [f32; 4],
    /// RGBA color handed to the rasterizer for interpolation.
    pub color: [f32; 4],
}

pub const TRIANGLE_VERTEX_COUNT: u32 = 3;
pub const METER_VERTEX_COUNT: u32 = 8;

/// Fixed y coordinate of every bar bottom.
pub const BAR_BOTTOM_Y: f32 = -0.9;

const TRIANGLE_POSITIONS: [[f32; 2]; 3] = [[0.0, 0.5], [-0.5, -0.5], [0.5, -0.5]];

const TRIANGLE_COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 1.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

// Top-vertex y entries (even indices) are placeholders; the stage substitutes
// the live signal for them on every invocation.
const METER_POSITIONS: [[f32; 2]; 8] = [
    [-0.8, 0.0],
    [-0.8, BAR_BOTTOM_Y],
    [-0.1, 0.0],
    [-0.1, BAR_BOTTOM_Y],
    [0.1, 0.0],
    [0.1, BAR_BOTTOM_Y],
    [0.8, 0.0],
    [0.8, BAR_BOTTOM_Y],
];

// Flat diagnostic colors per corner: bright tops, dark bottoms, one hue per
// bar so the two channels read apart at a glance.
const METER_COLORS: [[f32; 4]; 8] = [
    [0.0, 1.0, 0.4, 1.0],
    [0.0, 0.25, 0.1, 1.0],
    [0.0, 1.0, 0.4, 1.0],
    [0.0, 0.25, 0.1, 1.0],
    [0.0, 0.6, 1.0, 1.0],
    [0.0, 0.15, 0.25, 1.0],
    [0.0, 0.6, 1.0, 1.0],
    [0.0, 0.15, 0.25, 1.0],
];

/// Map a vertex index to its clip position and color.
///
/// Pure: the same `(vertex_index, uniforms, config)` always yields the same
/// output. Indices at or above `config.vertex_count()` are a host contract
/// violation and panic via table indexing.
pub fn vertex_stage(
    vertex_index: u32,
    uniforms: &MeterUniforms,
    config: &MeterConfig,
) -> StageVertex {
    let i = vertex_index as usize;

    if config.variant == MeterVariant::Triangle {
        let [x, y] = TRIANGLE_POSITIONS[i];
        return StageVertex {
            clip_position: [x, y, 0.0, 1.0],
            color: TRIANGLE_COLORS[i],
        };
    }

    let lvl_0 = LEVEL_DAMPING * uniforms.level[0];
    let lvl_1 = if config.features.loudness_override {
        uniforms.loudness
    } else {
        LEVEL_DAMPING * uniforms.level[1]
    };

    let [x, table_y] = METER_POSITIONS[i];
    let is_top = i % 2 == 0;
    let is_right_bar = i >= 4;

    let y = if is_top {
        if is_right_bar {
            lvl_1
        } else {
            lvl_0
        }
    } else {
        table_y
    };

    let mut color = METER_COLORS[i];
    if config.features.level_color_modulation && is_top {
        // Top colors carry the bar's raw driving signal, not the damped one.
        let signal = if is_right_bar {
            if config.features.loudness_override {
                uniforms.loudness
            } else {
                uniforms.level[1]
            }
        } else {
            uniforms.level[0]
        };
        color[0] *= signal;
        color[1] *= signal;
        color[2] *= signal;
    }

    StageVertex {
        clip_position: [x, y, 0.0, 1.0],
        color,
    }
}
