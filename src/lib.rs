//! Levelbar
//!
//! Procedural GPU bar meter driven entirely by a per-frame uniform record.
//! No vertex or index buffers: the vertex stage expands a fixed vertex count
//! (3 for the minimal triangle, 8 for the two-bar meter) from compile-time
//! tables perturbed by live input values.
//!
//! # Features
//!
//! - Pure CPU mirrors of the vertex and fragment stages for deterministic
//!   testing of every historical shading behavior
//! - One configurable pipeline (variant + feature flags) instead of separate
//!   shaders per revision
//! - Headless rendering via wgpu (Metal on macOS, Vulkan on Linux) with
//!   RGBA readback and PNG snapshots
//! - Host-side helpers for feeding the record: level extraction (RMS/peak
//!   smoothing) and boundary validation

pub mod frame;
pub mod gpu;
pub mod levels;
pub mod meter;

// Re-export commonly used types
pub use frame::{FrameError, FrameInput, MeterUniforms};
pub use gpu::{
    assemble_shader, GpuContext, GpuError, GpuPreferences, MeterPipeline, MeterRenderer,
    RenderError, RenderOptions,
};
pub use levels::{channel_rms, peak_amplitude, LevelTracker};
pub use meter::{
    fragment_stage, vertex_stage, MeterConfig, MeterVariant, StageFeatures, StageVertex,
    BAR_BOTTOM_Y, LEVEL_DAMPING, METER_VERTEX_COUNT, TRIANGLE_VERTEX_COUNT,
};
