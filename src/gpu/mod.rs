//! GPU rendering using wgpu.
//!
//! Headless pipeline for the procedural meter: one uniform binding, no
//! vertex buffers, feature flags baked into the WGSL at pipeline creation.

pub mod context;
pub mod pipeline;
pub mod renderer;
pub mod shader;

pub use context::{GpuContext, GpuError, GpuPreferences};
pub use pipeline::MeterPipeline;
pub use renderer::{MeterRenderer, RenderError, RenderOptions};
pub use shader::assemble_shader;
