//! Per-frame uniform record and the host boundary around it.
//!
//! The uniform record is the only channel between host state (audio levels,
//! pointer, clock, window size) and the shading stages. The host overwrites
//! it before every draw; the stages only read it.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Errors raised when a host frame snapshot violates the uniform contract.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("screen size must be finite and positive, got {0}x{1}")]
    InvalidScreenSize(f32, f32),
}

/// Uniform record read by both stages.
///
/// Field order and packing are the bit-exact contract with the WGSL side:
/// the three `vec2` fields come first, then the scalars, for 32 bytes total.
/// Do not reorder.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeterUniforms {
    /// Two independent normalized meter levels (e.g. left/right channel).
    pub level: [f32; 2],
    /// Pointer position in framebuffer pixels.
    pub mouse_pos: [f32; 2],
    /// Framebuffer width/height in pixels. Non-zero by host contract.
    pub screen_size: [f32; 2],
    /// Monotonic seconds since start. Reserved for animation.
    pub time: f32,
    /// Instantaneous loudness scalar driving the right-bar override.
    pub loudness: f32,
}

/// Host-side snapshot of everything that feeds one frame.
///
/// `to_uniforms` is the validation boundary: the stages themselves never
/// clamp or reject anything (unclamped levels produce visual overflow, which
/// is intended), so out-of-contract values must be caught here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub level: [f32; 2],
    pub mouse_pos: [f32; 2],
    pub screen_size: [f32; 2],
    pub time: f32,
    pub loudness: f32,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            level: [0.0, 0.0],
            mouse_pos: [0.0, 0.0],
            screen_size: [1920.0, 1080.0],
            time: 0.0,
            loudness: 0.0,
        }
    }
}

impl FrameInput {
    /// Validate the snapshot and produce the uniform record.
    ///
    /// Rejects screen sizes that would make the fragment fade divide by
    /// zero (or worse). Levels and loudness pass through unclamped.
    pub fn to_uniforms(&self) -> Result<MeterUniforms, FrameError> {
        let [w, h] = self.screen_size;
        if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
            return Err(FrameError::InvalidScreenSize(w, h));
        }

        Ok(MeterUniforms {
            level: self.level,
            mouse_pos: self.mouse_pos,
            screen_size: self.screen_size,
            time: self.time,
            loudness: self.loudness,
        })
    }

    /// Copy of the snapshot with `level` and `loudness` clamped into [0, 1].
    ///
    /// Clamping only ever happens here at the host boundary. Hosts that want
    /// the raw overflow visuals simply skip this call.
    pub fn clamped(mut self) -> Self {
        self.level[0] = self.level[0].clamp(0.0, 1.0);
        self.level[1] = self.level[1].clamp(0.0, 1.0);
        self.loudness = self.loudness.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_uniform_record_layout() {
        // The bit-exact contract with the WGSL struct.
        assert_eq!(size_of::<MeterUniforms>(), 32);
        assert_eq!(offset_of!(MeterUniforms, level), 0);
        assert_eq!(offset_of!(MeterUniforms, mouse_pos), 8);
        assert_eq!(offset_of!(MeterUniforms, screen_size), 16);
        assert_eq!(offset_of!(MeterUniforms, time), 24);
        assert_eq!(offset_of!(MeterUniforms, loudness), 28);
    }

    #[test]
    fn test_zero_screen_size_rejected() {
        let input = FrameInput {
            screen_size: [800.0, 0.0],
            ..Default::default()
        };
        assert!(matches!(
            input.to_uniforms(),
            Err(FrameError::InvalidScreenSize(_, _))
        ));
    }

    #[test]
    fn test_non_finite_screen_size_rejected() {
        for bad in [f32::NAN, f32::INFINITY, -1.0] {
            let input = FrameInput {
                screen_size: [bad, 600.0],
                ..Default::default()
            };
            assert!(input.to_uniforms().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_levels_pass_through_unclamped() {
        let input = FrameInput {
            level: [1.5, -0.25],
            loudness: 2.0,
            ..Default::default()
        };
        let uniforms = input.to_uniforms().unwrap();
        assert_eq!(uniforms.level, [1.5, -0.25]);
        assert_eq!(uniforms.loudness, 2.0);
    }

    #[test]
    fn test_clamped_is_boundary_only() {
        let input = FrameInput {
            level: [1.5, -0.25],
            loudness: 2.0,
            ..Default::default()
        };
        let clamped = input.clamped();
        assert_eq!(clamped.level, [1.0, 0.0]);
        assert_eq!(clamped.loudness, 1.0);
        // The original snapshot is untouched (Copy semantics).
        assert_eq!(input.level, [1.5, -0.25]);
    }
}
