//! Host-side level extraction.
//!
//! The stages only ever see the uniform record; these helpers turn raw audio
//! sample windows into the `level` pair and `loudness` scalar that feed it.
//! Everything here is pure slice-in/scalar-out math so hosts can run it on
//! whatever capture thread they own.

use crate::frame::FrameInput;

/// RMS energy per channel over an interleaved stereo window.
///
/// An odd trailing sample is ignored. Empty input yields `[0.0, 0.0]`.
pub fn channel_rms(samples: &[f32]) -> [f32; 2] {
    let frames = samples.len() / 2;
    if frames == 0 {
        return [0.0, 0.0];
    }

    let mut sum_sq = [0.0f32; 2];
    for frame in samples.chunks_exact(2) {
        sum_sq[0] += frame[0] * frame[0];
        sum_sq[1] += frame[1] * frame[1];
    }

    [
        (sum_sq[0] / frames as f32).sqrt(),
        (sum_sq[1] / frames as f32).sqrt(),
    ]
}

/// Peak absolute amplitude over a window, any channel layout.
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, &s| peak.max(s.abs()))
}

/// Exponential smoother carrying per-channel levels and loudness between
/// frames, so the meter does not jitter at the audio callback rate.
#[derive(Debug, Clone)]
pub struct LevelTracker {
    smoothing: f32,
    level: [f32; 2],
    loudness: f32,
}

impl LevelTracker {
    /// `smoothing` is the per-update blend factor in (0, 1]; 1.0 tracks the
    /// input exactly, small values damp harder.
    pub fn new(smoothing: f32) -> Self {
        Self {
            smoothing: smoothing.clamp(f32::EPSILON, 1.0),
            level: [0.0, 0.0],
            loudness: 0.0,
        }
    }

    /// Fold one interleaved stereo window into the tracked values.
    pub fn update(&mut self, samples: &[f32]) {
        let rms = channel_rms(samples);
        let peak = peak_amplitude(samples);

        let s = self.smoothing;
        self.level[0] += s * (rms[0] - self.level[0]);
        self.level[1] += s * (rms[1] - self.level[1]);
        self.loudness += s * (peak - self.loudness);
    }

    pub fn level(&self) -> [f32; 2] {
        self.level
    }

    pub fn loudness(&self) -> f32 {
        self.loudness
    }

    /// Write the tracked values into a frame snapshot.
    pub fn apply(&self, input: &mut FrameInput) {
        input.level = self.level;
        input.loudness = self.loudness;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_rms_separates_channels() {
        // Left is a full-scale square wave, right is silent.
        let samples: Vec<f32> = (0..64)
            .flat_map(|i| [if i % 2 == 0 { 1.0 } else { -1.0 }, 0.0])
            .collect();
        let rms = channel_rms(&samples);
        assert!((rms[0] - 1.0).abs() < 1e-6);
        assert_eq!(rms[1], 0.0);
    }

    #[test]
    fn test_channel_rms_empty() {
        assert_eq!(channel_rms(&[]), [0.0, 0.0]);
        assert_eq!(channel_rms(&[0.5]), [0.0, 0.0]);
    }

    #[test]
    fn test_peak_amplitude_uses_magnitude() {
        assert_eq!(peak_amplitude(&[0.1, -0.8, 0.3]), 0.8);
        assert_eq!(peak_amplitude(&[]), 0.0);
    }

    #[test]
    fn test_tracker_converges_monotonically() {
        let mut tracker = LevelTracker::new(0.25);
        let window: Vec<f32> = vec![0.5; 128];

        let mut previous = 0.0;
        for _ in 0..32 {
            tracker.update(&window);
            let l = tracker.level()[0];
            assert!(l >= previous, "smoothed level regressed: {l} < {previous}");
            previous = l;
        }
        assert!((previous - 0.5).abs() < 1e-3);
        assert!((tracker.loudness() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_tracker_apply_feeds_frame_input() {
        let mut tracker = LevelTracker::new(1.0);
        tracker.update(&[0.6, 0.3, 0.6, 0.3]);

        let mut input = FrameInput::default();
        tracker.apply(&mut input);
        assert!((input.level[0] - 0.6).abs() < 1e-6);
        assert!((input.level[1] - 0.3).abs() < 1e-6);
        assert!((input.loudness - 0.6).abs() < 1e-6);
    }
}
