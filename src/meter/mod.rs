//! Procedural meter stages.
//!
//! There is no CPU-side mesh: a fixed vertex count is expanded by the vertex
//! stage from compile-time tables whose reactive entries are substituted with
//! uniform values on every invocation. This module holds the variant and
//! feature-flag types shared by the pure stage functions and the GPU
//! pipeline, so each historically observed behavior stays selectable.

mod fragment;
mod vertex;

pub use fragment::fragment_stage;
pub use vertex::{
    vertex_stage, StageVertex, BAR_BOTTOM_Y, METER_VERTEX_COUNT, TRIANGLE_VERTEX_COUNT,
};

use serde::{Deserialize, Serialize};

/// Damping applied to `level` before it becomes a bar-top y coordinate,
/// keeping bar tops off the viewport edge.
pub const LEVEL_DAMPING: f32 = 0.9;

/// Shape drawn by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeterVariant {
    /// Single colored triangle, no post-processing.
    Triangle,
    /// Two side-by-side bars whose tops follow the uniform record.
    Meter,
}

impl MeterVariant {
    /// Vertex count the host must request for this variant.
    ///
    /// The vertex tables have exactly this many entries; drawing more is a
    /// contract violation, not a handled condition.
    pub fn vertex_count(&self) -> u32 {
        match self {
            Self::Triangle => TRIANGLE_VERTEX_COUNT,
            Self::Meter => METER_VERTEX_COUNT,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "triangle" | "tri" => Some(Self::Triangle),
            "meter" | "bars" => Some(Self::Meter),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Meter => "meter",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Triangle, Self::Meter]
    }
}

/// Toggles for the shading behaviors observed across revisions.
///
/// The defaults are all-off; presets on [`MeterConfig`] reproduce each
/// revision. `mouse_fade` is retained even though the last revision shipped
/// with it disabled, so hosts can re-enable the interactive fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageFeatures {
    /// Both right-bar top vertices take `loudness` directly, undamped,
    /// instead of the damped `level[1]`.
    pub loudness_override: bool,
    /// Multiply fragments by normalized distance from the pointer.
    pub mouse_fade: bool,
    /// Scale bar-top colors by the bar's driving signal.
    pub level_color_modulation: bool,
}

/// Full pipeline configuration: variant plus feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterConfig {
    pub variant: MeterVariant,
    pub features: StageFeatures,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self::audio_reactive()
    }
}

impl MeterConfig {
    /// First revision: plain colored triangle, identity fragment stage.
    pub fn triangle() -> Self {
        Self {
            variant: MeterVariant::Triangle,
            features: StageFeatures::default(),
        }
    }

    /// Second revision: two-bar meter with level-driven top colors.
    pub fn meter() -> Self {
        Self {
            variant: MeterVariant::Meter,
            features: StageFeatures {
                level_color_modulation: true,
                ..Default::default()
            },
        }
    }

    /// Last revision: loudness drives the right bar, flat colors,
    /// mouse fade present but off.
    pub fn audio_reactive() -> Self {
        Self {
            variant: MeterVariant::Meter,
            features: StageFeatures {
                loudness_override: true,
                ..Default::default()
            },
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.variant.vertex_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_str_parsing() {
        assert_eq!(MeterVariant::from_str("meter"), Some(MeterVariant::Meter));
        assert_eq!(MeterVariant::from_str("BARS"), Some(MeterVariant::Meter));
        assert_eq!(
            MeterVariant::from_str("triangle"),
            Some(MeterVariant::Triangle)
        );
        assert_eq!(MeterVariant::from_str("invalid"), None);
    }

    #[test]
    fn test_vertex_counts() {
        assert_eq!(MeterVariant::Triangle.vertex_count(), 3);
        assert_eq!(MeterVariant::Meter.vertex_count(), 8);
    }

    #[test]
    fn test_presets_match_lineage() {
        let triangle = MeterConfig::triangle();
        assert_eq!(triangle.variant, MeterVariant::Triangle);
        assert_eq!(triangle.features, StageFeatures::default());

        let meter = MeterConfig::meter();
        assert!(meter.features.level_color_modulation);
        assert!(!meter.features.loudness_override);

        let reactive = MeterConfig::audio_reactive();
        assert!(reactive.features.loudness_override);
        assert!(!reactive.features.mouse_fade);
        assert!(!reactive.features.level_color_modulation);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = MeterConfig::audio_reactive();
        let json = serde_json::to_string(&config).unwrap();
        let back: MeterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
