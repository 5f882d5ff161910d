//! WGSL assembly.
//!
//! The template carries placeholder flag constants; baking them in at
//! pipeline creation keeps the uniform layout identical across every
//! configuration, so hosts never have to re-pack the record when they toggle
//! a feature.

use crate::meter::{MeterConfig, MeterVariant};

const METER_TEMPLATE: &str = include_str!("shaders/meter.wgsl");

fn bool_lit(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Bake a pipeline configuration into the shader template.
pub fn assemble_shader(config: &MeterConfig) -> String {
    let features = &config.features;
    let source = METER_TEMPLATE
        .replace(
            "{{variant_triangle}}",
            bool_lit(config.variant == MeterVariant::Triangle),
        )
        .replace(
            "{{loudness_override}}",
            bool_lit(features.loudness_override),
        )
        .replace("{{mouse_fade}}", bool_lit(features.mouse_fade))
        .replace(
            "{{level_color_modulation}}",
            bool_lit(features.level_color_modulation),
        );

    debug_assert!(
        !source.contains("{{"),
        "unsubstituted placeholder in shader template"
    );
    source
}
