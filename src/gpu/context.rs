//! Headless GPU acquisition.
//!
//! The meter never owns a window or surface, so there is no compatible-surface
//! constraint here: adapter selection is driven entirely by the host through
//! [`GpuPreferences`] on the render options.

use serde::{Deserialize, Serialize};
use wgpu::{Adapter, Device, Queue};

/// Errors raised while acquiring the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no usable GPU adapter found")]
    NoAdapter,
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Adapter selection knobs, part of the host-facing render options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GpuPreferences {
    /// Prefer an integrated adapter over a discrete one. A meter frame is
    /// eight vertices; hosts embedding the meter alongside heavier work may
    /// want to leave the discrete GPU alone.
    pub low_power: bool,
    /// Retry with a software fallback adapter when no hardware adapter
    /// exists (headless CI runners).
    pub allow_fallback: bool,
}

impl GpuPreferences {
    fn power_preference(&self) -> wgpu::PowerPreference {
        if self.low_power {
            wgpu::PowerPreference::LowPower
        } else {
            wgpu::PowerPreference::HighPerformance
        }
    }
}

/// Device and queue backing the headless meter renderer.
pub struct GpuContext {
    adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Acquire an adapter per the given preferences and open a device on it.
    pub async fn new(prefs: GpuPreferences) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let mut request = wgpu::RequestAdapterOptions {
            power_preference: prefs.power_preference(),
            force_fallback_adapter: false,
            compatible_surface: None,
        };

        let adapter = match instance.request_adapter(&request).await {
            Ok(adapter) => adapter,
            Err(_) if prefs.allow_fallback => {
                log::warn!("no hardware adapter, retrying with software fallback");
                request.force_fallback_adapter = true;
                instance
                    .request_adapter(&request)
                    .await
                    .map_err(|_| GpuError::NoAdapter)?
            }
            Err(_) => return Err(GpuError::NoAdapter),
        };

        let info = adapter.get_info();
        log::info!("meter GPU: \"{}\" ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("levelbar_meter"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Info about the adapter backing this context.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_preference_follows_low_power_knob() {
        assert_eq!(
            GpuPreferences::default().power_preference(),
            wgpu::PowerPreference::HighPerformance
        );
        let low = GpuPreferences {
            low_power: true,
            ..Default::default()
        };
        assert_eq!(low.power_preference(), wgpu::PowerPreference::LowPower);
    }

    #[tokio::test]
    async fn test_context_with_fallback_allowed() {
        let prefs = GpuPreferences {
            allow_fallback: true,
            ..Default::default()
        };
        // Skips silently on machines with no adapter at all.
        if let Ok(ctx) = GpuContext::new(prefs).await {
            assert!(!ctx.adapter_info().name.is_empty());
        }
    }
}
