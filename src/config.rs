use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use ash::vk::{ColorSpaceKHR, Format, SurfaceFormatKHR};
use log::LevelFilter;
use serde::Deserialize;

use crate::physical_device::SelectionPolicy;

#[cfg(any(debug_assertions, feature = "enable_validations"))]
const ENABLE_VALIDATIONS: bool = true;
#[cfg(not(any(debug_assertions, feature = "enable_validations")))]
const ENABLE_VALIDATIONS: bool = false;

/// Everything the negotiation needs to know up front. Loaded from TOML;
/// any field left out keeps its default.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NegotiationConfig {
    pub window: WindowConfig,
    pub validation: ValidationConfig,
    pub device: DeviceConfig,
    pub swapchain: SwapchainConfig,
    /// SPIR-V files wrapped into shader modules once the device exists
    pub shaders: Vec<PathBuf>,
    pub log_level: LogLevel,
    /// sleep between event polls, in milliseconds
    pub poll_interval_ms: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Vulkan Triangle".to_owned(),
            resizable: false,
        }
    }
}

/// Layers default to `VK_LAYER_KHRONOS_validation`, which superseded the
/// older `VK_LAYER_LUNARG_standard_validation` meta-layer.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub enabled: bool,
    pub layers: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: ENABLE_VALIDATIONS,
            layers: vec!["VK_LAYER_KHRONOS_validation".to_owned()],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    pub extensions: Vec<String>,
    pub selection: SelectionPolicy,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["VK_KHR_swapchain".to_owned()],
            selection: SelectionPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwapchainConfig {
    pub preferred_format: FormatPreference,
    pub preferred_color_space: ColorSpacePreference,
}

impl SwapchainConfig {
    pub fn preferred_surface_format(&self) -> SurfaceFormatKHR {
        SurfaceFormatKHR {
            format: self.preferred_format.into(),
            color_space: self.preferred_color_space.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPreference {
    #[default]
    B8g8r8a8Unorm,
    B8g8r8a8Srgb,
    R8g8b8a8Unorm,
    R8g8b8a8Srgb,
    A2b10g10r10UnormPack32,
    R16g16b16a16Sfloat,
}

impl From<FormatPreference> for Format {
    fn from(preference: FormatPreference) -> Self {
        match preference {
            FormatPreference::B8g8r8a8Unorm => Format::B8G8R8A8_UNORM,
            FormatPreference::B8g8r8a8Srgb => Format::B8G8R8A8_SRGB,
            FormatPreference::R8g8b8a8Unorm => Format::R8G8B8A8_UNORM,
            FormatPreference::R8g8b8a8Srgb => Format::R8G8B8A8_SRGB,
            FormatPreference::A2b10g10r10UnormPack32 => Format::A2B10G10R10_UNORM_PACK32,
            FormatPreference::R16g16b16a16Sfloat => Format::R16G16B16A16_SFLOAT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpacePreference {
    #[default]
    SrgbNonlinear,
    ExtendedSrgbLinear,
    DisplayP3Nonlinear,
    Hdr10St2084,
}

impl From<ColorSpacePreference> for ColorSpaceKHR {
    fn from(preference: ColorSpacePreference) -> Self {
        match preference {
            ColorSpacePreference::SrgbNonlinear => ColorSpaceKHR::SRGB_NONLINEAR,
            ColorSpacePreference::ExtendedSrgbLinear => ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT,
            ColorSpacePreference::DisplayP3Nonlinear => ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT,
            ColorSpacePreference::Hdr10St2084 => ColorSpaceKHR::HDR10_ST2084_EXT,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl NegotiationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("In config file {}", path.display()))
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_ms.map(Duration::from_millis)
    }
}
