pub mod capabilities;
pub mod config;
pub mod error;
mod logging;
pub mod orchestrator;
pub mod physical_device;
pub mod platform;
pub mod queue_families;
pub mod shader;
pub mod surface_support;
pub mod swapchain;
pub mod vulkan;
pub mod window;

#[cfg(test)]
mod fake;

pub use config::NegotiationConfig;
pub use error::{NegotiationError, Result};
pub use logging::init_logging;
pub use orchestrator::{Orchestrator, QueueHandles, Stage};
pub use platform::{DeviceProbe, Platform};
pub use vulkan::VulkanPlatform;
