use ash::vk::{PresentModeKHR, SurfaceCapabilitiesKHR, SurfaceFormatKHR};

use crate::{error::Result, platform::DeviceProbe};

#[derive(Clone, Debug, Default)]
/// Details about what features the swap chain supports
/// for a given surface
pub struct SurfaceSupportDetails {
    pub capabilities: SurfaceCapabilitiesKHR,
    /// The formats (color depth settings) available to use.
    pub formats: Vec<SurfaceFormatKHR>,
    pub present_modes: Vec<PresentModeKHR>,
}

impl SurfaceSupportDetails {
    /// A swap chain can only be built if there is at least one format and
    /// one present mode to pick from.
    pub fn is_swap_chain_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// Queries for the details of what the swap chain supports given
/// the physical device and surface. Always hits the platform.
pub fn query_surface_support<P: DeviceProbe>(
    probe: &P,
    device: P::Device,
) -> Result<SurfaceSupportDetails> {
    let capabilities = probe.surface_capabilities(device)?;
    let formats = probe.surface_formats(device)?;
    let present_modes = probe.surface_present_modes(device)?;

    Ok(SurfaceSupportDetails {
        capabilities,
        formats,
        present_modes,
    })
}
