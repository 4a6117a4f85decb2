use ash::{
    khr::surface,
    vk::{
        PhysicalDevice, PhysicalDeviceProperties, PresentModeKHR, QueueFamilyProperties,
        SurfaceCapabilitiesKHR, SurfaceFormatKHR, SurfaceKHR,
    },
    Entry, Instance,
};
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};
use tracing::debug;

use crate::{
    capabilities::extension_names,
    error::{NegotiationError, Resource, Result},
    platform::DeviceProbe,
};

use super::instance::VulkanInstance;

/// # Safety
/// Both handles must stay valid until the returned surface is destroyed.
pub(super) unsafe fn create_surface(
    entry: &Entry,
    instance: &VulkanInstance,
    display_handle: RawDisplayHandle,
    window_handle: RawWindowHandle,
) -> Result<SurfaceKHR> {
    let surface = ash_window::create_surface(
        entry,
        &instance.instance,
        display_handle,
        window_handle,
        None,
    )
    .map_err(NegotiationError::creation(Resource::Surface))?;
    debug!("Surface created");
    Ok(surface)
}

pub(super) fn destroy_surface(instance: &VulkanInstance, surface: SurfaceKHR) {
    unsafe { instance.surface_loader.destroy_surface(surface, None) }
}

/// Adapter queries against one live instance and surface
pub struct VulkanProbe<'a> {
    instance: &'a Instance,
    surface_loader: &'a surface::Instance,
    surface: SurfaceKHR,
}

impl<'a> VulkanProbe<'a> {
    pub(super) fn new(instance: &'a VulkanInstance, surface: SurfaceKHR) -> Self {
        Self {
            instance: &instance.instance,
            surface_loader: &instance.surface_loader,
            surface,
        }
    }
}

impl DeviceProbe for VulkanProbe<'_> {
    type Device = PhysicalDevice;

    fn enumerate_devices(&self) -> Result<Vec<PhysicalDevice>> {
        unsafe { self.instance.enumerate_physical_devices() }
            .map_err(NegotiationError::query("vkEnumeratePhysicalDevices"))
    }

    fn device_properties(&self, device: PhysicalDevice) -> PhysicalDeviceProperties {
        unsafe { self.instance.get_physical_device_properties(device) }
    }

    fn queue_families(&self, device: PhysicalDevice) -> Vec<QueueFamilyProperties> {
        unsafe {
            self.instance
                .get_physical_device_queue_family_properties(device)
        }
    }

    fn supports_presentation(&self, device: PhysicalDevice, family_index: u32) -> Result<bool> {
        unsafe {
            self.surface_loader.get_physical_device_surface_support(
                device,
                family_index,
                self.surface,
            )
        }
        .map_err(NegotiationError::query("vkGetPhysicalDeviceSurfaceSupportKHR"))
    }

    fn device_extensions(&self, device: PhysicalDevice) -> Result<Vec<String>> {
        let properties = unsafe { self.instance.enumerate_device_extension_properties(device) }
            .map_err(NegotiationError::query("vkEnumerateDeviceExtensionProperties"))?;
        Ok(extension_names(&properties))
    }

    fn surface_capabilities(&self, device: PhysicalDevice) -> Result<SurfaceCapabilitiesKHR> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_capabilities(device, self.surface)
        }
        .map_err(NegotiationError::query("vkGetPhysicalDeviceSurfaceCapabilitiesKHR"))
    }

    fn surface_formats(&self, device: PhysicalDevice) -> Result<Vec<SurfaceFormatKHR>> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_formats(device, self.surface)
        }
        .map_err(NegotiationError::query("vkGetPhysicalDeviceSurfaceFormatsKHR"))
    }

    fn surface_present_modes(&self, device: PhysicalDevice) -> Result<Vec<PresentModeKHR>> {
        unsafe {
            self.surface_loader
                .get_physical_device_surface_present_modes(device, self.surface)
        }
        .map_err(NegotiationError::query("vkGetPhysicalDeviceSurfacePresentModesKHR"))
    }
}
