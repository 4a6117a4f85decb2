use ash::{
    khr::swapchain,
    vk::{DeviceCreateInfo, DeviceQueueCreateInfo, PhysicalDevice, PhysicalDeviceFeatures, Queue},
    Device,
};
use tracing::debug;

use crate::{
    error::{CapabilityKind, NegotiationError, Resource, Result},
    queue_families::QueueFamilyIndices,
};

use super::instance::{as_pointers, to_c_strings, VulkanInstance};

/// The logical device plus the swap-chain loader bound to it
pub struct VulkanDevice {
    pub(super) device: Device,
    pub(super) swapchain_loader: swapchain::Device,
}

pub(super) fn create_device(
    instance: &VulkanInstance,
    physical_device: PhysicalDevice,
    queue_families: &QueueFamilyIndices,
    extensions: &[String],
) -> Result<VulkanDevice> {
    let priorities = [1.0f32];

    // one queue per distinct family; a shared family is only requested once
    let queue_infos = queue_families
        .unique_families()
        .into_iter()
        .map(|family_index| {
            DeviceQueueCreateInfo::default()
                .queue_family_index(family_index)
                .queue_priorities(&priorities)
        })
        .collect::<Vec<_>>();

    let extension_names = to_c_strings(extensions, CapabilityKind::DeviceExtension)?;
    let extension_name_pointers = as_pointers(&extension_names);
    let features = PhysicalDeviceFeatures::default();

    let device_create_info = DeviceCreateInfo::default()
        .queue_create_infos(&queue_infos)
        .enabled_extension_names(&extension_name_pointers)
        .enabled_features(&features);

    let device = unsafe {
        instance
            .instance
            .create_device(physical_device, &device_create_info, None)
    }
    .map_err(NegotiationError::creation(Resource::LogicalDevice))?;
    debug!(queues = queue_infos.len(), "Logical device created");

    let swapchain_loader = swapchain::Device::new(&instance.instance, &device);
    Ok(VulkanDevice {
        device,
        swapchain_loader,
    })
}

pub(super) fn device_queue(device: &VulkanDevice, family_index: u32) -> Queue {
    unsafe { device.device.get_device_queue(family_index, 0) }
}

pub(super) fn destroy_device(device: VulkanDevice) {
    unsafe { device.device.destroy_device(None) }
}
