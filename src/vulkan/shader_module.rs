use ash::vk::{ShaderModule, ShaderModuleCreateInfo};

use crate::error::{NegotiationError, Resource, Result};

use super::logical_device::VulkanDevice;

pub(super) fn create_shader_module(device: &VulkanDevice, code: &[u32]) -> Result<ShaderModule> {
    let create_info = ShaderModuleCreateInfo::default().code(code);
    unsafe { device.device.create_shader_module(&create_info, None) }
        .map_err(NegotiationError::creation(Resource::ShaderModule))
}

pub(super) fn destroy_shader_module(device: &VulkanDevice, shader_module: ShaderModule) {
    unsafe { device.device.destroy_shader_module(shader_module, None) }
}
