use ash::vk::{
    CompositeAlphaFlagsKHR, ComponentMapping, ComponentSwizzle, Image, ImageAspectFlags,
    ImageSubresourceRange, ImageUsageFlags, ImageView, ImageViewCreateInfo, ImageViewType,
    SharingMode, SurfaceKHR, SwapchainCreateInfoKHR, SwapchainKHR,
};
use tracing::debug;

use crate::{
    error::{NegotiationError, Resource, Result},
    queue_families::QueueFamilyIndices,
    swapchain::SwapchainParameters,
};

use super::logical_device::VulkanDevice;

pub(super) fn create_swapchain(
    device: &VulkanDevice,
    surface: SurfaceKHR,
    parameters: &SwapchainParameters,
    queue_families: &QueueFamilyIndices,
) -> Result<SwapchainKHR> {
    let family_indices = queue_families.unique_families();
    let shared = queue_families.is_shared();
    let concurrent_indices: &[u32] = if shared { &[] } else { &family_indices };

    let create_info = SwapchainCreateInfoKHR::default()
        .surface(surface)
        .min_image_count(parameters.image_count)
        .image_format(parameters.surface_format.format)
        .image_color_space(parameters.surface_format.color_space)
        .image_extent(parameters.extent)
        // not stereoscopic
        .image_array_layers(1)
        .image_usage(ImageUsageFlags::COLOR_ATTACHMENT)
        .image_sharing_mode(if shared {
            SharingMode::EXCLUSIVE
        } else {
            SharingMode::CONCURRENT
        })
        .queue_family_indices(concurrent_indices)
        .pre_transform(parameters.pre_transform)
        // ignore alpha channel
        .composite_alpha(CompositeAlphaFlagsKHR::OPAQUE)
        .present_mode(parameters.present_mode)
        // discard pixels hidden by other windows
        .clipped(true);

    let swapchain = unsafe { device.swapchain_loader.create_swapchain(&create_info, None) }
        .map_err(NegotiationError::creation(Resource::SwapChain))?;
    debug!(
        images = parameters.image_count,
        width = parameters.extent.width,
        height = parameters.extent.height,
        "Swap chain created"
    );
    Ok(swapchain)
}

pub(super) fn swapchain_images(device: &VulkanDevice, swapchain: SwapchainKHR) -> Result<Vec<Image>> {
    unsafe { device.swapchain_loader.get_swapchain_images(swapchain) }
        .map_err(NegotiationError::query("vkGetSwapchainImagesKHR"))
}

pub(super) fn destroy_swapchain(device: &VulkanDevice, swapchain: SwapchainKHR) {
    unsafe { device.swapchain_loader.destroy_swapchain(swapchain, None) }
}

pub(super) fn create_image_view(
    device: &VulkanDevice,
    image: Image,
    parameters: &SwapchainParameters,
) -> Result<ImageView> {
    let create_info = ImageViewCreateInfo::default()
        .image(image)
        .view_type(ImageViewType::TYPE_2D)
        .format(parameters.surface_format.format)
        .components(ComponentMapping {
            r: ComponentSwizzle::IDENTITY,
            g: ComponentSwizzle::IDENTITY,
            b: ComponentSwizzle::IDENTITY,
            a: ComponentSwizzle::IDENTITY,
        })
        .subresource_range(ImageSubresourceRange {
            aspect_mask: ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        });
    unsafe { device.device.create_image_view(&create_info, None) }
        .map_err(NegotiationError::creation(Resource::ImageView))
}

pub(super) fn destroy_image_view(device: &VulkanDevice, image_view: ImageView) {
    unsafe { device.device.destroy_image_view(image_view, None) }
}
