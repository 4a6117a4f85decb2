use std::fmt::Debug;

use ash::vk::{
    Extent2D, PhysicalDeviceProperties, PresentModeKHR, QueueFamilyProperties,
    SurfaceCapabilitiesKHR, SurfaceFormatKHR,
};

use crate::{error::Result, queue_families::QueueFamilyIndices, swapchain::SwapchainParameters};

/// Read-only queries about the adapters visible through one instance and
/// one presentation surface.
pub trait DeviceProbe {
    type Device: Copy + Debug;

    fn enumerate_devices(&self) -> Result<Vec<Self::Device>>;
    fn device_properties(&self, device: Self::Device) -> PhysicalDeviceProperties;
    fn queue_families(&self, device: Self::Device) -> Vec<QueueFamilyProperties>;
    fn supports_presentation(&self, device: Self::Device, family_index: u32) -> Result<bool>;
    fn device_extensions(&self, device: Self::Device) -> Result<Vec<String>>;
    fn surface_capabilities(&self, device: Self::Device) -> Result<SurfaceCapabilitiesKHR>;
    fn surface_formats(&self, device: Self::Device) -> Result<Vec<SurfaceFormatKHR>>;
    fn surface_present_modes(&self, device: Self::Device) -> Result<Vec<PresentModeKHR>>;
}

impl<T: DeviceProbe + ?Sized> DeviceProbe for &T {
    type Device = T::Device;

    fn enumerate_devices(&self) -> Result<Vec<Self::Device>> {
        (**self).enumerate_devices()
    }

    fn device_properties(&self, device: Self::Device) -> PhysicalDeviceProperties {
        (**self).device_properties(device)
    }

    fn queue_families(&self, device: Self::Device) -> Vec<QueueFamilyProperties> {
        (**self).queue_families(device)
    }

    fn supports_presentation(&self, device: Self::Device, family_index: u32) -> Result<bool> {
        (**self).supports_presentation(device, family_index)
    }

    fn device_extensions(&self, device: Self::Device) -> Result<Vec<String>> {
        (**self).device_extensions(device)
    }

    fn surface_capabilities(&self, device: Self::Device) -> Result<SurfaceCapabilitiesKHR> {
        (**self).surface_capabilities(device)
    }

    fn surface_formats(&self, device: Self::Device) -> Result<Vec<SurfaceFormatKHR>> {
        (**self).surface_formats(device)
    }

    fn surface_present_modes(&self, device: Self::Device) -> Result<Vec<PresentModeKHR>> {
        (**self).surface_present_modes(device)
    }
}

/// What the instance should be created with, after validation
pub struct InstanceRequest<'a> {
    pub extensions: &'a [String],
    pub layers: &'a [String],
    /// chain a debug messenger create-info so instance creation and
    /// destruction are reported too
    pub debug_messenger: bool,
}

/// The windowing + graphics binding the negotiation drives. Handles are
/// owned by whoever holds them; `destroy_*` consumes them.
pub trait Platform {
    type Instance;
    type DebugMessenger;
    type Surface;
    type PhysicalDevice: Copy + Debug;
    type Device;
    type Queue: Copy;
    type Swapchain;
    type Image: Copy;
    type ImageView;
    type ShaderModule;
    type Probe<'a>: DeviceProbe<Device = Self::PhysicalDevice>
    where
        Self: 'a;

    fn instance_extensions(&self) -> Result<Vec<String>>;
    fn instance_layers(&self) -> Result<Vec<String>>;
    /// Instance extensions the window system needs to present.
    fn window_extensions(&self) -> Result<Vec<String>>;
    /// Name of the diagnostic callback extension.
    fn debug_extension(&self) -> String;
    /// Size of the window's drawable area, in pixels.
    fn framebuffer_size(&self) -> Extent2D;

    fn create_instance(&mut self, request: &InstanceRequest<'_>) -> Result<Self::Instance>;
    fn install_debug_messenger(&mut self, instance: &Self::Instance) -> Result<Self::DebugMessenger>;
    fn create_surface(&mut self, instance: &Self::Instance) -> Result<Self::Surface>;
    fn probe<'a>(&'a self, instance: &'a Self::Instance, surface: &'a Self::Surface) -> Self::Probe<'a>;
    fn create_device(
        &mut self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        queue_families: &QueueFamilyIndices,
        extensions: &[String],
    ) -> Result<Self::Device>;
    fn device_queue(&self, device: &Self::Device, family_index: u32) -> Self::Queue;
    fn create_swapchain(
        &mut self,
        device: &Self::Device,
        surface: &Self::Surface,
        parameters: &SwapchainParameters,
        queue_families: &QueueFamilyIndices,
    ) -> Result<Self::Swapchain>;
    fn swapchain_images(
        &self,
        device: &Self::Device,
        swapchain: &Self::Swapchain,
    ) -> Result<Vec<Self::Image>>;
    fn create_image_view(
        &mut self,
        device: &Self::Device,
        image: Self::Image,
        parameters: &SwapchainParameters,
    ) -> Result<Self::ImageView>;
    fn create_shader_module(&mut self, device: &Self::Device, code: &[u32]) -> Result<Self::ShaderModule>;

    fn destroy_shader_module(&mut self, device: &Self::Device, shader_module: Self::ShaderModule);
    fn destroy_image_view(&mut self, device: &Self::Device, image_view: Self::ImageView);
    fn destroy_swapchain(&mut self, device: &Self::Device, swapchain: Self::Swapchain);
    fn destroy_device(&mut self, device: Self::Device);
    fn destroy_surface(&mut self, instance: &Self::Instance, surface: Self::Surface);
    fn destroy_debug_messenger(&mut self, instance: &Self::Instance, messenger: Self::DebugMessenger);
    fn destroy_instance(&mut self, instance: Self::Instance);
}
