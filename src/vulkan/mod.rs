//! The real Vulkan binding, loaded at runtime through ash.

mod debug_utils;
mod instance;
mod logical_device;
mod shader_module;
mod surface;
mod swap_chain;

use std::ffi::CStr;

use ash::{
    vk::{Extent2D, Image, ImageView, PhysicalDevice, Queue, ShaderModule, SurfaceKHR, SwapchainKHR},
    Entry,
};
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::{
    error::{NegotiationError, Result},
    platform::{InstanceRequest, Platform},
    queue_families::QueueFamilyIndices,
    swapchain::SwapchainParameters,
};

pub use debug_utils::VulkanDebugMessenger;
pub use instance::VulkanInstance;
pub use logical_device::VulkanDevice;
pub use surface::VulkanProbe;

pub struct VulkanPlatform {
    entry: Entry,
    display_handle: RawDisplayHandle,
    window_handle: RawWindowHandle,
    framebuffer_size: Extent2D,
}

impl VulkanPlatform {
    /// Loads the Vulkan library and binds it to one window.
    ///
    /// # Safety
    /// The display and window behind the handles must outlive every
    /// resource created through this platform.
    pub unsafe fn new(
        display_handle: RawDisplayHandle,
        window_handle: RawWindowHandle,
        framebuffer_size: Extent2D,
    ) -> Result<Self> {
        let entry =
            Entry::load().map_err(|err| NegotiationError::LoaderUnavailable(err.to_string()))?;
        Ok(Self {
            entry,
            display_handle,
            window_handle,
            framebuffer_size,
        })
    }
}

impl Platform for VulkanPlatform {
    type Instance = VulkanInstance;
    type DebugMessenger = VulkanDebugMessenger;
    type Surface = SurfaceKHR;
    type PhysicalDevice = PhysicalDevice;
    type Device = VulkanDevice;
    type Queue = Queue;
    type Swapchain = SwapchainKHR;
    type Image = Image;
    type ImageView = ImageView;
    type ShaderModule = ShaderModule;
    type Probe<'a> = VulkanProbe<'a>;

    fn instance_extensions(&self) -> Result<Vec<String>> {
        instance::available_extensions(&self.entry)
    }

    fn instance_layers(&self) -> Result<Vec<String>> {
        instance::available_layers(&self.entry)
    }

    fn window_extensions(&self) -> Result<Vec<String>> {
        let names = ash_window::enumerate_required_extensions(self.display_handle)
            .map_err(NegotiationError::query("vkEnumerateRequiredExtensions"))?;
        Ok(names
            .iter()
            .map(|&name| unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
            .collect())
    }

    fn debug_extension(&self) -> String {
        debug_utils::extension_name()
    }

    fn framebuffer_size(&self) -> Extent2D {
        self.framebuffer_size
    }

    fn create_instance(&mut self, request: &InstanceRequest<'_>) -> Result<VulkanInstance> {
        instance::create_instance(&self.entry, request)
    }

    fn install_debug_messenger(&mut self, instance: &VulkanInstance) -> Result<VulkanDebugMessenger> {
        debug_utils::install(&self.entry, instance)
    }

    fn create_surface(&mut self, instance: &VulkanInstance) -> Result<SurfaceKHR> {
        // handles are kept alive by the contract of `VulkanPlatform::new`
        unsafe {
            surface::create_surface(&self.entry, instance, self.display_handle, self.window_handle)
        }
    }

    fn probe<'a>(&'a self, instance: &'a VulkanInstance, surface: &'a SurfaceKHR) -> VulkanProbe<'a> {
        VulkanProbe::new(instance, *surface)
    }

    fn create_device(
        &mut self,
        instance: &VulkanInstance,
        physical_device: PhysicalDevice,
        queue_families: &QueueFamilyIndices,
        extensions: &[String],
    ) -> Result<VulkanDevice> {
        logical_device::create_device(instance, physical_device, queue_families, extensions)
    }

    fn device_queue(&self, device: &VulkanDevice, family_index: u32) -> Queue {
        logical_device::device_queue(device, family_index)
    }

    fn create_swapchain(
        &mut self,
        device: &VulkanDevice,
        surface: &SurfaceKHR,
        parameters: &SwapchainParameters,
        queue_families: &QueueFamilyIndices,
    ) -> Result<SwapchainKHR> {
        swap_chain::create_swapchain(device, *surface, parameters, queue_families)
    }

    fn swapchain_images(&self, device: &VulkanDevice, swapchain: &SwapchainKHR) -> Result<Vec<Image>> {
        swap_chain::swapchain_images(device, *swapchain)
    }

    fn create_image_view(
        &mut self,
        device: &VulkanDevice,
        image: Image,
        parameters: &SwapchainParameters,
    ) -> Result<ImageView> {
        swap_chain::create_image_view(device, image, parameters)
    }

    fn create_shader_module(&mut self, device: &VulkanDevice, code: &[u32]) -> Result<ShaderModule> {
        shader_module::create_shader_module(device, code)
    }

    fn destroy_shader_module(&mut self, device: &VulkanDevice, shader_module: ShaderModule) {
        shader_module::destroy_shader_module(device, shader_module)
    }

    fn destroy_image_view(&mut self, device: &VulkanDevice, image_view: ImageView) {
        swap_chain::destroy_image_view(device, image_view)
    }

    fn destroy_swapchain(&mut self, device: &VulkanDevice, swapchain: SwapchainKHR) {
        swap_chain::destroy_swapchain(device, swapchain)
    }

    fn destroy_device(&mut self, device: VulkanDevice) {
        logical_device::destroy_device(device)
    }

    fn destroy_surface(&mut self, instance: &VulkanInstance, surface: SurfaceKHR) {
        surface::destroy_surface(instance, surface)
    }

    fn destroy_debug_messenger(&mut self, _instance: &VulkanInstance, messenger: VulkanDebugMessenger) {
        debug_utils::destroy(messenger)
    }

    fn destroy_instance(&mut self, instance: VulkanInstance) {
        instance::destroy_instance(instance)
    }
}
