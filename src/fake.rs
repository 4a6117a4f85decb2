//! In-memory stand-ins for the GPU and the platform binding.

use std::cell::{Cell, RefCell};

use ash::vk::{
    self, Extent2D, PhysicalDeviceProperties, PhysicalDeviceType, PresentModeKHR,
    QueueFamilyProperties, QueueFlags, SurfaceCapabilitiesKHR, SurfaceFormatKHR,
};

use crate::{
    error::{NegotiationError, Resource, Result},
    platform::{DeviceProbe, InstanceRequest, Platform},
    queue_families::QueueFamilyIndices,
    swapchain::{SwapchainParameters, DEFAULT_SURFACE_FORMAT},
};

#[derive(Clone, Debug)]
pub struct FakeGpu {
    pub name: String,
    pub device_type: PhysicalDeviceType,
    pub max_image_dimension: u32,
    pub queue_families: Vec<QueueFamilyProperties>,
    pub presentation: Vec<bool>,
    pub extensions: Vec<String>,
    pub capabilities: SurfaceCapabilitiesKHR,
    pub formats: Vec<SurfaceFormatKHR>,
    pub present_modes: Vec<PresentModeKHR>,
}

impl FakeGpu {
    /// One graphics + present family, the swapchain extension, one format
    /// and FIFO.
    pub fn suitable(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            device_type: PhysicalDeviceType::OTHER,
            max_image_dimension: 4096,
            queue_families: vec![],
            presentation: vec![],
            extensions: vec!["VK_KHR_swapchain".to_owned()],
            capabilities: SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 3,
                current_extent: Extent2D {
                    width: 1024,
                    height: 768,
                },
                ..Default::default()
            },
            formats: vec![DEFAULT_SURFACE_FORMAT],
            present_modes: vec![PresentModeKHR::FIFO],
        }
        .with_queue_families(&[(QueueFlags::GRAPHICS, true)])
    }

    pub fn with_queue_families(mut self, families: &[(QueueFlags, bool)]) -> Self {
        self.queue_families = families
            .iter()
            .map(|(flags, _)| QueueFamilyProperties {
                queue_flags: *flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect();
        self.presentation = families.iter().map(|(_, present)| *present).collect();
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|name| (*name).to_owned()).collect();
        self
    }

    pub fn with_type(mut self, device_type: PhysicalDeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    fn properties(&self) -> PhysicalDeviceProperties {
        let mut properties = PhysicalDeviceProperties {
            device_type: self.device_type,
            ..Default::default()
        };
        properties.limits.max_image_dimension2_d = self.max_image_dimension;
        for (dst, src) in properties.device_name.iter_mut().zip(self.name.bytes()) {
            *dst = src as _;
        }
        properties
    }
}

/// Devices are addressed by their position in `devices`
pub struct FakeProbe {
    pub devices: RefCell<Vec<FakeGpu>>,
    pub presentation_queries: Cell<usize>,
}

impl FakeProbe {
    pub fn new(devices: Vec<FakeGpu>) -> Self {
        Self {
            devices: RefCell::new(devices),
            presentation_queries: Cell::new(0),
        }
    }
}

impl DeviceProbe for FakeProbe {
    type Device = usize;

    fn enumerate_devices(&self) -> Result<Vec<usize>> {
        Ok((0..self.devices.borrow().len()).collect())
    }

    fn device_properties(&self, device: usize) -> PhysicalDeviceProperties {
        self.devices.borrow()[device].properties()
    }

    fn queue_families(&self, device: usize) -> Vec<QueueFamilyProperties> {
        self.devices.borrow()[device].queue_families.clone()
    }

    fn supports_presentation(&self, device: usize, family_index: u32) -> Result<bool> {
        self.presentation_queries
            .set(self.presentation_queries.get() + 1);
        Ok(self.devices.borrow()[device]
            .presentation
            .get(family_index as usize)
            .copied()
            .unwrap_or(false))
    }

    fn device_extensions(&self, device: usize) -> Result<Vec<String>> {
        Ok(self.devices.borrow()[device].extensions.clone())
    }

    fn surface_capabilities(&self, device: usize) -> Result<SurfaceCapabilitiesKHR> {
        Ok(self.devices.borrow()[device].capabilities)
    }

    fn surface_formats(&self, device: usize) -> Result<Vec<SurfaceFormatKHR>> {
        Ok(self.devices.borrow()[device].formats.clone())
    }

    fn surface_present_modes(&self, device: usize) -> Result<Vec<PresentModeKHR>> {
        Ok(self.devices.borrow()[device].present_modes.clone())
    }
}

/// Something the fake platform was asked to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Create(Resource, u32),
    Destroy(Resource, u32),
}

/// A handle the fake platform gave out
#[derive(Debug, PartialEq, Eq)]
pub struct Handle(pub u32);

/// Records every create/destroy, handing out increasing ids so tests can
/// check that each handle is destroyed exactly once.
pub struct FakePlatform {
    pub gpu: FakeProbe,
    pub instance_extensions: Vec<String>,
    pub instance_layers: Vec<String>,
    pub window_extensions: Vec<String>,
    pub framebuffer_size: Extent2D,
    /// the nth (1-based) creation of this kind fails
    pub fail_on: Option<(Resource, usize)>,
    pub fail_images: bool,
    pub last_instance_request: Option<(Vec<String>, Vec<String>, bool)>,
    pub last_swapchain: Option<SwapchainParameters>,
    pub calls: Vec<Call>,
    next_id: u32,
}

impl FakePlatform {
    pub fn new(devices: Vec<FakeGpu>) -> Self {
        Self {
            gpu: FakeProbe::new(devices),
            instance_extensions: vec![
                "VK_KHR_surface".to_owned(),
                "VK_KHR_xcb_surface".to_owned(),
                "VK_EXT_debug_utils".to_owned(),
            ],
            instance_layers: vec!["VK_LAYER_KHRONOS_validation".to_owned()],
            window_extensions: vec!["VK_KHR_surface".to_owned(), "VK_KHR_xcb_surface".to_owned()],
            framebuffer_size: Extent2D {
                width: 800,
                height: 600,
            },
            fail_on: None,
            fail_images: false,
            last_instance_request: None,
            last_swapchain: None,
            calls: vec![],
            next_id: 1,
        }
    }

    pub fn failing_on(self, resource: Resource) -> Self {
        self.failing_on_nth(resource, 1)
    }

    pub fn failing_on_nth(mut self, resource: Resource, n: usize) -> Self {
        self.fail_on = Some((resource, n));
        self
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    pub fn created(&self) -> Vec<(Resource, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Create(resource, id) => Some((*resource, *id)),
                Call::Destroy(..) => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<(Resource, u32)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Destroy(resource, id) => Some((*resource, *id)),
                Call::Create(..) => None,
            })
            .collect()
    }

    fn create(&mut self, resource: Resource) -> Result<Handle> {
        let attempt = 1 + self
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Create(r, _) if *r == resource))
            .count();
        if self.fail_on == Some((resource, attempt)) {
            return Err(NegotiationError::creation(resource)(
                vk::Result::ERROR_INITIALIZATION_FAILED,
            ));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.calls.push(Call::Create(resource, id));
        Ok(Handle(id))
    }

    fn destroy(&mut self, resource: Resource, handle: Handle) {
        self.calls.push(Call::Destroy(resource, handle.0));
    }
}

impl Platform for FakePlatform {
    type Instance = Handle;
    type DebugMessenger = Handle;
    type Surface = Handle;
    type PhysicalDevice = usize;
    type Device = Handle;
    type Queue = u32;
    type Swapchain = Handle;
    type Image = u32;
    type ImageView = Handle;
    type ShaderModule = Handle;
    type Probe<'a> = &'a FakeProbe;

    fn instance_extensions(&self) -> Result<Vec<String>> {
        Ok(self.instance_extensions.clone())
    }

    fn instance_layers(&self) -> Result<Vec<String>> {
        Ok(self.instance_layers.clone())
    }

    fn window_extensions(&self) -> Result<Vec<String>> {
        Ok(self.window_extensions.clone())
    }

    fn debug_extension(&self) -> String {
        "VK_EXT_debug_utils".to_owned()
    }

    fn framebuffer_size(&self) -> Extent2D {
        self.framebuffer_size
    }

    fn create_instance(&mut self, request: &InstanceRequest<'_>) -> Result<Handle> {
        self.last_instance_request = Some((
            request.extensions.to_vec(),
            request.layers.to_vec(),
            request.debug_messenger,
        ));
        self.create(Resource::Instance)
    }

    fn install_debug_messenger(&mut self, _instance: &Handle) -> Result<Handle> {
        self.create(Resource::DebugMessenger)
    }

    fn create_surface(&mut self, _instance: &Handle) -> Result<Handle> {
        self.create(Resource::Surface)
    }

    fn probe<'a>(&'a self, _instance: &'a Handle, _surface: &'a Handle) -> &'a FakeProbe {
        &self.gpu
    }

    fn create_device(
        &mut self,
        _instance: &Handle,
        _physical_device: usize,
        _queue_families: &QueueFamilyIndices,
        _extensions: &[String],
    ) -> Result<Handle> {
        self.create(Resource::LogicalDevice)
    }

    fn device_queue(&self, _device: &Handle, family_index: u32) -> u32 {
        family_index
    }

    fn create_swapchain(
        &mut self,
        _device: &Handle,
        _surface: &Handle,
        parameters: &SwapchainParameters,
        _queue_families: &QueueFamilyIndices,
    ) -> Result<Handle> {
        self.last_swapchain = Some(*parameters);
        self.create(Resource::SwapChain)
    }

    fn swapchain_images(&self, _device: &Handle, _swapchain: &Handle) -> Result<Vec<u32>> {
        if self.fail_images {
            return Err(NegotiationError::query("vkGetSwapchainImagesKHR")(
                vk::Result::ERROR_OUT_OF_HOST_MEMORY,
            ));
        }
        let count = self
            .last_swapchain
            .map_or(0, |parameters| parameters.image_count);
        Ok((0..count).collect())
    }

    fn create_image_view(
        &mut self,
        _device: &Handle,
        _image: u32,
        _parameters: &SwapchainParameters,
    ) -> Result<Handle> {
        self.create(Resource::ImageView)
    }

    fn create_shader_module(&mut self, _device: &Handle, _code: &[u32]) -> Result<Handle> {
        self.create(Resource::ShaderModule)
    }

    fn destroy_shader_module(&mut self, _device: &Handle, shader_module: Handle) {
        self.destroy(Resource::ShaderModule, shader_module)
    }

    fn destroy_image_view(&mut self, _device: &Handle, image_view: Handle) {
        self.destroy(Resource::ImageView, image_view)
    }

    fn destroy_swapchain(&mut self, _device: &Handle, swapchain: Handle) {
        self.destroy(Resource::SwapChain, swapchain)
    }

    fn destroy_device(&mut self, device: Handle) {
        self.destroy(Resource::LogicalDevice, device)
    }

    fn destroy_surface(&mut self, _instance: &Handle, surface: Handle) {
        self.destroy(Resource::Surface, surface)
    }

    fn destroy_debug_messenger(&mut self, _instance: &Handle, messenger: Handle) {
        self.destroy(Resource::DebugMessenger, messenger)
    }

    fn destroy_instance(&mut self, instance: Handle) {
        self.destroy(Resource::Instance, instance)
    }
}
