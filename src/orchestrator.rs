use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::{
    capabilities::ensure_supported,
    config::NegotiationConfig,
    error::{CapabilityKind, NegotiationError, Result},
    physical_device::{select_physical_device, Candidate},
    platform::{InstanceRequest, Platform},
    shader::read_shader_code,
    surface_support::query_surface_support,
    swapchain::SwapchainParameters,
};

/// Where the negotiation has got to. Each stage needs everything from the
/// ones before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Uninitialized,
    InstanceCreated,
    DebugCallbackInstalled,
    SurfaceCreated,
    DeviceSelected,
    LogicalDeviceAndQueuesCreated,
    SwapChainCreated,
    ImageViewsCreated,
    Ready,
}

/// Handles to the queues for submitting instructions to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueHandles<Q> {
    pub graphics: Q,
    pub present: Q,
}

/// Drives instance → surface → device → swap chain → image views and owns
/// every handle it creates until `teardown`.
pub struct Orchestrator<P: Platform> {
    platform: P,
    config: NegotiationConfig,
    stage: Stage,
    instance: Option<P::Instance>,
    debug_messenger: Option<P::DebugMessenger>,
    /// set when the debug utils extension was enabled on the instance
    debug_extension_enabled: bool,
    surface: Option<P::Surface>,
    selected_device: Option<Candidate<P::PhysicalDevice>>,
    device: Option<P::Device>,
    queues: Option<QueueHandles<P::Queue>>,
    swapchain: Option<P::Swapchain>,
    swapchain_parameters: Option<SwapchainParameters>,
    images: Vec<P::Image>,
    image_views: Vec<P::ImageView>,
    shader_modules: Vec<P::ShaderModule>,
}

impl<P: Platform> Orchestrator<P> {
    pub fn new(platform: P, config: NegotiationConfig) -> Self {
        Self {
            platform,
            config,
            stage: Stage::Uninitialized,
            instance: None,
            debug_messenger: None,
            debug_extension_enabled: false,
            surface: None,
            selected_device: None,
            device: None,
            queues: None,
            swapchain: None,
            swapchain_parameters: None,
            images: vec![],
            image_views: vec![],
            shader_modules: vec![],
        }
    }

    /// Runs every stage up to `Ready`. On failure everything created so far
    /// is destroyed before the error is returned.
    pub fn initialize(&mut self) -> Result<()> {
        if self.stage == Stage::Ready {
            return Ok(());
        }
        debug_assert_eq!(self.stage, Stage::Uninitialized);

        if let Err(err) = self.run_stages() {
            error!("Negotiation failed at {:?}: {}", self.stage, err);
            self.teardown();
            return Err(err);
        }
        Ok(())
    }

    fn run_stages(&mut self) -> Result<()> {
        self.create_instance()?;
        self.install_debug_callback()?;
        self.create_surface()?;
        self.select_device()?;
        self.create_logical_device()?;
        self.create_swapchain()?;
        self.create_image_views()?;
        self.advance(Stage::Ready);
        info!("Vulkan setup ready");
        Ok(())
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{:?} does not follow {:?}", next, self.stage);
        debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn create_instance(&mut self) -> Result<()> {
        debug!("Creating instance...");
        let available_extensions = self.platform.instance_extensions()?;
        debug!("Available instance extensions: {:?}", available_extensions);

        let layers = if self.config.validation.enabled {
            let available_layers = self.platform.instance_layers()?;
            debug!("Available layers: {:?}", available_layers);
            ensure_supported(
                CapabilityKind::ValidationLayer,
                &self.config.validation.layers,
                &available_layers,
            )?;
            self.config.validation.layers.clone()
        } else {
            vec![]
        };

        let mut extensions = self.platform.window_extensions()?;
        let debug_extension = self.platform.debug_extension();
        self.debug_extension_enabled = self.config.validation.enabled
            && available_extensions.contains(&debug_extension);
        if self.debug_extension_enabled && !extensions.contains(&debug_extension) {
            extensions.push(debug_extension);
        }
        debug!("Instance extensions: {:?}", extensions);
        ensure_supported(
            CapabilityKind::InstanceExtension,
            &extensions,
            &available_extensions,
        )?;

        let instance = self.platform.create_instance(&InstanceRequest {
            extensions: &extensions,
            layers: &layers,
            debug_messenger: self.debug_extension_enabled,
        })?;
        self.instance = Some(instance);
        self.advance(Stage::InstanceCreated);
        Ok(())
    }

    /// Optional: only when validation is on and the platform exposes the
    /// debug utils extension.
    fn install_debug_callback(&mut self) -> Result<()> {
        if !self.config.validation.enabled {
            return Ok(());
        }
        if !self.debug_extension_enabled {
            warn!(
                "{} not available, validation messages will not be logged",
                self.platform.debug_extension()
            );
            return Ok(());
        }
        let instance = require(self.instance.as_ref(), "install debug callback", "instance")?;
        let messenger = self.platform.install_debug_messenger(instance)?;
        self.debug_messenger = Some(messenger);
        self.advance(Stage::DebugCallbackInstalled);
        Ok(())
    }

    fn create_surface(&mut self) -> Result<()> {
        debug!("Creating surface...");
        let instance = require(self.instance.as_ref(), "create surface", "instance")?;
        let surface = self.platform.create_surface(instance)?;
        self.surface = Some(surface);
        self.advance(Stage::SurfaceCreated);
        Ok(())
    }

    fn select_device(&mut self) -> Result<()> {
        debug!("Selecting physical device...");
        let instance = require(self.instance.as_ref(), "select device", "instance")?;
        let surface = require(self.surface.as_ref(), "select device", "surface")?;
        let candidate = {
            let probe = self.platform.probe(instance, surface);
            select_physical_device(
                &probe,
                &self.config.device.extensions,
                self.config.device.selection,
            )?
        };
        debug!("Queue family indices: {:?}", candidate.queue_families);
        self.selected_device = Some(candidate);
        self.advance(Stage::DeviceSelected);
        Ok(())
    }

    fn create_logical_device(&mut self) -> Result<()> {
        debug!("Creating logical device...");
        const STEP: &str = "create logical device";
        let instance = require(self.instance.as_ref(), STEP, "instance")?;
        let candidate = require(self.selected_device.as_ref(), STEP, "selected device")?;
        let queue_families = candidate.queue_families;
        let graphics_family = require(queue_families.graphics_family, STEP, "graphics queue family")?;
        let present_family = require(queue_families.present_family, STEP, "present queue family")?;

        let device = self.platform.create_device(
            instance,
            candidate.device,
            &queue_families,
            &self.config.device.extensions,
        )?;
        self.queues = Some(QueueHandles {
            graphics: self.platform.device_queue(&device, graphics_family),
            present: self.platform.device_queue(&device, present_family),
        });
        self.device = Some(device);
        self.advance(Stage::LogicalDeviceAndQueuesCreated);
        Ok(())
    }

    fn create_swapchain(&mut self) -> Result<()> {
        debug!("Creating swap chain...");
        const STEP: &str = "create swap chain";
        let instance = require(self.instance.as_ref(), STEP, "instance")?;
        let surface = require(self.surface.as_ref(), STEP, "surface")?;
        let candidate = require(self.selected_device.as_ref(), STEP, "selected device")?;
        let device = require(self.device.as_ref(), STEP, "logical device")?;

        // fresh query; the surface may have changed since selection
        let support = query_surface_support(&self.platform.probe(instance, surface), candidate.device)?;
        let parameters = SwapchainParameters::choose(
            &support,
            self.config.swapchain.preferred_surface_format(),
            self.platform.framebuffer_size(),
        );
        info!(
            "Swap chain: {:?} {:?}, {:?}, {}x{}, {} images",
            parameters.surface_format.format,
            parameters.surface_format.color_space,
            parameters.present_mode,
            parameters.extent.width,
            parameters.extent.height,
            parameters.image_count
        );

        let queue_families = candidate.queue_families;
        let swapchain =
            self.platform
                .create_swapchain(device, surface, &parameters, &queue_families)?;
        let images = match self.platform.swapchain_images(device, &swapchain) {
            Ok(images) => images,
            Err(err) => {
                self.platform.destroy_swapchain(device, swapchain);
                return Err(err);
            }
        };

        self.swapchain = Some(swapchain);
        self.swapchain_parameters = Some(parameters);
        self.images = images;
        self.advance(Stage::SwapChainCreated);
        Ok(())
    }

    fn create_image_views(&mut self) -> Result<()> {
        debug!("Creating image views...");
        let device = require(self.device.as_ref(), "create image views", "logical device")?;
        let parameters = require(
            self.swapchain_parameters.as_ref(),
            "create image views",
            "swap chain",
        )?;
        for image in self.images.iter().copied() {
            // views made so far are already tracked, so a failure here
            // leaves them to teardown
            let image_view = self.platform.create_image_view(device, image, parameters)?;
            self.image_views.push(image_view);
        }
        self.advance(Stage::ImageViewsCreated);
        Ok(())
    }

    /// Wraps a SPIR-V file into a shader module owned until teardown.
    pub fn load_shader_module(&mut self, path: &Path) -> Result<()> {
        debug!("Loading shader {}", path.display());
        let device = require(self.device.as_ref(), "load shader module", "logical device")?;
        let code = read_shader_code(path)?;
        let shader_module = self.platform.create_shader_module(device, &code)?;
        self.shader_modules.push(shader_module);
        Ok(())
    }

    /// Destroys everything in reverse creation order. Only handles that
    /// exist are touched, so calling this again does nothing.
    pub fn teardown(&mut self) {
        if let Some(device) = self.device.as_ref() {
            while let Some(shader_module) = self.shader_modules.pop() {
                debug!("Destroying shader module");
                self.platform.destroy_shader_module(device, shader_module);
            }
            while let Some(image_view) = self.image_views.pop() {
                debug!("Destroying image view");
                self.platform.destroy_image_view(device, image_view);
            }
            self.images.clear();
            if let Some(swapchain) = self.swapchain.take() {
                debug!("Destroying swap chain");
                self.platform.destroy_swapchain(device, swapchain);
            }
        }
        self.swapchain_parameters = None;
        self.queues = None;
        if let Some(device) = self.device.take() {
            debug!("Destroying logical device");
            self.platform.destroy_device(device);
        }
        self.selected_device = None;
        if let Some(instance) = self.instance.as_ref() {
            if let Some(surface) = self.surface.take() {
                debug!("Destroying surface");
                self.platform.destroy_surface(instance, surface);
            }
            if let Some(messenger) = self.debug_messenger.take() {
                debug!("Destroying debug messenger");
                self.platform.destroy_debug_messenger(instance, messenger);
            }
        }
        if let Some(instance) = self.instance.take() {
            debug!("Destroying instance");
            self.platform.destroy_instance(instance);
        }
        self.debug_extension_enabled = false;
        self.stage = Stage::Uninitialized;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn selected_device(&self) -> Option<&Candidate<P::PhysicalDevice>> {
        self.selected_device.as_ref()
    }

    pub fn queues(&self) -> Option<QueueHandles<P::Queue>> {
        self.queues
    }

    pub fn swapchain_parameters(&self) -> Option<&SwapchainParameters> {
        self.swapchain_parameters.as_ref()
    }

    pub fn image_views(&self) -> &[P::ImageView] {
        &self.image_views
    }
}

fn require<T>(slot: Option<T>, step: &'static str, missing: &'static str) -> Result<T> {
    slot.ok_or(NegotiationError::MissingPrerequisite { step, missing })
}

impl<P: Platform> Drop for Orchestrator<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
