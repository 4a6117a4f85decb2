use std::time::Instant;

use anyhow::{Context, Result};
use ash::vk::Extent2D;
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    raw_window_handle::{HasDisplayHandle, HasWindowHandle},
    window::{Window, WindowId},
};

use crate::{config::NegotiationConfig, orchestrator::Orchestrator, vulkan::VulkanPlatform};

/// Opens the window, negotiates Vulkan against it and idles until the user
/// closes it.
pub fn run(config: NegotiationConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: NegotiationConfig,
    /// Declared before `window`: every Vulkan handle must go before the
    /// window it was created against
    orchestrator: Option<Orchestrator<VulkanPlatform>>,
    window: Option<Window>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: NegotiationConfig) -> Self {
        Self {
            config,
            orchestrator: None,
            window: None,
            error: None,
        }
    }

    fn init_window(&self, event_loop: &ActiveEventLoop) -> Result<Window> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(self.config.window.resizable)
            .with_active(true);
        event_loop
            .create_window(attributes)
            .context("Failed to create window")
    }

    fn init_vulkan(&self, window: &Window) -> Result<Orchestrator<VulkanPlatform>> {
        let size = window.inner_size();
        let framebuffer_size = Extent2D {
            width: size.width,
            height: size.height,
        };
        let display_handle = window.display_handle()?.as_raw();
        let window_handle = window.window_handle()?.as_raw();

        // the orchestrator is always dropped before the window, see `App`
        let platform = unsafe { VulkanPlatform::new(display_handle, window_handle, framebuffer_size) }?;
        let mut orchestrator = Orchestrator::new(platform, self.config.clone());
        orchestrator.initialize()?;
        for shader in &self.config.shaders {
            orchestrator
                .load_shader_module(shader)
                .with_context(|| format!("Failed to load shader {}", shader.display()))?;
        }
        Ok(orchestrator)
    }

    fn control_flow(&self) -> ControlFlow {
        match self.config.poll_interval() {
            Some(interval) => ControlFlow::WaitUntil(Instant::now() + interval),
            None => ControlFlow::Wait,
        }
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut orchestrator) = self.orchestrator.take() {
            orchestrator.teardown();
        }
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match self.init_window(event_loop) {
            Ok(window) => window,
            Err(err) => {
                error!("{:#}", err);
                self.error = Some(err);
                event_loop.exit();
                return;
            }
        };
        match self.init_vulkan(&window) {
            Ok(orchestrator) => {
                info!("Window ready, waiting for close");
                self.orchestrator = Some(orchestrator);
                self.window = Some(window);
                event_loop.set_control_flow(self.control_flow());
            }
            Err(err) => {
                error!("{:#}", err);
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let Some(window) = &self.window {
            if window_id != window.id() {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.shut_down(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("Escape pressed");
                self.shut_down(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.orchestrator.is_some() {
            event_loop.set_control_flow(self.control_flow());
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut orchestrator) = self.orchestrator.take() {
            orchestrator.teardown();
        }
    }
}
