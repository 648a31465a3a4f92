//! Application runner and event loop.

use std::sync::Arc;
use std::time::Instant;

use ash::vk;
use glint_core::{MainThreadHandle, MainThreadQueue};
use glint_gpu::command::{begin_command_buffer, end_command_buffer, submit_command_buffers};
use glint_gpu::render::transition_image;
use glint_gpu::sync::{reset_fence, wait_for_fence};
use glint_gpu::GpuContextBuilder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::app::App;
use crate::context::AppContext;
use crate::frame::FrameContext;

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Initial window width.
    pub width: u32,
    /// Initial window height.
    pub height: u32,
    /// Enable vsync.
    pub vsync: bool,
    /// Enable Vulkan validation layers (default: debug builds only).
    pub validation: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Glint".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            validation: cfg!(debug_assertions),
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable vsync.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Enable or disable validation layers.
    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }
}

/// Run an application with the given configuration.
///
/// This function initializes logging, creates the window and GPU context,
/// calls the application's lifecycle methods in order, and runs the event
/// loop until the application exits. The instance is explicitly constructed
/// and owned by the caller; the runner holds it behind the [`App`] boundary.
pub fn run_app<A: App + 'static>(app: A, config: AppConfig) -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("{} starting...", app.name());

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let (main_queue, main_handle) = MainThreadQueue::new();

    let mut runner = AppRunner {
        config,
        app: Some(app),
        main_queue,
        main_handle,
        state: None,
    };

    if let Err(e) = event_loop.run_app(&mut runner) {
        error!("Event loop error: {e}");
    }

    Ok(())
}

/// Internal application runner that implements winit's ApplicationHandler.
struct AppRunner<A: App> {
    config: AppConfig,
    app: Option<A>,
    main_queue: MainThreadQueue,
    main_handle: MainThreadHandle,
    state: Option<AppState<A>>,
}

/// Internal application state.
struct AppState<A: App> {
    ctx: AppContext,
    app: A,
}

/// Requests collected from one rendered frame.
struct FrameActions {
    close: bool,
    vsync: Option<bool>,
}

impl<A: App + 'static> ApplicationHandler for AppRunner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        info!("Creating application state...");

        let Some(app) = self.app.take() else {
            return;
        };

        match self.create_state(app, event_loop) {
            Ok(state) => {
                self.state = Some(state);
                info!("Application ready!");
            }
            Err(e) => {
                error!("Failed to initialize application: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        // Overlay input state sees every event first
        if let Some(state) = &mut self.state {
            state.ctx.overlay.handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                if let Some(mut state) = self.state.take() {
                    state.cleanup();
                }
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Some(state) = &mut self.state {
                    match state.render_frame() {
                        Ok(actions) => {
                            if let Some(vsync) = actions.vsync {
                                if let Err(e) = state.apply_vsync(vsync) {
                                    error!("VSync toggle error: {e}");
                                }
                            }
                            if actions.close {
                                if let Some(mut state) = self.state.take() {
                                    state.cleanup();
                                }
                                event_loop.exit();
                                return;
                            }
                        }
                        Err(e) => error!("Render error: {e}"),
                    }
                    if let Some(state) = &self.state {
                        state.ctx.window.request_redraw();
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    if let Err(e) = state.handle_resize(size.width, size.height) {
                        error!("Resize error: {e}");
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Service tasks marshaled onto the render thread
        self.main_queue.run_pending();

        if let Some(state) = &self.state {
            state.ctx.window.request_redraw();
        }
    }
}

impl<A: App + 'static> AppRunner<A> {
    fn create_state(&self, mut app: A, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState<A>> {
        // Create window
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // Create GPU context
        let gpu = GpuContextBuilder::new()
            .app_name(&self.config.title)
            .validation(self.config.validation)
            .build()?;

        info!("GPU: {}", gpu.capabilities().summary());

        // Create app context
        let ctx = unsafe {
            AppContext::new(window, gpu, self.config.vsync, self.main_handle.clone())?
        };

        // Initialize the application; a failure here aborts startup
        app.on_initialize(&ctx.gpu, ctx.width(), ctx.height())?;

        Ok(AppState { ctx, app })
    }
}

impl<A: App> AppState<A> {
    fn render_frame(&mut self) -> anyhow::Result<FrameActions> {
        // Calculate delta time
        let now = Instant::now();
        let dt = now.duration_since(self.ctx.last_frame_time).as_secs_f32();
        self.ctx.last_frame_time = now;

        let (command_buffer, image_available, in_flight_fence) = {
            let frame_data = &self.ctx.frames[self.ctx.current_frame_index];
            (
                frame_data.command_buffer,
                frame_data.image_available,
                frame_data.in_flight_fence,
            )
        };

        let device = self.ctx.gpu.device();

        // GPU synchronization: wait for previous frame and acquire next image
        let image_index = unsafe {
            wait_for_fence(device, in_flight_fence, u64::MAX)?;

            let (image_index, _suboptimal) = self.ctx.swapchain.acquire_next_image(
                &self.ctx.surface.swapchain_loader,
                image_available,
                u64::MAX,
            )?;

            // Reset fence after successful acquire
            reset_fence(device, in_flight_fence)?;

            image_index
        };

        let output_image = self.ctx.swapchain.images[image_index as usize];
        let output_view = self.ctx.swapchain.image_views[image_index as usize];
        let extent = self.ctx.swapchain.extent;

        // Record: transitions around the application's pass
        unsafe {
            device.reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())?;
            begin_command_buffer(
                device,
                command_buffer,
                vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT,
            )?;

            transition_image(
                device,
                command_buffer,
                output_image,
                vk::ImageLayout::UNDEFINED,
                vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            );
        }

        // Per-frame overlay IO update
        self.ctx.overlay.prepare_frame(&self.ctx.window, dt);

        // Render the frame through the application
        let mut frame_ctx = FrameContext::new(
            device,
            self.ctx.gpu.debug_utils(),
            &mut self.ctx.overlay,
            command_buffer,
            output_image,
            output_view,
            extent,
            dt,
            self.ctx.frame_count,
            self.ctx.vsync,
        );
        self.app.render_frame(&mut frame_ctx)?;
        let controls = frame_ctx.finish();

        unsafe {
            transition_image(
                device,
                command_buffer,
                output_image,
                vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
                vk::ImageLayout::PRESENT_SRC_KHR,
            );

            end_command_buffer(device, command_buffer)?;
        }

        // Submit and present
        let render_finished = self.ctx.render_finished_semaphores[image_index as usize];

        unsafe {
            submit_command_buffers(
                device,
                self.ctx.gpu.graphics_queue(),
                &[command_buffer],
                &[image_available],
                &[vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT],
                &[render_finished],
                in_flight_fence,
            )?;

            self.ctx.swapchain.present(
                &self.ctx.surface.swapchain_loader,
                self.ctx.gpu.graphics_queue(),
                image_index,
                &[render_finished],
            )?;
        }

        self.ctx.current_frame_index =
            (self.ctx.current_frame_index + 1) % self.ctx.frames.len();
        self.ctx.frame_count += 1;

        Ok(FrameActions {
            close: controls.close_requested(),
            vsync: controls.vsync_change(),
        })
    }

    fn apply_vsync(&mut self, enabled: bool) -> anyhow::Result<()> {
        self.ctx.vsync = enabled;

        let width = self.ctx.width();
        let height = self.ctx.height();
        self.ctx.gpu.wait_idle()?;
        unsafe {
            self.ctx.recreate_swapchain(width, height)?;
        }

        info!("VSync {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    fn handle_resize(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.ctx.gpu.wait_idle()?;
        unsafe {
            self.ctx.recreate_swapchain(width, height)?;
        }

        // Notify the application
        self.app.on_resize(width, height);

        info!("Resized to {}x{}", width, height);
        Ok(())
    }

    fn cleanup(&mut self) {
        info!("Starting cleanup...");

        // The application drains its queue before teardown
        if let Err(e) = self.app.on_deinitialize() {
            error!("Deinitialize error: {e}");
        }

        unsafe {
            if let Err(e) = self.ctx.gpu.wait_idle() {
                error!("Failed to wait idle: {e}");
            }

            self.ctx.cleanup();
        }

        info!("Cleanup complete ({} frames rendered)", self.ctx.frame_count);
    }
}
