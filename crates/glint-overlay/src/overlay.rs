//! Overlay context and per-frame rendering.

use ash::vk;
use imgui::{Context, DrawData, FontConfig, FontSource, Ui};
use imgui_rs_vulkan_renderer::{DynamicRendering, Options, Renderer};
use winit::event::WindowEvent;
use winit::window::Window;

use glint_gpu::{DebugUtils, GpuContext};

use crate::error::Result;
use crate::platform::InputBridge;

/// Base overlay font size in logical pixels.
const FONT_SIZE: f64 = 13.0;

/// The debug-UI overlay: ImGui context, Vulkan draw-data renderer, and the
/// winit input bridge.
///
/// Lives on the render thread for its whole lifetime. ImGui's frame state is
/// library-global, so exactly one `Overlay` exists per process.
pub struct Overlay {
    context: Context,
    renderer: Renderer,
    bridge: InputBridge,
}

impl Overlay {
    /// Build the overlay against the swapchain's color format.
    ///
    /// `in_flight_frames` must match the host's frame-overlap count so the
    /// renderer rotates enough vertex buffers.
    pub fn new(
        gpu: &GpuContext,
        command_pool: vk::CommandPool,
        color_format: vk::Format,
        in_flight_frames: usize,
        window: &Window,
    ) -> Result<Self> {
        let mut context = Context::create();
        context.set_ini_filename(None);
        context.set_log_filename(None);

        let scale_factor = window.scale_factor();
        let font_size = (FONT_SIZE * scale_factor) as f32;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                size_pixels: font_size,
                ..FontConfig::default()
            }),
        }]);
        context.io_mut().font_global_scale = (1.0 / scale_factor) as f32;

        let logical_size = window.inner_size().to_logical::<f32>(scale_factor);
        let io = context.io_mut();
        io.display_size = [logical_size.width, logical_size.height];
        io.display_framebuffer_scale = [scale_factor as f32, scale_factor as f32];

        let renderer = Renderer::with_default_allocator(
            gpu.instance(),
            gpu.physical_device(),
            gpu.device().clone(),
            gpu.graphics_queue(),
            command_pool,
            DynamicRendering {
                color_attachment_format: color_format,
                depth_attachment_format: None,
            },
            &mut context,
            Some(Options {
                in_flight_frames,
                ..Options::default()
            }),
        )?;

        tracing::info!(
            "Overlay initialized ({}x{} @ {:.1}x)",
            logical_size.width,
            logical_size.height,
            scale_factor
        );

        Ok(Self {
            context,
            renderer,
            bridge: InputBridge::new(scale_factor),
        })
    }

    /// Feed a window event into the overlay's input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        self.bridge.handle_event(self.context.io_mut(), event);
    }

    /// Per-frame IO update: delta time and display size.
    pub fn prepare_frame(&mut self, window: &Window, dt: f32) {
        let scale_factor = self.bridge.scale_factor();
        let logical_size = window.inner_size().to_logical::<f32>(scale_factor);
        let io = self.context.io_mut();
        io.display_size = [logical_size.width, logical_size.height];
        io.delta_time = dt.max(f32::EPSILON);
    }

    /// Build and record this frame's UI into `cmd`.
    ///
    /// `cmd` must be inside an open dynamic-rendering pass targeting the
    /// color format given at construction. In order: a new UI frame begins,
    /// `builder` runs exactly once to declare the frame's entire UI content,
    /// the frame is finalized, and the resulting draw commands are recorded
    /// into `cmd` wrapped in an "Overlay" debug label. Synchronous: builder
    /// side effects are observable as soon as this returns.
    pub fn render<F>(
        &mut self,
        debug: Option<&DebugUtils>,
        cmd: vk::CommandBuffer,
        builder: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Ui),
    {
        if let Some(debug) = debug {
            debug.cmd_begin_label(cmd, "Overlay");
        }

        let draw_data = build_ui_frame(&mut self.context, builder);
        self.renderer.cmd_draw(cmd, draw_data)?;

        if let Some(debug) = debug {
            debug.cmd_end_label(cmd);
        }
        Ok(())
    }
}

/// Run one new-frame/build/render cycle and return the draw data.
fn build_ui_frame<F>(context: &mut Context, builder: F) -> &DrawData
where
    F: FnOnce(&mut Ui),
{
    let ui = context.new_frame();
    builder(ui);
    context.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    // A single test owns the process-wide ImGui context.
    #[test]
    fn builder_runs_exactly_once_and_synchronously() {
        let mut context = Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = [640.0, 480.0];
        let _font_atlas = context.fonts().build_rgba32_texture();

        let mut calls = 0;
        let mut toggled = false;
        let draw_data = build_ui_frame(&mut context, |_ui| {
            calls += 1;
            toggled = true;
        });
        assert_eq!(draw_data.display_size, [640.0, 480.0]);

        // Side effects are visible immediately after the frame is built.
        assert_eq!(calls, 1);
        assert!(toggled);

        // A second frame invokes a fresh builder exactly once again.
        let mut second_calls = 0;
        build_ui_frame(&mut context, |_ui| second_calls += 1);
        assert_eq!(second_calls, 1);
    }
}
