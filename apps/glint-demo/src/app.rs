//! Demo application implementation.

use anyhow::Context as _;
use imgui::Condition;
use tracing::info;

use glint_app::{App, FrameContext};
use glint_gpu::{DeviceContext, GpuContext};

use crate::stats::FrameStats;

/// Demo application label.
const DEMO_NAME: &str = "New fancy Vulkan demo";

/// Background clear color (RGBA).
const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// Inset of the overlay panel from the viewport corner, in logical pixels.
const PANEL_INSET: f32 = 10.0;

/// The example application: clears the screen and draws the info/controls
/// overlay panel.
pub struct GlintDemo {
    context: Option<DeviceContext>,
    screen_width: u32,
    screen_height: u32,

    // Info & Controls.
    stats: FrameStats,
}

impl GlintDemo {
    /// Create the demo in its uninitialized state.
    pub fn new() -> Self {
        Self {
            context: None,
            screen_width: 0,
            screen_height: 0,
            stats: FrameStats::new(),
        }
    }
}

impl App for GlintDemo {
    fn name(&self) -> &str {
        DEMO_NAME
    }

    fn on_initialize(
        &mut self,
        gpu: &GpuContext,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        // DeviceContext::new traps on null handles before anything is stored.
        let context = DeviceContext::new(
            gpu.shared_device(),
            gpu.graphics_queue(),
            gpu.capabilities(),
        );

        info!(
            "{} on {} ({})",
            DEMO_NAME,
            context.device_name(),
            context.tier_label()
        );

        self.context = Some(context);
        self.screen_width = width;
        self.screen_height = height;

        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.screen_width = width;
        self.screen_height = height;
    }

    fn render_frame(&mut self, frame: &mut FrameContext<'_>) -> anyhow::Result<()> {
        let context = self
            .context
            .as_ref()
            .context("render_frame called before on_initialize")?;

        frame.begin_pass("Main Pass", CLEAR_COLOR);

        // TODO: put your rendering code here.

        let stats = &mut self.stats;
        frame.render_overlay(|ui, controls| {
            stats.tick(f64::from(ui.io().framerate));

            let [viewport_width, _] = ui.io().display_size;
            ui.window("Info & Controls")
                .position(
                    [viewport_width - PANEL_INSET, PANEL_INSET],
                    Condition::Appearing,
                )
                .position_pivot([1.0, 0.0])
                .always_auto_resize(true)
                .build(|| {
                    ui.text(format!("Device: {}", context.device_name()));
                    ui.text(format!("GPU tier: {}", context.tier_label()));
                    ui.text(format!(
                        "Avg time frame = {:.3} ms ({:.1} FPS)",
                        stats.avg_frame_time_ms(),
                        stats.fps()
                    ));

                    let mut vsync = controls.vsync();
                    if ui.checkbox("Enable VSync", &mut vsync) {
                        controls.set_vsync(vsync);
                    }

                    if ui.is_key_released(imgui::Key::Escape) {
                        controls.request_close();
                    }
                });
        })?;

        frame.end_pass();
        Ok(())
    }

    fn on_deinitialize(&mut self) -> anyhow::Result<()> {
        // Drain in-flight GPU work before any resource teardown.
        self.context
            .as_ref()
            .context("on_deinitialize called before on_initialize")?
            .drain()?;
        Ok(())
    }
}

impl Default for GlintDemo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_caches_the_latest_dimensions() {
        let mut demo = GlintDemo::new();
        assert_eq!((demo.screen_width, demo.screen_height), (0, 0));

        demo.on_resize(800, 600);
        demo.on_resize(1920, 1080);
        demo.on_resize(640, 480);

        assert_eq!((demo.screen_width, demo.screen_height), (640, 480));
    }

    #[test]
    fn name_reports_the_demo_label() {
        let demo = GlintDemo::new();
        assert_eq!(demo.name(), "New fancy Vulkan demo");
    }
}
