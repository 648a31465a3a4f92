//! Per-frame context for rendering.

use ash::vk;
use glint_gpu::render::{begin_rendering, end_rendering};
use glint_gpu::DebugUtils;
use glint_overlay::Overlay;

/// Context for the current frame being rendered.
///
/// Borrows the frame's command buffer (open, recording), the swapchain target
/// for this frame (not owned across frames), and the overlay. Handed to
/// [`App::render_frame`](crate::App::render_frame) once per presented frame.
pub struct FrameContext<'a> {
    /// Command buffer for recording rendering commands.
    pub command_buffer: vk::CommandBuffer,
    /// The swapchain image for this frame.
    pub output_image: vk::Image,
    /// View over the output image, used as the pass color target.
    pub output_view: vk::ImageView,
    /// Output dimensions in pixels.
    pub extent: vk::Extent2D,
    /// Delta time since last frame in seconds.
    pub dt: f32,
    /// Current frame number.
    pub frame_number: u64,

    device: &'a ash::Device,
    debug: Option<&'a DebugUtils>,
    overlay: &'a mut Overlay,
    controls: FrameControls,
}

impl<'a> FrameContext<'a> {
    /// Create a new frame context.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        device: &'a ash::Device,
        debug: Option<&'a DebugUtils>,
        overlay: &'a mut Overlay,
        command_buffer: vk::CommandBuffer,
        output_image: vk::Image,
        output_view: vk::ImageView,
        extent: vk::Extent2D,
        dt: f32,
        frame_number: u64,
        vsync: bool,
    ) -> Self {
        Self {
            command_buffer,
            output_image,
            output_view,
            extent,
            dt,
            frame_number,
            device,
            debug,
            overlay,
            controls: FrameControls::new(vsync),
        }
    }

    /// Open a labeled dynamic-rendering pass clearing the output to
    /// `clear_color`.
    ///
    /// The pass must be closed with [`end_pass`](Self::end_pass) before
    /// `render_frame` returns.
    pub fn begin_pass(&self, label: &str, clear_color: [f32; 4]) {
        if let Some(debug) = self.debug {
            debug.cmd_begin_label(self.command_buffer, label);
        }
        // SAFETY: handles are valid for the duration of the frame and the
        // output image is in COLOR_ATTACHMENT_OPTIMAL layout.
        unsafe {
            begin_rendering(
                self.device,
                self.command_buffer,
                self.output_view,
                self.extent,
                clear_color,
            );
        }
    }

    /// Close the pass opened with [`begin_pass`](Self::begin_pass).
    pub fn end_pass(&self) {
        // SAFETY: pairs with the begin_rendering call in begin_pass.
        unsafe {
            end_rendering(self.device, self.command_buffer);
        }
        if let Some(debug) = self.debug {
            debug.cmd_end_label(self.command_buffer);
        }
    }

    /// Draw the debug overlay into the current pass.
    ///
    /// Invokes `builder` exactly once, synchronously, with the UI handle and
    /// this frame's host controls; returns after the overlay's draw commands
    /// are recorded, so builder side effects are immediately observable.
    pub fn render_overlay<F>(&mut self, builder: F) -> glint_overlay::Result<()>
    where
        F: FnOnce(&mut imgui::Ui, &mut FrameControls),
    {
        let controls = &mut self.controls;
        self.overlay
            .render(self.debug, self.command_buffer, |ui| builder(ui, controls))
    }

    /// Access the frame's host controls outside the overlay builder.
    pub fn controls(&mut self) -> &mut FrameControls {
        &mut self.controls
    }

    /// Consume the context and hand the accumulated requests to the runner.
    pub(crate) fn finish(self) -> FrameControls {
        self.controls
    }
}

/// Host controls exposed to one frame.
///
/// The render-thread rendition of process-wide host state: the vsync flag and
/// the close request. Mutated only from the render thread during
/// `render_frame`; the runner applies the requests after the frame completes.
#[derive(Debug, Clone, Copy)]
pub struct FrameControls {
    vsync: bool,
    vsync_request: Option<bool>,
    close_requested: bool,
}

impl FrameControls {
    pub(crate) fn new(vsync: bool) -> Self {
        Self {
            vsync,
            vsync_request: None,
            close_requested: false,
        }
    }

    /// Current vsync state, reflecting any request made this frame.
    pub fn vsync(&self) -> bool {
        self.vsync_request.unwrap_or(self.vsync)
    }

    /// Request a vsync change; the host recreates the swapchain after the
    /// frame.
    pub fn set_vsync(&mut self, enabled: bool) {
        self.vsync_request = Some(enabled);
    }

    /// Ask the host to shut the application down after this frame.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// The effective vsync change, if any.
    pub(crate) fn vsync_change(&self) -> Option<bool> {
        self.vsync_request.filter(|&requested| requested != self.vsync)
    }

    pub(crate) fn close_requested(&self) -> bool {
        self.close_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_request_is_immediately_visible() {
        let mut controls = FrameControls::new(true);
        assert!(controls.vsync());

        controls.set_vsync(false);
        assert!(!controls.vsync());
        assert_eq!(controls.vsync_change(), Some(false));
    }

    #[test]
    fn redundant_vsync_request_is_not_a_change() {
        let mut controls = FrameControls::new(true);
        controls.set_vsync(true);
        assert!(controls.vsync());
        assert_eq!(controls.vsync_change(), None);
    }

    #[test]
    fn close_request_is_recorded() {
        let mut controls = FrameControls::new(false);
        assert!(!controls.close_requested());
        controls.request_close();
        assert!(controls.close_requested());
    }
}
