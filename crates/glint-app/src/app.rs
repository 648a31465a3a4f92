//! `App` trait definition.

use crate::frame::FrameContext;
use glint_gpu::GpuContext;

/// Default label for applications that do not override [`App::name`].
pub const DEFAULT_APP_NAME: &str = "Glint Demo";

/// Trait for Glint applications.
///
/// Implement this trait to create a new demo on the scaffold. The host runner
/// owns the window, the GPU context, and the swapchain, and calls the
/// lifecycle methods in a fixed order for one instance:
/// `on_initialize` → (`on_resize`* ⟷ `render_frame`*) → `on_deinitialize`,
/// never concurrently.
pub trait App {
    /// Human-readable application label.
    ///
    /// Pure; a default is provided if unoverridden.
    fn name(&self) -> &str {
        DEFAULT_APP_NAME
    }

    /// Initialize the application.
    ///
    /// Called exactly once, before any other lifecycle method, with a valid
    /// GPU context and the initial screen size. Establish all GPU-side
    /// resources here. Returning an error aborts startup.
    fn on_initialize(&mut self, gpu: &GpuContext, width: u32, height: u32)
        -> anyhow::Result<()>;

    /// Handle a presentation-surface size change.
    ///
    /// May be called any number of times, including zero, between any two
    /// `render_frame` calls. Update cached dimension-dependent state here.
    ///
    /// Default implementation does nothing.
    #[allow(unused_variables)]
    fn on_resize(&mut self, width: u32, height: u32) {}

    /// Render one frame.
    ///
    /// Called once per presented frame. Record all of the application's
    /// drawing for this frame into the open command buffer, targeting the
    /// frame's output image, and end any render pass opened here before
    /// returning. `frame.dt` is the wall-clock time since the previous frame.
    fn render_frame(&mut self, frame: &mut FrameContext<'_>) -> anyhow::Result<()>;

    /// Release application resources.
    ///
    /// Called exactly once, after the last frame and before the GPU context
    /// is torn down. Must not return until all GPU work the application
    /// submitted has completed (drain the queue if nothing else already
    /// guarantees completion).
    fn on_deinitialize(&mut self) -> anyhow::Result<()>;
}
