//! Overlay error types.

use thiserror::Error;

/// Overlay-related errors.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// UI draw-data renderer error.
    #[error("Overlay renderer error: {0}")]
    Renderer(#[from] imgui_rs_vulkan_renderer::RendererError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, OverlayError>;
