//! Dear ImGui debug overlay for the Glint scaffold.
//!
//! The overlay is an immediate-mode UI layer drawn on top of application
//! output. Each frame, the application declares the overlay's entire content
//! through a single builder callback; the overlay turns that into draw
//! commands recorded into the application's open render pass.

pub mod error;
pub mod overlay;
pub mod platform;

pub use error::{OverlayError, Result};
pub use overlay::Overlay;
pub use platform::InputBridge;
