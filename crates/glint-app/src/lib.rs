//! Application framework for the Glint scaffold.
//!
//! This crate provides a trait-based application framework that handles
//! common boilerplate like:
//! - Window creation and management
//! - GPU context initialization
//! - Swapchain creation and recreation
//! - Frame synchronization and presentation
//! - Debug-overlay plumbing and event routing
//!
//! # Example
//!
//! ```no_run
//! use glint_app::{run_app, App, AppConfig, FrameContext};
//! use glint_gpu::GpuContext;
//!
//! #[derive(Default)]
//! struct MyDemo;
//!
//! impl App for MyDemo {
//!     fn on_initialize(
//!         &mut self,
//!         gpu: &GpuContext,
//!         width: u32,
//!         height: u32,
//!     ) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//!
//!     fn render_frame(&mut self, frame: &mut FrameContext<'_>) -> anyhow::Result<()> {
//!         frame.begin_pass("Main Pass", [0.0, 0.0, 0.0, 1.0]);
//!         frame.end_pass();
//!         Ok(())
//!     }
//!
//!     fn on_deinitialize(&mut self) -> anyhow::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     run_app(MyDemo, AppConfig::new("My Demo"))
//! }
//! ```

mod app;
mod context;
mod frame;
mod runner;

pub use app::{App, DEFAULT_APP_NAME};
pub use context::AppContext;
pub use frame::{FrameContext, FrameControls};
pub use runner::{run_app, AppConfig};

// Re-export commonly used types for convenience
pub use glint_gpu::{DeviceContext, GpuContext, GpuContextBuilder};
pub use winit::event::WindowEvent;
