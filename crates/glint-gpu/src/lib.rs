//! Vulkan plumbing for the Glint scaffold.
//!
//! This crate provides:
//! - Vulkan instance and device management
//! - GPU capability detection and the feature-tier display label
//! - Surface and swapchain handling
//! - Command buffer, synchronization, and dynamic-rendering helpers
//! - Debug-utils command labels

pub mod capabilities;
pub mod command;
pub mod context;
pub mod debug;
pub mod device;
pub mod error;
pub mod instance;
pub mod render;
pub mod surface;
pub mod swapchain;
pub mod sync;

pub use capabilities::{tier_label, FeatureTier, GpuCapabilities, GpuVendor, TIER_TABLE};
pub use context::{GpuContext, GpuContextBuilder};
pub use debug::DebugUtils;
pub use device::{validate_device_handles, DeviceContext};
pub use error::{GpuError, Result};
pub use surface::{SurfaceCapabilities, SurfaceContext};
pub use swapchain::Swapchain;
