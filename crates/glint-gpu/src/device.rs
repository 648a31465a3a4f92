//! The device/queue snapshot an application keeps after initialization.

use crate::capabilities::{tier_label, GpuCapabilities};
use crate::command::drain_queue;
use crate::error::Result;
use ash::vk;
use std::sync::Arc;

/// Assert that raw device and queue handles are non-null.
///
/// A null handle here is a fatal programming error in the host driver, not a
/// recoverable condition: the process traps instead of limping on.
#[track_caller]
pub fn validate_device_handles(device: vk::Device, queue: vk::Queue) {
    assert!(
        device != vk::Device::null(),
        "device handle must be non-null"
    );
    assert!(queue != vk::Queue::null(), "queue handle must be non-null");
}

/// Non-owned device and queue references held for an application's lifetime.
///
/// Built once during initialization and immutable afterwards. The underlying
/// Vulkan objects are owned and torn down by the host, never by the
/// application.
pub struct DeviceContext {
    device: Arc<ash::Device>,
    queue: vk::Queue,
    device_name: String,
    tier_label: &'static str,
}

impl DeviceContext {
    /// Snapshot the device, queue, and display labels.
    ///
    /// # Panics
    /// Panics if either handle is null (see [`validate_device_handles`]).
    pub fn new(device: Arc<ash::Device>, queue: vk::Queue, caps: &GpuCapabilities) -> Self {
        validate_device_handles(device.handle(), queue);
        Self {
            device,
            queue,
            device_name: caps.device_name.clone(),
            tier_label: tier_label(caps),
        }
    }

    /// The Vulkan device.
    pub fn device(&self) -> &ash::Device {
        &self.device
    }

    /// The command-submission queue.
    pub fn queue(&self) -> vk::Queue {
        self.queue
    }

    /// The device's display name.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// The feature-tier label computed at initialization.
    pub fn tier_label(&self) -> &'static str {
        self.tier_label
    }

    /// Block until all work previously submitted to the queue has completed.
    pub fn drain(&self) -> Result<()> {
        unsafe { drain_queue(&self.device, self.queue) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    #[test]
    #[should_panic(expected = "device handle must be non-null")]
    fn null_device_handle_traps() {
        validate_device_handles(vk::Device::null(), vk::Queue::from_raw(1));
    }

    #[test]
    #[should_panic(expected = "queue handle must be non-null")]
    fn null_queue_handle_traps() {
        validate_device_handles(vk::Device::from_raw(1), vk::Queue::null());
    }

    #[test]
    fn non_null_handles_pass() {
        validate_device_handles(vk::Device::from_raw(1), vk::Queue::from_raw(1));
    }
}
