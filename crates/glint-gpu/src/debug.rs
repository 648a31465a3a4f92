//! Debug-utils command labels.
//!
//! Wraps the `VK_EXT_debug_utils` command-label API so recorded regions show
//! up as named groups in capture tools. Loaded only when the extension is
//! present; callers treat the wrapper as optional and skip labeling otherwise.

use ash::vk;
use std::ffi::CString;

/// Debug-utils device function table.
pub struct DebugUtils {
    device: ash::ext::debug_utils::Device,
}

impl DebugUtils {
    /// Load the debug-utils device functions.
    pub fn new(instance: &ash::Instance, device: &ash::Device) -> Self {
        Self {
            device: ash::ext::debug_utils::Device::new(instance, device),
        }
    }

    /// Open a named label region on the command buffer.
    pub fn cmd_begin_label(&self, cmd: vk::CommandBuffer, name: &str) {
        let name = CString::new(name).unwrap_or_default();
        let label = vk::DebugUtilsLabelEXT::default().label_name(&name);
        unsafe {
            self.device.cmd_begin_debug_utils_label(cmd, &label);
        }
    }

    /// Close the most recently opened label region.
    pub fn cmd_end_label(&self, cmd: vk::CommandBuffer) {
        unsafe {
            self.device.cmd_end_debug_utils_label(cmd);
        }
    }
}
