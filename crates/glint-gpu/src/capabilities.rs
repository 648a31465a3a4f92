//! GPU capability detection and the feature-tier display label.

use ash::vk;
use std::collections::HashSet;
use std::ffi::CStr;

/// GPU vendor identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Other(u32),
}

impl GpuVendor {
    /// Identify vendor from PCI vendor ID.
    pub fn from_vendor_id(id: u32) -> Self {
        match id {
            0x10DE => Self::Nvidia,
            0x1002 => Self::Amd,
            0x8086 => Self::Intel,
            0x106B => Self::Apple,
            other => Self::Other(other),
        }
    }
}

/// Detected GPU capabilities.
#[derive(Debug, Clone)]
pub struct GpuCapabilities {
    /// GPU vendor
    pub vendor: GpuVendor,
    /// Device name
    pub device_name: String,
    /// Vulkan API version
    pub api_version: u32,
    /// Driver version
    pub driver_version: u32,

    // Vulkan 1.3 core features
    /// Dynamic rendering support (VK 1.3 core)
    pub supports_dynamic_rendering: bool,
    /// Synchronization2 support (VK 1.3 core)
    pub supports_synchronization2: bool,

    /// Buffer device address support
    pub supports_buffer_device_address: bool,
    /// Descriptor indexing support
    pub supports_descriptor_indexing: bool,

    /// Device-local memory in MB
    pub device_local_memory_mb: u64,

    /// Available device extensions
    pub available_extensions: HashSet<String>,
}

impl GpuCapabilities {
    /// Query capabilities from a physical device.
    ///
    /// # Safety
    /// The instance and physical device must be valid.
    pub unsafe fn query(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Self {
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        let memory_properties =
            unsafe { instance.get_physical_device_memory_properties(physical_device) };

        let extensions = unsafe {
            instance
                .enumerate_device_extension_properties(physical_device)
                .unwrap_or_default()
        };

        let available_extensions: HashSet<String> = extensions
            .iter()
            .filter_map(|ext| {
                // SAFETY: extension_name is a NUL-terminated array provided by the driver.
                unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) }
                    .to_str()
                    .ok()
                    .map(String::from)
            })
            .collect();

        let vendor = GpuVendor::from_vendor_id(properties.vendor_id);
        // SAFETY: device_name is a NUL-terminated array provided by the driver.
        let device_name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned();

        let device_local_memory_mb: u64 = memory_properties
            .memory_heaps
            .iter()
            .take(memory_properties.memory_heap_count as usize)
            .filter(|heap| heap.flags.contains(vk::MemoryHeapFlags::DEVICE_LOCAL))
            .map(|heap| heap.size / (1024 * 1024))
            .sum();

        // Vulkan 1.3 features are core, so we check API version
        let api_version = properties.api_version;
        let has_vulkan_1_3 =
            vk::api_version_major(api_version) >= 1 && vk::api_version_minor(api_version) >= 3;

        Self {
            vendor,
            device_name,
            api_version,
            driver_version: properties.driver_version,

            supports_dynamic_rendering: has_vulkan_1_3,
            supports_synchronization2: has_vulkan_1_3,

            supports_buffer_device_address: has_vulkan_1_3
                || available_extensions.contains("VK_KHR_buffer_device_address"),
            supports_descriptor_indexing: has_vulkan_1_3
                || available_extensions.contains("VK_EXT_descriptor_indexing"),

            device_local_memory_mb,
            available_extensions,
        }
    }

    /// Check whether a device extension is available.
    pub fn has_extension(&self, name: &str) -> bool {
        self.available_extensions.contains(name)
    }

    /// Check if the GPU meets minimum requirements for the scaffold.
    pub fn meets_requirements(&self) -> bool {
        let api_major = vk::api_version_major(self.api_version);
        let api_minor = vk::api_version_minor(self.api_version);

        // Dynamic rendering is the only hard requirement (Vulkan 1.3 core).
        if api_major < 1 || (api_major == 1 && api_minor < 3) {
            return false;
        }

        self.supports_dynamic_rendering
    }

    /// Get a human-readable summary of capabilities.
    pub fn summary(&self) -> String {
        format!(
            "{} ({:?}) - Vulkan {}.{}.{} - {} MB VRAM",
            self.device_name,
            self.vendor,
            vk::api_version_major(self.api_version),
            vk::api_version_minor(self.api_version),
            vk::api_version_patch(self.api_version),
            self.device_local_memory_mb,
        )
    }
}

/// Capability tiers used for the overlay's device label.
///
/// [`TIER_TABLE`] lists tiers in priority order, newest and most specific
/// first. [`FeatureTier::detect`] walks the table and reports the first tier
/// the device supports, so a device matching several tiers is labeled with
/// the highest-priority one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTier {
    /// Hardware ray-tracing queries.
    RayTracing,
    /// Mesh/task shading pipeline.
    MeshShading,
    /// Full bindless resource access.
    Bindless,
    /// Vulkan 1.3 core feature set.
    Vulkan13,
    /// Vulkan 1.2 core feature set.
    Vulkan12,
}

/// Priority-ordered tier table; first supported entry wins.
pub const TIER_TABLE: [FeatureTier; 5] = [
    FeatureTier::RayTracing,
    FeatureTier::MeshShading,
    FeatureTier::Bindless,
    FeatureTier::Vulkan13,
    FeatureTier::Vulkan12,
];

impl FeatureTier {
    /// Display name for the tier.
    pub const fn label(self) -> &'static str {
        match self {
            Self::RayTracing => "Ray Tracing",
            Self::MeshShading => "Mesh Shading",
            Self::Bindless => "Bindless",
            Self::Vulkan13 => "Vulkan 1.3",
            Self::Vulkan12 => "Vulkan 1.2",
        }
    }

    /// Whether a device with the given capabilities supports this tier.
    pub fn supported_by(self, caps: &GpuCapabilities) -> bool {
        let api_major = vk::api_version_major(caps.api_version);
        let api_minor = vk::api_version_minor(caps.api_version);
        let at_least = |major: u32, minor: u32| {
            api_major > major || (api_major == major && api_minor >= minor)
        };

        match self {
            Self::RayTracing => {
                caps.has_extension("VK_KHR_acceleration_structure")
                    && caps.has_extension("VK_KHR_ray_query")
            }
            Self::MeshShading => caps.has_extension("VK_EXT_mesh_shader"),
            Self::Bindless => {
                caps.supports_descriptor_indexing && caps.supports_buffer_device_address
            }
            Self::Vulkan13 => at_least(1, 3),
            Self::Vulkan12 => at_least(1, 2),
        }
    }

    /// The first tier in [`TIER_TABLE`] order the device supports.
    pub fn detect(caps: &GpuCapabilities) -> Option<Self> {
        TIER_TABLE.into_iter().find(|tier| tier.supported_by(caps))
    }
}

/// Display label for the most advanced supported tier, empty when none match.
pub fn tier_label(caps: &GpuCapabilities) -> &'static str {
    FeatureTier::detect(caps).map_or("", FeatureTier::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(api_version: u32, extensions: &[&str]) -> GpuCapabilities {
        let available_extensions: HashSet<String> =
            extensions.iter().map(|e| (*e).to_string()).collect();
        let has_vulkan_1_3 = vk::api_version_major(api_version) >= 1
            && vk::api_version_minor(api_version) >= 3;

        GpuCapabilities {
            vendor: GpuVendor::Other(0),
            device_name: "Test Device".to_string(),
            api_version,
            driver_version: 0,
            supports_dynamic_rendering: has_vulkan_1_3,
            supports_synchronization2: has_vulkan_1_3,
            supports_buffer_device_address: has_vulkan_1_3
                || available_extensions.contains("VK_KHR_buffer_device_address"),
            supports_descriptor_indexing: has_vulkan_1_3
                || available_extensions.contains("VK_EXT_descriptor_indexing"),
            device_local_memory_mb: 4096,
            available_extensions,
        }
    }

    #[test]
    fn vendor_identification() {
        assert_eq!(GpuVendor::from_vendor_id(0x10DE), GpuVendor::Nvidia);
        assert_eq!(GpuVendor::from_vendor_id(0x1002), GpuVendor::Amd);
        assert_eq!(GpuVendor::from_vendor_id(0x8086), GpuVendor::Intel);
    }

    #[test]
    fn first_matching_tier_wins() {
        // Supports both mesh shading and every core tier below it; the table
        // order must pick mesh shading even though later entries also match.
        let caps = caps(vk::API_VERSION_1_3, &["VK_EXT_mesh_shader"]);
        assert_eq!(FeatureTier::detect(&caps), Some(FeatureTier::MeshShading));
        assert_eq!(tier_label(&caps), "Mesh Shading");
    }

    #[test]
    fn ray_tracing_outranks_mesh_shading() {
        let caps = caps(
            vk::API_VERSION_1_3,
            &[
                "VK_KHR_acceleration_structure",
                "VK_KHR_ray_query",
                "VK_EXT_mesh_shader",
            ],
        );
        assert_eq!(tier_label(&caps), "Ray Tracing");
    }

    #[test]
    fn ray_tracing_requires_both_extensions() {
        let caps = caps(vk::API_VERSION_1_3, &["VK_KHR_acceleration_structure"]);
        // Only half the ray-tracing requirement; falls through to bindless
        // (descriptor indexing and buffer device address are 1.3 core).
        assert_eq!(tier_label(&caps), "Bindless");
    }

    #[test]
    fn core_tiers_follow_api_version() {
        assert_eq!(tier_label(&caps(vk::API_VERSION_1_2, &[])), "Vulkan 1.2");

        let caps_13 = GpuCapabilities {
            supports_descriptor_indexing: false,
            supports_buffer_device_address: false,
            ..caps(vk::API_VERSION_1_3, &[])
        };
        assert_eq!(tier_label(&caps_13), "Vulkan 1.3");
    }

    #[test]
    fn no_matching_tier_yields_empty_label() {
        assert_eq!(FeatureTier::detect(&caps(vk::API_VERSION_1_1, &[])), None);
        assert_eq!(tier_label(&caps(vk::API_VERSION_1_1, &[])), "");
    }

    #[test]
    fn requirements_need_vulkan_1_3() {
        assert!(caps(vk::API_VERSION_1_3, &[]).meets_requirements());
        assert!(!caps(vk::API_VERSION_1_2, &[]).meets_requirements());
    }
}
