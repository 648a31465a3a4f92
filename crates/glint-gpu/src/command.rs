//! Command buffer recording and submission helpers.

use crate::error::Result;
use crate::sync::{create_fence, wait_for_fence};
use ash::vk;
use glint_core::ScopeGuard;

/// Begin recording a command buffer.
///
/// # Safety
/// The device and command buffer must be valid.
pub unsafe fn begin_command_buffer(
    device: &ash::Device,
    cmd: vk::CommandBuffer,
    flags: vk::CommandBufferUsageFlags,
) -> Result<()> {
    let begin_info = vk::CommandBufferBeginInfo::default().flags(flags);
    unsafe { device.begin_command_buffer(cmd, &begin_info)? };
    Ok(())
}

/// End recording a command buffer.
///
/// # Safety
/// The device and command buffer must be valid.
pub unsafe fn end_command_buffer(device: &ash::Device, cmd: vk::CommandBuffer) -> Result<()> {
    unsafe { device.end_command_buffer(cmd)? };
    Ok(())
}

/// Submit command buffers to a queue.
///
/// # Safety
/// All handles must be valid.
pub unsafe fn submit_command_buffers(
    device: &ash::Device,
    queue: vk::Queue,
    command_buffers: &[vk::CommandBuffer],
    wait_semaphores: &[vk::Semaphore],
    wait_stages: &[vk::PipelineStageFlags],
    signal_semaphores: &[vk::Semaphore],
    fence: vk::Fence,
) -> Result<()> {
    let submit_info = vk::SubmitInfo::default()
        .command_buffers(command_buffers)
        .wait_semaphores(wait_semaphores)
        .wait_dst_stage_mask(wait_stages)
        .signal_semaphores(signal_semaphores);

    unsafe { device.queue_submit(queue, &[submit_info], fence)? };
    Ok(())
}

/// Block until all previously submitted work on `queue` has completed.
///
/// Submits an empty batch behind a fresh fence and waits on it, so anything
/// the queue accepted before this call is finished when it returns. The fence
/// is destroyed on every exit path.
///
/// # Safety
/// The device and queue must be valid.
pub unsafe fn drain_queue(device: &ash::Device, queue: vk::Queue) -> Result<()> {
    let fence = unsafe { create_fence(device, false)? };
    let _fence_guard = ScopeGuard::new(fence, |f| unsafe {
        device.destroy_fence(f, None);
    });

    unsafe {
        device.queue_submit(queue, &[], fence)?;
        wait_for_fence(device, fence, u64::MAX)?;
    }

    Ok(())
}
