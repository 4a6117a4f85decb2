use ash::vk::QueueFlags;

use crate::{error::Result, platform::DeviceProbe};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// family capable of runing graphics related commands
    pub graphics_family: Option<u32>,
    /// family capable of displaying results on the screen
    pub present_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// True if all queue families are available for this physical
    /// device.
    pub fn is_complete(&self) -> bool {
        self.graphics_family.is_some() && self.present_family.is_some()
    }

    /// The distinct family indices, graphics first. A single entry when
    /// one family does both jobs.
    pub fn unique_families(&self) -> Vec<u32> {
        let mut families = Vec::with_capacity(2);
        for index in [self.graphics_family, self.present_family].into_iter().flatten() {
            if !families.contains(&index) {
                families.push(index);
            }
        }
        families
    }

    pub fn is_shared(&self) -> bool {
        self.is_complete() && self.graphics_family == self.present_family
    }
}

/// Walks the device's queue families in index order, recording a family for
/// each job it can do, and stops at the first family index where both jobs
/// have been covered.
pub fn find_queue_families<P: DeviceProbe>(
    probe: &P,
    device: P::Device,
) -> Result<QueueFamilyIndices> {
    let mut indices = QueueFamilyIndices::default();

    for (index, family) in probe.queue_families(device).iter().enumerate() {
        let index = index as u32;
        if family.queue_count == 0 {
            continue;
        }
        if family.queue_flags.contains(QueueFlags::GRAPHICS) {
            indices.graphics_family = Some(index);
        }
        if probe.supports_presentation(device, index)? {
            indices.present_family = Some(index);
        }
        if indices.is_complete() {
            break;
        }
    }

    Ok(indices)
}
