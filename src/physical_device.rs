use ash::vk::{PhysicalDeviceProperties, PhysicalDeviceType};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    capabilities::{c_str_to_owned, missing_names},
    error::{NegotiationError, Result},
    platform::DeviceProbe,
    queue_families::{find_queue_families, QueueFamilyIndices},
    surface_support::{query_surface_support, SurfaceSupportDetails},
};

/// How to pick between several suitable GPUs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// first suitable GPU in enumeration order
    #[default]
    FirstSuitable,
    /// suitable GPU with the best `Candidate::score`
    HighestScore,
}

/// A physical device together with everything we learned about it while
/// deciding whether it can drive the surface.
#[derive(Clone, Debug)]
pub struct Candidate<D> {
    pub device: D,
    pub properties: PhysicalDeviceProperties,
    pub queue_families: QueueFamilyIndices,
    pub surface_support: SurfaceSupportDetails,
    pub extensions_supported: bool,
}

impl<D: Copy> Candidate<D> {
    pub fn evaluate<P>(probe: &P, device: D, required_extensions: &[String]) -> Result<Self>
    where
        P: DeviceProbe<Device = D>,
    {
        let properties = probe.device_properties(device);
        let queue_families = find_queue_families(probe, device)?;
        let available_extensions = probe.device_extensions(device)?;
        let missing = missing_names(required_extensions, &available_extensions);
        if !missing.is_empty() {
            debug!("Device is missing extensions: {:?}", missing);
        }
        let surface_support = query_surface_support(probe, device)?;

        Ok(Self {
            device,
            properties,
            queue_families,
            surface_support,
            extensions_supported: missing.is_empty(),
        })
    }

    pub fn is_suitable(&self) -> bool {
        self.queue_families.is_complete()
            && self.extensions_supported
            && self.surface_support.is_swap_chain_adequate()
    }

    pub fn name(&self) -> String {
        self.properties
            .device_name_as_c_str()
            .map(c_str_to_owned)
            .unwrap_or_default()
    }

    /// higher is better
    pub fn score(&self) -> u64 {
        let type_score = match self.properties.device_type {
            PhysicalDeviceType::DISCRETE_GPU => 1000,
            PhysicalDeviceType::INTEGRATED_GPU => 100,
            PhysicalDeviceType::VIRTUAL_GPU => 10,
            _ => 0,
        };
        type_score + u64::from(self.properties.limits.max_image_dimension2_d)
    }
}

/// Enumerates the GPUs and picks one that has complete queue families, the
/// required device extensions and something to build a swap chain from.
pub fn select_physical_device<P: DeviceProbe>(
    probe: &P,
    required_extensions: &[String],
    policy: SelectionPolicy,
) -> Result<Candidate<P::Device>> {
    let devices = probe.enumerate_devices()?;
    if devices.is_empty() {
        return Err(NegotiationError::NoDevicesFound);
    }
    debug!("Found {} physical devices", devices.len());

    let mut best: Option<Candidate<P::Device>> = None;
    for device in devices.iter().copied() {
        let candidate = Candidate::evaluate(probe, device, required_extensions)?;
        if !candidate.is_suitable() {
            debug!(
                "Rejecting {:?}: queues complete {}, extensions {}, swap chain adequate {}",
                candidate.name(),
                candidate.queue_families.is_complete(),
                candidate.extensions_supported,
                candidate.surface_support.is_swap_chain_adequate()
            );
            continue;
        }
        match policy {
            SelectionPolicy::FirstSuitable => {
                best = Some(candidate);
                break;
            }
            SelectionPolicy::HighestScore => {
                if best
                    .as_ref()
                    .map_or(true, |current| candidate.score() > current.score())
                {
                    best = Some(candidate);
                }
            }
        }
    }

    let selected = best.ok_or(NegotiationError::NoSuitableDevice {
        candidates: devices.len(),
    })?;
    info!("Selected physical device {:?}", selected.name());
    Ok(selected)
}
