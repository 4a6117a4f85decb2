use std::{collections::HashSet, ffi::CStr};

use ash::vk::{ExtensionProperties, LayerProperties};

use crate::error::{CapabilityKind, NegotiationError, Result};

/// Names from `required` that do not appear in `available`, in required
/// order and without repeats.
pub fn missing_names<R, A>(required: &[R], available: &[A]) -> Vec<String>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    let available: HashSet<&str> = available.iter().map(AsRef::as_ref).collect();
    let mut seen = HashSet::new();
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !available.contains(name) && seen.insert(*name))
        .map(str::to_owned)
        .collect()
}

/// Succeeds iff every required name is available.
pub fn ensure_supported<R, A>(kind: CapabilityKind, required: &[R], available: &[A]) -> Result<()>
where
    R: AsRef<str>,
    A: AsRef<str>,
{
    let missing = missing_names(required, available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(NegotiationError::UnsupportedCapability { kind, missing })
    }
}

pub fn extension_names(properties: &[ExtensionProperties]) -> Vec<String> {
    properties
        .iter()
        .filter_map(|extension| extension.extension_name_as_c_str().ok())
        .map(c_str_to_owned)
        .collect()
}

pub fn layer_names(properties: &[LayerProperties]) -> Vec<String> {
    properties
        .iter()
        .filter_map(|layer| layer.layer_name_as_c_str().ok())
        .map(c_str_to_owned)
        .collect()
}

pub(crate) fn c_str_to_owned(name: &CStr) -> String {
    name.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVAILABLE: [&str; 3] = ["VK_KHR_surface", "VK_KHR_xcb_surface", "VK_EXT_debug_utils"];

    #[test]
    fn subset_is_supported_in_any_order() {
        let required = ["VK_EXT_debug_utils", "VK_KHR_surface"];
        assert!(ensure_supported(CapabilityKind::InstanceExtension, &required, &AVAILABLE).is_ok());

        let mut reversed = AVAILABLE;
        reversed.reverse();
        let required = ["VK_KHR_surface", "VK_EXT_debug_utils"];
        assert!(ensure_supported(CapabilityKind::InstanceExtension, &required, &reversed).is_ok());
    }

    #[test]
    fn empty_requirement_is_always_supported() {
        let required: [&str; 0] = [];
        let available: [&str; 0] = [];
        assert!(ensure_supported(CapabilityKind::ValidationLayer, &required, &available).is_ok());
    }

    #[test]
    fn every_missing_name_is_reported_once() {
        let required = [
            "VK_KHR_surface",
            "VK_KHR_wayland_surface",
            "VK_KHR_win32_surface",
            "VK_KHR_wayland_surface",
        ];
        let err = ensure_supported(CapabilityKind::InstanceExtension, &required, &AVAILABLE)
            .unwrap_err();
        match err {
            NegotiationError::UnsupportedCapability { kind, missing } => {
                assert_eq!(kind, CapabilityKind::InstanceExtension);
                assert_eq!(missing, vec!["VK_KHR_wayland_surface", "VK_KHR_win32_surface"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn names_compare_exactly() {
        let required = ["vk_khr_surface"];
        assert_eq!(missing_names(&required, &AVAILABLE), vec!["vk_khr_surface"]);
        let required = ["VK_KHR_surface "];
        assert_eq!(missing_names(&required, &AVAILABLE).len(), 1);
    }

    #[test]
    fn extension_properties_become_names() {
        let mut properties = ExtensionProperties::default();
        for (dst, src) in properties
            .extension_name
            .iter_mut()
            .zip(b"VK_KHR_swapchain".iter())
        {
            *dst = *src as _;
        }
        assert_eq!(extension_names(&[properties]), vec!["VK_KHR_swapchain"]);
    }
}
