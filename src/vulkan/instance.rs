use std::ffi::{c_char, CStr, CString};

use ash::{
    khr::surface,
    vk::{make_api_version, ApplicationInfo, InstanceCreateInfo, API_VERSION_1_0},
    Entry, Instance,
};
use tracing::debug;

use crate::{
    capabilities::{extension_names, layer_names},
    error::{CapabilityKind, NegotiationError, Resource, Result},
    platform::InstanceRequest,
};

use super::debug_utils::debug_messenger_create_info;

const API_VERSION: u32 = API_VERSION_1_0;
const APPLICATION_NAME: &CStr = c"Vulkan Triangle";
const ENGINE_NAME: &CStr = c"No Engine";

/// The instance plus the surface loader every surface call goes through
pub struct VulkanInstance {
    pub(super) instance: Instance,
    pub(super) surface_loader: surface::Instance,
}

pub(super) fn available_extensions(entry: &Entry) -> Result<Vec<String>> {
    let properties = unsafe { entry.enumerate_instance_extension_properties(None) }
        .map_err(NegotiationError::query("vkEnumerateInstanceExtensionProperties"))?;
    Ok(extension_names(&properties))
}

pub(super) fn available_layers(entry: &Entry) -> Result<Vec<String>> {
    let properties = unsafe { entry.enumerate_instance_layer_properties() }
        .map_err(NegotiationError::query("vkEnumerateInstanceLayerProperties"))?;
    Ok(layer_names(&properties))
}

pub(super) fn create_instance(entry: &Entry, request: &InstanceRequest<'_>) -> Result<VulkanInstance> {
    let version_major = env!("CARGO_PKG_VERSION_MAJOR").parse::<u32>().unwrap_or_default();
    let version_minor = env!("CARGO_PKG_VERSION_MINOR").parse::<u32>().unwrap_or_default();
    let version_patch = env!("CARGO_PKG_VERSION_PATCH").parse::<u32>().unwrap_or_default();
    let app_version = make_api_version(0, version_major, version_minor, version_patch);

    let application_info = ApplicationInfo::default()
        .application_name(APPLICATION_NAME)
        .application_version(app_version)
        .api_version(API_VERSION)
        .engine_name(ENGINE_NAME)
        .engine_version(app_version);

    let extension_names = to_c_strings(request.extensions, CapabilityKind::InstanceExtension)?;
    let extension_name_pointers = as_pointers(&extension_names);
    let layer_names = to_c_strings(request.layers, CapabilityKind::ValidationLayer)?;
    let layer_name_pointers = as_pointers(&layer_names);

    let mut debug_create_info = debug_messenger_create_info();
    let mut instance_create_info = InstanceCreateInfo::default()
        .application_info(&application_info)
        .enabled_extension_names(&extension_name_pointers)
        .enabled_layer_names(&layer_name_pointers);
    if request.debug_messenger {
        // covers vkCreateInstance / vkDestroyInstance, which the messenger
        // itself cannot see
        instance_create_info = instance_create_info.push_next(&mut debug_create_info);
    }

    let instance = unsafe { entry.create_instance(&instance_create_info, None) }
        .map_err(NegotiationError::creation(Resource::Instance))?;
    debug!("Instance created");
    let surface_loader = surface::Instance::new(entry, &instance);

    Ok(VulkanInstance {
        instance,
        surface_loader,
    })
}

pub(super) fn destroy_instance(instance: VulkanInstance) {
    unsafe { instance.instance.destroy_instance(None) }
}

/// Names with an interior nul can never match a platform name
pub(super) fn to_c_strings(names: &[String], kind: CapabilityKind) -> Result<Vec<CString>> {
    names
        .iter()
        .map(|name| {
            CString::new(name.as_str()).map_err(|_| NegotiationError::UnsupportedCapability {
                kind,
                missing: vec![name.clone()],
            })
        })
        .collect()
}

pub(super) fn as_pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_nul_is_unsupported() {
        let names = vec!["VK_KHR_surface".to_owned(), "VK_KHR\0bad".to_owned()];
        let err = to_c_strings(&names, CapabilityKind::InstanceExtension).unwrap_err();
        match err {
            NegotiationError::UnsupportedCapability { kind, missing } => {
                assert_eq!(kind, CapabilityKind::InstanceExtension);
                assert_eq!(missing, vec!["VK_KHR\0bad"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn pointers_follow_names() {
        let names = to_c_strings(&["VK_LAYER_KHRONOS_validation".to_owned()], CapabilityKind::ValidationLayer)
            .unwrap();
        let pointers = as_pointers(&names);
        assert_eq!(pointers.len(), 1);
        let name = unsafe { CStr::from_ptr(pointers[0]) };
        assert_eq!(name.to_str().unwrap(), "VK_LAYER_KHRONOS_validation");
    }
}
