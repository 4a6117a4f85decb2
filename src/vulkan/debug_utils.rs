use std::ffi::CStr;

use ash::{
    ext::debug_utils,
    vk::{
        self, Bool32, DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT,
        DebugUtilsMessengerCallbackDataEXT, DebugUtilsMessengerCreateInfoEXT,
        DebugUtilsMessengerEXT,
    },
    Entry,
};
use tracing::{event, Level};

use crate::error::{NegotiationError, Resource, Result};

use super::instance::VulkanInstance;

/// The installed validation callback
pub struct VulkanDebugMessenger {
    debug_utils: debug_utils::Instance,
    messenger: DebugUtilsMessengerEXT,
}

pub(super) fn debug_messenger_create_info<'a>() -> DebugUtilsMessengerCreateInfoEXT<'a> {
    DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            DebugUtilsMessageSeverityFlagsEXT::ERROR
                | DebugUtilsMessageSeverityFlagsEXT::WARNING
                | DebugUtilsMessageSeverityFlagsEXT::INFO
                | DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
        )
        .message_type(
            DebugUtilsMessageTypeFlagsEXT::GENERAL
                | DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                | DebugUtilsMessageTypeFlagsEXT::VALIDATION,
        )
        .pfn_user_callback(Some(vulkan_debug_utils_callback))
}

pub(super) fn install(entry: &Entry, instance: &VulkanInstance) -> Result<VulkanDebugMessenger> {
    let debug_utils = debug_utils::Instance::new(entry, &instance.instance);
    let create_info = debug_messenger_create_info();
    let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
        .map_err(NegotiationError::creation(Resource::DebugMessenger))?;
    Ok(VulkanDebugMessenger {
        debug_utils,
        messenger,
    })
}

pub(super) fn destroy(messenger: VulkanDebugMessenger) {
    unsafe {
        messenger
            .debug_utils
            .destroy_debug_utils_messenger(messenger.messenger, None)
    }
}

pub(super) fn extension_name() -> String {
    debug_utils::NAME.to_string_lossy().into_owned()
}

fn severity_level(severity: DebugUtilsMessageSeverityFlagsEXT) -> Level {
    match severity {
        DebugUtilsMessageSeverityFlagsEXT::VERBOSE => Level::TRACE,
        DebugUtilsMessageSeverityFlagsEXT::INFO => Level::INFO,
        DebugUtilsMessageSeverityFlagsEXT::WARNING => Level::WARN,
        DebugUtilsMessageSeverityFlagsEXT::ERROR => Level::ERROR,
        _ => Level::DEBUG,
    }
}

unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    message_type: DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const DebugUtilsMessengerCallbackDataEXT<'_>,
    _p_user_data: *mut std::ffi::c_void,
) -> Bool32 {
    let message = if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        String::new()
    } else {
        CStr::from_ptr((*p_callback_data).p_message)
            .to_string_lossy()
            .into_owned()
    };
    let ty = format!("{:?}", message_type).to_lowercase();

    match severity_level(message_severity) {
        Level::TRACE => event!(Level::TRACE, message = message, ty = ty),
        Level::INFO => event!(Level::INFO, message = message, ty = ty),
        Level::WARN => event!(Level::WARN, message = message, ty = ty),
        Level::ERROR => event!(Level::ERROR, message = message, ty = ty),
        _ => event!(Level::DEBUG, message = message, ty = ty),
    }
    // dont abort the call that triggered the message
    vk::FALSE
}
