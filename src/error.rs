use std::{fmt, io, path::PathBuf};

use ash::vk;
use thiserror::Error;

pub type Result<T, E = NegotiationError> = std::result::Result<T, E>;

/// Which set of names a capability check ran against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityKind {
    InstanceExtension,
    ValidationLayer,
    DeviceExtension,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CapabilityKind::InstanceExtension => "instance extension",
            CapabilityKind::ValidationLayer => "validation layer",
            CapabilityKind::DeviceExtension => "device extension",
        })
    }
}

/// Platform objects the negotiation creates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Instance,
    DebugMessenger,
    Surface,
    LogicalDevice,
    SwapChain,
    ImageView,
    ShaderModule,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Instance => "instance",
            Resource::DebugMessenger => "debug messenger",
            Resource::Surface => "surface",
            Resource::LogicalDevice => "logical device",
            Resource::SwapChain => "swap chain",
            Resource::ImageView => "image view",
            Resource::ShaderModule => "shader module",
        })
    }
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("required {kind}(s) not supported: {}", .missing.join(", "))]
    UnsupportedCapability {
        kind: CapabilityKind,
        missing: Vec<String>,
    },
    #[error("no GPUs with Vulkan support found")]
    NoDevicesFound,
    #[error("none of the {candidates} enumerated GPUs is suitable")]
    NoSuitableDevice { candidates: usize },
    #[error("failed to create {resource}: {result}")]
    ResourceCreationFailed {
        resource: Resource,
        result: vk::Result,
    },
    #[error("platform query `{query}` failed: {result}")]
    QueryFailed {
        query: &'static str,
        result: vk::Result,
    },
    /// A step ran before the one that produces what it needs
    #[error("cannot {step}: no {missing} yet")]
    MissingPrerequisite {
        step: &'static str,
        missing: &'static str,
    },
    #[error("failed to load the Vulkan library: {0}")]
    LoaderUnavailable(String),
    #[error("failed to read shader byte-code from {}: {source}", .path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NegotiationError {
    /// Adapter for `map_err` on creation calls
    pub fn creation(resource: Resource) -> impl FnOnce(vk::Result) -> Self {
        move |result| NegotiationError::ResourceCreationFailed { resource, result }
    }

    /// Adapter for `map_err` on read-only queries
    pub fn query(query: &'static str) -> impl FnOnce(vk::Result) -> Self {
        move |result| NegotiationError::QueryFailed { query, result }
    }
}
