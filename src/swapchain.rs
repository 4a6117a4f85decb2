use ash::vk::{
    ColorSpaceKHR, Extent2D, Format, PresentModeKHR, SurfaceCapabilitiesKHR,
    SurfaceFormatKHR, SurfaceTransformFlagsKHR,
};

use crate::surface_support::SurfaceSupportDetails;

/// Format used when the surface leaves the choice to us
pub const DEFAULT_SURFACE_FORMAT: SurfaceFormatKHR = SurfaceFormatKHR {
    format: Format::B8G8R8A8_UNORM,
    color_space: ColorSpaceKHR::SRGB_NONLINEAR,
};

/// Everything the swap chain gets created with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapchainParameters {
    pub surface_format: SurfaceFormatKHR,
    pub present_mode: PresentModeKHR,
    pub extent: Extent2D,
    pub image_count: u32,
    pub pre_transform: SurfaceTransformFlagsKHR,
}

impl SwapchainParameters {
    pub fn choose(
        support: &SurfaceSupportDetails,
        preferred_format: SurfaceFormatKHR,
        requested_extent: Extent2D,
    ) -> Self {
        Self {
            surface_format: choose_surface_format(&support.formats, preferred_format),
            present_mode: choose_present_mode(&support.present_modes),
            extent: choose_extent(&support.capabilities, requested_extent),
            image_count: choose_image_count(&support.capabilities),
            // no extra transforms - just pass in current transform
            pre_transform: support.capabilities.current_transform,
        }
    }
}

/// Picks the preferential surface format to use from the available.
///
/// A lone `UNDEFINED` entry means the surface has no preference, so the
/// preferred format is used outright. An empty list is treated the same way.
pub fn choose_surface_format(
    available: &[SurfaceFormatKHR],
    preferred: SurfaceFormatKHR,
) -> SurfaceFormatKHR {
    match available {
        [] => preferred,
        [only] if only.format == Format::UNDEFINED => preferred,
        _ => available
            .iter()
            .copied()
            .find(|format| {
                format.format == preferred.format && format.color_space == preferred.color_space
            })
            .unwrap_or(available[0]),
    }
}

/// Picks the preferential present mode to use based on the available
pub fn choose_present_mode(available: &[PresentModeKHR]) -> PresentModeKHR {
    // prefer mailbox, where if we can render faster than the screen can present
    // and the queue fills up, we'll replace the last image with the most up to
    // date version
    if available.contains(&PresentModeKHR::MAILBOX) {
        return PresentModeKHR::MAILBOX;
    }
    if available.contains(&PresentModeKHR::IMMEDIATE) {
        return PresentModeKHR::IMMEDIATE;
    }
    // otherwise, use FIFO - basically vertical sync. This is the only setting
    // guaranteed to be available on all systems
    PresentModeKHR::FIFO
}

/// Returns the "extent" of the images to draw - the resolution to use *in pixels*.
pub fn choose_extent(capabilities: &SurfaceCapabilitiesKHR, requested: Extent2D) -> Extent2D {
    match capabilities.current_extent.width {
        // the surface lets the application decide; follow the window
        u32::MAX => Extent2D {
            width: clamp_axis(
                requested.width,
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: clamp_axis(
                requested.height,
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        },
        _ => capabilities.current_extent,
    }
}

/// Returns how many images the swap chain should use based on its support
pub fn choose_image_count(capabilities: &SurfaceCapabilitiesKHR) -> u32 {
    let image_count = capabilities.min_image_count.saturating_add(1);
    match capabilities.max_image_count {
        // zero means there is no max
        0 => image_count,
        max_image_count => image_count.min(max_image_count),
    }
}

// u32::clamp panics when min > max
fn clamp_axis(value: u32, min: u32, max: u32) -> u32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: Format, color_space: ColorSpaceKHR) -> SurfaceFormatKHR {
        SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn bounded_caps(current: Extent2D) -> SurfaceCapabilitiesKHR {
        SurfaceCapabilitiesKHR {
            current_extent: current,
            min_image_extent: Extent2D {
                width: 100,
                height: 100,
            },
            max_image_extent: Extent2D {
                width: 2000,
                height: 2000,
            },
            ..Default::default()
        }
    }

    const CLIENT_DECIDES: Extent2D = Extent2D {
        width: u32::MAX,
        height: u32::MAX,
    };

    #[test]
    fn undefined_format_means_use_the_default() {
        let available = [format(Format::UNDEFINED, ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT)];
        assert_eq!(
            choose_surface_format(&available, DEFAULT_SURFACE_FORMAT),
            DEFAULT_SURFACE_FORMAT
        );
    }

    #[test]
    fn exact_match_wins_regardless_of_position() {
        let available = [
            format(Format::R8G8B8A8_UNORM, ColorSpaceKHR::SRGB_NONLINEAR),
            format(Format::B8G8R8A8_UNORM, ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(
            choose_surface_format(&available, DEFAULT_SURFACE_FORMAT),
            DEFAULT_SURFACE_FORMAT
        );
    }

    #[test]
    fn falls_back_to_first_entry() {
        let available = [
            format(Format::R8G8B8A8_UNORM, ColorSpaceKHR::SRGB_NONLINEAR),
            format(Format::B8G8R8A8_UNORM, ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
        ];
        assert_eq!(
            choose_surface_format(&available, DEFAULT_SURFACE_FORMAT),
            available[0]
        );
    }

    #[test]
    fn undefined_among_others_is_not_the_sentinel() {
        let available = [
            format(Format::R8G8B8A8_UNORM, ColorSpaceKHR::SRGB_NONLINEAR),
            format(Format::UNDEFINED, ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(
            choose_surface_format(&available, DEFAULT_SURFACE_FORMAT),
            available[0]
        );
    }

    #[test]
    fn present_mode_priorities() {
        use PresentModeKHR as Mode;
        assert_eq!(choose_present_mode(&[Mode::FIFO, Mode::IMMEDIATE]), Mode::IMMEDIATE);
        assert_eq!(
            choose_present_mode(&[Mode::FIFO, Mode::MAILBOX, Mode::IMMEDIATE]),
            Mode::MAILBOX
        );
        assert_eq!(
            choose_present_mode(&[Mode::IMMEDIATE, Mode::FIFO, Mode::MAILBOX]),
            Mode::MAILBOX
        );
        assert_eq!(choose_present_mode(&[Mode::FIFO]), Mode::FIFO);
        assert_eq!(choose_present_mode(&[Mode::FIFO_RELAXED, Mode::FIFO]), Mode::FIFO);
    }

    #[test]
    fn extent_follows_window_when_surface_lets_us_choose() {
        let caps = bounded_caps(CLIENT_DECIDES);
        let requested = Extent2D {
            width: 800,
            height: 600,
        };
        assert_eq!(choose_extent(&caps, requested), requested);
    }

    #[test]
    fn extent_is_clamped_into_bounds() {
        let caps = bounded_caps(CLIENT_DECIDES);
        let small = Extent2D {
            width: 50,
            height: 50,
        };
        assert_eq!(
            choose_extent(&caps, small),
            Extent2D {
                width: 100,
                height: 100
            }
        );
        let mixed = Extent2D {
            width: 4000,
            height: 10,
        };
        assert_eq!(
            choose_extent(&caps, mixed),
            Extent2D {
                width: 2000,
                height: 100
            }
        );
    }

    #[test]
    fn current_extent_is_used_verbatim() {
        let current = Extent2D {
            width: 1024,
            height: 768,
        };
        let caps = bounded_caps(current);
        let requested = Extent2D {
            width: 50,
            height: 50,
        };
        assert_eq!(choose_extent(&caps, requested), current);
    }

    #[test]
    fn image_count_is_one_above_minimum_within_max() {
        let mut caps = SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 0,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&caps), 3);
        caps.max_image_count = 2;
        assert_eq!(choose_image_count(&caps), 2);
        caps.max_image_count = 8;
        assert_eq!(choose_image_count(&caps), 3);
    }
}
