use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(super) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    if prefer_srgb {
        return caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or(Some(first));
    }

    Some(first)
}

pub(super) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Swapchain size for a window: its physical inner size as reported by the
/// window system, or `None` while either dimension is zero.
///
/// Rebuilding it from the rounded logical size can be a pixel off at
/// fractional scale factors.
pub(super) fn backing_size(inner: PhysicalSize<u32>) -> Option<(u32, u32)> {
    (inner.width > 0 && inner.height > 0).then_some((inner.width, inner.height))
}

/// Reconfigures the swapchain for a physical size. A zero dimension (minimized
/// window) leaves the previous configuration in place.
pub(super) fn configure_for_size(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    physical: (u32, u32),
) -> bool {
    let (width, height) = physical;
    if width == 0 || height == 0 {
        return false;
    }
    if config.width == width && config.height == height {
        return true;
    }

    config.width = width;
    config.height = height;
    surface.configure(device, config);
    true
}

pub(super) fn recover_from_error(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            surface.configure(device, config);
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
