// SPDX-License-Identifier: GPL-3.0-only

//! EGL platform glue for rendering onto a surface of the remote
//! connection.

use std::os::raw::{c_int, c_void};
use std::sync::Arc;

use smithay::backend::egl::{
    display::EGLDisplayHandle,
    ffi,
    native::{EGLNativeDisplay, EGLNativeSurface, EGLPlatform},
    wrap_egl_call_ptr, EGLError,
};
use wayland_client::{
    protocol::{wl_display::WlDisplay, wl_surface::WlSurface},
    Proxy,
};

/// The Wayland EGL platforms, KHR first with the EXT alias as fallback
/// for older drivers.
const WAYLAND_PLATFORMS: [(ffi::egl::types::EGLenum, &str, &[&str]); 2] = [
    (ffi::egl::PLATFORM_WAYLAND_KHR, "PLATFORM_WAYLAND_KHR", &["EGL_KHR_platform_wayland"]),
    (ffi::egl::PLATFORM_WAYLAND_EXT, "PLATFORM_WAYLAND_EXT", &["EGL_EXT_platform_wayland"]),
];

/// EGL display over the remote `wl_display`.
#[derive(Debug)]
pub struct RemoteEglDisplay {
    display: WlDisplay,
}

impl RemoteEglDisplay {
    pub fn new(display: WlDisplay) -> Self {
        Self { display }
    }
}

impl EGLNativeDisplay for RemoteEglDisplay {
    fn supported_platforms(&self) -> Vec<EGLPlatform<'_>> {
        // The pointer stays valid for as long as the proxy this struct
        // holds; smithay only uses it during display creation.
        let native = self.display.id().as_ptr() as *mut c_void;

        WAYLAND_PLATFORMS
            .iter()
            .map(|&(platform, name, required)| {
                EGLPlatform::new(platform, name, native, vec![ffi::egl::NONE as ffi::EGLint], required)
            })
            .collect()
    }
}

/// EGL window surface over a remote `wl_surface`.
#[derive(Debug)]
pub struct RemoteEglSurface {
    // The wl_egl_surface must drop before the wl_surface it wraps.
    wl_egl_surface: wayland_egl::WlEglSurface,
    _surface: WlSurface,
}

impl RemoteEglSurface {
    /// The caller must keep `surface` alive for as long as the EGL
    /// surface exists.
    pub unsafe fn new(surface: WlSurface, width: i32, height: i32) -> anyhow::Result<Self> {
        let wl_egl_surface = wayland_egl::WlEglSurface::new(surface.id(), width, height)
            .map_err(|err| anyhow::anyhow!("failed to create wl_egl_window: {err}"))?;
        Ok(Self { wl_egl_surface, _surface: surface })
    }
}

unsafe impl EGLNativeSurface for RemoteEglSurface {
    unsafe fn create(
        &self,
        display: &Arc<EGLDisplayHandle>,
        config_id: ffi::egl::types::EGLConfig,
    ) -> Result<*const c_void, EGLError> {
        let window = self.wl_egl_surface.ptr();
        if window.is_null() {
            return Err(EGLError::BadNativeWindow);
        }

        // Request an ordinary back-buffered render surface.
        let attributes: [c_int; 3] = [
            ffi::egl::RENDER_BUFFER as c_int,
            ffi::egl::BACK_BUFFER as c_int,
            ffi::egl::NONE as c_int,
        ];

        wrap_egl_call_ptr(|| unsafe {
            ffi::egl::CreatePlatformWindowSurfaceEXT(
                display.handle,
                config_id,
                window as *mut _,
                attributes.as_ptr(),
            )
        })
    }

    fn resize(&self, width: i32, height: i32, dx: i32, dy: i32) -> bool {
        self.wl_egl_surface.resize(width, height, dx, dy);
        true
    }
}
