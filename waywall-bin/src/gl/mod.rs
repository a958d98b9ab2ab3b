// SPDX-License-Identifier: GPL-3.0-only

//! GL composition and capture.
//!
//! A GLES2 context lives on the remote connection and renders the
//! overlay scene into an EGL window surface backed by the UI subsurface.
//! Capture imports the focused instance's dmabuf as an external texture
//! whose handle the capture consumer reads.

pub mod egl_surface;

use anyhow::{bail, Context, Result};
use smithay::backend::{
    allocator::{
        dmabuf::{Dmabuf, DmabufFlags},
        Fourcc, Modifier,
    },
    egl::{context::GlAttributes, EGLContext, EGLDisplay, EGLSurface},
    renderer::{
        damage::OutputDamageTracker,
        element::texture::TextureRenderElement,
        gles::{GlesRenderer, GlesTexture},
        Bind, ImportDma,
    },
};
use tracing::{debug, info, warn};
use wayland_client::protocol::wl_surface::WlSurface;

use crate::{
    gl::egl_surface::{RemoteEglDisplay, RemoteEglSurface},
    server::{
        buffer::{BufferKind, DmabufPlane},
        surface::SurfaceKey,
    },
    state::State,
};

const REQUIRED_EGL_EXTENSIONS: [&str; 3] = [
    "EGL_EXT_image_dma_buf_import",
    "EGL_KHR_image_base",
    "EGL_MESA_image_dma_buf_export",
];

const REQUIRED_GL_EXTENSIONS: [&str; 1] = ["GL_OES_EGL_image"];

/// Marker user data for the GL subsurface's frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct GlFrame;

pub struct GlState {
    renderer: GlesRenderer,
    egl_surface: EGLSurface,
    damage_tracker: OutputDamageTracker,
    size: (i32, i32),

    capture_source: Option<SurfaceKey>,
    capture_texture: Option<GlesTexture>,

    /// A frame callback is outstanding; drawing again would stall.
    frame_pending: bool,
    dirty: bool,
}

impl GlState {
    /// Probes the required extensions and builds the GLES2 pipeline on
    /// the remote connection. Refuses to start when the driver cannot
    /// import or export DMABUFs.
    pub fn new(
        display: wayland_client::protocol::wl_display::WlDisplay,
        surface: &WlSurface,
        width: i32,
        height: i32,
    ) -> Result<Self> {
        let egl_display = unsafe { EGLDisplay::new(RemoteEglDisplay::new(display)) }
            .context("failed to create EGL display on the remote connection")?;

        let extensions = egl_display.extensions();
        for required in REQUIRED_EGL_EXTENSIONS {
            if !extensions.iter().any(|e| e == required) {
                bail!("EGL implementation does not support {required}");
            }
        }

        let context = EGLContext::new_with_config(
            &egl_display,
            GlAttributes {
                version: (2, 0),
                profile: None,
                debug: cfg!(debug_assertions),
                vsync: false,
            },
            smithay::backend::egl::context::PixelFormatRequirements {
                hardware_accelerated: None,
                color_bits: None,
                float_color_buffer: false,
                alpha_bits: None,
                depth_bits: None,
                stencil_bits: None,
                multisampling: None,
            },
        )
        .context("failed to create GLES2 context")?;

        let native = unsafe { RemoteEglSurface::new(surface.clone(), width.max(1), height.max(1))? };
        let egl_surface = unsafe {
            EGLSurface::new(
                &egl_display,
                context.pixel_format().context("EGL context has no pixel format")?,
                context.config_id(),
                native,
            )
        }
        .context("failed to create EGL window surface")?;

        let renderer =
            unsafe { GlesRenderer::new(context) }.context("failed to create GLES renderer")?;

        let gl_extensions: String = unsafe {
            renderer.with_context(|gl| {
                let ptr = gl.GetString(smithay::backend::renderer::gles::ffi::EXTENSIONS);
                if ptr.is_null() {
                    String::new()
                } else {
                    std::ffi::CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
                }
            })
        }
        .context("failed to query GL extensions")?;
        for required in REQUIRED_GL_EXTENSIONS {
            if !gl_extensions.split_whitespace().any(|e| e == required) {
                bail!("GL implementation does not support {required}");
            }
        }

        info!(
            "created GLES2 context ({} dmabuf formats)",
            renderer.dmabuf_formats().into_iter().count()
        );

        Ok(Self {
            renderer,
            egl_surface,
            damage_tracker: OutputDamageTracker::new(
                (width.max(1), height.max(1)),
                1.0,
                smithay::utils::Transform::Normal,
            ),
            size: (width, height),
            capture_source: None,
            capture_texture: None,
            frame_pending: false,
            dirty: true,
        })
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);
        self.egl_surface.resize(width.max(1), height.max(1), 0, 0);
        self.damage_tracker = OutputDamageTracker::new(
            (width.max(1), height.max(1)),
            1.0,
            smithay::utils::Transform::Normal,
        );
        self.dirty = true;
    }

    /// Selects which guest surface capture follows. The old image is
    /// released inside a context entry; the next commit imports anew.
    pub fn set_capture_source(&mut self, source: Option<SurfaceKey>) {
        if self.capture_source == source {
            return;
        }

        if let Some(texture) = self.capture_texture.take() {
            let _ = unsafe {
                self.renderer.egl_context().make_current_with_surface(&self.egl_surface)
            };
            drop(texture);
        }
        self.capture_source = source;
    }

    pub fn capture_source(&self) -> Option<SurfaceKey> {
        self.capture_source
    }

    pub fn clear_capture_if(&mut self, key: SurfaceKey) {
        if self.capture_source == Some(key) {
            self.set_capture_source(None);
        }
    }

    /// The texture handle the capture consumer reads from; bound with
    /// target `GL_TEXTURE_EXTERNAL_OES` when the buffer format demands
    /// it.
    pub fn capture_texture(&self) -> Option<&GlesTexture> {
        self.capture_texture.as_ref()
    }

    /// Imports the planes of a freshly committed dmabuf buffer as the
    /// capture texture.
    fn import_capture(
        &mut self,
        width: i32,
        height: i32,
        format: u32,
        modifier: u64,
        planes: &[DmabufPlane],
    ) -> Result<()> {
        let fourcc = Fourcc::try_from(format).context("unknown dmabuf format")?;

        let mut builder =
            Dmabuf::builder((width, height), fourcc, Modifier::from(modifier), DmabufFlags::empty());
        for (index, plane) in planes.iter().enumerate() {
            builder.add_plane(
                plane.fd.try_clone().context("failed to clone dmabuf plane fd")?,
                index as u32,
                plane.offset,
                plane.stride,
            );
        }
        let dmabuf = builder.build().context("dmabuf has no planes")?;

        let _ =
            unsafe { self.renderer.egl_context().make_current_with_surface(&self.egl_surface) };
        let old = self.capture_texture.take();
        drop(old);

        let texture = self
            .renderer
            .import_dmabuf(&dmabuf, None)
            .context("failed to import dmabuf as EGLImage texture")?;
        debug!("imported capture texture ({width}x{height}, {fourcc:?})");
        self.capture_texture = Some(texture);
        Ok(())
    }
}

impl State {
    /// Surface commit hook: refresh the capture texture when the capture
    /// source commits a dmabuf buffer.
    pub fn gl_capture_commit(&mut self, key: SurfaceKey) {
        let Some(gl) = self.gl.as_mut() else {
            return;
        };
        if gl.capture_source() != Some(key) {
            return;
        }

        let Some(buffer) = self.server.surfaces[key]
            .current_buffer
            .and_then(|b| self.server.buffers.get(b))
        else {
            return;
        };

        if let BufferKind::Dmabuf { width, height, format, modifier, planes } = &buffer.kind {
            if let Err(err) = gl.import_capture(*width, *height, *format, *modifier, planes) {
                warn!("capture import failed: {err}");
            }
        }
    }

    /// Draws the overlay scene and schedules the next frame.
    pub fn gl_draw(&mut self) {
        let Some(gl) = self.gl.as_mut() else {
            return;
        };
        if gl.frame_pending || !self.ui.configured {
            return;
        }

        let _ = unsafe { gl.renderer.egl_context().make_current_with_surface(&gl.egl_surface) };
        let age = gl.egl_surface.buffer_age().unwrap_or_default() as usize;

        let mut framebuffer = match gl.renderer.bind(&mut gl.egl_surface) {
            Ok(framebuffer) => framebuffer,
            Err(err) => {
                warn!("failed to bind EGL surface: {err}");
                return;
            }
        };

        // The scene proper (wall overlays, timers) is drawn by the
        // layout layer; the kernel clears to transparent.
        let elements: Vec<TextureRenderElement<GlesTexture>> = Vec::new();
        if let Err(err) = gl.damage_tracker.render_output(
            &mut gl.renderer,
            age,
            &elements,
            [0.0, 0.0, 0.0, 0.0],
        ) {
            warn!("failed to render overlay: {err:?}");
            return;
        }
        drop(framebuffer);

        let qh = self.remote.qh.clone();
        self.ui.gl_surface.frame(&qh, GlFrame);
        gl.frame_pending = true;
        gl.dirty = false;

        if let Err(err) = gl.egl_surface.swap_buffers(None) {
            warn!("failed to swap buffers: {err}");
        }
    }

    /// Frame callback from the host for the GL subsurface.
    pub fn gl_frame_done(&mut self) {
        let dirty = match self.gl.as_mut() {
            Some(gl) => {
                gl.frame_pending = false;
                gl.dirty
            }
            None => return,
        };
        if dirty {
            self.gl_draw();
        }
    }

    /// Marks the scene dirty and redraws when possible.
    pub fn gl_mark_dirty(&mut self) {
        let draw_now = match self.gl.as_mut() {
            Some(gl) => {
                gl.dirty = true;
                !gl.frame_pending
            }
            None => return,
        };
        if draw_now {
            self.gl_draw();
        }
    }
}

/// Frame callbacks for the GL subsurface.
impl wayland_client::Dispatch<wayland_client::protocol::wl_callback::WlCallback, GlFrame>
    for State
{
    fn event(
        state: &mut Self,
        _proxy: &wayland_client::protocol::wl_callback::WlCallback,
        event: wayland_client::protocol::wl_callback::Event,
        _data: &GlFrame,
        _conn: &wayland_client::Connection,
        _qh: &wayland_client::QueueHandle<Self>,
    ) {
        if let wayland_client::protocol::wl_callback::Event::Done { .. } = event {
            state.gl_frame_done();
        }
    }
}
