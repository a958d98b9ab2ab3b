// SPDX-License-Identifier: GPL-3.0-only

//! The host-side window.
//!
//! One xdg_toplevel is presented to the host. Guest surface twins are
//! subsurfaces of its root surface, positioned and scaled by view
//! rectangles; the GL scene draws on its own subsurface above them. The
//! Lua layout engine is out of tree; a plain grid stands in at the same
//! interface (`set_views`).

use anyhow::Result;
use tracing::{debug, warn};
use wayland_client::{
    protocol::{
        wl_buffer::WlBuffer, wl_subsurface::WlSubsurface, wl_surface::WlSurface,
    },
    QueueHandle,
};
use wayland_protocols::{
    wp::viewporter::client::wp_viewport::WpViewport,
    xdg::shell::client::{xdg_surface::XdgSurface, xdg_toplevel::XdgToplevel},
};
use waywall_config::ThemeConfig;

use crate::{
    instance::InstanceSpec,
    remote::{Remote, RootWindow},
    server::surface::{Role, SurfaceKey},
    state::State,
    util::Rect,
};

const DEFAULT_SIZE: (i32, i32) = (1280, 720);

#[derive(Debug, Clone, Copy)]
pub struct View {
    pub surface: SurfaceKey,
    pub rect: Rect,
}

pub struct Ui {
    pub root: WlSurface,
    root_xdg: XdgSurface,
    root_toplevel: XdgToplevel,
    root_viewport: WpViewport,
    pub gl_surface: WlSurface,
    gl_subsurface: WlSubsurface,

    background: Option<WlBuffer>,

    pub width: i32,
    pub height: i32,
    pub pending_size: Option<(i32, i32)>,
    pub configured: bool,

    views: Vec<View>,
}

impl Ui {
    pub fn new(remote: &Remote, qh: &QueueHandle<State>) -> Result<Self> {
        let root = remote.compositor.create_surface(qh, ());
        let root_xdg = remote.xdg_wm_base.get_xdg_surface(&root, qh, RootWindow);
        let root_toplevel = root_xdg.get_toplevel(qh, RootWindow);
        root_toplevel.set_title("waywall".into());
        root_toplevel.set_app_id("waywall".into());
        let root_viewport = remote.viewporter.get_viewport(&root, qh, ());

        let gl_surface = remote.compositor.create_surface(qh, ());
        let gl_subsurface = remote.subcompositor.get_subsurface(&gl_surface, &root, qh, ());
        gl_subsurface.set_desync();
        gl_subsurface.set_position(0, 0);

        // The overlay sits above the views but must not steal input from
        // the root surface.
        let region = remote.compositor.create_region(qh, ());
        gl_surface.set_input_region(Some(&region));
        region.destroy();

        // Initial commit with no buffer; the host replies with the first
        // configure.
        root.commit();

        Ok(Self {
            root,
            root_xdg,
            root_toplevel,
            root_viewport,
            gl_surface,
            gl_subsurface,
            background: None,
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
            pending_size: None,
            configured: false,
            views: Vec::new(),
        })
    }

    pub fn view_rect(&self, key: SurfaceKey) -> Option<Rect> {
        self.views.iter().find(|v| v.surface == key).map(|v| v.rect)
    }

    /// The topmost view under a UI-space position.
    pub fn surface_at(&self, x: f64, y: f64) -> Option<SurfaceKey> {
        self.views.iter().rev().find(|v| v.rect.contains(x, y)).map(|v| v.surface)
    }

    pub fn remove_view(&mut self, key: SurfaceKey) {
        self.views.retain(|v| v.surface != key);
    }

    fn set_view(&mut self, key: SurfaceKey, rect: Rect) {
        match self.views.iter_mut().find(|v| v.surface == key) {
            Some(view) => view.rect = rect,
            None => self.views.push(View { surface: key, rect }),
        }
    }
}

/// Splits the output into an even grid for `count` views, the default
/// wall layout.
pub fn grid_rects(count: usize, width: i32, height: i32) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }

    let columns = (count as f64).sqrt().ceil() as i32;
    let rows = (count as i32 + columns - 1) / columns;
    let (cell_w, cell_h) = (width / columns, height / rows);

    (0..count as i32)
        .map(|i| Rect::new((i % columns) * cell_w, (i / columns) * cell_h, cell_w, cell_h))
        .collect()
}

impl State {
    /// First and subsequent configures of the root window.
    pub fn ui_configured(&mut self) {
        let qh = self.remote.qh.clone();

        if let Some((width, height)) = self.ui.pending_size.take() {
            if (width, height) != (self.ui.width, self.ui.height) {
                self.ui.width = width;
                self.ui.height = height;
                self.relayout();
                if let Some(gl) = self.gl.as_mut() {
                    gl.resize(width, height);
                }
            }
        }

        if !self.ui.configured {
            self.ui.configured = true;
            if let Err(err) = self.ui_attach_background(&qh) {
                warn!("failed to set background: {err}");
            }
            self.ui.root_viewport.set_destination(self.ui.width, self.ui.height);
            self.ui.root.commit();

            if let Some(gl) = self.gl.as_mut() {
                gl.resize(self.ui.width, self.ui.height);
            }
            self.gl_draw();
        } else {
            self.ui.root.commit();
        }
    }

    fn ui_attach_background(&mut self, qh: &QueueHandle<State>) -> Result<()> {
        let theme: ThemeConfig = self.profile.theme.clone();

        let buffer = match &theme.background_png {
            Some(path) => match self.pool.png(qh, path) {
                Ok(buffer) => buffer,
                Err(err) => {
                    warn!("failed to load background image: {err}");
                    self.pool.color(qh, theme.background.0)?
                }
            },
            None => self.pool.color(qh, theme.background.0)?,
        };

        if let Some(old) = self.ui.background.take() {
            self.pool.release(&old);
        }
        self.ui.root.attach(Some(&buffer), 0, 0);
        self.ui.root.damage(0, 0, i32::MAX, i32::MAX);
        self.ui.background = Some(buffer);
        Ok(())
    }

    /// Applies the theme of a freshly loaded profile.
    pub fn ui_apply_theme(&mut self) {
        let qh = self.remote.qh.clone();
        if !self.ui.configured {
            return;
        }
        if let Err(err) = self.ui_attach_background(&qh) {
            warn!("failed to apply theme: {err}");
            return;
        }
        self.ui.root.commit();
    }

    /// Assigns view rectangles to every mapped toplevel; the layout
    /// interface of the (out-of-tree) wall engine.
    pub fn set_views(&mut self, views: Vec<(SurfaceKey, Rect)>) {
        for (key, rect) in views {
            self.place_view(key, rect);
        }
        self.ui.root.commit();
    }

    pub fn relayout(&mut self) {
        let keys: Vec<SurfaceKey> = self
            .server
            .surfaces
            .iter()
            .filter(|(_, s)| s.mapped && s.role == Role::XdgToplevel)
            .map(|(k, _)| k)
            .collect();

        let rects = grid_rects(keys.len(), self.ui.width, self.ui.height);
        let views: Vec<(SurfaceKey, Rect)> = keys.into_iter().zip(rects).collect();
        self.set_views(views);
    }

    fn place_view(&mut self, key: SurfaceKey, rect: Rect) {
        let qh = self.remote.qh.clone();
        let activated = self.router.keyboard_focus == Some(key);

        {
            let Some(surface) = self.server.surfaces.get_mut(key) else {
                return;
            };

            if surface.remote_subsurface.is_none() {
                let subsurface = self.remote.subcompositor.get_subsurface(
                    &surface.remote,
                    &self.ui.root,
                    &qh,
                    (),
                );
                subsurface.set_desync();
                // The GL overlay stays above every view.
                self.ui.gl_subsurface.place_above(&surface.remote);
                surface.remote_subsurface = Some(subsurface);
            }
            if surface.remote_viewport.is_none() {
                surface.remote_viewport =
                    Some(self.remote.viewporter.get_viewport(&surface.remote, &qh, ()));
            }

            surface.remote_subsurface.as_ref().unwrap().set_position(rect.x, rect.y);
            surface
                .remote_viewport
                .as_ref()
                .unwrap()
                .set_destination(rect.width, rect.height);
        }

        self.ui.set_view(key, rect);
        self.xdg_send_configure(key, (rect.width, rect.height), activated);
    }

    /// Places a popup's twin relative to its parent's view.
    pub fn place_popup(&mut self, key: SurfaceKey) {
        let (parent, popup_rect) = {
            let Some(surface) = self.server.surfaces.get(key) else {
                return;
            };
            let Some(xdg) = surface.xdg.as_ref() else {
                return;
            };
            (xdg.parent, xdg.popup_rect)
        };
        let Some(popup_rect) = popup_rect else {
            return;
        };

        let parent_rect = parent
            .and_then(|p| self.ui.view_rect(p))
            .unwrap_or(Rect::new(0, 0, 0, 0));
        let rect = Rect::new(
            parent_rect.x + popup_rect.x,
            parent_rect.y + popup_rect.y,
            popup_rect.width,
            popup_rect.height,
        );
        self.place_view(key, rect);
        self.ui.root.commit();
    }

    /// Commit-driven map transition.
    pub fn surface_mapped(&mut self, key: SurfaceKey) {
        match self.server.surfaces[key].role {
            Role::XdgToplevel => {
                self.maybe_identify_instance(key);
                self.relayout();
            }
            Role::XdgPopup => {
                self.place_popup(key);
            }
            _ => {}
        }
    }

    pub fn surface_unmapped(&mut self, key: SurfaceKey) {
        self.ui.remove_view(key);
        self.instance_gone(key);

        if self
            .server
            .surfaces
            .get(key)
            .map(|s| s.role == Role::XdgToplevel)
            .unwrap_or(false)
        {
            self.relayout();
        }
    }

    /// Ran before a surface leaves the arena: nothing may keep referring
    /// to it afterwards.
    pub fn surface_pre_destroy(&mut self, key: SurfaceKey) {
        if self.router.pointer_focus == Some(key) {
            self.router.pointer_focus = None;
        }
        if self.router.keyboard_focus == Some(key) {
            self.router.keyboard_focus = None;
            self.router.focus_pinned = false;
        }

        if let Some(gl) = self.gl.as_mut() {
            gl.clear_capture_if(key);
        }

        self.ui.remove_view(key);
        self.instance_gone(key);
    }

    fn instance_gone(&mut self, key: SurfaceKey) {
        let Some(id) = self.instances.id_for_surface(key) else {
            return;
        };

        // The scheduler refuses to drop the active slot; unpin first.
        if self.router.keyboard_focus == Some(key) && self.router.focus_pinned {
            self.focus_instance(None);
        }

        self.instances.remove(id);
        if let Some(cpu) = self.cpu.as_mut() {
            cpu.death(id);
        }
    }

    /// Instance identification at map time: a Minecraft toplevel whose
    /// process has a state file in its working directory.
    pub fn maybe_identify_instance(&mut self, key: SurfaceKey) {
        if self.instances.id_for_surface(key).is_some() {
            return;
        }

        let Some(surface) = self.server.surfaces.get(key) else {
            return;
        };
        if !surface.mapped {
            return;
        }

        let title_matches = surface
            .xdg
            .as_ref()
            .and_then(|xdg| xdg.title.as_deref())
            .map(|t| t.contains("Minecraft"))
            .unwrap_or(false);
        if !title_matches {
            return;
        }

        let Some(pid) = wayland_server::Resource::client(&surface.resource)
            .and_then(|client| client.get_credentials(&self.server.dh).ok())
            .map(|credentials| credentials.pid)
        else {
            return;
        };

        let dir = match std::fs::read_link(format!("/proc/{pid}/cwd")) {
            Ok(dir) => dir,
            Err(err) => {
                warn!("failed to resolve cwd of pid {pid}: {err}");
                return;
            }
        };
        if !dir.join(crate::instance::STATE_FILE).exists() {
            debug!("toplevel of pid {pid} has no state file, not an instance");
            return;
        }

        match self.instances.add(InstanceSpec { dir, pid }, key) {
            Ok(id) => {
                let state = self.instances.get(id).unwrap().state;
                if let Some(cpu) = self.cpu.as_mut() {
                    cpu.update(id, pid, state);
                }
            }
            Err(err) => warn!("failed to track instance: {err}"),
        }
    }

    /// A state file changed on disk.
    pub fn instance_state_update(&mut self, path: &std::path::Path) {
        let Some((id, state)) = self.instances.handle_path_event(path) else {
            return;
        };

        debug!("instance {id} -> {state:?}");
        let pid = self.instances.get(id).unwrap().pid;
        if let Some(cpu) = self.cpu.as_mut() {
            cpu.update(id, pid, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_counts() {
        assert!(grid_rects(0, 1920, 1080).is_empty());
        assert_eq!(grid_rects(1, 1920, 1080)[0], Rect::new(0, 0, 1920, 1080));

        let four = grid_rects(4, 1920, 1080);
        assert_eq!(four.len(), 4);
        assert_eq!(four[0], Rect::new(0, 0, 960, 540));
        assert_eq!(four[3], Rect::new(960, 540, 960, 540));

        // Non-square counts still fit inside the output.
        for rect in grid_rects(5, 1920, 1080) {
            assert!(rect.x + rect.width <= 1920);
            assert!(rect.y + rect.height <= 1080);
        }
    }
}
