// SPDX-License-Identifier: GPL-3.0-only

//! `xdg_wm_base` façade.
//!
//! Unlike the buffer path, xdg-shell is not proxied: the host only ever
//! sees one root toplevel, and guest windows become positioned twins
//! inside it. Configure events are synthesized from the view rectangles
//! the layout assigns.

use std::sync::Mutex;

use tracing::{debug, warn};
use wayland_protocols::xdg::shell::server::{
    xdg_popup::{self, XdgPopup},
    xdg_positioner::{self, XdgPositioner},
    xdg_surface::{self, XdgSurface},
    xdg_toplevel::{self, XdgToplevel},
    xdg_wm_base::{self, XdgWmBase},
};
use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource, WEnum};

use crate::{
    server::surface::{Role, SurfaceKey},
    state::State,
    util::Rect,
};

/// Server-side xdg state attached to a [`crate::server::surface::Surface`].
#[derive(Debug)]
pub struct XdgSurfaceData {
    pub xdg: XdgSurface,
    pub toplevel: Option<XdgToplevel>,
    pub popup: Option<XdgPopup>,
    /// Popup placement, resolved against the parent at creation.
    pub popup_rect: Option<Rect>,
    pub parent: Option<SurfaceKey>,

    pub initial_configure_sent: bool,
    pub configured: bool,
    pub window_geometry: Option<Rect>,
    pub title: Option<String>,
    pub app_id: Option<String>,
}

impl XdgSurfaceData {
    fn new(xdg: XdgSurface) -> Self {
        Self {
            xdg,
            toplevel: None,
            popup: None,
            popup_rect: None,
            parent: None,
            initial_configure_sent: false,
            configured: false,
            window_geometry: None,
            title: None,
            app_id: None,
        }
    }
}

/// Accumulated `xdg_positioner` state, enough to resolve the placements
/// the game actually requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionerState {
    pub size: (i32, i32),
    pub anchor_rect: Rect,
    pub anchor: u32,
    pub gravity: u32,
    pub offset: (i32, i32),
}

pub type PositionerData = Mutex<PositionerState>;

/// Resolves a positioner against the parent-local coordinate space and
/// clips the result so the popup stays inside the parent.
pub fn resolve_positioner(positioner: &PositionerState, parent: Rect) -> Rect {
    use xdg_positioner::{Anchor, Gravity};

    let (width, height) = positioner.size;
    let rect = positioner.anchor_rect;

    let mut x = match Anchor::try_from(positioner.anchor) {
        Ok(Anchor::Left | Anchor::TopLeft | Anchor::BottomLeft) => rect.x,
        Ok(Anchor::Right | Anchor::TopRight | Anchor::BottomRight) => rect.x + rect.width,
        _ => rect.x + rect.width / 2,
    };
    let mut y = match Anchor::try_from(positioner.anchor) {
        Ok(Anchor::Top | Anchor::TopLeft | Anchor::TopRight) => rect.y,
        Ok(Anchor::Bottom | Anchor::BottomLeft | Anchor::BottomRight) => rect.y + rect.height,
        _ => rect.y + rect.height / 2,
    };

    match Gravity::try_from(positioner.gravity) {
        Ok(Gravity::Left | Gravity::TopLeft | Gravity::BottomLeft) => x -= width,
        Ok(Gravity::Right | Gravity::TopRight | Gravity::BottomRight) => {}
        _ => x -= width / 2,
    }
    match Gravity::try_from(positioner.gravity) {
        Ok(Gravity::Top | Gravity::TopLeft | Gravity::TopRight) => y -= height,
        Ok(Gravity::Bottom | Gravity::BottomLeft | Gravity::BottomRight) => {}
        _ => y -= height / 2,
    }

    x += positioner.offset.0;
    y += positioner.offset.1;

    // Clip to the parent; popups must not escape the wall.
    x = x.clamp(0, (parent.width - width).max(0));
    y = y.clamp(0, (parent.height - height).max(0));

    Rect::new(x, y, width, height)
}

fn toplevel_states(activated: bool) -> Vec<u8> {
    let mut states: Vec<u32> = Vec::new();
    if activated {
        states.push(xdg_toplevel::State::Activated as u32);
    }
    states.iter().flat_map(|s| s.to_le_bytes()).collect()
}

impl State {
    /// Sends a configure sequence for the surface's xdg role.
    pub fn xdg_send_configure(&mut self, key: SurfaceKey, size: (i32, i32), activated: bool) {
        let serial = self.server.serial.next();
        let Some(surface) = self.server.surfaces.get_mut(key) else {
            return;
        };
        let Some(xdg) = surface.xdg.as_mut() else {
            return;
        };

        if let Some(toplevel) = &xdg.toplevel {
            toplevel.configure(size.0, size.1, toplevel_states(activated));
        } else if let (Some(popup), Some(rect)) = (&xdg.popup, xdg.popup_rect) {
            popup.configure(rect.x, rect.y, rect.width, rect.height);
        }
        xdg.xdg.configure(serial);
        xdg.initial_configure_sent = true;
    }

    /// Late half of the commit cycle: an unconfigured xdg surface gets
    /// its first configure after its initial (bufferless) commit.
    pub fn xdg_after_commit(&mut self, key: SurfaceKey) {
        let needs_initial = {
            let surface = &self.server.surfaces[key];
            match &surface.xdg {
                Some(xdg) => !xdg.initial_configure_sent && !surface.mapped,
                None => false,
            }
        };

        if needs_initial {
            let size = self
                .ui
                .view_rect(key)
                .map(|rect| (rect.width, rect.height))
                .unwrap_or((0, 0));
            let activated = self.router.keyboard_focus == Some(key);
            self.xdg_send_configure(key, size, activated);
        }
    }

    fn xdg_role_destroyed(&mut self, key: SurfaceKey) {
        if let Some(surface) = self.server.surfaces.get_mut(key) {
            surface.role_active = false;
        }
        self.surface_unmapped(key);
    }
}

impl GlobalDispatch<XdgWmBase, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<XdgWmBase>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<XdgWmBase, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &XdgWmBase,
        request: xdg_wm_base::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            xdg_wm_base::Request::CreatePositioner { id } => {
                data_init.init(id, PositionerData::default());
            }
            xdg_wm_base::Request::GetXdgSurface { id, surface } => {
                let key = *surface.data::<SurfaceKey>().expect("surface without key");

                if state.server.surfaces[key].mapped {
                    resource.post_error(
                        xdg_wm_base::Error::InvalidSurfaceState,
                        "surface already has a buffer",
                    );
                    return;
                }

                let xdg = data_init.init(id, key);
                state.server.surfaces[key].xdg = Some(XdgSurfaceData::new(xdg));
            }
            xdg_wm_base::Request::Pong { .. } => {}
            xdg_wm_base::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<XdgPositioner, PositionerData> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        resource: &XdgPositioner,
        request: xdg_positioner::Request,
        data: &PositionerData,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let mut positioner = data.lock().unwrap();
        match request {
            xdg_positioner::Request::SetSize { width, height } => {
                if width <= 0 || height <= 0 {
                    resource.post_error(xdg_positioner::Error::InvalidInput, "non-positive size");
                    return;
                }
                positioner.size = (width, height);
            }
            xdg_positioner::Request::SetAnchorRect { x, y, width, height } => {
                positioner.anchor_rect = Rect::new(x, y, width, height);
            }
            xdg_positioner::Request::SetAnchor { anchor } => {
                positioner.anchor = match anchor {
                    WEnum::Value(anchor) => anchor as u32,
                    WEnum::Unknown(raw) => raw,
                };
            }
            xdg_positioner::Request::SetGravity { gravity } => {
                positioner.gravity = match gravity {
                    WEnum::Value(gravity) => gravity as u32,
                    WEnum::Unknown(raw) => raw,
                };
            }
            xdg_positioner::Request::SetOffset { x, y } => {
                positioner.offset = (x, y);
            }
            // Constraint adjustment is already implied by clipping.
            xdg_positioner::Request::SetConstraintAdjustment { .. } => {}
            xdg_positioner::Request::SetReactive
            | xdg_positioner::Request::SetParentSize { .. }
            | xdg_positioner::Request::SetParentConfigure { .. } => {}
            xdg_positioner::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<XdgSurface, SurfaceKey> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &XdgSurface,
        request: xdg_surface::Request,
        key: &SurfaceKey,
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let key = *key;

        match request {
            xdg_surface::Request::GetToplevel { id } => {
                if state.server.surfaces[key].set_role(Role::XdgToplevel).is_err() {
                    resource.post_error(
                        xdg_wm_base::Error::Role,
                        "surface already has another role",
                    );
                    return;
                }

                let toplevel = data_init.init(id, key);
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.toplevel = Some(toplevel);
                }
            }
            xdg_surface::Request::GetPopup { id, parent, positioner } => {
                if state.server.surfaces[key].set_role(Role::XdgPopup).is_err() {
                    resource.post_error(
                        xdg_wm_base::Error::Role,
                        "surface already has another role",
                    );
                    return;
                }

                let parent_key = parent
                    .as_ref()
                    .and_then(|p| p.data::<SurfaceKey>())
                    .copied();
                let parent_rect = parent_key
                    .and_then(|p| state.ui.view_rect(p))
                    .unwrap_or_else(|| Rect::new(0, 0, state.ui.width, state.ui.height));
                let positioner_state =
                    *positioner.data::<PositionerData>().unwrap().lock().unwrap();

                let popup = data_init.init(id, key);
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.popup = Some(popup);
                    xdg.parent = parent_key;
                    xdg.popup_rect = Some(resolve_positioner(&positioner_state, parent_rect));
                }
            }
            xdg_surface::Request::AckConfigure { serial: _ } => {
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.configured = true;
                }
            }
            xdg_surface::Request::SetWindowGeometry { x, y, width, height } => {
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.window_geometry = Some(Rect::new(x, y, width, height));
                }
            }
            xdg_surface::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &XdgSurface,
        key: &SurfaceKey,
    ) {
        if let Some(surface) = state.server.surfaces.get_mut(*key) {
            surface.xdg = None;
        }
    }
}

impl Dispatch<XdgToplevel, SurfaceKey> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &XdgToplevel,
        request: xdg_toplevel::Request,
        key: &SurfaceKey,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let key = *key;

        match request {
            xdg_toplevel::Request::SetTitle { title } => {
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.title = Some(title);
                }
                state.maybe_identify_instance(key);
            }
            xdg_toplevel::Request::SetAppId { app_id } => {
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.app_id = Some(app_id);
                }
                state.maybe_identify_instance(key);
            }
            // The layout owns geometry and stacking; interactive window
            // management from guests is swallowed.
            xdg_toplevel::Request::Move { .. }
            | xdg_toplevel::Request::Resize { .. }
            | xdg_toplevel::Request::SetMaximized
            | xdg_toplevel::Request::UnsetMaximized
            | xdg_toplevel::Request::SetFullscreen { .. }
            | xdg_toplevel::Request::UnsetFullscreen
            | xdg_toplevel::Request::SetMinimized
            | xdg_toplevel::Request::ShowWindowMenu { .. } => {
                debug!("ignoring window management request from guest toplevel {key:?}");
            }
            xdg_toplevel::Request::SetParent { .. }
            | xdg_toplevel::Request::SetMaxSize { .. }
            | xdg_toplevel::Request::SetMinSize { .. } => {}
            xdg_toplevel::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &XdgToplevel,
        key: &SurfaceKey,
    ) {
        if let Some(surface) = state.server.surfaces.get_mut(*key) {
            if let Some(xdg) = surface.xdg.as_mut() {
                xdg.toplevel = None;
            }
        }
        state.xdg_role_destroyed(*key);
    }
}

impl Dispatch<XdgPopup, SurfaceKey> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &XdgPopup,
        request: xdg_popup::Request,
        key: &SurfaceKey,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let key = *key;

        match request {
            xdg_popup::Request::Grab { .. } => {
                // There is no host-side grab to take; the popup keeps
                // receiving input through normal focus routing.
                warn!("ignoring xdg_popup.grab from {key:?}");
            }
            xdg_popup::Request::Reposition { positioner, token } => {
                let positioner_state =
                    *positioner.data::<PositionerData>().unwrap().lock().unwrap();
                let parent_rect = {
                    let surface = &state.server.surfaces[key];
                    surface
                        .xdg
                        .as_ref()
                        .and_then(|xdg| xdg.parent)
                        .and_then(|p| state.ui.view_rect(p))
                        .unwrap_or_else(|| Rect::new(0, 0, state.ui.width, state.ui.height))
                };

                let rect = resolve_positioner(&positioner_state, parent_rect);
                if let Some(xdg) = state.server.surfaces[key].xdg.as_mut() {
                    xdg.popup_rect = Some(rect);
                }
                resource.repositioned(token);
                state.xdg_send_configure(key, (rect.width, rect.height), false);
                state.place_popup(key);
            }
            xdg_popup::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &XdgPopup,
        key: &SurfaceKey,
    ) {
        if let Some(surface) = state.server.surfaces.get_mut(*key) {
            if let Some(xdg) = surface.xdg.as_mut() {
                xdg.popup = None;
                xdg.popup_rect = None;
            }
        }
        state.xdg_role_destroyed(*key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positioner(size: (i32, i32), anchor_rect: Rect) -> PositionerState {
        PositionerState { size, anchor_rect, ..Default::default() }
    }

    #[test]
    fn default_positioner_centers_on_anchor_rect() {
        let state = positioner((100, 50), Rect::new(200, 100, 20, 10));
        let rect = resolve_positioner(&state, Rect::new(0, 0, 1920, 1080));
        assert_eq!(rect, Rect::new(160, 80, 100, 50));
    }

    #[test]
    fn offset_is_applied() {
        let mut state = positioner((10, 10), Rect::new(50, 50, 0, 0));
        state.offset = (5, -5);
        let rect = resolve_positioner(&state, Rect::new(0, 0, 500, 500));
        assert_eq!((rect.x, rect.y), (50, 40));
    }

    #[test]
    fn popup_is_clipped_to_parent() {
        let state = positioner((100, 100), Rect::new(590, 0, 20, 10));
        let rect = resolve_positioner(&state, Rect::new(0, 0, 640, 360));
        assert!(rect.x + rect.width <= 640);
        assert!(rect.y >= 0);
    }
}
