// SPDX-License-Identifier: GPL-3.0-only

//! Input routing.
//!
//! Host seat events arrive in UI coordinates on the root surface. The
//! router keeps the logical pointer position, resolves which guest
//! surface is under it via the view rectangles, applies the remap table
//! and synthesizes guest-side seat events. Guests never see the host
//! keymap; a keymap compiled from the profile is served instead.

use std::{
    io::Write,
    os::fd::{AsFd, BorrowedFd, OwnedFd},
};

use anyhow::{Context, Result};
use rustix::fs::{memfd_create, MemfdFlags};
use tracing::warn;
use wayland_client::protocol::{
    wl_keyboard as c_wl_keyboard, wl_pointer as c_wl_pointer,
};
use wayland_protocols::wp::relative_pointer::zv1::server::zwp_relative_pointer_v1::ZwpRelativePointerV1;
use wayland_server::{
    protocol::{
        wl_keyboard::{KeyState, WlKeyboard},
        wl_pointer::{Axis, ButtonState, WlPointer},
        wl_surface::WlSurface,
    },
    Resource,
};
use waywall_config::{modifier_mask, InputConfig, Remap, RemapTarget};

use crate::{server::surface::SurfaceKey, state::State};

/// Result of resolving an input against the remap table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapAction {
    /// No rule matched; forward as-is.
    Passthrough,
    /// A rule matched with no output: the event belongs to the
    /// surrounding system and is not forwarded.
    Consumed,
    Emit(RemapTarget),
}

/// Resolves `input` under `mods` against the table. Exact-modifier rules
/// win over wildcard rules.
pub fn resolve_remap(remaps: &[Remap], input: RemapTarget, mods: u32) -> RemapAction {
    let mut wildcard = None;
    for remap in remaps {
        if remap.input != input {
            continue;
        }
        match &remap.mods {
            Some(required) => {
                if modifier_mask(required) == mods {
                    return match remap.output {
                        Some(output) => RemapAction::Emit(output),
                        None => RemapAction::Consumed,
                    };
                }
            }
            None => {
                if wildcard.is_none() {
                    wildcard = Some(match remap.output {
                        Some(output) => RemapAction::Emit(output),
                        None => RemapAction::Consumed,
                    });
                }
            }
        }
    }
    wildcard.unwrap_or(RemapAction::Passthrough)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub depressed: u32,
    pub latched: u32,
    pub locked: u32,
    pub group: u32,
}

/// A key held down on the focused surface, recorded as the source
/// keycode plus what was actually sent.
#[derive(Debug, Clone, Copy)]
struct PressedKey {
    source: u32,
    action: RemapAction,
}

pub struct Router {
    keymap_fd: OwnedFd,
    keymap_size: u32,

    pub keyboards: Vec<WlKeyboard>,
    pub pointers: Vec<WlPointer>,
    pub relative_pointers: Vec<ZwpRelativePointerV1>,

    remaps: Vec<Remap>,
    pub mods: Modifiers,

    pub pointer_pos: (f64, f64),
    pub pointer_focus: Option<SurfaceKey>,
    pub keyboard_focus: Option<SurfaceKey>,
    /// Keyboard focus pinned to the active instance; hover no longer
    /// moves it.
    pub focus_pinned: bool,

    pressed: Vec<PressedKey>,
    last_time: u32,
}

fn compile_keymap(config: &InputConfig) -> Result<(OwnedFd, u32)> {
    use xkbcommon::xkb;

    let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
    let keymap = xkb::Keymap::new_from_names(
        &context,
        &config.xkb.rules,
        &config.xkb.model,
        &config.xkb.layout,
        &config.xkb.variant,
        if config.xkb.options.is_empty() { None } else { Some(config.xkb.options.clone()) },
        xkb::KEYMAP_COMPILE_NO_FLAGS,
    )
    .context("failed to compile keymap from profile xkb settings")?;

    let string = keymap.get_as_string(xkb::KEYMAP_FORMAT_TEXT_V1);
    let fd = memfd_create("waywall-keymap", MemfdFlags::CLOEXEC)
        .context("failed to create keymap memfd")?;
    let mut file = std::fs::File::from(fd);
    file.write_all(string.as_bytes()).context("failed to write keymap")?;
    file.write_all(&[0]).context("failed to terminate keymap")?;

    Ok((OwnedFd::from(file), string.len() as u32 + 1))
}

impl Router {
    pub fn new(config: &InputConfig) -> Result<Self> {
        let (keymap_fd, keymap_size) = compile_keymap(config)?;

        Ok(Self {
            keymap_fd,
            keymap_size,
            keyboards: Vec::new(),
            pointers: Vec::new(),
            relative_pointers: Vec::new(),
            remaps: config.remaps.clone(),
            mods: Modifiers::default(),
            pointer_pos: (0.0, 0.0),
            pointer_focus: None,
            keyboard_focus: None,
            focus_pinned: false,
            pressed: Vec::new(),
            last_time: 0,
        })
    }

    pub fn keymap(&self) -> (BorrowedFd<'_>, u32) {
        (self.keymap_fd.as_fd(), self.keymap_size)
    }

    /// Swaps in a reloaded profile: new remap table, new keymap. Guests
    /// receive the regenerated keymap immediately.
    pub fn apply_config(&mut self, config: &InputConfig) -> Result<()> {
        let (fd, size) = compile_keymap(config)?;
        self.keymap_fd = fd;
        self.keymap_size = size;
        self.remaps = config.remaps.clone();

        for keyboard in &self.keyboards {
            keyboard.keymap(
                wayland_server::protocol::wl_keyboard::KeymapFormat::XkbV1,
                self.keymap_fd.as_fd(),
                self.keymap_size,
            );
            if keyboard.version() >= 4 {
                keyboard.repeat_info(config.repeat_rate, config.repeat_delay);
            }
        }
        Ok(())
    }

    fn keyboards_for(&self, surface: &WlSurface) -> impl Iterator<Item = &WlKeyboard> {
        let client = surface.client().map(|c| c.id());
        self.keyboards
            .iter()
            .filter(move |k| k.client().map(|c| c.id()) == client)
    }

    fn pointers_for(&self, surface: &WlSurface) -> impl Iterator<Item = &WlPointer> {
        let client = surface.client().map(|c| c.id());
        self.pointers
            .iter()
            .filter(move |p| p.client().map(|c| c.id()) == client)
    }
}

impl State {
    fn surface_resource(&self, key: SurfaceKey) -> Option<WlSurface> {
        self.server.surfaces.get(key).map(|s| s.resource.clone())
    }

    /// Maps a UI-space position to a surface-local position within the
    /// view, scaled to the guest's buffer size.
    fn surface_local(&self, key: SurfaceKey, x: f64, y: f64) -> (f64, f64) {
        let Some(rect) = self.ui.view_rect(key) else {
            return (x, y);
        };

        let local = (x - rect.x as f64, y - rect.y as f64);
        let Some(buffer_size) = self
            .server
            .surfaces
            .get(key)
            .and_then(|s| s.current_buffer)
            .and_then(|b| self.server.buffers.get(b))
            .and_then(|b| b.size())
        else {
            return local;
        };

        if rect.width <= 0 || rect.height <= 0 {
            return local;
        }
        (
            local.0 * buffer_size.0 as f64 / rect.width as f64,
            local.1 * buffer_size.1 as f64 / rect.height as f64,
        )
    }

    pub fn pointer_motion(&mut self, time: u32, x: f64, y: f64) {
        self.router.pointer_pos = (x, y);
        if time != 0 {
            self.router.last_time = time;
        }

        let hit = self.ui.surface_at(x, y);
        if hit != self.router.pointer_focus {
            // Keyboard focus follows the pointer unless pinned to the
            // active instance. Pressed keys are flushed to the old
            // surface before any leave is sent.
            if !self.router.focus_pinned {
                self.keyboard_set_focus(hit);
            }
            self.pointer_set_focus(hit);
        }

        if let Some(key) = self.router.pointer_focus {
            if let Some(surface) = self.surface_resource(key) {
                let (sx, sy) = self.surface_local(key, x, y);
                for pointer in self.router.pointers_for(&surface) {
                    pointer.motion(time, sx, sy);
                }
            }
        }
    }

    /// Moves pointer focus, pairing leave with the next enter.
    fn pointer_set_focus(&mut self, next: Option<SurfaceKey>) {
        if self.router.pointer_focus == next {
            return;
        }

        if let Some(old) = self.router.pointer_focus.take() {
            if let Some(surface) = self.surface_resource(old) {
                let serial = self.server.serial.next();
                for pointer in self.router.pointers_for(&surface) {
                    pointer.leave(serial, &surface);
                    if pointer.version() >= 5 {
                        pointer.frame();
                    }
                }
            }
        }

        self.router.pointer_focus = next;
        if let Some(new) = next {
            if let Some(surface) = self.surface_resource(new) {
                let (sx, sy) = self.surface_local(new, self.router.pointer_pos.0, self.router.pointer_pos.1);
                let serial = self.server.serial.next();
                for pointer in self.router.pointers_for(&surface) {
                    pointer.enter(serial, &surface, sx, sy);
                    if pointer.version() >= 5 {
                        pointer.frame();
                    }
                }
            }
        }
    }

    pub fn pointer_host_leave(&mut self) {
        self.pointer_set_focus(None);
    }

    /// Transfers keyboard focus. Synthetic key-ups for every pressed key
    /// are flushed to the old surface before the new enter.
    pub fn keyboard_set_focus(&mut self, next: Option<SurfaceKey>) {
        if self.router.keyboard_focus == next {
            return;
        }

        if let Some(old) = self.router.keyboard_focus.take() {
            if let Some(surface) = self.surface_resource(old) {
                let pressed = std::mem::take(&mut self.router.pressed);
                let time = self.router.last_time;
                for key in &pressed {
                    self.send_key_action(&surface, key.action, key.source, time, false);
                }

                let serial = self.server.serial.next();
                for keyboard in self.router.keyboards_for(&surface) {
                    keyboard.leave(serial, &surface);
                }
            }
        } else {
            self.router.pressed.clear();
        }

        self.router.keyboard_focus = next;
        if let Some(new) = next {
            if let Some(surface) = self.surface_resource(new) {
                let serial = self.server.serial.next();
                for keyboard in self.router.keyboards_for(&surface) {
                    keyboard.enter(serial, &surface, Vec::new());
                }
                self.send_modifiers(&surface);
                let resource = surface.clone();
                self.offer_selection(&resource);
            }
        }

    }

    /// Pins keyboard focus to an instance (the "active instance"), or
    /// releases the pin for wall mode.
    pub fn focus_instance(&mut self, id: Option<usize>) {
        match id {
            Some(id) => {
                let Some(instance) = self.instances.get(id) else {
                    return;
                };
                let key = instance.surface;
                self.router.focus_pinned = true;
                self.keyboard_set_focus(Some(key));
                if let Some(cpu) = self.cpu.as_mut() {
                    cpu.set_active(Some(id));
                }
                // Capture follows the active instance.
                if let Some(gl) = self.gl.as_mut() {
                    gl.set_capture_source(Some(key));
                }
            }
            None => {
                self.router.focus_pinned = false;
                self.keyboard_set_focus(None);
                if let Some(cpu) = self.cpu.as_mut() {
                    cpu.set_active(None);
                }
            }
        }
    }

    fn send_modifiers(&mut self, surface: &WlSurface) {
        let serial = self.server.serial.next();
        let mods = self.router.mods;
        for keyboard in self.router.keyboards_for(surface) {
            keyboard.modifiers(serial, mods.depressed, mods.latched, mods.locked, mods.group);
        }
    }

    /// Emits a single key or button transition for `action` toward
    /// `surface`.
    fn send_key_action(
        &mut self,
        surface: &WlSurface,
        action: RemapAction,
        source: u32,
        time: u32,
        pressed: bool,
    ) {
        let serial = self.server.serial.next();
        match action {
            RemapAction::Consumed => {}
            RemapAction::Passthrough => {
                let state = if pressed { KeyState::Pressed } else { KeyState::Released };
                for keyboard in self.router.keyboards_for(surface) {
                    keyboard.key(serial, time, source, state);
                }
            }
            RemapAction::Emit(RemapTarget::Key(code)) => {
                let state = if pressed { KeyState::Pressed } else { KeyState::Released };
                for keyboard in self.router.keyboards_for(surface) {
                    keyboard.key(serial, time, code, state);
                }
            }
            RemapAction::Emit(RemapTarget::Button(code)) => {
                let state = if pressed { ButtonState::Pressed } else { ButtonState::Released };
                for pointer in self.router.pointers_for(surface) {
                    pointer.button(serial, time, code, state);
                    if pointer.version() >= 5 {
                        pointer.frame();
                    }
                }
            }
        }
    }

    pub fn key_input(&mut self, time: u32, key: u32, key_state: c_wl_keyboard::KeyState) {
        self.router.last_time = time;
        let Some(focus) = self.router.keyboard_focus else {
            return;
        };
        let Some(surface) = self.surface_resource(focus) else {
            return;
        };

        match key_state {
            c_wl_keyboard::KeyState::Pressed => {
                let action =
                    resolve_remap(&self.router.remaps, RemapTarget::Key(key), self.router.mods.depressed);
                self.router.pressed.push(PressedKey { source: key, action });
                self.send_key_action(&surface, action, key, time, true);
            }
            c_wl_keyboard::KeyState::Released => {
                // Release what was actually pressed, even if the remap
                // table changed in between.
                let action = match self
                    .router
                    .pressed
                    .iter()
                    .position(|p| p.source == key)
                {
                    Some(index) => self.router.pressed.remove(index).action,
                    None => return,
                };
                self.send_key_action(&surface, action, key, time, false);
            }
            _ => {}
        }
    }

    pub fn modifiers_input(&mut self, depressed: u32, latched: u32, locked: u32, group: u32) {
        self.router.mods = Modifiers { depressed, latched, locked, group };
        if let Some(focus) = self.router.keyboard_focus {
            if let Some(surface) = self.surface_resource(focus) {
                self.send_modifiers(&surface);
            }
        }
    }

    pub fn pointer_button(&mut self, time: u32, button: u32, state: c_wl_pointer::ButtonState) {
        self.router.last_time = time;
        let Some(focus) = self.router.pointer_focus else {
            return;
        };
        let Some(surface) = self.surface_resource(focus) else {
            return;
        };

        let pressed = state == c_wl_pointer::ButtonState::Pressed;
        let action = resolve_remap(
            &self.router.remaps,
            RemapTarget::Button(button),
            self.router.mods.depressed,
        );
        match action {
            RemapAction::Consumed => {}
            RemapAction::Passthrough => {
                let serial = self.server.serial.next();
                let state = if pressed { ButtonState::Pressed } else { ButtonState::Released };
                for pointer in self.router.pointers_for(&surface) {
                    pointer.button(serial, time, button, state);
                }
            }
            action => self.send_key_action(&surface, action, button, time, pressed),
        }
    }

    pub fn pointer_axis(&mut self, time: u32, axis: c_wl_pointer::Axis, value: f64) {
        let Some(focus) = self.router.pointer_focus else {
            return;
        };
        let Some(surface) = self.surface_resource(focus) else {
            return;
        };

        let axis = match axis {
            c_wl_pointer::Axis::VerticalScroll => Axis::VerticalScroll,
            c_wl_pointer::Axis::HorizontalScroll => Axis::HorizontalScroll,
            _ => {
                warn!("unknown axis from host");
                return;
            }
        };
        for pointer in self.router.pointers_for(&surface) {
            pointer.axis(time, axis, value);
        }
    }

    pub fn pointer_frame(&mut self) {
        let Some(focus) = self.router.pointer_focus else {
            return;
        };
        let Some(surface) = self.surface_resource(focus) else {
            return;
        };
        for pointer in self.router.pointers_for(&surface) {
            if pointer.version() >= 5 {
                pointer.frame();
            }
        }
    }

    pub fn relative_motion(
        &mut self,
        utime_hi: u32,
        utime_lo: u32,
        dx: f64,
        dy: f64,
        dx_unaccel: f64,
        dy_unaccel: f64,
    ) {
        let Some(focus) = self.router.keyboard_focus else {
            return;
        };
        let Some(surface) = self.surface_resource(focus) else {
            return;
        };
        let client = surface.client().map(|c| c.id());

        for relative in &self.router.relative_pointers {
            if relative.client().map(|c| c.id()) == client {
                relative.relative_motion(utime_hi, utime_lo, dx, dy, dx_unaccel, dy_unaccel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waywall_config::Modifier;

    fn remap(
        input: RemapTarget,
        mods: Option<Vec<Modifier>>,
        output: Option<RemapTarget>,
    ) -> Remap {
        Remap { input, mods, output }
    }

    #[test]
    fn passthrough_without_rules() {
        assert_eq!(
            resolve_remap(&[], RemapTarget::Key(17), 0),
            RemapAction::Passthrough
        );
    }

    #[test]
    fn exact_modifier_match() {
        let remaps = vec![remap(
            RemapTarget::Key(17),
            Some(vec![Modifier::Ctrl]),
            Some(RemapTarget::Key(30)),
        )];

        let ctrl = Modifier::Ctrl.mask();
        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Key(17), ctrl),
            RemapAction::Emit(RemapTarget::Key(30))
        );
        // Wrong modifier set: no match.
        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Key(17), 0),
            RemapAction::Passthrough
        );
        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Key(18), ctrl),
            RemapAction::Passthrough
        );
    }

    #[test]
    fn wildcard_matches_any_modifiers() {
        let remaps = vec![remap(RemapTarget::Key(1), None, Some(RemapTarget::Key(2)))];
        for mods in [0, Modifier::Shift.mask(), Modifier::Ctrl.mask() | Modifier::Alt.mask()] {
            assert_eq!(
                resolve_remap(&remaps, RemapTarget::Key(1), mods),
                RemapAction::Emit(RemapTarget::Key(2))
            );
        }
    }

    #[test]
    fn exact_rule_beats_wildcard() {
        let remaps = vec![
            remap(RemapTarget::Key(1), None, Some(RemapTarget::Key(2))),
            remap(RemapTarget::Key(1), Some(vec![Modifier::Shift]), None),
        ];

        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Key(1), Modifier::Shift.mask()),
            RemapAction::Consumed
        );
        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Key(1), 0),
            RemapAction::Emit(RemapTarget::Key(2))
        );
    }

    #[test]
    fn consumed_binding_swallows_event() {
        let remaps = vec![remap(RemapTarget::Button(272), None, None)];
        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Button(272), 0),
            RemapAction::Consumed
        );
    }

    #[test]
    fn key_and_button_namespaces_are_distinct() {
        let remaps = vec![remap(RemapTarget::Key(272), None, None)];
        assert_eq!(
            resolve_remap(&remaps, RemapTarget::Button(272), 0),
            RemapAction::Passthrough
        );
    }
}
