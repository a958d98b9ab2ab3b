// SPDX-License-Identifier: GPL-3.0-only

//! Event handlers for the host connection. Host events either feed the
//! input router, complete buffer/frame lifecycles, or drive the root
//! window.

use tracing::{debug, info, warn};
use wayland_client::{
    delegate_noop,
    globals::GlobalListContents,
    protocol::{
        wl_buffer, wl_compositor, wl_keyboard, wl_pointer, wl_region, wl_registry, wl_seat,
        wl_shm, wl_shm_pool, wl_subcompositor, wl_subsurface, wl_surface,
    },
    Connection, Dispatch, QueueHandle, WEnum,
};
use wayland_protocols::{
    wp::{
        linux_dmabuf::zv1::{client as c_dmabuf, server as s_dmabuf},
        pointer_constraints::zv1::{client as c_pc, server as s_pc},
        relative_pointer::zv1::client::zwp_relative_pointer_v1,
        viewporter::client::{wp_viewport, wp_viewporter},
    },
    xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base},
};

use crate::{
    remote::{buffer_pool::SlotRef, RootWindow},
    server::{buffer::BufferKey, surface::SurfaceKey},
    state::State,
};

impl Dispatch<wl_registry::WlRegistry, GlobalListContents> for State {
    fn event(
        _state: &mut Self,
        _proxy: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _data: &GlobalListContents,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::GlobalRemove { name } = event {
            debug!("host global {name} removed");
        }
    }
}

impl Dispatch<wl_shm::WlShm, ()> for State {
    fn event(
        state: &mut Self,
        _proxy: &wl_shm::WlShm,
        event: wl_shm::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let wl_shm::Event::Format { format: WEnum::Value(format) } = event {
            state.remote.shm_formats.push(format);
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for State {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _data: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_seat::Event::Capabilities { capabilities: WEnum::Value(capabilities) } => {
                let has_pointer = capabilities.contains(wl_seat::Capability::Pointer);
                let has_keyboard = capabilities.contains(wl_seat::Capability::Keyboard);

                if has_pointer && state.remote.pointer.is_none() {
                    state.remote.pointer = Some(seat.get_pointer(qh, ()));
                }
                if !has_pointer {
                    if let Some(pointer) = state.remote.pointer.take() {
                        pointer.release();
                    }
                }

                if has_keyboard && state.remote.keyboard.is_none() {
                    state.remote.keyboard = Some(seat.get_keyboard(qh, ()));
                }
                if !has_keyboard {
                    if let Some(keyboard) = state.remote.keyboard.take() {
                        keyboard.release();
                    }
                }
            }
            wl_seat::Event::Name { name } => {
                info!("host seat: {name}");
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for State {
    fn event(
        state: &mut Self,
        _proxy: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_pointer::Event::Enter { serial, surface_x, surface_y, .. } => {
                state.remote.last_pointer_serial = serial;
                state.pointer_motion(0, surface_x, surface_y);
            }
            wl_pointer::Event::Leave { serial, .. } => {
                state.remote.last_pointer_serial = serial;
                state.pointer_host_leave();
            }
            wl_pointer::Event::Motion { time, surface_x, surface_y } => {
                state.pointer_motion(time, surface_x, surface_y);
            }
            wl_pointer::Event::Button { serial, time, button, state: button_state } => {
                state.remote.last_pointer_serial = serial;
                if let WEnum::Value(button_state) = button_state {
                    state.pointer_button(time, button, button_state);
                }
            }
            wl_pointer::Event::Axis { time, axis, value } => {
                if let WEnum::Value(axis) = axis {
                    state.pointer_axis(time, axis, value);
                }
            }
            wl_pointer::Event::Frame => {
                state.pointer_frame();
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_keyboard::WlKeyboard, ()> for State {
    fn event(
        state: &mut Self,
        _proxy: &wl_keyboard::WlKeyboard,
        event: wl_keyboard::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_keyboard::Event::Keymap { .. } => {
                // Guests get the keymap generated from the profile, not
                // the host's; the fd closes on drop.
            }
            wl_keyboard::Event::Key { time, key, state: key_state, .. } => {
                if let WEnum::Value(key_state) = key_state {
                    state.key_input(time, key, key_state);
                }
            }
            wl_keyboard::Event::Modifiers {
                mods_depressed, mods_latched, mods_locked, group, ..
            } => {
                state.modifiers_input(mods_depressed, mods_latched, mods_locked, group);
            }
            wl_keyboard::Event::Enter { .. } | wl_keyboard::Event::Leave { .. } => {
                // Guest keyboard focus is a router policy decision, not
                // the host's.
            }
            wl_keyboard::Event::RepeatInfo { .. } => {
                // Repeat comes from the profile.
            }
            _ => {}
        }
    }
}

/// Host released a guest buffer.
impl Dispatch<wl_buffer::WlBuffer, BufferKey> for State {
    fn event(
        state: &mut Self,
        _proxy: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        key: &BufferKey,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            state.buffer_remote_release(*key);
        }
    }
}

/// Pool-internal buffers: the slot refcount is dropped explicitly by the
/// UI, not on release.
impl Dispatch<wl_buffer::WlBuffer, SlotRef> for State {
    fn event(
        _state: &mut Self,
        _proxy: &wl_buffer::WlBuffer,
        _event: wl_buffer::Event,
        _data: &SlotRef,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
    }
}

/// Remote twins have no events the kernel consumes (wl_surface
/// enter/leave is output bookkeeping).
impl Dispatch<wl_surface::WlSurface, SurfaceKey> for State {
    fn event(
        _state: &mut Self,
        _proxy: &wl_surface::WlSurface,
        _event: wl_surface::Event,
        _data: &SurfaceKey,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_surface::WlSurface, ()> for State {
    fn event(
        _state: &mut Self,
        _proxy: &wl_surface::WlSurface,
        _event: wl_surface::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for State {
    fn event(
        _state: &mut Self,
        wm_base: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            wm_base.pong(serial);
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, RootWindow> for State {
    fn event(
        state: &mut Self,
        xdg: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        _data: &RootWindow,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            xdg.ack_configure(serial);
            state.ui_configured();
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, RootWindow> for State {
    fn event(
        state: &mut Self,
        _proxy: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        _data: &RootWindow,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure { width, height, .. } => {
                if width > 0 && height > 0 {
                    state.ui.pending_size = Some((width, height));
                }
            }
            xdg_toplevel::Event::Close => {
                info!("host requested close");
                state.shutdown();
            }
            _ => {}
        }
    }
}

impl Dispatch<c_dmabuf::zwp_linux_dmabuf_v1::ZwpLinuxDmabufV1, ()> for State {
    fn event(
        state: &mut Self,
        _proxy: &c_dmabuf::zwp_linux_dmabuf_v1::ZwpLinuxDmabufV1,
        event: c_dmabuf::zwp_linux_dmabuf_v1::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use c_dmabuf::zwp_linux_dmabuf_v1::Event;

        // 0x00ff_ffff_ffff_ffff is DRM_FORMAT_MOD_INVALID, the implicit
        // modifier used with version 1 format events.
        match event {
            Event::Format { format } => {
                state.remote.dmabuf_formats.push((format, 0x00ff_ffff_ffff_ffff));
            }
            Event::Modifier { format, modifier_hi, modifier_lo } => {
                state
                    .remote
                    .dmabuf_formats
                    .push((format, ((modifier_hi as u64) << 32) | modifier_lo as u64));
            }
            _ => {}
        }
    }
}

/// Dmabuf feedback is forwarded verbatim to the guest resource the
/// remote object carries as user data.
impl
    Dispatch<
        c_dmabuf::zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1,
        s_dmabuf::zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1,
    > for State
{
    fn event(
        _state: &mut Self,
        _proxy: &c_dmabuf::zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1,
        event: c_dmabuf::zwp_linux_dmabuf_feedback_v1::Event,
        guest: &s_dmabuf::zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use c_dmabuf::zwp_linux_dmabuf_feedback_v1::Event;
        use wayland_server::Resource;

        if !guest.is_alive() {
            return;
        }

        match event {
            Event::FormatTable { fd, size } => {
                use std::os::fd::AsFd;
                guest.format_table(fd.as_fd(), size);
            }
            Event::MainDevice { device } => guest.main_device(device),
            Event::TrancheDone => guest.tranche_done(),
            Event::TrancheTargetDevice { device } => guest.tranche_target_device(device),
            Event::TrancheFormats { indices } => guest.tranche_formats(indices),
            Event::TrancheFlags { flags } => {
                if let WEnum::Value(flags) = flags {
                    if let Some(flags) =
                        s_dmabuf::zwp_linux_dmabuf_feedback_v1::TrancheFlags::from_bits(
                            flags.bits(),
                        )
                    {
                        guest.tranche_flags(flags);
                    }
                }
            }
            Event::Done => guest.done(),
            _ => {}
        }
    }
}

/// Buffer params events only matter for the async create path, which the
/// kernel answers locally; a failure from the host is a hard error.
impl Dispatch<c_dmabuf::zwp_linux_buffer_params_v1::ZwpLinuxBufferParamsV1, ()> for State {
    fn event(
        _state: &mut Self,
        _proxy: &c_dmabuf::zwp_linux_buffer_params_v1::ZwpLinuxBufferParamsV1,
        event: c_dmabuf::zwp_linux_buffer_params_v1::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let c_dmabuf::zwp_linux_buffer_params_v1::Event::Failed = event {
            warn!("host rejected a dmabuf buffer");
        }
    }
}

impl
    Dispatch<
        c_pc::zwp_locked_pointer_v1::ZwpLockedPointerV1,
        s_pc::zwp_locked_pointer_v1::ZwpLockedPointerV1,
    > for State
{
    fn event(
        _state: &mut Self,
        _proxy: &c_pc::zwp_locked_pointer_v1::ZwpLockedPointerV1,
        event: c_pc::zwp_locked_pointer_v1::Event,
        guest: &s_pc::zwp_locked_pointer_v1::ZwpLockedPointerV1,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use wayland_server::Resource;
        if !guest.is_alive() {
            return;
        }
        match event {
            c_pc::zwp_locked_pointer_v1::Event::Locked => guest.locked(),
            c_pc::zwp_locked_pointer_v1::Event::Unlocked => guest.unlocked(),
            _ => {}
        }
    }
}

impl
    Dispatch<
        c_pc::zwp_confined_pointer_v1::ZwpConfinedPointerV1,
        s_pc::zwp_confined_pointer_v1::ZwpConfinedPointerV1,
    > for State
{
    fn event(
        _state: &mut Self,
        _proxy: &c_pc::zwp_confined_pointer_v1::ZwpConfinedPointerV1,
        event: c_pc::zwp_confined_pointer_v1::Event,
        guest: &s_pc::zwp_confined_pointer_v1::ZwpConfinedPointerV1,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use wayland_server::Resource;
        if !guest.is_alive() {
            return;
        }
        match event {
            c_pc::zwp_confined_pointer_v1::Event::Confined => guest.confined(),
            c_pc::zwp_confined_pointer_v1::Event::Unconfined => guest.unconfined(),
            _ => {}
        }
    }
}

impl Dispatch<zwp_relative_pointer_v1::ZwpRelativePointerV1, ()> for State {
    fn event(
        state: &mut Self,
        _proxy: &zwp_relative_pointer_v1::ZwpRelativePointerV1,
        event: zwp_relative_pointer_v1::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let zwp_relative_pointer_v1::Event::RelativeMotion {
            utime_hi,
            utime_lo,
            dx,
            dy,
            dx_unaccel,
            dy_unaccel,
        } = event
        {
            state.relative_motion(utime_hi, utime_lo, dx, dy, dx_unaccel, dy_unaccel);
        }
    }
}

// Remote objects whose events the kernel never consumes.
delegate_noop!(State: ignore wl_compositor::WlCompositor);
delegate_noop!(State: ignore wl_subcompositor::WlSubcompositor);
delegate_noop!(State: ignore wl_subsurface::WlSubsurface);
delegate_noop!(State: ignore wl_region::WlRegion);
delegate_noop!(State: ignore wl_shm_pool::WlShmPool);
delegate_noop!(State: ignore wp_viewporter::WpViewporter);
delegate_noop!(State: ignore wp_viewport::WpViewport);
delegate_noop!(State: ignore c_pc::zwp_pointer_constraints_v1::ZwpPointerConstraintsV1);
delegate_noop!(State: ignore wayland_protocols::wp::relative_pointer::zv1::client::zwp_relative_pointer_manager_v1::ZwpRelativePointerManagerV1);
