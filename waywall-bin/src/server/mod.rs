// SPDX-License-Identifier: GPL-3.0-only

//! The embedded Wayland server: terminates guest connections and
//! advertises a fixed set of globals, each a thin translator onto the
//! remote connection.

pub mod buffer;
pub mod compositor;
pub mod data_device;
pub mod dmabuf;
pub mod pointer_constraints;
pub mod relative_pointer;
pub mod seat;
pub mod shm;
pub mod surface;
pub mod viewporter;
pub mod xdg_shell;
pub mod xwayland_shell;

use std::os::fd::{AsFd, AsRawFd, BorrowedFd};

use anyhow::{Context, Result};
use calloop::{generic::Generic, Interest, LoopHandle, Mode, PostAction};
use tracing::{debug, info, warn};
use wayland_protocols::{
    wp::{
        linux_dmabuf::zv1::server::zwp_linux_dmabuf_v1::ZwpLinuxDmabufV1,
        pointer_constraints::zv1::server::zwp_pointer_constraints_v1::ZwpPointerConstraintsV1,
        relative_pointer::zv1::server::zwp_relative_pointer_manager_v1::ZwpRelativePointerManagerV1,
        viewporter::server::wp_viewporter::WpViewporter,
    },
    xdg::shell::server::xdg_wm_base::XdgWmBase,
    xwayland::shell::v1::server::xwayland_shell_v1::XwaylandShellV1,
};
use wayland_server::{
    backend::{ClientData, ClientId, DisconnectReason},
    protocol::{
        wl_compositor::WlCompositor, wl_data_device::WlDataDevice,
        wl_data_device_manager::WlDataDeviceManager, wl_data_source::WlDataSource,
        wl_seat::WlSeat, wl_shm::WlShm, wl_subcompositor::WlSubcompositor,
    },
    Display, DisplayHandle, ListeningSocket,
};

use crate::{
    server::{buffer::Buffer, surface::Surface},
    state::State,
    util::{Arena, SerialCounter},
};

/// Versions advertised to guests. Protocols the remote supports at a
/// lower version are advertised at the remote's version instead.
const COMPOSITOR_VERSION: u32 = 6;
const SEAT_VERSION: u32 = 7;
const XDG_WM_BASE_VERSION: u32 = 5;
const DATA_DEVICE_VERSION: u32 = 3;
const DMABUF_VERSION: u32 = 4;

pub struct Server {
    pub dh: DisplayHandle,
    pub socket_name: String,
    pub serial: SerialCounter,

    pub surfaces: Arena<Surface>,
    pub buffers: Arena<Buffer>,

    /// Current clipboard source, owned by some guest.
    pub selection: Option<WlDataSource>,
    pub data_devices: Vec<WlDataDevice>,

    listener: Option<ListeningSocket>,
}

impl Server {
    /// Creates the guest-facing globals and the listening socket.
    pub fn new(dh: DisplayHandle, remote_dmabuf_version: u32) -> Result<Self> {
        dh.create_global::<State, WlCompositor, ()>(COMPOSITOR_VERSION, ());
        dh.create_global::<State, WlSubcompositor, ()>(1, ());
        dh.create_global::<State, WlShm, ()>(1, ());
        dh.create_global::<State, WlSeat, ()>(SEAT_VERSION, ());
        dh.create_global::<State, XdgWmBase, ()>(XDG_WM_BASE_VERSION, ());
        dh.create_global::<State, WlDataDeviceManager, ()>(DATA_DEVICE_VERSION, ());
        dh.create_global::<State, WpViewporter, ()>(1, ());
        dh.create_global::<State, ZwpPointerConstraintsV1, ()>(1, ());
        dh.create_global::<State, ZwpRelativePointerManagerV1, ()>(1, ());
        dh.create_global::<State, ZwpLinuxDmabufV1, ()>(
            remote_dmabuf_version.min(DMABUF_VERSION),
            (),
        );
        dh.create_global::<State, XwaylandShellV1, ()>(1, ());

        let listener = ListeningSocket::bind_auto("wayland", 1..33)
            .context("failed to create wayland display socket")?;
        let socket_name = listener
            .socket_name()
            .context("listening socket has no name")?
            .to_string_lossy()
            .into_owned();
        info!("listening on {socket_name}");

        Ok(Self {
            dh,
            socket_name,
            serial: SerialCounter::default(),
            surfaces: Arena::default(),
            buffers: Arena::default(),
            selection: None,
            data_devices: Vec::new(),
            listener: Some(listener),
        })
    }

    /// Hands the listening socket over for event-loop registration.
    pub fn take_listener(&mut self) -> Option<ListeningSocket> {
        self.listener.take()
    }
}

/// Per-client data; resource cleanup happens through `Dispatch::destroyed`
/// hooks, so connection teardown needs no extra work here.
pub struct ClientState;

impl ClientData for ClientState {
    fn initialized(&self, client_id: ClientId) {
        debug!("client connected: {client_id:?}");
    }

    fn disconnected(&self, client_id: ClientId, _reason: DisconnectReason) {
        debug!("client disconnected: {client_id:?}");
    }
}

struct ListenerSource(ListeningSocket);

impl AsFd for ListenerSource {
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: the socket outlives the borrow; calloop holds the
        // source for as long as it polls it.
        unsafe { BorrowedFd::borrow_raw(self.0.as_raw_fd()) }
    }
}

/// Registers the listening socket and the guest display as event-loop
/// sources.
pub fn insert_sources(
    handle: &LoopHandle<'static, State>,
    display: std::rc::Rc<std::cell::RefCell<Display<State>>>,
    listener: ListeningSocket,
) -> Result<()> {
    handle
        .insert_source(
            Generic::new(ListenerSource(listener), Interest::READ, Mode::Level),
            |_, source, state| {
                loop {
                    match source.0.accept() {
                        Ok(Some(stream)) => {
                            if let Err(err) = state
                                .server
                                .dh
                                .insert_client(stream, std::sync::Arc::new(ClientState))
                            {
                                warn!("failed to accept client: {err}");
                            }
                        }
                        Ok(None) => break,
                        Err(err) => {
                            warn!("error accepting client: {err}");
                            break;
                        }
                    }
                }
                Ok(PostAction::Continue)
            },
        )
        .map_err(|err| anyhow::anyhow!("failed to insert listener source: {err}"))?;

    let poll_fd = display
        .borrow_mut()
        .backend()
        .poll_fd()
        .try_clone_to_owned()
        .context("failed to clone display poll fd")?;
    let dispatch_display = display.clone();
    handle
        .insert_source(Generic::new(poll_fd, Interest::READ, Mode::Level), move |_, _, state| {
            let display = dispatch_display.clone();
            let mut display = display.borrow_mut();
            if let Err(err) = display.dispatch_clients(state) {
                warn!("error dispatching clients: {err}");
            }
            let _ = display.flush_clients();
            Ok(PostAction::Continue)
        })
        .map_err(|err| anyhow::anyhow!("failed to insert display source: {err}"))?;

    Ok(())
}
