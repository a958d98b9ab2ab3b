// SPDX-License-Identifier: GPL-3.0-only

//! Subcommand implementations.

pub mod cpu;
pub mod exec;
pub mod run;
pub mod wrap;

use std::{cell::RefCell, rc::Rc};

use anyhow::{Context, Result};
use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use tracing::info;
use wayland_client::{globals::registry_queue_init, Connection};
use wayland_server::Display;
use waywall_config::Profile;

use crate::{
    gl::GlState,
    input::Router,
    instance::InstanceManager,
    remote::{buffer_pool::BufferPool, Remote},
    server::{self, Server},
    state::State,
    subproc::Subproc,
    ui::Ui,
    xwayland::XServer,
};

/// Builds the compositor: remote connection, guest server, event loop
/// sources, GL pipeline. Shared by `run` and `wrap`.
pub fn create_compositor(
    profile: Profile,
) -> Result<(EventLoop<'static, State>, State)> {
    let conn = Connection::connect_to_env()
        .context("failed to connect to the host wayland compositor")?;
    let (globals, mut queue) = registry_queue_init::<State>(&conn)
        .context("failed to initialize the host registry")?;
    let qh = queue.handle();

    let event_loop: EventLoop<'static, State> =
        EventLoop::try_new().context("failed to create event loop")?;
    let handle = event_loop.handle();

    handle
        .insert_source(
            calloop::signals::Signals::new(&[calloop::signals::Signal::SIGINT])
                .context("failed to register SIGINT")?,
            |_, _, state: &mut State| state.shutdown(),
        )
        .map_err(|err| anyhow::anyhow!("failed to insert signal source: {err}"))?;

    let remote = Remote::bind(&conn, &globals, &qh)?;

    let display: Display<State> = Display::new().context("failed to create guest display")?;
    let dh = display.handle();
    let mut server = Server::new(dh, remote.dmabuf_version())?;
    let listener = server.take_listener().unwrap();

    let pool = BufferPool::new(&remote, &qh)?;
    let ui = Ui::new(&remote, &qh)?;
    let router = Router::new(&profile.input)?;

    let (instance_tx, instance_rx) = calloop::channel::channel::<std::path::PathBuf>();
    handle
        .insert_source(instance_rx, |event, _, state: &mut State| {
            if let calloop::channel::Event::Msg(path) = event {
                state.instance_state_update(&path);
            }
        })
        .map_err(|err| anyhow::anyhow!("failed to insert instance channel: {err}"))?;
    let instances = InstanceManager::new(instance_tx);

    let xwayland = XServer::new(&handle)?;

    let display = Rc::new(RefCell::new(display));
    server::insert_sources(&handle, display.clone(), listener)?;

    let mut state = State {
        profile,
        loop_handle: handle.clone(),
        loop_signal: event_loop.get_signal(),
        remote,
        pool,
        server,
        ui,
        router,
        gl: None,
        cpu: None,
        instances,
        subproc: Subproc::new(),
        xwayland: Some(xwayland),
        display,
        display_file: None,
        wrap_child: None,
        shutting_down: false,
    };

    // Settle the initial burst: global events (shm formats, dmabuf
    // modifiers, seat capabilities), then the objects they triggered.
    queue.roundtrip(&mut state).context("initial roundtrip failed")?;
    queue.roundtrip(&mut state).context("initial roundtrip failed")?;
    state.remote.check_shm_formats()?;

    let gl = GlState::new(
        state.remote.conn.display(),
        &state.ui.gl_surface,
        state.ui.width,
        state.ui.height,
    )?;
    state.gl = Some(gl);
    state.gl_mark_dirty();

    WaylandSource::new(conn, queue)
        .insert(handle)
        .map_err(|err| anyhow::anyhow!("failed to insert wayland source: {err}"))?;

    info!("compositor ready on {}", state.server.socket_name);
    Ok((event_loop, state))
}

/// Runs the loop until shutdown.
pub fn run_event_loop(
    mut event_loop: EventLoop<'static, State>,
    state: &mut State,
) -> Result<()> {
    event_loop
        .run(None, state, |state| state.flush())
        .context("event loop failed")?;
    Ok(())
}
