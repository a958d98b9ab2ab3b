// SPDX-License-Identifier: GPL-3.0-only

//! `waywall run`: the wall. Requires a prepared cgroup tree.

use anyhow::{bail, Context, Result};
use tracing::info;
use waywall_config::Profile;

use crate::{
    config_watch,
    cpu::{cgroup::{cgroup_base, CgroupManager}, setup},
    display_file::DisplayFile,
};

pub fn run(profile_name: Option<&str>) -> Result<()> {
    let base = cgroup_base();
    match setup::check(&base).context("failed to check cgroups")? {
        setup::Readiness::Ready => {}
        setup::Readiness::Unprepared => {
            bail!("cgroups are not prepared - run 'waywall cpu' with root privileges");
        }
    }

    let mut display_file = DisplayFile::lock()?;

    let profile = Profile::load_or_default(profile_name)?;
    let cpu = CgroupManager::new(&base, &profile.cpu)
        .context("failed to create cgroup cpu manager")?;

    let (event_loop, mut state) = super::create_compositor(profile)?;
    state.cpu = Some(Box::new(cpu));

    let _watcher = config_watch::watch_config(
        &event_loop.handle(),
        profile_name.map(str::to_owned),
    )?;

    display_file.write_socket(&state.server.socket_name)?;
    state.display_file = Some(display_file);

    super::run_event_loop(event_loop, &mut state)?;

    info!("done");
    Ok(())
}
