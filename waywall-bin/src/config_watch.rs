// SPDX-License-Identifier: GPL-3.0-only

//! Live configuration reload.
//!
//! The profile directory is watched for writes to `.ron` files and for
//! file creation/deletion. A change reloads the profile fully before
//! swapping it in; a broken profile keeps the old one.

use anyhow::{Context, Result};
use calloop::{channel, LoopHandle};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{error, info, warn};
use waywall_config::Profile;

use crate::state::State;

#[derive(Debug)]
enum ConfigEvent {
    Changed,
    DirGone,
}

/// Watches the profile directory; the watcher must stay alive for the
/// lifetime of the compositor.
pub fn watch_config(
    handle: &LoopHandle<'static, State>,
    profile_name: Option<String>,
) -> Result<RecommendedWatcher> {
    let dir = waywall_config::config_dir()?;
    let (tx, rx) = channel::channel::<ConfigEvent>();

    handle
        .insert_source(rx, move |event, _, state| {
            match event {
                channel::Event::Msg(ConfigEvent::Changed) => {
                    state.reload_profile(profile_name.as_deref());
                }
                channel::Event::Msg(ConfigEvent::DirGone) => {
                    warn!(
                        "config directory was deleted - automatic reloads will no longer occur"
                    );
                }
                channel::Event::Closed => {}
            };
        })
        .map_err(|err| anyhow::anyhow!("failed to insert config channel: {err}"))?;

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                error!("config watch error: {err}");
                return;
            }
        };

        match event.kind {
            notify::EventKind::Remove(notify::event::RemoveKind::Folder) => {
                let _ = tx.send(ConfigEvent::DirGone);
            }
            notify::EventKind::Access(notify::event::AccessKind::Close(
                notify::event::AccessMode::Write,
            ))
            | notify::EventKind::Create(_)
            | notify::EventKind::Remove(_) => {
                if event
                    .paths
                    .iter()
                    .any(|p| p.extension().map(|e| e == "ron").unwrap_or(false))
                {
                    let _ = tx.send(ConfigEvent::Changed);
                }
            }
            _ => {}
        }
    })
    .context("failed to create config watcher")?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch config dir {}", dir.display()))?;
    info!("watching {} for profile changes", dir.display());

    Ok(watcher)
}

impl State {
    /// Parses the profile from disk and applies it; on failure the old
    /// profile is retained.
    pub fn reload_profile(&mut self, profile_name: Option<&str>) {
        let profile = match Profile::load(profile_name) {
            Ok(profile) => profile,
            Err(err) => {
                error!("failed to load new config: {err:#}");
                return;
            }
        };

        if profile == self.profile {
            return;
        }

        if let Err(err) = self.router.apply_config(&profile.input) {
            error!("failed to apply new config: {err:#}");
            return;
        }

        self.profile = profile;
        self.ui_apply_theme();
        info!("reloaded configuration");
    }
}
