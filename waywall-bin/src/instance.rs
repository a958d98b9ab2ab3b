// SPDX-License-Identifier: GPL-3.0-only

//! Game instance tracking.
//!
//! Each instance writes its screen state to a `wpstateout.txt` file in its
//! own directory. The file is watched for close-after-write and reparsed on
//! every change; a failed parse keeps the previous state.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use calloop::channel::Sender;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::server::surface::Surface;
use crate::util::Key;

pub const STATE_FILE: &str = "wpstateout.txt";

/// Sub-state of an instance that has joined a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InWorld {
    Unpaused,
    Paused,
    /// An inventory or other game screen is open.
    Menu,
}

/// The screen an instance is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Waiting,
    Generating(i32),
    Previewing(i32),
    InWorld(InWorld),
    Wall,
}

/// Parses the first line of a state file.
///
/// The grammar is one token, optionally followed by a comma-separated
/// argument:
///
/// ```text
/// title | waiting | wall
/// generating,<percent> | previewing,<percent>
/// inworld,unpaused|paused|gamescreenopen
/// ```
pub fn parse_state(data: &str) -> Result<Screen> {
    let line = data.lines().next().unwrap_or("").trim();
    let (token, arg) = match line.split_once(',') {
        Some((token, arg)) => (token, Some(arg)),
        None => (line, None),
    };

    let percent = |arg: Option<&str>| -> Result<i32> {
        let arg = arg.context("missing percentage")?;
        let value: i32 = arg.parse().with_context(|| format!("bad percentage {arg:?}"))?;
        if !(0..=100).contains(&value) {
            bail!("percentage {value} out of range");
        }
        Ok(value)
    };

    Ok(match token {
        "title" => Screen::Title,
        "waiting" => Screen::Waiting,
        "wall" => Screen::Wall,
        "generating" => Screen::Generating(percent(arg)?),
        "previewing" => Screen::Previewing(percent(arg)?),
        "inworld" => Screen::InWorld(match arg {
            Some("unpaused") => InWorld::Unpaused,
            Some("paused") => InWorld::Paused,
            Some("gamescreenopen") => InWorld::Menu,
            other => bail!("unknown inworld state {other:?}"),
        }),
        other => bail!("unknown state token {other:?}"),
    })
}

/// Identification of a new instance, supplied by the layout layer at map
/// time (title/WM_CLASS/cwd heuristics live there).
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub dir: PathBuf,
    pub pid: i32,
}

#[derive(Debug)]
pub struct Instance {
    pub dir: PathBuf,
    pub pid: i32,
    pub state: Screen,
    pub surface: Key<Surface>,
}

impl Instance {
    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }
}

/// The set of known instances, densely indexed; ids shift down on death,
/// mirroring the scheduler's slot table.
pub struct InstanceManager {
    instances: Vec<Instance>,
    watcher: Option<RecommendedWatcher>,
}

impl InstanceManager {
    /// Creates the manager. File events are delivered through `tx` and
    /// must be fed back in via [`InstanceManager::handle_path_event`].
    pub fn new(tx: Sender<PathBuf>) -> Self {
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    warn!("instance watch error: {err}");
                    return;
                }
            };

            if !matches!(
                event.kind,
                notify::EventKind::Access(notify::event::AccessKind::Close(
                    notify::event::AccessMode::Write,
                )) | notify::EventKind::Modify(_)
            ) {
                return;
            }

            for path in event.paths {
                if path.file_name().map(|n| n == STATE_FILE).unwrap_or(false) {
                    let _ = tx.send(path);
                }
            }
        });

        let watcher = match watcher {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!("failed to create instance state watcher: {err}");
                None
            }
        };

        Self { instances: Vec::new(), watcher }
    }

    pub fn get(&self, id: usize) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// Registers a newly mapped instance and begins watching its state
    /// file. Returns the new instance id.
    pub fn add(&mut self, spec: InstanceSpec, surface: Key<Surface>) -> Result<usize> {
        let instance = Instance {
            state: fs::read_to_string(spec.dir.join(STATE_FILE))
                .ok()
                .and_then(|data| parse_state(&data).ok())
                .unwrap_or(Screen::Title),
            dir: spec.dir,
            pid: spec.pid,
            surface,
        };

        if let Some(watcher) = &mut self.watcher {
            watcher
                .watch(&instance.dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("failed to watch {}", instance.dir.display()))?;
        }

        debug!("new instance {} (pid {})", instance.dir.display(), instance.pid);
        self.instances.push(instance);
        Ok(self.instances.len() - 1)
    }

    /// Forgets an instance whose surface was unmapped. Later ids shift
    /// down by one; the caller must mirror this in the scheduler.
    pub fn remove(&mut self, id: usize) -> Option<Instance> {
        if id >= self.instances.len() {
            return None;
        }

        let instance = self.instances.remove(id);
        if let Some(watcher) = &mut self.watcher {
            if let Err(err) = watcher.unwatch(&instance.dir) {
                warn!("failed to unwatch {}: {err}", instance.dir.display());
            }
        }
        Some(instance)
    }

    pub fn id_for_surface(&self, key: Key<Surface>) -> Option<usize> {
        self.instances.iter().position(|i| i.surface == key)
    }

    fn id_for_state_path(&self, path: &Path) -> Option<usize> {
        let dir = path.parent()?;
        self.instances.iter().position(|i| i.dir == dir)
    }

    /// Reparses the state file behind `path`. Returns the instance id and
    /// new state when the state changed.
    pub fn handle_path_event(&mut self, path: &Path) -> Option<(usize, Screen)> {
        let id = self.id_for_state_path(path)?;

        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                warn!("failed to read {}: {err}", path.display());
                return None;
            }
        };

        match parse_state(&data) {
            Ok(state) => {
                let instance = &mut self.instances[id];
                if instance.state == state {
                    return None;
                }
                instance.state = state;
                Some((id, state))
            }
            Err(err) => {
                warn!("failed to parse {}: {err}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_screen() {
        assert_eq!(parse_state("title\n").unwrap(), Screen::Title);
        assert_eq!(parse_state("waiting").unwrap(), Screen::Waiting);
        assert_eq!(parse_state("wall").unwrap(), Screen::Wall);
        assert_eq!(parse_state("generating,42").unwrap(), Screen::Generating(42));
        assert_eq!(parse_state("previewing,0").unwrap(), Screen::Previewing(0));
        assert_eq!(parse_state("previewing,100").unwrap(), Screen::Previewing(100));
        assert_eq!(
            parse_state("inworld,unpaused").unwrap(),
            Screen::InWorld(InWorld::Unpaused)
        );
        assert_eq!(parse_state("inworld,paused").unwrap(), Screen::InWorld(InWorld::Paused));
        assert_eq!(
            parse_state("inworld,gamescreenopen").unwrap(),
            Screen::InWorld(InWorld::Menu)
        );
    }

    #[test]
    fn only_first_line_matters() {
        assert_eq!(parse_state("title\ngarbage\n").unwrap(), Screen::Title);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_state("").is_err());
        assert!(parse_state("loading").is_err());
        assert!(parse_state("generating").is_err());
        assert!(parse_state("generating,abc").is_err());
        assert!(parse_state("generating,101").is_err());
        assert!(parse_state("previewing,-1").is_err());
        assert!(parse_state("inworld").is_err());
        assert!(parse_state("inworld,menu").is_err());
    }
}
