// SPDX-License-Identifier: GPL-3.0-only

//! cgroup-backed CPU scheduling.
//!
//! One write fd per group is held open for the lifetime of the manager.
//! Moving an instance is a single write of its pid to the target group's
//! `cgroup.procs`; group membership is never read back.

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::error;
use waywall_config::CpuConfig;

use super::{group_for, CpuManager, Group};
use crate::instance::Screen;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    group: Group,
    pid: i32,
}

pub struct CgroupManager {
    preview_threshold: i32,
    files: [File; 4],
    last_active: Option<usize>,
    slots: Box<[Slot; super::MAX_INSTANCES]>,
}

fn fd_index(group: Group) -> usize {
    match group {
        Group::Idle => 0,
        Group::Low => 1,
        Group::High => 2,
        Group::Active => 3,
        Group::None => unreachable!("no fd for the null group"),
    }
}

fn open_group_procs(base: &Path, group: &str) -> Result<File> {
    let path = base.join(group).join("cgroup.procs");
    OpenOptions::new()
        .write(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))
}

fn write_group_weight(base: &Path, group: &str, weight: u32) -> Result<()> {
    let path = base.join(group).join("cpu.weight");
    let mut file = OpenOptions::new()
        .write(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(format!("{weight}\n").as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

impl CgroupManager {
    /// Opens the group fds under `base` and applies the configured group
    /// weights. Fails if the cgroup tree has not been prepared.
    pub fn new(base: &Path, config: &CpuConfig) -> Result<Self> {
        let weights = [
            ("idle", config.weight_idle),
            ("low", config.weight_low),
            ("high", config.weight_high),
            ("active", config.weight_active),
        ];
        for (group, weight) in weights {
            write_group_weight(base, group, weight)?;
        }

        let files = [
            open_group_procs(base, "idle")?,
            open_group_procs(base, "low")?,
            open_group_procs(base, "high")?,
            open_group_procs(base, "active")?,
        ];

        Ok(Self {
            preview_threshold: config.preview_threshold,
            files,
            last_active: None,
            slots: Box::new([Slot::default(); super::MAX_INSTANCES]),
        })
    }

    fn set_group(&mut self, id: usize, group: Group) {
        let pid = self.slots[id].pid;
        assert!(pid > 0, "cgroup write for instance without pid");

        if let Err(err) = self.files[fd_index(group)].write_all(format!("{pid}\n").as_bytes()) {
            error!("failed to write pid {pid} to group {group:?}: {err}");
        }
        self.slots[id].group = group;
    }
}

impl CpuManager for CgroupManager {
    fn update(&mut self, id: usize, pid: i32, state: Screen) {
        self.slots[id].pid = pid;

        let is_active = self.last_active == Some(id);
        let group = group_for(state, is_active, self.preview_threshold);

        if group != Group::None && group != self.slots[id].group {
            self.set_group(id, group);
        }
    }

    fn set_active(&mut self, id: Option<usize>) {
        if let Some(old) = self.last_active {
            if Some(old) != id && self.slots[old].pid > 0 {
                self.set_group(old, Group::High);
            }
        }

        self.last_active = id;
        if let Some(id) = id {
            if self.slots[id].pid > 0 {
                self.set_group(id, Group::Active);
            }
        }
    }

    fn death(&mut self, id: usize) {
        assert!(self.last_active != Some(id), "active instance cannot die");

        self.slots.copy_within(id + 1.., id);
        *self.slots.last_mut().unwrap() = Slot::default();

        if let Some(active) = self.last_active {
            if active > id {
                self.last_active = Some(active - 1);
            }
        }
    }
}

/// Returns the base directory of the waywall cgroup tree.
pub fn cgroup_base() -> PathBuf {
    PathBuf::from("/sys/fs/cgroup/waywall")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InWorld;
    use std::fs;

    fn make_tree(dir: &Path) {
        for group in ["idle", "low", "high", "active"] {
            let path = dir.join(group);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("cgroup.procs"), "").unwrap();
            fs::write(path.join("cpu.weight"), "").unwrap();
        }
    }

    fn pids_in(dir: &Path, group: &str) -> Vec<i32> {
        fs::read_to_string(dir.join(group).join("cgroup.procs"))
            .unwrap()
            .lines()
            .map(|l| l.parse().unwrap())
            .collect()
    }

    fn manager(dir: &Path) -> CgroupManager {
        make_tree(dir);
        CgroupManager::new(dir, &CpuConfig { preview_threshold: 20, ..Default::default() })
            .unwrap()
    }

    #[test]
    fn weights_written_on_construction() {
        let dir = tempfile::tempdir().unwrap();
        let _cpu = manager(dir.path());
        assert_eq!(
            fs::read_to_string(dir.path().join("active/cpu.weight")).unwrap(),
            "100\n"
        );
        assert_eq!(fs::read_to_string(dir.path().join("idle/cpu.weight")).unwrap(), "1\n");
    }

    #[test]
    fn construction_fails_without_tree() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CgroupManager::new(dir.path(), &CpuConfig::default()).is_err());
    }

    #[test]
    fn update_writes_only_on_group_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut cpu = manager(dir.path());

        cpu.update(0, 1234, Screen::Generating(95));
        cpu.update(0, 1234, Screen::Previewing(10));
        assert_eq!(pids_in(dir.path(), "high"), vec![1234]);

        cpu.update(0, 1234, Screen::Previewing(85));
        assert_eq!(pids_in(dir.path(), "low"), vec![1234]);

        cpu.update(0, 1234, Screen::InWorld(InWorld::Unpaused));
        assert_eq!(pids_in(dir.path(), "idle"), vec![1234]);
        assert_eq!(pids_in(dir.path(), "high"), vec![1234]);
        assert_eq!(pids_in(dir.path(), "active"), Vec::<i32>::new());
    }

    #[test]
    fn active_instance_goes_to_active_group() {
        let dir = tempfile::tempdir().unwrap();
        let mut cpu = manager(dir.path());

        cpu.update(3, 4321, Screen::Title);
        cpu.set_active(Some(3));
        cpu.update(3, 4321, Screen::InWorld(InWorld::Unpaused));
        assert_eq!(pids_in(dir.path(), "active"), vec![4321]);
    }

    #[test]
    fn set_active_demotes_previous() {
        let dir = tempfile::tempdir().unwrap();
        let mut cpu = manager(dir.path());

        cpu.update(0, 100, Screen::InWorld(InWorld::Unpaused));
        cpu.update(1, 200, Screen::InWorld(InWorld::Unpaused));

        cpu.set_active(Some(0));
        cpu.set_active(Some(1));

        assert_eq!(pids_in(dir.path(), "high"), vec![100]);
        assert_eq!(pids_in(dir.path(), "active"), vec![100, 200]);
    }

    #[test]
    fn death_shifts_slots() {
        let dir = tempfile::tempdir().unwrap();
        let mut cpu = manager(dir.path());

        cpu.update(0, 100, Screen::Title);
        cpu.update(1, 200, Screen::Title);
        cpu.update(2, 300, Screen::Title);
        cpu.set_active(Some(2));

        cpu.death(0);

        // Former id 1 is now id 0 and keeps its pid and group; no new
        // write happens because its group did not change.
        cpu.update(0, 200, Screen::Title);
        assert_eq!(pids_in(dir.path(), "high"), vec![100, 200, 300]);

        // The active id followed the shift.
        cpu.update(1, 300, Screen::InWorld(InWorld::Paused));
        assert_eq!(pids_in(dir.path(), "active"), vec![300]);
    }

    #[test]
    fn wall_state_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut cpu = manager(dir.path());

        cpu.update(0, 100, Screen::Wall);
        for group in ["idle", "low", "high", "active"] {
            assert_eq!(pids_in(dir.path(), group), Vec::<i32>::new());
        }
    }
}
