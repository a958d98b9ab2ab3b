// SPDX-License-Identifier: GPL-3.0-only

//! Per-instance CPU scheduling.
//!
//! Instances are assigned to one of four cgroup priority groups based on
//! their screen state and whether they hold input focus. The cgroup
//! backend lives in [`cgroup`]; [`setup`] holds the privileged bootstrap
//! and the unprivileged readiness check.

pub mod cgroup;
pub mod setup;

use crate::instance::Screen;

pub const MAX_INSTANCES: usize = 128;

/// A CPU priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Group {
    /// Not yet scheduled into any group.
    #[default]
    None,
    Idle,
    Low,
    High,
    Active,
}

/// Maps an instance state to its priority group.
///
/// `wall` is a UI-side state and produces no scheduling change, as does an
/// unparsed state.
pub fn group_for(state: Screen, is_active: bool, preview_threshold: i32) -> Group {
    match state {
        Screen::Title | Screen::Waiting | Screen::Generating(_) => Group::High,
        Screen::Previewing(percent) => {
            if percent < preview_threshold {
                Group::High
            } else {
                Group::Low
            }
        }
        Screen::InWorld(_) => {
            if is_active {
                Group::Active
            } else {
                Group::Idle
            }
        }
        Screen::Wall => Group::None,
    }
}

/// The scheduling backend interface.
pub trait CpuManager {
    /// Recomputes the group of `id` from `state` and moves its pid when
    /// the group changed.
    fn update(&mut self, id: usize, pid: i32, state: Screen);

    /// Transfers input focus: the previous active instance (if any) is
    /// demoted to `high`, then `id` is promoted to `active`.
    fn set_active(&mut self, id: Option<usize>);

    /// Removes a dead instance; slots above `id` shift down by one.
    fn death(&mut self, id: usize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InWorld;

    #[test]
    fn state_group_mapping() {
        assert_eq!(group_for(Screen::Title, false, 20), Group::High);
        assert_eq!(group_for(Screen::Waiting, true, 20), Group::High);
        assert_eq!(group_for(Screen::Generating(95), false, 20), Group::High);
        assert_eq!(group_for(Screen::Previewing(10), false, 20), Group::High);
        assert_eq!(group_for(Screen::Previewing(20), false, 20), Group::Low);
        assert_eq!(group_for(Screen::Previewing(85), true, 20), Group::Low);
        assert_eq!(group_for(Screen::InWorld(InWorld::Unpaused), false, 20), Group::Idle);
        assert_eq!(group_for(Screen::InWorld(InWorld::Paused), true, 20), Group::Active);
        assert_eq!(group_for(Screen::Wall, false, 20), Group::None);
    }
}
