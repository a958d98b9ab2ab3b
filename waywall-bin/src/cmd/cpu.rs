// SPDX-License-Identifier: GPL-3.0-only

//! `waywall cpu`: privileged cgroup bootstrap.

use anyhow::Result;

use crate::cpu::{cgroup::cgroup_base, setup};

pub fn run() -> Result<()> {
    setup::prepare(&cgroup_base())
}
