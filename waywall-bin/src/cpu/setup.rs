// SPDX-License-Identifier: GPL-3.0-only

//! cgroup tree bootstrap.
//!
//! `check` may run at any privilege level and reports whether the tree is
//! usable by the current user. `prepare` needs root and mirrors this
//! shell script:
//!
//! ```text
//! CGROUP_DIR=/sys/fs/cgroup/waywall
//! USERNAME=$(logname)
//!
//! mkdir -p $CGROUP_DIR
//! chown "$USERNAME" $CGROUP_DIR/cgroup.procs
//! echo "+cpu" > $CGROUP_DIR/cgroup.subtree_control
//!
//! for subgroup in idle low high active; do
//!     mkdir $CGROUP_DIR/$subgroup
//!     chown "$USERNAME" $CGROUP_DIR/$subgroup/cgroup.procs
//!     chown "$USERNAME" $CGROUP_DIR/$subgroup/cpu.weight
//! done
//! ```

use std::{ffi::CStr, fs, io::ErrorKind, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use rustix::fs::{chown, Gid, Uid};
use tracing::info;

const SUBGROUPS: [&str; 4] = ["idle", "low", "high", "active"];
const FILES: [&str; 2] = ["cgroup.procs", "cpu.weight"];

const PERMS_MESSAGE: &str = "elevated permissions are required";

/// Outcome of the unprivileged readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// The tree is missing or not owned by the current user; `waywall cpu`
    /// must be run with root privileges first.
    Unprepared,
}

/// Resolves the user who invoked the process, surviving privilege
/// escalation wrappers that rewrite the effective uid.
fn login_user() -> Result<(Uid, Gid)> {
    // SAFETY: getlogin returns a pointer to a static buffer (or null) and
    // getpwnam reads a name we just validated; both are only called from
    // the single-threaded bootstrap path.
    unsafe {
        let name = libc::getlogin();
        if name.is_null() {
            bail!("failed to get login name");
        }

        let passwd = libc::getpwnam(name);
        if passwd.is_null() {
            bail!(
                "failed to resolve user data for {:?}",
                CStr::from_ptr(name).to_string_lossy()
            );
        }

        Ok((Uid::from_raw((*passwd).pw_uid), Gid::from_raw((*passwd).pw_gid)))
    }
}

/// Checks that every group file exists and is owned by the current user.
pub fn check(base: &Path) -> Result<Readiness> {
    use std::os::unix::fs::MetadataExt;

    let euid = rustix::process::geteuid().as_raw();
    let egid = rustix::process::getegid().as_raw();

    let paths = std::iter::once(base.join("cgroup.procs")).chain(
        itertools::iproduct!(SUBGROUPS, FILES).map(|(subgroup, file)| {
            base.join(subgroup).join(file)
        }),
    );

    for path in paths {
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Readiness::Unprepared),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", path.display()))
            }
        };

        if meta.uid() != euid && meta.gid() != egid {
            return Ok(Readiness::Unprepared);
        }
    }

    Ok(Readiness::Ready)
}

fn perm_context(err: std::io::Error, what: String) -> anyhow::Error {
    if err.kind() == ErrorKind::PermissionDenied {
        anyhow!(PERMS_MESSAGE)
    } else {
        anyhow::Error::new(err).context(what)
    }
}

/// Creates and chowns the cgroup tree. Must run as root.
pub fn prepare(base: &Path) -> Result<()> {
    let (uid, gid) = login_user()?;

    // Delegation requires the root group's cgroup.procs to be writable by
    // the managing user as well.
    chown("/sys/fs/cgroup/cgroup.procs", Some(uid), Some(gid))
        .context("failed to chown /sys/fs/cgroup/cgroup.procs")?;

    match fs::create_dir(base) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
        Err(err) => return Err(perm_context(err, format!("failed to create {}", base.display()))),
    }

    let subtree = base.join("cgroup.subtree_control");
    fs::write(&subtree, "+cpu")
        .map_err(|err| perm_context(err, format!("failed to write {}", subtree.display())))?;

    let procs = base.join("cgroup.procs");
    chown(&procs, Some(uid), Some(gid))
        .with_context(|| format!("failed to chown {}", procs.display()))?;

    for subgroup in SUBGROUPS {
        let dir = base.join(subgroup);
        match fs::create_dir(&dir) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => {
                return Err(perm_context(err, format!("failed to create {}", dir.display())))
            }
        }

        for file in FILES {
            let path = dir.join(file);
            chown(&path, Some(uid), Some(gid))
                .with_context(|| format!("failed to chown {}", path.display()))?;
        }
    }

    info!("prepared cgroup tree at {}", base.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tree(dir: &Path) {
        fs::write(dir.join("cgroup.procs"), "").unwrap();
        for subgroup in SUBGROUPS {
            let path = dir.join(subgroup);
            fs::create_dir_all(&path).unwrap();
            for file in FILES {
                fs::write(path.join(file), "").unwrap();
            }
        }
    }

    #[test]
    fn empty_dir_is_unprepared() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check(dir.path()).unwrap(), Readiness::Unprepared);
    }

    #[test]
    fn owned_tree_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());
        assert_eq!(check(dir.path()).unwrap(), Readiness::Ready);
    }

    #[test]
    fn partial_tree_is_unprepared() {
        let dir = tempfile::tempdir().unwrap();
        make_tree(dir.path());
        fs::remove_file(dir.path().join("active").join("cpu.weight")).unwrap();
        assert_eq!(check(dir.path()).unwrap(), Readiness::Unprepared);
    }
}
