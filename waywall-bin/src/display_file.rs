// SPDX-License-Identifier: GPL-3.0-only

//! `/tmp/waywall-display`: the rendezvous point between the compositor
//! and the launch helpers. Line one is the guest Wayland socket name;
//! an optional second line is the X11 display. An advisory write lock
//! enforces a single running compositor.

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

use anyhow::{bail, Context, Result};
use rustix::fs::{fcntl_lock, FlockOperation};

pub const DISPLAY_FILE_PATH: &str = "/tmp/waywall-display";

/// The lock-holding writer side, owned by the compositor process.
pub struct DisplayFile {
    file: File,
}

impl DisplayFile {
    pub fn lock() -> Result<Self> {
        Self::lock_at(Path::new(DISPLAY_FILE_PATH))
    }

    fn lock_at(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        fcntl_lock(&file, FlockOperation::NonBlockingLockExclusive)
            .context("failed to lock waywall-display (is waywall already running?)")?;

        Ok(Self { file })
    }

    /// Records the guest socket name, replacing any stale contents.
    pub fn write_socket(&mut self, socket_name: &str) -> Result<()> {
        self.file.set_len(0).context("failed to truncate waywall-display")?;
        use std::io::Seek;
        self.file.rewind().context("failed to rewind waywall-display")?;
        self.file
            .write_all(socket_name.as_bytes())
            .context("failed to write waywall-display")?;
        self.file.flush().context("failed to flush waywall-display")?;
        Ok(())
    }

    /// Appends the X11 display as the second line once Xwayland is up.
    pub fn append_x11_display(&mut self, display: u32) -> Result<()> {
        self.file
            .write_all(format!("\n:{display}").as_bytes())
            .context("failed to append X11 display")?;
        self.file.flush().context("failed to flush waywall-display")?;
        Ok(())
    }
}

impl Drop for DisplayFile {
    fn drop(&mut self) {
        let _ = fcntl_lock(&self.file, FlockOperation::Unlock);
    }
}

/// The helper side: the Wayland socket name and optional X11 display of
/// the running compositor. Always reads fully before closing.
pub fn read() -> Result<(String, Option<String>)> {
    read_at(Path::new(DISPLAY_FILE_PATH))
}

fn read_at(path: &Path) -> Result<(String, Option<String>)> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            bail!("waywall is not running");
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let mut lines = data.lines();
    let socket = match lines.next() {
        Some(socket) if !socket.is_empty() => socket.to_owned(),
        _ => bail!("{} is empty", path.display()),
    };
    let x11 = lines.next().filter(|l| !l.is_empty()).map(str::to_owned);

    Ok((socket, x11))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_socket_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waywall-display");
        std::fs::write(&path, "wayland-5").unwrap();
        assert_eq!(read_at(&path).unwrap(), ("wayland-5".into(), None));
    }

    #[test]
    fn reads_both_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waywall-display");
        std::fs::write(&path, "wayland-5\n:42").unwrap();
        assert_eq!(read_at(&path).unwrap(), ("wayland-5".into(), Some(":42".into())));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_at(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waywall-display");
        std::fs::write(&path, "").unwrap();
        assert!(read_at(&path).is_err());
    }

    #[test]
    fn writer_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waywall-display");

        let mut file = DisplayFile::lock_at(&path).unwrap();
        file.write_socket("wayland-7").unwrap();
        assert_eq!(read_at(&path).unwrap(), ("wayland-7".into(), None));

        file.append_x11_display(3).unwrap();
        assert_eq!(read_at(&path).unwrap(), ("wayland-7".into(), Some(":3".into())));

        // Stale longer content is fully replaced.
        file.write_socket("wayland-8").unwrap();
        assert_eq!(read_at(&path).unwrap(), ("wayland-8".into(), None));
    }
}
