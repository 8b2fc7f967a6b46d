use crate::Result;
use std::path::{Path, PathBuf};

/// Lock files Chromium leaves behind in a profile when it does not exit cleanly
const SINGLETON_FILES: [&str; 3] = ["SingletonLock", "SingletonSocket", "SingletonCookie"];

/// Browser profile directory for a lookup session
pub struct ProfileDir {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileDir {
    /// Create a throwaway profile that is deleted on drop
    pub fn temporary() -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("bankrot-profile-")
            .tempdir()?
            .keep();

        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// Use (and create if needed) a profile directory that outlives the run.
    ///
    /// Singleton locks left by a crashed session are removed, or Chromium
    /// would refuse to start with this profile. A lock held by a running
    /// browser is left alone.
    pub fn persistent(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        if lock_is_stale(&path.join("SingletonLock")) {
            for name in SINGLETON_FILES {
                let lock = path.join(name);
                // symlink_metadata: SingletonLock is a dangling symlink on Linux
                if lock.symlink_metadata().is_ok() {
                    tracing::debug!("Removing stale profile lock {}", lock.display());
                    std::fs::remove_file(&lock)?;
                }
            }
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

/// Whether `lock` names a Chromium process on this host that no longer runs.
///
/// Chromium points SingletonLock at `<hostname>-<pid>`. Anything that cannot
/// be read that way, or belongs to another host, counts as held.
#[cfg(target_os = "linux")]
fn lock_is_stale(lock: &Path) -> bool {
    let Ok(target) = std::fs::read_link(lock) else {
        return false;
    };
    let target = target.to_string_lossy();
    let Some((host, pid)) = target.rsplit_once('-') else {
        return false;
    };
    let Ok(pid) = pid.parse::<u32>() else {
        return false;
    };

    let local_host = std::fs::read_to_string("/proc/sys/kernel/hostname").unwrap_or_default();
    if host != local_host.trim() {
        tracing::warn!("Profile lock {} is held from host {}", lock.display(), host);
        return false;
    }

    let alive = Path::new("/proc").join(pid.to_string()).exists();
    if alive {
        tracing::warn!("Profile {} is in use by process {}", lock.display(), pid);
    }
    !alive
}

#[cfg(not(target_os = "linux"))]
fn lock_is_stale(_lock: &Path) -> bool {
    false
}
