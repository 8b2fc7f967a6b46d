use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Picks the Chromium binary for a lookup session
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// Resolve the binary to launch.
    ///
    /// An explicit path must exist and be executable. Without one, the platform
    /// default locations are checked; `None` means none of them exist and
    /// chromiumoxide should run its own detection.
    pub fn find(&self) -> Result<Option<PathBuf>> {
        if let Some(ref path) = self.custom_path {
            return Self::validate(path).map(Some);
        }

        let found = Self::default_paths()
            .into_iter()
            .find(|path| Self::validate(path).is_ok());

        match &found {
            Some(path) => tracing::debug!("Using Chromium at {}", path.display()),
            None => tracing::debug!("No Chromium in default locations, deferring to auto-detection"),
        }

        Ok(found)
    }

    fn default_paths() -> Vec<PathBuf> {
        #[cfg(target_os = "macos")]
        return vec![
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        ];

        #[cfg(target_os = "linux")]
        return vec![
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/usr/bin/google-chrome"),
        ];

        #[cfg(target_os = "windows")]
        return vec![
            PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return vec![];
    }

    fn validate(path: &Path) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(Error::Browser(format!(
                "Chrome not found at: {}",
                path.display()
            )));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(path)?.permissions().mode();
            if mode & 0o111 == 0 {
                return Err(Error::Browser(format!(
                    "Chrome binary not executable: {}",
                    path.display()
                )));
            }
        }

        Ok(path.to_path_buf())
    }
}
