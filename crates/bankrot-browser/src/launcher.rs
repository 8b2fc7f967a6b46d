use crate::{Error, Result};
use chromiumoxide::browser::BrowserConfig;
use std::path::PathBuf;
use std::time::Duration;

/// User agent presented to the registry
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:72.0) Gecko/20100101 Firefox/72.0";

/// How the Chromium process for a lookup session is started
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub profile_path: PathBuf,
    pub chrome_path: Option<PathBuf>,
    /// Hide the browser window. Turned off by `--debug`.
    pub headless: bool,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl LaunchOptions {
    pub fn new(profile_path: PathBuf) -> Self {
        Self {
            profile_path,
            chrome_path: None,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_chrome_path(mut self, chrome_path: Option<PathBuf>) -> Self {
        self.chrome_path = chrome_path;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Build Chrome command-line arguments
    fn build_args(&self) -> Vec<String> {
        vec![
            "--start-maximized".to_string(),
            "--enable-javascript".to_string(),
            "--no-sandbox".to_string(),
            "--disable-gpu".to_string(),
            "--allow-insecure-localhost".to_string(),
            "--ignore-certificate-errors".to_string(),
            format!("--user-agent={}", self.user_agent),
        ]
    }

    /// Translate the options into a chromiumoxide launch configuration
    pub fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(&self.profile_path)
            .viewport(None)
            .request_timeout(self.request_timeout)
            .args(self.build_args());

        if !self.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(Error::Browser)
    }
}
