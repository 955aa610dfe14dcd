use crate::constants::DEFAULT_SAMPLES_DIR;
use std::path::{Path, PathBuf};

/// Browser engine driven by the web-automation server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Parameters that shape the tool-server command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub samples_dir: PathBuf,
    pub headless: bool,
    pub browser: Browser,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            samples_dir: absolutize(Path::new(DEFAULT_SAMPLES_DIR)),
            headless: true,
            browser: Browser::default(),
        }
    }
}

impl LaunchOptions {
    /// Use a user-supplied samples directory. `~` and `$VARS` are expanded and
    /// relative paths are anchored at the working directory, since the
    /// filesystem server runs with its own notion of cwd.
    pub fn with_samples_dir(mut self, raw: &str) -> Self {
        let expanded = shellexpand::full(raw)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        self.samples_dir = absolutize(Path::new(&expanded));
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_browser(mut self, browser: Browser) -> Self {
        self.browser = browser;
        self
    }
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
