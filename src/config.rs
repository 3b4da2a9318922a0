// Runtime configuration. The binary always runs with the shipped defaults;
// the setters exist so tests can point a migration at a fake collection.

use std::path::PathBuf;
use std::time::Duration;

/// Collection endpoint the tool uploads to.
pub const DEFAULT_BASE_URL: &str = "https://673e481ca9bc276ec4b7c8ea.mockapi.io/quiz";

/// Template file read from the working directory.
pub const DEFAULT_TEMPLATE_FILE: &str = "MOCKAPI_TEMPLATE.json";

/// Everything the migration needs to know about its surroundings. Built
/// once in `main` and handed to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub template_path: PathBuf,
    /// Pause between two create requests.
    pub create_delay: Duration,
    /// Pause after every delete request.
    pub delete_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            create_delay: Duration::from_millis(300),
            delete_delay: Duration::from_millis(200),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Replace the endpoint, dropping trailing slashes so `<base>/<id>`
    /// never doubles them up.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }
}
