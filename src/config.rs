use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediBot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when MEDIBOT_LOG is not set.
pub fn default_log_filter() -> String {
    "info".to_string()
}

/// Runtime configuration, read from the environment once at startup and
/// injected into constructors. Nothing reads the environment after this
/// point, so tests can build a config by hand and substitute a fake
/// backend without touching process-wide state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Reasoning-backend credential. `None` means every analysis request
    /// is rejected with a configuration error and no backend call is made.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible chat-completions API.
    pub backend_url: String,
    /// Model name sent with every completion request.
    pub model: String,
    /// Sampling temperature for the completion request.
    pub temperature: f32,
    /// Transport timeout for one backend call. No retry is attempted.
    pub request_timeout_secs: u64,
    /// Sliding-window cap on conversation turns included in the rolling
    /// context sent to the backend.
    pub max_context_turns: usize,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Directory holding the database and uploaded media.
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            backend_url: env_or("MEDIBOT_BACKEND_URL", "https://api.openai.com/v1"),
            model: env_or("MEDIBOT_MODEL", "gpt-4"),
            temperature: 0.7,
            request_timeout_secs: env_parsed("MEDIBOT_REQUEST_TIMEOUT_SECS", 120),
            max_context_turns: env_parsed("MEDIBOT_MAX_CONTEXT_TURNS", 20),
            bind_addr: env_or("MEDIBOT_BIND", "127.0.0.1:8080"),
            data_dir: app_data_dir(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("medibot.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

#[cfg(test)]
impl AppConfig {
    /// Config for tests: no credential, data under the given directory.
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Self {
            api_key: None,
            backend_url: "http://127.0.0.1:0".to_string(),
            model: "test-model".to_string(),
            temperature: 0.0,
            request_timeout_secs: 1,
            max_context_turns: 20,
            bind_addr: "127.0.0.1:0".to_string(),
            data_dir,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get the application data directory (~/.medibot)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".medibot")
}
