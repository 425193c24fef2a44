use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunConfig {
    /// How many posts to comment on before stopping.
    pub target_count: u32,
    /// Pacing pause after each successful comment.
    pub pause_ms: u64,
    /// Settle delay between scrolling to a post and acting on it.
    pub settle_ms: u64,
    /// Consecutive-fault cap before the run gives up.
    pub max_faults: u32,
    pub cursor_file: String,
    /// Generate comments but never submit them.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_count: 20,
            pause_ms: 5000,
            settle_ms: 2000,
            max_faults: 5,
            cursor_file: "last_post_id.csv".to_string(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Bound on page-load and element waits.
    pub wait_timeout_ms: u64,
    pub window_width: u32,
    pub window_height: u32,
    /// Override the Chromium binary chromiumoxide discovers on its own.
    pub chrome_executable: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: false,
            wait_timeout_ms: 60_000,
            window_width: 1920,
            window_height: 1080,
            chrome_executable: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// A missing config file is not an error; every option has a default.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// Login credentials come from environment variables, or prompted at
    /// startup. Prompted values are saved to .env for future runs.
    pub fn linkedin_credentials() -> Result<Credentials> {
        let username = match std::env::var("LINKEDIN_USERNAME") {
            Ok(value) if !value.is_empty() => sanitize_key(&value),
            _ => {
                let value = prompt("LinkedIn email")?;
                save_env_var("LINKEDIN_USERNAME", &value);
                value
            }
        };
        let password = match std::env::var("LINKEDIN_PASSWORD") {
            Ok(value) if !value.is_empty() => value,
            _ => {
                let value = prompt("LinkedIn password")?;
                save_env_var("LINKEDIN_PASSWORD", &value);
                value
            }
        };
        Ok(Credentials { username, password })
    }

    pub fn gemini_api_key() -> Result<String> {
        match std::env::var("API_KEY") {
            Ok(key) if !key.is_empty() => Ok(sanitize_key(&key)),
            _ => {
                let key = prompt("Gemini API Key (aistudio.google.com)")?;
                save_env_var("API_KEY", &key);
                Ok(key)
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let value = input.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    Ok(value)
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

/// Append a KEY=VALUE line to .env and set it in the current process.
fn save_env_var(key: &str, value: &str) {
    std::env::set_var(key, value);
    let path = Path::new(ENV_FILE);
    let mut contents = std::fs::read_to_string(path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("{}={}\n", key, value));
    let _ = std::fs::write(path, contents);
}
