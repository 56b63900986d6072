use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::network::ClientOptions;
use crate::network::url::websocket_url;
use crate::ui::RenderStrategy;

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";

/// Overrides `page_url` from the config file.
pub const PAGE_URL_ENV: &str = "CHAT_PAGE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// URL of the chat page. Only its scheme and host are used.
    pub page_url: String,
    pub reconnect_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub render: RenderStrategy,
    /// Stamp outgoing messages with the local time.
    pub include_time: bool,
    /// Empty the chat area on every new connection attempt.
    pub clear_on_reconnect: bool,
    /// Prefill for the username field.
    pub username: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_url: "http://127.0.0.1:8080".to_string(),
            reconnect_delay_ms: 1000,
            connect_timeout_ms: 10_000,
            render: RenderStrategy::Table,
            include_time: true,
            clear_on_reconnect: true,
            username: None,
        }
    }
}

impl AppConfig {
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(page_url) = lookup(PAGE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            log::info!("Using page URL {page_url} from {PAGE_URL_ENV}");
            self.page_url = page_url;
        }
    }

    /// Resolve the socket URL. Fails on a page URL that cannot be connected to.
    pub fn client_options(&self) -> Result<ClientOptions, ClientError> {
        Ok(ClientOptions {
            url: websocket_url(&self.page_url)?,
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        })
    }
}

/// Read the config at `path`, falling back to [`AppConfig::default`] when it is
/// missing or unreadable. A bad file never stops the client from starting.
pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let config = AppConfig::default();
            log::info!(
                "No config at {}; connecting to default page {}",
                path.display(),
                config.page_url
            );
            return config;
        }
        Err(err) => {
            let config = AppConfig::default();
            log::warn!(
                "Cannot read config {} ({err}); connecting to default page {}",
                path.display(),
                config.page_url
            );
            return config;
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|err| {
        let config = AppConfig::default();
        log::warn!(
            "Invalid chat config {} ({err}); connecting to default page {}",
            path.display(),
            config.page_url
        );
        config
    })
}

/// Write `config` as pretty JSON, creating parent directories as needed.
pub fn save_config(path: &str, config: &AppConfig) -> io::Result<()> {
    let path = Path::new(path);
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    fs::write(path, json)?;
    log::debug!("Saved chat config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(&temp_path(&dir, "nope.json")), AppConfig::default());
    }

    #[test]
    fn broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "chat.json");
        fs::write(&path, "{ not json").unwrap();

        testing_logger::setup();
        assert_eq!(load_config(&path), AppConfig::default());
        testing_logger::validate(|logs| {
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].level, log::Level::Warn);
            assert!(logs[0].body.contains("http://127.0.0.1:8080"));
        });
    }

    #[test]
    fn unreadable_path_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "chat.json");
        fs::create_dir(&path).unwrap();

        testing_logger::setup();
        assert_eq!(load_config(&path), AppConfig::default());
        testing_logger::validate(|logs| {
            assert!(logs.iter().any(|entry| entry.level == log::Level::Warn));
        });
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "chat.json");
        fs::write(
            &path,
            r#"{"page_url":"https://chat.example.com","render":"paragraph"}"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.page_url, "https://chat.example.com");
        assert_eq!(config.render, RenderStrategy::Paragraph);
        assert_eq!(config.reconnect_delay_ms, 1000);
        assert!(config.include_time);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir, "nested/dir/chat.json");
        let config = AppConfig {
            username: Some("bob".to_string()),
            include_time: false,
            ..AppConfig::default()
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path), config);
    }

    #[test]
    fn env_overrides_page_url() {
        let mut config = AppConfig::default();
        config.apply_env_with(|key| {
            (key == PAGE_URL_ENV).then(|| "https://chat.example.com".to_string())
        });
        assert_eq!(config.page_url, "https://chat.example.com");

        config.apply_env_with(|_| Some("  ".to_string()));
        assert_eq!(config.page_url, "https://chat.example.com");
    }

    #[test]
    fn client_options_resolve_socket_url() {
        let options = AppConfig::default().client_options().unwrap();
        assert_eq!(options.url, "ws://127.0.0.1:8080/websocket");
        assert_eq!(options.reconnect_delay, Duration::from_secs(1));
    }

    #[test]
    fn bad_page_url_fails_fast() {
        let config = AppConfig {
            page_url: "gopher://example.com".to_string(),
            ..AppConfig::default()
        };
        assert!(config.client_options().is_err());
    }
}
