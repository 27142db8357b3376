use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }

/// Where the user and post collections live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_posts_file")]
    pub posts_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), users_file: default_users_file(), posts_file: default_posts_file() }
    }
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_users_file() -> String { "users.json".into() }
fn default_posts_file() -> String { "posts.json".into() }

/// Optional moderator account created at startup when absent.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub bootstrap_moderator_username: Option<String>,
    #[serde(default)]
    pub bootstrap_moderator_password: Option<String>,
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults; env vars override either.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    /// Only a missing file falls back to defaults. Unreadable or malformed
    /// files are errors.
    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).with_context(|| format!("invalid config file {path}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => return Err(anyhow::Error::new(e).context(format!("cannot read config file {path}"))),
        };
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(name) = std::env::var("BOOTSTRAP_MODERATOR_USERNAME") {
            self.auth.bootstrap_moderator_username = Some(name);
        }
        if let Ok(pw) = std::env::var("BOOTSTRAP_MODERATOR_PASSWORD") {
            self.auth.bootstrap_moderator_password = Some(pw);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.auth.normalize_and_validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.users_file.trim().is_empty() || self.posts_file.trim().is_empty() {
            return Err(anyhow!("storage.users_file and storage.posts_file must not be empty"));
        }
        if self.users_file == self.posts_file {
            return Err(anyhow!("users and posts cannot share one file"));
        }
        Ok(())
    }

    pub fn users_path(&self) -> PathBuf { self.data_dir.join(&self.users_file) }

    pub fn posts_path(&self) -> PathBuf { self.data_dir.join(&self.posts_file) }
}

impl AuthConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        if self.bootstrap_moderator_username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.bootstrap_moderator_username = None;
        }
        if self.bootstrap_moderator_username.is_some()
            && self.bootstrap_moderator_password.as_deref().map_or(true, |p| p.is_empty())
        {
            return Err(anyhow!("auth.bootstrap_moderator_password is required when a bootstrap username is set"));
        }
        Ok(())
    }

    /// `(username, password)` when a bootstrap moderator is configured.
    pub fn bootstrap_moderator(&self) -> Option<(&str, &str)> {
        match (&self.bootstrap_moderator_username, &self.bootstrap_moderator_password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.storage.users_path(), PathBuf::from("data").join("users.json"));
        assert!(cfg.auth.bootstrap_moderator().is_none());
        Ok(())
    }

    #[test]
    fn full_file_parses() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 0

            [storage]
            data_dir = "/var/lib/blog"
            posts_file = "articles.json"

            [auth]
            bootstrap_moderator_username = "admin"
            bootstrap_moderator_password = "s3cret"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.posts_path(), PathBuf::from("/var/lib/blog/articles.json"));
        assert_eq!(cfg.auth.bootstrap_moderator(), Some(("admin", "s3cret")));
        Ok(())
    }

    #[test]
    fn bootstrap_without_password_rejected() -> Result<()> {
        let mut cfg = parse("[auth]\nbootstrap_moderator_username = \"admin\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn port_zero_and_shared_file_rejected() -> Result<()> {
        let mut cfg = parse("[server]\nhost = \"h\"\nport = 0\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        let mut cfg = parse("[storage]\nusers_file = \"x.json\"\nposts_file = \"x.json\"\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    fn write_temp(name: &str, content: &str) -> Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("blog-configs-{}-{name}", std::process::id()));
        std::fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn partial_server_section_keeps_file_values() -> Result<()> {
        let path = write_temp("partial.toml", "[server]\nport = 9000\n\n[storage]\ndata_dir = \"/srv/blog\"\n")?;
        let cfg = AppConfig::load_and_validate_from(&path.to_string_lossy());
        std::fs::remove_file(&path)?;
        let cfg = cfg?;
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.storage.data_dir, PathBuf::from("/srv/blog"));
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() -> Result<()> {
        let path = write_temp("broken.toml", "[server\nport = \"nine\"\n")?;
        let res = AppConfig::load_and_validate_from(&path.to_string_lossy());
        std::fs::remove_file(&path)?;
        assert!(res.is_err());
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let path = std::env::temp_dir().join(format!("blog-configs-{}-absent.toml", std::process::id()));
        let cfg = AppConfig::load_and_validate_from(&path.to_string_lossy())?;
        assert_eq!(cfg.storage.users_file, "users.json");
        Ok(())
    }
}
