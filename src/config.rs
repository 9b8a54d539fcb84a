use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Overrides the location of the configuration file.
pub const CONFIG_ENV: &str = "CAMPAIGN_UPLOADER_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "campaign_uploader.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to write default config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid server_url {url:?}: {reason}")]
    ServerUrl { url: String, reason: String },
}

/// Configuration loaded from `campaign_uploader.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Origin of the campaign backend; upload paths are resolved against it.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Where downloaded archives are saved.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Directory for the daily log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Request timeout in seconds. Unset means the HTTP client's default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Open the download folder once an archive has been saved.
    #[serde(default)]
    pub open_download_folder: bool,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("downloads"))
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            download_dir: default_download_dir(),
            log_dir: default_log_dir(),
            request_timeout_secs: None,
            open_download_folder: false,
        }
    }
}

impl UploaderConfig {
    /// Parsed backend origin. Must be an `http`/`https` URL that upload
    /// paths can be joined onto.
    pub fn server_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::ServerUrl {
            url: self.server_url.clone(),
            reason,
        };

        let url = Url::parse(&self.server_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "expected an http or https origin, got scheme {:?}",
                url.scheme()
            )));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load configuration from `path`, writing a default file if none exists.
pub fn load_or_init(path: &Path) -> Result<UploaderConfig, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        let default_cfg = UploaderConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, toml).map_err(io_err)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).map_err(io_err)?;
    let cfg: UploaderConfig = toml::from_str(&data)?;
    cfg.server_url()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = UploaderConfig::default();
        assert_eq!(cfg.server_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
        assert!(cfg.request_timeout().is_none());
        assert!(!cfg.open_download_folder);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: UploaderConfig = toml::from_str(
            r#"
            server_url = "https://campaign.clinic.example"
            request_timeout_secs = 90
        "#,
        )
        .unwrap();
        assert_eq!(cfg.server_url, "https://campaign.clinic.example");
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(90)));
        assert_eq!(cfg.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn load_or_init_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("campaign_uploader.toml");

        let cfg = load_or_init(&path).unwrap();
        assert!(path.exists());

        let reloaded = load_or_init(&path).unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[test]
    fn load_or_init_rejects_bad_server_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_uploader.toml");
        fs::write(&path, "server_url = \"not a url\"\n").unwrap();

        let err = load_or_init(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ServerUrl { .. }));
    }

    #[test]
    fn load_or_init_rejects_server_url_without_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_uploader.toml");
        fs::write(&path, "server_url = \"localhost:8000\"\n").unwrap();

        let err = load_or_init(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ServerUrl { .. }));
    }

    #[test]
    fn server_url_must_be_http() {
        for bad in ["mailto:a@b", "ftp://files.clinic.example"] {
            let cfg = UploaderConfig {
                server_url: bad.to_string(),
                ..UploaderConfig::default()
            };
            assert!(
                matches!(cfg.server_url(), Err(ConfigError::ServerUrl { .. })),
                "{bad} should be rejected"
            );
        }

        let cfg = UploaderConfig {
            server_url: "https://campaign.clinic.example".to_string(),
            ..UploaderConfig::default()
        };
        assert_eq!(
            cfg.server_url().unwrap().join("/upload").unwrap().as_str(),
            "https://campaign.clinic.example/upload"
        );
    }

    #[test]
    fn load_or_init_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_uploader.toml");
        fs::write(&path, "request_timeout_secs = \"soon\"\n").unwrap();

        assert!(matches!(
            load_or_init(&path).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
