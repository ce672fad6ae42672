use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which provider to use: "gcs" or "local"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub gcs: GcsConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GcsConfig {
    /// HMAC access id for the XML interoperability API
    #[serde(default)]
    pub access_id: String,
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Override for emulators; production default is storage.googleapis.com
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_local_path")]
    pub base_path: String,
    /// Base URL prepended to object keys when composing public URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Object key prefix for uploaded photos
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Upload size ceiling in bytes
    #[serde(default = "default_max_size")]
    pub max_size_bytes: u64,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_backend() -> String {
    "gcs".to_string()
}

fn default_bucket() -> String {
    "bucket-armalino-photo".to_string()
}

fn default_endpoint() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_local_path() -> String {
    "data/uploads".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:3000/uploads".to_string()
}

fn default_key_prefix() -> String {
    "wedding-photos".to_string()
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self {
            access_id: String::new(),
            secret: String::new(),
            bucket: default_bucket(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            gcs: GcsConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_path: default_local_path(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            max_size_bytes: default_max_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.ensure_directories()?;
        Ok(config)
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: PD_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(val) = env::var("PD_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("PD_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        // Storage overrides
        if let Ok(val) = env::var("PD_CONF_STORAGE_BACKEND") {
            self.storage.backend = val;
        }
        if let Ok(val) = env::var("PD_CONF_GCS_ACCESS_ID") {
            self.storage.gcs.access_id = val;
        }
        if let Ok(val) = env::var("PD_CONF_GCS_SECRET") {
            self.storage.gcs.secret = val;
        }
        if let Ok(val) = env::var("PD_CONF_GCS_BUCKET") {
            self.storage.gcs.bucket = val;
        }
        if let Ok(val) = env::var("PD_CONF_GCS_ENDPOINT") {
            if !val.trim().is_empty() {
                self.storage.gcs.endpoint = val;
            }
        }
        if let Ok(val) = env::var("PD_CONF_LOCAL_BASE_PATH") {
            self.storage.local.base_path = val;
        }
        if let Ok(val) = env::var("PD_CONF_LOCAL_PUBLIC_BASE_URL") {
            self.storage.local.public_base_url = val;
        }

        // Upload overrides
        if let Ok(val) = env::var("PD_CONF_UPLOAD_KEY_PREFIX") {
            self.upload.key_prefix = val;
        }
        if let Ok(val) = env::var("PD_CONF_UPLOAD_MAX_SIZE") {
            if let Ok(bytes) = val.parse() {
                self.upload.max_size_bytes = bytes;
            }
        }
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if self.storage.backend == "local" {
            fs::create_dir_all(&self.storage.local.base_path)?;
        }
        Ok(())
    }
}
