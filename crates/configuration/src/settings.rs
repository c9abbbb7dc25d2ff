use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub images: ImageSettings,
}

/// Where the HTTP API listens and how large a request body may be.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on a whole multipart body. The image ceiling is enforced
    /// separately, this only has to leave room for it.
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            body_limit_bytes: 12 * 1024 * 1024,
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    /// Process-local storage, lost on exit.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    /// Falls back to the `DATABASE_URL` environment variable when unset.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Postgres,
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ImageBackend {
    /// Upload to a Cloudinary-compatible asset host.
    Cloudinary,
    /// Write files below a local directory served at `/uploads`.
    #[default]
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub backend: ImageBackend,
    /// The one size ceiling the server enforces on uploaded images.
    pub max_bytes: u64,
    pub cloudinary: CloudinarySettings,
    pub local: LocalSettings,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            backend: ImageBackend::Local,
            max_bytes: 5_000_000,
            cloudinary: CloudinarySettings::default(),
            local: LocalSettings::default(),
        }
    }
}

/// Credentials and upload options for the remote asset host.
///
/// Empty credentials are filled from `CLOUDINARY_CLOUD_NAME`,
/// `CLOUDINARY_API_KEY` and `CLOUDINARY_API_SECRET`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudinarySettings {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub base_url: String,
}

impl Default for CloudinarySettings {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: "school-management/schools".to_string(),
            base_url: "https://api.cloudinary.com".to_string(),
        }
    }
}

impl CloudinarySettings {
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    fn fill_from_env(&mut self) {
        let fill = |slot: &mut String, var: &str| {
            if slot.is_empty() {
                if let Ok(value) = std::env::var(var) {
                    *slot = value;
                }
            }
        };
        fill(&mut self.cloud_name, "CLOUDINARY_CLOUD_NAME");
        fill(&mut self.api_key, "CLOUDINARY_API_KEY");
        fill(&mut self.api_secret, "CLOUDINARY_API_SECRET");
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    /// Directory the files are written to.
    pub directory: PathBuf,
    /// URL path prefix the stored files are reachable under.
    pub public_prefix: String,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("public/uploads"),
            public_prefix: "/uploads".to_string(),
        }
    }
}

impl Settings {
    /// Resolves secrets from the environment and checks cross-field rules.
    pub fn finalize(mut self) -> Result<Self, ConfigError> {
        if self.database.url.is_none() {
            self.database.url = std::env::var("DATABASE_URL").ok();
        }
        self.images.cloudinary.fill_from_env();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "images.max_bytes must be greater than zero".to_string(),
            ));
        }
        if self.server.body_limit_bytes as u64 <= self.images.max_bytes {
            return Err(ConfigError::ValidationError(format!(
                "server.body_limit_bytes ({}) must exceed images.max_bytes ({})",
                self.server.body_limit_bytes, self.images.max_bytes
            )));
        }
        if self.images.backend == ImageBackend::Cloudinary && !self.images.cloudinary.is_configured() {
            return Err(ConfigError::ValidationError(
                "the cloudinary image backend needs cloud_name, api_key and api_secret".to_string(),
            ));
        }
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::ValidationError(
                "DATABASE_URL must be set for the postgres backend".to_string(),
            ));
        }
        if !self.images.local.public_prefix.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "images.local.public_prefix must start with '/'".to_string(),
            ));
        }
        Ok(())
    }
}
