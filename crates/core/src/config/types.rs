use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("biocatalog.db")
}

/// Catalog semantics configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Source label of in-house entries. Compared case-insensitively.
    #[serde(default = "default_house_source")]
    pub house_source: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            house_source: default_house_source(),
        }
    }
}

/// Default house source label.
pub const DEFAULT_HOUSE_SOURCE: &str = "Biofrench";

fn default_house_source() -> String {
    DEFAULT_HOUSE_SOURCE.to_string()
}

/// Image asset configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Directory holding `{external_id}-{slot}.{ext}` files.
    #[serde(default = "default_images_dir")]
    pub dir: PathBuf,
    /// Extensions probed in order (vector first, then raster).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Number of image slots shown in the detail gallery.
    #[serde(default = "default_gallery_slots")]
    pub gallery_slots: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: default_images_dir(),
            extensions: default_extensions(),
            gallery_slots: default_gallery_slots(),
        }
    }
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_extensions() -> Vec<String> {
    ["svg", "png", "jpg", "jpeg"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_gallery_slots() -> u8 {
    3
}

/// Background command queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandsConfig {
    /// Capacity of the command channel (submitters wait when full)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    64
}

/// Bulk import configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Directory the admin import endpoint reads files from.
    #[serde(default = "default_import_dir")]
    pub dir: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            dir: default_import_dir(),
        }
    }
}

fn default_import_dir() -> PathBuf {
    PathBuf::from("imports")
}

/// Config for API responses (filesystem layout redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub images: SanitizedImagesConfig,
    pub commands: CommandsConfig,
}

/// Image settings without the on-disk directory
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedImagesConfig {
    pub extensions: Vec<String>,
    pub gallery_slots: u8,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: config.catalog.clone(),
            images: SanitizedImagesConfig {
                extensions: config.images.extensions.clone(),
                gallery_slots: config.images.gallery_slots,
            },
            commands: config.commands.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "biocatalog.db");
        assert_eq!(config.catalog.house_source, "Biofrench");
        assert_eq!(config.images.extensions, vec!["svg", "png", "jpg", "jpeg"]);
        assert_eq!(config.images.gallery_slots, 3);
        assert_eq!(config.commands.buffer_size, 64);
        assert_eq!(config.import.dir.to_str().unwrap(), "imports");
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_custom_house_and_images() {
        let toml = r#"
[catalog]
house_source = "Acme Labs"

[images]
dir = "/srv/assets/images"
extensions = ["webp", "png"]
gallery_slots = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.house_source, "Acme Labs");
        assert_eq!(config.images.dir.to_str().unwrap(), "/srv/assets/images");
        assert_eq!(config.images.extensions, vec!["webp", "png"]);
        assert_eq!(config.images.gallery_slots, 5);
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/catalog.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/catalog.sqlite");
    }

    #[test]
    fn test_deserialize_import_dir() {
        let toml = r#"
[import]
dir = "/srv/catalog/imports"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.import.dir.to_str().unwrap(), "/srv/catalog/imports");
    }

    #[test]
    fn test_deserialize_wrong_type_fails() {
        let toml = r#"
[server]
port = "not a port"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_paths() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.server.port, 8080);
        assert_eq!(sanitized.catalog.house_source, "Biofrench");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("biocatalog.db"));
        assert!(!json.contains("\"dir\""));
        assert!(!json.contains("imports"));
        assert!(json.contains("gallery_slots"));
    }
}
