use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding uploaded images (the Image Store)
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Directory holding generated PDFs (the PDF Store)
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: PathBuf,

    /// Maximum accepted upload body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("public/images")
}

fn default_pdf_dir() -> PathBuf {
    PathBuf::from("public/pdf")
}

const fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            pdf_dir: default_pdf_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}")))
    }

    /// Load from default locations (~/.config/imgbook/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("imgbook").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.image_dir, PathBuf::from("public/images"));
        assert_eq!(config.pdf_dir, PathBuf::from("public/pdf"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "image_dir = \"/tmp/uploads\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.image_dir, PathBuf::from("/tmp/uploads"));
        // Unset fields fall back to defaults
        assert_eq!(config.pdf_dir, PathBuf::from("public/pdf"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = AppConfig::from_file("/nonexistent/config.toml");
        assert!(result.is_err());
    }
}
