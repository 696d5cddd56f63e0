use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the conversion service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding uploads and conversion outputs (default: /tmp/convertdocs_uploads)
    pub upload_dir: PathBuf,

    /// Maximum upload size in bytes (default: 256 MB)
    pub max_file_size: usize,

    /// Seconds to wait after a response is queued before deleting its files (default: 60)
    pub cleanup_delay_secs: u64,

    /// Maximum age in seconds a file may reach before the reaper removes it (default: 3600)
    pub retention_secs: u64,

    /// Seconds between reaper sweeps (default: 1800)
    pub reaper_interval_secs: u64,

    /// Allowed CORS origins, "*" for any (default: ["*"])
    pub cors_origins: Vec<String>,

    /// Path to the pdfium shared library; system lookup when unset
    pub pdfium_library_path: Option<PathBuf>,

    /// Tesseract data directory; engine default when unset
    pub tessdata_dir: Option<PathBuf>,

    /// HTTP port (default: 8001)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("/tmp/convertdocs_uploads"),
            max_file_size: 256 * 1024 * 1024, // 256 MB
            cleanup_delay_secs: 60,
            retention_secs: 3600,
            reaper_interval_secs: 1800,
            cors_origins: vec!["*".to_string()],
            pdfium_library_path: None,
            tessdata_dir: None,
            port: 8001,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            cleanup_delay_secs: env::var("CLEANUP_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.cleanup_delay_secs),

            retention_secs: env::var("RETENTION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.retention_secs),

            reaper_interval_secs: env::var("REAPER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.reaper_interval_secs),

            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.cors_origins),

            pdfium_library_path: env::var("PDFIUM_LIB_PATH").ok().map(PathBuf::from),

            tessdata_dir: env::var("TESSDATA_DIR").ok().map(PathBuf::from),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }

    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.cleanup_delay_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cleanup_delay_secs, 60);
        assert_eq!(config.retention_secs, 3600);
        assert_eq!(config.reaper_interval_secs, 1800);
        assert_eq!(config.max_file_size, 256 * 1024 * 1024);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.port, 8001);
    }

    #[test]
    fn test_duration_accessors() {
        let config = AppConfig {
            cleanup_delay_secs: 2,
            retention_secs: 10,
            reaper_interval_secs: 5,
            ..AppConfig::default()
        };
        assert_eq!(config.cleanup_delay(), Duration::from_secs(2));
        assert_eq!(config.retention(), Duration::from_secs(10));
        assert_eq!(config.reaper_interval(), Duration::from_secs(5));
    }
}
