use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::config::LogoStorageConfig;
use super::AppError;

const LOGOS_SUBDIR: &str = "logos";

/// Filesystem-backed storage for the company logo. References handed out by
/// `store` are relative paths under the storage root and are what gets
/// persisted in `company_settings.logo_path`.
pub struct LogoStorage {
    root_dir: PathBuf,
    public_base_url: String,
}

impl LogoStorage {
    pub fn new(config: &LogoStorageConfig) -> Self {
        Self {
            root_dir: PathBuf::from(&config.root_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self, original_filename: &str, bytes: &[u8]) -> Result<String, AppError> {
        let logos_dir = self.root_dir.join(LOGOS_SUBDIR);
        fs::create_dir_all(&logos_dir).map_err(|e| {
            tracing::error!("Failed to create logo directory {:?}: {:?}", logos_dir, e);
            AppError::storage_error("Failed to prepare logo storage directory")
        })?;

        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("png");
        let reference = format!(
            "{}/{}_{}.{}",
            LOGOS_SUBDIR,
            Uuid::new_v4(),
            chrono::Utc::now().timestamp(),
            extension
        );

        let target = self.root_dir.join(&reference);
        let mut file = fs::File::create(&target).map_err(|e| {
            tracing::error!("Failed to create logo file {:?}: {:?}", target, e);
            AppError::storage_error("Failed to store logo")
        })?;
        file.write_all(bytes).map_err(|e| {
            tracing::error!("Failed to write logo file {:?}: {:?}", target, e);
            let _ = fs::remove_file(&target);
            AppError::storage_error("Failed to store logo")
        })?;

        Ok(reference)
    }

    pub fn exists(&self, reference: &str) -> bool {
        self.root_dir.join(reference).is_file()
    }

    /// Best-effort removal. Failure is logged and reported as `false`;
    /// callers replacing or clearing a logo must not abort on it.
    pub fn delete(&self, reference: &str) -> bool {
        let target = self.root_dir.join(reference);
        match fs::remove_file(&target) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to delete stored logo {}: {:?}", reference, e);
                false
            }
        }
    }

    pub fn url_for(&self, reference: &str) -> String {
        format!("{}/{}", self.public_base_url, reference)
    }
}
