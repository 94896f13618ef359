use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use chrono::Utc;
use rand::Rng;
use tokio::fs;
use tracing::{info, warn};

use crate::errors::ServiceError;

/// Multipart field name; also the prefix of every stored filename.
pub const UPLOAD_FIELD: &str = "image";
/// URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Result of a successful upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub image_url: String,
}

/// 图片上传目录
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    /// Use `dir` for uploads, creating it when absent.
    pub async fn new<P: Into<PathBuf>>(dir: P, max_bytes: usize) -> Result<Self, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot create {}: {}", dir.display(), e)))?;
        Ok(Self { dir, max_bytes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Only `image/*` content types are accepted.
    pub fn ensure_image(content_type: Option<&str>) -> Result<(), ServiceError> {
        match content_type {
            Some(mime) if mime.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
            _ => Err(ServiceError::Validation("only image files are allowed".into())),
        }
    }

    pub fn ensure_within_limit(&self, len: usize) -> Result<(), ServiceError> {
        if len > self.max_bytes {
            return Err(ServiceError::Validation(format!(
                "file exceeds the {} byte upload limit",
                self.max_bytes
            )));
        }
        Ok(())
    }

    /// Validate and write one image, returning its generated name and public URL.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<StoredUpload, ServiceError> {
        Self::ensure_image(content_type)?;
        self.ensure_within_limit(data.len())?;

        let filename = generate_filename(original_name.unwrap_or_default());
        let path = self.dir.join(&filename);
        fs::write(&path, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot write {}: {}", path.display(), e)))?;

        info!(%filename, bytes = data.len(), "upload stored");
        Ok(StoredUpload { image_url: public_url(&filename), filename })
    }

    /// Remove a previously stored file. Names that are not a single plain
    /// path component are rejected before touching the filesystem.
    pub async fn delete(&self, filename: &str) -> Result<(), ServiceError> {
        let path = self.resolve(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(%filename, "upload deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ServiceError::not_found("file")),
            Err(e) => {
                warn!(%filename, error = %e, "cannot delete upload");
                Err(ServiceError::Storage(e.to_string()))
            }
        }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, ServiceError> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.dir.join(name)),
            _ => Err(ServiceError::Validation(format!("invalid file name: {filename:?}"))),
        }
    }
}

/// `image-<unix millis>-<random below 1e9><.ext>`
pub fn generate_filename(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}-{}{}", UPLOAD_FIELD, Utc::now().timestamp_millis(), suffix, extension_of(original_name))
}

/// Extension of `name` including the dot, restricted to ASCII alphanumerics.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

pub fn public_url(filename: &str) -> String {
    format!("{PUBLIC_PREFIX}/{filename}")
}
