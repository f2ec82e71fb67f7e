// src/services/upload_services.rs
use std::fmt::Display;
use std::path::{Path, PathBuf};

use actix_web::web::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt};
use log::{info, warn};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Public URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload stream failed: {0}")]
    Stream(String),
}

/// Writes hero images into `<public_dir>/uploads`.
#[derive(Clone)]
pub struct UploadService {
    upload_dir: PathBuf,
}

impl UploadService {
    pub fn new(public_dir: impl AsRef<Path>) -> Self {
        Self {
            upload_dir: public_dir.as_ref().join("uploads"),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Stores one uploaded file and returns its public path.
    ///
    /// Returns `Ok(None)` without touching the disk when no file was chosen,
    /// which browsers signal with an empty file name.
    pub async fn accept<S, E>(
        &self,
        original_name: Option<&str>,
        data: S,
    ) -> Result<Option<String>, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let Some(original_name) = original_name.filter(|n| !n.trim().is_empty()) else {
            return Ok(None);
        };

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let filename = generate_filename(original_name);
        let file_path = self.upload_dir.join(&filename);

        let mut data = std::pin::pin!(data);
        let mut file = tokio::fs::File::create(&file_path).await?;
        let mut written = 0usize;
        while let Some(chunk) = data.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(&file_path).await;
                    return Err(UploadError::Stream(e.to_string()));
                }
            };
            written += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!("Stored upload {} ({} bytes) as {}", original_name, written, filename);
        Ok(Some(format!("{}{}", UPLOADS_URL_PREFIX, filename)))
    }

    /// Best-effort removal of a file previously returned by [`accept`](Self::accept).
    pub async fn remove(&self, public_path: &str) {
        let Some(name) = public_path.strip_prefix(UPLOADS_URL_PREFIX) else {
            return;
        };
        let Some(name) = sanitize_filename(name) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.upload_dir.join(name)).await {
            warn!("Failed to remove upload {}: {}", public_path, e);
        }
    }

    /// Resolves a requested file name to a path inside the upload directory.
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        sanitize_filename(requested).map(|name| self.upload_dir.join(name))
    }
}

/// `<unix millis>-<random>` plus the original extension when it is plain
/// alphanumeric.
fn generate_filename(original_name: &str) -> String {
    let stem = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// Keeps only the final path component so requests cannot escape the directory.
fn sanitize_filename(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.starts_with('.'))
}

/// Content type for a stored upload, by extension.
pub fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG.to_string(),
        Some("png") => mime::IMAGE_PNG.to_string(),
        Some("gif") => mime::IMAGE_GIF.to_string(),
        Some("webp") => "image/webp".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::TempDir;

    fn chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, String>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn no_file_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let svc = UploadService::new(dir.path());

        assert_eq!(svc.accept(None, chunks(&[])).await.unwrap(), None);
        assert_eq!(svc.accept(Some(""), chunks(&[b"x"])).await.unwrap(), None);
        assert!(!svc.upload_dir().exists());
    }

    #[tokio::test]
    async fn stores_file_under_public_uploads() {
        let dir = TempDir::new().unwrap();
        let svc = UploadService::new(dir.path());

        let path = svc
            .accept(Some("Avatar.PNG"), chunks(&[b"\x89PNG", b"rest"]))
            .await
            .unwrap()
            .unwrap();

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".png"));
        let on_disk = svc.resolve(path.trim_start_matches(UPLOADS_URL_PREFIX)).unwrap();
        assert_eq!(std::fs::read(on_disk).unwrap(), b"\x89PNGrest");
    }

    #[tokio::test]
    async fn same_name_twice_gets_distinct_paths() {
        let dir = TempDir::new().unwrap();
        let svc = UploadService::new(dir.path());

        let a = svc.accept(Some("me.jpg"), chunks(&[b"a"])).await.unwrap();
        let b = svc.accept(Some("me.jpg"), chunks(&[b"b"])).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn failed_stream_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let svc = UploadService::new(dir.path());
        let failing = stream::iter(vec![
            Ok(Bytes::from_static(b"part")),
            Err("connection reset".to_string()),
        ]);

        let err = svc.accept(Some("me.jpg"), failing).await.unwrap_err();
        assert!(matches!(err, UploadError::Stream(_)));
        assert_eq!(std::fs::read_dir(svc.upload_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn remove_deletes_stored_file() {
        let dir = TempDir::new().unwrap();
        let svc = UploadService::new(dir.path());
        let path = svc.accept(Some("me.gif"), chunks(&[b"gif"])).await.unwrap().unwrap();

        svc.remove(&path).await;
        assert_eq!(std::fs::read_dir(svc.upload_dir()).unwrap().count(), 0);
    }

    #[test]
    fn extension_is_sanitized() {
        assert!(generate_filename("photo.JPEG").ends_with(".jpeg"));
        assert!(!generate_filename("noext").contains('.'));
        assert!(!generate_filename("evil.p/hp").contains('/'));
    }

    #[test]
    fn resolve_strips_directories() {
        let svc = UploadService::new("/srv/public");
        assert_eq!(
            svc.resolve("../../etc/passwd"),
            Some(PathBuf::from("/srv/public/uploads/passwd"))
        );
        assert_eq!(svc.resolve(".."), None);
        assert_eq!(svc.resolve(".hidden"), None);
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("a.svg")), "application/octet-stream");
    }
}
