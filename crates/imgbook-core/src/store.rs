//! Filesystem stores for uploaded images and generated PDFs.
//!
//! Both stores are plain, unsynchronized directories. Filenames are
//! server-generated from a field name and a millisecond stamp, so the only
//! names that should ever reach these APIs are ones the stores handed out.
//! Anything containing a path separator is rejected as a stale reference
//! rather than resolved.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::util::unique_millis;

/// File extensions accepted for upload, matched case-sensitively against the
/// original filename.
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".png", ".jpg"];

/// Validate an uploaded file's original filename against the allow-list.
///
/// Matching is case-sensitive: `photo.JPG` is rejected.
pub fn validate_extension(original_name: &str) -> Result<()> {
    if ALLOWED_EXTENSIONS.iter().any(|ext| original_name.ends_with(ext)) {
        Ok(())
    } else {
        Err(Error::UnsupportedExtension(original_name.to_string()))
    }
}

/// Map a declared MIME type to the stored file extension.
///
/// `image/jpeg` normalizes to `jpg` so stored names stay within the same
/// extension set the upload allow-list accepts.
pub fn extension_for_mime(mime: &str) -> Result<&'static str> {
    match mime {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        other => Err(Error::UnsupportedMimeType(other.to_string())),
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Outcome of deleting a batch of files: every name lands in exactly one of
/// the two lists.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// Convert into a result, erroring if any deletion failed.
    pub fn into_result(self) -> Result<Vec<String>> {
        let total = self.deleted.len() + self.failed.len();
        if self.failed.is_empty() {
            Ok(self.deleted)
        } else {
            Err(Error::DeleteBatch {
                failed: self.failed.len(),
                total,
            })
        }
    }
}

/// Directory holding uploaded image files.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Open the store, creating the directory (and parents) if absent.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| Error::StoreCreate {
            dir: dir.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a stored filename to its on-disk path.
    ///
    /// Names with path components are treated as stale references; they can
    /// never have been produced by [`Self::save`].
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if is_plain_name(name) {
            Ok(self.dir.join(name))
        } else {
            Err(Error::StaleReference(name.to_string()))
        }
    }

    /// Persist one uploaded file under a generated name.
    ///
    /// The name is `{field}-{unixMillis}.{ext}`; callers resolve `ext` ahead
    /// of time with [`extension_for_mime`] so that validation finishes
    /// before anything touches the disk. The stamp is strictly monotonic, so
    /// two files saved in the same millisecond still get distinct names.
    pub async fn save(&self, field_name: &str, ext: &str, data: &[u8]) -> Result<String> {
        let name = format!("{field_name}-{}.{ext}", unique_millis());
        let path = self.dir.join(&name);
        tokio::fs::write(&path, data).await?;
        debug!("Stored {} ({} bytes)", name, data.len());
        Ok(name)
    }

    /// Read a stored image back, failing with a stale-reference error when
    /// the file is gone.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::StaleReference(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a batch of files, issuing all removals together and tracking
    /// each outcome individually.
    ///
    /// A name that is already gone counts as a failure: the session claimed
    /// it existed. Failures are logged here; the caller decides whether a
    /// partial outcome is fatal.
    pub async fn delete_all(&self, names: &[String]) -> DeleteReport {
        let deletions = names.iter().map(|name| async move {
            let outcome = match self.resolve(name) {
                Ok(path) => tokio::fs::remove_file(path).await.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            (name.clone(), outcome)
        });

        let mut report = DeleteReport::default();
        for (name, outcome) in join_all(deletions).await {
            match outcome {
                Ok(()) => report.deleted.push(name),
                Err(reason) => {
                    warn!("Failed to delete {}: {}", name, reason);
                    report.failed.push((name, reason));
                }
            }
        }
        report
    }
}

/// Directory holding generated PDF documents.
#[derive(Debug, Clone)]
pub struct PdfStore {
    dir: PathBuf,
}

impl PdfStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write PDF bytes under a fresh `pdf-{unixMillis}.pdf` name, creating
    /// the directory on demand.
    ///
    /// Returns the generated filename. Generated PDFs are never deleted by
    /// this crate.
    pub async fn write(&self, data: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::StoreCreate {
                dir: self.dir.clone(),
                reason: e.to_string(),
            })?;

        let name = format!("pdf-{}.pdf", unique_millis());
        tokio::fs::write(self.dir.join(&name), data).await?;
        debug!("Wrote {} ({} bytes)", name, data.len());
        Ok(name)
    }
}
