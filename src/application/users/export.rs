//! Flat-file export of a single user record.
//!
//! Each export is one line, `firstName,lastName,oib,STATUS_LABEL`, written
//! to `<oib>_<yyyyMMddHHmmss>.txt` inside the export directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::domain::{User, UserStatus};

/// Timestamp pattern embedded in export file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid status code: {0}")]
    InvalidStatus(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the export file name for a user at the given instant.
pub fn export_file_name(oib: &str, at: NaiveDateTime) -> String {
    format!("{}_{}.txt", oib, at.format(TIMESTAMP_FORMAT))
}

/// Format the export line for a user.
pub fn export_line(user: &User) -> Result<String, ExportError> {
    let status = UserStatus::from_code(&user.status)
        .ok_or_else(|| ExportError::InvalidStatus(user.status.clone()))?;

    Ok(format!(
        "{},{},{},{}",
        user.first_name,
        user.last_name,
        user.oib,
        status.label()
    ))
}

/// Writes export files into a fixed directory.
#[derive(Debug, Clone)]
pub struct FileExporter {
    directory: PathBuf,
}

impl FileExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write the export file for `user` and return its file name.
    ///
    /// The file is created exclusively: a second export for the same OIB
    /// within the same second fails with `AlreadyExists` instead of
    /// overwriting the first one. A file whose write fails is removed again.
    pub async fn write(&self, user: &User, at: NaiveDateTime) -> Result<String, ExportError> {
        let line = export_line(user)?;
        let file_name = export_file_name(&user.oib, at);
        let path = self.directory.join(&file_name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_remove(file, &path, &line).await?;

        Ok(file_name)
    }
}

/// Write `line` through `out`, deleting `path` if the write does not complete.
async fn write_or_remove<W>(mut out: W, path: &Path, line: &str) -> Result<(), ExportError>
where
    W: AsyncWrite + Unpin,
{
    let result = async {
        out.write_all(line.as_bytes()).await?;
        out.flush().await
    }
    .await;

    if let Err(e) = result {
        drop(out);
        if let Err(rm) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %rm, "Failed to remove partial export file");
        }
        return Err(ExportError::Io(e));
    }
    Ok(())
}

impl Default for FileExporter {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap()
    }

    fn sample_user() -> User {
        User::new("Darko", "Kozul", "17748241351", "0")
    }

    #[test]
    fn file_name_embeds_oib_and_timestamp() {
        assert_eq!(
            export_file_name("17748241351", at()),
            "17748241351_20240307090542.txt"
        );
    }

    #[test]
    fn line_uses_status_label() {
        assert_eq!(
            export_line(&sample_user()).unwrap(),
            "Darko,Kozul,17748241351,INACTIVE"
        );

        let mut active = sample_user();
        active.status = "1".into();
        assert_eq!(export_line(&active).unwrap(), "Darko,Kozul,17748241351,ACTIVE");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut user = sample_user();
        user.status = "7".into();
        let err = export_line(&user).unwrap_err();
        assert!(matches!(err, ExportError::InvalidStatus(ref s) if s == "7"));
        assert_eq!(err.to_string(), "Invalid status code: 7");
    }

    #[tokio::test]
    async fn write_creates_single_line_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());

        let name = exporter.write(&sample_user(), at()).await.unwrap();
        assert_eq!(name, "17748241351_20240307090542.txt");

        let content = std::fs::read_to_string(dir.path().join(&name)).unwrap();
        assert_eq!(content, "Darko,Kozul,17748241351,INACTIVE");
    }

    #[tokio::test]
    async fn same_second_export_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());

        exporter.write(&sample_user(), at()).await.unwrap();
        let err = exporter.write(&sample_user(), at()).await.unwrap_err();
        match err {
            ExportError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::AlreadyExists),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path().join("does-not-exist"));

        let err = exporter.write(&sample_user(), at()).await.unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    struct BrokenDisk;

    impl AsyncWrite for BrokenDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no space left on device",
            )))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_removes_the_file_so_a_retry_can_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let name = export_file_name("17748241351", at());
        let path = dir.path().join(&name);
        std::fs::write(&path, "Darko,Ko").unwrap();

        let err = write_or_remove(BrokenDisk, &path, "Darko,Kozul,17748241351,INACTIVE")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(!path.exists());

        let exporter = FileExporter::new(dir.path());
        assert_eq!(exporter.write(&sample_user(), at()).await.unwrap(), name);
    }

    #[tokio::test]
    async fn invalid_status_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        let mut user = sample_user();
        user.status = "X".into();

        assert!(exporter.write(&user, at()).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
