use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::{fs::{self, File}, io::AsyncWriteExt};

/// Avatar files on disk, under `<static dir>/avatars`, served from `/static/avatars/`.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    dir: PathBuf,
}

/// An upload being written next to its final place. Dropping it without
/// [`PendingAvatar::commit`] removes the partial file and leaves any earlier
/// avatar of the same name untouched.
pub struct PendingAvatar {
    file: File,
    temp_path: TempPath,
    dest: PathBuf,
    url: String,
}

impl AvatarStore {
    pub fn new(static_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: static_dir.as_ref().join("avatars"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts an upload named `file_name`. Once committed it replaces any
    /// earlier upload with the same name.
    pub async fn create(&self, file_name: &str) -> std::io::Result<PendingAvatar> {
        let name = sanitize_file_name(file_name).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unusable avatar file name {file_name:?}"),
            )
        })?;

        fs::create_dir_all(&self.dir).await?;
        let dir = self.dir.clone();
        let temp = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix(".upload-").tempfile_in(dir)
        })
        .await
        .map_err(std::io::Error::other)??;
        let (file, temp_path) = temp.into_parts();

        Ok(PendingAvatar {
            file: File::from_std(file),
            temp_path,
            dest: self.dir.join(name),
            url: format!("/static/avatars/{}", urlencoding::encode(name)),
        })
    }
}

impl PendingAvatar {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await
    }

    /// Moves the finished upload into place and returns its URL path.
    pub async fn commit(mut self) -> std::io::Result<String> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        drop(self.file);

        let (temp_path, dest) = (self.temp_path, self.dest);
        tokio::task::spawn_blocking(move || temp_path.persist(dest))
            .await
            .map_err(std::io::Error::other)??;
        Ok(self.url)
    }
}

/// Reduces a client-supplied file name to its last path component.
pub fn sanitize_file_name(file_name: &str) -> Option<&str> {
    let name = file_name.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        _ if name.contains('\0') => None,
        _ => Some(name),
    }
}
