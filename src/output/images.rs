use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::BackupResult;
use crate::sources::Fetcher;
use crate::text::last_path_segment;

/// Sub-folder of the save folder that holds downloaded photos.
pub const IMAGE_FOLDER: &str = "images";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// Already on disk, nothing fetched
    Cached,
    Downloaded,
    /// Download failed; the post still refers to the file
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub filename: String,
    /// Path as referenced from saved pages, e.g. `images/photo123`
    pub relative_path: String,
    pub status: ImageStatus,
}

pub struct ImageStore {
    dir: PathBuf,
    fetcher: Box<dyn Fetcher>,
}

impl ImageStore {
    pub fn new(save_folder: &Path, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            dir: save_folder.join(IMAGE_FOLDER),
            fetcher,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Make sure the image behind `url` is on disk. An existing file is
    /// trusted as-is. Fetch failures are logged and reported as
    /// [`ImageStatus::Missing`]; only local filesystem errors are returned.
    pub fn retrieve(&self, url: &str) -> BackupResult<ImageRef> {
        let filename = last_path_segment(url).to_string();
        let relative_path = format!("{}/{}", IMAGE_FOLDER, filename);
        let image = |status| ImageRef {
            filename: filename.clone(),
            relative_path: relative_path.clone(),
            status,
        };

        if filename.is_empty() || filename == "." || filename == ".." {
            warn!(url, "image URL has no usable file name, skipping download");
            return Ok(image(ImageStatus::Missing));
        }

        fs::create_dir_all(&self.dir)?;
        let local_path = self.dir.join(&filename);

        if local_path.exists() {
            debug!(path = %local_path.display(), "image already saved");
            return Ok(image(ImageStatus::Cached));
        }

        info!(url, "Downloading a photo. This may take a moment.");
        match self.fetcher.fetch(url) {
            Ok(bytes) => {
                fs::write(&local_path, bytes)?;
                Ok(image(ImageStatus::Downloaded))
            }
            Err(e) if e.is_recoverable() => {
                warn!(url, error = %e, "could not download image, continuing without it");
                Ok(image(ImageStatus::Missing))
            }
            Err(e) => {
                warn!(url, error = ?e, "unexpected error while downloading image, continuing without it");
                Ok(image(ImageStatus::Missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BackupError;
    use crate::sources::traits::MockFetcher;
    use tempfile::TempDir;

    const URL: &str = "http://media.tumblr.com/abc/photo123";

    #[test]
    fn test_downloads_once_then_uses_cache() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url: &str| url == URL)
            .times(1)
            .returning(|_| Ok(b"jpeg bytes".to_vec()));

        let store = ImageStore::new(temp_dir.path(), Box::new(fetcher));

        let first = store.retrieve(URL).unwrap();
        assert_eq!(first.status, ImageStatus::Downloaded);
        assert_eq!(first.filename, "photo123");
        assert_eq!(first.relative_path, "images/photo123");

        let second = store.retrieve(URL).unwrap();
        assert_eq!(second.status, ImageStatus::Cached);

        let saved = fs::read(temp_dir.path().join("images/photo123")).unwrap();
        assert_eq!(saved, b"jpeg bytes");
    }

    #[test]
    fn test_existing_file_skips_network() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(IMAGE_FOLDER)).unwrap();
        fs::write(temp_dir.path().join("images/photo123"), b"old").unwrap();

        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();

        let store = ImageStore::new(temp_dir.path(), Box::new(fetcher));
        let image = store.retrieve(URL).unwrap();

        assert_eq!(image.status, ImageStatus::Cached);
        assert_eq!(fs::read(temp_dir.path().join("images/photo123")).unwrap(), b"old");
    }

    #[test]
    fn test_http_failure_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(|url| {
            Err(BackupError::HttpStatus {
                status: 503,
                url: url.to_string(),
            })
        });

        let store = ImageStore::new(temp_dir.path(), Box::new(fetcher));
        let image = store.retrieve(URL).unwrap();

        assert_eq!(image.status, ImageStatus::Missing);
        assert_eq!(image.relative_path, "images/photo123");
        assert!(!temp_dir.path().join("images/photo123").exists());
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_failed_download_is_retried_next_time() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockFetcher::new();
        let mut attempts = 0;
        fetcher.expect_fetch().times(2).returning(move |url| {
            attempts += 1;
            if attempts == 1 {
                Err(BackupError::HttpStatus {
                    status: 500,
                    url: url.to_string(),
                })
            } else {
                Ok(b"png".to_vec())
            }
        });

        let store = ImageStore::new(temp_dir.path(), Box::new(fetcher));
        assert_eq!(store.retrieve(URL).unwrap().status, ImageStatus::Missing);
        assert_eq!(store.retrieve(URL).unwrap().status, ImageStatus::Downloaded);
    }

    #[test]
    fn test_url_without_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();

        let store = ImageStore::new(temp_dir.path(), Box::new(fetcher));
        let image = store.retrieve("http://media.tumblr.com/abc/").unwrap();
        assert_eq!(image.status, ImageStatus::Missing);
    }
}
