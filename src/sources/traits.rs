use crate::errors::BackupResult;

#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// GET `url` and return the whole body. Non-success statuses are errors.
    fn fetch(&self, url: &str) -> BackupResult<Vec<u8>>;
}
