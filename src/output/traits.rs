use crate::domain::Post;
use crate::errors::BackupResult;

#[cfg_attr(test, mockall::automock)]
pub trait OutputSink {
    /// Write exactly one output unit for `post`.
    fn write_post(&mut self, post: &Post) -> BackupResult<()>;
}
