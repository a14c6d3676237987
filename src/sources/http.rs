use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::errors::{BackupError, BackupResult};
use crate::sources::traits::Fetcher;

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// `None` means requests never time out.
    pub fn new(timeout: Option<Duration>) -> BackupResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("tumblr-backup/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> BackupResult<Vec<u8>> {
        debug!(url, "GET");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackupError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}
