use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::cli::Cli;
use crate::errors::{BackupError, BackupResult};
use crate::output::OutputMode;
use crate::text::OutputEncoding;

/// Domain the blogs live under unless `TUMBLR_API_HOST` says otherwise.
pub const DEFAULT_API_HOST: &str = "tumblr.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub account: String,
    pub mode: OutputMode,
    pub save_folder: PathBuf,
    pub start: u64,
    pub encoding: OutputEncoding,
    pub api_host: String,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Pull `.env` files into the environment so the CLI can see them.
    pub fn load_env() {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();
    }

    pub fn new(account: impl Into<String>, mode: OutputMode, save_folder: PathBuf) -> Self {
        Self {
            account: account.into(),
            mode,
            save_folder,
            start: 0,
            encoding: OutputEncoding::default(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout: None,
        }
    }

    pub fn from_cli(cli: &Cli) -> BackupResult<Self> {
        let account = cli.account.trim().to_string();
        validate_account(&account)?;

        let save_folder = match &cli.save_folder {
            Some(folder) => folder.clone(),
            None => std::env::current_dir()?.join(&account),
        };

        let mode = if cli.csv {
            OutputMode::Csv
        } else {
            OutputMode::Html
        };

        let api_host = std::env::var("TUMBLR_API_HOST")
            .ok()
            .map(|h| h.trim().trim_matches('.').to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        let config = Self {
            start: cli.start,
            encoding: cli.encoding,
            timeout: cli.timeout.filter(|s| *s > 0).map(Duration::from_secs),
            api_host,
            ..Self::new(account, mode, save_folder)
        };

        Url::parse(&config.feed_endpoint())
            .map_err(|e| BackupError::Config(format!("cannot build feed URL: {}", e)))?;

        Ok(config)
    }

    /// The read API of this account's blog.
    pub fn feed_endpoint(&self) -> String {
        format!("http://{}.{}/api/read", self.account, self.api_host)
    }

    /// Where the sheet goes in CSV mode.
    pub fn csv_path(&self) -> PathBuf {
        self.save_folder.join(format!("{}.csv", self.account))
    }
}

fn validate_account(account: &str) -> BackupResult<()> {
    if account.is_empty() {
        return Err(BackupError::InvalidAccount("account name is empty".to_string()));
    }

    if let Some(c) = account
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | ':' | '?' | '#' | '@'))
    {
        return Err(BackupError::InvalidAccount(format!(
            "{:?} contains {:?}",
            account, c
        )));
    }

    Ok(())
}
