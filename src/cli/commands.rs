use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::text::OutputEncoding;

#[derive(Parser, Debug)]
#[command(name = "tumblr-backup")]
#[command(about = "Back up the public posts of a Tumblr blog to HTML pages or a CSV sheet")]
#[command(version)]
pub struct Cli {
    /// Tumblr account to back up (the part before .tumblr.com)
    pub account: String,

    /// Save every post as a row of one CSV file instead of one HTML page each
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub csv: bool,

    /// Folder to save into (defaults to ./<account>)
    #[arg(long, env = "TUMBLR_BACKUP_DIR")]
    pub save_folder: Option<PathBuf>,

    /// Post offset to start from, to resume an interrupted backup
    #[arg(long, default_value_t = 0)]
    pub start: u64,

    /// Byte encoding of the saved files
    #[arg(long, value_enum, default_value_t = OutputEncoding::Utf8)]
    pub encoding: OutputEncoding,

    /// Give up on a request after this many seconds (waits forever when unset)
    #[arg(long, env = "TUMBLR_BACKUP_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tumblr-backup", "demo"]).unwrap();
        assert_eq!(cli.account, "demo");
        assert!(!cli.csv);
        assert_eq!(cli.start, 0);
        assert_eq!(cli.encoding, OutputEncoding::Utf8);
    }

    #[test]
    fn test_csv_flag_forms() {
        let bare = Cli::try_parse_from(["tumblr-backup", "--csv", "demo"]).unwrap();
        assert!(bare.csv);
        assert_eq!(bare.account, "demo");

        let explicit = Cli::try_parse_from(["tumblr-backup", "demo", "--csv=true"]).unwrap();
        assert!(explicit.csv);

        let off = Cli::try_parse_from(["tumblr-backup", "demo", "--csv=false"]).unwrap();
        assert!(!off.csv);
    }

    #[test]
    fn test_resume_and_encoding() {
        let cli = Cli::try_parse_from([
            "tumblr-backup",
            "demo",
            "--start",
            "150",
            "--encoding",
            "latin-1",
        ])
        .unwrap();
        assert_eq!(cli.start, 150);
        assert_eq!(cli.encoding, OutputEncoding::Latin1);
    }

    #[test]
    fn test_account_is_required() {
        assert!(Cli::try_parse_from(["tumblr-backup"]).is_err());
    }
}
