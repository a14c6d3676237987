use std::fs;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tumblr_backup::cli::Cli;
use tumblr_backup::config::Config;
use tumblr_backup::errors::BackupResult;
use tumblr_backup::services::BackupService;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> BackupResult<()> {
    // .env first so clap's env fallbacks can see it
    Config::load_env();
    let cli = Cli::parse();

    init_tracing();

    let config = Config::from_cli(&cli)?;

    // Make sure there's a folder to save in
    fs::create_dir_all(&config.save_folder)?;

    let save_folder = config.save_folder.clone();
    let service = BackupService::from_config(config)?;
    let summary = service.run()?;

    println!(
        "Backup complete. {} of {} posts saved to {}.",
        summary.posts_written,
        summary.total,
        save_folder.display()
    );

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tumblr_backup=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
