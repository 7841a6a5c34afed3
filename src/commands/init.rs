use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::{BOARD_DIR, CONFIG_FILE, Config};

pub fn run() -> Result<()> {
    let board_dir = PathBuf::from(BOARD_DIR);

    if board_dir.join(CONFIG_FILE).exists() {
        println!("Threadboard already initialized in {}", board_dir.display());
        return Ok(());
    }

    fs::create_dir_all(&board_dir).context("Failed to create .threadboard directory")?;
    Config::default().write_file(&board_dir)?;

    println!("Initialized threadboard in {}", board_dir.display());
    Ok(())
}
