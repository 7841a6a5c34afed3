use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

pub const BOARD_DIR: &str = ".threadboard";
pub const CONFIG_FILE: &str = "config.toml";

/// Atomically write content to a file using a temporary file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp = path.with_extension("toml.tmp");
    let mut file = File::create(&temp)
        .with_context(|| format!("Failed to create temporary file: {}", temp.display()))?;
    file.lock_exclusive()
        .context("Failed to acquire file lock")?;
    file.write_all(content)
        .context("Failed to write file content")?;
    file.sync_all().context("Failed to sync file")?;
    file.unlock().context("Failed to unlock file")?;
    fs::rename(&temp, path).with_context(|| format!("Failed to rename to {}", path.display()))?;
    Ok(())
}

/// Finds the `.threadboard/` directory by walking up from `start`.
/// Returns `None` if there is none.
pub fn find_board_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = start;

    loop {
        let board_path = dir.join(BOARD_DIR);
        if board_path.is_dir() {
            return Some(board_path);
        }

        dir = dir.parent()?;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub port: u16,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Column at which comment bodies wrap.
    pub wrap_width: usize,
    /// Replies deeper than this are drawn at this indent level.
    pub max_indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 8080,
            render: RenderConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wrap_width: 80,
            max_indent: 6,
        }
    }
}

impl Config {
    /// Reads `config.toml` from a board directory; a missing file means defaults.
    pub fn load(board_dir: &Path) -> Result<Self> {
        let path = board_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Config for the board directory above the current directory, or the
    /// defaults when there is none.
    pub fn discover() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to read current directory")?;
        match find_board_dir(&current_dir) {
            Some(dir) => Self::load(&dir),
            None => Ok(Self::default()),
        }
    }

    pub fn write_file(&self, board_dir: &Path) -> Result<()> {
        let content = toml::to_string(self).context("Failed to serialize config")?;
        atomic_write(&board_dir.join(CONFIG_FILE), content.as_bytes())
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.server, self.port)
    }

    pub fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url())
    }

    pub fn post_url(&self, post_id: &str) -> String {
        format!("{}/posts/{post_id}", self.base_url())
    }

    pub fn comments_url(&self) -> String {
        format!("{}/comments", self.base_url())
    }
}
