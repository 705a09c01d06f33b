//! Locating the bundled chime relative to the installed binary.
//!
//! Install layout:
//!
//! ```text
//! <root>/hooks/chime-hook
//! <root>/assets/chime.wav
//! ```

use std::path::{Path, PathBuf};

use log::debug;

use crate::playback::PlaybackError;

pub const ASSETS_DIR: &str = "assets";
pub const CHIME_FILE: &str = "chime.wav";

/// Asset path for the running executable.
pub fn resolve_asset() -> Result<PathBuf, PlaybackError> {
    let exe = std::env::current_exe().map_err(PlaybackError::Location)?;
    let exe = if exe.is_absolute() {
        exe
    } else {
        std::env::current_dir().map_err(PlaybackError::Location)?.join(exe)
    };
    let asset = asset_path_for(&exe);
    debug!("Executable: {} -> chime: {}", exe.display(), asset.display());
    Ok(asset)
}

/// `<parent of exe dir>/assets/chime.wav`. Never consults the working directory.
pub fn asset_path_for(executable: &Path) -> PathBuf {
    install_root(executable).join(ASSETS_DIR).join(CHIME_FILE)
}

/// Parent of the directory holding `executable`. A root stays a root.
pub fn install_root(executable: &Path) -> PathBuf {
    let exe_dir = parent_or_self(executable);
    parent_or_self(exe_dir).to_path_buf()
}

fn parent_or_self(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}
