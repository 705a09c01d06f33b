//! Sound playback by delegating to an installed player program.
//!
//! The hook never decodes audio itself. It picks the first player program found on
//! `PATH` that can handle the file and hands the path over. Non-blocking playback
//! spawns the player and returns; the child keeps playing after the hook exits.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("sound file not found: {}", .0.display())]
    AssetMissing(PathBuf),
    #[error("no audio player found on PATH (tried {0})")]
    NoBackend(String),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
    #[error("cannot locate running executable: {0}")]
    Location(#[source] io::Error),
}

/// Something that can play an audio file.
pub trait Player {
    /// Name used in the hook's diagnostic line.
    fn name(&self) -> &str;

    /// Start playing `path`. With `block == false` this returns as soon as playback
    /// has been dispatched.
    fn play(&self, path: &Path, block: bool) -> Result<(), PlaybackError>;
}

/// An external player program and how to invoke it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backend {
    pub name: &'static str,
    /// Looked up on `PATH`.
    pub program: &'static str,
    pub args: &'static [&'static str],
    /// When set, passed as the last argument with `{path}` substituted
    /// instead of appending the path.
    pub script: Option<&'static str>,
    /// Lowercase extensions this program can play. Empty means anything.
    pub extensions: &'static [&'static str],
}

pub const PAPLAY: Backend = Backend {
    name: "paplay",
    program: "paplay",
    args: &[],
    script: None,
    extensions: &[],
};

pub const PW_PLAY: Backend = Backend {
    name: "pw-play",
    program: "pw-play",
    args: &[],
    script: None,
    extensions: &[],
};

pub const APLAY: Backend = Backend {
    name: "aplay",
    program: "aplay",
    args: &["-q"],
    script: None,
    extensions: &["wav"],
};

pub const FFPLAY: Backend = Backend {
    name: "ffplay",
    program: "ffplay",
    args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
    script: None,
    extensions: &[],
};

pub const MPV: Backend = Backend {
    name: "mpv",
    program: "mpv",
    args: &["--no-video", "--really-quiet"],
    script: None,
    extensions: &[],
};

pub const AFPLAY: Backend = Backend {
    name: "afplay",
    program: "afplay",
    args: &[],
    script: None,
    extensions: &[],
};

pub const POWERSHELL: Backend = Backend {
    name: "powershell",
    program: "powershell",
    args: &["-NoProfile", "-NonInteractive", "-Command"],
    script: Some("(New-Object Media.SoundPlayer '{path}').PlaySync()"),
    extensions: &["wav"],
};

/// Candidates for this platform, in order of preference.
#[cfg(target_os = "macos")]
pub const BACKENDS: &[Backend] = &[AFPLAY, FFPLAY, MPV];

#[cfg(windows)]
pub const BACKENDS: &[Backend] = &[POWERSHELL, FFPLAY, MPV];

#[cfg(not(any(target_os = "macos", windows)))]
pub const BACKENDS: &[Backend] = &[PAPLAY, PW_PLAY, APLAY, FFPLAY, MPV];

impl Backend {
    pub fn supports(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    fn command(&self, program: &Path, path: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(self.args);
        match self.script {
            // Single quotes are doubled inside a PowerShell literal string.
            Some(script) => {
                let quoted = path.to_string_lossy().replace('\'', "''");
                cmd.arg(script.replace("{path}", &quoted));
            }
            None => {
                cmd.arg(path);
            }
        }
        cmd
    }
}

/// Plays files by running a [`Backend`] program.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    backend: Backend,
    program: PathBuf,
}

impl CommandPlayer {
    pub fn new(backend: Backend, program: PathBuf) -> Self {
        CommandPlayer { backend, program }
    }

    /// First backend in [`BACKENDS`] that is installed and accepts `asset`.
    pub fn detect(asset: &Path) -> Result<Self, PlaybackError> {
        Self::detect_from(BACKENDS, asset, |program| which::which(program).ok())
    }

    pub fn detect_from<F>(candidates: &[Backend], asset: &Path, lookup: F) -> Result<Self, PlaybackError>
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        for backend in candidates {
            if !backend.supports(asset) {
                debug!("Skipping {}: cannot play {}", backend.name, asset.display());
                continue;
            }
            match lookup(backend.program) {
                Some(program) => {
                    debug!("Using {} at {}", backend.name, program.display());
                    return Ok(CommandPlayer::new(*backend, program));
                }
                None => debug!("{} not on PATH", backend.program),
            }
        }
        let tried: Vec<&str> = candidates.iter().map(|b| b.program).collect();
        Err(PlaybackError::NoBackend(tried.join(", ")))
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

impl Player for CommandPlayer {
    fn name(&self) -> &str {
        self.backend.name
    }

    fn play(&self, path: &Path, block: bool) -> Result<(), PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::AssetMissing(path.to_path_buf()));
        }

        let mut cmd = self.backend.command(&self.program, path);
        cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        debug!("Spawning {cmd:?}");

        let mut child = cmd.spawn().map_err(|source| PlaybackError::Spawn {
            program: self.backend.program.to_string(),
            source,
        })?;

        if !block {
            info!("Dispatched {} (pid {})", path.display(), child.id());
            return Ok(());
        }

        let status = child.wait().map_err(|source| PlaybackError::Spawn {
            program: self.backend.program.to_string(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(PlaybackError::Failed {
                program: self.backend.program.to_string(),
                status,
            })
        }
    }
}
