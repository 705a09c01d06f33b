//! The hook procedure: locate the chime, dispatch it, report one line on stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::assets;
use crate::playback::{CommandPlayer, PlaybackError, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Played,
    Failed,
}

/// Resolve the bundled chime and play it without blocking. Reports to stderr.
pub fn run() -> HookOutcome {
    let stderr = io::stderr();
    let mut diag = stderr.lock();

    let (asset, player) = match prepare() {
        Ok(ready) => ready,
        Err(e) => {
            debug!("No playback possible: {e:?}");
            let _ = writeln!(diag, "Error playing sound: {e}");
            return HookOutcome::Failed;
        }
    };

    run_with(&player, &asset, &mut diag)
}

fn prepare() -> Result<(PathBuf, CommandPlayer), PlaybackError> {
    let asset = assets::resolve_asset()?;
    ensure_asset(&asset)?;
    let player = CommandPlayer::detect(&asset)?;
    Ok((asset, player))
}

/// A missing chime is reported before looking for a player.
fn ensure_asset(asset: &Path) -> Result<(), PlaybackError> {
    if asset.is_file() {
        Ok(())
    } else {
        Err(PlaybackError::AssetMissing(asset.to_path_buf()))
    }
}

/// Dispatch `asset` on `player` and write exactly one line to `diag`.
pub fn run_with<P, W>(player: &P, asset: &Path, diag: &mut W) -> HookOutcome
where
    P: Player + ?Sized,
    W: Write,
{
    match player.play(asset, false) {
        Ok(()) => {
            let _ = writeln!(diag, "Chime played for Claude Code notification using {}.", player.name());
            HookOutcome::Played
        }
        Err(e) => {
            debug!("Playback via {} failed: {e:?}", player.name());
            let _ = writeln!(diag, "Error playing sound with {}: {e}", player.name());
            HookOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records calls; fails every call when `fail` is set.
    struct FakePlayer {
        fail: bool,
        calls: RefCell<Vec<(PathBuf, bool)>>,
    }

    impl FakePlayer {
        fn new(fail: bool) -> Self {
            FakePlayer { fail, calls: RefCell::new(Vec::new()) }
        }
    }

    impl Player for FakePlayer {
        fn name(&self) -> &str {
            "fake"
        }

        fn play(&self, path: &Path, block: bool) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push((path.to_path_buf(), block));
            if self.fail {
                Err(PlaybackError::NoBackend("fake".into()))
            } else {
                Ok(())
            }
        }
    }

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(buf).lines().map(str::to_string).collect()
    }

    #[test]
    fn success_writes_one_confirmation_line() {
        let player = FakePlayer::new(false);
        let mut diag = Vec::new();
        let outcome = run_with(&player, Path::new("/p/assets/chime.wav"), &mut diag);

        assert_eq!(outcome, HookOutcome::Played);
        assert_eq!(lines(&diag), vec!["Chime played for Claude Code notification using fake."]);
    }

    #[test]
    fn dispatch_is_non_blocking() {
        let player = FakePlayer::new(false);
        run_with(&player, Path::new("/p/assets/chime.wav"), &mut Vec::new());

        let calls = player.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (PathBuf::from("/p/assets/chime.wav"), false));
    }

    #[test]
    fn backend_failure_writes_one_error_line() {
        let player = FakePlayer::new(true);
        let mut diag = Vec::new();
        let outcome = run_with(&player, Path::new("/p/assets/chime.wav"), &mut diag);

        assert_eq!(outcome, HookOutcome::Failed);
        assert_eq!(
            lines(&diag),
            vec!["Error playing sound with fake: no audio player found on PATH (tried fake)"]
        );
    }

    #[test]
    fn missing_asset_writes_one_error_line() {
        let tmp = tempfile::tempdir().unwrap();
        let asset = tmp.path().join("assets").join("chime.wav");
        let player = CommandPlayer::new(crate::playback::PAPLAY, PathBuf::from("paplay"));
        let mut diag = Vec::new();
        let outcome = run_with(&player, &asset, &mut diag);

        assert_eq!(outcome, HookOutcome::Failed);
        let out = lines(&diag);
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("Error playing sound with paplay: sound file not found"));
        assert!(out[0].contains("chime.wav"));
    }

    #[test]
    fn asset_checked_before_player_lookup() {
        let tmp = tempfile::tempdir().unwrap();
        let asset = tmp.path().join("assets").join("chime.wav");
        let err = ensure_asset(&asset).unwrap_err();
        assert!(matches!(err, PlaybackError::AssetMissing(_)));
        assert!(err.to_string().contains("chime.wav"));

        std::fs::create_dir_all(asset.parent().unwrap()).unwrap();
        std::fs::write(&asset, b"RIFF").unwrap();
        assert!(ensure_asset(&asset).is_ok());
    }

    #[test]
    fn unwritable_diagnostics_do_not_panic() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let player = FakePlayer::new(false);
        assert_eq!(run_with(&player, Path::new("x.wav"), &mut Closed), HookOutcome::Played);
    }
}
