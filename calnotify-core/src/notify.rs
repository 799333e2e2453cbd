//! Desktop notification and sound dispatch.

use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::error::{CalNotifyError, CalNotifyResult};

pub const DEFAULT_SOUND_PLAYER: &str = "aplay";

/// Side effects of a fired reminder.
pub trait Dispatcher {
    /// Run a notification command. Failures are logged, never returned.
    fn send(&self, command: &str);

    /// Play an audio asset.
    fn play_sound(&self, sound: &Path) -> CalNotifyResult<()>;
}

/// Runs notification commands through `sh` and sounds through a player binary.
#[derive(Debug, Clone)]
pub struct SystemDispatcher {
    player: String,
}

impl SystemDispatcher {
    pub fn new(player: impl Into<String>) -> Self {
        SystemDispatcher { player: player.into() }
    }
}

impl Default for SystemDispatcher {
    fn default() -> Self {
        SystemDispatcher::new(DEFAULT_SOUND_PLAYER)
    }
}

impl Dispatcher for SystemDispatcher {
    fn send(&self, command: &str) {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => debug!("Notification sent"),
            Ok(status) => warn!("Notification command exited with {status}: {command}"),
            Err(e) => warn!("Failed to run notification command '{command}': {e}"),
        }
    }

    fn play_sound(&self, sound: &Path) -> CalNotifyResult<()> {
        validate_sound_asset(sound)?;

        let status = Command::new(&self.player)
            .arg(sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| CalNotifyError::SoundAsset {
                path: sound.display().to_string(),
                reason: format!("failed to run {}: {e}", self.player),
            })?;

        if !status.success() {
            return Err(CalNotifyError::SoundAsset {
                path: sound.display().to_string(),
                reason: format!("{} exited with {status}", self.player),
            });
        }
        Ok(())
    }
}

/// Only existing `.wav` files are playable.
pub fn validate_sound_asset(sound: &Path) -> CalNotifyResult<()> {
    let invalid = |reason: &str| CalNotifyError::SoundAsset {
        path: sound.display().to_string(),
        reason: reason.to_string(),
    };

    let is_wav = sound
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if !is_wav {
        return Err(invalid("not a .wav file"));
    }
    if !sound.is_file() {
        return Err(invalid("file not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sound_asset_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("pop.mp3");
        std::fs::write(&mp3, b"ID3").unwrap();

        let err = validate_sound_asset(&mp3).unwrap_err();

        assert!(matches!(err, CalNotifyError::SoundAsset { .. }));
        assert!(err.to_string().contains("not a .wav file"));
    }

    #[test]
    fn test_validate_sound_asset_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(validate_sound_asset(&dir.path().join("missing.wav")).is_err());

        let wav = dir.path().join("pop.WAV");
        std::fs::write(&wav, b"RIFF").unwrap();
        assert!(validate_sound_asset(&wav).is_ok());
    }

    #[test]
    fn test_missing_player_is_a_sound_error() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("pop.wav");
        std::fs::write(&wav, b"RIFF").unwrap();

        let err = SystemDispatcher::new("calnotify-missing-player")
            .play_sound(&wav)
            .unwrap_err();

        assert!(matches!(err, CalNotifyError::SoundAsset { .. }));
        assert!(err.to_string().contains("calnotify-missing-player"));
    }
}
