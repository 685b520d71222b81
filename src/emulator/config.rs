// Configuration management
//
// The immutable configuration record passed into `Emulator::new`. The
// core reads it at initialization and never mutates it; persistence and
// user-facing settings UI belong to the host shell, which is why the
// types only carry serde derives and no file I/O.

use serde::{Deserialize, Serialize};

/// Emulator configuration
///
/// Everything the core needs to know from the host at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Video settings
    pub video: VideoConfig,

    /// Audio settings
    pub audio: AudioConfig,
}

/// Video configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Target frame rate (60 for NTSC)
    pub fps: u32,
}

/// Audio configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Generate audio samples during `run_frame`
    pub enabled: bool,

    /// Output sample rate in Hz
    pub sample_rate: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            video: VideoConfig { fps: 60 },
            audio: AudioConfig {
                enabled: true,
                sample_rate: 44100,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmulatorConfig::default();

        assert_eq!(config.video.fps, 60);
        assert_eq!(config.audio.sample_rate, 44100);
        assert!(config.audio.enabled);
    }
}
