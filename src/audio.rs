//! Sound playback
//!
//! A [`SoundBank`] owns one clip per [`SoundKey`] over a pluggable
//! [`AudioBackend`]. Loading is best-effort: a clip that fails to load is
//! logged and skipped, and the game runs without it.

use thiserror::Error;

use crate::settings::Settings;

/// Sounds the game plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// Looping background music
    Background,
    /// Enemy tank destroyed
    Explosion,
    /// Lethal collision
    GameOver,
    /// Gift collected
    Pickup,
}

impl SoundKey {
    pub const ALL: [SoundKey; 4] = [
        SoundKey::Background,
        SoundKey::Explosion,
        SoundKey::GameOver,
        SoundKey::Pickup,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SoundKey::Background => "background.mp3",
            SoundKey::Explosion => "explosion.wav",
            SoundKey::GameOver => "gameover.mp3",
            SoundKey::Pickup => "gift.wav",
        }
    }

    /// Music is scaled by the music channel, everything else by effects
    pub fn is_music(self) -> bool {
        self == SoundKey::Background
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-play options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub looped: bool,
    pub volume: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            looped: false,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio element for {path} could not be created: {reason}")]
    Load { path: String, reason: String },
    #[error("audio playback is not available")]
    Unavailable,
}

/// Platform audio seam
pub trait AudioBackend {
    type Clip;

    fn load(&mut self, path: &str) -> Result<Self::Clip, AudioError>;

    /// Start the clip from the beginning
    fn play(&mut self, clip: &mut Self::Clip, options: PlayOptions);

    fn pause(&mut self, clip: &mut Self::Clip);
}

/// Loaded clips keyed by sound
pub struct SoundBank<B: AudioBackend> {
    backend: B,
    clips: [Option<B::Clip>; SoundKey::ALL.len()],
    music_gain: f32,
    sfx_gain: f32,
}

impl<B: AudioBackend> SoundBank<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        Self {
            backend,
            clips: [None, None, None, None],
            music_gain: settings.music_gain(),
            sfx_gain: settings.sfx_gain(),
        }
    }

    /// Load every sound; returns how many loaded
    pub fn load_all(&mut self, settings: &Settings) -> usize {
        let mut loaded = 0;
        for key in SoundKey::ALL {
            let path = settings.sound_path(key.file_name());
            match self.backend.load(&path) {
                Ok(clip) => {
                    self.clips[key.index()] = Some(clip);
                    loaded += 1;
                }
                Err(e) => log::warn!("Sound {:?} unavailable: {}", key, e),
            }
        }
        log::info!("Loaded {}/{} sounds", loaded, SoundKey::ALL.len());
        loaded
    }

    pub fn is_loaded(&self, key: SoundKey) -> bool {
        self.clips[key.index()].is_some()
    }

    /// Play a sound. Returns false if it never loaded.
    pub fn play(&mut self, key: SoundKey, options: PlayOptions) -> bool {
        let gain = if key.is_music() {
            self.music_gain
        } else {
            self.sfx_gain
        };
        let Some(clip) = self.clips[key.index()].as_mut() else {
            return false;
        };
        if gain > 0.0 {
            let options = PlayOptions {
                volume: (options.volume * gain).clamp(0.0, 1.0),
                ..options
            };
            self.backend.play(clip, options);
        }
        true
    }

    /// Pause a sound. Returns false if it never loaded.
    pub fn pause(&mut self, key: SoundKey) -> bool {
        let Some(clip) = self.clips[key.index()].as_mut() else {
            return false;
        };
        self.backend.pause(clip);
        true
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Backend that loads nothing; used by the headless build
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    type Clip = ();

    fn load(&mut self, _path: &str) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn play(&mut self, _clip: &mut (), _options: PlayOptions) {}

    fn pause(&mut self, _clip: &mut ()) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlAudioBackend;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::HtmlAudioElement;

    use super::{AudioBackend, AudioError, PlayOptions};

    /// `<audio>` element per clip
    #[derive(Debug, Default)]
    pub struct HtmlAudioBackend;

    impl AudioBackend for HtmlAudioBackend {
        type Clip = HtmlAudioElement;

        fn load(&mut self, path: &str) -> Result<HtmlAudioElement, AudioError> {
            let element = HtmlAudioElement::new_with_src(path).map_err(|e| AudioError::Load {
                path: path.to_string(),
                reason: format!("{:?}", e),
            })?;

            // Missing files surface asynchronously
            let src = path.to_string();
            let onerror = Closure::<dyn FnMut()>::new(move || {
                log::warn!("Failed to load sound {}", src);
            });
            element.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            Ok(element)
        }

        fn play(&mut self, clip: &mut HtmlAudioElement, options: PlayOptions) {
            clip.set_loop(options.looped);
            clip.set_volume(f64::from(options.volume));
            clip.set_current_time(0.0);
            // Autoplay may be refused until the first user gesture
            let _ = clip.play();
        }

        fn pause(&mut self, clip: &mut HtmlAudioElement) {
            let _ = clip.pause();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend that records calls; fails to load any path containing "missing"
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub played: Vec<(String, PlayOptions)>,
        pub paused: Vec<String>,
    }

    impl RecordingBackend {
        pub fn played_files(&self) -> Vec<&str> {
            self.played.iter().map(|(p, _)| p.as_str()).collect()
        }
    }

    impl AudioBackend for RecordingBackend {
        type Clip = String;

        fn load(&mut self, path: &str) -> Result<String, AudioError> {
            if path.contains("missing") {
                return Err(AudioError::Load {
                    path: path.to_string(),
                    reason: "not found".to_string(),
                });
            }
            Ok(path.to_string())
        }

        fn play(&mut self, clip: &mut String, options: PlayOptions) {
            self.played.push((clip.clone(), options));
        }

        fn pause(&mut self, clip: &mut String) {
            self.paused.push(clip.clone());
        }
    }

    #[test]
    fn test_load_and_play() {
        let settings = Settings::default();
        let mut bank = SoundBank::new(RecordingBackend::default(), &settings);
        assert_eq!(bank.load_all(&settings), 4);

        assert!(bank.play(SoundKey::Pickup, PlayOptions::default()));
        assert!(bank.pause(SoundKey::Background));
        assert_eq!(bank.backend().played_files(), vec!["sounds/gift.wav"]);
        assert_eq!(bank.backend().paused, vec!["sounds/background.mp3"]);
    }

    #[test]
    fn test_unloaded_sound_reports_false() {
        let settings = Settings {
            sound_dir: "missing".to_string(),
            ..Default::default()
        };
        let mut bank = SoundBank::new(RecordingBackend::default(), &settings);
        assert_eq!(bank.load_all(&settings), 0);
        assert!(!bank.is_loaded(SoundKey::Explosion));
        assert!(!bank.play(SoundKey::Explosion, PlayOptions::default()));
        assert!(!bank.pause(SoundKey::Background));
        assert!(bank.backend().played.is_empty());
    }

    #[test]
    fn test_volume_scaled_by_channel() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.5,
            ..Default::default()
        };
        let mut bank = SoundBank::new(RecordingBackend::default(), &settings);
        bank.load_all(&settings);
        bank.play(
            SoundKey::Background,
            PlayOptions {
                looped: true,
                volume: 0.5,
            },
        );
        bank.play(SoundKey::Explosion, PlayOptions::default());

        let played = &bank.backend().played;
        assert_eq!(played[0].1, PlayOptions { looped: true, volume: 0.125 });
        assert_eq!(played[1].1.volume, 0.5);
    }

    #[test]
    fn test_muted_bank_skips_backend() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut bank = SoundBank::new(RecordingBackend::default(), &settings);
        bank.load_all(&settings);
        assert!(bank.play(SoundKey::GameOver, PlayOptions::default()));
        assert!(bank.backend().played.is_empty());
    }

    #[test]
    fn test_null_backend_loads_nothing() {
        let settings = Settings::default();
        let mut bank = SoundBank::new(NullBackend, &settings);
        assert_eq!(bank.load_all(&settings), 0);
    }
}
