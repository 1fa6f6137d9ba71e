//! Session control surface
//!
//! Owns the world, the sound bank, and the fixed-timestep accumulator. The
//! platform calls [`Session::frame`] once per animation frame with the
//! elapsed wall time and [`Session::render`] to draw.

use crate::audio::{AudioBackend, PlayOptions, SoundBank, SoundKey};
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, MUSIC_DELAY_MS, MUSIC_VOLUME, SIM_DT_MS};
use crate::renderer::{Canvas, render_world};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Handle returned by [`Session::stop`] that resumes the same run
#[must_use = "dropping the handle leaves the session stopped"]
#[derive(Debug)]
pub struct Resume(());

impl Resume {
    pub fn resume<B: AudioBackend>(self, session: &mut Session<B>) -> bool {
        session.resume()
    }
}

pub struct Session<B: AudioBackend> {
    state: GameState,
    sounds: SoundBank<B>,
    settings: Settings,
    accumulator: f32,
    /// World-clock deadline for starting the background loop
    music_due_at: Option<f64>,
}

impl<B: AudioBackend> Session<B> {
    /// Load sounds and build an idle world; call [`Session::start`] to play
    pub fn new(settings: Settings, backend: B, seed: u64) -> Self {
        let mut sounds = SoundBank::new(backend, &settings);
        sounds.load_all(&settings);
        Self {
            state: GameState::new(settings.seed.unwrap_or(seed)),
            sounds,
            settings,
            accumulator: 0.0,
            music_due_at: None,
        }
    }

    /// Fresh run: score 0, player, score display, one enemy, then resume
    pub fn start(&mut self, seed: u64) {
        let seed = self.settings.seed.unwrap_or(seed);
        self.sounds.pause(SoundKey::Background);
        self.state = GameState::new(seed);
        self.accumulator = 0.0;
        self.music_due_at = None;
        log::info!("Session started with seed {}", seed);
        self.resume();
    }

    /// Cancel spawners and the frame loop and pause the music.
    ///
    /// Safe to call repeatedly.
    pub fn stop(&mut self) -> Resume {
        if self.state.halt() {
            log::info!("Session stopped at score {}", self.state.score);
        }
        self.sounds.pause(SoundKey::Background);
        self.music_due_at = None;
        self.accumulator = 0.0;
        Resume(())
    }

    /// Restart spawners and schedule the background music.
    ///
    /// Refused after game over; start a new run instead.
    pub fn resume(&mut self) -> bool {
        if !self.state.resume() {
            return false;
        }
        self.music_due_at = Some(self.state.clock_ms + MUSIC_DELAY_MS);
        log::info!("Session running");
        true
    }

    /// Stop or resume depending on the current phase
    pub fn toggle(&mut self) {
        match self.state.phase {
            GamePhase::Running => {
                let _ = self.stop();
            }
            GamePhase::Stopped => {
                self.resume();
            }
            GamePhase::GameOver => {}
        }
    }

    /// Advance by `elapsed_ms` of wall time in fixed steps
    pub fn frame(&mut self, elapsed_ms: f32, input: &TickInput) {
        if !self.state.is_running() {
            return;
        }

        self.accumulator += elapsed_ms.clamp(0.0, MAX_FRAME_MS);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, input, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
            if !self.state.is_running() {
                break;
            }
        }

        self.dispatch_events();
        self.start_music_if_due();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::EnemyDestroyed { pos, style } => {
                    log::debug!("{:?} explosion at ({:.0}, {:.0})", style, pos.x, pos.y);
                    self.sounds.play(SoundKey::Explosion, PlayOptions::default());
                }
                GameEvent::GiftCollected(_) => {
                    self.sounds.play(SoundKey::Pickup, PlayOptions::default());
                }
                GameEvent::GameOver { score } => {
                    log::info!("Final score: {}", score);
                    let _ = self.stop();
                    self.sounds.play(SoundKey::GameOver, PlayOptions::default());
                }
            }
        }
    }

    fn start_music_if_due(&mut self) {
        let Some(due) = self.music_due_at else {
            return;
        };
        if self.state.clock_ms < due {
            return;
        }
        self.music_due_at = None;
        self.sounds.play(
            SoundKey::Background,
            PlayOptions {
                looped: true,
                volume: MUSIC_VOLUME,
            },
        );
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        render_world(canvas, &self.state);
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sounds(&self) -> &SoundBank<B> {
        &self.sounds
    }
}
