//! Game loop state machine
//!
//! `Game` owns the world and every outside collaborator. The host drives it:
//! - asks `pending_frame()` for the outstanding frame request and calls
//!   `on_frame(token)` from its display-refresh callback
//! - calls `poll_timers()` so the deferred game-over fires even when paused
//! - forwards input and button presses
//!
//! Phases: Idle -> Running <-> Paused, back to Idle on game-over. Reset is
//! valid from every phase.

use crate::audio::NotificationSink;
use crate::consts::{GAME_OVER_DELAY_MS, MAX_FRAME_MS};
use crate::error::SettingsError;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::platform::{Clock, TouchZones, control_for_key};
use crate::renderer::{FrameView, RenderConsumer};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, Intent, Session, Viewport, World};

use glam::Vec2;

/// Loop phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopPhase {
    /// Never started, or ended by game-over
    #[default]
    Idle,
    Running,
    Paused,
}

/// Handle for one requested frame. Tokens from cancelled requests are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Terminal score summary shown on game-over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u64,
    pub high_score: u64,
}

/// Text display for the score panel
pub trait HudSink {
    fn set_score(&mut self, text: &str);
    fn set_lives(&mut self, text: &str);
    fn set_high_score(&mut self, text: &str);
    fn game_over(&mut self, summary: &GameSummary);
}

pub fn score_label(score: u64) -> String {
    format!("Score: {}", score)
}

pub fn lives_label(lives: u32) -> String {
    format!("Lives: {}", lives)
}

pub fn high_score_label(high_score: u64) -> String {
    format!("High Score: {}", high_score)
}

/// Everything outside the simulation the loop talks to
pub struct Collaborators {
    pub clock: Box<dyn Clock>,
    pub store: Box<dyn KeyValueStore>,
    pub audio: Box<dyn NotificationSink>,
    pub hud: Box<dyn HudSink>,
    pub renderer: Box<dyn RenderConsumer>,
}

pub struct Game {
    world: World,
    phase: LoopPhase,
    intent: Intent,
    settings: Settings,
    high_score: HighScore,
    touch: TouchZones,

    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    audio: Box<dyn NotificationSink>,
    hud: Box<dyn HudSink>,
    renderer: Box<dyn RenderConsumer>,

    /// Last issued frame token
    frame_serial: u64,
    pending: Option<FrameToken>,
    /// Clock reading the next delta is measured from
    last_frame_ms: f64,
    game_over_deadline: Option<f64>,
    /// Score of the session that just ended, until the next start or reset
    final_score: Option<u64>,
    audio_warned: bool,
}

impl Game {
    /// Load settings and high score from the store and build the first world
    pub fn new(viewport: Viewport, seed: u64, parts: Collaborators) -> Self {
        let Collaborators {
            clock,
            store,
            mut audio,
            hud,
            renderer,
        } = parts;

        let settings = Settings::load(store.as_ref());
        let high_score = HighScore::load(store.as_ref());
        audio.set_volume(settings.effective_volume());

        let world = World::with_tuning(
            viewport,
            seed,
            high_score.best,
            settings.obstacle_speed,
            settings.craft_thrust,
        );
        let last_frame_ms = clock.now_ms();

        let mut game = Self {
            world,
            phase: LoopPhase::Idle,
            intent: Intent::default(),
            settings,
            high_score,
            touch: TouchZones::new(&viewport),
            clock,
            store,
            audio,
            hud,
            renderer,
            frame_serial: 0,
            pending: None,
            last_frame_ms,
            game_over_deadline: None,
            final_score: None,
            audio_warned: false,
        };
        game.refresh_hud();
        game.render();
        log::info!(
            "Game ready: {}x{}, high score {}",
            viewport.width,
            viewport.height,
            game.high_score.best
        );
        game
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for scripted scenarios and tooling
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn session(&self) -> &Session {
        &self.world.session
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn intent_mut(&mut self) -> &mut Intent {
        &mut self.intent
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    /// Score of the last finished session while its summary is on screen
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn is_game_over_pending(&self) -> bool {
        self.game_over_deadline.is_some()
    }

    // === Scheduling ===

    /// The frame the host should deliver next, if any
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    fn request_frame(&mut self) {
        self.frame_serial += 1;
        self.pending = Some(FrameToken(self.frame_serial));
    }

    fn cancel_frame(&mut self) {
        self.pending = None;
    }

    /// Re-anchor the delta-time baseline to now
    fn anchor_clock(&mut self) {
        self.last_frame_ms = self.clock.now_ms();
    }

    /// Run one tick for `token`. Returns false for stale tokens and for
    /// frames pre-empted by game-over.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.pending != Some(token) {
            log::trace!("Dropping stale frame {:?}", token);
            return false;
        }
        self.pending = None;

        if self.poll_timers() || self.phase != LoopPhase::Running {
            return false;
        }

        let now = self.clock.now_ms();
        let dt = ((now - self.last_frame_ms).max(0.0) as f32).min(MAX_FRAME_MS);
        self.last_frame_ms = now;

        sim::tick(&mut self.world, &self.intent, dt, now);
        self.dispatch_events(now);
        self.render();
        self.request_frame();
        true
    }

    /// Fire the deferred game-over once its deadline has passed
    pub fn poll_timers(&mut self) -> bool {
        match self.game_over_deadline {
            Some(deadline) if self.clock.now_ms() >= deadline => {
                self.game_over();
                true
            }
            _ => false,
        }
    }

    // === Transitions ===

    /// Start from Idle (resetting a spent session first) or resume from Paused
    pub fn start(&mut self) -> bool {
        match self.phase {
            LoopPhase::Idle => {
                if self.world.session.is_spent() {
                    self.world.reset();
                    self.refresh_hud();
                }
                self.final_score = None;
                self.world.spawner.restart();
                self.phase = LoopPhase::Running;
                self.anchor_clock();
                self.request_frame();
                self.render();
                log::info!("Game started");
                true
            }
            LoopPhase::Paused => self.resume(),
            LoopPhase::Running => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != LoopPhase::Running {
            return false;
        }
        self.phase = LoopPhase::Paused;
        self.cancel_frame();
        self.render();
        log::info!("Game paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != LoopPhase::Paused {
            return false;
        }
        self.phase = LoopPhase::Running;
        self.anchor_clock();
        self.request_frame();
        self.render();
        log::info!("Game resumed");
        true
    }

    /// Pause button: pause when running, resume when paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            LoopPhase::Running => self.pause(),
            LoopPhase::Paused => self.resume(),
            LoopPhase::Idle => false,
        }
    }

    /// Settings panel opened: a running game pauses and stays paused when
    /// the panel closes
    pub fn open_settings(&mut self) {
        if self.phase == LoopPhase::Running {
            self.pause();
        } else {
            self.render();
        }
    }

    /// Fresh world from any phase. Play continues only if a session was in
    /// progress; a pending game-over is cancelled.
    pub fn reset(&mut self) {
        let in_progress = self.phase != LoopPhase::Idle;

        self.world.reset();
        self.game_over_deadline = None;
        self.final_score = None;
        self.refresh_hud();

        if in_progress {
            self.phase = LoopPhase::Running;
            self.anchor_clock();
            self.request_frame();
        } else {
            self.phase = LoopPhase::Idle;
            self.cancel_frame();
        }
        self.render();
        log::info!("Game reset ({:?})", self.phase);
    }

    fn game_over(&mut self) {
        self.game_over_deadline = None;
        self.phase = LoopPhase::Idle;
        self.cancel_frame();
        self.world.clear_transients();

        let summary = GameSummary {
            score: self.world.session.score,
            high_score: self.high_score.best,
        };
        self.final_score = Some(summary.score);
        self.hud.game_over(&summary);
        log::info!(
            "Game over: score {} (high score {})",
            summary.score,
            summary.high_score
        );
        self.render();
    }

    // === Settings ===

    /// Apply already-validated settings to the live world and persist them
    pub fn apply_settings(&mut self, settings: Settings) {
        self.world.set_obstacle_speed(settings.obstacle_speed);
        self.world.set_craft_thrust(settings.craft_thrust);
        self.audio.set_volume(settings.effective_volume());
        if let Err(e) = settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {}", e);
        }
        log::info!(
            "Settings applied: obstacle speed x{}, thrust {}",
            settings.obstacle_speed,
            settings.craft_thrust
        );
        self.settings = settings;
        self.render();
    }

    /// Validate raw text from the settings form, then apply it
    pub fn apply_settings_input(
        &mut self,
        obstacle_speed: &str,
        craft_thrust: &str,
    ) -> Result<(), SettingsError> {
        let settings = Settings {
            obstacle_speed: Settings::parse_obstacle_speed(obstacle_speed)?,
            craft_thrust: Settings::parse_craft_thrust(craft_thrust)?,
            ..self.settings.clone()
        };
        self.apply_settings(settings);
        Ok(())
    }

    // === Input ===

    /// Key down/up by `KeyboardEvent.key` name. Returns whether the key is
    /// bound. Any key press starts an idle game or resumes a paused one.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        let control = control_for_key(key);
        if let Some(control) = control {
            self.intent.set(control, pressed);
        }
        if pressed {
            self.auto_start();
        }
        control.is_some()
    }

    /// Touches currently on the playfield, in viewport coordinates
    pub fn handle_touch_start(&mut self, touches: &[Vec2]) {
        self.touch.press(&mut self.intent, touches);
        self.auto_start();
    }

    /// Touch end or cancel releases every control
    pub fn handle_touch_end(&mut self) {
        self.touch.release(&mut self.intent);
    }

    fn auto_start(&mut self) {
        match self.phase {
            LoopPhase::Idle if self.world.session.lives > 0 => {
                self.start();
            }
            LoopPhase::Paused => {
                self.resume();
            }
            _ => {}
        }
    }

    // === Outputs ===

    fn dispatch_events(&mut self, now: f64) {
        for event in self.world.drain_events() {
            match event {
                GameEvent::Sound(cue) => {
                    if let Err(e) = self.audio.play(cue) {
                        if self.audio_warned {
                            log::debug!("Sound '{}' dropped: {}", cue.name(), e);
                        } else {
                            log::warn!("Sound '{}' dropped: {}", cue.name(), e);
                            self.audio_warned = true;
                        }
                    }
                }
                GameEvent::ScoreChanged(score) => self.hud.set_score(&score_label(score)),
                GameEvent::HighScoreChanged(high) => {
                    if self.high_score.record(high) {
                        if let Err(e) = self.high_score.save(self.store.as_mut()) {
                            log::warn!("Failed to save high score: {}", e);
                        }
                    }
                    self.hud.set_high_score(&high_score_label(high));
                }
                GameEvent::LivesChanged(lives) => self.hud.set_lives(&lives_label(lives)),
                GameEvent::CraftRespawned => {
                    log::info!(
                        "Craft respawned ({}/{})",
                        self.world.session.respawn_count,
                        self.world.session.max_respawns
                    );
                }
                GameEvent::CraftDestroyed => {
                    if self.game_over_deadline.is_none() {
                        self.game_over_deadline = Some(now + GAME_OVER_DELAY_MS);
                        log::info!("Craft destroyed, game over in {} ms", GAME_OVER_DELAY_MS);
                    }
                }
                GameEvent::ObstacleDestroyed { radius, children } => {
                    log::trace!("Obstacle r={:.1} -> {} fragments", radius, children);
                }
                GameEvent::PowerUpCollected(kind) => {
                    log::info!("Collected {:?}", kind);
                }
            }
        }
    }

    fn refresh_hud(&mut self) {
        let session = &self.world.session;
        self.hud.set_score(&score_label(session.score));
        self.hud.set_lives(&lives_label(session.lives));
        self.hud.set_high_score(&high_score_label(self.high_score.best));
    }

    fn render(&mut self) {
        let view = FrameView::new(
            &self.world,
            self.phase,
            self.intent,
            self.clock.now_ms(),
            self.final_score,
        );
        self.renderer.render(&view);
    }
}
