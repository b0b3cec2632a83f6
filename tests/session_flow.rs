//! Whole-session scenarios driven through the public `Game` API

use std::cell::RefCell;
use std::rc::Rc;

use asteroid_shooter::audio::NotificationSink;
use asteroid_shooter::consts::*;
use asteroid_shooter::game::Collaborators;
use asteroid_shooter::persistence::{KeyValueStore, MemoryStore};
use asteroid_shooter::platform::ManualClock;
use asteroid_shooter::renderer::{FrameView, Overlay, RenderConsumer};
use asteroid_shooter::sim::{Projectile, SoundCue, Viewport};
use asteroid_shooter::{AudioError, Game, GameSummary, HighScore, HudSink, LoopPhase, StorageError};
use glam::Vec2;

#[derive(Default)]
struct Log {
    sounds: Vec<SoundCue>,
    lives: Vec<String>,
    summaries: Vec<GameSummary>,
    overlays: Vec<Overlay>,
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Log>>);

impl HudSink for Recorder {
    fn set_score(&mut self, _text: &str) {}
    fn set_lives(&mut self, text: &str) {
        self.0.borrow_mut().lives.push(text.to_string());
    }
    fn set_high_score(&mut self, _text: &str) {}
    fn game_over(&mut self, summary: &GameSummary) {
        self.0.borrow_mut().summaries.push(*summary);
    }
}

impl RenderConsumer for Recorder {
    fn render(&mut self, view: &FrameView) {
        self.0.borrow_mut().overlays.push(view.overlay);
    }
}

impl NotificationSink for Recorder {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.0.borrow_mut().sounds.push(cue);
        Ok(())
    }
}

/// Store whose contents outlive the game that owns it
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }
}

struct Harness {
    game: Game,
    clock: ManualClock,
    log: Recorder,
}

impl Harness {
    fn new(store: SharedStore) -> Self {
        let clock = ManualClock::new(0.0);
        let log = Recorder::default();
        let game = Game::new(
            Viewport::default(),
            2024,
            Collaborators {
                clock: Box::new(clock.clone()),
                store: Box::new(store),
                audio: Box::new(log.clone()),
                hud: Box::new(log.clone()),
                renderer: Box::new(log.clone()),
            },
        );
        Self { game, clock, log }
    }

    /// Started game with every obstacle parked in a corner and spawning held off
    fn calm() -> Self {
        let mut h = Self::new(SharedStore::default());
        h.game.start();
        let world = h.game.world_mut();
        for o in &mut world.obstacles {
            o.pos = Vec2::new(10.0, 10.0);
            o.vel = Vec2::ZERO;
        }
        world.spawner.obstacle_elapsed_ms = -1.0e6;
        world.spawner.power_up_elapsed_ms = -1.0e6;
        h
    }

    fn frame(&mut self, ms: f64) -> bool {
        self.clock.advance(ms);
        match self.game.pending_frame() {
            Some(token) => self.game.on_frame(token),
            None => false,
        }
    }
}

#[test]
fn respawn_then_invulnerable_then_game_over() {
    let mut h = Harness::calm();
    let center = h.game.world().viewport.center();

    // First hit away from the centre
    let spot = Vec2::new(200.0, 200.0);
    {
        let world = h.game.world_mut();
        world.craft.pos = spot;
        world.obstacles[0].pos = spot;
    }
    h.frame(16.0);
    assert_eq!(h.game.session().lives, 2);
    assert_eq!(h.game.session().respawn_count, 1);
    assert_eq!(h.game.world().craft.pos, center);
    assert_eq!(h.game.world().craft.vel, Vec2::ZERO);
    assert!(h.game.world().craft.invulnerable);

    // Obstacle sits on the respawned craft: no effect while invulnerable
    h.game.world_mut().obstacles[0].pos = center;
    h.frame(16.0);
    assert_eq!(h.game.session().lives, 2);
    assert_eq!(h.game.session().respawn_count, 1);

    // 2984 ms of invulnerability left: 29 clamped frames keep it alive
    for _ in 0..29 {
        h.frame(100.0);
        assert_eq!(h.game.session().lives, 2);
    }
    h.frame(100.0);
    assert_eq!(h.game.session().lives, 1);
    assert!(h.game.is_game_over_pending());
    assert_eq!(h.game.phase(), LoopPhase::Running);

    let log = h.log.0.borrow();
    assert_eq!(log.lives, vec!["Lives: 3", "Lives: 2", "Lives: 1"]);
    assert_eq!(
        log.sounds.iter().filter(|c| **c == SoundCue::Explosion).count(),
        2
    );
}

#[test]
fn game_over_clears_field_after_delay() {
    let mut h = Harness::calm();
    {
        let world = h.game.world_mut();
        world.session.respawn_count = world.session.max_respawns;
        world.obstacles[0].pos = world.craft.pos;
        let id = world.next_entity_id();
        world
            .projectiles
            .push(Projectile::new(id, Vec2::new(700.0, 500.0), Vec2::ZERO));
    }
    h.frame(16.0);
    assert!(h.game.is_game_over_pending());
    let token = h.game.pending_frame();

    h.clock.advance(GAME_OVER_DELAY_MS);
    assert!(h.game.poll_timers());
    assert_eq!(h.game.phase(), LoopPhase::Idle);
    assert!(h.game.world().obstacles.is_empty());
    assert!(h.game.world().projectiles.is_empty());
    assert!(h.game.world().power_ups.is_empty());

    // The frame requested before game-over is now stale
    let Some(token) = token else {
        panic!("running game should have a pending frame");
    };
    assert!(!h.game.on_frame(token));

    let log = h.log.0.borrow();
    assert_eq!(log.summaries, vec![GameSummary { score: 0, high_score: 0 }]);
    assert_eq!(log.overlays.last(), Some(&Overlay::GameOver { score: 0 }));
}

#[test]
fn reset_twice_from_idle_is_identical() {
    let mut h = Harness::new(SharedStore::default());
    let mut snapshots = Vec::new();
    for _ in 0..2 {
        h.game.reset();
        let w = h.game.world();
        snapshots.push((
            w.session.score,
            w.session.lives,
            w.session.respawn_count,
            w.obstacles.len(),
            w.projectiles.len(),
            w.power_ups.len(),
            h.game.phase(),
        ));
    }
    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(
        snapshots[0],
        (0, STARTING_LIVES, 0, INITIAL_OBSTACLES, 0, 0, LoopPhase::Idle)
    );
}

#[test]
fn pause_resume_moves_nothing() {
    let mut h = Harness::calm();
    h.game.world_mut().obstacles[0].vel = Vec2::new(1.5, -0.5);
    h.game.intent_mut().thrust = true;
    for _ in 0..5 {
        h.frame(16.0);
    }

    let snapshot = |g: &Game| {
        let w = g.world();
        let mut state = vec![(w.craft.pos, w.craft.vel)];
        state.extend(w.obstacles.iter().map(|o| (o.pos, o.vel)));
        (state, w.spawner.obstacle_elapsed_ms)
    };
    let before = snapshot(&h.game);

    assert!(h.game.pause());
    assert!(!h.frame(5000.0));
    assert!(h.game.resume());
    assert_eq!(snapshot(&h.game), before);

    // The first frame after resume sees only its own delta
    h.frame(16.0);
    let (_, elapsed) = snapshot(&h.game);
    assert!((elapsed - before.1 - 16.0).abs() < 1e-3);
}

#[test]
fn high_score_survives_sessions() {
    let store = SharedStore::default();
    {
        let mut h = Harness::new(store.clone());
        h.game.start();
        let world = h.game.world_mut();
        for o in &mut world.obstacles {
            o.pos = Vec2::new(10.0, 10.0);
            o.vel = Vec2::ZERO;
        }
        let target = Vec2::new(600.0, 100.0);
        world.obstacles[0].pos = target;
        world.obstacles[0].radius = 10.0;
        let id = world.next_entity_id();
        world.projectiles.push(Projectile::new(id, target, Vec2::ZERO));
        h.frame(16.0);
        assert_eq!(h.game.high_score(), 50);
    }

    let stored = store.get(HighScore::STORAGE_KEY).ok().flatten();
    assert_eq!(stored.as_deref(), Some("50"));

    let h = Harness::new(store);
    assert_eq!(h.game.high_score(), 50);
    assert_eq!(h.game.session().score, 0);
}
