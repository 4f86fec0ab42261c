//! Idle animation loop
//!
//! A resting character plays one of several idle rows to completion, rests
//! on frame 0 for a random pause, then plays a different row. The loop is a
//! small state machine: the pending pause timer and the "row finished"
//! transition are fields on [`IdleScheduler`], never free-floating callbacks,
//! so stopping the loop drops both at once.

use rand::Rng;

use super::anim::{AnimationDef, AnimationEvent, AnimationRegistry, Repeat};
use super::sprite::Sprite;
use super::timer::DelayedCall;

pub const IDLE_ROWS: u8 = 4;
pub const IDLE_FRAMES_PER_ROW: u32 = 4;
pub const IDLE_FRAME_RATE: f32 = 4.0;
pub const IDLE_PAUSE_MIN_MS: u32 = 1400;
pub const IDLE_PAUSE_MAX_MS: u32 = 2200;
pub const IDLE_INITIAL_DELAY_MS: f32 = 900.0;
pub const RUN_FRAME_RATE: f32 = 10.0;
pub const RUN_FRAMES_TOTAL: u32 = 8;

pub fn idle_row_key(character_id: &str, row: u8) -> String {
    format!("{character_id}-idle-row-{row}")
}

pub fn run_key(character_id: &str) -> String {
    format!("{character_id}-run")
}

/// Pick the next idle row, never repeating `last_row`
///
/// The first pick is uniform over all rows; later picks are uniform over the
/// other `IDLE_ROWS - 1` rows.
pub fn next_row(last_row: Option<u8>, rng: &mut impl Rng) -> u8 {
    match last_row {
        None => rng.random_range(0..IDLE_ROWS),
        Some(last) => (last + rng.random_range(1..IDLE_ROWS)) % IDLE_ROWS,
    }
}

/// Register the non-looping idle rows for a character. Safe to repeat.
pub fn ensure_idle_animations(registry: &mut AnimationRegistry, character_id: &str, idle_sheet: &str) {
    for row in 0..IDLE_ROWS {
        let key = idle_row_key(character_id, row);
        if registry.exists(&key) {
            continue;
        }
        let start = u32::from(row) * IDLE_FRAMES_PER_ROW;
        registry.insert(AnimationDef::range(
            key,
            idle_sheet,
            start,
            start + IDLE_FRAMES_PER_ROW - 1,
            IDLE_FRAME_RATE,
            Repeat::Once,
        ));
    }
}

/// Register the looping run animation for a character. Safe to repeat.
pub fn ensure_run_animation(registry: &mut AnimationRegistry, character_id: &str, run_sheet: &str) {
    let key = run_key(character_id);
    if registry.exists(&key) {
        return;
    }
    registry.insert(AnimationDef::range(
        key,
        run_sheet,
        0,
        RUN_FRAMES_TOTAL - 1,
        RUN_FRAME_RATE,
        Repeat::Loop,
    ));
}

/// Where the idle loop is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlePhase {
    /// Not looping; animation events are ignored
    Stopped,
    /// Resting on frame 0 until the pending timer fires
    Resting,
    /// Playing an idle row
    Playing { row: u8 },
}

/// What an animation-complete event does in a given phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnComplete {
    /// Reset to frame 0 and schedule the next row after a random pause
    RestThenNextRow,
    Ignore,
}

impl IdlePhase {
    pub fn on_complete(self) -> OnComplete {
        match self {
            IdlePhase::Playing { .. } => OnComplete::RestThenNextRow,
            IdlePhase::Stopped | IdlePhase::Resting => OnComplete::Ignore,
        }
    }
}

/// Per-character idle loop state
#[derive(Debug, Clone, PartialEq)]
pub struct IdleScheduler {
    phase: IdlePhase,
    last_row: Option<u8>,
    pending_idle_timer: Option<DelayedCall>,
}

impl Default for IdleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleScheduler {
    pub fn new() -> Self {
        Self {
            phase: IdlePhase::Stopped,
            last_row: None,
            pending_idle_timer: None,
        }
    }

    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    pub fn last_row(&self) -> Option<u8> {
        self.last_row
    }

    pub fn pending_idle_timer(&self) -> Option<&DelayedCall> {
        self.pending_idle_timer.as_ref()
    }

    /// (Re)start the loop: cancel anything pending, show idle frame 0 and
    /// schedule the first row after the initial delay
    pub fn start(&mut self, sprite: &mut Sprite, idle_sheet: &str) {
        self.stop();
        if !sprite.is_active() {
            return;
        }
        sprite.stop_animation();
        sprite.set_texture(idle_sheet, 0);
        self.phase = IdlePhase::Resting;
        self.pending_idle_timer = Some(DelayedCall::new(IDLE_INITIAL_DELAY_MS));
    }

    /// Cancel the pending timer and stop reacting to row completion
    pub fn stop(&mut self) {
        self.pending_idle_timer = None;
        self.phase = IdlePhase::Stopped;
    }

    /// Advance the loop by `dt_ms`. `event` is whatever the sprite's
    /// animation raised this tick.
    pub fn tick(
        &mut self,
        sprite: &mut Sprite,
        registry: &AnimationRegistry,
        character_id: &str,
        event: Option<&AnimationEvent>,
        rng: &mut impl Rng,
        dt_ms: f32,
    ) {
        if self.phase == IdlePhase::Stopped {
            return;
        }
        if !sprite.is_active() {
            self.stop();
            return;
        }

        if let Some(AnimationEvent::Complete { .. }) = event {
            match self.phase.on_complete() {
                OnComplete::RestThenNextRow => {
                    sprite.set_frame(0);
                    let pause = rng.random_range(IDLE_PAUSE_MIN_MS..=IDLE_PAUSE_MAX_MS);
                    self.phase = IdlePhase::Resting;
                    self.pending_idle_timer = Some(DelayedCall::new(pause as f32));
                    return;
                }
                OnComplete::Ignore => {}
            }
        }

        let fired = self
            .pending_idle_timer
            .as_mut()
            .is_some_and(|timer| timer.advance(dt_ms));
        if fired {
            self.pending_idle_timer = None;
            let row = next_row(self.last_row, rng);
            self.last_row = Some(row);
            self.phase = IdlePhase::Playing { row };
            sprite.play(registry, &idle_row_key(character_id, row), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1000.0 / 60.0;

    fn setup() -> (AnimationRegistry, Sprite, Pcg32) {
        let mut registry = AnimationRegistry::new();
        ensure_idle_animations(&mut registry, "linx", "linx-idle");
        let sprite = Sprite::new(Vec2::ZERO, "linx-idle", Vec2::splat(256.0));
        (registry, sprite, Pcg32::seed_from_u64(7))
    }

    /// Tick the loop like the character does: animation first, then idle
    fn step(
        idle: &mut IdleScheduler,
        sprite: &mut Sprite,
        registry: &AnimationRegistry,
        rng: &mut Pcg32,
        dt: f32,
    ) {
        let event = sprite.tick_animation(dt);
        idle.tick(sprite, registry, "linx", event.as_ref(), rng, dt);
    }

    #[test]
    fn test_next_row_never_repeats() {
        let mut rng = Pcg32::seed_from_u64(1);
        for last in 0..IDLE_ROWS {
            for _ in 0..500 {
                assert_ne!(next_row(Some(last), &mut rng), last);
            }
        }
    }

    #[test]
    fn test_next_row_uniform_over_others() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; IDLE_ROWS as usize];
        let samples = 10_000;
        for _ in 0..samples {
            counts[next_row(Some(2), &mut rng) as usize] += 1;
        }
        assert_eq!(counts[2], 0);
        for row in [0, 1, 3] {
            let freq = counts[row] as f64 / samples as f64;
            assert!((freq - 1.0 / 3.0).abs() < 0.03, "row {row} freq {freq}");
        }
    }

    #[test]
    fn test_first_row_in_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            assert!(next_row(None, &mut rng) < IDLE_ROWS);
        }
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut registry = AnimationRegistry::new();
        ensure_idle_animations(&mut registry, "linx", "linx-idle");
        ensure_idle_animations(&mut registry, "linx", "linx-idle");
        ensure_run_animation(&mut registry, "linx", "linx-run");
        ensure_run_animation(&mut registry, "linx", "linx-run");
        assert_eq!(registry.len(), 5);

        let row2 = registry.get(&idle_row_key("linx", 2)).unwrap();
        assert_eq!(row2.frames, vec![8, 9, 10, 11]);
        assert_eq!(row2.repeat, Repeat::Once);
        assert_eq!(row2.frame_rate, 4.0);
        let run = registry.get(&run_key("linx")).unwrap();
        assert_eq!(run.frames.len(), 8);
        assert_eq!(run.repeat, Repeat::Loop);
    }

    #[test]
    fn test_loop_plays_rests_and_switches_rows() {
        let (registry, mut sprite, mut rng) = setup();
        let mut idle = IdleScheduler::new();
        idle.start(&mut sprite, "linx-idle");
        assert_eq!(idle.phase(), IdlePhase::Resting);
        assert_eq!(sprite.frame(), 0);

        // Nothing plays before the initial delay
        let mut elapsed = 0.0;
        while elapsed + DT < IDLE_INITIAL_DELAY_MS {
            step(&mut idle, &mut sprite, &registry, &mut rng, DT);
            elapsed += DT;
            assert_eq!(idle.phase(), IdlePhase::Resting);
        }
        step(&mut idle, &mut sprite, &registry, &mut rng, DT);
        let IdlePhase::Playing { row: first } = idle.phase() else {
            panic!("expected a row to play, got {:?}", idle.phase());
        };
        assert!(sprite.is_animating());

        // A row lasts 4 frames at 4 fps
        for _ in 0..61 {
            step(&mut idle, &mut sprite, &registry, &mut rng, DT);
        }
        assert_eq!(idle.phase(), IdlePhase::Resting);
        assert_eq!(sprite.frame(), 0);
        let pause = idle.pending_idle_timer().unwrap().delay_ms();
        assert!((IDLE_PAUSE_MIN_MS as f32..=IDLE_PAUSE_MAX_MS as f32).contains(&pause));

        // After the pause a different row plays
        let mut waited = 0.0;
        while idle.phase() == IdlePhase::Resting {
            step(&mut idle, &mut sprite, &registry, &mut rng, DT);
            waited += DT;
            assert!(waited <= pause + 2.0 * DT);
        }
        let IdlePhase::Playing { row: second } = idle.phase() else {
            panic!("expected a row to play");
        };
        assert_ne!(first, second);
    }

    #[test]
    fn test_stop_cancels_pending_timer() {
        let (registry, mut sprite, mut rng) = setup();
        let mut idle = IdleScheduler::new();
        idle.start(&mut sprite, "linx-idle");
        idle.stop();
        assert!(idle.pending_idle_timer().is_none());
        for _ in 0..200 {
            step(&mut idle, &mut sprite, &registry, &mut rng, DT);
        }
        assert_eq!(idle.phase(), IdlePhase::Stopped);
        assert!(!sprite.is_animating());
    }

    #[test]
    fn test_restart_replaces_timer() {
        let (registry, mut sprite, mut rng) = setup();
        let mut idle = IdleScheduler::new();
        idle.start(&mut sprite, "linx-idle");
        for _ in 0..30 {
            step(&mut idle, &mut sprite, &registry, &mut rng, DT);
        }
        idle.start(&mut sprite, "linx-idle");
        let timer = idle.pending_idle_timer().unwrap();
        assert_eq!(timer.remaining_ms(), IDLE_INITIAL_DELAY_MS);
    }

    #[test]
    fn test_timer_firing_on_dead_sprite_does_nothing() {
        let (registry, mut sprite, mut rng) = setup();
        let mut idle = IdleScheduler::new();
        idle.start(&mut sprite, "linx-idle");
        sprite.destroy();
        step(&mut idle, &mut sprite, &registry, &mut rng, 2000.0);
        assert_eq!(idle.phase(), IdlePhase::Stopped);
        assert!(!sprite.is_animating());
        assert_eq!(idle.last_row(), None);
    }
}
