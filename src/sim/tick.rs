//! Fixed timestep simulation tick
//!
//! Advances the scene deterministically: body physics, locomotion from
//! input, character animation, camera follow, then the background and
//! ground are placed for the new camera position.

use super::state::GameState;
use crate::secs_to_ms;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
    /// Jump pressed this tick (edge, not held)
    pub jump: bool,
}

impl TickInput {
    /// -1, 0 or 1; opposing keys cancel
    pub fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the scene by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let settings = &state.settings;
    let movement = settings.movement;

    state.body.step(
        settings.physics.gravity,
        dt,
        state.terrain.tiles().iter().map(|tile| tile.body()),
    );
    let on_ground = state.body.on_ground;

    // Landing
    if on_ground && !state.was_on_ground {
        state.has_double_jumped = false;
        state.character.end_spin();
    }

    let direction = input.direction();
    if direction != 0.0 {
        state.last_move_direction = direction;
        state.character.set_facing(direction);
    }
    state.body.vel.x = direction * movement.move_speed;

    if on_ground {
        if direction != 0.0 {
            state.character.start_running(&state.registry);
        } else {
            state.character.stop_running();
        }
    } else {
        state.character.show_jump_frame(movement.jump_frame_index);
    }

    if input.jump {
        if on_ground {
            state.body.vel.y = -movement.jump_velocity;
            state.body.on_ground = false;
            state.character.show_jump_frame(movement.jump_frame_index);
        } else if movement.double_jump_enabled && !state.has_double_jumped && state.body.vel.y < 0.0 {
            state.body.vel.y = -movement.double_jump_velocity;
            state.has_double_jumped = true;
            state.character.start_spin(state.last_move_direction);
            log::debug!("Double jump at tick {}", state.time_ticks);
        }
    }
    state.was_on_ground = on_ground;

    state.character.tick(&state.registry, &mut state.rng, secs_to_ms(dt));
    state.character.place_at(state.body.pos);

    state.camera.follow(state.character.anchor());
    state.parallax.update(state.camera.scroll.x, 0.0);
    state.terrain.update(f64::from(state.camera.scroll.x), &mut state.rng);

    state.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::character::{Locomotion, Pivot};
    use crate::variant::{SessionContext, VariantKey};

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };
    const LEFT: TickInput = TickInput {
        left: true,
        right: false,
        jump: false,
    };
    const JUMP: TickInput = TickInput {
        left: false,
        right: false,
        jump: true,
    };

    fn scene() -> GameState {
        let mut state = GameState::new(&SessionContext::new(VariantKey::Grade1), &Settings::default()).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        state
    }

    fn run(state: &mut GameState, input: TickInput, ticks: usize) {
        for _ in 0..ticks {
            tick(state, &input, SIM_DT);
        }
    }

    fn run_until_landed(state: &mut GameState) -> usize {
        let mut ticks = 0;
        while !state.body.on_ground {
            tick(state, &TickInput::default(), SIM_DT);
            ticks += 1;
            assert!(ticks < 240, "never landed");
        }
        ticks
    }

    #[test]
    fn test_starts_idle_on_the_ground() {
        let state = scene();
        assert!(state.body.on_ground);
        assert_eq!(state.body.pos.y, state.ground_y);
        assert_eq!(state.character.locomotion(), Locomotion::Idle);
        assert_eq!(state.character.sprite().texture(), "linx-idle");
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_direction_input() {
        assert_eq!(RIGHT.direction(), 1.0);
        assert_eq!(LEFT.direction(), -1.0);
        let both = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        assert_eq!(both.direction(), 0.0);
    }

    #[test]
    fn test_running_scrolls_the_world() {
        let mut state = scene();
        let start_x = state.body.pos.x;
        let start_scroll = state.camera.scroll.x;

        run(&mut state, RIGHT, 240);
        assert!(state.character.is_running());
        assert!(!state.character.sprite().flip_x);
        assert!(state.body.on_ground);
        // Velocity set by input moves the body from the next step on
        assert!((state.body.pos.x - (start_x + 239.0 * 260.0 * SIM_DT)).abs() < 1.0);
        assert!(state.camera.scroll.x > start_scroll + 800.0);
        assert!(state.terrain.recycled() > 0);

        let tiles = state.terrain.tiles();
        let first = tiles.front().unwrap();
        let last = tiles.back().unwrap();
        assert!(first.x <= f64::from(state.camera.scroll.x));
        assert!(last.right() >= f64::from(state.camera.scroll.x + state.camera.width));
        assert!(tiles.iter().all(|t| t.collision_y == state.ground_y));
        assert_eq!(state.parallax.layers()[0].tile_position_x, state.camera.scroll.x * 0.2);

        run(&mut state, TickInput::default(), 1);
        assert_eq!(state.character.locomotion(), Locomotion::Idle);
    }

    #[test]
    fn test_moving_left_flips() {
        let mut state = scene();
        run(&mut state, LEFT, 10);
        assert!(state.character.sprite().flip_x);
        assert_eq!(state.last_move_direction, -1.0);
        assert!(state.body.pos.x < 512.0);
    }

    #[test]
    fn test_jump_goes_airborne_and_lands_idle() {
        let mut state = scene();
        tick(&mut state, &JUMP, SIM_DT);
        assert_eq!(state.character.locomotion(), Locomotion::Airborne);
        assert_eq!(state.character.sprite().texture(), "linx-run");
        assert_eq!(state.character.sprite().frame(), 2);

        run(&mut state, TickInput::default(), 5);
        assert!(!state.body.on_ground);
        assert!(state.body.pos.y < state.ground_y);
        assert_eq!(state.character.locomotion(), Locomotion::Airborne);

        let ticks = run_until_landed(&mut state);
        assert!(ticks > 30);
        assert_eq!(state.body.pos.y, state.ground_y);
        assert_eq!(state.character.locomotion(), Locomotion::Idle);
        assert_eq!(state.character.sprite().texture(), "linx-idle");
    }

    #[test]
    fn test_double_jump_spins_and_resets_on_landing() {
        let mut state = scene();
        tick(&mut state, &JUMP, SIM_DT);
        run(&mut state, TickInput::default(), 5);
        assert!(state.body.vel.y < 0.0);

        tick(&mut state, &JUMP, SIM_DT);
        assert!(state.has_double_jumped);
        assert!(state.character.is_spinning());
        assert!(matches!(state.character.pivot(), Pivot::Center { .. }));
        assert!(state.character.sprite().angle > 0.0);

        // A third press is ignored
        let vel = state.body.vel.y;
        tick(&mut state, &JUMP, SIM_DT);
        assert!(state.body.vel.y > vel);

        run_until_landed(&mut state);
        assert!(!state.has_double_jumped);
        assert!(!state.character.is_spinning());
        assert_eq!(state.character.pivot(), Pivot::Bottom);
        assert_eq!(state.character.sprite().angle, 0.0);
        assert_eq!(state.character.sprite().pos.y, state.ground_y);
    }

    #[test]
    fn test_spin_follows_last_move_direction() {
        let mut state = scene();
        run(&mut state, LEFT, 3);
        tick(
            &mut state,
            &TickInput {
                left: true,
                right: false,
                jump: true,
            },
            SIM_DT,
        );
        run(&mut state, LEFT, 3);
        tick(
            &mut state,
            &TickInput {
                left: true,
                right: false,
                jump: true,
            },
            SIM_DT,
        );
        assert!(state.character.sprite().angle < 0.0);
    }

    #[test]
    fn test_no_double_jump_while_falling() {
        let mut state = scene();
        tick(&mut state, &JUMP, SIM_DT);
        run(&mut state, TickInput::default(), 30);
        assert!(!state.body.on_ground);
        assert!(state.body.vel.y > 0.0);

        tick(&mut state, &JUMP, SIM_DT);
        assert!(!state.has_double_jumped);
        assert!(!state.character.is_spinning());
    }

    #[test]
    fn test_double_jump_can_be_disabled() {
        let mut settings = Settings::default();
        settings.movement.double_jump_enabled = false;
        let mut state = GameState::new(&SessionContext::default(), &settings).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &JUMP, SIM_DT);
        run(&mut state, TickInput::default(), 3);
        tick(&mut state, &JUMP, SIM_DT);
        assert!(!state.has_double_jumped);
        assert!(!state.character.is_spinning());
    }

    #[test]
    fn test_determinism() {
        // Two scenes with the same seed and inputs stay identical
        let mut settings = Settings::default();
        settings.seed = 4242;
        let session = SessionContext::new(VariantKey::Grade4);
        let mut state1 = GameState::new(&session, &settings).unwrap();
        let mut state2 = GameState::new(&session, &settings).unwrap();

        let script = [(RIGHT, 200), (TickInput::default(), 300), (JUMP, 1), (LEFT, 120)];
        for (input, ticks) in script {
            run(&mut state1, input, ticks);
            run(&mut state2, input, ticks);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.body, state2.body);
        assert_eq!(state1.camera, state2.camera);
        assert_eq!(state1.character, state2.character);
        let columns1: Vec<u32> = state1.terrain.tiles().iter().map(|t| t.column).collect();
        let columns2: Vec<u32> = state2.terrain.tiles().iter().map(|t| t.column).collect();
        assert_eq!(columns1, columns2);
    }
}
