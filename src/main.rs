//! Scroll Runner entry point
//!
//! Headless demo: builds a scene for the chosen variant and drives it with a
//! scripted input sequence through the fixed-step loop, logging progress.
//!
//! Usage: `scroll-runner [VARIANT] [SETTINGS]` (see `--help`)

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use clap::Parser;
    use scroll_runner::consts::{MAX_SUBSTEPS, SIM_DT};
    use scroll_runner::sim::{GameState, TickInput, tick};
    use scroll_runner::{ConfigError, SessionContext, Settings, SettingsError, VariantKey};
    use thiserror::Error;

    /// Reasons the demo cannot start
    #[derive(Debug, Error)]
    pub enum DemoError {
        #[error(transparent)]
        Settings(#[from] SettingsError),
        #[error("failed to build scene: {0}")]
        Scene(#[from] ConfigError),
    }

    #[derive(Parser, Debug)]
    #[command(name = "scroll-runner")]
    #[command(about = "Run the side-scroller scene headless with scripted input")]
    pub struct Args {
        /// Variant to play: grade1 or grade4 (defaults to the settings file's)
        #[arg(value_parser = parse_variant)]
        pub variant: Option<VariantKey>,
        /// Settings JSON file
        pub settings: Option<PathBuf>,
    }

    fn parse_variant(s: &str) -> Result<VariantKey, String> {
        VariantKey::from_str(s).ok_or_else(|| format!("unknown variant '{s}', expected grade1 or grade4"))
    }

    /// Scripted input: (seconds, input held for that long)
    const SCRIPT: &[(f32, TickInput)] = &[
        (2.0, TickInput { left: false, right: false, jump: false }),
        (4.0, TickInput { left: false, right: true, jump: false }),
        (0.1, TickInput { left: false, right: true, jump: true }),
        (0.2, TickInput { left: false, right: true, jump: false }),
        (0.1, TickInput { left: false, right: true, jump: true }),
        (1.5, TickInput { left: false, right: true, jump: false }),
        (2.0, TickInput { left: true, right: false, jump: false }),
        (3.0, TickInput { left: false, right: false, jump: false }),
    ];

    /// Frame clock with an occasional hitch
    fn frame_dt(frame: u64) -> f32 {
        if frame % 97 == 0 { 0.05 } else if frame % 2 == 0 { 0.016 } else { 0.017 }
    }

    /// Game instance holding the scene and loop bookkeeping
    struct Game {
        state: GameState,
        accumulator: f32,
        input: TickInput,
    }

    impl Game {
        fn new(session: &SessionContext, settings: &Settings) -> Result<Self, ConfigError> {
            Ok(Self {
                state: GameState::new(session, settings)?,
                accumulator: 0.0,
                input: TickInput::default(),
            })
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.jump = false;
            }
        }

        fn report(&self) {
            let state = &self.state;
            log::info!(
                "t={:>5.1}s x={:>7.1} y={:>6.1} {:?} scroll={:>7.1} tiles={} recycled={}",
                state.time_ticks as f32 * SIM_DT,
                state.body.pos.x,
                state.body.pos.y,
                state.character.locomotion(),
                state.camera.scroll.x,
                state.terrain.tiles().len(),
                state.terrain.recycled()
            );
        }
    }

    pub fn run(args: Args) -> Result<(), DemoError> {
        let settings = match args.settings {
            Some(path) => Settings::load_from(path)?,
            None => Settings::default(),
        };

        let mut session = SessionContext::new(settings.variant);
        if let Some(key) = args.variant {
            session.set_variant(key);
        }

        let mut game = Game::new(&session, &settings)?;

        let mut frame = 0u64;
        let mut last_report = 0u64;
        let ticks_per_second = (1.0 / SIM_DT).round() as u64;
        for &(seconds, input) in SCRIPT {
            let end_tick = game.state.time_ticks + (seconds / SIM_DT).round() as u64;
            // Jump is a press, delivered once per script step
            let mut press = input.jump;
            while game.state.time_ticks < end_tick {
                game.input.left = input.left;
                game.input.right = input.right;
                game.input.jump |= press;
                press = false;
                game.update(frame_dt(frame));
                frame += 1;

                if game.state.time_ticks >= last_report + ticks_per_second {
                    last_report = game.state.time_ticks;
                    game.report();
                }
            }
        }
        log::info!("Demo finished after {frame} frames");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_args_definition() {
            Args::command().debug_assert();
        }

        #[test]
        fn test_args_parse_variant_and_settings() {
            let args = Args::try_parse_from(["scroll-runner", "Grade4", "tuning.json"]).unwrap();
            assert_eq!(args.variant, Some(VariantKey::Grade4));
            assert_eq!(args.settings, Some(PathBuf::from("tuning.json")));

            let args = Args::try_parse_from(["scroll-runner"]).unwrap();
            assert_eq!(args.variant, None);
            assert_eq!(args.settings, None);
        }

        #[test]
        fn test_unknown_variant_rejected() {
            assert!(Args::try_parse_from(["scroll-runner", "grade9"]).is_err());
        }

        #[test]
        fn test_missing_settings_file_is_an_error() {
            let missing = Args {
                variant: None,
                settings: Some(PathBuf::from("/nonexistent/scroll-runner.json")),
            };
            assert!(matches!(run(missing), Err(DemoError::Settings(SettingsError::Read { .. }))));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;
    use std::process::ExitCode;

    let args = demo::Args::parse();
    env_logger::init();
    log::info!("Scroll Runner (native) starting...");
    match demo::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the deliverable on wasm
}
