use color_eyre::{eyre::eyre, Result};
use drillsim::config::{self, Config, InputKind};
use drillsim::drill::{DrillStateMachine, Toggle};
use drillsim::feedback::{SimulatedAudio, SimulatedHaptics};
#[cfg(feature = "gamepad")]
use drillsim::input::GamepadInput;
use drillsim::input::{InputSource, ReacquiringInput, VirtualController, VirtualProvider};
use drillsim::rig::Rig;
use drillsim::scenario::{Scenario, ScenarioPlayer};
use drillsim::session::GameSession;
use std::time::Duration;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup()?;

    let config = config::load().await?;
    let scenario = config::load_scenario(&config.runtime).await?;

    // Button steps in the script still drive this controller; only the
    // scripted input reads it.
    let controller = VirtualController::new();
    let hand = config.drill.hand;
    let input_kind = config.runtime.input;

    match input_kind {
        InputKind::Scripted => {
            let input = ReacquiringInput::new(VirtualProvider::new(controller.clone()), hand);
            run(config, scenario, input, controller).await
        }
        #[cfg(feature = "gamepad")]
        InputKind::Gamepad => {
            let input =
                GamepadInput::new(hand).map_err(|e| eyre!("Failed to open gamepad: {}", e))?;
            run(config, scenario, input, controller).await
        }
        #[cfg(not(feature = "gamepad"))]
        InputKind::Gamepad => Err(eyre!(
            "Gamepad input requested, but drillsim was built without the gamepad feature"
        )),
    }
}

async fn run<I: InputSource>(
    config: Config,
    scenario: Scenario,
    input: I,
    controller: VirtualController,
) -> Result<()> {
    let profile = config
        .feedback_profile()
        .map_err(|e| eyre!("Invalid feedback table: {}", e))?;
    let library = config.clip_library();

    info!("Initializing drill with settings: {:?}", config.drill);
    let drill = DrillStateMachine::new(
        config.drill.clone(),
        profile,
        SimulatedAudio::new(library.clone()),
        SimulatedHaptics::new(library),
    );

    let session = GameSession::new(config.session.clone());
    let mut rig = Rig::new(input, drill, Some(session));

    info!("Running scenario '{}' for {:.1}s", scenario.name, scenario.duration);
    let mut player = ScenarioPlayer::new(scenario, controller);

    let dt = config.runtime.tick_seconds();
    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));

    while !player.is_finished() {
        if config.runtime.realtime {
            interval.tick().await;
        }

        let events = player.advance(dt);
        let report = rig.tick(dt, &events);

        match report.toggle {
            Some(Toggle::TurnedOn) => info!("t={:.2}s drill switched on", player.clock()),
            Some(Toggle::TurnedOff) => info!("t={:.2}s drill switched off", player.clock()),
            None => {}
        }
        for target in &report.timers_fired {
            info!("t={:.2}s target {} drilled through", player.clock(), target);
        }
        if !report.is_empty() {
            debug!("Frame {}: {:?}", rig.frame(), report);
        }
    }

    rig.shutdown();

    if let Some(session) = rig.session() {
        info!(
            "Scenario finished: score {}, {}s left on the clock",
            session.score(),
            session.remaining_display()
        );
    }
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
