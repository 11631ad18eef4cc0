/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::board::{BoardModel, PlayerState};
use error::GameError;
use sim::bank::QuestionBank;
use sim::controller::GameController;
use sim::event::{GameEvent, InputEvent};
use sim::session::Session;
use ui::avatar::AssetCatalog;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::layout::Layout;
use ui::renderer::Renderer;
use ui::sound::SoundCatalog;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    logging::init(&config.log);

    // Data problems are fatal and reported before the terminal is taken over.
    let mut session = match build_session(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("startup failed: {e}");
            eprintln!("hexquiz: {e}");
            std::process::exit(1);
        }
    };

    let avatars = AssetCatalog::load(&config.emotions_dir);
    let mut sound = SoundCatalog::new(&config.sounds_dir);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    if let (Some(sfx), Some(cue)) = (sound.as_mut(), session.controller.last_cue()) {
        sfx.play(cue);
    }

    let result = game_loop(&mut session, &mut renderer, sound.as_mut(), &avatars, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing {}!", session.title);
}

/// Question bank, board and controller from the configuration.
fn build_session(config: &GameConfig) -> Result<Session, GameError> {
    let bank = QuestionBank::load(&config.questions_path, config.delimiter)?;
    let board = BoardModel::new(config.board.rows.clone(), config.board.columns)?;
    tracing::debug!(levels = ?bank.levels().collect::<Vec<_>>(), "question levels");
    for level in 0..board.goal_row() {
        if bank.remaining(level) == 0 {
            tracing::warn!(level, row = board.row_name(level), "no questions for this board row");
        }
    }
    let [c0, c1] = config.board.start_columns;
    let starts = [PlayerState::new(0, c0), PlayerState::new(0, c1)];
    let controller = GameController::new(bank, board, starts)?;

    let title = config.resolve_title();
    tracing::info!("session ready: '{title}'");
    Ok(Session::new(controller, title))
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    mut sound: Option<&mut SoundCatalog>,
    avatars: &AssetCatalog,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    renderer.set_pad_help(gp.help_line());
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_secs_f64(1.0 / config.fps as f64);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) || gp.quit_pressed() {
            break;
        }
        if kb.resized {
            renderer.invalidate();
        }

        let answer_count = session.controller.panel().answer_count();
        gp.update_cursor(answer_count);

        for input in collect_inputs(&kb, &gp, renderer.layout()) {
            let events = session.apply(input);
            process_sound_events(sound.as_deref_mut(), &events);
        }

        if kb.any_pressed(KEYS_NEW_GAME) || gp.new_game_pressed() {
            let events = session.restart();
            if !events.is_empty() {
                gp.cursor = 0;
            }
            process_sound_events(sound.as_deref_mut(), &events);
        }

        if last_tick.elapsed() >= tick_rate {
            session.tick();
            last_tick = Instant::now();
        }

        let cursor = gp.connected.then_some(gp.cursor).filter(|&c| c > 0);
        renderer.render(session, avatars, cursor)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&mut SoundCatalog>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        if let GameEvent::Cue(cue) = event {
            sfx.play(*cue);
        }
    }
}

// ── Key Constants ──

const KEYS_CONTROL: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_NEW_GAME: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Everything the player did this frame, as controller inputs:
/// clicks first (resolved against the last drawn layout), then keys, then pad.
fn collect_inputs(kb: &InputState, gp: &GamepadState, layout: &Layout) -> Vec<InputEvent> {
    let mut inputs: Vec<InputEvent> = kb
        .clicks
        .iter()
        .filter_map(|&(x, y)| layout.resolve(x as usize, y as usize))
        .collect();

    if kb.any_pressed(KEYS_CONTROL) {
        inputs.push(InputEvent::ControlPressed);
    }
    if let Some(n) = kb.digit_pressed() {
        inputs.push(InputEvent::AnswerPicked(n));
    }
    if gp.pick_pressed() && gp.cursor > 0 {
        inputs.push(InputEvent::AnswerPicked(gp.cursor));
    }
    if gp.control_pressed() {
        inputs.push(InputEvent::ControlPressed);
    }
    inputs
}
