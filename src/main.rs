//! Terminal blockfall runner (default binary).
//!
//! Polls crossterm for keys, feeds presses and releases into the engine once
//! per frame together with the elapsed milliseconds, and draws the snapshot
//! through the framebuffer renderer. After game over any key starts a new
//! game that keeps drawing from the same bag; ESC or q quits.
//!
//! Logs go to stderr and are off unless `RUST_LOG` is set; redirect stderr
//! (`RUST_LOG=debug blockfall 2>blockfall.log`) to keep the screen clean.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::cli::{RunConfig, USAGE};
use blockfall::core::{Engine, EngineConfig, GameSnapshot, ShapeQueue};
use blockfall::input::{should_quit, InputHandler};
use blockfall::term::{FrameBuffer, GameView, Screen, Viewport};
use blockfall::types::{InputEvent, ScoreUpdate};

const FRAME_MS: u64 = 16;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run_config = RunConfig::parse(&args)?;
    if run_config.help {
        println!("{}", USAGE);
        return Ok(());
    }
    let config = run_config.engine_config()?;

    let mut term = Screen::new();
    term.enter()?;

    let result = run(&mut term, config, run_config.seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut Screen, config: EngineConfig, seed: Option<u64>) -> Result<()> {
    let shapes = match seed {
        Some(seed) => ShapeQueue::seeded(seed),
        None => ShapeQueue::from_entropy(),
    };
    let sink = |update: ScoreUpdate| {
        log::debug!(
            "score {} lines {} level {}",
            update.score,
            update.lines,
            update.level
        );
    };
    let mut engine = Engine::new(config.clone(), shapes, sink)?;

    let view = GameView::default().with_shapes(config.shapes.clone());
    let mut input = InputHandler::new();
    if term.reports_key_releases() {
        // Real releases arrive; never guess.
        input = input.with_key_release_timeout_ms(u64::MAX);
    }

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut events: Vec<InputEvent> = Vec::with_capacity(16);
    let frame = Duration::from_millis(FRAME_MS);
    let mut last_step = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        engine.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.present(&fb)?;

        // Input until the next frame is due.
        let deadline = last_step + frame;
        let mut restart = false;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if engine.is_game_over() {
                        restart |= key.kind == KeyEventKind::Press;
                        continue;
                    }
                    if let Some(ev) = input.handle_key(key, Instant::now()) {
                        events.push(ev);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if restart {
            let (shapes, sink) = engine.into_parts();
            engine = Engine::new(config.clone(), shapes, sink)?;
            input.reset();
            events.clear();
            last_step = Instant::now();
            log::info!("new game");
            continue;
        }

        // Step with whole milliseconds; the remainder carries to the next frame.
        let now = Instant::now();
        events.extend(input.update(now));
        let elapsed_ms = now.duration_since(last_step).as_millis().min(u128::from(u32::MAX)) as u32;
        last_step += Duration::from_millis(u64::from(elapsed_ms));
        engine.step(&events, elapsed_ms);
        events.clear();
    }
}
