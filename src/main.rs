//! skrafl - play a crossword tile game position in the terminal
//!
//! Loads a game snapshot from a JSON file and lets you compose moves on
//! it. Without a server, submitted moves are only shown, not sent.

mod tui;

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use simplelog::{LevelFilter, WriteLogger};
use skrafl::config::Config;
use skrafl::game::snapshot::Snapshot;
use skrafl::game::Game;
use skrafl::transport::Request;
use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};
use tui::{Tui, View};

#[derive(Parser, Debug)]
#[command(name = "skrafl", version, about = "Compose moves on a saved game position")]
struct Args {
    /// Game snapshot (JSON)
    snapshot: PathBuf,
    /// Game id used for saved tile placement; defaults to the file name
    #[arg(long)]
    uuid: Option<String>,
    /// View the game from this seat (0 or 1)
    #[arg(long)]
    player: Option<usize>,
    /// Overtime allowed past the clock, in seconds
    #[arg(long, default_value_t = 600)]
    max_overtime: u64,
    /// Database file for saved tile placement
    #[arg(long)]
    db: Option<PathBuf>,
    /// Do not save tile placement
    #[arg(long)]
    no_store: bool,
    /// Write a debug log to skrafl-debug.log
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.debug {
        setup_logging()?;
    }

    let json = std::fs::read_to_string(&args.snapshot)?;
    let mut snapshot = Snapshot::from_json(&json)?;
    if let Some(player) = args.player {
        snapshot.player = Some(player);
    }
    let uuid = args.uuid.clone().unwrap_or_else(|| {
        args.snapshot
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "game".to_string())
    });

    let config = Config {
        db_path: args.db.clone(),
        use_store: !args.no_store,
        ..Config::default()
    }
    .with_max_overtime(Duration::from_secs(args.max_overtime));

    let (sink, requests) = channel();
    let mut game = Game::open(&uuid, snapshot, sink, &config)?;
    log::info!("opened game {} as seat {}", uuid, game.player);

    let mut terminal = Tui::new()?;
    terminal.enter()?;
    let mut view = View::new();
    let result = run(&mut terminal, &mut game, &mut view, &requests, &config);
    game.cleanup();
    terminal.exit()?;
    result
}

fn run(
    terminal: &mut Tui,
    game: &mut Game,
    view: &mut View,
    requests: &Receiver<Request>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = config.tick_interval;
    let mut last_tick = Instant::now();

    loop {
        for request in requests.try_iter() {
            if let Some(status) = describe_request(&request) {
                view.status = status;
            }
            // No server to answer; let the player keep composing
            if matches!(request, Request::SubmitMove { .. } | Request::ForceResign { .. } | Request::Refresh { .. }) {
                game.move_in_progress = false;
            }
        }

        terminal.draw(|frame| tui::render(frame, game, view))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    view.status.clear();
                    if let Err(e) = view.on_key(game, key.code) {
                        log::error!("{}", e);
                        view.status = e.to_string();
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            game.tick();
            last_tick = Instant::now();
        }

        if view.should_quit {
            return Ok(());
        }
    }
}

/// Status text for a request that would have gone to the server
fn describe_request(request: &Request) -> Option<String> {
    match request {
        Request::SubmitMove { moves, .. } => Some(format!("Offline, not sent: {}", moves.join(" "))),
        Request::ForceResign { .. } => Some("Offline, not sent: forced resignation".to_string()),
        Request::CheckWords { word, .. } => {
            log::debug!("word check for [{}] skipped offline", word);
            None
        }
        Request::LoadMessages { .. } | Request::BestMoves { .. } | Request::Refresh { .. } => None,
    }
}

fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        File::create("skrafl-debug.log")?,
    )?;
    Ok(())
}
