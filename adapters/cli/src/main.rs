#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Quiz Trail headlessly.
//!
//! Runs either game mode against the in-tree mock backend: questions print
//! to the terminal, answers come from stdin or the seeded auto-player, and
//! the clock advances with real elapsed time between answers. The finished
//! run prints a shareable summary string.

mod autoplay;
mod registry;
mod run_transfer;

use std::io::{self, BufRead as _, Write as _};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use quiz_trail_backend::{GameDirector, MockBackend};
use quiz_trail_core::{
    Event, GameConfig, GameKind, ProgressTrack as _, SessionStatus, VerdictSource, WELCOME_BANNER,
};
use quiz_trail_session::query;
use quiz_trail_system_bootstrap::{assemble, GameSetup, Viewport};
use quiz_trail_system_vision::RasterImage;

use crate::autoplay::{derive_auto_seed, AutoPlayer};
use crate::registry::GameRegistry;
use crate::run_transfer::RunSummary;

/// Simulated time charged per answer when the auto-player is driving.
const AUTO_TURN_TIME: Duration = Duration::from_millis(1_500);

const OPTION_LETTERS: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Plays a Quiz Trail game mode in the terminal.
#[derive(Debug, Parser)]
#[command(name = "quiz-trail")]
struct Args {
    /// Game code or alias to play.
    #[arg(long, default_value = "leaf_hop")]
    game: String,

    /// TOML game registry replacing the built-in catalog.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// PNG map mined for stepping stones (leaf mode only).
    #[arg(long)]
    map: Option<PathBuf>,

    /// Viewport width the course is laid out in.
    #[arg(long, default_value_t = 750.0)]
    width: f32,

    /// Viewport height the course is laid out in.
    #[arg(long, default_value_t = 1334.0)]
    height: f32,

    /// Answer automatically with a seeded player instead of stdin.
    #[arg(long)]
    auto: bool,

    /// Seed for the automatic player.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Override the time limit in seconds.
    #[arg(long)]
    time_limit: Option<u64>,

    /// Decode a shared run summary string and exit.
    #[arg(long, value_name = "SUMMARY")]
    decode: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(encoded) = &args.decode {
        let summary = RunSummary::decode(encoded)?;
        println!(
            "{}: score {} in {}",
            summary.game_code,
            summary.score,
            format_time(Duration::from_millis(summary.elapsed_ms))
        );
        return Ok(());
    }

    let registry = match &args.registry {
        Some(path) => GameRegistry::load(path)?,
        None => GameRegistry::builtin(),
    };
    let entry = registry.resolve_or_default(&args.game).clone();
    let viewport = Viewport::new(args.width, args.height);

    let map_path = args.map.clone().or_else(|| entry.map().map(PathBuf::from));
    let map_pixels = match (entry.kind(), map_path) {
        (GameKind::LeafHop, Some(path)) => Some(load_map(&path)?),
        _ => None,
    };
    let raster = match &map_pixels {
        Some((width, height, data)) => Some(RasterImage::new(*width, *height, data)?),
        None => None,
    };

    let setup = assemble(entry.kind(), raster.as_ref(), viewport);
    let time_limit = args
        .time_limit
        .map_or(Duration::from_secs(entry.time_limit_secs()), Duration::from_secs);
    let config = GameConfig::new(
        entry.kind(),
        entry.code(),
        entry.label(),
        setup.rules(),
        time_limit,
    );

    let mut director = GameDirector::new(MockBackend::new(), config);
    let mut auto_player = args
        .auto
        .then(|| AutoPlayer::new(derive_auto_seed(args.seed, entry.code())));

    println!("{WELCOME_BANNER}");
    println!("Playing {} ({})", entry.label(), entry.code());

    let events = director.start_run()?;
    announce_start(&events);

    play(&mut director, &setup, auto_player.as_mut())?;

    let report = query::run_report(director.session());
    match query::status(director.session()) {
        SessionStatus::Completed => println!("You win! Final score: {}", report.score()),
        SessionStatus::TimedOut => println!("Time is up. Final score: {}", report.score()),
        _ => println!("Run abandoned at score {}", report.score()),
    }

    let summary = RunSummary::from_report(director.config().code(), &report);
    println!("Share this run: {}", summary.encode());
    Ok(())
}

fn play(
    director: &mut GameDirector<MockBackend>,
    setup: &GameSetup,
    mut auto_player: Option<&mut AutoPlayer>,
) -> anyhow::Result<()> {
    let stdin = io::stdin();

    while query::status(director.session()) == SessionStatus::Playing {
        let Some((content, options)) = current_prompt(director) else {
            break;
        };

        println!();
        println!(
            "[{}] {content}",
            format_time(query::remaining_time(director.session()))
        );
        for (index, option) in options.iter().enumerate() {
            let letter = OPTION_LETTERS.get(index).copied().unwrap_or('?');
            println!("  {letter}) {option}");
        }

        let turn_started = Instant::now();
        let selected = match auto_player.as_deref_mut() {
            Some(player) => {
                let choice = player.choose(options.len());
                let letter = OPTION_LETTERS.get(choice).copied().unwrap_or('?');
                println!("> {letter}");
                choice
            }
            None => match read_choice(&stdin, options.len())? {
                Some(choice) => choice,
                None => break,
            },
        };

        let events = director.submit_answer(selected);
        announce_verdict(&events);
        announce_target(director, setup);

        let dt = if auto_player.is_some() {
            AUTO_TURN_TIME
        } else {
            turn_started.elapsed()
        };
        let _ = director.tick(dt);
    }

    Ok(())
}

fn current_prompt(director: &GameDirector<MockBackend>) -> Option<(String, Vec<String>)> {
    let question = query::current_question(director.session())?;
    let content = question.content().to_owned();
    let options = question
        .options()
        .iter()
        .map(|option| option.text().to_owned())
        .collect();
    Some((content, options))
}

fn read_choice(stdin: &io::Stdin, option_count: usize) -> anyhow::Result<Option<usize>> {
    loop {
        print!("your answer (or q to quit): ");
        io::stdout().flush().context("could not flush prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("could not read answer")?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim().to_lowercase();
        if trimmed == "q" || trimmed == "quit" {
            return Ok(None);
        }

        if let Some(index) = parse_choice(&trimmed, option_count) {
            return Ok(Some(index));
        }

        println!("please answer with a letter (a-{})", OPTION_LETTERS[option_count.saturating_sub(1).min(OPTION_LETTERS.len() - 1)]);
    }
}

fn parse_choice(input: &str, option_count: usize) -> Option<usize> {
    if input.len() == 1 {
        let letter = input.chars().next()?;
        if let Some(index) = OPTION_LETTERS.iter().position(|&candidate| candidate == letter) {
            if index < option_count {
                return Some(index);
            }
        }
    }

    match input.parse::<usize>() {
        Ok(number) if number >= 1 && number <= option_count => Some(number - 1),
        _ => None,
    }
}

fn announce_start(events: &[Event]) {
    for event in events {
        if let Event::RunStarted {
            question_count,
            time_limit,
        } = event
        {
            println!(
                "{question_count} questions loaded, {} on the clock",
                format_time(*time_limit)
            );
        }
    }
}

fn announce_verdict(events: &[Event]) {
    for event in events {
        match event {
            Event::AnswerJudged {
                correct, source, ..
            } => {
                let authority = match source {
                    VerdictSource::Remote => "checked remotely",
                    VerdictSource::Local => "checked locally",
                };
                if *correct {
                    println!("Correct! ({authority})");
                } else {
                    println!("Not quite. ({authority})");
                }
            }
            Event::ProgressReset { time_penalty } => {
                println!(
                    "The train rolls back to the engine; {}s penalty",
                    time_penalty.as_secs()
                );
            }
            _ => {}
        }
    }
}

fn announce_target(director: &GameDirector<MockBackend>, setup: &GameSetup) {
    let progress = query::progress(director.session());
    let pose = setup.course().pose_at(progress);
    println!(
        "Progress {progress}: head to ({:.0}, {:.0})",
        pose.position().x(),
        pose.position().y()
    );
}

fn load_map(path: &std::path::Path) -> anyhow::Result<(u32, u32, Vec<u8>)> {
    let image = image::open(path)
        .with_context(|| format!("could not open map image {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    log::debug!("decoded map {} ({width}x{height})", path.display());
    Ok((width, height, image.into_raw()))
}

fn format_time(duration: Duration) -> String {
    let total_secs = duration.as_secs() + u64::from(duration.subsec_millis() > 0);
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}
