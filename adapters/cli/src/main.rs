#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless runner that plays seeded Fire Rescue games.
//!
//! The state feed goes to standard output as JSON lines: a snapshot of the
//! board, one changelog per round and a summary per game. Human readable
//! summaries and logs go to standard error.

mod feed;
mod options;

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use fire_rescue_core::{Layout, Role, Rules};
use fire_rescue_scenario::{parse_scenario, FLASH_POINT};
use fire_rescue_system_rounds::{GameSummary, RoundController};
use fire_rescue_world::{query, World};
use log::info;

use crate::{
    feed::{FeedMessage, FeedWriter},
    options::CliArgs,
};

/// Entry point for the Fire Rescue command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let rules = args.resolve_rules()?;
    let crew = args.crew()?;
    let layout = load_layout(args.scenario.as_deref())?;

    let stdout = io::stdout();
    let mut feed = FeedWriter::new(BufWriter::new(stdout.lock()));
    let stream_rounds = args.games == 1;
    let mut tally = Tally::default();

    for game in 0..args.games {
        let seed = args.seed.wrapping_add(u64::from(game));
        let game_setup = GameSetup {
            layout: &layout,
            rules: &rules,
            crew: &crew,
            seed,
            max_rounds: args.max_rounds,
        };
        let summary = play_game(&game_setup, stream_rounds, &mut feed)?;
        feed.send(&FeedMessage::Summary {
            seed,
            summary: &summary,
        })?;
        eprintln!("seed {seed}: {}", describe(&summary));
        tally.record(&summary);
    }

    if args.games > 1 {
        feed.send(&FeedMessage::Totals {
            games: tally.games,
            victories: tally.victories,
            defeats: tally.defeats,
            unfinished: tally.unfinished,
        })?;
        eprintln!(
            "{} games: {} won, {} lost, {} unfinished",
            tally.games, tally.victories, tally.defeats, tally.unfinished
        );
    }
    feed.flush()
}

fn load_layout(path: Option<&Path>) -> Result<Layout> {
    let Some(path) = path else {
        return parse_scenario(FLASH_POINT).context("bundled scenario is invalid");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    parse_scenario(&text).with_context(|| format!("failed to load scenario {}", path.display()))
}

struct GameSetup<'a> {
    layout: &'a Layout,
    rules: &'a Rules,
    crew: &'a [Role],
    seed: u64,
    max_rounds: u32,
}

fn play_game<W: Write>(
    setup: &GameSetup<'_>,
    stream_rounds: bool,
    feed: &mut FeedWriter<W>,
) -> Result<GameSummary> {
    let mut world = World::new(setup.layout, setup.rules.clone())
        .context("scenario is not a valid building")?;
    let mut controller = RoundController::new(setup.rules, setup.seed);
    let mut events = Vec::new();
    let agents = controller
        .spawn_agents(&mut world, setup.crew, &mut events)
        .context("failed to place the crew")?;
    info!("seed {}: {} agents entered the building", setup.seed, agents.len());

    if stream_rounds {
        feed.send(&FeedMessage::Snapshot {
            seed: setup.seed,
            state: &query::snapshot(&world),
        })?;
    }

    let mut feed_error = None;
    let summary = controller
        .run(&mut world, setup.max_rounds, |changelog| {
            if !stream_rounds || feed_error.is_some() {
                return;
            }
            if let Err(error) = feed.send(&FeedMessage::Round { changelog }) {
                feed_error = Some(error);
            }
        })
        .with_context(|| format!("game with seed {} failed", setup.seed))?;
    if let Some(error) = feed_error {
        return Err(error);
    }
    Ok(summary)
}

fn describe(summary: &GameSummary) -> String {
    let result = match summary.outcome {
        Some(outcome) if outcome.is_victory() => "victory".to_owned(),
        Some(outcome) => format!("defeat ({outcome:?})"),
        None => "unfinished".to_owned(),
    };
    format!(
        "{result} after {} rounds, {} rescued, {} lost, {} damage",
        summary.rounds,
        summary.counters.people_rescued,
        summary.counters.people_lost,
        summary.counters.damage_points
    )
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    games: u32,
    victories: u32,
    defeats: u32,
    unfinished: u32,
}

impl Tally {
    fn record(&mut self, summary: &GameSummary) {
        self.games += 1;
        match summary.outcome {
            Some(outcome) if outcome.is_victory() => self.victories += 1,
            Some(_) => self.defeats += 1,
            None => self.unfinished += 1,
        }
    }
}
