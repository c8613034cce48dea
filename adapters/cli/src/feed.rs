//! JSON lines state feed written to standard output.

use std::io::Write;

use anyhow::{Context, Result};
use fire_rescue_core::Changelog;
use fire_rescue_system_rounds::GameSummary;
use fire_rescue_world::query::WorldSnapshot;
use serde::Serialize;

/// One line of the feed.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum FeedMessage<'a> {
    /// Full state before the first round.
    Snapshot {
        /// Seed of the game.
        seed: u64,
        /// Board state.
        state: &'a WorldSnapshot,
    },
    /// Everything one round changed.
    Round {
        /// Round changelog.
        changelog: &'a Changelog,
    },
    /// Final account of one game.
    Summary {
        /// Seed of the game.
        seed: u64,
        /// Rounds, counters and outcome.
        summary: &'a GameSummary,
    },
    /// Results over every game of the run.
    Totals {
        /// Games played.
        games: u32,
        /// Games won.
        victories: u32,
        /// Games lost.
        defeats: u32,
        /// Games cut off by the round limit.
        unfinished: u32,
    },
}

/// Writes feed messages, one JSON document per line.
#[derive(Debug)]
pub(crate) struct FeedWriter<W> {
    out: W,
}

impl<W: Write> FeedWriter<W> {
    pub(crate) const fn new(out: W) -> Self {
        Self { out }
    }

    pub(crate) fn send(&mut self, message: &FeedMessage<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, message).context("failed to encode feed message")?;
        self.out
            .write_all(b"\n")
            .context("failed to write feed message")
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush feed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_rescue_core::{Counters, Outcome};
    use serde_json::Value;

    #[test]
    fn messages_are_tagged_and_newline_separated() {
        let mut buffer = Vec::new();
        let summary = GameSummary {
            rounds: 12,
            counters: Counters {
                damage_points: 24,
                people_rescued: 2,
                people_lost: 1,
            },
            outcome: Some(Outcome::StructuralCollapse),
        };
        {
            let mut feed = FeedWriter::new(&mut buffer);
            feed.send(&FeedMessage::Summary {
                seed: 3,
                summary: &summary,
            })
            .expect("in-memory write");
            feed.send(&FeedMessage::Totals {
                games: 1,
                victories: 0,
                defeats: 1,
                unfinished: 0,
            })
            .expect("in-memory write");
        }

        let text = String::from_utf8(buffer).expect("utf-8");
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).expect("one document per line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "summary");
        assert_eq!(lines[0]["summary"]["outcome"], "structural_collapse");
        assert_eq!(lines[0]["summary"]["counters"]["damage_points"], 24);
        assert_eq!(lines[1]["type"], "totals");
        assert_eq!(lines[1]["defeats"], 1);
    }
}
