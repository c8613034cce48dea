//! Command line arguments and the rule set they describe.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use fire_rescue_core::{BreachPolicy, Role, Rules, TurnOrder};

/// Runs seeded Fire Rescue games and streams their state as JSON lines.
#[derive(Debug, Parser)]
#[command(name = "fire-rescue", author, version, about, long_about = None)]
pub(crate) struct CliArgs {
    /// Scenario file to load. The bundled Flash Point building is used when omitted.
    #[arg(long, value_name = "PATH")]
    pub(crate) scenario: Option<PathBuf>,
    /// TOML file with rule overrides.
    #[arg(long, value_name = "PATH")]
    pub(crate) rules: Option<PathBuf>,
    /// Seed of the first game; later games use consecutive seeds.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
    /// Number of agents entering the building.
    #[arg(long, default_value_t = 6)]
    pub(crate) agents: usize,
    /// How many of the agents are rescuers. The others suppress hazards.
    #[arg(long, default_value_t = 1)]
    pub(crate) rescuers: usize,
    /// Round limit of a single game.
    #[arg(long, default_value_t = 200)]
    pub(crate) max_rounds: u32,
    /// Turn order, overriding the rules file.
    #[arg(long, value_enum)]
    pub(crate) turn_order: Option<TurnOrderArg>,
    /// Wall breaching policy, overriding the rules file.
    #[arg(long, value_enum)]
    pub(crate) breach_policy: Option<BreachPolicyArg>,
    /// Number of games to play back to back. Only single games stream their rounds.
    #[arg(long, default_value_t = 1)]
    pub(crate) games: u32,
    /// Log round-level progress when `RUST_LOG` is unset.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Turn order accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum TurnOrderArg {
    /// Ascending agent identifiers.
    Fixed,
    /// Reshuffled every round.
    Shuffled,
}

impl From<TurnOrderArg> for TurnOrder {
    fn from(value: TurnOrderArg) -> Self {
        match value {
            TurnOrderArg::Fixed => Self::Fixed,
            TurnOrderArg::Shuffled => Self::Shuffled,
        }
    }
}

/// Breach policy accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum BreachPolicyArg {
    /// Walls always block.
    Never,
    /// Walls are chopped only when nothing else reaches the target.
    WhenNoAlternative,
    /// Walls are always an option.
    Always,
}

impl From<BreachPolicyArg> for BreachPolicy {
    fn from(value: BreachPolicyArg) -> Self {
        match value {
            BreachPolicyArg::Never => Self::Never,
            BreachPolicyArg::WhenNoAlternative => Self::WhenNoAlternative,
            BreachPolicyArg::Always => Self::Always,
        }
    }
}

impl CliArgs {
    /// Rules from the optional rules file with the command line overrides applied.
    pub(crate) fn resolve_rules(&self) -> Result<Rules> {
        let mut rules = match &self.rules {
            Some(path) => load_rules(path)?,
            None => Rules::default(),
        };
        if let Some(order) = self.turn_order {
            rules.turn_order = order.into();
        }
        if let Some(policy) = self.breach_policy {
            rules.breach_policy = policy.into();
        }
        Ok(rules)
    }

    /// Roles of the crew, rescuers first.
    pub(crate) fn crew(&self) -> Result<Vec<Role>> {
        ensure!(self.agents > 0, "at least one agent is required");
        ensure!(
            self.rescuers <= self.agents,
            "{} rescuers do not fit in a crew of {} agents",
            self.rescuers,
            self.agents
        );
        Ok((0..self.agents)
            .map(|index| {
                if index < self.rescuers {
                    Role::Rescuer
                } else {
                    Role::Suppressor
                }
            })
            .collect())
    }
}

fn load_rules(path: &Path) -> Result<Rules> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    parse_rules(&contents).with_context(|| format!("invalid rules file {}", path.display()))
}

fn parse_rules(contents: &str) -> Result<Rules> {
    toml::from_str(contents).context("failed to parse rules TOML")
}
