#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round sequencing for Fire Rescue simulations.
//!
//! The [`RoundController`] owns the only random number generator of a game.
//! Every round it plays one turn per agent, strikes one random interior cell,
//! resolves smoke, tops up the points of interest and evaluates the outcome.
//! Each phase reaches the world as explicit commands, so a seed fully
//! determines a game.

use fire_rescue_core::{
    AgentId, CellCoord, Changelog, Command, Counters, Event, GridError, HazardLevel, Outcome,
    PoiKind, Role, Rules, TurnOrder,
};
use fire_rescue_system_navigation::PathPlanner;
use fire_rescue_system_targeting::TargetRegistry;
use fire_rescue_system_turns::ActionEconomy;
use fire_rescue_world::{self as world, query, World};
use log::{debug, info, warn};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while driving a game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    /// A round was requested after the game ended.
    #[error("the game is already over: {0:?}")]
    Finished(Outcome),
    /// The layout offers no entry point for agents.
    #[error("the building has no entry point")]
    NoEntryPoints,
    /// A system addressed a cell outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Final account of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Rounds played.
    pub rounds: u32,
    /// Counters after the last round.
    pub counters: Counters,
    /// Terminal result, or `None` when the round limit was reached first.
    pub outcome: Option<Outcome>,
}

/// Seeded driver of the round loop.
#[derive(Debug)]
pub struct RoundController {
    rng: ChaCha8Rng,
    economy: ActionEconomy,
    registry: TargetRegistry,
    turn_order: TurnOrder,
    round: u32,
}

impl RoundController {
    /// Creates a controller for the provided rules and seed.
    #[must_use]
    pub fn new(rules: &Rules, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            economy: ActionEconomy::new(PathPlanner::new(rules)),
            registry: TargetRegistry::new(),
            turn_order: rules.turn_order,
            round: 0,
        }
    }

    /// Rounds completed so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Hazard claims currently held by suppressors.
    #[must_use]
    pub const fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Places one agent per role, each on a random entry point.
    pub fn spawn_agents(
        &mut self,
        world: &mut World,
        roles: &[Role],
        out_events: &mut Vec<Event>,
    ) -> Result<Vec<AgentId>, RoundError> {
        let mut spawned = Vec::with_capacity(roles.len());
        for &role in roles {
            let cell = *query::entry_points(world)
                .choose(&mut self.rng)
                .ok_or(RoundError::NoEntryPoints)?;
            let start = out_events.len();
            world::apply(world, Command::SpawnAgent { role, cell }, out_events);
            for event in &out_events[start..] {
                if let Event::AgentSpawned { agent, .. } = event {
                    spawned.push(*agent);
                }
            }
        }
        Ok(spawned)
    }

    /// Terminal result of the game, if any. Calling it never changes state.
    #[must_use]
    pub fn evaluate(world: &World) -> Option<Outcome> {
        query::outcome(world)
    }

    /// Plays one full round and returns everything it changed.
    pub fn play_round(&mut self, world: &mut World) -> Result<Changelog, RoundError> {
        if let Some(outcome) = Self::evaluate(world) {
            return Err(RoundError::Finished(outcome));
        }
        self.round += 1;
        let mut events = Vec::new();

        for agent in self.turn_order(world) {
            let report =
                self.economy
                    .take_turn(world, &mut self.registry, agent, &mut events)?;
            debug!(
                "round {}: agent {} took {} actions, {} AP banked",
                self.round,
                agent.get(),
                report.actions,
                report.ap_remaining
            );
        }

        let cells = query::interior_cells(world);
        if let Some(&cell) = cells.choose(&mut self.rng) {
            self.spread(world, Command::Ignite { cell }, &mut events)?;
        }
        self.spread(world, Command::ResolveSmoke, &mut events)?;
        self.replenish(world, &mut events);

        let counters = query::counters(world);
        let outcome = Self::evaluate(world);
        let mut changelog = Changelog::new(self.round);
        changelog.record(&events);
        changelog.close(counters, outcome);

        info!(
            "round {} done: {} damage, {} rescued, {} lost",
            self.round, counters.damage_points, counters.people_rescued, counters.people_lost
        );
        if let Some(outcome) = outcome {
            info!("game over after round {}: {outcome:?}", self.round);
        }
        Ok(changelog)
    }

    /// Plays rounds until the game ends or `max_rounds` rounds were played,
    /// handing each changelog to `on_round`.
    pub fn run<F>(
        &mut self,
        world: &mut World,
        max_rounds: u32,
        mut on_round: F,
    ) -> Result<GameSummary, RoundError>
    where
        F: FnMut(&Changelog),
    {
        while self.round < max_rounds && Self::evaluate(world).is_none() {
            let changelog = self.play_round(world)?;
            on_round(&changelog);
        }
        Ok(GameSummary {
            rounds: self.round,
            counters: query::counters(world),
            outcome: Self::evaluate(world),
        })
    }

    fn turn_order(&mut self, world: &World) -> Vec<AgentId> {
        let mut order: Vec<AgentId> = query::agents(world)
            .into_iter()
            .map(|agent| agent.id)
            .collect();
        if self.turn_order == TurnOrder::Shuffled {
            order.shuffle(&mut self.rng);
        }
        order
    }

    /// Applies a hazard command, then relocates agents caught by it.
    fn spread(
        &self,
        world: &mut World,
        command: Command,
        events: &mut Vec<Event>,
    ) -> Result<(), RoundError> {
        let mut phase = Vec::new();
        world::apply(world, command, &mut phase);
        let mut relocations = Vec::new();
        let _ = self
            .economy
            .relocate_caught(world, &phase, &mut relocations)?;
        events.append(&mut phase);
        events.append(&mut relocations);
        Ok(())
    }

    /// Draws points of interest until enough are in play or both pools are
    /// empty. The kind is drawn in proportion to what is left in each pool.
    fn replenish(&mut self, world: &mut World, events: &mut Vec<Event>) {
        let minimum = query::rules(world).min_outstanding_pois;

        while query::outstanding_pois(world) < minimum {
            let victims = query::pool(world, PoiKind::Victim);
            let false_alarms = query::pool(world, PoiKind::FalseAlarm);
            let remaining = victims.saturating_add(false_alarms);
            if remaining == 0 {
                debug!("both point of interest pools are empty");
                break;
            }

            let free = free_cells(world);
            let Some(&cell) = free.choose(&mut self.rng) else {
                warn!("no free interior cell for a point of interest");
                break;
            };
            let kind = if self.rng.gen_range(0..remaining) < victims {
                PoiKind::Victim
            } else {
                PoiKind::FalseAlarm
            };

            let start = events.len();
            world::apply(world, Command::PlacePoi { cell, kind }, events);
            if events[start..]
                .iter()
                .any(|event| matches!(event, Event::CommandRejected { .. }))
            {
                warn!("point of interest at {cell} was refused");
                break;
            }
        }
    }
}

/// Interior cells that hold no point of interest and are not burning.
fn free_cells(world: &World) -> Vec<CellCoord> {
    query::interior_cells(world)
        .into_iter()
        .filter(|cell| matches!(query::poi(world, *cell), Ok(None)))
        .filter(|cell| !matches!(query::hazard(world, *cell), Ok(HazardLevel::Fire)))
        .collect()
}
