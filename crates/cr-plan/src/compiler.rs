//! Route compiler: turns per-leg link chains into instructions.
//!
//! # Legs
//!
//! For destinations `d0 … dn` the compiler routes
//!
//! ```text
//! depot → d0 → d1 → … → dn → depot
//! ```
//!
//! and appends a `Deliver` after every leg except the final return to the
//! depot.
//!
//! # Folding a leg
//!
//! Consecutive links with the same street name collapse into one `Proceed`
//! whose heading comes from the first link of the run.  Where the name
//! changes, the angle between the last link of the old street and the first
//! link of the new one decides whether a `Turn` is emitted (see
//! [`TurnSide::classify`]).

use std::sync::Arc;

use tracing::{debug, info};

use cr_core::{DeliveryRequest, Location, PlannerConfig, normalize_degrees};
use cr_spatial::{Route, Router, StreetLink, StreetMap};

use crate::instruction::{Compass, Instruction, TurnSide};
use crate::PlanResult;

/// Per-leg summary kept alongside the flat instruction list.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegSummary {
    pub from:  Location,
    pub to:    Location,
    pub route: Route,
}

/// The compiled plan: instructions, total street miles, and the legs.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledRoute {
    pub instructions: Vec<Instruction>,
    /// Sum of router-reported leg distances.
    pub total_miles:  f64,
    pub legs:         Vec<LegSummary>,
}

impl CompiledRoute {
    /// Render the plan the way a driver reads it, one line per step.
    pub fn describe(&self) -> String {
        let mut out = String::from("Starting at the depot...\n");
        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out.push_str("You are back at the depot and your deliveries are done!\n");
        out.push_str(&format!("{:.2} miles travelled for all deliveries.\n", self.total_miles));
        out
    }
}

/// Drives a [`Router`] over consecutive stops and folds the results.
pub struct RouteCompiler<'m, R: Router> {
    map:              &'m StreetMap,
    router:           R,
    turn_epsilon_deg: f64,
}

impl<'m, R: Router> RouteCompiler<'m, R> {
    pub fn new(map: &'m StreetMap, router: R) -> Self {
        Self {
            map,
            router,
            turn_epsilon_deg: PlannerConfig::DEFAULT_TURN_EPSILON_DEG,
        }
    }

    pub fn from_config(map: &'m StreetMap, router: R, config: &PlannerConfig) -> Self {
        Self { turn_epsilon_deg: config.turn_epsilon_deg, ..Self::new(map, router) }
    }

    pub fn map(&self) -> &'m StreetMap {
        self.map
    }

    /// Route and fold every leg of the tour.
    ///
    /// # Errors
    ///
    /// The first leg that fails aborts the whole compile; its
    /// [`SpatialError`](cr_spatial::SpatialError) is returned unchanged.
    pub fn compile(&self, depot: &Location, ordered: &[DeliveryRequest]) -> PlanResult<CompiledRoute> {
        let mut compiled = CompiledRoute::default();
        if ordered.is_empty() {
            return Ok(compiled);
        }

        let stops: Vec<&Location> = std::iter::once(depot)
            .chain(ordered.iter().map(|r| &r.location))
            .chain(std::iter::once(depot))
            .collect();

        for (i, pair) in stops.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let route = self.router.route(self.map, from, to)?;
            debug!(leg = i, %from, %to, links = route.links.len(), miles = route.distance_miles, "leg routed");

            fold_leg(&route.links, self.turn_epsilon_deg, &mut compiled.instructions);
            if let Some(request) = ordered.get(i) {
                compiled.instructions.push(Instruction::Deliver { item: request.item.clone() });
            }

            compiled.total_miles += route.distance_miles;
            compiled.legs.push(LegSummary { from: from.clone(), to: to.clone(), route });
        }

        info!(
            legs = compiled.legs.len(),
            instructions = compiled.instructions.len(),
            miles = compiled.total_miles,
            "route compiled"
        );
        Ok(compiled)
    }
}

/// Append the instructions for one leg's link chain to `out`.
pub fn fold_leg(links: &[StreetLink], turn_epsilon_deg: f64, out: &mut Vec<Instruction>) {
    let runs: Vec<&[StreetLink]> = links.chunk_by(|a, b| a.name == b.name).collect();

    for (k, run) in runs.iter().enumerate() {
        let first = &run[0];
        out.push(Instruction::Proceed {
            direction: Compass::from_bearing(first.bearing_deg()),
            street:    Arc::clone(&first.name),
            miles:     run.iter().map(StreetLink::length_miles).sum(),
        });

        let Some(next_run) = runs.get(k + 1) else { break };
        let (outgoing, incoming) = (&run[run.len() - 1], &next_run[0]);
        let angle = normalize_degrees(incoming.bearing_deg() - outgoing.bearing_deg());
        if let Some(side) = TurnSide::classify(angle, turn_epsilon_deg) {
            out.push(Instruction::Turn { side, street: Arc::clone(&incoming.name) });
        }
    }
}
