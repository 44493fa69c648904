//! The planning entry point: validate → sequence → compile.

use tracing::info;

use cr_core::{DeliveryRequest, Location, PlannerConfig};
use cr_spatial::{AStarRouter, Router, SpatialError, StreetMap};

use crate::compiler::{CompiledRoute, RouteCompiler};
use crate::instruction::Instruction;
use crate::sequencer::{NearestNeighbor, Sequencer, TourOrder};
use crate::{PlanError, PlanResult};

// ── DeliveryResult ────────────────────────────────────────────────────────────

/// Coarse outcome code for callers that only need to branch on the kind of
/// failure (e.g. to pick a console message or exit status).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeliveryResult {
    Success,
    /// The depot or a destination is not on the street map.
    InvalidCoordinate,
    /// Some leg has no street path.
    NoRoute,
    /// A leg's search hit the expansion bound.
    ResourceExhausted,
    /// Input files could not be read or parsed.
    MalformedInput,
}

impl DeliveryResult {
    pub fn of<T>(outcome: &PlanResult<T>) -> Self {
        match outcome {
            Ok(_) => DeliveryResult::Success,
            Err(e) => e.result(),
        }
    }
}

impl PlanError {
    /// The [`DeliveryResult`] code for this error.
    pub fn result(&self) -> DeliveryResult {
        match self {
            PlanError::Spatial(SpatialError::InvalidCoordinate(_)) => DeliveryResult::InvalidCoordinate,
            PlanError::Spatial(SpatialError::NoRoute { .. }) => DeliveryResult::NoRoute,
            PlanError::Spatial(SpatialError::ResourceExhausted { .. }) => DeliveryResult::ResourceExhausted,
            _ => DeliveryResult::MalformedInput,
        }
    }
}

// ── DeliveryPlan ──────────────────────────────────────────────────────────────

/// A complete plan: the chosen tour and its compiled route.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryPlan {
    pub tour:  TourOrder,
    pub route: CompiledRoute,
}

impl DeliveryPlan {
    pub fn instructions(&self) -> &[Instruction] {
        &self.route.instructions
    }

    pub fn total_miles(&self) -> f64 {
        self.route.total_miles
    }

    pub fn describe(&self) -> String {
        self.route.describe()
    }
}

// ── DeliveryPlanner ───────────────────────────────────────────────────────────

/// Plans delivery tours against one shared, read-only [`StreetMap`].
///
/// Generic over the routing engine and the tour sequencer; the defaults are
/// [`AStarRouter`] and [`NearestNeighbor`].
///
/// # Example
///
/// ```rust,ignore
/// let map = load_map(Path::new("mapdata.txt"), &PlannerConfig::default())?;
/// let planner = DeliveryPlanner::new(&map);
/// let plan = planner.plan(&depot, &requests)?;
/// print!("{}", plan.describe());
/// ```
pub struct DeliveryPlanner<'m, R: Router = AStarRouter, Q: Sequencer = NearestNeighbor> {
    compiler:  RouteCompiler<'m, R>,
    sequencer: Q,
}

impl<'m> DeliveryPlanner<'m> {
    /// Planner with default configuration, A* routing and nearest-neighbor
    /// ordering.
    pub fn new(map: &'m StreetMap) -> Self {
        let config = PlannerConfig::default();
        Self::with_parts(map, AStarRouter::from_config(&config), NearestNeighbor, &config)
    }

    /// Planner with custom configuration.
    ///
    /// # Errors
    ///
    /// [`PlanError::Core`] if `config` fails validation.
    pub fn with_config(map: &'m StreetMap, config: &PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self::with_parts(map, AStarRouter::from_config(config), NearestNeighbor, config))
    }
}

impl<'m, R: Router, Q: Sequencer> DeliveryPlanner<'m, R, Q> {
    /// Assemble a planner from explicit components.  `config` supplies the
    /// turn band; routing limits belong to `router`.
    pub fn with_parts(map: &'m StreetMap, router: R, sequencer: Q, config: &PlannerConfig) -> Self {
        Self {
            compiler: RouteCompiler::from_config(map, router, config),
            sequencer,
        }
    }

    pub fn map(&self) -> &'m StreetMap {
        self.compiler.map()
    }

    /// Plan one delivery run.
    ///
    /// Every stop is checked against the map before any routing, so an
    /// unknown coordinate is reported as `InvalidCoordinate` even when an
    /// earlier leg would also have failed.
    ///
    /// # Errors
    ///
    /// [`PlanError::Spatial`] carrying `InvalidCoordinate`, `NoRoute` or
    /// `ResourceExhausted`.  No partial plan is returned.
    pub fn plan(&self, depot: &Location, requests: &[DeliveryRequest]) -> PlanResult<DeliveryPlan> {
        let map = self.map();
        if let Some(bad) = std::iter::once(depot)
            .chain(requests.iter().map(|r| &r.location))
            .find(|loc| !map.contains(loc))
        {
            return Err(SpatialError::InvalidCoordinate(bad.clone()).into());
        }

        let tour = self.sequencer.order(depot, requests);
        let route = self.compiler.compile(depot, &tour.requests)?;

        info!(
            %depot,
            deliveries = requests.len(),
            crow_before = tour.original_miles,
            crow_after = tour.optimized_miles,
            miles = route.total_miles,
            "delivery plan ready"
        );
        Ok(DeliveryPlan { tour, route })
    }

    /// Plan independent runs in parallel on Rayon's pool.  Results are in
    /// input order.
    #[cfg(feature = "parallel")]
    pub fn plan_batch(&self, runs: &[(Location, Vec<DeliveryRequest>)]) -> Vec<PlanResult<DeliveryPlan>> {
        use rayon::prelude::*;

        runs.par_iter()
            .map(|(depot, requests)| self.plan(depot, requests))
            .collect()
    }

    /// Sequential fallback used when the `parallel` feature is off.
    #[cfg(not(feature = "parallel"))]
    pub fn plan_batch(&self, runs: &[(Location, Vec<DeliveryRequest>)]) -> Vec<PlanResult<DeliveryPlan>> {
        runs.iter()
            .map(|(depot, requests)| self.plan(depot, requests))
            .collect()
    }
}
