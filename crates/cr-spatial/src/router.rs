//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! `cr-plan` calls routing via the [`Router`] trait, so applications can swap
//! in other implementations (plain Dijkstra, precomputed tables) without
//! touching the planner.
//!
//! # Cost units
//!
//! All costs are great-circle **miles**.  The A* heuristic is the straight
//! line to the goal, which never exceeds the length of any street path and
//! obeys the triangle inequality, so it is admissible and consistent.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use cr_core::{ExpandableMap, Location, PlannerConfig};

use crate::network::{StreetLink, StreetMap};
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the links to traverse and their total
/// length.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Links in travel order.  `links[i].end == links[i + 1].start`.
    pub links: Vec<StreetLink>,
    /// Sum of link lengths in miles.
    pub distance_miles: f64,
}

impl Route {
    /// `true` if the source and destination are the same location.
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable point-to-point routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve parallel
/// planning requests (see `DeliveryPlanner::plan_batch`).
pub trait Router: Send + Sync {
    /// Compute the cheapest route from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidCoordinate`] if either end is not on the map
    ///   (checked before `from == to`).
    /// - [`SpatialError::NoRoute`] if `to` is unreachable.
    /// - [`SpatialError::ResourceExhausted`] if the implementation bounds its
    ///   search and hits the bound.
    fn route(&self, map: &StreetMap, from: &Location, to: &Location) -> SpatialResult<Route>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* search over the street graph with a straight-line heuristic.
///
/// Search bookkeeping (cost-so-far, predecessor, finalized set) lives in
/// call-local [`ExpandableMap`]s; the router itself holds only settings.
#[derive(Debug, Clone)]
pub struct AStarRouter {
    /// Give up with `ResourceExhausted` after this many node expansions.
    pub max_expansions: Option<usize>,
    /// Load factor for the per-search bookkeeping maps.
    pub max_load_factor: f64,
}

impl AStarRouter {
    pub fn new() -> Self {
        Self::from_config(&PlannerConfig::default())
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            max_expansions:  config.max_expansions,
            max_load_factor: config.max_load_factor,
        }
    }

    /// A router that searches until the frontier is exhausted.
    pub fn unbounded() -> Self {
        Self { max_expansions: None, ..Self::new() }
    }
}

impl Default for AStarRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for AStarRouter {
    fn route(&self, map: &StreetMap, from: &Location, to: &Location) -> SpatialResult<Route> {
        astar(map, from, to, self.max_expansions, self.max_load_factor)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Heap entry.  `f` and `g` are snapshots taken at push time; later
/// improvements push a fresh entry instead of editing this one.
struct Frontier {
    f:    f64,
    g:    f64,
    seq:  u64,
    node: Location,
}

impl Ord for Frontier {
    /// Reversed so `BinaryHeap` (a max-heap) pops the lowest `f` first.
    /// Equal `f` pops in push order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

fn astar(
    map: &StreetMap,
    from: &Location,
    to: &Location,
    max_expansions: Option<usize>,
    max_load_factor: f64,
) -> SpatialResult<Route> {
    if !map.contains(from) {
        return Err(SpatialError::InvalidCoordinate(from.clone()));
    }
    if !map.contains(to) {
        return Err(SpatialError::InvalidCoordinate(to.clone()));
    }
    if from == to {
        return Ok(Route::default());
    }

    let mut g_score:   ExpandableMap<Location, f64>      = ExpandableMap::with_max_load_factor(max_load_factor);
    let mut came_from: ExpandableMap<Location, Location> = ExpandableMap::with_max_load_factor(max_load_factor);
    let mut finalized: ExpandableMap<Location, ()>       = ExpandableMap::with_max_load_factor(max_load_factor);

    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;
    let mut expansions: usize = 0;

    g_score.put(from.clone(), 0.0);
    heap.push(Frontier { f: from.distance_miles(to), g: 0.0, seq, node: from.clone() });

    while let Some(Frontier { g, node, .. }) = heap.pop() {
        // Skip stale heap entries.
        if finalized.contains_key(&node) || g_score.get(&node).is_some_and(|&best| g > best) {
            continue;
        }

        if node == *to {
            let route = reconstruct(map, &came_from, from, to)?;
            debug!(%from, %to, expansions, miles = route.distance_miles, "route found");
            return Ok(route);
        }

        expansions += 1;
        if max_expansions.is_some_and(|limit| expansions > limit) {
            debug!(%from, %to, expansions, "search bound exceeded");
            return Err(SpatialError::ResourceExhausted { expansions: expansions - 1 });
        }
        finalized.put(node.clone(), ());
        trace!(%node, g, "expand");

        for link in map.links_from(&node) {
            let next = &link.end;
            if finalized.contains_key(next) {
                continue;
            }
            let tentative = g + link.length_miles();
            if g_score.get(next).is_none_or(|&best| tentative < best) {
                came_from.put(next.clone(), node.clone());
                g_score.put(next.clone(), tentative);
                seq += 1;
                heap.push(Frontier {
                    f: tentative + next.distance_miles(to),
                    g: tentative,
                    seq,
                    node: next.clone(),
                });
            }
        }
    }

    debug!(%from, %to, expansions, "frontier exhausted");
    Err(SpatialError::NoRoute { from: from.clone(), to: to.clone() })
}

/// Walk predecessors back from `to`, then turn each location pair into the
/// link that connects it.
fn reconstruct(
    map: &StreetMap,
    came_from: &ExpandableMap<Location, Location>,
    from: &Location,
    to: &Location,
) -> SpatialResult<Route> {
    let no_route = || SpatialError::NoRoute { from: from.clone(), to: to.clone() };

    let mut chain = vec![to];
    let mut cur = to;
    while cur != from {
        cur = came_from.get(cur).ok_or_else(no_route)?;
        chain.push(cur);
    }
    chain.reverse();

    let mut links = Vec::with_capacity(chain.len() - 1);
    let mut distance_miles = 0.0;
    for pair in chain.windows(2) {
        let link = map.link_between(pair[0], pair[1]).ok_or_else(no_route)?;
        distance_miles += link.length_miles();
        links.push(link.clone());
    }

    Ok(Route { links, distance_miles })
}
